use anyhow::{Context, Result};
use chairside_core::EstimatorInputs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::state::ensure_chairside_home;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsSection,
    #[serde(default)]
    pub display: DisplaySection,
    #[serde(default)]
    pub log: LogSection,
}

/// Starting values for the estimator controls
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DefaultsSection {
    pub missed_calls_per_month: u32,
    pub average_treatment_value: f64,
    pub hours_saved_per_week: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplaySection {
    /// How long result counters take to count up in the TUI
    pub counter_duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogSection {
    /// tracing-subscriber EnvFilter directive; RUST_LOG wins when set
    pub filter: String,
}

impl Default for DefaultsSection {
    fn default() -> Self {
        let d = EstimatorInputs::default();
        Self {
            missed_calls_per_month: d.missed_calls_per_month,
            average_treatment_value: d.average_treatment_value,
            hours_saved_per_week: d.hours_saved_per_week,
        }
    }
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            counter_duration_ms: 1000,
        }
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl DefaultsSection {
    pub fn to_inputs(&self) -> EstimatorInputs {
        EstimatorInputs::new(
            self.missed_calls_per_month,
            self.average_treatment_value,
            self.hours_saved_per_week,
        )
    }
}

impl DisplaySection {
    pub fn counter_duration(&self) -> Duration {
        Duration::from_millis(self.counter_duration_ms)
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_chairside_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    let cfg: Config = toml::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
    cfg.defaults
        .to_inputs()
        .validate()
        .with_context(|| format!("invalid [defaults] in {}", p.display()))?;
    Ok(cfg)
}

pub fn save_config(p: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&p, &Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.defaults.to_inputs(), EstimatorInputs::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.defaults.missed_calls_per_month = 120;
        cfg.display.counter_duration_ms = 250;
        save_config(&p, &cfg).unwrap();

        let loaded = load_config_from(&p).unwrap();
        assert_eq!(loaded, cfg);
        assert_eq!(loaded.display.counter_duration(), Duration::from_millis(250));
    }

    #[test]
    fn test_partial_file_fills_sections() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        fs::write(&p, "[log]\nfilter = \"debug\"\n").unwrap();

        let cfg = load_config_from(&p).unwrap();
        assert_eq!(cfg.log.filter, "debug");
        assert_eq!(cfg.defaults, DefaultsSection::default());
    }

    #[test]
    fn test_out_of_range_defaults_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        fs::write(
            &p,
            "[defaults]\nmissed_calls_per_month = 500\naverage_treatment_value = 200.0\nhours_saved_per_week = 20\n",
        )
        .unwrap();

        let err = load_config_from(&p).unwrap_err();
        assert!(format!("{:#}", err).contains("missed calls per month"));
    }
}
