use anyhow::{Context, Result};
use chairside_core::{EstimatorInputs, EstimatorOutputs};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

pub fn chairside_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("CHAIRSIDE_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".chairside"))
}

pub fn ensure_chairside_home() -> Result<PathBuf> {
    let dir = chairside_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn history_path() -> Result<PathBuf> {
    Ok(ensure_chairside_home()?.join("estimates.jsonl"))
}

/// One saved estimate, one JSON object per line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EstimateRecord {
    pub recorded_at_utc: String,
    pub inputs: EstimatorInputs,
    pub outputs: EstimatorOutputs,
}

impl EstimateRecord {
    pub fn now(inputs: EstimatorInputs, outputs: EstimatorOutputs) -> Self {
        Self {
            recorded_at_utc: chrono::Utc::now().to_rfc3339(),
            inputs,
            outputs,
        }
    }
}

pub fn append_estimate(path: &Path, record: &EstimateRecord) -> Result<()> {
    let mut f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open {}", path.display()))?;
    let line = serde_json::to_string(record).context("serialize estimate")?;
    writeln!(f, "{}", line).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Most recent `limit` records, newest last. Unparseable lines are skipped.
pub fn read_estimates(path: &Path, limit: usize) -> Result<Vec<EstimateRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let f = fs::File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut out = Vec::new();
    for (idx, line) in BufReader::new(f).lines().enumerate() {
        let line = line.with_context(|| format!("read {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<EstimateRecord>(&line) {
            Ok(r) => out.push(r),
            Err(e) => tracing::warn!(line = idx + 1, error = %e, "skipping malformed estimate record"),
        }
    }
    let start = out.len().saturating_sub(limit);
    Ok(out.split_off(start))
}
