use anyhow::{Context, Result, bail};
use chairside_core::{
    EstimatorInputs, EstimatorOutputs, OutputSummary, assess_investment, evaluate,
};
use chairside_estimator::{RevealPhase, RevealSequencer, RevealSnapshot};
use clap::{Parser, Subcommand};
use tokio::sync::watch;

mod config;
mod logging;
mod state;
mod tui;

#[derive(Parser, Debug)]
#[command(
    name = "chairside",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("CHAIRSIDE_BUILD_SHA"), ")"),
    about = "ROI estimator for dental practice call automation"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate annual impact, ROI and payback period
    Estimate {
        /// Missed calls per month (10-200)
        #[arg(long)]
        missed_calls: Option<u32>,

        /// Average treatment value per visit
        #[arg(long)]
        treatment_value: Option<f64>,

        /// Staff hours saved per week (5-40)
        #[arg(long)]
        hours_saved: Option<u32>,

        /// Skip the calculating delay
        #[arg(long, default_value_t = false)]
        instant: bool,

        /// Accept values outside the slider ranges
        #[arg(long, default_value_t = false)]
        unchecked: bool,

        /// Print JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Append the result to ~/.chairside/estimates.jsonl
        #[arg(long, default_value_t = false)]
        save: bool,
    },

    /// Recommend an investment level from monthly practice revenue
    Assess {
        /// Monthly revenue; defaults to 50,000 when omitted or zero
        #[arg(long)]
        monthly_revenue: Option<u64>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Interactive estimator (TTY required)
    Tui,

    /// List saved estimates
    History {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Manage ~/.chairside/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,
    /// Print the effective config
    Show,
    /// Print the config file location
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;

    // The TUI owns the terminal, so it logs to a file.
    let _log_guard = match cli.command {
        Command::Tui => Some(logging::init_file(
            &state::ensure_chairside_home()?,
            &cfg.log.filter,
        )),
        _ => {
            logging::init_stderr(&cfg.log.filter);
            None
        }
    };

    match cli.command {
        Command::Estimate {
            missed_calls,
            treatment_value,
            hours_saved,
            instant,
            unchecked,
            json,
            save,
        } => {
            let defaults = cfg.defaults.to_inputs();
            let inputs = EstimatorInputs::new(
                missed_calls.unwrap_or(defaults.missed_calls_per_month),
                treatment_value.unwrap_or(defaults.average_treatment_value),
                hours_saved.unwrap_or(defaults.hours_saved_per_week),
            );
            if !unchecked {
                inputs
                    .validate()
                    .context("input out of range (pass --unchecked to evaluate anyway)")?;
            }

            let outputs = if instant {
                evaluate(&inputs)
            } else {
                reveal(&inputs).await?
            };

            if json {
                let body = serde_json::json!({
                    "inputs": inputs,
                    "outputs": outputs,
                    "display": OutputSummary::from(&outputs),
                });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                print_impact(&inputs, &outputs);
            }

            if save {
                let p = state::history_path()?;
                state::append_estimate(&p, &state::EstimateRecord::now(inputs, outputs))?;
                tracing::info!(path = %p.display(), "estimate saved");
            }
        }

        Command::Assess {
            monthly_revenue,
            json,
        } => {
            let a = assess_investment(monthly_revenue);
            if json {
                println!("{}", serde_json::to_string_pretty(&a)?);
            } else {
                println!("Monthly revenue:             ${}", chairside_core::format_grouped(a.monthly_revenue as i64));
                println!("Projected annual increase:   ${}", chairside_core::format_grouped(a.annual_increase as i64));
                println!("Recommended package:         {}", a.tier.name());
                println!("                             {}", a.tier.target());
            }
        }

        Command::Tui => {
            let handle = tokio::runtime::Handle::current();
            tokio::task::block_in_place(|| tui::run_tui(&cfg, handle))?;
        }

        Command::History { limit } => {
            let p = state::history_path()?;
            let records = state::read_estimates(&p, limit)?;
            if records.is_empty() {
                println!("No saved estimates in {} (run: chairside estimate --save)", p.display());
            }
            for r in &records {
                let s = OutputSummary::from(&r.outputs);
                println!(
                    "{} | calls={} value=${:.2} hours={} | revenue={} savings={} roi={} payback={}",
                    r.recorded_at_utc,
                    r.inputs.missed_calls_per_month,
                    r.inputs.average_treatment_value,
                    r.inputs.hours_saved_per_week,
                    s.recovered_revenue,
                    s.staff_savings,
                    s.roi,
                    s.payback
                );
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
            ConfigCommand::Path => println!("{}", config::config_path()?.display()),
        },
    }

    Ok(())
}

/// Run one calculation through the sequencer and wait for the reveal.
async fn reveal(inputs: &EstimatorInputs) -> Result<EstimatorOutputs> {
    let mut seq = RevealSequencer::new();
    let rx = seq.subscribe();
    seq.trigger(inputs)?;
    eprintln!("Calculating...");

    // `seq` stays alive until the reveal lands; dropping it would cancel.
    wait_for_reveal(rx).await
}

async fn wait_for_reveal(mut rx: watch::Receiver<RevealSnapshot>) -> Result<EstimatorOutputs> {
    loop {
        rx.changed().await.context("estimator closed before reveal")?;
        let snap = rx.borrow_and_update().clone();
        if snap.phase == RevealPhase::Revealed {
            match snap.outputs {
                Some(out) => return Ok(out),
                None => bail!("revealed without outputs"),
            }
        }
    }
}

fn print_impact(inputs: &EstimatorInputs, outputs: &EstimatorOutputs) {
    let s = OutputSummary::from(outputs);
    println!("# Your Potential Annual Impact\n");
    println!(
        "Inputs: {} missed calls/month, ${:.2} per treatment, {}h saved/week\n",
        inputs.missed_calls_per_month, inputs.average_treatment_value, inputs.hours_saved_per_week
    );
    println!("{:<22} {:>14}   {}", "Recovered Revenue", s.recovered_revenue, "From missed calls");
    println!("{:<22} {:>14}   {}", "Staff Cost Savings", s.staff_savings, "Annually saved");
    println!("{:<22} {:>14}   {}", "Return on Investment", s.roi, "First year ROI");
    println!("{:<22} {:>14}   {}", "Break Even", s.payback, "Months to profit");
}
