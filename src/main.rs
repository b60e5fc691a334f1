//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `cloud_takeover` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Exit code policy
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use cloud_takeover::initialization::init_logger_with;
use cloud_takeover::{evaluate_exit_code, run_scan, Opt};

#[tokio::main]
async fn main() -> Result<()> {
    // .env may carry SLACK_TOKEN / CHANNEL_ID; try the working directory, then the executable's
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let config = Opt::parse().into_config();

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    let fail_on = config.fail_on.clone();
    match run_scan(config).await {
        Ok(report) => {
            println!(
                "Scanned {} account{} of the {} organization: {} dangling record{}, {} failed account{} in {:.1}s",
                report.accounts_scanned,
                if report.accounts_scanned == 1 { "" } else { "s" },
                report.provider,
                report.findings.len(),
                if report.findings.len() == 1 { "" } else { "s" },
                report.errors.len(),
                if report.errors.len() == 1 { "" } else { "s" },
                report.elapsed_seconds
            );
            process::exit(evaluate_exit_code(&fail_on, &report));
        }
        Err(e) => {
            eprintln!("cloud_takeover error: {:#}", e);
            process::exit(1);
        }
    }
}
