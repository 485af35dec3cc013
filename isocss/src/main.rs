// isocss/src/main.rs
//! isocss entry point.
//!
//! Parses the command line, initialises logging and runs the isolate command.
//! `main` returns an exit code rather than calling `process::exit`, so the
//! run's scratch area is cleaned up on every path.

use clap::Parser;
use std::process::ExitCode;

use isocss::cli::Cli;
use isocss::commands::isolate::{error_msg, run_isolate};
use isocss::logger;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init_logger(cli.log_level());

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            error_msg(format!("Failed to read the current working directory: {}", e));
            return ExitCode::FAILURE;
        }
    };

    match run_isolate(&cli, &cwd).await {
        Ok(summary) if summary.is_success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            error_msg(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
