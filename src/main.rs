//! This file defines the volume-explorer binary entry point.

use std::process::ExitCode;

use volume_explorer::app;
use volume_explorer::cli;
use volume_explorer::error::{ErrorReport, ExplorerError};
use volume_explorer::tracing;

/// Report `error` on stderr and return its exit code.
fn report(error: ExplorerError) -> ExitCode {
    let report = ErrorReport::from(&error);
    match serde_json::to_string_pretty(&report) {
        Ok(json) => eprintln!("{}", json),
        Err(_) => eprintln!("{}", report.message),
    }
    ExitCode::from(error.exit_code() as u8)
}

/// Application entry point
fn main() -> ExitCode {
    let args = cli::parse();
    tracing::init_tracing();
    let summary = match app::run(&args) {
        Ok(summary) => summary,
        Err(error) => return report(error),
    };
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(error) => report(error.into()),
    }
}
