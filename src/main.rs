//! Gantt CLI - schedule derivation for dependency-driven project plans

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = gantt_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
