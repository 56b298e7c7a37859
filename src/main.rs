//! Placement CLI - order items by insertBefore/insertAfter hints

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = placement_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
