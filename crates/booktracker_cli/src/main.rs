//! Demo driver for booktracker core.
//!
//! # Responsibility
//! - Open one store session from `BOOKTRACKER_*` settings.
//! - Seed sample rows and run the scripted lending showcase.

mod showcase;

use booktracker_core::{init_logging, AppConfig};
use log::error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    // Logging is optional for the demo; failures only lose the log file.
    if let Err(err) = init_logging(config.log_level, &config.log_dir) {
        eprintln!("logging disabled: {err}");
    }

    let mut session = match config.open_session() {
        Ok(session) => session,
        Err(err) => {
            error!("event=cli_start module=cli status=error error={err}");
            eprintln!("failed to open database: {err}");
            return ExitCode::FAILURE;
        }
    };

    showcase::preload_data(&mut session);
    showcase::run(&mut session);
    ExitCode::SUCCESS
}
