//! Logger setup for scanner_app.
//!
//! The destination and log file path come from [`crate::config::AppConfig`].

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

pub const DEFAULT_LOG_FILE: &str = "scanner.log";

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogDestination {
    /// Write to the configured log file (truncated on start).
    #[default]
    File,
    /// Write to the terminal (stderr for warnings and errors).
    Terminal,
    Both,
}

impl LogDestination {
    fn writes_file(self) -> bool {
        matches!(self, LogDestination::File | LogDestination::Both)
    }

    fn writes_terminal(self) -> bool {
        matches!(self, LogDestination::Terminal | LogDestination::Both)
    }
}

pub fn initialize(destination: LogDestination, log_file: &Path) {
    let loggers = build_loggers(destination, log_file, scan_logging::default_level());
    if loggers.is_empty() {
        return;
    }
    let _ = CombinedLogger::init(loggers);
}

fn build_loggers(
    destination: LogDestination,
    log_file: &Path,
    level: LevelFilter,
) -> Vec<Box<dyn SharedLogger>> {
    let config = scan_log_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if destination.writes_terminal() {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }
    if destination.writes_file() {
        match File::create(log_file) {
            Ok(file) => loggers.push(WriteLogger::new(level, config, file)),
            // Scans still run without a log file.
            Err(err) => eprintln!("Warning: cannot write log file {}: {err}", log_file.display()),
        }
    }
    loggers
}

fn scan_log_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .add_filter_ignore_str("hyper")
        .add_filter_ignore_str("reqwest")
        .build()
}
