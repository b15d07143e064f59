use std::env;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use scan_logging::{scan_info, scan_warn};
use scanner_core::ScanKind;
use scanner_engine::{EngineEvent, EngineHandle, ScanOutcome};

use crate::{config, logging, render};

const USAGE: &str = "usage: scanner_app url <URL> | scanner_app text <TEXT...>\n\
                     interactive commands: url <URL>, text <TEXT>, help, quit";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Scan { kind: ScanKind, raw: String },
    Help,
    Quit,
    Unknown(String),
}

pub fn run() -> anyhow::Result<ExitCode> {
    let loaded = config::load_default().context("loading configuration")?;
    let config = loaded.config;
    logging::initialize(config.log_destination, &config.log_file);
    scan_info!("Configuration: {}", loaded.source);

    let settings = config.transport_settings()?;
    // Text scans may issue a fallback request, so allow two request timeouts.
    let wait_limit = settings.request_timeout * 2 + Duration::from_secs(5);
    scan_info!("Detection service at {}", settings.base_url);
    let engine = EngineHandle::new(settings)?;

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        run_interactive(&engine, wait_limit)?;
        return Ok(ExitCode::SUCCESS);
    }

    match parse_command(&args.join(" ")) {
        Command::Scan { kind, raw } => match run_scan(&engine, kind, raw, wait_limit)? {
            ScanOutcome::Succeeded => Ok(ExitCode::SUCCESS),
            ScanOutcome::Failed | ScanOutcome::Rejected => Ok(ExitCode::FAILURE),
        },
        Command::Help | Command::Quit => {
            println!("{USAGE}");
            Ok(ExitCode::SUCCESS)
        }
        Command::Unknown(word) => {
            eprintln!("unknown command {word:?}\n{USAGE}");
            Ok(ExitCode::from(2))
        }
    }
}

fn run_interactive(engine: &EngineHandle, wait_limit: Duration) -> anyhow::Result<()> {
    println!("{USAGE}");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            return Ok(());
        };
        match parse_command(&line?) {
            Command::Scan { kind, raw } => {
                run_scan(engine, kind, raw, wait_limit)?;
            }
            Command::Help => println!("{USAGE}"),
            Command::Quit => return Ok(()),
            Command::Unknown(word) if word.is_empty() => {}
            Command::Unknown(word) => println!("unknown command {word:?}"),
        }
    }
}

/// Submit one scan and print every snapshot until it resolves.
fn run_scan(
    engine: &EngineHandle,
    kind: ScanKind,
    raw: String,
    wait_limit: Duration,
) -> anyhow::Result<ScanOutcome> {
    engine.submit(kind, raw);

    let deadline = Instant::now() + wait_limit;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            bail!("no answer from the scan engine within {:?}", wait_limit);
        }
        match engine.recv_timeout(remaining) {
            Some(EngineEvent::StateChanged(view)) => {
                for line in render::render(&view) {
                    println!("{line}");
                }
            }
            Some(EngineEvent::ScanFinished { kind, outcome }) => {
                if outcome == ScanOutcome::Rejected {
                    scan_warn!("{} scan rejected while another scan was in flight", kind);
                }
                return Ok(outcome);
            }
            None => {}
        }
    }
}

fn parse_command(line: &str) -> Command {
    let line = line.trim_start();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    match word.to_ascii_lowercase().as_str() {
        "url" => Command::Scan {
            kind: ScanKind::UrlScan,
            raw: rest.to_string(),
        },
        "text" => Command::Scan {
            kind: ScanKind::TextScan,
            raw: rest.to_string(),
        },
        "help" | "-h" | "--help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(word.to_string()),
    }
}
