//! fpid - find process IDs by program name or executable path.
//!
//! Entry point: parses arguments, resolves configuration, sets up logging and
//! maps the scan outcome to the process exit status.

mod cli;
mod commands;
mod config;

use clap::Parser;
use fpid::{Matcher, Query, RunError, ScanOptions};
use std::ffi::OsStr;
use std::io::{self, ErrorKind};
use std::process::ExitCode;
use tracing::{debug, Level};

use cli::{Args, LogLevel};
use commands::command_check;
use config::{resolve_config, show_config, validate_effective_config, Config};

/// Initializes tracing on stderr so stdout carries only PIDs.
fn setup_logging(config: &Config) {
    let log_level = match config.log_level() {
        LogLevel::Off => return,
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return;
    }

    debug!("Logging initialized with level: {:?}", log_level);
}

/// Scans for the query and maps the outcome to an exit status.
fn run_scan(query: &OsStr, config: &Config) -> ExitCode {
    let options = ScanOptions {
        quiet: config.quiet.unwrap_or(false),
        single_shot: config.single_shot.unwrap_or(false),
    };
    let matcher = Matcher::new(config.proc_root(), Query::new(query));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match matcher.run(&options, &mut out) {
        Ok(outcome) if outcome.found() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(RunError::Scan(e)) => {
            // Exactly one plain diagnostic line on stderr
            debug!("Cannot enumerate processes: {:?}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
        // Output is only written for a match, so the reader going away
        // still means the process exists.
        Err(RunError::Output(e)) if e.kind() == ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(RunError::Output(e)) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application entry point.
fn main() -> ExitCode {
    let args = Args::parse();

    let config = match resolve_config(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        return ExitCode::FAILURE;
    }

    if args.check_config {
        println!("✅ Configuration is valid");
        return ExitCode::SUCCESS;
    }

    if args.show_config {
        return match show_config(&config, args.config_format) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("❌ {}", e);
                ExitCode::FAILURE
            }
        };
    }

    setup_logging(&config);

    if args.check_system {
        return if command_check(&config) {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    match args.query.as_deref() {
        Some(query) => run_scan(query, &config),
        None => {
            // clap enforces the query outside the modes handled above
            eprintln!("Error: Missing program name or path");
            ExitCode::from(2)
        }
    }
}
