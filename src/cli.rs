//! CLI arguments for fpid.
//!
//! This module defines the command-line interface structure using the clap library.

use clap::{Parser, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;

/// `--version` output including build metadata emitted by build.rs.
const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (git ",
    env!("VERGEN_GIT_SHA"),
    ", built ",
    env!("VERGEN_BUILD_TIMESTAMP"),
    ")"
);

/// Log level options for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Case-insensitive parse of a config file value.
    pub fn parse(s: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(s, true).ok()
    }
}

/// Configuration format options for output
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "fpid",
    about = "Find the PIDs of running processes by program name or executable path",
    long_about = "Find the PIDs of running processes by program name or executable path.\n\n\
                  A query containing '/' is compared with the resolved executable of every \
                  process (/proc/<pid>/exe). Any other query is compared with the basename of \
                  the name the process was started as (argv[0] from /proc/<pid>/cmdline). \
                  Matching is exact. Exits 0 if at least one process matched, 1 otherwise.",
    version,
    long_version = LONG_VERSION
)]
pub struct Args {
    /// Program name or absolute path to search for
    #[arg(required_unless_present_any = ["show_config", "check_config", "check_system"])]
    pub query: Option<OsString>,

    /// Quiet mode: suppress output, exit 0 if found
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Single shot: exit after first match
    #[arg(short = 's', long)]
    pub single_shot: bool,

    /// Process table root
    #[arg(long, value_name = "DIR")]
    pub proc_root: Option<PathBuf>,

    /// Log level (written to stderr)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,

    /// Check process table access and permissions, then exit
    #[arg(long)]
    pub check_system: bool,
}
