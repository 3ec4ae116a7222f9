//! Configuration management for fpid.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use crate::cli::{Args, ConfigFormat, LogLevel};
use fpid::DEFAULT_PROC_ROOT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Config file locations tried when no --config is given.
pub const DEFAULT_CONFIG_PATHS: [&str; 4] = [
    "/etc/fpid/fpid.yaml",
    "/etc/fpid/fpid.yml",
    "/etc/fpid/fpid.json",
    "/etc/fpid/fpid.toml",
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid TOML in {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{0}")]
    Invalid(String),
}

/// Effective configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Directory holding one entry per process
    #[serde(alias = "proc-root")]
    pub proc_root: Option<PathBuf>,

    // Output policy
    pub quiet: Option<bool>,
    #[serde(alias = "single-shot")]
    pub single_shot: Option<bool>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            proc_root: Some(PathBuf::from(DEFAULT_PROC_ROOT)),
            quiet: Some(false),
            single_shot: Some(false),
            log_level: Some(DEFAULT_LOG_LEVEL.into()),
        }
    }
}

impl Config {
    pub fn proc_root(&self) -> PathBuf {
        self.proc_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROC_ROOT))
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
            .as_deref()
            .and_then(LogLevel::parse)
            .unwrap_or(LogLevel::Warn)
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(root) = &cfg.proc_root {
        if root.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("proc_root must not be empty".into()));
        }
        if !root.is_absolute() {
            return Err(ConfigError::Invalid(format!(
                "proc_root must be an absolute path, got '{}'",
                root.display()
            )));
        }
    }

    if let Some(level) = cfg.log_level.as_deref() {
        if LogLevel::parse(level).is_none() {
            return Err(ConfigError::Invalid(format!(
                "Invalid log_level '{}', expected one of off, error, warn, info, debug, trace",
                level
            )));
        }
    }

    Ok(())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, ConfigError> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if let Some(root) = &args.proc_root {
        config.proc_root = Some(root.clone());
    }
    if args.quiet {
        config.quiet = Some(true);
    }
    if args.single_shot {
        config.single_shot = Some(true);
    }
    if let Some(level) = args.log_level {
        config.log_level = Some(level.as_str().to_string());
    }

    Ok(config)
}

/// Configuration loading with multiple format support.
///
/// An explicit path must exist; the default locations are optional.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match DEFAULT_CONFIG_PATHS.iter().find(|p| Path::new(p).exists()) {
            Some(p) => PathBuf::from(p),
            None => return Ok(Config::default()),
        },
    };

    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;

    let loaded: Config = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.clone(),
            source,
        })?,
        Some("toml") => toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.clone(),
            source,
        })?,
        _ => {
            // Default to YAML
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
                path: path.clone(),
                source,
            })?
        }
    };
    debug!("Loaded configuration from: {}", path.display());

    Ok(merge_with_defaults(loaded))
}

/// Fills fields left out of a config file with their defaults.
fn merge_with_defaults(loaded: Config) -> Config {
    let defaults = Config::default();
    Config {
        proc_root: loaded.proc_root.or(defaults.proc_root),
        quiet: loaded.quiet.or(defaults.quiet),
        single_shot: loaded.single_shot.or(defaults.single_shot),
        log_level: loaded.log_level.or(defaults.log_level),
    }
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> Result<(), Box<dyn std::error::Error>> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };

    println!("{output}");
    Ok(())
}
