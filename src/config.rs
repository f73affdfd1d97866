//! Configuration management for pcstat.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use crate::cli::{Args, ConfigFormat, LogLevel};
use pcstat::OutputFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

// Default configuration constants
pub const DEFAULT_LOG_LEVEL: &str = "warn";

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Effective settings for one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    // Presentation
    pub format: Option<OutputFormat>,
    #[serde(alias = "no-header", alias = "nohdr")]
    pub no_header: Option<bool>,
    #[serde(alias = "bname")]
    pub basename: Option<bool>,
    pub sort: Option<bool>,
    /// Include the per-page bitmap (`pp_stat`) in JSON output
    #[serde(alias = "per-page-status", alias = "pps")]
    pub per_page_status: Option<bool>,
    /// Histogram width override; the terminal is queried when unset
    pub columns: Option<usize>,

    // Probing
    /// Threads for probing files (None/1 = sequential, 0 = auto)
    pub parallelism: Option<usize>,
    /// Abort when the mount namespace of --pid cannot be entered
    #[serde(alias = "require-namespace")]
    pub require_namespace: Option<bool>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: Some(OutputFormat::Text),
            no_header: Some(false),
            basename: Some(false),
            sort: Some(false),
            per_page_status: Some(false),
            columns: None,
            parallelism: None,
            require_namespace: Some(false),
            log_level: Some(DEFAULT_LOG_LEVEL.into()),
        }
    }
}

impl Config {
    pub fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }

    pub fn no_header(&self) -> bool {
        self.no_header.unwrap_or(false)
    }

    pub fn basename(&self) -> bool {
        self.basename.unwrap_or(false)
    }

    pub fn sort(&self) -> bool {
        self.sort.unwrap_or(false)
    }

    pub fn per_page_status(&self) -> bool {
        self.per_page_status.unwrap_or(false)
    }

    pub fn require_namespace(&self) -> bool {
        self.require_namespace.unwrap_or(false)
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

/// Validate effective config (used at startup and by `check`)
pub fn validate_effective_config(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if cfg.columns == Some(0) {
        return Err("columns must be greater than 0".into());
    }

    if let Some(level) = cfg.log_level.as_deref() {
        if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
            return Err(format!(
                "Invalid log_level '{}', expected one of: {}",
                level,
                LOG_LEVELS.join(", ")
            )
            .into());
        }
    }

    Ok(())
}

fn log_level_name(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Off => "off",
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    // Single-format flags win over --format, which wins over the file
    if let Some(format) = args.flag_format().or(args.format) {
        config.format = Some(format);
    }

    if args.nohdr {
        config.no_header = Some(true);
    }
    if args.bname {
        config.basename = Some(true);
    }
    if args.sort {
        config.sort = Some(true);
    }
    if args.pps {
        config.per_page_status = Some(true);
    }
    if let Some(width) = args.width {
        config.columns = Some(width);
    }
    if let Some(threads) = args.parallelism {
        config.parallelism = Some(threads);
    }
    if args.require_namespace {
        config.require_namespace = Some(true);
    }
    if let Some(level) = args.log_level {
        config.log_level = Some(log_level_name(level).into());
    }

    Ok(config)
}

/// Enhanced configuration loading with multiple format support
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let path = if let Some(p) = path {
        PathBuf::from(p)
    } else {
        // Try default locations
        let defaults = [
            "/etc/pcstat/pcstat.yaml",
            "/etc/pcstat/pcstat.yml",
            "/etc/pcstat/pcstat.json",
            "/etc/pcstat/pcstat.toml",
            "./pcstat.yaml",
            "./pcstat.yml",
            "./pcstat.json",
            "./pcstat.toml",
        ];

        defaults
            .iter()
            .find(|p| Path::new(p).exists())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(""))
    };

    if path.to_string_lossy().is_empty() || !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)?;

    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => {
            let config: Config = serde_json::from_str(&content)?;
            info!("Loaded JSON configuration from: {}", path.display());
            Ok(config)
        }
        Some("toml") => {
            let config: Config = toml::from_str(&content)?;
            info!("Loaded TOML configuration from: {}", path.display());
            Ok(config)
        }
        _ => {
            // Default to YAML
            let config: Config = serde_yaml::from_str(&content)?;
            info!("Loaded YAML configuration from: {}", path.display());
            Ok(config)
        }
    }
}

/// Renders configuration in the requested format
pub fn config_to_string(
    config: &Config,
    format: &ConfigFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    Ok(match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    })
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", config_to_string(config, &format)?);
    Ok(())
}
