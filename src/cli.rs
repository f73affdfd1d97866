//! CLI arguments and subcommands for pcstat.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use once_cell::sync::Lazy;
use pcstat::OutputFormat;
use std::path::PathBuf;

/// Version string with git SHA and build timestamp (from vergen).
pub static LONG_VERSION: Lazy<String> = Lazy::new(|| {
    format!(
        "{} ({} {})",
        env!("CARGO_PKG_VERSION"),
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown"),
        option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown"),
    )
});

/// Log level options for CLI parsing
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "pcstat",
    about = "Page cache stat: how much of each file sits in the page cache",
    long_about = "Page cache stat: how much of each file sits in the page cache.\n\n\
                  Maps each file read-only and asks the kernel (mincore) which pages are \
                  resident, without faulting any page in. With --pid, the files mapped by \
                  a running process are inspected, entering its mount namespace if needed.",
    version,
    long_version = LONG_VERSION.as_str()
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Files to inspect
    #[arg(value_name = "FILE")]
    pub files: Vec<String>,

    /// Show all open maps for the given pid
    #[arg(long)]
    pub pid: Option<u32>,

    /// Show terse output
    #[arg(long)]
    pub terse: bool,

    /// Omit the header from terse & text output
    #[arg(long)]
    pub nohdr: bool,

    /// Return data in JSON format
    #[arg(long)]
    pub json: bool,

    /// Return data with unicode box characters
    #[arg(long)]
    pub unicode: bool,

    /// Return data with no box characters
    #[arg(long)]
    pub plain: bool,

    /// Include the per-page status in JSON output
    #[arg(long)]
    pub pps: bool,

    /// Print a simple histogram instead of raw data
    #[arg(long)]
    pub histo: bool,

    /// Convert paths to basename to narrow the output
    #[arg(long)]
    pub bname: bool,

    /// Sort output by cached pages desc
    #[arg(long)]
    pub sort: bool,

    /// Output format (the single-format flags above take precedence)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Terminal width for --histo instead of querying the terminal
    #[arg(long, value_name = "COLUMNS")]
    pub width: Option<usize>,

    /// Probe files on N threads (0 = auto, default sequential)
    #[arg(long)]
    pub parallelism: Option<usize>,

    /// Fail instead of continuing when the mount namespace of --pid cannot be entered
    #[arg(long)]
    pub require_namespace: bool,

    /// Log level (logs go to stderr)
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
}

impl Args {
    /// Output format requested by the single-format flags, in their
    /// historical precedence: json > terse > histo > unicode > plain.
    pub fn flag_format(&self) -> Option<OutputFormat> {
        if self.json {
            Some(OutputFormat::Json)
        } else if self.terse {
            Some(OutputFormat::Terse)
        } else if self.histo {
            Some(OutputFormat::Histogram)
        } else if self.unicode {
            Some(OutputFormat::Unicode)
        } else if self.plain {
            Some(OutputFormat::Plain)
        } else {
            None
        }
    }
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check runtime requirements (mincore, /proc access, namespace privileges)
    Check {
        /// Also check that this pid's maps and mount namespace are accessible
        #[arg(long)]
        pid: Option<u32>,
    },

    /// Generate a configuration file
    Config {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,

        /// Include comments and examples
        #[arg(long)]
        commented: bool,
    },
}
