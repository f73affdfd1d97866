//! CLI command implementations for pcstat.
//!
//! This module provides implementations for the main flow and subcommands:
//! - `stat`: probe files (and a process's mapped files) and print the reports
//! - `check`: runtime requirement validation
//! - `config`: configuration file generation

pub mod check;
pub mod config;
pub mod stat;

// Re-export command functions
pub use check::command_check;
pub use config::command_config;
pub use stat::command_stat;
