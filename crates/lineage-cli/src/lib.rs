//! Lineage CLI library.
//!
//! This library provides the core functionality for the `lineage` command-line
//! interface, including configuration management, command execution, the JSON
//! export and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod output;

pub use cli::{Cli, Command};
pub use config::CliConfig;
pub use error::{CliError, Result};
pub use export::Export;
pub use output::Formatter;
