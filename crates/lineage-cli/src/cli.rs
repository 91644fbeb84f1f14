//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Lineage CLI - Extract report lineage from exported BI documentation.
#[derive(Debug, Parser)]
#[command(name = "lineage")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Summary tables and status lines (default)
    Text,
    /// JSON on stdout
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract reports and export their lineage graph
    Extract(ExtractArgs),

    /// List the reports documented in a corpus
    List(ListArgs),

    /// Warm the parse cache and print its counters
    CacheStats(CacheStatsArgs),

    /// Show or initialize the configuration file
    Config(ConfigArgs),
}

/// Options locating and reading a corpus.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CorpusArgs {
    /// Directory holding the exported HTML documentation
    #[arg(short, long, env = "LINEAGE_BASE_PATH")]
    pub base_path: Option<PathBuf>,

    /// Documentation language (pt-BR, en-US)
    #[arg(short, long)]
    pub locale: Option<String>,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Extract the reports with this exact name
    #[arg(short, long)]
    pub report: Option<String>,

    /// Extract the report with this id (takes precedence over --report)
    #[arg(long)]
    pub report_id: Option<String>,

    /// Extract reports whose name contains this text (case-insensitive)
    #[arg(long)]
    pub filter: Option<String>,

    /// Number of extraction workers
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Extract on the calling thread with a single builder
    #[arg(long)]
    pub sequential: bool,

    /// Parse every document before extracting
    #[arg(long)]
    pub preload_all: bool,

    /// JSON file to write
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Check the extracted graphs and print warnings
    #[arg(long)]
    pub validate: bool,
}

/// Arguments for the list command.
#[derive(Debug, Parser)]
pub struct ListArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Only list reports whose name contains this text
    #[arg(long)]
    pub filter: Option<String>,
}

/// Arguments for the cache-stats command.
#[derive(Debug, Parser)]
pub struct CacheStatsArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Parse every document, not only the indexes
    #[arg(long)]
    pub all: bool,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Text => crate::config::OutputFormat::Text,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}
