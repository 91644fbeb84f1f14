//! Command implementations.

pub mod cache_stats;
pub mod config;
pub mod extract;
pub mod list;

pub use self::cache_stats::execute_cache_stats;
pub use self::config::execute_config;
pub use self::extract::{execute_extract, extract_reports, select_reports};
pub use self::list::execute_list;

use crate::cli::CorpusArgs;
use crate::config::CliConfig;
use crate::error::{CliError, Result};
use lineage_extractor::{Corpus, ExtractorConfig};
use std::path::PathBuf;

/// Resolve the corpus root: the command line wins over the config file.
pub fn base_path(args: &CorpusArgs, config: &CliConfig) -> Result<PathBuf> {
    args.base_path
        .clone()
        .or_else(|| config.base_path.clone())
        .ok_or_else(|| {
            CliError::InvalidArgument(
                "No corpus given; pass --base-path or set base_path in the config file".into(),
            )
        })
}

/// Open the corpus named by the arguments, applying command-line overrides
/// to the configured extraction settings.
pub fn open_corpus(
    args: &CorpusArgs,
    config: &CliConfig,
    tune: impl FnOnce(&mut ExtractorConfig),
) -> Result<Corpus> {
    let root = base_path(args, config)?;
    let mut settings = config.extractor.clone();
    if let Some(locale) = &args.locale {
        settings.locale = locale.clone();
    }
    tune(&mut settings);
    Ok(Corpus::open(root, settings)?)
}
