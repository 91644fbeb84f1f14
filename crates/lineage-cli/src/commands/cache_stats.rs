//! Cache statistics command implementation.

use super::open_corpus;
use crate::cli::CacheStatsArgs;
use crate::config::CliConfig;
use crate::error::Result;
use crate::output::Formatter;
use lineage_document::CacheStats;
use lineage_extractor::Corpus;

/// Execute the cache-stats command.
pub async fn execute_cache_stats(
    args: CacheStatsArgs,
    config: &CliConfig,
    formatter: &Formatter,
) -> Result<()> {
    let corpus = open_corpus(&args.corpus, config, |_| {})?;
    let all = args.all || corpus.config().preload_all;

    let (warmed, stats) = tokio::task::spawn_blocking(move || warm(&corpus, all))
        .await
        .map_err(|e| lineage_extractor::ExtractorError::Worker(e.to_string()))?;

    println!("{}", formatter.format_cache_stats(&stats, warmed)?);
    Ok(())
}

/// Parse the indexes (and with `all`, every page) and report the counters.
pub fn warm(corpus: &Corpus, all: bool) -> (usize, CacheStats) {
    let mut warmed = corpus.warm_indexes();
    if all {
        warmed += corpus.warm_all();
    }
    (warmed, corpus.cache().stats())
}
