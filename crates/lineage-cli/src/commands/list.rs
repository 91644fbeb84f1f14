//! List command implementation.

use super::open_corpus;
use crate::cli::ListArgs;
use crate::config::CliConfig;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the list command.
pub async fn execute_list(args: ListArgs, config: &CliConfig, formatter: &Formatter) -> Result<()> {
    let corpus = open_corpus(&args.corpus, config, |_| {})?;

    let reports = match &args.filter {
        Some(text) => corpus.filter(text)?,
        None => corpus.reports()?,
    };

    println!("{}", formatter.format_report_refs(&reports)?);
    if !formatter.is_json() {
        println!(
            "{}",
            formatter.info(&format!("{} report(s) in {}", reports.len(), corpus.root().display()))
        );
    }

    Ok(())
}
