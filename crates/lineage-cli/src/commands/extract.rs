//! Extract command implementation.

use super::open_corpus;
use crate::cli::ExtractArgs;
use crate::config::CliConfig;
use crate::error::{CliError, Result};
use crate::export::Export;
use crate::output::Formatter;
use lineage_domain::{ObjectId, ReportRef};
use lineage_extractor::{
    validate_reports, BatchExtractor, BatchOutcome, Corpus, ExtractorError,
};
use tracing::{info, warn};

/// Execute the extract command.
pub async fn execute_extract(
    args: ExtractArgs,
    config: &CliConfig,
    formatter: &Formatter,
) -> Result<()> {
    let corpus = open_corpus(&args.corpus, config, |settings| {
        if let Some(workers) = args.workers {
            settings.workers = workers;
        }
        if args.preload_all {
            settings.preload_all = true;
        }
    })?;

    let selected = select_reports(&corpus, &args)?;
    info!("Selected {} report(s) in {}", selected.len(), corpus.root().display());

    let outcome = extract_reports(corpus.clone(), selected, args.sequential).await?;
    info!("{}", outcome.metrics.summary());

    for line in formatter.failures(&outcome.failures) {
        status(formatter, &line);
    }
    if outcome.reports.is_empty() {
        return Err(CliError::NoReports);
    }

    if args.validate {
        for line in formatter.validation(&validate_reports(&outcome.reports)) {
            status(formatter, &line);
        }
    }

    let export = Export::new(&outcome.reports, &corpus.root().display().to_string());
    let destination = args.output.or_else(|| config.output.path.clone());

    match &destination {
        Some(path) => {
            export.write(path, config.output.pretty)?;
            info!("JSON export written to {}", path.display());
        }
        None if formatter.is_json() => {
            println!("{}", export.to_json(config.output.pretty)?);
        }
        None => warn!("No output file given; use --output to write the JSON export"),
    }

    if !formatter.is_json() {
        println!("{}", formatter.format_reports(&outcome.reports)?);
        println!(
            "{}",
            formatter.info(&format!(
                "{} report(s) extracted, {} failed, {} diagnostic(s)",
                outcome.reports.len(),
                outcome.failures.len(),
                outcome.metrics.total_diagnostics()
            ))
        );
        if let Some(path) = &destination {
            println!("{}", formatter.success(&format!("Exported to {}", path.display())));
        }
    } else if destination.is_some() {
        println!("{}", formatter.format_reports(&outcome.reports)?);
    }

    Ok(())
}

/// Pick the reports to extract.
///
/// An id takes precedence over a name, and a name over a filter. With none
/// of them every report in the document index is selected. Selections that
/// match nothing are errors.
pub fn select_reports(corpus: &Corpus, args: &ExtractArgs) -> Result<Vec<ReportRef>> {
    if let Some(raw) = &args.report_id {
        let id = ObjectId::parse(raw).map_err(CliError::InvalidArgument)?;
        return match corpus.find_by_id(&id)? {
            Some(report) => Ok(vec![report]),
            None => Err(ExtractorError::ReportNotFound(raw.clone()).into()),
        };
    }

    let (selected, wanted) = if let Some(name) = &args.report {
        (corpus.find_by_name(name)?, name.clone())
    } else if let Some(text) = &args.filter {
        let matching = corpus.filter(text)?;
        info!("{} report(s) match filter '{}'", matching.len(), text);
        (matching, format!("filter '{}'", text))
    } else {
        (corpus.reports()?, "any report".to_string())
    };

    if selected.is_empty() {
        return Err(ExtractorError::ReportNotFound(wanted).into());
    }
    Ok(selected)
}

/// Run extraction over `reports`, ordered by report id.
///
/// Single-report runs use one builder on a blocking thread.
pub async fn extract_reports(
    corpus: Corpus,
    reports: Vec<ReportRef>,
    sequential: bool,
) -> Result<BatchOutcome> {
    let extractor = BatchExtractor::new(corpus);
    let outcome = if sequential || reports.len() <= 1 {
        tokio::task::spawn_blocking(move || extractor.run_sequential(reports))
            .await
            .map_err(|e| ExtractorError::Worker(e.to_string()))?
    } else {
        extractor.run(reports).await?
    };
    Ok(outcome.sorted())
}

/// Status lines go to stderr when stdout carries JSON.
fn status(formatter: &Formatter, line: &str) {
    if formatter.is_json() {
        eprintln!("{}", line);
    } else {
        println!("{}", line);
    }
}
