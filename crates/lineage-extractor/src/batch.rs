//! Batch orchestrator - extracts many reports on a fixed worker pool
//!
//! Each worker owns one extractor for its whole lifetime, so memoized
//! definitions are reused across every report that worker handles. Workers
//! pull from a shared queue and share the corpus parse cache; nothing else
//! is shared.

use crate::builder::GraphBuilder;
use crate::corpus::Corpus;
use crate::error::{ExtractorError, Result};
use crate::metrics::ExtractionMetrics;
use crate::types::{BatchOutcome, ReportFailure};
use lineage_domain::traits::ReportExtractor;
use lineage_domain::{Report, ReportRef};
use parking_lot::Mutex;
use std::any::Any;
use std::collections::VecDeque;
use std::fmt::Display;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

/// An extractor the batch can drive
pub trait BatchWorker: ReportExtractor {
    /// Give up the worker, keeping the counters it collected
    fn into_metrics(self) -> ExtractionMetrics;
}

impl BatchWorker for GraphBuilder {
    fn into_metrics(self) -> ExtractionMetrics {
        GraphBuilder::into_metrics(self)
    }
}

#[derive(Default)]
struct WorkerOutput {
    reports: Vec<Report>,
    failures: Vec<ReportFailure>,
    metrics: ExtractionMetrics,
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {}", message)
    } else {
        "panicked".to_string()
    }
}

/// Extract every report `next` yields with one worker
fn drain<W>(mut worker: W, mut next: impl FnMut() -> Option<ReportRef>) -> WorkerOutput
where
    W: BatchWorker,
    W::Error: Display,
{
    let mut output = WorkerOutput::default();
    while let Some(reference) = next() {
        let result = catch_unwind(AssertUnwindSafe(|| worker.extract_report(&reference)));
        let reason = match result {
            Ok(Ok(report)) => {
                debug!(
                    "Extracted report {} ({} datasets)",
                    report.name,
                    report.datasets.len()
                );
                output.reports.push(report);
                continue;
            }
            Ok(Err(e)) => e.to_string(),
            Err(payload) => panic_message(payload),
        };
        error!("Report {} failed: {}", reference.name, reason);
        output.failures.push(ReportFailure {
            report: reference,
            reason,
        });
    }
    output.metrics = worker.into_metrics();
    output
}

/// Runs extraction over a list of reports
#[derive(Debug, Clone)]
pub struct BatchExtractor {
    corpus: Corpus,
    workers: usize,
}

impl BatchExtractor {
    /// Create an orchestrator using the corpus's configured pool size
    pub fn new(corpus: Corpus) -> Self {
        let workers = corpus.config().workers.max(1);
        Self { corpus, workers }
    }

    /// Override the pool size
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Pool size
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// The corpus being extracted
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    fn warm(corpus: &Corpus) {
        corpus.warm_indexes();
        if corpus.config().preload_all {
            corpus.warm_all();
        }
    }

    /// Extract `reports` on the worker pool with one [`GraphBuilder`] per
    /// worker
    pub async fn run(&self, reports: Vec<ReportRef>) -> Result<BatchOutcome> {
        let corpus = self.corpus.clone();
        self.run_with(reports, move || GraphBuilder::new(corpus.clone()))
            .await
    }

    /// Extract `reports` on the worker pool with extractors from `factory`
    ///
    /// Failed or panicking reports are logged and reported as failures;
    /// they never stop the run.
    pub async fn run_with<W, F>(&self, reports: Vec<ReportRef>, factory: F) -> Result<BatchOutcome>
    where
        W: BatchWorker + 'static,
        W::Error: Display,
        F: Fn() -> W + Send + Sync + 'static,
    {
        let total = reports.len();
        let corpus = self.corpus.clone();
        tokio::task::spawn_blocking(move || Self::warm(&corpus))
            .await
            .map_err(|e| ExtractorError::Worker(e.to_string()))?;

        let pool = self.workers.min(total).max(1);
        info!("Extracting {} reports with {} workers", total, pool);

        let queue = Arc::new(Mutex::new(VecDeque::from(reports)));
        let factory = Arc::new(factory);
        let mut set = JoinSet::new();
        for _ in 0..pool {
            let queue = Arc::clone(&queue);
            let factory = Arc::clone(&factory);
            set.spawn_blocking(move || drain((*factory)(), || queue.lock().pop_front()));
        }

        let mut outcome = BatchOutcome::default();
        while let Some(joined) = set.join_next().await {
            let output = joined.map_err(|e| ExtractorError::Worker(e.to_string()))?;
            Self::collect(&mut outcome, output);
        }
        outcome.cache = self.corpus.cache().stats();

        info!(
            "Extracted {}/{} reports ({} failed)",
            outcome.reports.len(),
            total,
            outcome.failures.len()
        );
        Ok(outcome)
    }

    /// Extract `reports` on the calling thread with a single [`GraphBuilder`]
    pub fn run_sequential(&self, reports: Vec<ReportRef>) -> BatchOutcome {
        self.run_sequential_with(reports, GraphBuilder::new(self.corpus.clone()))
    }

    /// Extract `reports` on the calling thread with the given extractor
    pub fn run_sequential_with<W>(&self, reports: Vec<ReportRef>, worker: W) -> BatchOutcome
    where
        W: BatchWorker,
        W::Error: Display,
    {
        Self::warm(&self.corpus);
        info!("Extracting {} reports sequentially", reports.len());

        let mut queue = reports.into_iter();
        let mut outcome = BatchOutcome::default();
        Self::collect(&mut outcome, drain(worker, || queue.next()));
        outcome.cache = self.corpus.cache().stats();
        outcome
    }

    fn collect(outcome: &mut BatchOutcome, output: WorkerOutput) {
        outcome.metrics.merge(&output.metrics);
        for _ in &output.failures {
            outcome.metrics.record_failure();
        }
        outcome.reports.extend(output.reports);
        outcome.failures.extend(output.failures);
    }
}
