//! Walker, workers and aggregator wired together over bounded queues.
//!
//! ```text
//!   walker (blocking thread) --jobs--> N workers --outcomes--> aggregator
//! ```
//!
//! Both queues are bounded, so a slow search engine throttles the walker
//! instead of letting file contents pile up in memory. The outcome queue
//! closes once every worker has dropped its sender, which is what ends the
//! aggregation loop.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::ingest::job::{IngestJob, IngestOutcome};
use crate::ingest::stats::{Aggregator, IngestProgress, IngestSummary};
use crate::ingest::walker::{self, WalkOptions};
use crate::parser::parse_email;
use crate::sink::DocumentSink;

/// Tuning knobs of one ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOptions {
    /// Worker tasks to start (0 = number of CPUs).
    pub workers: usize,
    pub job_queue_capacity: usize,
    pub result_queue_capacity: usize,
    /// Index the records are submitted to.
    pub collection: String,
    /// Log a progress line every this many indexed records (0 = never).
    pub progress_every: u64,
    /// Forward empty files to the workers instead of dropping them.
    pub report_empty: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl IngestOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            workers: config.ingest.workers,
            job_queue_capacity: config.ingest.job_queue_capacity,
            result_queue_capacity: config.ingest.result_queue_capacity,
            collection: config.engine.index.clone(),
            progress_every: config.ingest.progress_every,
            report_empty: config.ingest.report_empty_files,
        }
    }

    /// Number of workers actually started. Always at least one.
    pub fn worker_count(&self) -> usize {
        if self.workers > 0 {
            self.workers
        } else {
            num_cpus::get().max(1)
        }
    }
}

pub struct IngestPipeline {
    sink: Arc<dyn DocumentSink>,
    options: IngestOptions,
}

impl IngestPipeline {
    pub fn new(sink: Arc<dyn DocumentSink>, options: IngestOptions) -> Self {
        Self { sink, options }
    }

    /// Ingest every email under `root`.
    ///
    /// Fails only if `root` cannot be walked at all. Per-file problems are
    /// counted in the returned summary.
    pub async fn run(&self, root: &Path) -> Result<IngestSummary> {
        self.run_with_progress(root, None).await
    }

    /// Like [`run`](Self::run), calling `progress` after every consumed result.
    pub async fn run_with_progress(
        &self,
        root: &Path,
        progress: Option<&(dyn Fn(&IngestProgress) + Send + Sync)>,
    ) -> Result<IngestSummary> {
        walker::validate_root(root)?;

        let start = Instant::now();
        let workers = self.options.worker_count();
        info!(root = %root.display(), workers, "Starting ingestion");

        let (job_tx, job_rx) = mpsc::channel::<IngestJob>(self.options.job_queue_capacity.max(1));
        let (result_tx, mut result_rx) =
            mpsc::channel::<IngestOutcome>(self.options.result_queue_capacity.max(1));

        let walk_root = root.to_path_buf();
        let walk_options = WalkOptions {
            report_empty: self.options.report_empty,
        };
        let producer = tokio::task::spawn_blocking(move || {
            walker::walk(&walk_root, walk_options, &mut |job| {
                job_tx.blocking_send(job).is_ok()
            })
        });

        let job_rx = Arc::new(Mutex::new(job_rx));
        let mut handles = Vec::with_capacity(workers);
        for id in 0..workers {
            let jobs = Arc::clone(&job_rx);
            let results = result_tx.clone();
            let sink = Arc::clone(&self.sink);
            let collection = self.options.collection.clone();
            handles.push(tokio::spawn(async move {
                loop {
                    let job = jobs.lock().await.recv().await;
                    let Some(job) = job else { break };
                    let outcome = process_job(sink.as_ref(), &collection, job).await;
                    if results.send(outcome).await.is_err() {
                        break;
                    }
                }
                debug!(worker = id, "Worker finished");
            }));
        }
        // Only the workers may keep either queue alive.
        drop(job_rx);
        drop(result_tx);

        let mut aggregator = Aggregator::new(self.options.progress_every);
        while let Some(outcome) = result_rx.recv().await {
            aggregator.record(&outcome);
            if let Some(report) = progress {
                report(&aggregator.progress());
            }
        }

        for handle in handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Worker task failed");
            }
        }

        match producer.await {
            Ok(Ok(stats)) => info!(
                found = stats.found,
                ignored = stats.ignored,
                empty = stats.empty,
                read_errors = stats.read_errors,
                "Finished walking"
            ),
            Ok(Err(e)) => warn!(error = %e, "Walk aborted"),
            Err(e) => error!(error = %e, "Walker task failed"),
        }

        let summary = aggregator.finish(start.elapsed());
        info!(
            indexed = summary.indexed,
            errors = summary.errors,
            skipped = summary.skipped,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "Ingestion finished"
        );
        Ok(summary)
    }
}

/// Turn one job into its outcome: empty check, parse, submit.
pub async fn process_job(sink: &dyn DocumentSink, collection: &str, job: IngestJob) -> IngestOutcome {
    let IngestJob { path, content } = job;
    if content.is_empty() {
        return IngestOutcome::Empty { path };
    }

    let record = match parse_email(&path, content) {
        Ok(record) => record,
        Err(error) => return IngestOutcome::Invalid { path, error },
    };

    match sink.submit(collection, &record).await {
        Ok(()) => IngestOutcome::Indexed(record),
        Err(error) => IngestOutcome::Rejected { path, error },
    }
}
