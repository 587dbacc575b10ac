//! Run counters, owned by the single result aggregator.

use std::time::Duration;

use tracing::{info, warn};

use crate::ingest::job::IngestOutcome;

/// Totals of a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub indexed: u64,
    pub errors: u64,
    pub skipped: u64,
    pub elapsed: Duration,
}

impl IngestSummary {
    /// Number of results consumed.
    pub fn processed(&self) -> u64 {
        self.indexed + self.errors
    }

    /// Indexed records per second, or 0 for an instant run.
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.indexed as f64 / secs
        } else {
            0.0
        }
    }
}

/// Counters as seen after each consumed result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestProgress {
    pub indexed: u64,
    pub errors: u64,
    pub skipped: u64,
}

/// Folds outcomes into counters. Not shared; one per run.
#[derive(Debug, Default)]
pub struct Aggregator {
    counts: IngestProgress,
    progress_every: u64,
}

impl Aggregator {
    /// `progress_every` of 0 disables the periodic progress line.
    pub fn new(progress_every: u64) -> Self {
        Self {
            counts: IngestProgress::default(),
            progress_every,
        }
    }

    pub fn record(&mut self, outcome: &IngestOutcome) {
        match outcome {
            IngestOutcome::Indexed(_) => {}
            IngestOutcome::Empty { path } => {
                warn!(path = %path.display(), "Skipping empty file");
            }
            IngestOutcome::Invalid { path, error } => {
                warn!(path = %path.display(), error = %error, "Could not parse email");
            }
            IngestOutcome::Rejected { path, error } => {
                warn!(path = %path.display(), error = %error, "Search engine rejected email");
            }
        }

        if outcome.is_indexed() {
            self.counts.indexed += 1;
            if self.progress_every > 0 && self.counts.indexed % self.progress_every == 0 {
                info!(indexed = self.counts.indexed, "Indexed emails");
            }
        }
        if outcome.is_error() {
            self.counts.errors += 1;
        }
        if outcome.is_skip() {
            self.counts.skipped += 1;
        }
    }

    pub fn progress(&self) -> IngestProgress {
        self.counts
    }

    pub fn finish(self, elapsed: Duration) -> IngestSummary {
        IngestSummary {
            indexed: self.counts.indexed,
            errors: self.counts.errors,
            skipped: self.counts.skipped,
            elapsed,
        }
    }
}
