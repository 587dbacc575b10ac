//! Units of work passed between pipeline stages.

use std::path::PathBuf;

use crate::error::{ParseError, SinkError};
use crate::model::email::EmailRecord;

/// One candidate file read by the walker, waiting for a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestJob {
    pub path: PathBuf,
    pub content: String,
}

/// What happened to one job. Every job yields exactly one outcome.
#[derive(Debug)]
pub enum IngestOutcome {
    /// Parsed and accepted by the sink.
    Indexed(EmailRecord),
    /// The file had no content.
    Empty { path: PathBuf },
    /// The content is not an email.
    Invalid { path: PathBuf, error: ParseError },
    /// The sink refused the record.
    Rejected { path: PathBuf, error: SinkError },
}

impl IngestOutcome {
    pub fn is_indexed(&self) -> bool {
        matches!(self, Self::Indexed(_))
    }

    /// Whether this outcome counts against the run.
    ///
    /// Empty files count as errors as well as skips.
    pub fn is_error(&self) -> bool {
        !self.is_indexed()
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }
}
