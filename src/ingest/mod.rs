//! Concurrent ingestion of a directory tree of email files.

pub mod job;
pub mod pipeline;
pub mod stats;
pub mod walker;

pub use job::{IngestJob, IngestOutcome};
pub use pipeline::{IngestOptions, IngestPipeline};
pub use stats::{IngestProgress, IngestSummary};
pub use walker::{validate_root, EmailFiles, WalkOptions, WalkStats};
