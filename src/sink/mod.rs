//! Destinations for parsed email records.
//!
//! The ingestion pipeline only needs [`DocumentSink`]. The production sink is
//! [`zinc::ZincClient`]; tests plug in their own implementations.

pub mod zinc;

use async_trait::async_trait;

use crate::error::SinkError;
use crate::model::email::EmailRecord;

pub use zinc::ZincClient;

/// Accepts records for a named collection.
///
/// Implementations are called from many workers at once, with no ordering
/// between calls, and must be safe under concurrent writes to the same
/// collection.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    async fn submit(&self, collection: &str, record: &EmailRecord) -> Result<(), SinkError>;
}
