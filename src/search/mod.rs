//! Search and listing against the indexed emails.
//!
//! The engine does the actual work; this module only shapes requests and
//! defines the seam the HTTP API talks to.

pub mod query;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::SinkError;

pub use query::{SearchRequest, SortOrder};

/// Fields searched when the caller does not name any.
pub const DEFAULT_SEARCH_FIELDS: [&str; 4] = ["subject", "content", "sender", "recipient"];

/// Parameters of a full-text search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub query: String,
    pub fields: Vec<String>,
    pub from: usize,
    pub size: usize,
    pub sort_field: Option<String>,
    pub sort_order: SortOrder,
}

impl SearchOptions {
    /// Search `query` over the default fields, first 20 hits.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            fields: DEFAULT_SEARCH_FIELDS.iter().map(|f| f.to_string()).collect(),
            from: 0,
            size: 20,
            sort_field: None,
            sort_order: SortOrder::default(),
        }
    }
}

/// Read side of the search engine, as used by the HTTP API.
///
/// Results are the engine's JSON response, passed through untouched.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, index: &str, options: &SearchOptions) -> Result<Value, SinkError>;

    async fn list_all(&self, index: &str, from: usize, size: usize) -> Result<Value, SinkError>;
}
