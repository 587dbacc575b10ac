//! HTTP client for a ZincSearch-compatible engine.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{IndexerError, SinkError};
use crate::model::email::EmailRecord;
use crate::model::schema::IndexMapping;
use crate::search::{SearchBackend, SearchOptions, SearchRequest};
use crate::sink::DocumentSink;

#[derive(Clone)]
pub struct ZincClient {
    http: reqwest::Client,
    config: EngineConfig,
}

impl ZincClient {
    pub fn new(config: EngineConfig) -> crate::error::Result<Self> {
        reqwest::Url::parse(&config.base_url).map_err(|e| {
            IndexerError::Config(format!("invalid engine URL '{}': {e}", config.base_url))
        })?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("mailindex/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(SinkError::Http)?;

        Ok(Self { http, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> RequestBuilder {
        self.http
            .post(self.endpoint(path))
            .basic_auth(&self.config.username, Some(&self.config.password))
            .json(body)
    }

    /// Create `index` with the email field mapping.
    pub async fn create_index(&self, index: &str) -> Result<(), SinkError> {
        let mapping = IndexMapping::for_emails(index);
        let response = self.post_json("index", &mapping).send().await?;
        expect_status(response, StatusCode::OK).await?;
        debug!(index, "Created index");
        Ok(())
    }

    /// Store one record. The engine answers `201 Created` on success.
    pub async fn index_document(&self, index: &str, record: &EmailRecord) -> Result<(), SinkError> {
        let response = self
            .post_json(&format!("{index}/_doc"), record)
            .send()
            .await?;
        expect_status(response, StatusCode::CREATED).await?;
        Ok(())
    }

    async fn run_search(&self, index: &str, request: &SearchRequest) -> Result<Value, SinkError> {
        let response = self
            .post_json(&format!("{index}/_search"), request)
            .send()
            .await?;
        let response = expect_status(response, StatusCode::OK).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Return the response if it carries `expected`, otherwise its body as an error.
async fn expect_status(response: Response, expected: StatusCode) -> Result<Response, SinkError> {
    if response.status() == expected {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(SinkError::status(status, body))
}

#[async_trait]
impl DocumentSink for ZincClient {
    async fn submit(&self, collection: &str, record: &EmailRecord) -> Result<(), SinkError> {
        self.index_document(collection, record).await
    }
}

#[async_trait]
impl SearchBackend for ZincClient {
    async fn search(&self, index: &str, options: &SearchOptions) -> Result<Value, SinkError> {
        self.run_search(index, &SearchRequest::multi_match(options))
            .await
    }

    async fn list_all(&self, index: &str, from: usize, size: usize) -> Result<Value, SinkError> {
        self.run_search(index, &SearchRequest::list_all(from, size))
            .await
    }
}
