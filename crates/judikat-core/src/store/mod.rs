//! Vector store access
//!
//! Wire types and the [`SearchBackend`] seam for a Qdrant-style HTTP API,
//! plus the retrying [`CollectionClient`] that implements the per-attempt
//! timeout and backoff policy for a serverless backend prone to cold
//! starts.

mod client;
mod qdrant;

pub use client::{CollectionClient, RetryPolicy};
pub use qdrant::QdrantBackend;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// A failed call to the vector store.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Non-2xx HTTP status from the store.
    #[error("vector store returned status {status}: {body}")]
    Status { status: u16, body: String },
    /// The request timed out.
    #[error("vector store request timed out")]
    Timeout,
    /// Connection or protocol failure.
    #[error("vector store transport error: {0}")]
    Transport(String),
}

impl SearchError {
    /// Whether retrying the same request can succeed.
    ///
    /// A 4xx is a malformed request; repeating it cannot help. 5xx,
    /// timeouts and connection failures are transient on a serverless
    /// backend and are retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            SearchError::Status { status, .. } => *status >= 500,
            SearchError::Timeout | SearchError::Transport(_) => true,
        }
    }
}

// ============================================================================
// WIRE TYPES
// ============================================================================

/// Body of `POST /collections/{name}/points/search`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub vector: Vec<f32>,
    pub limit: usize,
    pub with_payload: bool,
}

/// One scored hit. The payload shape is collection-specific; the
/// normalizer is the only consumer.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoredPoint {
    pub score: f32,
    #[serde(default)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

/// Result envelope of a search call, ordered by score descending as
/// returned by the store.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub result: Vec<ScoredPoint>,
}

/// Subset of `GET /collections/{name}` used for availability listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionInfo {
    #[serde(default)]
    pub points_count: u64,
}

// ============================================================================
// BACKEND SEAM
// ============================================================================

/// One raw call against the vector store HTTP API.
///
/// Implementations perform a single attempt with the given timeout and
/// report failures through [`SearchError`]; all retry policy lives in
/// [`CollectionClient`].
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Scored nearest-neighbor query against one named collection.
    async fn search_points(
        &self,
        collection: &str,
        request: &SearchRequest,
        timeout: Duration,
    ) -> Result<SearchResponse, SearchError>;

    /// Collection metadata for availability listings.
    async fn collection_info(
        &self,
        collection: &str,
        timeout: Duration,
    ) -> Result<CollectionInfo, SearchError>;
}
