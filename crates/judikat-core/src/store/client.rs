//! Retrying collection client
//!
//! Wraps any [`SearchBackend`] with the failure policy for a serverless
//! vector store:
//!
//! - attempt *n* (0-based) runs with timeout `initial_timeout * 2^n`,
//!   compensating for cold-start latency spikes
//! - 4xx responses are client errors: logged, never retried
//! - 5xx, timeouts and connection failures back off `2^n` seconds and retry
//! - an exhausted retry budget degrades to an empty result; one dead
//!   collection is never fatal to the multi-collection operation

use std::sync::Arc;
use std::time::Duration;

use crate::config::{DEFAULT_INITIAL_TIMEOUT_SECS, DEFAULT_MAX_RETRIES, RetrievalConfig};

use super::{CollectionInfo, ScoredPoint, SearchBackend, SearchError, SearchRequest};

// ============================================================================
// RETRY POLICY
// ============================================================================

/// Attempt budget and timeout schedule for one collection call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, the first one included.
    pub max_retries: u32,
    /// Timeout of the first attempt; doubles on every retry.
    pub initial_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_timeout: Duration::from_secs(DEFAULT_INITIAL_TIMEOUT_SECS),
        }
    }
}

impl From<&RetrievalConfig> for RetryPolicy {
    fn from(config: &RetrievalConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_timeout: config.initial_timeout,
        }
    }
}

// ============================================================================
// COLLECTION CLIENT
// ============================================================================

/// Issues scored nearest-neighbor queries against one collection at a time,
/// with the retry policy above. Holds no per-request state; safe to share.
pub struct CollectionClient {
    backend: Arc<dyn SearchBackend>,
    policy: RetryPolicy,
}

impl CollectionClient {
    pub fn new(backend: Arc<dyn SearchBackend>, policy: RetryPolicy) -> Self {
        Self { backend, policy }
    }

    /// Search one collection. Returns hits in store order (score
    /// descending), or an empty list once the failure policy has run its
    /// course. Every hit of a successful response is returned; no partial
    /// result is dropped.
    pub async fn search(&self, collection: &str, vector: &[f32], limit: usize) -> Vec<ScoredPoint> {
        let request = SearchRequest {
            vector: vector.to_vec(),
            limit,
            with_payload: true,
        };

        for attempt in 0..self.policy.max_retries {
            let timeout = self.policy.initial_timeout * 2u32.pow(attempt);

            match self.backend.search_points(collection, &request, timeout).await {
                Ok(response) => {
                    tracing::debug!(
                        "collection {}: {} hits (attempt {})",
                        collection,
                        response.result.len(),
                        attempt + 1
                    );
                    return response.result;
                }
                Err(err) if !err.is_retryable() => {
                    tracing::warn!("collection {}: client error, not retrying: {}", collection, err);
                    return Vec::new();
                }
                Err(err) => {
                    tracing::warn!(
                        "collection {}: transient failure on attempt {}: {}",
                        collection,
                        attempt + 1,
                        err
                    );
                }
            }

            if attempt + 1 < self.policy.max_retries {
                tokio::time::sleep(Duration::from_secs(1u64 << attempt)).await;
            }
        }

        tracing::warn!("collection {}: retry budget exhausted, treating as empty", collection);
        Vec::new()
    }

    /// Collection metadata, single attempt at the base timeout.
    pub async fn info(&self, collection: &str) -> Result<CollectionInfo, SearchError> {
        self.backend
            .collection_info(collection, self.policy.initial_timeout)
            .await
    }
}
