//! External collaborators
//!
//! The engine treats "embed text into a vector", "complete a chat prompt"
//! and "answer from the web" as opaque external operations behind trait
//! seams. Implementations are constructed once at process start and
//! injected; the engine never owns provider lifecycle.

mod openrouter;

pub use openrouter::{OpenRouterChat, SonarWebSearch};

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// A failed call to an external provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Non-2xx HTTP status.
    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },
    /// The request timed out.
    #[error("provider request timed out")]
    Timeout,
    /// Connection or protocol failure.
    #[error("provider transport error: {0}")]
    Transport(String),
    /// A well-formed response with no usable content.
    #[error("provider returned an empty or unusable response")]
    EmptyResponse,
}

// ============================================================================
// TRAIT SEAMS
// ============================================================================

/// Maps text to a fixed-length vector.
///
/// Must be the same model and dimensionality the target collections were
/// built with. A mismatch silently degrades relevance - the engine cannot
/// detect it beyond the store rejecting a wrong vector size.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError>;
}

/// Chat-completion style call returning free text. Used for query-variant
/// generation; the caller owns all output validation.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, ProviderError>;
}

/// An answer produced by a web-grounded model.
#[derive(Debug, Clone, Serialize)]
pub struct WebAnswer {
    pub answer: String,
    /// Human-readable provenance, e.g. `Perplexity Sonar via OpenRouter`.
    pub source: String,
    pub citations: Vec<String>,
}

/// Web-search branch of the combined search path.
#[async_trait]
pub trait WebSearcher: Send + Sync {
    async fn search(&self, question: &str) -> Result<WebAnswer, ProviderError>;
}
