//! # Judikat Core
//!
//! Retrieval orchestration engine for Czech court-decision RAG. Turns one
//! natural-language legal question into a fused, deduplicated evidence set
//! of case law:
//!
//! - **Query expansion**: an LLM generates semantically-equivalent search
//!   variants; the literal question is always kept
//! - **Concurrent multi-collection search**: every variant fans out across
//!   the selected Qdrant collections in parallel, with exponential
//!   per-attempt timeouts and backoff against serverless cold starts
//! - **Reciprocal Rank Fusion**: all ranked lists merge into one
//!   deterministic ordering with `k = 60`, rewarding cases retrieved by
//!   multiple variants or collections
//!
//! Failures degrade instead of propagating: a dead collection or a failed
//! variant contributes nothing, and even a total outage yields an empty
//! evidence set rather than an error.
//!
//! The HTTP surface, the answer-synthesis model and process startup live
//! outside this crate; embedding and chat models are injected through the
//! [`providers`] trait seams.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use judikat_core::{
//!     CollectionClient, DataSource, Dispatcher, OpenRouterChat, QdrantBackend,
//!     QueryVariantGenerator, RetrievalEngine, SourceRegistry,
//! };
//! use judikat_core::config::{LlmConfig, QdrantConfig, RetrievalConfig, SourceNames};
//!
//! let qdrant = QdrantConfig::from_env()?;
//! let llm = LlmConfig::from_env()?;
//! let retrieval = RetrievalConfig::from_env()?;
//!
//! let backend = Arc::new(QdrantBackend::new(&qdrant)?);
//! let client = CollectionClient::new(backend, (&retrieval).into());
//! let dispatcher = Dispatcher::new(client, SourceRegistry::new(&SourceNames::from_env()));
//! let generator = QueryVariantGenerator::new(Arc::new(OpenRouterChat::new(&llm)?));
//!
//! let engine = RetrievalEngine::new(embedder, generator, dispatcher, retrieval);
//! let cases = engine.retrieve("rozvod manželství", DataSource::All, 5).await;
//! ```
//!
//! ## Feature flags
//!
//! - `embeddings`: local fastembed inference implementing
//!   [`EmbeddingProvider`] in-process

// ============================================================================
// MODULES
// ============================================================================

pub mod config;
pub mod context;
pub mod dispatch;
pub mod engine;
pub mod fusion;
pub mod normalize;
pub mod providers;
pub mod record;
pub mod sources;
pub mod store;
pub mod variants;

#[cfg(feature = "embeddings")]
pub mod embeddings;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use config::{ConfigError, LlmConfig, QdrantConfig, RetrievalConfig, SourceNames};
pub use context::format_cases_for_context;
pub use dispatch::{Dispatcher, SourceStatus};
pub use engine::{CombinedSearchResult, RetrievalEngine};
pub use fusion::{RRF_K, fuse};
pub use providers::{
    ChatModel, EmbeddingProvider, OpenRouterChat, ProviderError, SonarWebSearch, WebAnswer,
    WebSearcher,
};
pub use record::{CaseRecord, QueryVariant, VariantProvenance};
pub use sources::{CollectionConfig, DataSource, SourceRegistry};
pub use store::{
    CollectionClient, CollectionInfo, QdrantBackend, RetryPolicy, ScoredPoint, SearchBackend,
    SearchError, SearchRequest, SearchResponse,
};
pub use variants::{QueryVariantGenerator, VariantConfig};

#[cfg(feature = "embeddings")]
pub use embeddings::LocalEmbedder;
