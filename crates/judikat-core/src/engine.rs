//! Retrieval orchestration
//!
//! Ties the pipeline together: one question becomes several query
//! variants, every variant is embedded and dispatched across the selected
//! collections concurrently, and all resulting ranked lists meet in the
//! fusion merger - the single synchronization point that imposes a
//! deterministic final order regardless of network completion order.
//!
//! Failures are recovered as close to their origin as possible: a failed
//! embedding abandons that one variant, a dead collection contributes an
//! empty list, and a total outage surfaces as an empty evidence set, never
//! as an error.

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;

use crate::config::RetrievalConfig;
use crate::dispatch::{Dispatcher, SourceStatus};
use crate::fusion;
use crate::providers::{EmbeddingProvider, WebAnswer, WebSearcher};
use crate::record::{CaseRecord, QueryVariant};
use crate::sources::DataSource;
use crate::variants::QueryVariantGenerator;

// ============================================================================
// ENGINE
// ============================================================================

/// The retrieval orchestration engine.
///
/// Holds injected collaborators only; no mutable state is shared across
/// requests, and aggregation state for fusion is confined to one call.
pub struct RetrievalEngine {
    embedder: Arc<dyn EmbeddingProvider>,
    generator: QueryVariantGenerator,
    dispatcher: Dispatcher,
    config: RetrievalConfig,
}

impl RetrievalEngine {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        generator: QueryVariantGenerator,
        dispatcher: Dispatcher,
        config: RetrievalConfig,
    ) -> Self {
        Self { embedder, generator, dispatcher, config }
    }

    /// Retrieve the fused evidence set for one question.
    ///
    /// All variants are dispatched in parallel, and within each variant
    /// all collections are queried in parallel, so outbound concurrency is
    /// up to `variants × collections`. The result is ordered by fusion
    /// score and truncated to `final_limit`.
    pub async fn retrieve(
        &self,
        question: &str,
        source: DataSource,
        final_limit: usize,
    ) -> Vec<CaseRecord> {
        let variants = self
            .generator
            .generate(question, self.config.num_query_variants)
            .await;
        tracing::debug!("retrieving with {} query variants from {}", variants.len(), source);

        let searches = variants
            .iter()
            .map(|variant| self.retrieve_variant(variant, source));
        let ranked_lists: Vec<Vec<CaseRecord>> =
            join_all(searches).await.into_iter().flatten().collect();

        let mut fused = fusion::fuse(ranked_lists, final_limit);
        if let Some(min_score) = self.config.min_relevance_score {
            fused.retain(|record| record.relevance_score >= min_score);
        }

        tracing::debug!("fused evidence set: {} records", fused.len());
        fused
    }

    /// Retrieve with the configured default evidence-set size.
    pub async fn retrieve_default(&self, question: &str, source: DataSource) -> Vec<CaseRecord> {
        self.retrieve(question, source, self.config.final_top_k).await
    }

    /// Embed one variant and fan it out. A failed embedding abandons this
    /// variant only - no vector means no search is possible - without
    /// touching sibling variants.
    async fn retrieve_variant(
        &self,
        variant: &QueryVariant,
        source: DataSource,
    ) -> Vec<Vec<CaseRecord>> {
        let vector = match self.embedder.embed(&variant.text).await {
            Ok(vector) => vector,
            Err(err) => {
                tracing::warn!("embedding failed for {} variant, skipping it: {}", variant.label(), err);
                return Vec::new();
            }
        };

        self.dispatcher
            .dispatch_ranked(source, &vector, self.config.results_per_query)
            .await
    }

    /// Run the web-search branch and case retrieval concurrently and join
    /// them. A failed web branch degrades to `None`; it never aborts or
    /// delays sibling case retrieval beyond its own runtime.
    pub async fn combined_search(
        &self,
        question: &str,
        source: DataSource,
        final_limit: usize,
        web: &dyn WebSearcher,
    ) -> CombinedSearchResult {
        let (web_result, cases) =
            tokio::join!(web.search(question), self.retrieve(question, source, final_limit));

        let web = match web_result {
            Ok(answer) => Some(answer),
            Err(err) => {
                tracing::warn!("web search branch failed, continuing with cases only: {}", err);
                None
            }
        };

        CombinedSearchResult { web, cases }
    }

    /// Availability listing of every registered collection.
    pub async fn available_sources(&self) -> Vec<SourceStatus> {
        self.dispatcher.available_sources().await
    }
}

// ============================================================================
// COMBINED RESULT
// ============================================================================

/// Joined output of the combined web + case search path.
#[derive(Debug, Serialize)]
pub struct CombinedSearchResult {
    /// Web-grounded answer, absent when that branch failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web: Option<WebAnswer>,
    /// Fused case evidence, possibly empty.
    pub cases: Vec<CaseRecord>,
}
