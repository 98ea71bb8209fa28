//! Multi-Collection Dispatcher
//!
//! Resolves a [`DataSource`] selector into concrete collections and fans
//! one query vector out to all of them concurrently - serverless cold
//! starts are independent, so sequential calls would multiply worst-case
//! latency by the collection count. Failures stay local: a dead collection
//! contributes an empty list, sibling searches are never cancelled, and a
//! complete outage yields an empty result rather than an error.

use std::cmp::Ordering;
use std::collections::HashMap;

use futures::future::join_all;
use serde::Serialize;

use crate::normalize::normalize;
use crate::record::CaseRecord;
use crate::sources::{CollectionConfig, DataSource, SourceRegistry};
use crate::store::CollectionClient;

// ============================================================================
// DISPATCHER
// ============================================================================

/// Fans queries out across the collections backing a data source.
pub struct Dispatcher {
    client: CollectionClient,
    registry: SourceRegistry,
}

impl Dispatcher {
    pub fn new(client: CollectionClient, registry: SourceRegistry) -> Self {
        Self { client, registry }
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// One ranked list per backing collection, in registry order. This is
    /// the view the fusion stage consumes: every (variant, collection)
    /// pair stays a separate list so cross-collection consensus is
    /// rewarded. Failed collections yield empty lists.
    pub async fn dispatch_ranked(
        &self,
        selector: DataSource,
        vector: &[f32],
        per_collection_limit: usize,
    ) -> Vec<Vec<CaseRecord>> {
        let collections = self.registry.resolve(selector);
        let searches = collections
            .iter()
            .map(|config| self.search_collection(config, vector, per_collection_limit));
        join_all(searches).await
    }

    /// Union of all per-collection hits, sorted by relevance descending.
    pub async fn dispatch(
        &self,
        selector: DataSource,
        vector: &[f32],
        per_collection_limit: usize,
    ) -> Vec<CaseRecord> {
        let mut merged: Vec<CaseRecord> = self
            .dispatch_ranked(selector, vector, per_collection_limit)
            .await
            .into_iter()
            .flatten()
            .collect();

        merged.sort_by(by_relevance_desc);
        merged
    }

    /// Query one collection and normalize its hits. Chunked collections
    /// are over-fetched and collapsed to the best chunk per case so that
    /// the returned list is one entry per decision.
    async fn search_collection(
        &self,
        config: &CollectionConfig,
        vector: &[f32],
        limit: usize,
    ) -> Vec<CaseRecord> {
        if vector.len() != config.vector_size {
            tracing::debug!(
                "collection {}: query vector has {} dims, collection was built with {}",
                config.name,
                vector.len(),
                config.vector_size
            );
        }

        let fetch_limit = if config.uses_chunking { limit * 2 } else { limit };
        let points = self.client.search(&config.name, vector, fetch_limit).await;

        let mut records: Vec<CaseRecord> = points
            .iter()
            .map(|point| {
                let mut record = normalize(&point.payload, point.score, config);
                record.data_source = Some(config.source.as_str().to_string());
                record
            })
            .collect();

        if config.uses_chunking {
            records = best_chunk_per_case(records);
        }
        records.truncate(limit);
        records
    }

    /// Availability of every registered collection, queried concurrently.
    pub async fn available_sources(&self) -> Vec<SourceStatus> {
        let checks = self.registry.all().iter().map(|config| async {
            let (points_count, status) = match self.client.info(&config.name).await {
                Ok(info) => (info.points_count, "available"),
                Err(err) => {
                    tracing::warn!("collection {}: availability check failed: {}", config.name, err);
                    (0, "unavailable")
                }
            };

            SourceStatus {
                id: config.source.as_str(),
                name: config.display_name.clone(),
                description: config.description.clone(),
                collection: config.name.clone(),
                vector_size: config.vector_size,
                points_count,
                status,
                uses_chunking: config.uses_chunking,
            }
        });

        join_all(checks).await
    }
}

/// Collapse chunked hits to the highest-scoring chunk per case, keeping
/// relevance order.
fn best_chunk_per_case(records: Vec<CaseRecord>) -> Vec<CaseRecord> {
    let mut best: HashMap<String, CaseRecord> = HashMap::new();
    for record in records {
        match best.get(&record.case_number) {
            Some(existing) if existing.relevance_score >= record.relevance_score => {}
            _ => {
                best.insert(record.case_number.clone(), record);
            }
        }
    }

    let mut deduped: Vec<CaseRecord> = best.into_values().collect();
    deduped.sort_by(by_relevance_desc);
    deduped
}

fn by_relevance_desc(a: &CaseRecord, b: &CaseRecord) -> Ordering {
    b.relevance_score
        .partial_cmp(&a.relevance_score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.case_number.cmp(&b.case_number))
}

// ============================================================================
// SOURCE STATUS
// ============================================================================

/// One entry of the source availability listing.
#[derive(Debug, Clone, Serialize)]
pub struct SourceStatus {
    pub id: &'static str,
    pub name: String,
    pub description: String,
    pub collection: String,
    pub vector_size: usize,
    pub points_count: u64,
    pub status: &'static str,
    pub uses_chunking: bool,
}
