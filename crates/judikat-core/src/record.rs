//! Case Record - The unit of retrieved evidence
//!
//! A `CaseRecord` is the canonical normalized form of one vector-store hit:
//! identification fields, descriptive payload, the raw semantic score from
//! the store, and internal rank-fusion bookkeeping that is never serialized
//! to the answer-synthesis consumer.

use serde::{Deserialize, Serialize};

/// Sentinel for required string fields missing from a source payload.
/// Downstream code always finds a string, never a null.
pub const UNKNOWN_FIELD: &str = "N/A";

// ============================================================================
// CASE RECORD
// ============================================================================

/// One retrieved court decision (or decision fragment).
///
/// Created by the normalizer for every raw hit, mutated only by the fusion
/// merger, and dropped when it falls outside the final-K window. No record
/// outlives a single retrieval call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Stable case identifier (spisová značka). Dedup key for fusion.
    /// Defaults to [`UNKNOWN_FIELD`] when the payload omits it.
    pub case_number: String,
    /// Issuing court. May be empty or a collection display name.
    pub court: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub judge: Option<String>,
    /// Subject matter of the dispute. For chunked collections this holds
    /// the full decision text when available, otherwise the matched chunk.
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_issued: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_published: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ecli: Option<String>,
    /// Keywords in payload order.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Cited statutes and regulations, in payload order.
    #[serde(default)]
    pub legal_references: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Raw semantic similarity from the vector store. After fusion this is
    /// the maximum score observed across all contributing lists - never a
    /// fused or averaged statistic, so consumers always see a genuine
    /// similarity value.
    pub relevance_score: f32,
    /// Which logical data source produced the record. Stamped by the
    /// dispatcher, not by the store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,

    /// Accumulated RRF score. Internal ranking statistic only.
    #[serde(skip)]
    pub fusion_score: f64,
    /// How many contributing ranked lists contained this case.
    #[serde(skip)]
    pub occurrence_count: usize,
    /// 1-based ranks at which this case appeared, for diagnostics.
    #[serde(skip)]
    pub ranks: Vec<usize>,
}

// ============================================================================
// QUERY VARIANT
// ============================================================================

/// Where a search query came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantProvenance {
    /// The literal user question.
    Original,
    /// The n-th usable line of generated model output (1-based).
    Generated(usize),
}

/// A search string plus provenance. Drives retrieval only, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryVariant {
    pub text: String,
    pub provenance: VariantProvenance,
}

impl QueryVariant {
    /// Wrap the original user question.
    pub fn original(text: &str) -> Self {
        Self {
            text: text.to_string(),
            provenance: VariantProvenance::Original,
        }
    }

    /// Wrap the n-th generated variant (1-based).
    pub fn generated(index: usize, text: String) -> Self {
        Self {
            text,
            provenance: VariantProvenance::Generated(index),
        }
    }

    /// Provenance tag for logs: `original` or `generated-N`.
    pub fn label(&self) -> String {
        match self.provenance {
            VariantProvenance::Original => "original".to_string(),
            VariantProvenance::Generated(n) => format!("generated-{}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_labels() {
        assert_eq!(QueryVariant::original("q").label(), "original");
        assert_eq!(QueryVariant::generated(2, "q".into()).label(), "generated-2");
    }

    #[test]
    fn test_fusion_fields_not_serialized() {
        let record = CaseRecord {
            case_number: "22 Cdo 1234/2020".to_string(),
            court: "Nejvyšší soud".to_string(),
            judge: None,
            subject: "rozvod manželství".to_string(),
            date_issued: None,
            date_published: None,
            ecli: None,
            keywords: vec![],
            legal_references: vec![],
            source_url: None,
            relevance_score: 0.87,
            data_source: Some("supreme_court".to_string()),
            fusion_score: 0.5,
            occurrence_count: 3,
            ranks: vec![1, 2, 5],
        };

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("fusion_score").is_none());
        assert!(json.get("occurrence_count").is_none());
        assert!(json.get("ranks").is_none());
        assert!(json.get("judge").is_none());
        assert_eq!(json["case_number"], "22 Cdo 1234/2020");
        assert_eq!(json["data_source"], "supreme_court");
    }
}
