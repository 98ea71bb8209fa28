//! Case Normalizer - strict typing at the payload boundary
//!
//! The single place where the vector store's opaque key/value payload turns
//! into a typed [`CaseRecord`]. Pure and total: every expected field is
//! read with an explicit fallback, so a partial or malformed payload yields
//! a defaulted record, never an error. Everything downstream operates on
//! the typed record only.

use serde_json::{Map, Value};

use crate::record::{CaseRecord, UNKNOWN_FIELD};
use crate::sources::CollectionConfig;

/// Normalize one raw hit into a [`CaseRecord`].
///
/// Field names come from the collection's mapping: heterogeneous indexing
/// pipelines populate different subsets under different names. For chunked
/// collections the subject prefers the full decision text over the matched
/// chunk. `data_source` is left unset; the dispatcher stamps it.
pub fn normalize(payload: &Map<String, Value>, score: f32, config: &CollectionConfig) -> CaseRecord {
    let subject = if config.uses_chunking {
        opt_string(payload, config.full_text_field)
            .or_else(|| opt_string(payload, config.chunk_text_field))
            .unwrap_or_default()
    } else {
        opt_string(payload, config.text_field).unwrap_or_default()
    };

    CaseRecord {
        case_number: opt_string(payload, config.case_number_field)
            .unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
        court: opt_string(payload, config.court_field)
            .unwrap_or_else(|| config.display_name.clone()),
        judge: opt_string(payload, "judge"),
        subject,
        date_issued: opt_string(payload, config.date_field),
        date_published: opt_string(payload, "date_published"),
        ecli: opt_string(payload, "ecli"),
        keywords: string_list(payload, "keywords"),
        legal_references: string_list(payload, "legal_references"),
        source_url: opt_string(payload, "source_url"),
        relevance_score: score,
        data_source: None,
        fusion_score: 0.0,
        occurrence_count: 0,
        ranks: Vec::new(),
    }
}

/// Read a string field. Non-string and empty values count as absent.
fn opt_string(payload: &Map<String, Value>, key: &str) -> Option<String> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Read a list of strings, preserving payload order. Non-string elements
/// are dropped; anything other than an array yields an empty list.
fn string_list(payload: &Map<String, Value>, key: &str) -> Vec<String> {
    match payload.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{DataSource, SourceRegistry};
    use serde_json::json;

    fn payload(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test payload must be an object"),
        }
    }

    fn registry() -> SourceRegistry {
        SourceRegistry::default()
    }

    #[test]
    fn test_full_payload() {
        let registry = registry();
        let config = registry.get(DataSource::GeneralCourts).unwrap();
        let payload = payload(json!({
            "case_number": "30 Cdo 2277/2018",
            "court": "Krajský soud v Brně",
            "judge": "JUDr. Novák",
            "subject": "náhrada škody",
            "date_issued": "2019-03-12",
            "date_published": "2019-04-01",
            "ecli": "ECLI:CZ:NS:2019:30.CDO.2277.2018.1",
            "keywords": ["škoda", "odpovědnost"],
            "legal_references": ["§ 2910 o. z."],
            "source_url": "https://example.cz/30cdo2277"
        }));

        let record = normalize(&payload, 0.91, config);
        assert_eq!(record.case_number, "30 Cdo 2277/2018");
        assert_eq!(record.court, "Krajský soud v Brně");
        assert_eq!(record.judge.as_deref(), Some("JUDr. Novák"));
        assert_eq!(record.subject, "náhrada škody");
        assert_eq!(record.keywords, vec!["škoda", "odpovědnost"]);
        assert_eq!(record.legal_references, vec!["§ 2910 o. z."]);
        assert_eq!(record.relevance_score, 0.91);
        assert!(record.data_source.is_none());
    }

    #[test]
    fn test_empty_payload_defaults() {
        let registry = registry();
        let config = registry.get(DataSource::GeneralCourts).unwrap();
        let record = normalize(&Map::new(), 0.4, config);

        assert_eq!(record.case_number, "N/A");
        assert_eq!(record.court, "Obecné soudy");
        assert_eq!(record.subject, "");
        assert!(record.judge.is_none());
        assert!(record.ecli.is_none());
        assert!(record.keywords.is_empty());
        assert!(record.legal_references.is_empty());
    }

    #[test]
    fn test_malformed_types_do_not_panic() {
        let registry = registry();
        let config = registry.get(DataSource::GeneralCourts).unwrap();
        let payload = payload(json!({
            "case_number": 12345,
            "keywords": "not a list",
            "legal_references": [1, 2, {"x": "y"}, "§ 13"],
            "judge": null
        }));

        let record = normalize(&payload, 0.0, config);
        assert_eq!(record.case_number, "N/A");
        assert!(record.keywords.is_empty());
        assert_eq!(record.legal_references, vec!["§ 13"]);
        assert!(record.judge.is_none());
    }

    #[test]
    fn test_chunked_subject_prefers_full_text() {
        let registry = registry();
        let config = registry.get(DataSource::SupremeCourt).unwrap();
        let with_full = payload(json!({
            "case_number": "25 Cdo 100/2021",
            "chunk_text": "jen část textu",
            "full_text": "celý text rozhodnutí"
        }));
        let record = normalize(&with_full, 0.8, config);
        assert_eq!(record.subject, "celý text rozhodnutí");

        let chunk_only = payload(json!({
            "case_number": "25 Cdo 100/2021",
            "chunk_text": "jen část textu"
        }));
        let record = normalize(&chunk_only, 0.8, config);
        assert_eq!(record.subject, "jen část textu");
    }

    #[test]
    fn test_chunked_date_field_mapping() {
        let registry = registry();
        let config = registry.get(DataSource::ConstitutionalCourt).unwrap();
        let payload = payload(json!({ "date": "2020-06-30" }));
        let record = normalize(&payload, 0.5, config);
        assert_eq!(record.date_issued.as_deref(), Some("2020-06-30"));
    }
}
