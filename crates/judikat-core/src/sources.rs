//! Data sources - logical collections of Czech court decisions
//!
//! A [`DataSource`] selector names either one concrete Qdrant collection or
//! the `all` group. The [`SourceRegistry`] resolves a selector into its
//! backing collections; resolution is a pure function of the selector
//! value, fixed at construction time.

use serde::{Deserialize, Serialize};

use crate::config::SourceNames;

/// Vector size of the original general-courts collection
/// (paraphrase-multilingual-MiniLM-L12-v2).
pub const GENERAL_COURTS_VECTOR_SIZE: usize = 384;

/// Vector size of the newer per-court collections (Seznam/retromae-small-cs).
pub const SEZNAM_VECTOR_SIZE: usize = 256;

// ============================================================================
// SELECTOR
// ============================================================================

/// Logical data source selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Decisions of general courts (district, regional, high).
    GeneralCourts,
    /// Constitutional Court findings and resolutions.
    ConstitutionalCourt,
    /// Supreme Court decisions.
    SupremeCourt,
    /// Supreme Administrative Court decisions.
    SupremeAdminCourt,
    /// Every concrete source above.
    All,
}

impl DataSource {
    /// String identifier matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::GeneralCourts => "general_courts",
            DataSource::ConstitutionalCourt => "constitutional_court",
            DataSource::SupremeCourt => "supreme_court",
            DataSource::SupremeAdminCourt => "supreme_admin_court",
            DataSource::All => "all",
        }
    }

    /// Every concrete (non-group) source.
    pub fn concrete() -> [DataSource; 4] {
        [
            DataSource::GeneralCourts,
            DataSource::ConstitutionalCourt,
            DataSource::SupremeCourt,
            DataSource::SupremeAdminCourt,
        ]
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// COLLECTION CONFIGURATION
// ============================================================================

/// One Qdrant collection plus the payload field mapping its indexing
/// pipeline used. Collections are heterogeneous: different pipelines
/// populate different field subsets under different names.
#[derive(Debug, Clone)]
pub struct CollectionConfig {
    /// The concrete source this collection backs.
    pub source: DataSource,
    /// Qdrant collection name.
    pub name: String,
    /// Czech display name, also the court fallback for payloads without one.
    pub display_name: String,
    pub description: String,
    /// Dimensionality the collection was built with. Metadata only; a
    /// mismatched query vector surfaces as a 4xx from the store.
    pub vector_size: usize,
    pub case_number_field: &'static str,
    /// Main text field for non-chunked collections.
    pub text_field: &'static str,
    pub court_field: &'static str,
    pub date_field: &'static str,
    /// Chunked collections index one decision as several points; the same
    /// case can appear multiple times in one result list.
    pub uses_chunking: bool,
    pub chunk_text_field: &'static str,
    pub full_text_field: &'static str,
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Fixed, known-in-advance set of collections behind the selectors.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    collections: Vec<CollectionConfig>,
}

impl SourceRegistry {
    /// Build the registry from configured collection names.
    pub fn new(names: &SourceNames) -> Self {
        let collections = vec![
            CollectionConfig {
                source: DataSource::GeneralCourts,
                name: names.general_courts.clone(),
                display_name: "Obecné soudy".to_string(),
                description: "Rozhodnutí obecných soudů ČR".to_string(),
                vector_size: GENERAL_COURTS_VECTOR_SIZE,
                case_number_field: "case_number",
                text_field: "subject",
                court_field: "court",
                date_field: "date_issued",
                uses_chunking: false,
                chunk_text_field: "chunk_text",
                full_text_field: "full_text",
            },
            CollectionConfig {
                source: DataSource::ConstitutionalCourt,
                name: names.constitutional_court.clone(),
                display_name: "Ústavní soud".to_string(),
                description: "Nálezy a usnesení Ústavního soudu ČR".to_string(),
                vector_size: SEZNAM_VECTOR_SIZE,
                case_number_field: "case_number",
                text_field: "chunk_text",
                court_field: "court",
                date_field: "date",
                uses_chunking: true,
                chunk_text_field: "chunk_text",
                full_text_field: "full_text",
            },
            CollectionConfig {
                source: DataSource::SupremeCourt,
                name: names.supreme_court.clone(),
                display_name: "Nejvyšší soud".to_string(),
                description: "Rozhodnutí Nejvyššího soudu ČR".to_string(),
                vector_size: SEZNAM_VECTOR_SIZE,
                case_number_field: "case_number",
                text_field: "chunk_text",
                court_field: "court",
                date_field: "date",
                uses_chunking: true,
                chunk_text_field: "chunk_text",
                full_text_field: "full_text",
            },
            CollectionConfig {
                source: DataSource::SupremeAdminCourt,
                name: names.supreme_admin_court.clone(),
                display_name: "Nejvyšší správní soud".to_string(),
                description: "Rozhodnutí Nejvyššího správního soudu ČR".to_string(),
                vector_size: SEZNAM_VECTOR_SIZE,
                case_number_field: "case_number",
                text_field: "chunk_text",
                court_field: "court",
                date_field: "date",
                uses_chunking: true,
                chunk_text_field: "chunk_text",
                full_text_field: "full_text",
            },
        ];

        Self { collections }
    }

    /// Resolve a selector into its backing collections. Pure: depends only
    /// on the selector value and the fixed registry contents.
    pub fn resolve(&self, selector: DataSource) -> Vec<&CollectionConfig> {
        match selector {
            DataSource::All => self.collections.iter().collect(),
            concrete => self
                .collections
                .iter()
                .filter(|c| c.source == concrete)
                .collect(),
        }
    }

    /// Look up one concrete collection.
    pub fn get(&self, source: DataSource) -> Option<&CollectionConfig> {
        self.collections.iter().find(|c| c.source == source)
    }

    /// All registered collections.
    pub fn all(&self) -> &[CollectionConfig] {
        &self.collections
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new(&SourceNames::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_serde_round_trip() {
        let json = serde_json::to_string(&DataSource::SupremeAdminCourt).unwrap();
        assert_eq!(json, "\"supreme_admin_court\"");
        let back: DataSource = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DataSource::SupremeAdminCourt);
    }

    #[test]
    fn test_resolve_concrete_source() {
        let registry = SourceRegistry::default();
        let resolved = registry.resolve(DataSource::SupremeCourt);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].name, "czech_supreme_court");
        assert!(resolved[0].uses_chunking);
    }

    #[test]
    fn test_resolve_all_group() {
        let registry = SourceRegistry::default();
        let resolved = registry.resolve(DataSource::All);
        assert_eq!(resolved.len(), 4);

        // Resolution is pure: the same selector always yields the same list
        let again = registry.resolve(DataSource::All);
        let names: Vec<&str> = resolved.iter().map(|c| c.name.as_str()).collect();
        let names_again: Vec<&str> = again.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, names_again);
    }

    #[test]
    fn test_general_courts_is_not_chunked() {
        let registry = SourceRegistry::default();
        let general = registry.get(DataSource::GeneralCourts).unwrap();
        assert!(!general.uses_chunking);
        assert_eq!(general.vector_size, GENERAL_COURTS_VECTOR_SIZE);
        assert_eq!(general.text_field, "subject");
    }
}
