//! Engine configuration
//!
//! Env-driven settings with typed defaults, mirroring how the service is
//! deployed. Invalid values fail fast at construction time - never inside a
//! request.

use std::time::Duration;

use thiserror::Error;

// ============================================================================
// DEFAULTS
// ============================================================================

/// Retry attempts against one collection before degrading to empty.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Base timeout for the first search attempt. Grows exponentially per
/// attempt to absorb serverless cold starts on large collections.
pub const DEFAULT_INITIAL_TIMEOUT_SECS: u64 = 120;

/// Total query variants per question, the original included.
pub const DEFAULT_QUERY_VARIANTS: usize = 3;

/// Hits requested per (variant, collection) pair.
pub const DEFAULT_RESULTS_PER_QUERY: usize = 10;

/// Final evidence-set size after fusion.
pub const DEFAULT_FINAL_TOP_K: usize = 5;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Configuration error. Raised at startup, never per request.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable holds a value that does not parse.
    #[error("invalid value for {var}: {value}")]
    InvalidEnv { var: &'static str, value: String },
    /// A required setting is absent.
    #[error("missing required setting: {0}")]
    Missing(&'static str),
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}

fn env_opt(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.is_empty())
}

fn parse_env<T: std::str::FromStr>(
    var: &'static str,
    default: &str,
) -> Result<T, ConfigError> {
    let raw = env_or(var, default);
    raw.parse().map_err(|_| ConfigError::InvalidEnv { var, value: raw })
}

// ============================================================================
// VECTOR STORE
// ============================================================================

/// Connection settings for the Qdrant HTTP API.
#[derive(Debug, Clone)]
pub struct QdrantConfig {
    /// Base URL, e.g. `https://qdrant.example.com:6333`.
    pub base_url: String,
    /// Optional `api-key` header value.
    pub api_key: Option<String>,
}

impl QdrantConfig {
    /// Build from explicit values.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self { base_url: base_url.into(), api_key }
    }

    /// Read `QDRANT_HOST`, `QDRANT_PORT`, `QDRANT_HTTPS` and
    /// `QDRANT_API_KEY`. The host is required.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env_opt("QDRANT_HOST").ok_or(ConfigError::Missing("QDRANT_HOST"))?;
        let port: u16 = parse_env("QDRANT_PORT", "6333")?;
        let https = env_or("QDRANT_HTTPS", "false").to_lowercase() == "true";
        let protocol = if https { "https" } else { "http" };

        Ok(Self {
            base_url: format!("{}://{}:{}", protocol, host, port),
            api_key: env_opt("QDRANT_API_KEY"),
        })
    }
}

// ============================================================================
// LLM PROVIDER
// ============================================================================

/// Settings for the OpenRouter chat-completion collaborator.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: String,
    /// Fast model used for query-variant generation.
    pub query_model: String,
    /// Web-grounded model for the combined search path.
    pub web_model: String,
    /// Slightly elevated for variant diversity.
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl LlmConfig {
    /// Read `OPENROUTER_API_KEY` (required) and the optional model
    /// overrides `FAST_MODEL`, `WEB_SEARCH_MODEL`, `LLM_TIMEOUT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key =
            env_opt("OPENROUTER_API_KEY").ok_or(ConfigError::Missing("OPENROUTER_API_KEY"))?;
        let timeout_secs: u64 = parse_env("LLM_TIMEOUT", "30")?;

        Ok(Self {
            base_url: env_or("OPENROUTER_BASE_URL", "https://openrouter.ai/api/v1"),
            api_key,
            query_model: env_or("FAST_MODEL", "openai/gpt-5-nano"),
            web_model: env_or("WEB_SEARCH_MODEL", "perplexity/sonar"),
            temperature: 0.7,
            max_tokens: 300,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// ============================================================================
// RETRIEVAL
// ============================================================================

/// Tunables for one retrieval request.
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Attempts per collection; see [`DEFAULT_MAX_RETRIES`].
    pub max_retries: u32,
    /// Base per-attempt timeout; doubles on every retry.
    pub initial_timeout: Duration,
    /// Query variants per question, original included.
    pub num_query_variants: usize,
    /// Hits requested per (variant, collection) pair.
    pub results_per_query: usize,
    /// Evidence-set size returned to the caller.
    pub final_top_k: usize,
    /// Optional post-fusion cutoff on the raw semantic score.
    pub min_relevance_score: Option<f32>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_timeout: Duration::from_secs(DEFAULT_INITIAL_TIMEOUT_SECS),
            num_query_variants: DEFAULT_QUERY_VARIANTS,
            results_per_query: DEFAULT_RESULTS_PER_QUERY,
            final_top_k: DEFAULT_FINAL_TOP_K,
            min_relevance_score: None,
        }
    }
}

impl RetrievalConfig {
    /// Read overrides from `QDRANT_MAX_RETRIES`, `QDRANT_INITIAL_TIMEOUT`,
    /// `NUM_GENERATED_QUERIES`, `RESULTS_PER_QUERY`, `FINAL_TOP_K` and
    /// `MIN_RELEVANCE_SCORE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let initial_timeout_secs: u64 =
            parse_env("QDRANT_INITIAL_TIMEOUT", &DEFAULT_INITIAL_TIMEOUT_SECS.to_string())?;

        let min_relevance_score = match env_opt("MIN_RELEVANCE_SCORE") {
            Some(raw) => Some(raw.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "MIN_RELEVANCE_SCORE",
                value: raw,
            })?),
            None => None,
        };

        Ok(Self {
            max_retries: parse_env("QDRANT_MAX_RETRIES", &DEFAULT_MAX_RETRIES.to_string())?,
            initial_timeout: Duration::from_secs(initial_timeout_secs),
            num_query_variants: parse_env(
                "NUM_GENERATED_QUERIES",
                &DEFAULT_QUERY_VARIANTS.to_string(),
            )?,
            results_per_query: parse_env(
                "RESULTS_PER_QUERY",
                &DEFAULT_RESULTS_PER_QUERY.to_string(),
            )?,
            final_top_k: parse_env("FINAL_TOP_K", &DEFAULT_FINAL_TOP_K.to_string())?,
            min_relevance_score,
        })
    }
}

// ============================================================================
// COLLECTION NAMES
// ============================================================================

/// Qdrant collection names backing the logical data sources.
#[derive(Debug, Clone)]
pub struct SourceNames {
    pub general_courts: String,
    pub constitutional_court: String,
    pub supreme_court: String,
    pub supreme_admin_court: String,
}

impl Default for SourceNames {
    fn default() -> Self {
        Self {
            general_courts: "czech_court_decisions_rag".to_string(),
            constitutional_court: "czech_constitutional_court".to_string(),
            supreme_court: "czech_supreme_court".to_string(),
            supreme_admin_court: "czech_supreme_administrative_court".to_string(),
        }
    }
}

impl SourceNames {
    /// Read overrides from `QDRANT_COLLECTION`,
    /// `QDRANT_CONSTITUTIONAL_COURT`, `QDRANT_SUPREME_COURT` and
    /// `QDRANT_SUPREME_ADMIN_COURT`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            general_courts: env_or("QDRANT_COLLECTION", &defaults.general_courts),
            constitutional_court: env_or(
                "QDRANT_CONSTITUTIONAL_COURT",
                &defaults.constitutional_court,
            ),
            supreme_court: env_or("QDRANT_SUPREME_COURT", &defaults.supreme_court),
            supreme_admin_court: env_or(
                "QDRANT_SUPREME_ADMIN_COURT",
                &defaults.supreme_admin_court,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieval_defaults() {
        let config = RetrievalConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.initial_timeout, Duration::from_secs(120));
        assert_eq!(config.num_query_variants, 3);
        assert_eq!(config.final_top_k, 5);
        assert!(config.min_relevance_score.is_none());
    }

    #[test]
    fn test_source_name_defaults() {
        let names = SourceNames::default();
        assert_eq!(names.general_courts, "czech_court_decisions_rag");
        assert_eq!(names.supreme_admin_court, "czech_supreme_administrative_court");
    }

    #[test]
    fn test_qdrant_config_explicit() {
        let config = QdrantConfig::new("http://localhost:6333", None);
        assert_eq!(config.base_url, "http://localhost:6333");
        assert!(config.api_key.is_none());
    }
}
