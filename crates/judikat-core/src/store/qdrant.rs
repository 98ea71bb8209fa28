//! Qdrant HTTP backend
//!
//! Single-attempt calls against the Qdrant REST API. The client is built
//! once at startup and injected; per-attempt timeouts are set per request
//! so the retrying caller can grow them.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::{ConfigError, QdrantConfig};

use super::{CollectionInfo, SearchBackend, SearchError, SearchRequest, SearchResponse};

/// `GET /collections/{name}` wraps its payload in a result envelope.
#[derive(Debug, Deserialize)]
struct InfoEnvelope {
    #[serde(default)]
    result: CollectionInfo,
}

/// Reqwest-backed [`SearchBackend`] for the Qdrant HTTP API.
pub struct QdrantBackend {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl QdrantBackend {
    /// Build the backend. Fails fast on HTTP client construction; this is
    /// startup-time configuration, not a per-request concern.
    pub fn new(config: &QdrantConfig) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("api-key", key),
            None => request,
        }
    }
}

fn classify(err: reqwest::Error) -> SearchError {
    if err.is_timeout() {
        SearchError::Timeout
    } else {
        SearchError::Transport(err.to_string())
    }
}

#[async_trait]
impl SearchBackend for QdrantBackend {
    async fn search_points(
        &self,
        collection: &str,
        request: &SearchRequest,
        timeout: Duration,
    ) -> Result<SearchResponse, SearchError> {
        let url = format!("{}/collections/{}/points/search", self.base_url, collection);
        let response = self
            .apply_auth(self.http.post(&url))
            .timeout(timeout)
            .json(request)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Status { status: status.as_u16(), body });
        }

        response.json::<SearchResponse>().await.map_err(classify)
    }

    async fn collection_info(
        &self,
        collection: &str,
        timeout: Duration,
    ) -> Result<CollectionInfo, SearchError> {
        let url = format!("{}/collections/{}", self.base_url, collection);
        let response = self
            .apply_auth(self.http.get(&url))
            .timeout(timeout)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Status { status: status.as_u16(), body });
        }

        let envelope = response.json::<InfoEnvelope>().await.map_err(classify)?;
        Ok(envelope.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = QdrantConfig::new("http://localhost:6333/", None);
        let backend = QdrantBackend::new(&config).unwrap();
        assert_eq!(backend.base_url, "http://localhost:6333");
    }

    #[test]
    fn test_info_envelope_parses() {
        let raw = r#"{"result":{"status":"green","points_count":52133},"status":"ok","time":0.001}"#;
        let envelope: InfoEnvelope = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.result.points_count, 52133);
    }
}
