//! Local embedding provider (feature `embeddings`)
//!
//! Wraps fastembed's ONNX inference behind the [`EmbeddingProvider`] seam.
//! Uses the multilingual paraphrase MiniLM model family - the same one the
//! general-courts collection was indexed with. Constructed once at process
//! start and injected; there is no process-global model state.

use std::sync::Mutex;

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use crate::providers::{EmbeddingProvider, ProviderError};

/// In-process embedder backed by fastembed.
pub struct LocalEmbedder {
    model: Mutex<TextEmbedding>,
}

impl LocalEmbedder {
    /// Download (on first use) and load the model. Expensive; call once at
    /// startup.
    pub fn new() -> Result<Self, ProviderError> {
        let options = InitOptions::new(EmbeddingModel::ParaphraseMLMiniLML12V2)
            .with_show_download_progress(false);

        let model = TextEmbedding::try_new(options).map_err(|e| {
            ProviderError::Transport(format!("failed to initialize embedding model: {}", e))
        })?;

        Ok(Self { model: Mutex::new(model) })
    }
}

#[async_trait]
impl EmbeddingProvider for LocalEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let mut model = self
            .model
            .lock()
            .map_err(|_| ProviderError::Transport("embedding model lock poisoned".to_string()))?;

        let mut vectors = model
            .embed(vec![text], None)
            .map_err(|e| ProviderError::Transport(format!("embedding failed: {}", e)))?;

        vectors.pop().ok_or(ProviderError::EmptyResponse)
    }
}
