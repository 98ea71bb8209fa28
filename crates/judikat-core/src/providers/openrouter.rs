//! OpenRouter chat-completions client
//!
//! One reqwest-backed client serves both collaborator roles: the fast
//! model for query-variant generation ([`ChatModel`]) and, wrapped in
//! [`SonarWebSearch`], the web-grounded Sonar model for the combined
//! search path.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, LlmConfig};

use super::{ChatModel, ProviderError, WebAnswer, WebSearcher};

/// Steers the web branch toward statute law; case law comes from the
/// vector collections.
const SONAR_PROMPT: &str = "Jste právní expert na české právo a legislativu. \
Odpovídejte na základě aktuálních zákonů. Citujte konkrétní paragrafy \
(např. § 123 zákona č. 89/2012 Sb.). Vyhýbejte se citacím soudních rozhodnutí.";

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    /// Sonar-style models attach web citations at the top level.
    #[serde(default)]
    citations: Vec<String>,
}

// ============================================================================
// CLIENT
// ============================================================================

/// Chat-completion client for the OpenRouter API.
pub struct OpenRouterChat {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenRouterChat {
    /// Client for the configured query-generation model.
    pub fn new(config: &LlmConfig) -> Result<Self, ConfigError> {
        Self::with_model(config, &config.query_model)
    }

    /// Client for an explicit model name (e.g. the web-search model).
    pub fn with_model(config: &LlmConfig, model: &str) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: model.to_string(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Send one completion and return text plus any web citations.
    async fn complete_raw(
        &self,
        system: &str,
        user: &str,
    ) -> Result<(String, Vec<String>), ProviderError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status: status.as_u16(), body });
        }

        let parsed = response.json::<ChatResponse>().await.map_err(classify)?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(ProviderError::EmptyResponse)?;

        Ok((content, parsed.citations))
    }
}

fn classify(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Transport(err.to_string())
    }
}

#[async_trait]
impl ChatModel for OpenRouterChat {
    async fn complete(&self, system: &str, user: &str) -> Result<String, ProviderError> {
        let (content, _) = self.complete_raw(system, user).await?;
        Ok(content)
    }
}

// ============================================================================
// WEB SEARCH
// ============================================================================

/// Web branch of the combined search path, backed by Perplexity Sonar
/// through OpenRouter.
pub struct SonarWebSearch {
    chat: OpenRouterChat,
}

impl SonarWebSearch {
    /// Build from config, using the configured web model.
    pub fn new(config: &LlmConfig) -> Result<Self, ConfigError> {
        Ok(Self { chat: OpenRouterChat::with_model(config, &config.web_model)? })
    }
}

#[async_trait]
impl WebSearcher for SonarWebSearch {
    async fn search(&self, question: &str) -> Result<WebAnswer, ProviderError> {
        let (answer, citations) = self.chat.complete_raw(SONAR_PROMPT, question).await?;
        Ok(WebAnswer {
            answer,
            source: "Perplexity Sonar via OpenRouter".to_string(),
            citations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_response_parses_with_citations() {
        let raw = r#"{
            "choices": [{"message": {"role": "assistant", "content": " odpověď "}}],
            "citations": ["https://zakonyprolidi.cz/cs/2012-89"]
        }"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices.len(), 1);
        assert_eq!(parsed.citations.len(), 1);
    }

    #[test]
    fn test_chat_response_tolerates_missing_fields() {
        let parsed: ChatResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.choices.is_empty());
        assert!(parsed.citations.is_empty());
    }

    #[test]
    fn test_request_serializes_messages_in_order() {
        let request = ChatRequest {
            model: "openai/gpt-5-nano",
            messages: vec![
                ChatMessage { role: "system", content: "s" },
                ChatMessage { role: "user", content: "u" },
            ],
            temperature: 0.7,
            max_tokens: 300,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
    }
}
