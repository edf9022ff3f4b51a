//! Generative-language chat client.
//!
//! One `generateContent` request per user message: the full prior turn
//! history plus the new message go out, one text reply comes back. No
//! streaming, no retry; failure handling lives in
//! [`Conversation`](crate::conversation::Conversation).

use crate::config::{ChatConfig, GENERATIVE_LANGUAGE_API_BASE, SYSTEM_INSTRUCTION};
use async_trait::async_trait;
use filo_core::{ChatMessage, ChatModel, FiloError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Reply used when the model answers with no text at all.
pub const EMPTY_REPLY: &str = "I'm sorry, I'm having trouble connecting right now.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<WireContent>,
    system_instruction: WireContent,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<WirePart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WirePart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<WireContent>,
}

/// Chat client for the generative-language API.
pub struct GeminiChatClient {
    client: Client,
    config: ChatConfig,
}

impl GeminiChatClient {
    /// Create a new chat client.
    pub fn new(config: ChatConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| FiloError::Chat(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// Create a client configured from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::new(ChatConfig::from_env())
    }

    fn api_url(&self) -> String {
        let base = self.config.base_url.as_deref().unwrap_or(GENERATIVE_LANGUAGE_API_BASE);
        format!(
            "{}/models/{}:generateContent?key={}",
            base.trim_end_matches('/'),
            self.config.model,
            self.config.api_key
        )
    }

    fn build_request(&self, history: &[ChatMessage], message: &str) -> GenerateContentRequest {
        let mut contents: Vec<WireContent> = history
            .iter()
            .map(|m| WireContent {
                role: Some(m.role.as_str().to_string()),
                parts: vec![WirePart { text: m.text.clone() }],
            })
            .collect();
        contents.push(WireContent {
            role: Some("user".to_string()),
            parts: vec![WirePart { text: message.to_string() }],
        });

        GenerateContentRequest {
            contents,
            system_instruction: WireContent {
                role: None,
                parts: vec![WirePart { text: SYSTEM_INSTRUCTION.to_string() }],
            },
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                top_p: self.config.top_p,
            },
        }
    }
}

#[async_trait]
impl ChatModel for GeminiChatClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn reply(&self, history: &[ChatMessage], message: &str) -> Result<String> {
        let request = self.build_request(history, message);

        let response = self
            .client
            .post(self.api_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| FiloError::Chat(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FiloError::Chat(format!("API error ({}): {}", status, body)));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| FiloError::Chat(format!("Failed to parse response: {}", e)))?;

        let text = parsed
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content.parts.iter().map(|p| p.text.as_str()).collect::<Vec<_>>().join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            tracing::warn!(model = %self.config.model, "Model returned no text");
            return Ok(EMPTY_REPLY.to_string());
        }

        Ok(text)
    }
}
