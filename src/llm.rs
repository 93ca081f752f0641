//! Chat model client
//!
//! One prompt in, text out. The remote service speaks a messages-style API:
//! a system string plus a single user message, replying with content blocks.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::{Error, Result};

/// A hosted chat-completion model
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Run one completion: system instructions + user prompt in, raw
    /// assistant text out. No retries, no streaming.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;
}

/// HTTP chat model client against a messages-style endpoint
pub struct ChatClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
    model: String,
    max_tokens: u32,
}

impl ChatClient {
    /// Create a new chat client
    #[must_use]
    pub fn new(base_url: String, api_key: SecretString, model: String, max_tokens: u32) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
            model,
            max_tokens,
        }
    }
}

#[async_trait]
impl ChatModel for ChatClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));

        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "system": system,
            "messages": [
                { "role": "user", "content": prompt }
            ],
        });

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::ChatModel(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ChatModel(format!("API error: {status} - {body}")));
        }

        let reply: MessagesResponse = response
            .json()
            .await
            .map_err(|e| Error::ChatModel(format!("failed to parse response: {e}")))?;

        reply
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| Error::ChatModel("empty model response".to_string()))
    }
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: Option<String>,
}
