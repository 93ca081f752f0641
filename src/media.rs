//! Voice message transcription
//!
//! Audio bytes are base64-encoded and sent to a multimodal model with a
//! fixed transcription instruction; the transcript comes back as the first
//! text block of the reply. No retry on failure.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::{Error, Result};

/// Fixed instruction sent alongside the audio payload
const TRANSCRIBE_INSTRUCTION: &str = "Please transcribe this audio message \
exactly as spoken. Maintain the original language whether it's English, \
Chinese, Tamil, or any other language.";

/// Converts an audio payload to text
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe audio bytes of the given MIME type
    async fn transcribe(&self, audio: &[u8], mime_type: &str) -> Result<String>;
}

/// HTTP transcriber against a multimodal messages-style endpoint
pub struct TranscribeClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
    model: String,
}

impl TranscribeClient {
    /// Create a new transcription client
    #[must_use]
    pub fn new(base_url: String, api_key: SecretString, model: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
            model,
        }
    }
}

#[async_trait]
impl Transcriber for TranscribeClient {
    async fn transcribe(&self, audio: &[u8], mime_type: &str) -> Result<String> {
        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));
        let audio_base64 = BASE64.encode(audio);

        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": 1024,
            "messages": [{
                "role": "user",
                "content": [
                    {
                        "type": "audio",
                        "source": {
                            "type": "base64",
                            "media_type": mime_type,
                            "data": audio_base64,
                        },
                    },
                    { "type": "text", "text": TRANSCRIBE_INSTRUCTION },
                ],
            }],
        });

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Transcription(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Transcription(format!(
                "API error: {status} - {body}"
            )));
        }

        let reply: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| Error::Transcription(format!("failed to parse response: {e}")))?;

        let transcript = reply
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| Error::Transcription("empty transcription response".to_string()))?;

        tracing::info!(chars = transcript.len(), "transcribed voice message");
        Ok(transcript)
    }
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_transcription_response() {
        let json = r#"{"content":[{"type":"text","text":"hello from a voice note"}]}"#;
        let reply: TranscriptionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            reply.content[0].text.as_deref(),
            Some("hello from a voice note")
        );
    }
}
