//! Query embedding via a hosted embeddings API

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};

use crate::{Error, Result};

/// Text embedder against an embeddings endpoint
#[derive(Debug)]
pub struct Embedder {
    client: Client,
    base_url: String,
    api_key: SecretString,
    model: String,
}

impl Embedder {
    /// Create a new embedder
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty
    pub fn new(base_url: String, api_key: SecretString, model: String) -> Result<Self> {
        if api_key.expose_secret().is_empty() {
            return Err(Error::Config("embeddings API key required".to_string()));
        }

        Ok(Self {
            client: Client::new(),
            base_url,
            api_key,
            model,
        })
    }

    /// Generate an embedding for a single query
    ///
    /// # Errors
    ///
    /// Returns error if the API call fails
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        #[derive(serde::Serialize)]
        struct EmbeddingRequest<'a> {
            model: &'a str,
            input: &'a str,
        }

        #[derive(serde::Deserialize)]
        struct EmbeddingResponse {
            data: Vec<EmbeddingData>,
        }

        #[derive(serde::Deserialize)]
        struct EmbeddingData {
            embedding: Vec<f32>,
        }

        let url = format!("{}/v1/embeddings", self.base_url.trim_end_matches('/'));
        let request = EmbeddingRequest {
            model: &self.model,
            input: text,
        };

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Embedding(format!("API error {status}: {body}")));
        }

        let result: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| Error::Embedding(format!("failed to parse response: {e}")))?;

        result
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| Error::Embedding("empty embedding response".to_string()))
    }
}
