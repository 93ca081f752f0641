//! Document retrieval against topic-specific knowledge collections
//!
//! Embeds the query remotely, then runs a dense-vector similarity search
//! against one of three fixed collections selected by intent. The `other`
//! intent queries nothing and yields empty context.

mod embedder;

pub use embedder::Embedder;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::intent::Intent;
use crate::{Error, Result};

/// Number of nearest-neighbor snippets returned per query
const TOP_K: usize = 3;

/// Retrieves supporting text snippets for a classified query
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Return up to three text snippets for the intent's collection, best
    /// match first; empty for [`Intent::Other`]
    async fn retrieve(&self, intent: Intent, query: &str) -> Result<Vec<String>>;
}

/// Names of the three document collections in the vector store
#[derive(Debug, Clone)]
pub struct Collections {
    /// Financial-aid knowledge base index
    pub finance: String,
    /// Healthcare knowledge base index
    pub healthcare: String,
    /// Food-security knowledge base index
    pub food: String,
}

impl Collections {
    /// Collection to search for an intent; `None` for `Other`
    #[must_use]
    pub fn for_intent(&self, intent: Intent) -> Option<&str> {
        match intent {
            Intent::FinancialAid => Some(&self.finance),
            Intent::Healthcare => Some(&self.healthcare),
            Intent::FoodSecurity => Some(&self.food),
            Intent::Other => None,
        }
    }
}

/// HTTP retriever: remote embeddings + script-score vector search
pub struct HttpRetriever {
    embedder: Embedder,
    search: SearchClient,
    collections: Collections,
}

impl HttpRetriever {
    /// Create a new retriever
    #[must_use]
    pub fn new(embedder: Embedder, search: SearchClient, collections: Collections) -> Self {
        Self {
            embedder,
            search,
            collections,
        }
    }
}

#[async_trait]
impl Retriever for HttpRetriever {
    async fn retrieve(&self, intent: Intent, query: &str) -> Result<Vec<String>> {
        let Some(collection) = self.collections.for_intent(intent) else {
            return Ok(Vec::new());
        };

        let embedding = self.embedder.embed(query).await?;
        let snippets = self.search.similarity_search(collection, &embedding).await?;

        tracing::debug!(
            intent = %intent,
            collection,
            hits = snippets.len(),
            "retrieved knowledge snippets"
        );

        Ok(snippets)
    }
}

/// Similarity-search client for the hosted vector store
///
/// Speaks an Elasticsearch-style `_search` API with a script-score cosine
/// query over a `vector` field; documents carry their snippet in `text`.
pub struct SearchClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl SearchClient {
    /// Create a new search client
    #[must_use]
    pub fn new(base_url: String, api_key: SecretString) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }

    /// Top-k nearest neighbors of `embedding` in `index`, returning each
    /// hit's text field
    ///
    /// # Errors
    ///
    /// Returns error if the search request fails
    pub async fn similarity_search(&self, index: &str, embedding: &[f32]) -> Result<Vec<String>> {
        let url = format!("{}/{index}/_search", self.base_url.trim_end_matches('/'));

        let body = serde_json::json!({
            "size": TOP_K,
            "query": {
                "script_score": {
                    "query": { "match_all": {} },
                    "script": {
                        "source": "cosineSimilarity(params.query_vector, 'vector') + 1.0",
                        "params": { "query_vector": embedding },
                    },
                },
            },
        });

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("ApiKey {}", self.api_key.expose_secret()),
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Search(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Search(format!("API error {status}: {body}")));
        }

        let result: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::Search(format!("failed to parse response: {e}")))?;

        Ok(result
            .hits
            .hits
            .into_iter()
            .map(|hit| hit.source.text)
            .collect())
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    hits: SearchHits,
}

#[derive(Deserialize)]
struct SearchHits {
    hits: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    #[serde(rename = "_source")]
    source: SearchSource,
}

#[derive(Deserialize)]
struct SearchSource {
    text: String,
}
