//! Language detection and query translation
//!
//! Detection is local. Translation is a remote call used to bring
//! non-English queries into English before embedding, since the knowledge
//! collections are English; the generation prompt still answers in the
//! user's language.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use whatlang::Lang;

use crate::{Error, Result};

/// Detect the ISO 639-1 language code of a query
///
/// Inconclusive detection defaults to English.
#[must_use]
pub fn detect_lang(text: &str) -> &'static str {
    whatlang::detect_lang(text).map_or("en", iso639_1)
}

/// Map a detected language to its two-letter code
///
/// Covers the languages the assistant serves; anything else falls back to
/// English so retrieval proceeds unmodified.
fn iso639_1(lang: Lang) -> &'static str {
    match lang {
        Lang::Cmn => "zh",
        Lang::Tam => "ta",
        Lang::Ind => "ms",
        Lang::Hin => "hi",
        Lang::Ben => "bn",
        Lang::Spa => "es",
        Lang::Fra => "fr",
        _ => "en",
    }
}

/// A hosted text translation service
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` between two ISO 639-1 language codes
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String>;
}

/// HTTP translation client
pub struct TranslateClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl TranslateClient {
    /// Create a new translation client
    #[must_use]
    pub fn new(base_url: String, api_key: SecretString) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    text: &'a str,
    source_language: &'a str,
    target_language: &'a str,
}

#[derive(Deserialize)]
struct TranslateResponse {
    translated_text: String,
}

#[async_trait]
impl Translator for TranslateClient {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let url = format!("{}/translate", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&TranslateRequest {
                text,
                source_language: source,
                target_language: target,
            })
            .send()
            .await
            .map_err(|e| Error::Translation(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Translation(format!("API error {status}: {body}")));
        }

        let result: TranslateResponse = response
            .json()
            .await
            .map_err(|e| Error::Translation(format!("failed to parse response: {e}")))?;

        Ok(result.translated_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_english() {
        assert_eq!(
            detect_lang("Where is the nearest food bank in my neighbourhood?"),
            "en"
        );
    }

    #[test]
    fn test_detects_chinese() {
        assert_eq!(detect_lang("最近的食品银行在哪里？我想申请食物援助。"), "zh");
    }

    #[test]
    fn test_detects_tamil() {
        assert_eq!(
            detect_lang("அருகிலுள்ள உணவு வங்கி எங்கே இருக்கிறது என்று சொல்லுங்கள்"),
            "ta"
        );
    }

    #[test]
    fn test_empty_input_defaults_to_english() {
        assert_eq!(detect_lang(""), "en");
    }
}
