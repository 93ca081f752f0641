//! Configuration management for the careline gateway
//!
//! Layering is env > TOML file > default. Tokens and API keys are held as
//! [`SecretString`] so they never end up in debug output.

pub mod file;

use secrecy::SecretString;

use crate::{Error, Result};

/// Careline gateway configuration
#[derive(Debug)]
pub struct Config {
    /// Webhook verification token for the subscription handshake
    pub verify_token: String,

    /// WhatsApp Business API credentials
    pub whatsapp: WhatsAppConfig,

    /// Chat/transcription model service
    pub model: ModelConfig,

    /// Embeddings service
    pub embeddings: EmbeddingsConfig,

    /// Vector search service and collection names
    pub search: SearchConfig,

    /// Translation service; `None` disables query translation
    pub translate: Option<TranslateConfig>,
}

/// WhatsApp Business API credentials
#[derive(Debug)]
pub struct WhatsAppConfig {
    /// Graph API access token
    pub access_token: SecretString,

    /// Phone number ID for the send endpoint
    pub phone_number_id: String,
}

/// Model service configuration (chat + multimodal transcription)
#[derive(Debug)]
pub struct ModelConfig {
    /// Base URL of the messages-style API
    pub base_url: String,

    /// API key
    pub api_key: SecretString,

    /// Chat model identifier
    pub chat_model: String,

    /// Multimodal transcription model identifier
    pub transcribe_model: String,

    /// Max tokens per completion
    pub max_tokens: u32,
}

/// Embeddings service configuration
#[derive(Debug)]
pub struct EmbeddingsConfig {
    /// Base URL of the embeddings API
    pub base_url: String,

    /// API key
    pub api_key: SecretString,

    /// Embedding model identifier
    pub model: String,
}

/// Vector search service configuration
#[derive(Debug)]
pub struct SearchConfig {
    /// Base URL of the search service
    pub base_url: String,

    /// API key
    pub api_key: SecretString,

    /// Financial-aid knowledge base index
    pub finance_index: String,

    /// Healthcare knowledge base index
    pub healthcare_index: String,

    /// Food-security knowledge base index
    pub food_index: String,
}

/// Translation service configuration
#[derive(Debug)]
pub struct TranslateConfig {
    /// Base URL of the translation API
    pub base_url: String,

    /// API key
    pub api_key: SecretString,
}

/// Env var, falling back to a TOML value
fn env_or(var: &str, file_value: Option<String>) -> Option<String> {
    std::env::var(var).ok().or(file_value)
}

/// Required value: env var, TOML value, else a configuration error
fn required(var: &str, file_value: Option<String>) -> Result<String> {
    env_or(var, file_value).ok_or_else(|| Error::Config(format!("{var} is required")))
}

impl Config {
    /// Load configuration from the environment and optional TOML file
    ///
    /// # Errors
    ///
    /// Returns error if a required credential is missing
    pub fn load() -> Result<Self> {
        let fc = file::load_config_file();

        let verify_token = required("VERIFY_TOKEN", fc.verify_token)?;

        let whatsapp = WhatsAppConfig {
            access_token: required("WHATSAPP_TOKEN", fc.whatsapp.access_token)?.into(),
            phone_number_id: required("WHATSAPP_PHONE_ID", fc.whatsapp.phone_number_id)?,
        };

        let model = ModelConfig {
            base_url: env_or("MODEL_API_URL", fc.model.base_url)
                .unwrap_or_else(|| "https://api.anthropic.com".to_string()),
            api_key: required("MODEL_API_KEY", fc.model.api_key)?.into(),
            chat_model: env_or("CHAT_MODEL_ID", fc.model.chat_model)
                .unwrap_or_else(|| "claude-sonnet-4-20250514".to_string()),
            transcribe_model: env_or("TRANSCRIBE_MODEL_ID", fc.model.transcribe_model)
                .unwrap_or_else(|| "claude-sonnet-4-20250514".to_string()),
            max_tokens: std::env::var("MODEL_MAX_TOKENS")
                .ok()
                .and_then(|s| s.parse().ok())
                .or(fc.model.max_tokens)
                .unwrap_or(1024),
        };

        let embeddings = EmbeddingsConfig {
            base_url: env_or("EMBEDDINGS_API_URL", fc.embeddings.base_url)
                .unwrap_or_else(|| "https://api.openai.com".to_string()),
            api_key: required("EMBEDDINGS_API_KEY", fc.embeddings.api_key)?.into(),
            model: env_or("EMBEDDING_MODEL_ID", fc.embeddings.model)
                .unwrap_or_else(|| "text-embedding-3-small".to_string()),
        };

        let search = SearchConfig {
            base_url: required("SEARCH_URL", fc.search.base_url)?,
            api_key: required("SEARCH_API_KEY", fc.search.api_key)?.into(),
            finance_index: required("FINANCE_KB_INDEX", fc.search.finance_index)?,
            healthcare_index: required("HEALTHCARE_KB_INDEX", fc.search.healthcare_index)?,
            food_index: required("FOOD_KB_INDEX", fc.search.food_index)?,
        };

        // Translation is optional: both URL and key must be present
        let translate = match (
            env_or("TRANSLATE_API_URL", fc.translate.base_url),
            env_or("TRANSLATE_API_KEY", fc.translate.api_key),
        ) {
            (Some(base_url), Some(api_key)) => Some(TranslateConfig {
                base_url,
                api_key: api_key.into(),
            }),
            (Some(_), None) | (None, Some(_)) => {
                tracing::warn!(
                    "translation requires both TRANSLATE_API_URL and TRANSLATE_API_KEY, disabling"
                );
                None
            }
            (None, None) => None,
        };

        Ok(Self {
            verify_token,
            whatsapp,
            model,
            embeddings,
            search,
            translate,
        })
    }
}
