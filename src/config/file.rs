//! TOML configuration file loading
//!
//! Supports `~/.config/careline/careline.toml` (or `./careline.toml`) as a
//! persistent config source. All fields are optional — the file is a
//! partial overlay underneath environment variables.

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    /// Webhook verification token
    #[serde(default)]
    pub verify_token: Option<String>,

    /// WhatsApp Business API configuration
    #[serde(default)]
    pub whatsapp: WhatsAppFileConfig,

    /// Chat/transcription model service configuration
    #[serde(default)]
    pub model: ModelFileConfig,

    /// Embeddings service configuration
    #[serde(default)]
    pub embeddings: EmbeddingsFileConfig,

    /// Vector search service configuration
    #[serde(default)]
    pub search: SearchFileConfig,

    /// Translation service configuration
    #[serde(default)]
    pub translate: TranslateFileConfig,
}

/// WhatsApp Business API configuration
#[derive(Debug, Default, Deserialize)]
pub struct WhatsAppFileConfig {
    /// Access token for the Graph API
    pub access_token: Option<String>,

    /// Phone number ID registered with WhatsApp Business
    pub phone_number_id: Option<String>,
}

/// Model service configuration
#[derive(Debug, Default, Deserialize)]
pub struct ModelFileConfig {
    /// Base URL of the messages-style model API
    pub base_url: Option<String>,

    /// API key
    pub api_key: Option<String>,

    /// Chat model identifier
    pub chat_model: Option<String>,

    /// Multimodal transcription model identifier
    pub transcribe_model: Option<String>,

    /// Max tokens per completion
    pub max_tokens: Option<u32>,
}

/// Embeddings service configuration
#[derive(Debug, Default, Deserialize)]
pub struct EmbeddingsFileConfig {
    /// Base URL of the embeddings API
    pub base_url: Option<String>,

    /// API key
    pub api_key: Option<String>,

    /// Embedding model identifier
    pub model: Option<String>,
}

/// Vector search service configuration
#[derive(Debug, Default, Deserialize)]
pub struct SearchFileConfig {
    /// Base URL of the search service
    pub base_url: Option<String>,

    /// API key
    pub api_key: Option<String>,

    /// Financial-aid knowledge base index
    pub finance_index: Option<String>,

    /// Healthcare knowledge base index
    pub healthcare_index: Option<String>,

    /// Food-security knowledge base index
    pub food_index: Option<String>,
}

/// Translation service configuration
#[derive(Debug, Default, Deserialize)]
pub struct TranslateFileConfig {
    /// Base URL of the translation API
    pub base_url: Option<String>,

    /// API key
    pub api_key: Option<String>,
}

/// Candidate config file paths, highest priority first
fn config_file_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("careline.toml")];
    if let Some(dirs) = directories::BaseDirs::new() {
        paths.push(dirs.config_dir().join("careline").join("careline.toml"));
    }
    paths
}

/// Load the first config file found, or defaults if none exists
///
/// A file that exists but fails to parse is logged and skipped.
#[must_use]
pub fn load_config_file() -> ConfigFile {
    for path in config_file_paths() {
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "loaded config file");
                    return config;
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "failed to parse config file, skipping"
                    );
                }
            },
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to read config file"
                );
            }
        }
    }

    ConfigFile::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_partial_file() {
        let toml = r#"
            verify_token = "secret"

            [search]
            base_url = "https://search.example.test"
            food_index = "food-kb"
        "#;
        let config: ConfigFile = toml::from_str(toml).unwrap();
        assert_eq!(config.verify_token.as_deref(), Some("secret"));
        assert_eq!(
            config.search.base_url.as_deref(),
            Some("https://search.example.test")
        );
        assert_eq!(config.search.food_index.as_deref(), Some("food-kb"));
        assert!(config.whatsapp.access_token.is_none());
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let config: ConfigFile = toml::from_str("").unwrap();
        assert!(config.verify_token.is_none());
        assert!(config.model.base_url.is_none());
    }
}
