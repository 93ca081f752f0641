//! Error types for the careline gateway

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the careline gateway
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Messaging channel error (WhatsApp Graph API)
    #[error("channel error: {0}")]
    Channel(String),

    /// Media fetch/download error
    #[error("media error: {0}")]
    Media(String),

    /// Audio transcription error
    #[error("transcription error: {0}")]
    Transcription(String),

    /// Chat model error
    #[error("chat model error: {0}")]
    ChatModel(String),

    /// Embedding error
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Vector search error
    #[error("search error: {0}")]
    Search(String),

    /// Translation error
    #[error("translation error: {0}")]
    Translation(String),

    /// Model reply did not contain the expected `<response>` tags
    #[error("model reply missing response tags")]
    MalformedReply,

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
