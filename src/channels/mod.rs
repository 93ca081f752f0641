//! Messaging channel adapters
//!
//! The gateway serves one channel today (WhatsApp Business), behind a
//! trait so handlers and tests are not tied to the Graph API.

mod whatsapp;

use async_trait::async_trait;

pub use whatsapp::{
    WhatsAppChannel, WhatsAppMedia, WhatsAppMessage, WhatsAppTextContent, WhatsAppWebhook,
};

use crate::Result;

/// A reply to send back through the messaging provider
#[derive(Debug, Clone)]
pub struct OutgoingMessage {
    /// Recipient identifier (phone number for WhatsApp)
    pub to: String,
    /// Message text
    pub content: String,
}

impl OutgoingMessage {
    /// Create a text message
    #[must_use]
    pub fn text(to: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            content: content.into(),
        }
    }
}

/// Trait for messaging channel adapters
#[async_trait]
pub trait Channel: Send + Sync {
    /// Channel name for logging
    fn name(&self) -> &'static str;

    /// Send a message
    async fn send(&self, message: OutgoingMessage) -> Result<()>;

    /// Download a media object by provider media ID, returning the bytes
    /// and their MIME type
    async fn download_media(&self, media_id: &str) -> Result<(Vec<u8>, String)>;
}
