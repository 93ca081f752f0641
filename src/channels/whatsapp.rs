//! `WhatsApp` channel adapter
//!
//! Uses the `WhatsApp` Business Cloud API for sending messages and
//! fetching media. Incoming messages arrive through the Webhooks API
//! handled in `api::webhooks`.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::{Channel, OutgoingMessage};
use crate::{Error, Result};

/// Graph API version used for all endpoints
const GRAPH_API_VERSION: &str = "v19.0";

/// `WhatsApp` channel adapter
pub struct WhatsAppChannel {
    /// `WhatsApp` Business API access token
    access_token: SecretString,
    /// Phone number ID for sending messages
    phone_number_id: String,
    client: Client,
}

impl WhatsAppChannel {
    /// Create a new `WhatsApp` channel adapter
    ///
    /// # Errors
    ///
    /// Returns error if the token or phone number ID is empty
    pub fn new(access_token: SecretString, phone_number_id: String) -> Result<Self> {
        if access_token.expose_secret().is_empty() {
            return Err(Error::Channel("WhatsApp access token required".to_string()));
        }
        if phone_number_id.is_empty() {
            return Err(Error::Channel(
                "WhatsApp phone number ID required".to_string(),
            ));
        }

        Ok(Self {
            access_token,
            phone_number_id,
            client: Client::new(),
        })
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token.expose_secret())
    }

    /// Send a text message to a `WhatsApp` number
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails
    pub async fn send_text(&self, to: &str, text: &str) -> Result<()> {
        let url = format!(
            "https://graph.facebook.com/{GRAPH_API_VERSION}/{}/messages",
            self.phone_number_id
        );

        let body = serde_json::json!({
            "messaging_product": "whatsapp",
            "to": to,
            "type": "text",
            "text": { "body": text },
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.bearer())
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Channel(format!("WhatsApp API error: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Channel(format!(
                "WhatsApp API error: {status} - {body}"
            )));
        }

        tracing::debug!(to, "WhatsApp message sent");
        Ok(())
    }

    /// Resolve a media ID to its short-lived download URL
    async fn fetch_media_url(&self, media_id: &str) -> Result<(String, Option<String>)> {
        let url = format!("https://graph.facebook.com/{GRAPH_API_VERSION}/{media_id}");

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.bearer())
            .send()
            .await
            .map_err(|e| Error::Media(format!("media URL request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Media(format!(
                "media URL error: {status} - {body}"
            )));
        }

        let media: MediaUrlResponse = response
            .json()
            .await
            .map_err(|e| Error::Media(format!("failed to parse media response: {e}")))?;

        Ok((media.url, media.mime_type))
    }
}

#[async_trait]
impl Channel for WhatsAppChannel {
    fn name(&self) -> &'static str {
        "whatsapp"
    }

    async fn send(&self, message: OutgoingMessage) -> Result<()> {
        self.send_text(&message.to, &message.content).await
    }

    async fn download_media(&self, media_id: &str) -> Result<(Vec<u8>, String)> {
        let (media_url, mime_type) = self.fetch_media_url(media_id).await?;

        let response = self
            .client
            .get(&media_url)
            .header("Authorization", self.bearer())
            .send()
            .await
            .map_err(|e| Error::Media(format!("media download failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Media(format!(
                "media download error: {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Media(format!("media download failed: {e}")))?;

        Ok((
            bytes.to_vec(),
            mime_type.unwrap_or_else(|| "audio/ogg".to_string()),
        ))
    }
}

/// Media metadata returned for a media ID
#[derive(Debug, Deserialize)]
struct MediaUrlResponse {
    url: String,
    mime_type: Option<String>,
}

/// `WhatsApp` webhook payload from the Cloud API
#[derive(Debug, Deserialize)]
pub struct WhatsAppWebhook {
    /// Webhook entries
    #[serde(default)]
    pub entry: Vec<WhatsAppWebhookEntry>,
}

impl WhatsAppWebhook {
    /// Iterate over all messages in the payload, in delivery order
    pub fn messages(&self) -> impl Iterator<Item = &WhatsAppMessage> {
        self.entry
            .iter()
            .flat_map(|entry| &entry.changes)
            .filter_map(|change| change.value.messages.as_ref())
            .flatten()
    }
}

/// `WhatsApp` webhook entry
#[derive(Debug, Deserialize)]
pub struct WhatsAppWebhookEntry {
    /// Changes in this entry
    #[serde(default)]
    pub changes: Vec<WhatsAppWebhookChange>,
}

/// `WhatsApp` webhook change
#[derive(Debug, Deserialize)]
pub struct WhatsAppWebhookChange {
    /// The change value
    pub value: WhatsAppWebhookValue,
}

/// `WhatsApp` webhook value containing messages
///
/// Status-only deliveries (sent/read receipts) have no `messages` array.
#[derive(Debug, Deserialize)]
pub struct WhatsAppWebhookValue {
    /// Incoming messages (if any)
    pub messages: Option<Vec<WhatsAppMessage>>,
}

/// `WhatsApp` message
#[derive(Debug, Deserialize)]
pub struct WhatsAppMessage {
    /// Sender phone number
    pub from: String,
    /// Message ID
    pub id: String,
    /// Message type
    #[serde(rename = "type")]
    pub message_type: String,
    /// Text content (for text messages)
    pub text: Option<WhatsAppTextContent>,
    /// Audio content (voice notes arrive as audio)
    pub audio: Option<WhatsAppMedia>,
}

/// `WhatsApp` text message content
#[derive(Debug, Deserialize)]
pub struct WhatsAppTextContent {
    /// Message body
    pub body: String,
}

/// `WhatsApp` media object
#[derive(Debug, Deserialize)]
pub struct WhatsAppMedia {
    /// Media ID (use to fetch the download URL)
    pub id: String,
    /// MIME type
    pub mime_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_credentials_rejected() {
        assert!(WhatsAppChannel::new(
            SecretString::from(String::new()),
            "123".to_string()
        )
        .is_err());
        assert!(
            WhatsAppChannel::new(SecretString::from("tok".to_string()), String::new()).is_err()
        );
    }

    #[test]
    fn test_deserializes_text_webhook() {
        let json = r#"{
            "entry": [{
                "changes": [{
                    "value": {
                        "messages": [{
                            "from": "6598765432",
                            "id": "wamid.abc",
                            "type": "text",
                            "text": { "body": "hello" }
                        }]
                    }
                }]
            }]
        }"#;
        let payload: WhatsAppWebhook = serde_json::from_str(json).unwrap();
        let messages: Vec<_> = payload.messages().collect();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].from, "6598765432");
        assert_eq!(messages[0].message_type, "text");
        assert_eq!(messages[0].text.as_ref().unwrap().body, "hello");
    }

    #[test]
    fn test_deserializes_audio_webhook() {
        let json = r#"{
            "entry": [{
                "changes": [{
                    "value": {
                        "messages": [{
                            "from": "6598765432",
                            "id": "wamid.def",
                            "type": "audio",
                            "audio": { "id": "media123", "mime_type": "audio/ogg" }
                        }]
                    }
                }]
            }]
        }"#;
        let payload: WhatsAppWebhook = serde_json::from_str(json).unwrap();
        let messages: Vec<_> = payload.messages().collect();
        assert_eq!(messages[0].message_type, "audio");
        assert_eq!(messages[0].audio.as_ref().unwrap().id, "media123");
    }

    #[test]
    fn test_status_only_delivery_has_no_messages() {
        let json = r#"{ "entry": [{ "changes": [{ "value": {} }] }] }"#;
        let payload: WhatsAppWebhook = serde_json::from_str(json).unwrap();
        assert_eq!(payload.messages().count(), 0);
    }
}
