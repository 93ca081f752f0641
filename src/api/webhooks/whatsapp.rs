//! WhatsApp webhook handlers
//!
//! GET: subscription verification handshake (echo the challenge when the
//! token matches). POST: inbound message events. Once past verification the
//! webhook always acknowledges 200 — every internal failure is absorbed
//! into a fixed natural-language apology sent back to the user, matching
//! the provider's expectation of prompt acknowledgment.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::ApiState;
use crate::channels::{OutgoingMessage, WhatsAppMessage};

/// Reply for message types the bot cannot handle
const REPLY_UNSUPPORTED_TYPE: &str =
    "I can process text and voice messages. Please send one of those formats.";

/// Apology when the turn pipeline fails
const APOLOGY_PIPELINE: &str =
    "I'm sorry, I'm having trouble processing your request right now.";

/// Apology when voice media cannot be fetched or downloaded
const APOLOGY_VOICE_DOWNLOAD: &str =
    "I couldn't process your voice message. Please try again.";

/// Apology for any other voice processing failure
const APOLOGY_VOICE_GENERIC: &str =
    "I had trouble processing your voice message. Please try again or send a text message.";

/// Query parameters of the verification handshake
#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    /// Always `subscribe` for a valid handshake
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    /// Shared secret configured with the provider
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    /// Random string to echo back on success
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Acknowledgment body for event deliveries
#[derive(Serialize)]
pub struct EventAck {
    pub status: &'static str,
}

/// Handle the webhook verification handshake
///
/// Responds 200 with the raw challenge when the mode is `subscribe` and the
/// token matches the configured secret, else 403.
pub async fn verify(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<VerifyParams>,
) -> impl IntoResponse {
    let token_matches = params.mode.as_deref() == Some("subscribe")
        && params.verify_token.as_deref() == Some(state.verify_token.as_str());

    if token_matches {
        tracing::info!("webhook verified successfully");
        (StatusCode::OK, params.challenge.unwrap_or_default())
    } else {
        tracing::warn!("webhook verification failed");
        (StatusCode::FORBIDDEN, "Verification failed".to_string())
    }
}

/// Handle an inbound webhook event delivery
///
/// Status-only deliveries (no messages) are acknowledged and ignored.
pub async fn receive_event(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<crate::channels::WhatsAppWebhook>,
) -> (StatusCode, Json<EventAck>) {
    for message in payload.messages() {
        let reply = reply_for(&state, message).await;

        tracing::info!(to = %message.from, "sending reply");
        if let Err(e) = state
            .channel
            .send(OutgoingMessage::text(&message.from, reply))
            .await
        {
            tracing::error!(to = %message.from, error = %e, "failed to send reply");
        }
    }

    (StatusCode::OK, Json(EventAck { status: "ok" }))
}

/// Produce the reply text for one inbound message
///
/// Never fails: every pipeline or media error becomes a fixed apology.
async fn reply_for(state: &ApiState, message: &WhatsAppMessage) -> String {
    match message.message_type.as_str() {
        "text" => {
            let Some(text) = &message.text else {
                tracing::warn!("text message without text body");
                return APOLOGY_PIPELINE.to_string();
            };
            tracing::info!(from = %message.from, "received text message");
            run_pipeline(state, &message.from, &text.body).await
        }
        "audio" | "voice" => {
            tracing::info!(from = %message.from, "received voice message");
            let Some(audio) = &message.audio else {
                tracing::warn!("audio message without audio payload");
                return APOLOGY_VOICE_GENERIC.to_string();
            };
            process_voice(state, &message.from, &audio.id).await
        }
        other => {
            tracing::info!(message_type = other, "received unsupported message type");
            REPLY_UNSUPPORTED_TYPE.to_string()
        }
    }
}

/// Run the turn pipeline, absorbing failures into the fixed apology
async fn run_pipeline(state: &ApiState, sender: &str, query: &str) -> String {
    match state.pipeline.handle_turn(sender, query).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!(sender, error = %e, "pipeline failed");
            APOLOGY_PIPELINE.to_string()
        }
    }
}

/// Transcribe a voice message and feed the transcript through the pipeline
async fn process_voice(state: &ApiState, sender: &str, media_id: &str) -> String {
    let (audio, mime_type) = match state.channel.download_media(media_id).await {
        Ok(media) => media,
        Err(e) => {
            tracing::error!(media_id, error = %e, "failed to download voice media");
            return APOLOGY_VOICE_DOWNLOAD.to_string();
        }
    };

    let transcript = match state.transcriber.transcribe(&audio, &mime_type).await {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(media_id, error = %e, "failed to transcribe voice message");
            return APOLOGY_VOICE_GENERIC.to_string();
        }
    };

    run_pipeline(state, sender, &transcript).await
}
