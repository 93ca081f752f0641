//! Voice message integration tests

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

mod common;
use common::{build_test_router, MockChannel, MockTranscriber, ScriptedChat, StubRetriever};

/// A webhook delivery wrapping one audio message
fn audio_delivery(media_id: &str) -> serde_json::Value {
    serde_json::json!({
        "entry": [{
            "changes": [{
                "value": {
                    "messages": [{
                        "from": "6598765432",
                        "id": "wamid.voice",
                        "type": "audio",
                        "audio": { "id": media_id, "mime_type": "audio/ogg" }
                    }]
                }
            }]
        }]
    })
}

fn webhook_post(payload: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_voice_message_transcribed_and_answered() {
    let channel = MockChannel::with_media(b"fake ogg bytes", "audio/ogg");
    let chat = ScriptedChat::new(&[
        "healthcare",
        "<response>You can visit a polyclinic near you.</response>",
    ]);
    let transcriber = MockTranscriber::new(Some("Where can I see a doctor cheaply?"));
    let app = build_test_router(
        channel.clone(),
        chat,
        StubRetriever::new(&["Polyclinics offer subsidised care."]),
        transcriber,
    );

    let response = app
        .oneshot(webhook_post(&audio_delivery("media-123")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let sent = channel.sent_messages();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "6598765432");
    assert_eq!(sent[0].content, "You can visit a polyclinic near you.");
}

#[tokio::test]
async fn test_media_download_failure_sends_download_apology() {
    // MockChannel::new has no media configured, so download_media fails.
    let channel = MockChannel::new();
    let app = build_test_router(
        channel.clone(),
        ScriptedChat::new(&[]),
        StubRetriever::new(&[]),
        MockTranscriber::new(Some("unused")),
    );

    let response = app
        .oneshot(webhook_post(&audio_delivery("missing-media")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let sent = channel.sent_messages();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].content,
        "I couldn't process your voice message. Please try again."
    );
}

#[tokio::test]
async fn test_transcription_failure_sends_generic_apology() {
    let channel = MockChannel::with_media(b"fake ogg bytes", "audio/ogg");
    let app = build_test_router(
        channel.clone(),
        ScriptedChat::new(&[]),
        StubRetriever::new(&[]),
        MockTranscriber::new(None),
    );

    let response = app
        .oneshot(webhook_post(&audio_delivery("media-123")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let sent = channel.sent_messages();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].content,
        "I had trouble processing your voice message. Please try again or send a text message."
    );
}

#[tokio::test]
async fn test_audio_without_payload_sends_generic_apology() {
    let channel = MockChannel::new();
    let app = build_test_router(
        channel.clone(),
        ScriptedChat::new(&[]),
        StubRetriever::new(&[]),
        MockTranscriber::new(None),
    );

    let payload = serde_json::json!({
        "entry": [{
            "changes": [{
                "value": {
                    "messages": [{
                        "from": "6598765432",
                        "id": "wamid.voice",
                        "type": "audio"
                    }]
                }
            }]
        }]
    });
    let response = app.oneshot(webhook_post(&payload)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let sent = channel.sent_messages();
    assert_eq!(
        sent[0].content,
        "I had trouble processing your voice message. Please try again or send a text message."
    );
}
