//! Shared test utilities: scripted service mocks and a router builder

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use careline_gateway::api::{ApiServer, ApiState};
use careline_gateway::channels::{Channel, OutgoingMessage};
use careline_gateway::llm::ChatModel;
use careline_gateway::media::Transcriber;
use careline_gateway::retrieval::Retriever;
use careline_gateway::{Error, Intent, Pipeline, Result};

/// Verification token wired into every test router
pub const TEST_VERIFY_TOKEN: &str = "test-verify-token";

/// Channel that records outbound messages instead of hitting the Graph API
pub struct MockChannel {
    /// Messages passed to `send`, in order
    pub sent: Mutex<Vec<OutgoingMessage>>,
    /// Bytes and MIME type returned from `download_media`; `None` fails
    pub media: Option<(Vec<u8>, String)>,
}

impl MockChannel {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            media: None,
        })
    }

    #[must_use]
    pub fn with_media(bytes: &[u8], mime_type: &str) -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            media: Some((bytes.to_vec(), mime_type.to_string())),
        })
    }

    /// Snapshot of everything sent so far
    pub fn sent_messages(&self) -> Vec<OutgoingMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Channel for MockChannel {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn send(&self, message: OutgoingMessage) -> Result<()> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }

    async fn download_media(&self, _media_id: &str) -> Result<(Vec<u8>, String)> {
        self.media
            .clone()
            .ok_or_else(|| Error::Media("media not found".to_string()))
    }
}

/// Chat model returning scripted replies in order
///
/// The pipeline calls the model twice per turn: intent label first, then
/// the tagged reply.
pub struct ScriptedChat {
    replies: Mutex<VecDeque<String>>,
}

impl ScriptedChat {
    #[must_use]
    pub fn new(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().map(ToString::to_string).collect()),
        })
    }
}

#[async_trait]
impl ChatModel for ScriptedChat {
    async fn complete(&self, _system: &str, _prompt: &str) -> Result<String> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::ChatModel("script exhausted".to_string()))
    }
}

/// Retriever returning canned snippets and recording its calls
pub struct StubRetriever {
    pub calls: Mutex<Vec<(Intent, String)>>,
    snippets: Vec<String>,
}

impl StubRetriever {
    #[must_use]
    pub fn new(snippets: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            snippets: snippets.iter().map(ToString::to_string).collect(),
        })
    }
}

#[async_trait]
impl Retriever for StubRetriever {
    async fn retrieve(&self, intent: Intent, query: &str) -> Result<Vec<String>> {
        self.calls.lock().unwrap().push((intent, query.to_string()));
        if intent == Intent::Other {
            Ok(Vec::new())
        } else {
            Ok(self.snippets.clone())
        }
    }
}

/// Transcriber returning a fixed transcript; `None` fails
pub struct MockTranscriber {
    transcript: Option<String>,
}

impl MockTranscriber {
    #[must_use]
    pub fn new(transcript: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            transcript: transcript.map(ToString::to_string),
        })
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, _audio: &[u8], _mime_type: &str) -> Result<String> {
        self.transcript
            .clone()
            .ok_or_else(|| Error::Transcription("transcription failed".to_string()))
    }
}

/// Build a test router wired to the given mocks
#[must_use]
pub fn build_test_router(
    channel: Arc<MockChannel>,
    chat: Arc<ScriptedChat>,
    retriever: Arc<StubRetriever>,
    transcriber: Arc<MockTranscriber>,
) -> axum::Router {
    let pipeline = Arc::new(Pipeline::new(chat, retriever, None));

    let state = Arc::new(ApiState {
        verify_token: TEST_VERIFY_TOKEN.to_string(),
        channel,
        pipeline,
        transcriber,
    });

    ApiServer::router(state)
}
