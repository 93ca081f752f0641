//! Careline Gateway - WhatsApp gateway for a grounded social-support assistant
//!
//! Receives WhatsApp Business webhook events, runs a grounded
//! conversational pipeline (intent classification, knowledge retrieval,
//! reply generation) against hosted model services, and sends the reply
//! back through the WhatsApp send API.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │              WhatsApp Cloud API                   │
//! │        webhook events  │  send endpoint          │
//! └───────────┬────────────────────▲─────────────────┘
//!             │                    │
//! ┌───────────▼────────────────────┴─────────────────┐
//! │               Careline Gateway                    │
//! │  Ingress  │  Transcription  │  Pipeline  │ Egress│
//! └───────────┬──────────────────────────────────────┘
//!             │
//! ┌───────────▼──────────────────────────────────────┐
//! │            Hosted model services                  │
//! │  Chat  │  Embeddings  │  Vector search  │ Translate
//! └──────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod channels;
pub mod config;
pub mod error;
pub mod intent;
pub mod language;
pub mod llm;
pub mod media;
pub mod pipeline;
pub mod prompt;
pub mod retrieval;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use intent::Intent;
pub use pipeline::{ChatState, Pipeline};
pub use store::{ConversationStore, Role, Turn, MAX_TURNS};
