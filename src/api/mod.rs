//! HTTP API server for the careline gateway

pub mod health;
pub mod webhooks;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::channels::Channel;
use crate::media::Transcriber;
use crate::pipeline::Pipeline;
use crate::{Error, Result};

/// Shared state for API handlers
pub struct ApiState {
    /// Webhook verification token
    pub verify_token: String,
    /// Outbound messaging channel (and media source)
    pub channel: Arc<dyn Channel>,
    /// Conversational turn pipeline
    pub pipeline: Arc<Pipeline>,
    /// Voice transcription adapter
    pub transcriber: Arc<dyn Transcriber>,
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
}

impl ApiServer {
    /// Create a new API server
    #[must_use]
    pub fn new(state: Arc<ApiState>, port: u16) -> Self {
        Self { state, port }
    }

    /// Build the router with all routes
    #[must_use]
    pub fn router(state: Arc<ApiState>) -> Router {
        Router::new()
            .merge(webhooks::router(state))
            .merge(health::router())
            .layer(TraceLayer::new_for_http())
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns error if the server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(port = self.port, "API server listening");

        axum::serve(listener, Self::router(self.state))
            .await
            .map_err(|e| Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }
}
