//! Webhook endpoints for channel integrations

use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use super::ApiState;

pub mod whatsapp;

/// Build the webhooks router
///
/// GET handles the subscription verification handshake, POST receives
/// message events. Any other method on the route is a 405.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route(
            "/webhook",
            get(whatsapp::verify).post(whatsapp::receive_event),
        )
        .with_state(state)
}
