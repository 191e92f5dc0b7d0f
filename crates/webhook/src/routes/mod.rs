//! Route handlers for the webhook server.

pub mod health;
pub mod inbound;

use std::any::Any;
use std::path::Path;

use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::error::WebhookError;
use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Messaging platform webhook
        .route("/webhook/receive", post(inbound::receive))
}

fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    WebhookError::Internal("handler panicked".to_string()).into_response()
}

/// The complete application: routes, static assets and middleware.
pub fn app(state: AppState, assets_dir: &Path) -> Router {
    router()
        .nest_service("/assets", ServeDir::new(assets_dir))
        .with_state(state)
        .layer(TraceLayer::new_for_http().on_response(DefaultOnResponse::new().level(Level::INFO)))
        .layer(CatchPanicLayer::custom(panic_response))
}
