//! Webhook server for the WhatsApp conversational relay.
//!
//! Receives Twilio message webhooks, hands them to the orchestrator and
//! replies through the Twilio Messages API.

mod config;
mod error;
mod routes;
mod sender;
mod state;

use std::sync::Arc;

use database::Database;
use openai_brain::OpenAiBrain;
use orchestrator::{DispatchConfig, Orchestrator};
use tracing::info;
use tracing_subscriber::EnvFilter;
use twilio_client::{TwilioClient, TwilioConfig};

use crate::config::Config;
use crate::sender::TwilioSender;
use crate::state::AppState;

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str =
    "webhook=info,orchestrator=info,openai_brain=info,twilio_client=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting relay webhook server");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Outbound collaborators
    let completions = OpenAiBrain::from_env()?;
    let twilio = TwilioClient::new(TwilioConfig::from_env()?)?;

    let orchestrator = Orchestrator::new(
        DispatchConfig::from_env()?,
        Arc::new(completions),
        Arc::new(db),
        Arc::new(TwilioSender::new(twilio)),
    );

    // Build router
    let app = routes::app(AppState::new(orchestrator), &config.assets_dir);

    // Start server
    info!(addr = %config.addr, "Relay webhook server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
