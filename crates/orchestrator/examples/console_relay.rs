//! Console relay example.
//!
//! Feeds lines from stdin through the Orchestrator as if they were webhook
//! events from a single sender, using an echoing backend and an in-memory
//! store. Replies are logged by the LoggingSender.
//!
//! Run with: cargo run -p orchestrator --example console_relay
//!
//! Configuration via environment variables (all optional):
//!   RELAY_DEFAULT_BALANCE  - Opening credit (default: 5.0)
//!   RELAY_SYSTEM_PROMPT    - System prompt sent with each completion
//!   RUST_LOG               - Log filter (default: info)

use std::io::{self, BufRead};
use std::sync::Arc;

use mock_brain::EchoBrain;
use orchestrator::{DispatchConfig, InMemoryUserStore, InboundEvent, LoggingSender, Orchestrator};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let store = Arc::new(InMemoryUserStore::new());
    let orchestrator = Orchestrator::new(
        DispatchConfig::from_env()?,
        Arc::new(EchoBrain::new()),
        store.clone(),
        Arc::new(LoggingSender),
    );

    info!("Type a message (Ctrl-D to quit). Try: hi, balance, imagine: a fox, stop");

    for line in io::stdin().lock().lines() {
        let line = line?;
        let event = InboundEvent::new("console", Some("Console".to_string()), line, "console");
        let report = orchestrator.handle(event).await;

        let balance = store.get("console").await.map(|u| u.balance);
        info!("path: {:?}, delivered: {}, balance: {:?}", report.path, report.delivered, balance);
    }

    Ok(())
}
