//! Send one prompt through OpenAiBrain.
//!
//! Run with: cargo run -p openai-brain --example test_chat
//! Or with a custom message: cargo run -p openai-brain --example test_chat -- "Your message here"
//!
//! Make sure to set environment variables in .env:
//!   OPENAI_API_KEY - API key for authentication

use openai_brain::{ChatMessage, CompletionClient, OpenAiBrain};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let message_text = if args.len() > 1 {
        args[1..].join(" ")
    } else {
        "Hello! Please respond with a short greeting.".to_string()
    };

    let brain = OpenAiBrain::from_env()?;
    println!("Brain initialized: {}", brain.name());
    println!("API URL: {}", brain.config().api_url);
    println!("Model: {}", brain.config().model);
    println!();

    println!("Sending: \"{}\"", message_text);
    let reply = brain
        .complete(&[ChatMessage::user(message_text)], 0.5)
        .await?;

    println!("=== Response ===");
    println!("{}", reply);
    println!("================");

    Ok(())
}
