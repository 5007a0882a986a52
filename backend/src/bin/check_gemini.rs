//! Utility binary for verifying the Gemini API key and model
//! This is a utility binary, not part of the main application

use chat_relay_backend::config::Config;
use chat_relay_backend::llm::GeminiClient;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();

    println!("Checking Gemini API access...\n");

    println!("1. Checking for GOOGLE_API_KEY environment variable...");
    match &config.gemini.api_key {
        Some(key) => println!("   ✓ GOOGLE_API_KEY is set (length: {} chars)", key.len()),
        None => {
            eprintln!("   ✗ GOOGLE_API_KEY not found in environment");
            eprintln!("   Export it or add it to a .env file");
            return Err("GOOGLE_API_KEY not set".into());
        }
    }

    println!("\n2. Sending test prompt to model '{}'...", config.gemini.model);
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.gemini.timeout_secs))
        .build()?;
    let client = GeminiClient::from_config(http, &config.gemini);

    match client
        .generate_content("What is 2+2? Answer in one sentence.")
        .await
    {
        Ok(answer) => {
            println!("   ✓ Response received:");
            println!("   {}", answer.trim());
        }
        Err(e) => {
            eprintln!("   ✗ Request failed: {}", e);
            return Err(e.into());
        }
    }

    println!("\n✓ All checks completed!");
    Ok(())
}
