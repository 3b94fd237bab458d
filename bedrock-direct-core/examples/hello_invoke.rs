// Minimal example - ask a question, get an answer
//
// Uses the default AWS credential chain and us-east-1.
//
// Run with: cargo run --example hello_invoke

use bedrock_direct_core::{ClientConfig, InvocationClient, Result};

#[tokio::main]
async fn main() -> Result<()> {
    let client = InvocationClient::new(ClientConfig::default())
        .await?
        .with_system_prompt("You are a pirate. Always respond in pirate speak.");

    let result = client.invoke("What is the capital of France?", false).await?;

    println!("{}", result.response_text.unwrap_or_default());

    Ok(())
}
