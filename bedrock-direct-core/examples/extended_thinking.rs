// Extended thinking with a structured answer
//
// The model is asked to finish with a JSON object; its fields show up in
// `extra_fields` alongside the reasoning trace.
//
// Run with: cargo run --example extended_thinking

use bedrock_direct_core::{ClientConfig, InvocationClient, Result};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ClientConfig::new()
        .with_max_tokens(4000)
        .with_thinking_budget(4000)
        .with_system_prompt(
            "Answer the question, then end with a JSON object of the form \
             {\"answer\": <number>, \"confidence\": <0-1>}.",
        );

    let client = InvocationClient::new(config)
        .await?
        .with_agent_name("ThinkingExample")
        .with_retry_callback(|info| {
            eprintln!(
                "Retry {}/{} in {:?}: {}",
                info.attempt, info.max_attempts, info.delay, info.error
            );
        });

    println!("{:#?}", client.model_info());

    let result = client
        .invoke(
            "A bat and a ball cost $1.10 in total. The bat costs $1.00 more than the ball. \
             How much does the ball cost, in cents?",
            true,
        )
        .await?;

    if let Some(thinking) = &result.reasoning_text {
        println!("--- thinking ---\n{}\n", thinking);
    }
    println!("--- response ---\n{}\n", result.response_text.as_deref().unwrap_or(""));

    for (key, value) in &result.extra_fields {
        println!("{} = {}", key, value);
    }

    Ok(())
}
