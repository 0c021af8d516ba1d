//! Error handling example.
//!
//! Shows how raw `op` failures surface as categorized errors with a title
//! and an actionable message.
//!
//! Run with: cargo run --example error_handling

use oplaunch::bridge::mock::MockRunner;
use oplaunch::{Config, OpClient, OplaunchError};
use std::sync::Arc;

#[tokio::main]
async fn main() -> oplaunch::Result<()> {
    println!("=== Error Handling Example ===\n");

    // Example 1: CLI not installed
    println!("1. Missing CLI:");
    let missing = OpClient::with_runner(
        Config::default()
            .with_cli_path("/nonexistent/op")
            .with_cli_fallbacks(Vec::new()),
        MockRunner::new(),
    );
    match missing.list_vaults().await {
        Err(e) if e.is_setup_error() => {
            println!("   {}", e.title());
            println!("   -> {}", e.message());
        }
        other => println!("   Unexpected: {:?}", other.map(|v| v.len())),
    }

    let dir = tempfile::tempdir()?;
    let cli = dir.path().join("op");
    std::fs::File::create(&cli)?;

    let runner = Arc::new(MockRunner::new());
    let client = OpClient::with_shared_runner(
        Config::default()
            .with_cli_path(cli.to_string_lossy())
            .with_cli_fallbacks(Vec::new()),
        Arc::clone(&runner),
    );

    // Example 2: classified CLI failures
    println!("\n2. Classified failures:");
    let failures = [
        "[ERROR] 2024/01/01 12:00:00 dial tcp: lookup my.1password.com: no such host",
        "[ERROR] 2024/01/01 12:00:00 \"github\" isn't an item. Specify the item with its UUID, name, or domain.",
        "[ERROR] 2024/01/01 12:00:00 item 'github' does not have a field 'otp'",
        "[ERROR] 2024/01/01 12:00:00 account is not signed in",
    ];
    for stderr in failures {
        runner.fail_all(Some(stderr.to_string())).await;
        if let Err(e) = client.get_field("github", "password").await {
            println!("   {:<45} | {}", e.title(), e.message());
        }
    }

    // Example 3: matching on the root cause
    println!("\n3. Matching on the root cause:");
    runner
        .fail_all(Some("could not get item".to_string()))
        .await;
    match client.get_item("missing", false).await {
        Err(e) => match e.root() {
            OplaunchError::NotFound => println!("   not found, wrapped as: {}", e),
            other => println!("   other error: {}", other),
        },
        Ok(item) => println!("   found {}", item.title),
    }

    // Example 4: input rejected before spawning
    println!("\n4. Rejected input:");
    runner.fail_all(None).await;
    let before = runner.call_count().await;
    if let Err(e) = client.get_item("--reveal", false).await {
        println!("   {}", e);
    }
    println!("   spawned: {}", runner.call_count().await - before);

    Ok(())
}
