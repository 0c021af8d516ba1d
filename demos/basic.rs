//! Basic usage example.
//!
//! Lists vaults and items through a scripted runner, then picks the actions
//! the launcher would offer for each item.
//!
//! Run with: cargo run --example basic

use oplaunch::bridge::mock::MockRunner;
use oplaunch::{actions_for_item, fetch, Config, OpClient, Preferences};
use serde_json::json;
use std::sync::Arc;

#[tokio::main]
async fn main() -> oplaunch::Result<()> {
    println!("=== Oplaunch Basic Example ===\n");

    // The resolver only checks that the CLI path exists.
    let dir = tempfile::tempdir()?;
    let cli = dir.path().join("op");
    std::fs::File::create(&cli)?;

    let runner = Arc::new(MockRunner::new());
    runner
        .respond_json(
            &["vault", "list", "--format=json"],
            json!([{"id": "v2", "name": "work"}, {"id": "v1", "name": "Private"}]),
        )
        .await;
    runner
        .respond_json(
            &["items", "list", "--long", "--format=json"],
            json!([
                {"id": "i1", "title": "github", "category": "LOGIN",
                 "urls": [{"primary": true, "href": "https://github.com"}]},
                {"id": "i2", "title": "Bank card", "category": "CREDIT_CARD"},
                {"id": "i3", "title": "Wi-Fi", "category": "PASSWORD"}
            ]),
        )
        .await;

    let config = Config::default()
        .with_cli_path(cli.to_string_lossy())
        .with_cli_fallbacks(Vec::new());
    let client = OpClient::with_shared_runner(config, Arc::clone(&runner));

    println!("1. Vaults:");
    for vault in client.list_vaults().await? {
        println!("   {} ({})", vault.name, vault.id);
    }

    println!("\n2. Items with actions:");
    let prefs = Preferences::default();
    for item in client.list_items(&[]).await? {
        let actions: Vec<_> = actions_for_item(&item, &prefs)
            .iter()
            .map(|a| a.as_str())
            .collect();
        println!(
            "   [{}] {} -> {}",
            item.category.icon(),
            item.title,
            actions.join(", ")
        );
    }

    println!("\n3. Reactive resource:");
    let items = fetch::items(client.clone(), Vec::new());
    println!("   before refresh: loading={}", items.state().is_loading);
    let state = items.refresh().await;
    println!(
        "   after refresh: loading={} count={}",
        state.is_loading,
        state.data.map(|d| d.len()).unwrap_or(0)
    );

    println!("\n   {} op invocations", runner.call_count().await);
    Ok(())
}
