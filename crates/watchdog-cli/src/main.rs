use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;
use watchdog_core::domain::InstanceGroup;
use watchdog_core::impls::{InMemoryRegistry, InMemoryStatusStore, RecordingNotifier};
use watchdog_core::{handle_event, ReaperBuilder, WatchdogConfig};

/// Registry snapshot the local run is evaluated against.
#[derive(Debug, Deserialize)]
struct Inventory {
    #[serde(default)]
    reservations: Vec<InstanceGroup>,
}

fn setup_tracing() {
    // RUST_LOG で出力レベルを制御（未設定なら info）
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init();
}

fn load_inventory(path: &Path) -> Result<Inventory> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading inventory {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing inventory {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();

    let inventory_path: PathBuf = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: watchdog-cli <inventory.json>")?;

    // (A) 設定とコラボレータを用意
    let config = WatchdogConfig::from_env()?;
    let inventory = load_inventory(&inventory_path)?;
    info!(
        reservations = inventory.reservations.len(),
        table = %config.status_table,
        "loaded local inventory"
    );

    let registry = Arc::new(InMemoryRegistry::new(inventory.reservations));
    let store = Arc::new(InMemoryStatusStore::new());
    let notifier = Arc::new(RecordingNotifier::new());

    let reaper = ReaperBuilder::new(config)
        .registry(registry)
        .status_store(store)
        .notifier(notifier.clone())
        .build()?;

    // (B) スケジュール実行と同じく空のイベントで 1 回実行
    let response = handle_event(&reaper, &serde_json::json!({})).await;

    for message in notifier.published().await {
        info!(subject = %message.subject, "would publish:\n{}", message.body);
    }
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
