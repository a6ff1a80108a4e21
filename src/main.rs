//! Đánh Đền Turn Server
//!
//! Hosts turn tables and runs a scripted demo match against one of them.

use std::sync::Arc;
use std::time::Duration;
use anyhow::{anyhow, Context};
use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use danh_den::{
    PlayerId, RuleConfig, TableConfig, TableManager, TurnUpdate, VERSION,
    core::hash::hash_hex,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let rules = RuleConfig::from_env();
    let config = TableConfig::from_env();

    info!("Đánh Đền Server v{}", VERSION);
    info!("Rules: {:?}", rules);
    info!("Idle timeout: {}s", config.idle_timeout.as_secs());

    let manager = Arc::new(TableManager::new());
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let sweep = tokio::spawn(manager.clone().run_idle_sweep(Duration::from_secs(60), shutdown_rx));

    demo_match(&manager, rules, config).await?;

    let _ = shutdown_tx.send(());
    sweep.await.context("idle sweep task failed")?;
    info!("Shutdown complete");
    Ok(())
}

/// Play one scripted match and log every broadcast.
async fn demo_match(manager: &TableManager, rules: RuleConfig, config: TableConfig) -> anyhow::Result<()> {
    info!("=== Starting Demo Match ===");

    let id = manager.create_table(rules, config).await;
    let table = manager
        .get_table(&id)
        .await
        .ok_or_else(|| anyhow!("table vanished"))?;
    let mut table = table.write().await;
    let mut updates = table.subscribe();

    let roster: Vec<PlayerId> = ["An", "Bình", "Chi", "Dũng", "Em"]
        .into_iter()
        .map(PlayerId::from)
        .collect();
    table.start(roster)?;

    // Chi reports first: An and Bình are credited automatically,
    // then Bình replays ahead of Chi
    let state = table.report_error("Chi")?;
    info!("Order: {}", join(&state.order));

    let checkpoint = table.state().compute_hash();
    table.report_success("Bình")?;
    table.undo()?;
    if table.state().compute_hash() == checkpoint {
        info!("UNDO VERIFIED: {}", hash_hex(&checkpoint));
    } else {
        warn!("UNDO MISMATCH: state differs from checkpoint");
    }

    for name in ["Bình", "Dũng", "Em"] {
        table.report_success(name)?;
    }
    info!("Round {} begins with {}", table.state().round_number, join(&table.state().order));

    let state = table.report_win("Dũng")?;
    info!("=== Match {} ===", state.match_number);
    info!("Next order: {}", join(&state.order));

    while let Ok(update) = updates.try_recv() {
        match &update {
            TurnUpdate::State(snapshot) => info!(
                "State round {} seat {} ({})",
                snapshot.state.round_number,
                snapshot.state.current_index,
                &snapshot.state_hash[..16],
            ),
            other => info!("Broadcast: {}", other.to_json()?),
        }
    }

    Ok(())
}

fn join(order: &[PlayerId]) -> String {
    order.iter().map(PlayerId::as_str).collect::<Vec<_>>().join(" ")
}
