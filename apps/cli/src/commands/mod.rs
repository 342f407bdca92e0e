//! CLI command handlers, one module per top-level command.

pub mod config;
pub mod inventory;
pub mod quote;

use totem_engine::{open_inventory, EngineConfig};
use totem_store::{InventoryChain, LoadOutcome};

/// Opens the inventory chain and loads the current list, reporting any
/// degraded source on stderr.
pub(crate) async fn load_inventory(
    config: &EngineConfig,
) -> anyhow::Result<(InventoryChain, LoadOutcome)> {
    let chain = open_inventory(&config.store).await?;
    let outcome = chain.load().await?;

    for warning in &outcome.warnings {
        eprintln!("warning: {warning}");
    }
    if !outcome.warnings.is_empty() && outcome.is_degraded() {
        eprintln!("warning: using inventory from {}", outcome.source);
    }

    Ok((chain, outcome))
}
