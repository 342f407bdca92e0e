//! # Inventory Wiring
//!
//! Builds the inventory fallback chain from [`StoreSettings`].
//!
//! ```text
//!   remote_url set?  ──yes──► RemoteInventory ─┐
//!                                               ├─► LocalSnapshot ─► SeedInventory
//!                    ──no──────────────────────┘
//! ```

use tracing::info;

use crate::config::StoreSettings;
use crate::error::EngineResult;
use totem_store::{Database, InventoryChain, LocalSnapshot, RemoteInventory, SeedInventory};

/// Opens the local cache and assembles the chain in precedence order.
pub async fn open_inventory(settings: &StoreSettings) -> EngineResult<InventoryChain> {
    let db = Database::new(settings.db_config()).await?;
    let mut chain = InventoryChain::new();

    if let Some(remote) = settings.remote_config() {
        info!(url = %remote.base_url, "Shared inventory enabled");
        chain = chain.with_source(RemoteInventory::new(remote)?);
    }

    let chain = chain
        .with_source(LocalSnapshot::new(db))
        .with_source(SeedInventory);
    Ok(chain)
}
