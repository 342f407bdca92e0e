//! # Inventory Sources
//!
//! The providers an [`InventoryChain`](crate::chain::InventoryChain) tries
//! in order.
//!
//! ```text
//! ┌──────────────────┬──────────────────┬──────────────────────────────┐
//! │ Source           │ Tier             │ Backing                      │
//! ├──────────────────┼──────────────────┼──────────────────────────────┤
//! │ RemoteInventory  │ Authoritative    │ shared PostgREST row         │
//! │ LocalSnapshot    │ Cache            │ SQLite inventory_snapshot    │
//! │ SeedInventory    │ Fallback         │ compiled-in default model    │
//! └──────────────────┴──────────────────┴──────────────────────────────┘
//! ```

use async_trait::async_trait;
use std::fmt;

use crate::error::{StoreError, StoreResult};
use crate::pool::Database;
use crate::remote::RemoteInventory;
use totem_core::catalog::seed_inventory;
use totem_core::TotemModel;

/// Key of the single shared document in the local cache.
pub const SHARED_KEY: &str = "shared";

/// Role of a source in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceTier {
    /// The system of record.
    Authoritative,
    /// A copy kept close to the caller; refreshed from whatever answers.
    Cache,
    /// Last resort; never written.
    Fallback,
}

impl SourceTier {
    pub const fn is_writable(&self) -> bool {
        !matches!(self, SourceTier::Fallback)
    }
}

impl fmt::Display for SourceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceTier::Authoritative => write!(f, "authoritative"),
            SourceTier::Cache => write!(f, "cache"),
            SourceTier::Fallback => write!(f, "fallback"),
        }
    }
}

/// Something that can hold the whole inventory list.
///
/// `load` returns `Ok(None)` when the source is reachable but has nothing
/// stored; an error means the source itself failed.
#[async_trait]
pub trait InventorySource: Send + Sync {
    fn name(&self) -> &str;

    fn tier(&self) -> SourceTier;

    async fn load(&self) -> StoreResult<Option<Vec<TotemModel>>>;

    async fn save(&self, models: &[TotemModel]) -> StoreResult<()>;
}

// =============================================================================
// Remote
// =============================================================================

#[async_trait]
impl InventorySource for RemoteInventory {
    fn name(&self) -> &str {
        "remote store"
    }

    fn tier(&self) -> SourceTier {
        SourceTier::Authoritative
    }

    async fn load(&self) -> StoreResult<Option<Vec<TotemModel>>> {
        self.fetch().await
    }

    async fn save(&self, models: &[TotemModel]) -> StoreResult<()> {
        self.store(models).await
    }
}

// =============================================================================
// Local Cache
// =============================================================================

/// The shared list mirrored into the local SQLite cache.
#[derive(Debug, Clone)]
pub struct LocalSnapshot {
    db: Database,
    key: String,
}

impl LocalSnapshot {
    pub fn new(db: Database) -> Self {
        LocalSnapshot {
            db,
            key: SHARED_KEY.to_string(),
        }
    }
}

#[async_trait]
impl InventorySource for LocalSnapshot {
    fn name(&self) -> &str {
        "local cache"
    }

    fn tier(&self) -> SourceTier {
        SourceTier::Cache
    }

    async fn load(&self) -> StoreResult<Option<Vec<TotemModel>>> {
        Ok(self
            .db
            .snapshots()
            .get(&self.key)
            .await?
            .map(|snapshot| snapshot.models))
    }

    async fn save(&self, models: &[TotemModel]) -> StoreResult<()> {
        self.db.snapshots().put(&self.key, models).await?;
        Ok(())
    }
}

// =============================================================================
// Seed
// =============================================================================

/// The compiled-in default inventory.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedInventory;

#[async_trait]
impl InventorySource for SeedInventory {
    fn name(&self) -> &str {
        "default inventory"
    }

    fn tier(&self) -> SourceTier {
        SourceTier::Fallback
    }

    async fn load(&self) -> StoreResult<Option<Vec<TotemModel>>> {
        Ok(Some(seed_inventory()))
    }

    async fn save(&self, _models: &[TotemModel]) -> StoreResult<()> {
        Err(StoreError::ReadOnly {
            source_name: self.name().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbConfig;

    #[tokio::test]
    async fn test_local_snapshot_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let local = LocalSnapshot::new(db);
        assert!(local.load().await.unwrap().is_none());

        local.save(&seed_inventory()).await.unwrap();
        assert_eq!(local.load().await.unwrap().unwrap(), seed_inventory());
    }

    #[tokio::test]
    async fn test_seed_is_read_only() {
        let seed = SeedInventory;
        assert_eq!(seed.load().await.unwrap().unwrap().len(), 1);
        assert!(matches!(
            seed.save(&[]).await,
            Err(StoreError::ReadOnly { .. })
        ));
        assert!(!seed.tier().is_writable());
    }
}
