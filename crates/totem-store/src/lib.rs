//! # totem-store: Inventory Storage for Totem Quote
//!
//! Every place the inventory list can live, and the order they are tried.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Totem Quote Data Flow                            │
//! │                                                                         │
//! │  CLI command (quote / inventory add)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    totem-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │InventoryChain │    │    Sources    │    │  Migrations  │  │   │
//! │  │   │  (chain.rs)   │───►│ (source.rs)   │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ load / save   │    │ Remote        │    │ 001_...sql   │  │   │
//! │  │   │ warnings      │    │ LocalSnapshot │    │              │  │   │
//! │  │   │               │    │ Seed          │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                              │                                  │
//! │       ▼                              ▼                                  │
//! │  ┌──────────────────────┐   ┌──────────────────────────────────────┐   │
//! │  │ PostgREST row        │   │ SQLite inventory_snapshot            │   │
//! │  │ shared_inventory     │   │ <data dir>/inventory.db              │   │
//! │  └──────────────────────┘   └──────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`chain`] - Ordered fallback over inventory sources
//! - [`source`] - The [`InventorySource`] trait and its local/seed impls
//! - [`remote`] - HTTP client for the shared row
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`repository`] - SQL access for cached snapshots
//! - [`error`] - Storage error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use totem_store::{Database, DbConfig, InventoryChain, LocalSnapshot, SeedInventory};
//!
//! let db = Database::new(DbConfig::new("inventory.db")).await?;
//! let chain = InventoryChain::new()
//!     .with_source(LocalSnapshot::new(db))
//!     .with_source(SeedInventory);
//!
//! let outcome = chain.load().await?;
//! println!("{} models from {}", outcome.models.len(), outcome.source);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod chain;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod remote;
pub mod repository;
pub mod source;

// =============================================================================
// Re-exports
// =============================================================================

pub use chain::{InventoryChain, LoadOutcome, SaveReport};
pub use error::{StoreError, StoreResult};
pub use pool::{Database, DbConfig};
pub use remote::{RemoteConfig, RemoteInventory};
pub use repository::snapshot::{InventorySnapshot, SnapshotRepository};
pub use source::{InventorySource, LocalSnapshot, SeedInventory, SourceTier};
