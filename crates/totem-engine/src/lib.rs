//! # totem-engine: Quote Engine for Totem Quote
//!
//! Geocoding, configuration and the orchestration that turns a quote
//! request into a priced [`Quote`](totem_core::Quote).
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Quote Engine Architecture                        │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                   QuoteEngine (quote.rs)                         │  │
//! │  │                                                                  │  │
//! │  │  validate ─► rental cost ─► [nearest warehouse ∥ courier area]   │  │
//! │  │  ─► dedicated + courier options ─► Quote                         │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │  GeoResolver   │  │ PricingConfig  │  │  QuoteSlot             │    │
//! │  │  (geo/)        │  │ (totem-core)   │  │  (session.rs)          │    │
//! │  │                │  │                │  │                        │    │
//! │  │ Nominatim or   │  │ Warehouses,    │  │ Latest result, guarded │    │
//! │  │ Gemini, opt-in │  │ tariffs, rate  │  │ against stale and      │    │
//! │  │ retry wrapper  │  │ tables         │  │ abandoned calculations │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │ EngineConfig (config.rs): defaults ─► TOML ─► TOTEM_* env       │   │
//! │  │ open_inventory (inventory.rs): remote ─► local cache ─► seed    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - Engine configuration (geocoder, store, pricing)
//! - [`error`] - Geocoding, configuration and engine errors
//! - [`geo`] - The [`GeoResolver`] trait and its providers
//! - [`inventory`] - Inventory chain assembly
//! - [`quote`] - The [`QuoteEngine`]
//! - [`session`] - Liveness-guarded result slot
//!
//! ## Usage
//! ```rust,ignore
//! use totem_engine::{build_resolver, open_inventory, EngineConfig, QuoteEngine};
//!
//! let config = EngineConfig::load(None)?;
//! let engine = QuoteEngine::new(config.pricing.clone(), build_resolver(&config.geocoder)?)?;
//! let inventory = open_inventory(&config.store).await?.load().await?;
//!
//! let quote = engine.calculate(&inventory.models, &request).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod geo;
pub mod inventory;
pub mod quote;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{EngineConfig, GeoProviderKind, GeocoderSettings, StoreSettings};
pub use error::{ConfigError, EngineError, EngineResult, GeoError, GeoResult};
pub use geo::{build_resolver, GeoResolver, GeocodedPlace, ResolvedCity};
pub use inventory::open_inventory;
pub use quote::QuoteEngine;
pub use session::{QuoteSlot, QuoteTicket};
