//! # totem-core: Pure Pricing Logic for Totem Rentals
//!
//! Everything that decides a price lives here, as pure functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Totem Quote Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/cli (totem-quote)                       │   │
//! │  │         quote ──► results      inventory ──► edit/save          │   │
//! │  └──────────────┬───────────────────────────────┬──────────────────┘   │
//! │                 │                               │                       │
//! │  ┌──────────────▼──────────────┐  ┌─────────────▼───────────────────┐   │
//! │  │ totem-engine                │  │ totem-store                     │   │
//! │  │ GeoResolver, QuoteEngine    │  │ remote ─► SQLite ─► seed chain  │   │
//! │  └──────────────┬──────────────┘  └─────────────┬───────────────────┘   │
//! │                 │                               │                       │
//! │  ┌──────────────▼───────────────────────────────▼───────────────────┐   │
//! │  │               ★ totem-core (THIS CRATE) ★                        │   │
//! │  │                                                                  │   │
//! │  │  ┌─────────┐ ┌──────────┐ ┌─────────┐ ┌───────────┐ ┌─────────┐  │   │
//! │  │  │ pricing │ │ distance │ │ tables  │ │ transport │ │  quote  │  │   │
//! │  │  │  tiers  │ │haversine │ │area/band│ │ dedicated │ │assemble │  │   │
//! │  │  └─────────┘ └──────────┘ └─────────┘ │  courier  │ └─────────┘  │   │
//! │  │                                       └───────────┘              │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                           │   │
//! │  └──────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (TotemModel, PricingArea, TransportCost, ...)
//! - [`money`] - Euro-cent Money type
//! - [`pricing`] - Tier selection and rental cost
//! - [`distance`] - Haversine distance and nearest warehouse
//! - [`tables`] - Region → area and area → band → rate tables
//! - [`transport`] - Dedicated and courier tariffs, [`PricingConfig`]
//! - [`quote`] - Final quote assembly
//! - [`catalog`] - Inventory editor operations
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use totem_core::catalog::seed_inventory;
//! use totem_core::pricing::rental_cost;
//! use totem_core::Money;
//!
//! let model = &seed_inventory()[0];
//! // 3 totems for 2 days at the 3-unit rate of €90
//! assert_eq!(rental_cost(model, 3, 2).unwrap().total, Money::from_euros(540));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod distance;
pub mod error;
pub mod money;
pub mod pricing;
pub mod quote;
pub mod tables;
pub mod transport;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use distance::NearestWarehouse;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::RentalCost;
pub use quote::Quote;
pub use transport::{CourierQuote, CourierRateBasis, DedicatedQuote, PricingConfig};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum totems in one quote.
///
/// Catches typos such as 1000 for 10 before they reach the price list.
pub const MAX_QUANTITY: i64 = 999;

/// Maximum rental length in days.
pub const MAX_RENTAL_DAYS: i64 = 365;
