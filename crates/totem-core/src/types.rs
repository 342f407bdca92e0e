//! # Domain Types
//!
//! Core domain types used throughout the quote engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   TotemModel    │   │   Warehouse     │   │ TransportOption │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  name           │   │  kind / name    │       │
//! │  │  name           │   │  location       │   │  transport_cost │       │
//! │  │  pricing_tiers ─┼─┐ │   (Coordinates) │   │  total_cost     │       │
//! │  └─────────────────┘ │ └─────────────────┘   └────────┬────────┘       │
//! │  ┌─────────────────┐ │                                │                │
//! │  │  PricingTier    │◄┘ ┌─────────────────┐   ┌────────▼────────┐       │
//! │  │  quantity       │   │  PricingArea    │   │ TransportCost   │       │
//! │  │  daily_rate     │   │  QuantityBand   │   │ Amount | Quote  │       │
//! │  └─────────────────┘   └─────────────────┘   │   Required      │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Wire names are camelCase so the persisted inventory JSON stays readable
//! by the web editor that shares it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::money::{self, Money};

// =============================================================================
// Coordinates & Warehouse
// =============================================================================

/// A point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A depot totems ship from. Part of static configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warehouse {
    pub name: String,
    pub location: Coordinates,
}

impl Warehouse {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            location: Coordinates::new(lat, lon),
        }
    }
}

// =============================================================================
// Totem Model
// =============================================================================

/// One quantity breakpoint of a model's volume-discounted daily rate.
///
/// `daily_rate` is stored as decimal euros in JSON (`"dailyRate": 92.5`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingTier {
    pub quantity: u32,
    #[serde(with = "money::euros")]
    pub daily_rate: Money,
}

impl PricingTier {
    pub const fn new(quantity: u32, daily_rate: Money) -> Self {
        Self {
            quantity,
            daily_rate,
        }
    }
}

/// A rentable totem model.
///
/// Tiers keep their stored order: the first entry is the fallback when no
/// breakpoint qualifies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotemModel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub pricing_tiers: Vec<PricingTier>,
}

// =============================================================================
// Pricing Area
// =============================================================================

/// Courier pricing zone. Several administrative regions share one area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PricingArea {
    Lazio,
    Centro,
    Lombardia,
    Nord,
    Sud,
    IsoleECalabria,
    IsoleMinori,
}

impl PricingArea {
    pub const ALL: [PricingArea; 7] = [
        PricingArea::Lazio,
        PricingArea::Centro,
        PricingArea::Lombardia,
        PricingArea::Nord,
        PricingArea::Sud,
        PricingArea::IsoleECalabria,
        PricingArea::IsoleMinori,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            PricingArea::Lazio => "LAZIO",
            PricingArea::Centro => "CENTRO",
            PricingArea::Lombardia => "LOMBARDIA",
            PricingArea::Nord => "NORD",
            PricingArea::Sud => "SUD",
            PricingArea::IsoleECalabria => "ISOLE_E_CALABRIA",
            PricingArea::IsoleMinori => "ISOLE_MINORI",
        }
    }
}

impl fmt::Display for PricingArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PricingArea {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        PricingArea::ALL
            .into_iter()
            .find(|area| area.as_str() == wanted)
            .ok_or_else(|| CoreError::UnknownArea(s.to_string()))
    }
}

// =============================================================================
// Quantity Band
// =============================================================================

/// Quantity bracket used as the second axis of the courier rate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuantityBand {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2-4")]
    TwoToFour,
    #[serde(rename = "5-7")]
    FiveToSeven,
    #[serde(rename = "8+")]
    EightPlus,
}

impl QuantityBand {
    /// Maps a quantity to its band.
    ///
    /// Total over every `u32`: anything that is not 1..=7 falls through to
    /// `8+`, zero included. Validation keeps zero away from pricing.
    ///
    /// ```rust
    /// use totem_core::QuantityBand;
    ///
    /// assert_eq!(QuantityBand::from_quantity(4), QuantityBand::TwoToFour);
    /// assert_eq!(QuantityBand::from_quantity(100), QuantityBand::EightPlus);
    /// ```
    pub const fn from_quantity(quantity: u32) -> Self {
        match quantity {
            1 => QuantityBand::One,
            2..=4 => QuantityBand::TwoToFour,
            5..=7 => QuantityBand::FiveToSeven,
            _ => QuantityBand::EightPlus,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            QuantityBand::One => "1",
            QuantityBand::TwoToFour => "2-4",
            QuantityBand::FiveToSeven => "5-7",
            QuantityBand::EightPlus => "8+",
        }
    }
}

impl fmt::Display for QuantityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Transport Cost
// =============================================================================

/// A transport price, or the marker that no automatic price exists.
///
/// ## Sentinel Propagation
/// ```text
///   Amount(a) + rental  ──►  Amount(a + rental)
///   QuoteRequired + any ──►  QuoteRequired
/// ```
///
/// Serialized with an explicit tag so a front end can branch on `kind`:
/// `{"kind":"amount","amount":300}` or `{"kind":"quote_required"}`, with
/// the amount in decimal euros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum TransportCost {
    Amount(#[serde(with = "money::euros")] Money),
    QuoteRequired,
}

impl TransportCost {
    pub const fn is_quote_required(&self) -> bool {
        matches!(self, TransportCost::QuoteRequired)
    }

    pub const fn amount(&self) -> Option<Money> {
        match self {
            TransportCost::Amount(amount) => Some(*amount),
            TransportCost::QuoteRequired => None,
        }
    }

    /// Adds a numeric amount, keeping the sentinel sticky.
    pub fn plus(self, other: Money) -> TransportCost {
        match self {
            TransportCost::Amount(amount) => TransportCost::Amount(amount + other),
            TransportCost::QuoteRequired => TransportCost::QuoteRequired,
        }
    }

    /// Per-unit share of the cost, rounded to the nearest cent.
    pub fn per_unit(self, quantity: u32) -> TransportCost {
        match self.amount().and_then(|amount| amount.split(quantity)) {
            Some(share) => TransportCost::Amount(share),
            None => TransportCost::QuoteRequired,
        }
    }
}

impl fmt::Display for TransportCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportCost::Amount(amount) => write!(f, "{}", amount),
            TransportCost::QuoteRequired => f.write_str("quote required"),
        }
    }
}

// =============================================================================
// Transport Option
// =============================================================================

/// Which carrier an option describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    Dedicated,
    Courier,
}

impl TransportKind {
    /// Display name shown next to the option.
    pub const fn display_name(&self) -> &'static str {
        match self {
            TransportKind::Dedicated => "Dedicated transport",
            TransportKind::Courier => "Borghi courier (recommended)",
        }
    }
}

/// One of the two carrier choices on a quote.
///
/// The `*_per_unit` fields are the same figures divided by the quantity,
/// for quotes presented "per totem".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportOption {
    pub kind: TransportKind,
    pub name: String,
    pub transport_cost: TransportCost,
    pub total_cost: TransportCost,
    pub details: String,
    pub transport_cost_per_unit: TransportCost,
    pub total_cost_per_unit: TransportCost,
}

// =============================================================================
// Quote Request
// =============================================================================

/// Raw user input for a quote.
///
/// Numeric fields are signed so that a negative value from a form reaches
/// validation instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub model_id: String,
    pub quantity: i64,
    pub days: i64,
    pub destination_city: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_bands() {
        assert_eq!(QuantityBand::from_quantity(1), QuantityBand::One);
        assert_eq!(QuantityBand::from_quantity(2), QuantityBand::TwoToFour);
        assert_eq!(QuantityBand::from_quantity(4), QuantityBand::TwoToFour);
        assert_eq!(QuantityBand::from_quantity(5), QuantityBand::FiveToSeven);
        assert_eq!(QuantityBand::from_quantity(7), QuantityBand::FiveToSeven);
        assert_eq!(QuantityBand::from_quantity(8), QuantityBand::EightPlus);
        assert_eq!(QuantityBand::from_quantity(100), QuantityBand::EightPlus);
        assert_eq!(QuantityBand::from_quantity(0), QuantityBand::EightPlus);
    }

    #[test]
    fn test_pricing_area_round_trip() {
        for area in PricingArea::ALL {
            assert_eq!(area.as_str().parse::<PricingArea>().unwrap(), area);
            let json = serde_json::to_string(&area).unwrap();
            assert_eq!(json, format!("\"{}\"", area.as_str()));
        }
        assert!("ATLANTIDE".parse::<PricingArea>().is_err());
    }

    #[test]
    fn test_transport_cost_sentinel_is_sticky() {
        let rental = Money::from_euros(540);
        assert_eq!(
            TransportCost::Amount(Money::from_euros(300)).plus(rental),
            TransportCost::Amount(Money::from_euros(840))
        );
        assert_eq!(
            TransportCost::QuoteRequired.plus(rental),
            TransportCost::QuoteRequired
        );
        assert_eq!(
            TransportCost::QuoteRequired.per_unit(3),
            TransportCost::QuoteRequired
        );
    }

    #[test]
    fn test_transport_cost_wire_format() {
        let json = serde_json::to_string(&TransportCost::Amount(Money::from_euros(300))).unwrap();
        assert_eq!(json, r#"{"kind":"amount","amount":300}"#);

        let json = serde_json::to_string(&TransportCost::Amount(Money::from_cents(33_333))).unwrap();
        assert_eq!(json, r#"{"kind":"amount","amount":333.33}"#);
        let back: TransportCost = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TransportCost::Amount(Money::from_cents(33_333)));

        let json = serde_json::to_string(&TransportCost::QuoteRequired).unwrap();
        assert_eq!(json, r#"{"kind":"quote_required"}"#);
    }

    #[test]
    fn test_model_reads_shared_inventory_json() {
        let json = r#"{
            "id": "1",
            "name": "Totem Standard 50\"",
            "pricingTiers": [{"quantity": 1, "dailyRate": 100}, {"quantity": 2, "dailyRate": 92.5}]
        }"#;
        let model: TotemModel = serde_json::from_str(json).unwrap();
        assert_eq!(model.pricing_tiers.len(), 2);
        assert_eq!(model.pricing_tiers[1].daily_rate, Money::from_cents(9250));
    }
}
