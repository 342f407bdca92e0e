//! # Transport Pricing
//!
//! The two carriers every quote offers.
//!
//! ## Dedicated Transport
//! ```text
//!   destination contains "roma"   ──► fixed €300
//!   else contains "milano"        ──► fixed €500
//!   else                          ──► distance_km × 2 × per_km_rate
//! ```
//!
//! Overrides are plain substring matches on the typed city, so a place
//! called "Roma Nuova" also gets the Roma rate. That is accepted behavior.
//!
//! ## Courier Transport
//! ```text
//!   destination contains "venezia" ──► ISOLE_MINORI ──► quote required
//!   else region ──► area ──► band ──► rate
//!                                      │
//!             Amount(r) ◄──────────────┴──────────────► QuoteRequired
//!                 │
//!                 ▼
//!   band_aggregate: r × 2        per_unit: r × quantity × 2
//! ```
//!
//! Region resolution needs the network, so it happens in the engine; this
//! module only prices an already-known area.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::distance::NearestWarehouse;
use crate::error::{CoreError, CoreResult};
use crate::money::{self, Money};
use crate::tables::{
    area_for_region, check_rate_coverage, reference_courier_rates, reference_region_areas,
    CourierRate, RateTable, RegionAreas,
};
use crate::types::{PricingArea, QuantityBand, TransportCost, Warehouse};

/// Lowercased, trimmed city text used for substring rules.
pub fn normalize_city(city: &str) -> String {
    city.trim().to_lowercase()
}

// =============================================================================
// Dedicated Transport
// =============================================================================

/// A city with a flat dedicated-transport price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedRate {
    pub city: String,
    #[serde(with = "money::euros")]
    pub amount: Money,
}

/// Dedicated transport result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedicatedQuote {
    pub cost: Money,
    pub details: String,
}

/// Distance-priced transport with fixed-city overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedicatedTariff {
    #[serde(with = "money::euros")]
    pub per_km_rate: Money,
    /// Checked in order; the first city contained in the destination wins.
    pub fixed_rates: Vec<FixedRate>,
}

impl Default for DedicatedTariff {
    fn default() -> Self {
        Self {
            per_km_rate: Money::from_euros(1),
            fixed_rates: vec![
                FixedRate {
                    city: "Roma".to_string(),
                    amount: Money::from_euros(300),
                },
                FixedRate {
                    city: "Milano".to_string(),
                    amount: Money::from_euros(500),
                },
            ],
        }
    }
}

impl DedicatedTariff {
    /// Prices dedicated transport to `destination`.
    ///
    /// A fixed rate applies regardless of the computed distance.
    pub fn quote(&self, destination: &str, nearest: &NearestWarehouse) -> DedicatedQuote {
        let city = normalize_city(destination);
        if let Some(fixed) = self
            .fixed_rates
            .iter()
            .find(|fixed| city.contains(&normalize_city(&fixed.city)))
        {
            return DedicatedQuote {
                cost: fixed.amount,
                details: format!("Fixed dedicated transport rate for {}", fixed.city),
            };
        }

        // Round trip: out to the customer and back to the depot.
        let cost = self
            .per_km_rate
            .multiply_quantity(i64::from(nearest.distance_km) * 2);
        DedicatedQuote {
            cost,
            details: format!(
                "Based on {} km from {} (round trip)",
                nearest.distance_km, nearest.warehouse
            ),
        }
    }

    fn validate(&self) -> CoreResult<()> {
        if self.per_km_rate.is_negative() {
            return Err(invalid("per_km_rate must not be negative"));
        }
        for fixed in &self.fixed_rates {
            if normalize_city(&fixed.city).is_empty() {
                return Err(invalid("fixed dedicated rate with an empty city"));
            }
            if fixed.amount.is_negative() {
                return Err(invalid("fixed dedicated rate must not be negative"));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Courier Transport
// =============================================================================

/// How a table rate relates to the quantity shipped.
///
/// `BandAggregate` treats the rate as the price of the whole band and only
/// applies the round-trip factor. `PerUnit` multiplies by the quantity too,
/// matching the older price-list revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourierRateBasis {
    #[default]
    BandAggregate,
    PerUnit,
}

impl fmt::Display for CourierRateBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CourierRateBasis::BandAggregate => write!(f, "band_aggregate"),
            CourierRateBasis::PerUnit => write!(f, "per_unit"),
        }
    }
}

impl FromStr for CourierRateBasis {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "band_aggregate" | "band" => Ok(CourierRateBasis::BandAggregate),
            "per_unit" | "unit" => Ok(CourierRateBasis::PerUnit),
            other => Err(invalid(&format!("unknown courier rate basis '{}'", other))),
        }
    }
}

/// A city always priced in a given area, whatever its region says.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialArea {
    pub city: String,
    pub area: PricingArea,
}

/// Courier transport result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourierQuote {
    pub cost: TransportCost,
    pub details: String,
    pub area: Option<PricingArea>,
    pub band: Option<QuantityBand>,
}

impl CourierQuote {
    /// Quote-required result for a destination that could not be placed.
    pub fn degraded(details: impl Into<String>) -> Self {
        Self {
            cost: TransportCost::QuoteRequired,
            details: details.into(),
            area: None,
            band: None,
        }
    }
}

/// Area- and band-priced courier transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourierTariff {
    pub rate_basis: CourierRateBasis,
    /// Checked in order before any region lookup.
    pub special_areas: Vec<SpecialArea>,
    pub region_areas: RegionAreas,
    pub rates: RateTable,
}

impl Default for CourierTariff {
    fn default() -> Self {
        Self {
            rate_basis: CourierRateBasis::default(),
            special_areas: vec![SpecialArea {
                city: "Venezia".to_string(),
                area: PricingArea::IsoleMinori,
            }],
            region_areas: reference_region_areas(),
            rates: reference_courier_rates(),
        }
    }
}

impl CourierTariff {
    /// Area forced by a special-city rule, if the destination has one.
    pub fn special_area(&self, destination: &str) -> Option<PricingArea> {
        let city = normalize_city(destination);
        self.special_areas
            .iter()
            .find(|special| city.contains(&normalize_city(&special.city)))
            .map(|special| special.area)
    }

    /// Maps a geocoded region to its pricing area.
    pub fn area_for_region(&self, region: &str) -> CoreResult<PricingArea> {
        area_for_region(&self.region_areas, region)
    }

    /// Prices `quantity` totems shipped to `area`.
    pub fn quote(&self, area: PricingArea, quantity: u32) -> CoreResult<CourierQuote> {
        let band = QuantityBand::from_quantity(quantity);
        let rates = self
            .rates
            .get(&area)
            .ok_or_else(|| CoreError::UnknownArea(area.to_string()))?;

        let (cost, details) = match rates.rate(band) {
            CourierRate::QuoteRequired => (
                TransportCost::QuoteRequired,
                format!("Area {} is priced on request", area),
            ),
            CourierRate::Amount(rate) => match self.rate_basis {
                CourierRateBasis::BandAggregate => (
                    TransportCost::Amount(rate.multiply_quantity(2)),
                    format!("Area {}, band {}: {} x 2 (round trip)", area, band, rate),
                ),
                CourierRateBasis::PerUnit => (
                    TransportCost::Amount(rate.multiply_quantity(i64::from(quantity) * 2)),
                    format!(
                        "Area {}, band {}: {} x {} x 2 (round trip)",
                        area, band, rate, quantity
                    ),
                ),
            },
        };

        Ok(CourierQuote {
            cost,
            details,
            area: Some(area),
            band: Some(band),
        })
    }

    /// Startup check: every reachable area has a rate row.
    pub fn validate(&self) -> CoreResult<()> {
        for special in &self.special_areas {
            if normalize_city(&special.city).is_empty() {
                return Err(invalid("special courier area with an empty city"));
            }
        }
        let special: Vec<PricingArea> = self.special_areas.iter().map(|s| s.area).collect();
        check_rate_coverage(&self.region_areas, &special, &self.rates)
    }
}

fn invalid(reason: &str) -> CoreError {
    CoreError::InvalidPricingConfig {
        reason: reason.to_string(),
    }
}

// =============================================================================
// Pricing Configuration
// =============================================================================

/// Everything the pricing pipeline reads, loaded once at startup.
///
/// `Default` is the reference deployment: warehouses in Roma and Novi
/// Ligure, €1/km, Roma and Milano flat rates, Venezia priced on request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub warehouses: Vec<Warehouse>,
    pub dedicated: DedicatedTariff,
    pub courier: CourierTariff,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            warehouses: vec![
                Warehouse::new("Roma", 41.9028, 12.4964),
                Warehouse::new("Novi Ligure", 44.7571, 8.7858),
            ],
            dedicated: DedicatedTariff::default(),
            courier: CourierTariff::default(),
        }
    }
}

impl PricingConfig {
    /// Rejects configurations that would fail at quote time.
    pub fn validate(&self) -> CoreResult<()> {
        if self.warehouses.is_empty() {
            return Err(CoreError::NoWarehouses);
        }
        for warehouse in &self.warehouses {
            if warehouse.name.trim().is_empty() {
                return Err(invalid("warehouse with an empty name"));
            }
            let loc = warehouse.location;
            if !(-90.0..=90.0).contains(&loc.lat) || !(-180.0..=180.0).contains(&loc.lon) {
                return Err(invalid(&format!(
                    "warehouse {} has out-of-range coordinates",
                    warehouse.name
                )));
            }
        }
        self.dedicated.validate()?;
        self.courier.validate()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn near(warehouse: &str, km: u32) -> NearestWarehouse {
        NearestWarehouse {
            warehouse: warehouse.to_string(),
            distance_km: km,
        }
    }

    #[test]
    fn test_reference_config_is_valid() {
        PricingConfig::default().validate().unwrap();
    }

    #[test]
    fn test_roma_override_ignores_distance() {
        let tariff = DedicatedTariff::default();
        for city in ["Roma", "ROMA", "  roma ", "Roma Nuova"] {
            let quote = tariff.quote(city, &near("Roma", 250));
            assert_eq!(quote.cost, Money::from_euros(300), "{}", city);
        }
        let quote = tariff.quote("Milano", &near("Novi Ligure", 85));
        assert_eq!(quote.cost, Money::from_euros(500));
        assert!(quote.details.contains("Milano"));
    }

    #[test]
    fn test_distance_priced_round_trip() {
        let tariff = DedicatedTariff::default();
        let quote = tariff.quote("Napoli", &near("Roma", 189));
        assert_eq!(quote.cost, Money::from_euros(378));
        assert_eq!(quote.details, "Based on 189 km from Roma (round trip)");

        let quote = tariff.quote("Novi Ligure", &near("Novi Ligure", 0));
        assert_eq!(quote.cost, Money::zero());
    }

    #[test]
    fn test_venezia_is_special_area() {
        let tariff = CourierTariff::default();
        assert_eq!(tariff.special_area("Venezia"), Some(PricingArea::IsoleMinori));
        assert_eq!(tariff.special_area(" venezia mestre"), Some(PricingArea::IsoleMinori));
        assert_eq!(tariff.special_area("Verona"), None);

        for q in [1, 3, 6, 8, 100] {
            let quote = tariff.quote(PricingArea::IsoleMinori, q).unwrap();
            assert_eq!(quote.cost, TransportCost::QuoteRequired);
        }
    }

    #[test]
    fn test_courier_bands_and_doubling() {
        let tariff = CourierTariff::default();
        let cases = [
            (1, QuantityBand::One, 125),
            (4, QuantityBand::TwoToFour, 115),
            (7, QuantityBand::FiveToSeven, 95),
            (8, QuantityBand::EightPlus, 85),
            (100, QuantityBand::EightPlus, 85),
        ];
        for (q, band, rate) in cases {
            let quote = tariff.quote(PricingArea::Lazio, q).unwrap();
            assert_eq!(quote.band, Some(band));
            assert_eq!(quote.cost, TransportCost::Amount(Money::from_euros(rate * 2)));
        }
    }

    #[test]
    fn test_per_unit_basis() {
        let tariff = CourierTariff {
            rate_basis: CourierRateBasis::PerUnit,
            ..CourierTariff::default()
        };
        let quote = tariff.quote(PricingArea::Nord, 3).unwrap();
        assert_eq!(quote.cost, TransportCost::Amount(Money::from_euros(145 * 3 * 2)));
    }

    #[test]
    fn test_unknown_area() {
        let mut tariff = CourierTariff::default();
        tariff.rates.remove(&PricingArea::Sud);
        assert!(matches!(
            tariff.quote(PricingArea::Sud, 1),
            Err(CoreError::UnknownArea(_))
        ));
        assert!(tariff.validate().is_err());
    }

    #[test]
    fn test_rate_basis_parsing() {
        assert_eq!(
            "per_unit".parse::<CourierRateBasis>().unwrap(),
            CourierRateBasis::PerUnit
        );
        assert_eq!(
            "BAND_AGGREGATE".parse::<CourierRateBasis>().unwrap(),
            CourierRateBasis::BandAggregate
        );
        assert!("both".parse::<CourierRateBasis>().is_err());
    }

    #[test]
    fn test_invalid_configs() {
        let mut config = PricingConfig::default();
        config.warehouses.clear();
        assert!(matches!(config.validate(), Err(CoreError::NoWarehouses)));

        let mut config = PricingConfig::default();
        config.dedicated.per_km_rate = Money::from_cents(-1);
        assert!(config.validate().is_err());

        let mut config = PricingConfig::default();
        config.warehouses[0].location.lat = 123.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_reads_partial_json() {
        let config: PricingConfig =
            serde_json::from_str(r#"{"dedicated": {"per_km_rate": 1.5}}"#).unwrap();
        assert_eq!(config.dedicated.per_km_rate, Money::from_cents(150));
        assert_eq!(config.dedicated.fixed_rates.len(), 2);
        assert_eq!(config.warehouses.len(), 2);
        assert_eq!(config.courier, CourierTariff::default());
    }
}
