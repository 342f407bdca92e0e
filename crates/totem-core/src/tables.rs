//! # Courier Tables
//!
//! Static lookup data for courier pricing: region → area, and
//! area → quantity band → rate.
//!
//! ```text
//! ┌──────────────────────┐      ┌────────────────┐      ┌──────────────────┐
//! │ region (geocoder)    │      │ PricingArea    │      │ BandRates        │
//! │ "Emilia-Romagna"     │ ───► │ NORD           │ ───► │ 1   → €155       │
//! │ "Friuli Venezia G."  │      │                │      │ 2-4 → €145       │
//! └──────────────────────┘      └────────────────┘      │ 5-7 → €125       │
//!                                                       │ 8+  → €115       │
//!                                                       └──────────────────┘
//! ```
//!
//! Bands are exhaustive by construction ([`BandRates`] has one field per
//! band). Area coverage is checked by [`check_rate_coverage`] when the
//! pricing configuration is validated at startup.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{PricingArea, QuantityBand};

/// Region name → pricing area.
pub type RegionAreas = BTreeMap<String, PricingArea>;

/// Pricing area → band rates.
pub type RateTable = BTreeMap<PricingArea, BandRates>;

// =============================================================================
// Courier Rate
// =============================================================================

/// One cell of the courier rate table.
///
/// In config files a cell is either a euro amount or the string `"quote"`:
///
/// ```toml
/// [courier.rates.ISOLE_MINORI]
/// "1" = "quote"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRate", into = "RawRate")]
pub enum CourierRate {
    Amount(Money),
    QuoteRequired,
}

const QUOTE_MARKER: &str = "quote";

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawRate {
    Euros(f64),
    Marker(String),
}

impl TryFrom<RawRate> for CourierRate {
    type Error = String;

    fn try_from(raw: RawRate) -> Result<Self, Self::Error> {
        match raw {
            RawRate::Euros(euros) if euros.is_finite() => Ok(CourierRate::Amount(
                Money::from_cents((euros * 100.0).round() as i64),
            )),
            RawRate::Euros(_) => Err("courier rate must be a finite number".to_string()),
            RawRate::Marker(marker) if marker.eq_ignore_ascii_case(QUOTE_MARKER) => {
                Ok(CourierRate::QuoteRequired)
            }
            RawRate::Marker(other) => Err(format!(
                "courier rate must be a euro amount or \"{}\", got \"{}\"",
                QUOTE_MARKER, other
            )),
        }
    }
}

impl From<CourierRate> for RawRate {
    fn from(rate: CourierRate) -> Self {
        match rate {
            CourierRate::Amount(amount) => RawRate::Euros(amount.cents() as f64 / 100.0),
            CourierRate::QuoteRequired => RawRate::Marker(QUOTE_MARKER.to_string()),
        }
    }
}

// =============================================================================
// Band Rates
// =============================================================================

/// Courier rates of one area, one per quantity band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandRates {
    #[serde(rename = "1")]
    pub one: CourierRate,
    #[serde(rename = "2-4")]
    pub two_to_four: CourierRate,
    #[serde(rename = "5-7")]
    pub five_to_seven: CourierRate,
    #[serde(rename = "8+")]
    pub eight_plus: CourierRate,
}

impl BandRates {
    /// Four numeric rates in whole euros.
    pub const fn euros(one: i64, two_to_four: i64, five_to_seven: i64, eight_plus: i64) -> Self {
        Self {
            one: CourierRate::Amount(Money::from_euros(one)),
            two_to_four: CourierRate::Amount(Money::from_euros(two_to_four)),
            five_to_seven: CourierRate::Amount(Money::from_euros(five_to_seven)),
            eight_plus: CourierRate::Amount(Money::from_euros(eight_plus)),
        }
    }

    /// Every band priced on request.
    pub const fn quote_required() -> Self {
        Self {
            one: CourierRate::QuoteRequired,
            two_to_four: CourierRate::QuoteRequired,
            five_to_seven: CourierRate::QuoteRequired,
            eight_plus: CourierRate::QuoteRequired,
        }
    }

    pub const fn rate(&self, band: QuantityBand) -> CourierRate {
        match band {
            QuantityBand::One => self.one,
            QuantityBand::TwoToFour => self.two_to_four,
            QuantityBand::FiveToSeven => self.five_to_seven,
            QuantityBand::EightPlus => self.eight_plus,
        }
    }

    fn cells(&self) -> [CourierRate; 4] {
        [self.one, self.two_to_four, self.five_to_seven, self.eight_plus]
    }
}

// =============================================================================
// Region Names
// =============================================================================

/// Canonical form of a region name for lookups.
///
/// Geocoders spell regions differently ("Friuli-Venezia Giulia" vs
/// "Friuli Venezia Giulia", "Trentino-Alto Adige/Südtirol"). Lowercases,
/// drops everything after a `/`, turns `-` and `_` into spaces, unifies
/// apostrophes and collapses whitespace.
///
/// ```rust
/// use totem_core::tables::normalize_region;
///
/// assert_eq!(normalize_region("Trentino-Alto Adige/Südtirol"), "trentino alto adige");
/// assert_eq!(normalize_region("Valle d’Aosta / Vallée d'Aoste"), "valle d'aosta");
/// ```
pub fn normalize_region(region: &str) -> String {
    let head = region.split('/').next().unwrap_or_default();
    head.to_lowercase()
        .replace(['-', '_'], " ")
        .replace(['’', '`'], "'")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Looks a region up in `regions`, comparing normalized names.
pub fn area_for_region(regions: &RegionAreas, region: &str) -> CoreResult<PricingArea> {
    let wanted = normalize_region(region);
    if wanted.is_empty() {
        return Err(CoreError::UnknownRegion(region.to_string()));
    }
    regions
        .iter()
        .find(|(name, _)| normalize_region(name) == wanted)
        .map(|(_, area)| *area)
        .ok_or_else(|| CoreError::UnknownRegion(region.to_string()))
}

// =============================================================================
// Coverage Check
// =============================================================================

/// Fails unless every area reachable from `regions` or `extra_areas` has a
/// rate row, no cell is negative, and no two region spellings disagree.
pub fn check_rate_coverage(
    regions: &RegionAreas,
    extra_areas: &[PricingArea],
    rates: &RateTable,
) -> CoreResult<()> {
    let mut canonical: BTreeMap<String, PricingArea> = BTreeMap::new();
    for (name, area) in regions {
        let key = normalize_region(name);
        if key.is_empty() {
            return Err(invalid("region map contains an empty region name".to_string()));
        }
        if let Some(previous) = canonical.insert(key, *area) {
            if previous != *area {
                return Err(invalid(format!(
                    "region '{}' maps to both {} and {}",
                    name, previous, area
                )));
            }
        }
    }

    let referenced: BTreeSet<PricingArea> =
        canonical.values().chain(extra_areas).copied().collect();
    for area in referenced {
        if !rates.contains_key(&area) {
            return Err(invalid(format!("area {} has no courier rates", area)));
        }
    }

    for (area, bands) in rates {
        let negative = bands
            .cells()
            .iter()
            .any(|cell| matches!(cell, CourierRate::Amount(amount) if amount.is_negative()));
        if negative {
            return Err(invalid(format!("area {} has a negative courier rate", area)));
        }
    }

    Ok(())
}

fn invalid(reason: String) -> CoreError {
    CoreError::InvalidPricingConfig { reason }
}

// =============================================================================
// Reference Data
// =============================================================================

/// The twenty Italian regions and their courier areas.
pub fn reference_region_areas() -> RegionAreas {
    use PricingArea::*;

    [
        ("Lombardia", Lombardia),
        ("Piemonte", Nord),
        ("Valle d'Aosta", Nord),
        ("Liguria", Nord),
        ("Veneto", Nord),
        ("Friuli-Venezia Giulia", Nord),
        ("Trentino-Alto Adige", Nord),
        ("Emilia-Romagna", Nord),
        ("Toscana", Centro),
        ("Umbria", Centro),
        ("Marche", Centro),
        ("Abruzzo", Centro),
        ("Molise", Centro),
        ("Lazio", Lazio),
        ("Campania", Sud),
        ("Puglia", Sud),
        ("Basilicata", Sud),
        ("Calabria", IsoleECalabria),
        ("Sicilia", IsoleECalabria),
        ("Sardegna", IsoleECalabria),
    ]
    .into_iter()
    .map(|(name, area)| (name.to_string(), area))
    .collect()
}

/// Borghi courier price list, euros per band.
pub fn reference_courier_rates() -> RateTable {
    use PricingArea::*;

    BTreeMap::from([
        (Lazio, BandRates::euros(125, 115, 95, 85)),
        (Centro, BandRates::euros(135, 125, 105, 95)),
        (Lombardia, BandRates::euros(140, 130, 110, 100)),
        (Nord, BandRates::euros(155, 145, 125, 115)),
        (Sud, BandRates::euros(180, 170, 160, 150)),
        (IsoleECalabria, BandRates::euros(220, 210, 200, 190)),
        (IsoleMinori, BandRates::quote_required()),
    ])
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_tables_are_exhaustive() {
        let regions = reference_region_areas();
        let rates = reference_courier_rates();
        assert_eq!(regions.len(), 20);
        check_rate_coverage(&regions, &[PricingArea::IsoleMinori], &rates).unwrap();

        // Every area in the enum is priced
        for area in PricingArea::ALL {
            assert!(rates.contains_key(&area), "{} missing", area);
        }
    }

    #[test]
    fn test_missing_rate_row_is_rejected() {
        let regions = reference_region_areas();
        let mut rates = reference_courier_rates();
        rates.remove(&PricingArea::Sud);
        let err = check_rate_coverage(&regions, &[], &rates).unwrap_err();
        assert!(err.to_string().contains("SUD"));
    }

    #[test]
    fn test_special_area_without_rates_is_rejected() {
        let regions = reference_region_areas();
        let mut rates = reference_courier_rates();
        rates.remove(&PricingArea::IsoleMinori);
        assert!(check_rate_coverage(&regions, &[], &rates).is_ok());
        assert!(check_rate_coverage(&regions, &[PricingArea::IsoleMinori], &rates).is_err());
    }

    #[test]
    fn test_conflicting_spellings_are_rejected() {
        let mut regions = reference_region_areas();
        regions.insert("Friuli Venezia Giulia".to_string(), PricingArea::Centro);
        assert!(check_rate_coverage(&regions, &[], &reference_courier_rates()).is_err());
    }

    #[test]
    fn test_area_for_region_accepts_provider_spellings() {
        let regions = reference_region_areas();
        assert_eq!(area_for_region(&regions, "Lazio").unwrap(), PricingArea::Lazio);
        assert_eq!(
            area_for_region(&regions, "Friuli Venezia Giulia").unwrap(),
            PricingArea::Nord
        );
        assert_eq!(
            area_for_region(&regions, "Trentino-Alto Adige/Südtirol").unwrap(),
            PricingArea::Nord
        );
        assert_eq!(
            area_for_region(&regions, "Valle d'Aosta / Vallée d'Aoste").unwrap(),
            PricingArea::Nord
        );
        assert_eq!(area_for_region(&regions, " sicilia ").unwrap(), PricingArea::IsoleECalabria);
    }

    #[test]
    fn test_unknown_region() {
        let regions = reference_region_areas();
        assert!(matches!(
            area_for_region(&regions, "Bayern"),
            Err(CoreError::UnknownRegion(name)) if name == "Bayern"
        ));
        assert!(area_for_region(&regions, "  ").is_err());
    }

    #[test]
    fn test_band_lookup() {
        let rates = reference_courier_rates();
        let nord = rates[&PricingArea::Nord];
        assert_eq!(
            nord.rate(QuantityBand::FiveToSeven),
            CourierRate::Amount(Money::from_euros(125))
        );
        assert_eq!(
            rates[&PricingArea::IsoleMinori].rate(QuantityBand::One),
            CourierRate::QuoteRequired
        );
    }

    #[test]
    fn test_courier_rate_config_format() {
        let bands: BandRates =
            serde_json::from_str(r#"{"1": 125, "2-4": 115.5, "5-7": "quote", "8+": 85}"#).unwrap();
        assert_eq!(bands.two_to_four, CourierRate::Amount(Money::from_cents(11550)));
        assert_eq!(bands.five_to_seven, CourierRate::QuoteRequired);

        assert!(serde_json::from_str::<BandRates>(r#"{"1": "free", "2-4": 1, "5-7": 1, "8+": 1}"#)
            .is_err());
        assert!(serde_json::from_str::<BandRates>(r#"{"1": 1, "2-4": 1, "5-7": 1}"#).is_err());
    }
}
