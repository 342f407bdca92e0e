//! # Distance Engine
//!
//! Great-circle distances and nearest-warehouse selection.
//!
//! ```text
//!   destination ──► name equals a warehouse? ──yes──► (warehouse, 0 km)
//!                          │ no
//!                          ▼
//!                  geocode (caller) ──► haversine to each warehouse
//!                                           │
//!                                           ▼
//!                          first minimum in configuration order, rounded km
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{Coordinates, Warehouse};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Warehouse chosen for dedicated transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearestWarehouse {
    pub warehouse: String,
    /// One-way distance, rounded to the nearest kilometre.
    pub distance_km: u32,
}

/// Haversine distance between two points, in kilometres.
///
/// ```rust
/// use totem_core::distance::haversine_km;
/// use totem_core::Coordinates;
///
/// let roma = Coordinates::new(41.9028, 12.4964);
/// let novi = Coordinates::new(44.7571, 8.7858);
/// let km = haversine_km(roma, novi);
/// assert!((km - haversine_km(novi, roma)).abs() < 1e-9);
/// assert!(km > 420.0 && km < 440.0);
/// ```
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Returns the warehouse whose name equals `city` (trimmed, case-insensitive).
///
/// Checked before geocoding so a warehouse city never costs a lookup.
pub fn warehouse_named<'a>(city: &str, warehouses: &'a [Warehouse]) -> Option<&'a Warehouse> {
    let city = city.trim().to_lowercase();
    warehouses
        .iter()
        .find(|warehouse| warehouse.name.trim().to_lowercase() == city)
}

/// Picks the closest warehouse to `destination`.
///
/// Ties go to the warehouse listed first.
pub fn nearest_warehouse(
    destination: Coordinates,
    warehouses: &[Warehouse],
) -> CoreResult<NearestWarehouse> {
    let mut best: Option<(&Warehouse, f64)> = None;
    for warehouse in warehouses {
        let km = haversine_km(destination, warehouse.location);
        match best {
            Some((_, best_km)) if km >= best_km => {}
            _ => best = Some((warehouse, km)),
        }
    }

    let (warehouse, km) = best.ok_or(CoreError::NoWarehouses)?;
    Ok(NearestWarehouse {
        warehouse: warehouse.name.clone(),
        distance_km: km.round() as u32,
    })
}

/// Zero-distance result for a destination that is itself a warehouse.
pub fn at_warehouse(warehouse: &Warehouse) -> NearestWarehouse {
    NearestWarehouse {
        warehouse: warehouse.name.clone(),
        distance_km: 0,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
