//! # Quote Assembly
//!
//! Combines rental and transport figures into the final [`Quote`].
//!
//! ```text
//!   RentalCost ─────────────┐
//!   NearestWarehouse ───────┤
//!   DedicatedQuote ─────────┼──► Quote { transport_options: [dedicated, courier] }
//!   CourierQuote ───────────┘
//! ```
//!
//! Both options are always present, dedicated first. A courier sentinel
//! propagates into its total; it never removes the option.

use serde::{Deserialize, Serialize};

use crate::distance::NearestWarehouse;
use crate::money::{self, Money};
use crate::pricing::RentalCost;
use crate::transport::{CourierQuote, DedicatedQuote};
use crate::types::{TotemModel, TransportCost, TransportKind, TransportOption};
use crate::validation::ValidatedRequest;

/// A computed rental quote. Built once, never mutated, never persisted.
///
/// Money fields serialize as decimal euros, like the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub model: TotemModel,
    pub quantity: u32,
    pub days: u32,
    pub destination_city: String,
    #[serde(with = "money::euros")]
    pub daily_rate: Money,
    #[serde(with = "money::euros")]
    pub rental_cost: Money,
    #[serde(with = "money::euros")]
    pub rental_cost_per_unit: Money,
    pub transport_options: Vec<TransportOption>,
    pub distance_km: u32,
    pub nearest_warehouse: String,
}

impl Quote {
    /// Builds the quote from already-priced parts.
    pub fn assemble(
        model: &TotemModel,
        request: &ValidatedRequest,
        rental: RentalCost,
        nearest: NearestWarehouse,
        dedicated: DedicatedQuote,
        courier: CourierQuote,
    ) -> Quote {
        let quantity = request.quantity;
        let options = vec![
            option(
                TransportKind::Dedicated,
                TransportCost::Amount(dedicated.cost),
                dedicated.details,
                rental,
                quantity,
            ),
            option(
                TransportKind::Courier,
                courier.cost,
                courier.details,
                rental,
                quantity,
            ),
        ];

        Quote {
            model: model.clone(),
            quantity,
            days: request.days,
            destination_city: request.destination_city.clone(),
            daily_rate: rental.daily_rate,
            rental_cost: rental.total,
            rental_cost_per_unit: rental.per_unit,
            transport_options: options,
            distance_km: nearest.distance_km,
            nearest_warehouse: nearest.warehouse,
        }
    }

    /// The option for `kind`.
    pub fn option(&self, kind: TransportKind) -> Option<&TransportOption> {
        self.transport_options.iter().find(|opt| opt.kind == kind)
    }
}

fn option(
    kind: TransportKind,
    transport_cost: TransportCost,
    details: String,
    rental: RentalCost,
    quantity: u32,
) -> TransportOption {
    let total_cost = transport_cost.plus(rental.total);
    TransportOption {
        kind,
        name: kind.display_name().to_string(),
        transport_cost,
        total_cost,
        details,
        transport_cost_per_unit: transport_cost.per_unit(quantity),
        total_cost_per_unit: total_cost.per_unit(quantity),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
