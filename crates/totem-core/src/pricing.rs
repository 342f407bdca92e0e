//! # Rental Pricing
//!
//! Tier selection and rental cost for a totem model.
//!
//! ## Tier Selection
//! ```text
//!   tiers (any order):  (1, €100) (2, €95) (3, €90) (4, €85) (5, €80) (6, €75)
//!
//!   quantity 3  ──► sort desc by quantity ──► first with quantity ≤ 3 ──► €90
//!   quantity 40 ──► ...                  ──► (6, €75)             ──► €75
//! ```
//!
//! The highest qualifying breakpoint wins; rates are never interpolated.
//! If nothing qualifies the first tier in stored order is used, and a model
//! with no tiers rents for zero.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::{self, Money};
use crate::types::{PricingTier, TotemModel};

/// Rental figures for one quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalCost {
    /// Daily rate of the selected tier.
    #[serde(with = "money::euros")]
    pub daily_rate: Money,
    /// One totem for the whole rental (`daily_rate × days`).
    #[serde(with = "money::euros")]
    pub per_unit: Money,
    /// All totems for the whole rental (`per_unit × quantity`).
    #[serde(with = "money::euros")]
    pub total: Money,
}

/// Picks the tier whose quantity is the largest one not above `quantity`.
///
/// ```rust
/// use totem_core::money::Money;
/// use totem_core::pricing::select_tier;
/// use totem_core::PricingTier;
///
/// let tiers = [
///     PricingTier::new(5, Money::from_euros(80)),
///     PricingTier::new(1, Money::from_euros(100)),
/// ];
/// assert_eq!(select_tier(&tiers, 7).unwrap().quantity, 5);
/// assert_eq!(select_tier(&tiers, 4).unwrap().quantity, 1);
/// ```
pub fn select_tier(tiers: &[PricingTier], quantity: u32) -> Option<&PricingTier> {
    let mut sorted: Vec<&PricingTier> = tiers.iter().collect();
    sorted.sort_by(|a, b| b.quantity.cmp(&a.quantity));

    sorted
        .into_iter()
        .find(|tier| tier.quantity <= quantity)
        .or_else(|| tiers.first())
}

/// Effective daily rate of `model` at `quantity`.
pub fn daily_rate_for(model: &TotemModel, quantity: u32) -> Money {
    select_tier(&model.pricing_tiers, quantity)
        .map(|tier| tier.daily_rate)
        .unwrap_or_else(Money::zero)
}

/// Computes `daily_rate × quantity × days`.
///
/// Inventory edited elsewhere is not bounded, so the products are checked.
pub fn rental_cost(model: &TotemModel, quantity: u32, days: u32) -> CoreResult<RentalCost> {
    let overflow = || CoreError::AmountOverflow {
        model_id: model.id.clone(),
    };
    let daily_rate = daily_rate_for(model, quantity);
    let per_unit = daily_rate
        .checked_multiply(i64::from(days))
        .ok_or_else(overflow)?;
    let total = per_unit
        .checked_multiply(i64::from(quantity))
        .ok_or_else(overflow)?;
    Ok(RentalCost {
        daily_rate,
        per_unit,
        total,
    })
}

/// Finds a model by id.
pub fn find_model<'a>(models: &'a [TotemModel], model_id: &str) -> CoreResult<&'a TotemModel> {
    models
        .iter()
        .find(|model| model.id == model_id)
        .ok_or_else(|| CoreError::ModelNotFound(model_id.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_tiers;

    fn standard() -> TotemModel {
        TotemModel {
            id: "1".to_string(),
            name: "Totem Standard 50\"".to_string(),
            pricing_tiers: default_tiers(),
        }
    }

    #[test]
    fn test_selected_tier_is_max_breakpoint_not_above_quantity() {
        let tiers = default_tiers();
        for q in 1..=50u32 {
            let selected = select_tier(&tiers, q).unwrap();
            let expected = tiers.iter().map(|t| t.quantity).filter(|&t| t <= q).max();
            assert_eq!(Some(selected.quantity), expected, "quantity {}", q);
        }
    }

    #[test]
    fn test_non_contiguous_unsorted_tiers() {
        let tiers = [
            PricingTier::new(10, Money::from_euros(60)),
            PricingTier::new(1, Money::from_euros(100)),
            PricingTier::new(4, Money::from_euros(85)),
        ];
        assert_eq!(select_tier(&tiers, 3).unwrap().quantity, 1);
        assert_eq!(select_tier(&tiers, 9).unwrap().quantity, 4);
        assert_eq!(select_tier(&tiers, 10).unwrap().quantity, 10);
    }

    #[test]
    fn test_falls_back_to_first_stored_tier() {
        let tiers = [
            PricingTier::new(5, Money::from_euros(80)),
            PricingTier::new(3, Money::from_euros(90)),
        ];
        assert_eq!(select_tier(&tiers, 2).unwrap().quantity, 5);
    }

    #[test]
    fn test_no_tiers_rents_for_zero() {
        let mut model = standard();
        model.pricing_tiers.clear();
        assert_eq!(select_tier(&model.pricing_tiers, 3), None);
        assert_eq!(rental_cost(&model, 3, 2).unwrap().total, Money::zero());
    }

    #[test]
    fn test_huge_stored_rate_is_an_error_not_a_wrap() {
        let mut model = standard();
        model.pricing_tiers = vec![PricingTier::new(1, Money::from_cents(i64::MAX / 100))];

        let err = rental_cost(&model, 999, 365).unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow { ref model_id } if model_id == "1"));
        assert!(rental_cost(&model, 1, 1).is_ok());
    }

    #[test]
    fn test_rental_cost() {
        let cost = rental_cost(&standard(), 3, 2).unwrap();
        assert_eq!(cost.daily_rate, Money::from_euros(90));
        assert_eq!(cost.per_unit, Money::from_euros(180));
        assert_eq!(cost.total, Money::from_euros(540));

        for q in 1..=12u32 {
            for days in [1u32, 2, 7, 30] {
                let cost = rental_cost(&standard(), q, days).unwrap();
                assert_eq!(
                    cost.total,
                    daily_rate_for(&standard(), q) * q * days,
                    "q={} days={}",
                    q,
                    days
                );
            }
        }
    }

    #[test]
    fn test_find_model() {
        let models = vec![standard()];
        assert_eq!(find_model(&models, "1").unwrap().name, "Totem Standard 50\"");
        assert!(matches!(
            find_model(&models, "missing"),
            Err(CoreError::ModelNotFound(_))
        ));
    }
}
