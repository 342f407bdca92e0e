//! # Catalog Editing
//!
//! Whole-collection edits behind the inventory editor.
//!
//! Every operation takes the current model list and returns a new one. The
//! caller saves the returned list as a unit, so storage never sees a
//! half-edited model.
//!
//! ```text
//!   load() ──► Vec<TotemModel> ──► add_model / remove_model / set_tier_rate
//!                                              │
//!                                              ▼
//!                                   Vec<TotemModel> ──► save()
//! ```

use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{PricingTier, TotemModel};
use crate::validation::{validate_daily_rate, validate_model_name};

/// Id of the model shipped in the hard-coded inventory.
pub const SEED_MODEL_ID: &str = "1";

/// Tiers a newly added model starts with: €100 for one totem, then €5 less
/// per breakpoint down to €75 from six totems.
pub fn default_tiers() -> Vec<PricingTier> {
    [100, 95, 90, 85, 80, 75]
        .into_iter()
        .zip(1u32..)
        .map(|(euros, quantity)| PricingTier::new(quantity, Money::from_euros(euros)))
        .collect()
}

/// Inventory used when neither the shared store nor the local cache has data.
pub fn seed_inventory() -> Vec<TotemModel> {
    vec![TotemModel {
        id: SEED_MODEL_ID.to_string(),
        name: "Totem Standard 50\"".to_string(),
        pricing_tiers: default_tiers(),
    }]
}

/// Appends a model named `name` with [`default_tiers`] and a fresh id.
///
/// Names are not deduplicated: two models may share a name.
pub fn add_model(models: &[TotemModel], name: &str) -> CoreResult<(Vec<TotemModel>, TotemModel)> {
    let name = validate_model_name(name)?;
    let model = TotemModel {
        id: Uuid::new_v4().to_string(),
        name,
        pricing_tiers: default_tiers(),
    };

    let mut next = models.to_vec();
    next.push(model.clone());
    Ok((next, model))
}

/// Removes the model with `model_id`.
pub fn remove_model(models: &[TotemModel], model_id: &str) -> CoreResult<Vec<TotemModel>> {
    if !models.iter().any(|model| model.id == model_id) {
        return Err(CoreError::ModelNotFound(model_id.to_string()));
    }
    Ok(models
        .iter()
        .filter(|model| model.id != model_id)
        .cloned()
        .collect())
}

/// Changes the daily rate of one existing tier.
pub fn set_tier_rate(
    models: &[TotemModel],
    model_id: &str,
    quantity: u32,
    daily_rate: Money,
) -> CoreResult<Vec<TotemModel>> {
    validate_daily_rate(daily_rate)?;

    let mut next = models.to_vec();
    let model = next
        .iter_mut()
        .find(|model| model.id == model_id)
        .ok_or_else(|| CoreError::ModelNotFound(model_id.to_string()))?;
    let tier = model
        .pricing_tiers
        .iter_mut()
        .find(|tier| tier.quantity == quantity)
        .ok_or_else(|| CoreError::TierNotFound {
            model_id: model_id.to_string(),
            quantity,
        })?;
    tier.daily_rate = daily_rate;
    Ok(next)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tiers() {
        let tiers = default_tiers();
        let pairs: Vec<(u32, i64)> = tiers.iter().map(|t| (t.quantity, t.daily_rate.euros())).collect();
        assert_eq!(pairs, vec![(1, 100), (2, 95), (3, 90), (4, 85), (5, 80), (6, 75)]);
    }

    #[test]
    fn test_add_model() {
        let seed = seed_inventory();
        let (next, added) = add_model(&seed, "  Totem Touch 65\"  ").unwrap();
        assert_eq!(next.len(), 2);
        assert_eq!(added.name, "Totem Touch 65\"");
        assert_eq!(added.pricing_tiers, default_tiers());
        assert!(Uuid::parse_str(&added.id).is_ok());
        // input untouched
        assert_eq!(seed.len(), 1);

        assert!(add_model(&seed, "   ").is_err());
    }

    #[test]
    fn test_duplicate_names_are_kept() {
        let (once, _) = add_model(&[], "Kiosk").unwrap();
        let (twice, _) = add_model(&once, "Kiosk").unwrap();
        assert_eq!(twice.len(), 2);
        assert_ne!(twice[0].id, twice[1].id);
    }

    #[test]
    fn test_remove_model() {
        let seed = seed_inventory();
        assert!(remove_model(&seed, SEED_MODEL_ID).unwrap().is_empty());
        assert!(matches!(
            remove_model(&seed, "nope"),
            Err(CoreError::ModelNotFound(_))
        ));
    }

    #[test]
    fn test_set_tier_rate() {
        let seed = seed_inventory();
        let next = set_tier_rate(&seed, SEED_MODEL_ID, 3, Money::from_cents(8750)).unwrap();
        assert_eq!(next[0].pricing_tiers[2].daily_rate, Money::from_cents(8750));
        assert_eq!(seed[0].pricing_tiers[2].daily_rate, Money::from_euros(90));

        assert!(set_tier_rate(&seed, SEED_MODEL_ID, 3, Money::zero()).is_ok());
        assert!(matches!(
            set_tier_rate(&seed, SEED_MODEL_ID, 3, Money::from_cents(-1)),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            set_tier_rate(&seed, SEED_MODEL_ID, 9, Money::from_euros(1)),
            Err(CoreError::TierNotFound { quantity: 9, .. })
        ));
        assert!(matches!(
            set_tier_rate(&seed, "x", 1, Money::from_euros(1)),
            Err(CoreError::ModelNotFound(_))
        ));
    }
}
