//! # Validation Module
//!
//! Input validation for quote requests and inventory edits.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front end (CLI / form)                                       │
//! │  └── Type parsing (numbers, required args)                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Quantity / days ranges                                            │
//! │  ├── Destination and model names                                       │
//! │  └── Tier sanity (distinct quantities, non-negative rates)             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Pricing                                                      │
//! │  └── Runs only on validated input, never re-checks                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A rejected request never reaches the geocoder.

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{PricingTier, QuoteRequest};
use crate::{MAX_QUANTITY, MAX_RENTAL_DAYS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum destination length accepted from free text.
const MAX_DESTINATION_LEN: usize = 100;

/// Maximum model name length.
const MAX_MODEL_NAME_LEN: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a destination city and returns it trimmed.
///
/// ```rust
/// use totem_core::validation::validate_destination;
///
/// assert_eq!(validate_destination("  Roma ").unwrap(), "Roma");
/// assert!(validate_destination("   ").is_err());
/// ```
pub fn validate_destination(city: &str) -> ValidationResult<String> {
    let city = city.trim();

    if city.is_empty() {
        return Err(ValidationError::Required {
            field: "destination_city".to_string(),
        });
    }

    if city.chars().count() > MAX_DESTINATION_LEN {
        return Err(ValidationError::TooLong {
            field: "destination_city".to_string(),
            max: MAX_DESTINATION_LEN,
        });
    }

    Ok(city.to_string())
}

/// Validates a totem model name and returns it trimmed.
pub fn validate_model_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_MODEL_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_MODEL_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a totem quantity (1..=MAX_QUANTITY).
pub fn validate_quantity(quantity: i64) -> ValidationResult<u32> {
    validate_range("quantity", quantity, 1, MAX_QUANTITY)
}

/// Validates a rental duration in days (1..=MAX_RENTAL_DAYS).
pub fn validate_days(days: i64) -> ValidationResult<u32> {
    validate_range("days", days, 1, MAX_RENTAL_DAYS)
}

fn validate_range(field: &str, value: i64, min: i64, max: i64) -> ValidationResult<u32> {
    if !(min..=max).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min,
            max,
        });
    }
    // min >= 1 and max fits in u32
    Ok(value as u32)
}

/// Validates a daily rate: zero is allowed (free promo tier), negative is not.
pub fn validate_daily_rate(rate: Money) -> ValidationResult<()> {
    if rate.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "daily_rate".to_string(),
        });
    }
    Ok(())
}

/// Validates a model's tier list.
///
/// ## Rules
/// - Every tier quantity is at least 1
/// - Quantities are distinct (one tier per breakpoint)
/// - Rates are non-negative
///
/// An empty list is accepted: such a model quotes at a daily rate of zero.
pub fn validate_tiers(tiers: &[PricingTier]) -> ValidationResult<()> {
    let mut seen = HashSet::new();
    for tier in tiers {
        if tier.quantity == 0 {
            return Err(ValidationError::OutOfRange {
                field: "tier.quantity".to_string(),
                min: 1,
                max: MAX_QUANTITY,
            });
        }
        if !seen.insert(tier.quantity) {
            return Err(ValidationError::InvalidFormat {
                field: "pricing_tiers".to_string(),
                reason: format!("duplicate tier for quantity {}", tier.quantity),
            });
        }
        validate_daily_rate(tier.daily_rate)?;
    }
    Ok(())
}

// =============================================================================
// Request Validation
// =============================================================================

/// A quote request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub model_id: String,
    pub quantity: u32,
    pub days: u32,
    pub destination_city: String,
}

/// Validates every field of a quote request.
///
/// Model existence is checked separately against the loaded inventory.
pub fn validate_quote_request(request: &QuoteRequest) -> ValidationResult<ValidatedRequest> {
    let model_id = request.model_id.trim();
    if model_id.is_empty() {
        return Err(ValidationError::Required {
            field: "model_id".to_string(),
        });
    }

    Ok(ValidatedRequest {
        model_id: model_id.to_string(),
        quantity: validate_quantity(request.quantity)?,
        days: validate_days(request.days)?,
        destination_city: validate_destination(&request.destination_city)?,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
