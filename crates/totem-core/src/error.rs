//! # Error Types
//!
//! Domain-specific error types for totem-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  totem-core errors (this file)                                         │
//! │  ├── CoreError        - Pricing and catalog failures                   │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  totem-store errors (separate crate)                                   │
//! │  └── StoreError       - Inventory persistence failures                 │
//! │                                                                         │
//! │  totem-engine errors (separate crate)                                  │
//! │  ├── GeoError         - Geocoding provider failures                    │
//! │  └── EngineError      - What the quote caller sees                     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → EngineError → CLI                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The requested totem model is not in the inventory.
    #[error("Totem model not found: {0}")]
    ModelNotFound(String),

    /// A model has no tier for the requested quantity.
    ///
    /// Only raised by catalog edits; quoting falls back to the first tier.
    #[error("Model {model_id} has no pricing tier for quantity {quantity}")]
    TierNotFound { model_id: String, quantity: u32 },

    /// The geocoder returned a region the region map does not know.
    ///
    /// ## When This Occurs
    /// - Destination outside Italy
    /// - Provider spelling not covered by the normalized keys
    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    /// An area has no row in the courier rate table.
    #[error("No courier rates for area {0}")]
    UnknownArea(String),

    /// The warehouse list is empty, so no distance can be computed.
    #[error("No warehouses configured")]
    NoWarehouses,

    /// A stored daily rate is too large to price this many totems and days.
    #[error("Rental cost for model {model_id} is too large to compute")]
    AmountOverflow { model_id: String },

    /// Static pricing configuration failed its startup checks.
    #[error("Invalid pricing configuration: {reason}")]
    InvalidPricingConfig { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any pricing or network work happens.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g. a duplicated tier quantity).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::UnknownRegion("Bavaria".to_string());
        assert_eq!(err.to_string(), "Unknown region: Bavaria");

        let err = CoreError::TierNotFound {
            model_id: "totem-1".to_string(),
            quantity: 9,
        };
        assert_eq!(
            err.to_string(),
            "Model totem-1 has no pricing tier for quantity 9"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "destination_city".to_string(),
        };
        assert_eq!(err.to_string(), "destination_city is required");

        let err = ValidationError::OutOfRange {
            field: "days".to_string(),
            min: 1,
            max: 365,
        };
        assert_eq!(err.to_string(), "days must be between 1 and 365");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
