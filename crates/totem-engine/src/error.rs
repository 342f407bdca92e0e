//! # Engine Error Types
//!
//! Error types for geocoding, configuration and quote orchestration.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Engine Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │    GeoError     │  │   ConfigError   │  │     EngineError         │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Network        │  │  LoadFailed     │  │  Validation (core)      │ │
//! │  │  Timeout        │  │  InvalidUrl     │  │  Core (core)            │ │
//! │  │  Status         │  │  MissingApiKey  │  │  Geocode ← GeoError     │ │
//! │  │  NoResults      │  │  Invalid        │  │  Store (store)          │ │
//! │  │  RegionNotFound │  │  Pricing        │  │  Config ← ConfigError   │ │
//! │  │  InvalidResponse│  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only the nearest-warehouse lookup turns a [`GeoError`] into a failed
//! quote. The courier path folds it into a quote-required option.

use thiserror::Error;

use totem_core::{CoreError, ValidationError};
use totem_store::StoreError;

/// Result type alias for geocoder calls.
pub type GeoResult<T> = Result<T, GeoError>;

/// Result type alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

// =============================================================================
// Geocoding Errors
// =============================================================================

/// A place name could not be turned into a usable location.
#[derive(Debug, Error)]
pub enum GeoError {
    /// The request never got a response.
    #[error("Geocoder unreachable: {0}")]
    Network(String),

    /// The provider did not answer within the request timeout.
    #[error("Geocoder timed out")]
    Timeout,

    /// The provider answered with a non-success status.
    #[error("Geocoder returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The provider found nothing for the query.
    #[error("No geocoding results for \"{query}\"")]
    NoResults { query: String },

    /// The place was found but carries no administrative region.
    #[error("Region not found for \"{query}\"")]
    RegionNotFound { query: String },

    /// The provider answered with something we cannot read.
    #[error("Unreadable geocoder response: {0}")]
    InvalidResponse(String),
}

impl GeoError {
    /// Returns true for failures a caller may retry.
    ///
    /// ## Retryable
    /// - Network failures and timeouts
    /// - HTTP 5xx and 429
    ///
    /// Empty results and missing regions are answers, not outages.
    pub fn is_retryable(&self) -> bool {
        match self {
            GeoError::Network(_) | GeoError::Timeout => true,
            GeoError::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for GeoError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GeoError::Timeout
        } else if err.is_decode() {
            GeoError::InvalidResponse(err.to_string())
        } else {
            GeoError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GeoError {
    fn from(err: serde_json::Error) -> Self {
        GeoError::InvalidResponse(err.to_string())
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Configuration could not be loaded or is unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read or parsed.
    #[error("Failed to load config: {0}")]
    LoadFailed(String),

    /// Config could not be rendered back to TOML.
    #[error("Failed to render config: {0}")]
    RenderFailed(String),

    /// A URL setting does not parse.
    #[error("Invalid URL for {field}: {reason}")]
    InvalidUrl { field: String, reason: String },

    /// The selected provider needs a credential that is not set.
    #[error("Geocoder {provider} needs an API key (set TOTEM_GEMINI_API_KEY)")]
    MissingApiKey { provider: String },

    /// Any other inconsistent setting.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// Pricing tables failed their startup checks.
    #[error("Invalid pricing tables: {0}")]
    Pricing(#[from] CoreError),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::RenderFailed(err.to_string())
    }
}

// =============================================================================
// Engine Errors
// =============================================================================

/// Failures surfaced to the caller of the quote engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Bad request input; rejected before any lookup.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Domain failure (unknown model, empty warehouse list, ...).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The destination could not be located.
    #[error("Could not locate \"{city}\": {source}")]
    Geocode {
        city: String,
        #[source]
        source: GeoError,
    },

    /// Inventory storage failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl EngineError {
    /// Returns true if the request itself was at fault.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            EngineError::Validation(_)
                | EngineError::Core(CoreError::ModelNotFound(_))
                | EngineError::Core(CoreError::Validation(_))
        )
    }
}
