//! # Geocoding
//!
//! Turns a free-text Italian place name into coordinates and an
//! administrative region.
//!
//! ## Providers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         GeoResolver Providers                           │
//! │                                                                         │
//! │  build_resolver(settings)                                              │
//! │       │                                                                 │
//! │       ├── provider = "nominatim" ──► NominatimResolver (keyless OSM)    │
//! │       │                                                                 │
//! │       └── provider = "gemini"    ──► GeminiResolver (structured JSON)   │
//! │                                                                         │
//! │  retries > 0 ──► wrapped in RetryingResolver (exponential backoff)     │
//! │                                                                         │
//! │  Every provider answers the same question:                             │
//! │     geocode("Torino") ──► { coordinates, region: "Piemonte", ... }     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A provider makes one HTTP call per lookup and never retries on its own.

pub mod gemini;
pub mod nominatim;
pub mod retry;

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::{GeoProviderKind, GeocoderSettings};
use crate::error::{ConfigError, GeoError, GeoResult};
use totem_core::Coordinates;

pub use gemini::GeminiResolver;
pub use nominatim::NominatimResolver;
pub use retry::{RetryPolicy, RetryingResolver};

/// What a provider knows about a place.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPlace {
    pub coordinates: Coordinates,
    /// Most specific administrative region the provider reported.
    pub region: Option<String>,
    pub display_name: Option<String>,
}

/// A place with a region guaranteed present.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCity {
    pub coordinates: Coordinates,
    pub region: String,
}

/// A geocoding backend.
///
/// Implementors provide [`geocode`](GeoResolver::geocode); the other
/// lookups are derived from it.
#[async_trait]
pub trait GeoResolver: Send + Sync {
    /// Short provider name for logs.
    fn provider(&self) -> &'static str;

    /// Looks up `city`, constrained to Italy.
    async fn geocode(&self, city: &str) -> GeoResult<GeocodedPlace>;

    /// Coordinates and region. A place without a region is an error.
    async fn resolve_city(&self, city: &str) -> GeoResult<ResolvedCity> {
        let place = self.geocode(city).await?;
        match place.region {
            Some(region) if !region.trim().is_empty() => Ok(ResolvedCity {
                coordinates: place.coordinates,
                region,
            }),
            _ => Err(GeoError::RegionNotFound {
                query: city.to_string(),
            }),
        }
    }

    /// Coordinates only.
    async fn locate(&self, city: &str) -> GeoResult<Coordinates> {
        Ok(self.geocode(city).await?.coordinates)
    }
}

// =============================================================================
// Region Extraction
// =============================================================================

/// Administrative fields a provider may return for a place.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AddressParts {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
}

impl AddressParts {
    /// First non-blank of state, region, county, province.
    pub fn preferred_region(&self) -> Option<String> {
        [&self.state, &self.region, &self.county, &self.province]
            .into_iter()
            .flatten()
            .map(|value| value.trim())
            .find(|value| !value.is_empty())
            .map(str::to_string)
    }
}

/// The query string sent to providers.
pub(crate) fn italy_query(city: &str) -> String {
    format!("{}, Italy", city.trim())
}

pub(crate) fn checked_coordinates(lat: f64, lon: f64) -> GeoResult<Coordinates> {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(GeoError::InvalidResponse(format!(
            "coordinates out of range: {}, {}",
            lat, lon
        )));
    }
    Ok(Coordinates::new(lat, lon))
}

// =============================================================================
// Provider Selection
// =============================================================================

/// Builds the configured provider, wrapped in a retry policy when asked.
pub fn build_resolver(settings: &GeocoderSettings) -> Result<Arc<dyn GeoResolver>, ConfigError> {
    let timeout = Duration::from_secs(settings.timeout_secs);

    let resolver: Arc<dyn GeoResolver> = match settings.provider {
        GeoProviderKind::Nominatim => Arc::new(
            NominatimResolver::new(
                &settings.nominatim.base_url,
                &settings.nominatim.user_agent,
                timeout,
            )
            .map_err(|e| ConfigError::Invalid(e.to_string()))?,
        ),
        GeoProviderKind::Gemini => {
            let api_key = settings
                .gemini
                .api_key
                .as_deref()
                .filter(|key| !key.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingApiKey {
                    provider: GeoProviderKind::Gemini.to_string(),
                })?;
            Arc::new(
                GeminiResolver::new(
                    &settings.gemini.base_url,
                    &settings.gemini.model,
                    api_key,
                    timeout,
                )
                .map_err(|e| ConfigError::Invalid(e.to_string()))?,
            )
        }
    };

    info!(
        provider = resolver.provider(),
        retries = settings.retries,
        "Geocoder ready"
    );

    if settings.retries == 0 {
        return Ok(resolver);
    }
    Ok(Arc::new(RetryingResolver::new(
        resolver,
        RetryPolicy::from_settings(settings),
    )))
}
