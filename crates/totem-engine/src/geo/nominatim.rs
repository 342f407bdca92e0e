//! # Nominatim Provider
//!
//! Keyless geocoding against an OpenStreetMap Nominatim instance.
//!
//! ```text
//!   GET {base}/search?format=json&limit=1&addressdetails=1&q=Torino, Italy
//!       User-Agent: totem-quote/0.1
//!   ◄── [{"lat": "45.0703", "lon": "7.6869", "display_name": "Torino, ...",
//!         "address": {"state": "Piemonte", "county": "Torino", ...}}]
//! ```
//!
//! The public instance asks clients for an identifying User-Agent and at
//! most one request per second.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{checked_coordinates, italy_query, AddressParts, GeoResolver, GeocodedPlace};
use crate::error::{GeoError, GeoResult};

#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    address: AddressParts,
}

/// Nominatim `/search` client.
#[derive(Debug, Clone)]
pub struct NominatimResolver {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimResolver {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> GeoResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| GeoError::Network(e.to_string()))?;

        Ok(NominatimResolver {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl GeoResolver for NominatimResolver {
    fn provider(&self) -> &'static str {
        "nominatim"
    }

    async fn geocode(&self, city: &str) -> GeoResult<GeocodedPlace> {
        let query = italy_query(city);
        debug!(query = %query, "Nominatim search");

        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .header(ACCEPT, "application/json")
            .query(&[
                ("format", "json"),
                ("limit", "1"),
                ("addressdetails", "1"),
                ("q", query.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(status, query = %query, "Nominatim request failed");
            return Err(GeoError::Status { status, body });
        }

        let results: Vec<SearchResult> = response.json().await?;
        let first = results
            .into_iter()
            .next()
            .ok_or_else(|| GeoError::NoResults {
                query: query.clone(),
            })?;

        let lat = parse_degrees(&first.lat)?;
        let lon = parse_degrees(&first.lon)?;

        Ok(GeocodedPlace {
            coordinates: checked_coordinates(lat, lon)?,
            region: first.address.preferred_region(),
            display_name: first.display_name,
        })
    }
}

fn parse_degrees(raw: &str) -> GeoResult<f64> {
    raw.trim()
        .parse()
        .map_err(|_| GeoError::InvalidResponse(format!("not a coordinate: {raw}")))
}

// =============================================================================
// Unit Tests
// =============================================================================
