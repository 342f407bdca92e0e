//! # Quote Engine
//!
//! Turns a quote request into a [`Quote`] with both transport options.
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        QuoteEngine::calculate                           │
//! │                                                                         │
//! │  validate request ──► find model ──► rental cost (tier × qty × days)   │
//! │        │ bad input: rejected here, before any lookup                   │
//! │        ▼                                                                │
//! │  ┌──────────────────────────────┐   ┌──────────────────────────────┐   │
//! │  │ nearest warehouse            │   │ courier area                 │   │
//! │  │  warehouse city? ─► 0 km     │   │  special city? ─► its area   │   │
//! │  │  else locate() + haversine   │   │  else resolve_city() ─►      │   │
//! │  │                              │   │       region ─► area         │   │
//! │  │  failure: whole quote fails  │   │  failure: quote required     │   │
//! │  └──────────────┬───────────────┘   └──────────────┬───────────────┘   │
//! │                 │        (run concurrently)        │                    │
//! │                 ▼                                  ▼                    │
//! │        dedicated tariff                    courier tariff              │
//! │                 └──────────────┬───────────────────┘                    │
//! │                                ▼                                        │
//! │             Quote { options: [dedicated, courier] }                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};
use crate::geo::GeoResolver;
use totem_core::distance::{at_warehouse, nearest_warehouse, warehouse_named};
use totem_core::pricing::{find_model, rental_cost};
use totem_core::validation::validate_quote_request;
use totem_core::{CourierQuote, NearestWarehouse, PricingConfig, Quote, QuoteRequest, TotemModel};

/// Prices quote requests against a fixed pricing configuration.
#[derive(Clone)]
pub struct QuoteEngine {
    pricing: Arc<PricingConfig>,
    geocoder: Arc<dyn GeoResolver>,
}

impl QuoteEngine {
    /// Creates an engine. The pricing tables are validated once here.
    pub fn new(pricing: PricingConfig, geocoder: Arc<dyn GeoResolver>) -> EngineResult<Self> {
        pricing.validate()?;
        Ok(QuoteEngine {
            pricing: Arc::new(pricing),
            geocoder,
        })
    }

    pub fn pricing(&self) -> &PricingConfig {
        &self.pricing
    }

    /// Computes a quote for `request` against the loaded `models`.
    ///
    /// ## Errors
    /// - Validation errors and unknown models, before any network call
    /// - [`EngineError::Geocode`] when the destination cannot be located
    ///
    /// A courier lookup failure never fails the quote; that option carries
    /// a quote-required cost and a diagnostic instead.
    pub async fn calculate(
        &self,
        models: &[TotemModel],
        request: &QuoteRequest,
    ) -> EngineResult<Quote> {
        let request = validate_quote_request(request)?;
        let model = find_model(models, &request.model_id)?;
        let rental = rental_cost(model, request.quantity, request.days)?;

        debug!(
            model = %model.name,
            quantity = request.quantity,
            days = request.days,
            daily_rate = %rental.daily_rate,
            rental = %rental.total,
            "Rental cost computed"
        );

        let city = request.destination_city.as_str();
        let (nearest, courier) = tokio::join!(
            self.nearest_warehouse(city),
            self.courier_quote(city, request.quantity)
        );
        let nearest = nearest?;
        let dedicated = self.pricing.dedicated.quote(city, &nearest);

        let quote = Quote::assemble(model, &request, rental, nearest, dedicated, courier);
        info!(
            city = %quote.destination_city,
            warehouse = %quote.nearest_warehouse,
            distance_km = quote.distance_km,
            rental = %quote.rental_cost,
            "Quote calculated"
        );
        Ok(quote)
    }

    /// Nearest warehouse and distance. Fatal on failure.
    async fn nearest_warehouse(&self, city: &str) -> EngineResult<NearestWarehouse> {
        if let Some(warehouse) = warehouse_named(city, &self.pricing.warehouses) {
            debug!(warehouse = %warehouse.name, "Destination is a warehouse");
            return Ok(at_warehouse(warehouse));
        }

        let coordinates = self
            .geocoder
            .locate(city)
            .await
            .map_err(|source| EngineError::Geocode {
                city: city.to_string(),
                source,
            })?;

        let nearest = nearest_warehouse(coordinates, &self.pricing.warehouses)?;
        debug!(
            warehouse = %nearest.warehouse,
            distance_km = nearest.distance_km,
            "Nearest warehouse"
        );
        Ok(nearest)
    }

    /// Courier option. Never fails: problems become a quote-required option.
    async fn courier_quote(&self, city: &str, quantity: u32) -> CourierQuote {
        match self.try_courier_quote(city, quantity).await {
            Ok(quote) => quote,
            Err(e) => {
                warn!(city = %city, error = %e, "Courier price unavailable");
                CourierQuote::degraded(format!("Courier price unavailable: {}", e))
            }
        }
    }

    async fn try_courier_quote(&self, city: &str, quantity: u32) -> EngineResult<CourierQuote> {
        let courier = &self.pricing.courier;

        let area = match courier.special_area(city) {
            Some(area) => {
                debug!(area = %area, "Special courier area");
                area
            }
            None => {
                let resolved =
                    self.geocoder
                        .resolve_city(city)
                        .await
                        .map_err(|source| EngineError::Geocode {
                            city: city.to_string(),
                            source,
                        })?;
                courier.area_for_region(&resolved.region)?
            }
        };

        Ok(courier.quote(area, quantity)?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
