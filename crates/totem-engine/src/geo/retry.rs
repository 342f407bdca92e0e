//! # Retrying Resolver
//!
//! Opt-in retry policy around any [`GeoResolver`].
//!
//! ```text
//!   geocode ──► inner.geocode ──ok──► done
//!                   │
//!                   │ retryable (network, timeout, 5xx, 429)
//!                   ▼
//!              sleep(next backoff) ──► try again, up to max_retries
//! ```
//!
//! Providers themselves never retry; this wrapper is only installed when
//! `geocoder.retries` is above zero.

use async_trait::async_trait;
use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::{GeoResolver, GeocodedPlace};
use crate::config::GeocoderSettings;
use crate::error::GeoResult;

/// How often and how patiently to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    pub fn from_settings(settings: &GeocoderSettings) -> Self {
        RetryPolicy {
            max_retries: settings.retries,
            initial_backoff: Duration::from_millis(settings.initial_backoff_ms),
            max_backoff: Duration::from_secs(settings.max_backoff_secs),
        }
    }

    fn create_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: self.initial_backoff,
            max_interval: self.max_backoff,
            max_elapsed_time: None,
            ..Default::default()
        }
    }
}

/// Wraps a provider with exponential-backoff retries.
pub struct RetryingResolver {
    inner: Arc<dyn GeoResolver>,
    policy: RetryPolicy,
}

impl RetryingResolver {
    pub fn new(inner: Arc<dyn GeoResolver>, policy: RetryPolicy) -> Self {
        RetryingResolver { inner, policy }
    }
}

#[async_trait]
impl GeoResolver for RetryingResolver {
    fn provider(&self) -> &'static str {
        self.inner.provider()
    }

    async fn geocode(&self, city: &str) -> GeoResult<GeocodedPlace> {
        let mut backoff = self.policy.create_backoff();
        let mut attempt = 0u32;

        loop {
            let err = match self.inner.geocode(city).await {
                Ok(place) => return Ok(place),
                Err(e) => e,
            };

            if !err.is_retryable() || attempt >= self.policy.max_retries {
                return Err(err);
            }
            attempt += 1;

            let Some(delay) = backoff.next_backoff() else {
                return Err(err);
            };
            warn!(
                provider = self.inner.provider(),
                attempt,
                error = %err,
                "Geocode failed, retrying"
            );
            debug!(?delay, "Waiting before retry");
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeoError;
    use std::sync::atomic::{AtomicU32, Ordering};
    use totem_core::Coordinates;

    /// Fails the first `failures` calls.
    struct Flaky {
        failures: u32,
        calls: AtomicU32,
        retryable: bool,
    }

    #[async_trait]
    impl GeoResolver for Flaky {
        fn provider(&self) -> &'static str {
            "flaky"
        }

        async fn geocode(&self, _city: &str) -> GeoResult<GeocodedPlace> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(if self.retryable {
                    GeoError::Status {
                        status: 503,
                        body: String::new(),
                    }
                } else {
                    GeoError::NoResults {
                        query: "x".into(),
                    }
                });
            }
            Ok(GeocodedPlace {
                coordinates: Coordinates::new(41.9, 12.5),
                region: Some("Lazio".into()),
                display_name: None,
            })
        }
    }

    fn policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(5),
        }
    }

    fn flaky(failures: u32, retryable: bool) -> Arc<Flaky> {
        Arc::new(Flaky {
            failures,
            calls: AtomicU32::new(0),
            retryable,
        })
    }

    #[tokio::test]
    async fn test_recovers_within_budget() {
        let inner = flaky(2, true);
        let resolver = RetryingResolver::new(inner.clone(), policy(3));

        let place = resolver.geocode("Roma").await.unwrap();
        assert_eq!(place.region.as_deref(), Some("Lazio"));
        assert_eq!(inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_budget() {
        let inner = flaky(10, true);
        let resolver = RetryingResolver::new(inner.clone(), policy(2));

        assert!(resolver.geocode("Roma").await.is_err());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_errors_are_not_retried() {
        let inner = flaky(1, false);
        let resolver = RetryingResolver::new(inner.clone(), policy(5));

        let err = resolver.geocode("Roma").await.unwrap_err();
        assert!(matches!(err, GeoError::NoResults { .. }));
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_derived_lookups_go_through_retries() {
        let inner = flaky(1, true);
        let resolver = RetryingResolver::new(inner, policy(1));
        assert_eq!(resolver.resolve_city("Roma").await.unwrap().region, "Lazio");
    }
}
