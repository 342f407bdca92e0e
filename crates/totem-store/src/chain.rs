//! # Inventory Chain
//!
//! Ordered fallback over [`InventorySource`]s.
//!
//! ## Load
//! ```text
//!   remote ──ok, non-empty──► adopt ──► mirror into local cache
//!     │ error / empty
//!     ▼
//!   local cache ──ok, any list──► adopt (warning recorded)
//!     │ error / never written
//!     ▼
//!   default inventory ──► adopt (never mirrored)
//! ```
//!
//! ## Save
//! ```text
//!   remote.save(list)       ──► ok | failure recorded
//!   local cache.save(list)  ──► always attempted, whatever the remote did
//! ```
//!
//! Failures along the way become warnings on the outcome. Only a chain where
//! nothing answered (or nothing accepted the write) returns an error.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::source::{InventorySource, SourceTier};
use totem_core::TotemModel;

/// Result of [`InventoryChain::load`].
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub models: Vec<TotemModel>,
    /// Name of the source that answered.
    pub source: String,
    pub tier: SourceTier,
    /// Failures of sources tried before (or mirrored after) the winner.
    pub warnings: Vec<String>,
}

impl LoadOutcome {
    /// True when the data did not come from the system of record.
    pub fn is_degraded(&self) -> bool {
        self.tier != SourceTier::Authoritative
    }
}

/// Result of [`InventoryChain::save`].
#[derive(Debug, Clone, Default)]
pub struct SaveReport {
    pub saved_to: Vec<String>,
    pub warnings: Vec<String>,
}

impl SaveReport {
    /// True when every writable source accepted the list.
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Sources tried in the order they were added.
#[derive(Clone, Default)]
pub struct InventoryChain {
    sources: Vec<Arc<dyn InventorySource>>,
}

impl InventoryChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a source after the existing ones.
    pub fn with_source(mut self, source: impl InventorySource + 'static) -> Self {
        self.sources.push(Arc::new(source));
        self
    }

    /// Appends an already-shared source.
    pub fn with_shared_source(mut self, source: Arc<dyn InventorySource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|source| source.name()).collect()
    }

    /// Loads from the first source that has data.
    ///
    /// An empty remote list counts as no data. An empty local snapshot is a
    /// saved state (every model removed) and is adopted as is.
    pub async fn load(&self) -> StoreResult<LoadOutcome> {
        let mut warnings = Vec::new();

        for (index, source) in self.sources.iter().enumerate() {
            match source.load().await {
                Ok(Some(models))
                    if !models.is_empty() || source.tier() == SourceTier::Cache =>
                {
                    info!(
                        source = source.name(),
                        models = models.len(),
                        "Inventory loaded"
                    );
                    if source.tier() != SourceTier::Fallback {
                        self.mirror(index, &models, &mut warnings).await;
                    }
                    return Ok(LoadOutcome {
                        models,
                        source: source.name().to_string(),
                        tier: source.tier(),
                        warnings,
                    });
                }
                Ok(_) => {
                    debug!(source = source.name(), "No inventory stored, trying next source");
                }
                Err(e) => {
                    warn!(source = source.name(), error = %e, "Inventory source failed");
                    warnings.push(format!("{}: {}", source.name(), e));
                }
            }
        }

        Err(StoreError::AllSourcesFailed { failures: warnings })
    }

    /// Refreshes every cache that did not produce `models`.
    async fn mirror(&self, winner: usize, models: &[TotemModel], warnings: &mut Vec<String>) {
        let caches = self
            .sources
            .iter()
            .enumerate()
            .filter(|(index, source)| *index != winner && source.tier() == SourceTier::Cache);

        for (_, cache) in caches {
            match cache.save(models).await {
                Ok(()) => debug!(cache = cache.name(), "Mirrored inventory"),
                Err(e) => {
                    warn!(cache = cache.name(), error = %e, "Mirroring inventory failed");
                    warnings.push(format!("{} (mirror): {}", cache.name(), e));
                }
            }
        }
    }

    /// Writes the whole list to every writable source.
    ///
    /// Each write is independent: a failed remote write does not skip the
    /// local mirror.
    pub async fn save(&self, models: &[TotemModel]) -> StoreResult<SaveReport> {
        let mut report = SaveReport::default();

        for source in self.sources.iter().filter(|s| s.tier().is_writable()) {
            match source.save(models).await {
                Ok(()) => {
                    debug!(source = source.name(), models = models.len(), "Inventory saved");
                    report.saved_to.push(source.name().to_string());
                }
                Err(e) => {
                    warn!(source = source.name(), error = %e, "Saving inventory failed");
                    report.warnings.push(format!("{}: {}", source.name(), e));
                }
            }
        }

        if report.saved_to.is_empty() {
            return Err(StoreError::AllSourcesFailed {
                failures: report.warnings,
            });
        }
        Ok(report)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
