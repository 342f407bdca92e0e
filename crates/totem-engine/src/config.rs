//! # Engine Configuration
//!
//! Configuration for geocoding, inventory storage and pricing tables.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TOTEM_GEOCODER=gemini                                              │
//! │     TOTEM_GEMINI_API_KEY=...                                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config PATH, or                                                  │
//! │     ~/.config/totem-quote/config.toml (Linux)                          │
//! │     ~/Library/Application Support/com.totem.totem-quote/config.toml    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     Nominatim, no remote store, reference pricing tables               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [geocoder]
//! provider = "nominatim"   # nominatim | gemini
//! timeout_secs = 10
//! retries = 0              # 0 = no retry
//!
//! [geocoder.gemini]
//! model = "gemini-2.5-flash"
//!
//! [store]
//! remote_url = "https://xyz.supabase.co"
//!
//! [pricing.dedicated]
//! per_km_rate = 1
//! ```
//!
//! Pricing tables are checked once at load: every area reachable from the
//! region map or a special-city rule must have a courier rate row.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use totem_core::PricingConfig;
use totem_store::{DbConfig, RemoteConfig};

/// Placeholder shown instead of credentials.
pub const REDACTED: &str = "<redacted>";

// =============================================================================
// Geocoder Provider
// =============================================================================

/// Which geocoding backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoProviderKind {
    /// OpenStreetMap Nominatim. No credential needed.
    #[default]
    Nominatim,

    /// Gemini structured-output completion. Needs an API key.
    Gemini,
}

impl std::fmt::Display for GeoProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoProviderKind::Nominatim => write!(f, "nominatim"),
            GeoProviderKind::Gemini => write!(f, "gemini"),
        }
    }
}

impl std::str::FromStr for GeoProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nominatim" | "osm" | "openstreetmap" => Ok(GeoProviderKind::Nominatim),
            "gemini" | "google" => Ok(GeoProviderKind::Gemini),
            other => Err(ConfigError::Invalid(format!(
                "Unknown geocoder: '{}'. Valid options: nominatim, gemini",
                other
            ))),
        }
    }
}

// =============================================================================
// Geocoder Settings
// =============================================================================

/// Nominatim endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NominatimSettings {
    #[serde(default = "default_nominatim_url")]
    pub base_url: String,

    /// Sent on every request; the public instance rejects anonymous clients.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_nominatim_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_user_agent() -> String {
    format!("totem-quote/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for NominatimSettings {
    fn default() -> Self {
        NominatimSettings {
            base_url: default_nominatim_url(),
            user_agent: default_user_agent(),
        }
    }
}

/// Gemini endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiSettings {
    #[serde(default = "default_gemini_url")]
    pub base_url: String,

    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Usually supplied through `TOTEM_GEMINI_API_KEY` rather than the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_gemini_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

impl Default for GeminiSettings {
    fn default() -> Self {
        GeminiSettings {
            base_url: default_gemini_url(),
            model: default_gemini_model(),
            api_key: None,
        }
    }
}

/// Geocoder selection and request behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocoderSettings {
    #[serde(default)]
    pub provider: GeoProviderKind,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Retries for transient failures. 0 disables the retry wrapper.
    #[serde(default)]
    pub retries: u32,

    /// First retry delay (milliseconds).
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    /// Ceiling for the retry delay (seconds).
    #[serde(default = "default_max_backoff")]
    pub max_backoff_secs: u64,

    #[serde(default)]
    pub nominatim: NominatimSettings,

    #[serde(default)]
    pub gemini: GeminiSettings,
}

fn default_timeout() -> u64 {
    10
}
fn default_initial_backoff() -> u64 {
    500
}
fn default_max_backoff() -> u64 {
    8
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        GeocoderSettings {
            provider: GeoProviderKind::default(),
            timeout_secs: default_timeout(),
            retries: 0,
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_secs: default_max_backoff(),
            nominatim: NominatimSettings::default(),
            gemini: GeminiSettings::default(),
        }
    }
}

// =============================================================================
// Store Settings
// =============================================================================

/// Where the inventory lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Local cache file. Defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,

    /// Shared PostgREST project URL. Without it only the local cache is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_key: Option<String>,

    #[serde(default = "default_remote_table")]
    pub remote_table: String,

    #[serde(default = "default_timeout")]
    pub remote_timeout_secs: u64,
}

fn default_remote_table() -> String {
    "shared_inventory".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            db_path: None,
            remote_url: None,
            remote_key: None,
            remote_table: default_remote_table(),
            remote_timeout_secs: default_timeout(),
        }
    }
}

impl StoreSettings {
    /// Effective local cache path.
    pub fn database_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .or_else(|| project_dirs().map(|dirs| dirs.data_dir().join("inventory.db")))
            .unwrap_or_else(|| PathBuf::from("inventory.db"))
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path())
    }

    /// Remote store settings, if a remote is configured.
    pub fn remote_config(&self) -> Option<RemoteConfig> {
        let url = self.remote_url.as_deref()?;
        let key = self.remote_key.clone().unwrap_or_default();
        Some(
            RemoteConfig::new(url, key)
                .table(&self.remote_table)
                .timeout(std::time::Duration::from_secs(self.remote_timeout_secs)),
        )
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub geocoder: GeocoderSettings,

    #[serde(default)]
    pub store: StoreSettings,

    /// Warehouses, tariffs and courier tables.
    #[serde(default)]
    pub pricing: PricingConfig,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config.toml`)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML file without applying overrides.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        check_url("geocoder.nominatim.base_url", &self.geocoder.nominatim.base_url)?;
        check_url("geocoder.gemini.base_url", &self.geocoder.gemini.base_url)?;

        if self.geocoder.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "geocoder.timeout_secs must be greater than 0".into(),
            ));
        }

        if self.geocoder.provider == GeoProviderKind::Gemini {
            if self.geocoder.gemini.model.trim().is_empty() {
                return Err(ConfigError::Invalid("geocoder.gemini.model is empty".into()));
            }
            let has_key = self
                .geocoder
                .gemini
                .api_key
                .as_deref()
                .is_some_and(|key| !key.trim().is_empty());
            if !has_key {
                return Err(ConfigError::MissingApiKey {
                    provider: GeoProviderKind::Gemini.to_string(),
                });
            }
        }

        if let Some(ref url) = self.store.remote_url {
            check_url("store.remote_url", url)?;
            if self.store.remote_key.as_deref().map_or(true, str::is_empty) {
                return Err(ConfigError::Invalid(
                    "store.remote_url is set but store.remote_key is missing".into(),
                ));
            }
        }

        self.pricing.validate()?;
        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup`, keyed by environment variable name.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(provider) = lookup("TOTEM_GEOCODER") {
            match provider.parse() {
                Ok(parsed) => {
                    debug!(provider = %provider, "Overriding geocoder from environment");
                    self.geocoder.provider = parsed;
                }
                Err(_) => warn!(provider = %provider, "Unknown geocoder in environment"),
            }
        }

        if let Some(url) = lookup("TOTEM_NOMINATIM_URL") {
            self.geocoder.nominatim.base_url = url;
        }

        if let Some(key) = lookup("TOTEM_GEMINI_API_KEY") {
            self.geocoder.gemini.api_key = Some(key);
        }

        if let Some(model) = lookup("TOTEM_GEMINI_MODEL") {
            self.geocoder.gemini.model = model;
        }

        if let Some(retries) = lookup("TOTEM_GEOCODER_RETRIES") {
            match retries.parse::<u32>() {
                Ok(n) => self.geocoder.retries = n,
                Err(_) => warn!(retries = %retries, "Invalid TOTEM_GEOCODER_RETRIES"),
            }
        }

        if let Some(url) = lookup("TOTEM_REMOTE_URL") {
            debug!(url = %url, "Overriding remote store from environment");
            self.store.remote_url = Some(url);
        }

        if let Some(key) = lookup("TOTEM_REMOTE_KEY") {
            self.store.remote_key = Some(key);
        }

        if let Some(path) = lookup("TOTEM_DB_PATH") {
            self.store.db_path = Some(PathBuf::from(path));
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Copy with every credential replaced by [`REDACTED`].
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.geocoder.gemini.api_key.is_some() {
            copy.geocoder.gemini.api_key = Some(REDACTED.to_string());
        }
        if copy.store.remote_key.is_some() {
            copy.store.remote_key = Some(REDACTED.to_string());
        }
        copy
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "totem", "totem-quote")
}

fn check_url(field: &str, value: &str) -> ConfigResult<()> {
    let parsed = url::Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        field: field.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            field: field.to_string(),
            reason: format!("expected http or https, got {}", parsed.scheme()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use totem_core::tables::BandRates;
    use totem_core::PricingArea;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!("nominatim".parse::<GeoProviderKind>().unwrap(), GeoProviderKind::Nominatim);
        assert_eq!("Gemini".parse::<GeoProviderKind>().unwrap(), GeoProviderKind::Gemini);
        assert!("bing".parse::<GeoProviderKind>().is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.geocoder.provider, GeoProviderKind::Nominatim);
        assert_eq!(config.geocoder.retries, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = EngineConfig::default();
        config.apply_overrides(env(&[
            ("TOTEM_GEOCODER", "gemini"),
            ("TOTEM_GEMINI_API_KEY", "secret"),
            ("TOTEM_GEOCODER_RETRIES", "3"),
            ("TOTEM_DB_PATH", "/tmp/totem.db"),
        ]));

        assert_eq!(config.geocoder.provider, GeoProviderKind::Gemini);
        assert_eq!(config.geocoder.gemini.api_key.as_deref(), Some("secret"));
        assert_eq!(config.geocoder.retries, 3);
        assert_eq!(config.store.database_path(), PathBuf::from("/tmp/totem.db"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_overrides_are_ignored() {
        let mut config = EngineConfig::default();
        config.apply_overrides(env(&[
            ("TOTEM_GEOCODER", "carrier-pigeon"),
            ("TOTEM_GEOCODER_RETRIES", "many"),
        ]));
        assert_eq!(config.geocoder.provider, GeoProviderKind::Nominatim);
        assert_eq!(config.geocoder.retries, 0);
    }

    #[test]
    fn test_gemini_requires_key() {
        let mut config = EngineConfig::default();
        config.geocoder.provider = GeoProviderKind::Gemini;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingApiKey { .. })
        ));
    }

    #[test]
    fn test_invalid_urls_rejected() {
        let mut config = EngineConfig::default();
        config.geocoder.nominatim.base_url = "not a url".into();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl { .. })));

        let mut config = EngineConfig::default();
        config.store.remote_url = Some("ftp://files.example".into());
        config.store.remote_key = Some("k".into());
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn test_remote_needs_key() {
        let mut config = EngineConfig::default();
        config.store.remote_url = Some("https://xyz.supabase.co".into());
        assert!(config.validate().is_err());

        config.store.remote_key = Some("anon".into());
        assert!(config.validate().is_ok());
        let remote = config.store.remote_config().unwrap();
        assert_eq!(remote.table, "shared_inventory");
    }

    #[test]
    fn test_missing_rate_row_fails_validation() {
        let mut config = EngineConfig::default();
        config.pricing.courier.rates.remove(&PricingArea::Sud);
        assert!(matches!(config.validate(), Err(ConfigError::Pricing(_))));

        config
            .pricing
            .courier
            .rates
            .insert(PricingArea::Sud, BandRates::euros(10, 20, 30, 40));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[geocoder]
provider = "nominatim"
retries = 2

[pricing.dedicated]
per_km_rate = 1.5
"#,
        )
        .unwrap();

        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(config.geocoder.retries, 2);
        assert_eq!(config.geocoder.timeout_secs, 10);
        assert_eq!(config.pricing.dedicated.per_km_rate.cents(), 150);
        assert_eq!(config.pricing.warehouses.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::load_or_default(Some(dir.path().join("absent.toml")));
        assert_eq!(config.geocoder.nominatim.base_url, default_nominatim_url());
    }

    #[test]
    fn test_broken_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[geocoder\nprovider = ").unwrap();
        assert!(matches!(
            EngineConfig::from_file(&path),
            Err(ConfigError::LoadFailed(_))
        ));
    }

    #[test]
    fn test_redacted_hides_credentials() {
        let mut config = EngineConfig::default();
        config.geocoder.gemini.api_key = Some("secret".into());
        config.store.remote_key = Some("anon".into());

        let rendered = config.redacted().to_toml().unwrap();
        assert!(!rendered.contains("secret"));
        assert!(!rendered.contains("anon"));
        assert!(rendered.contains(REDACTED));
    }

    #[test]
    fn test_rendered_config_reads_back() {
        let config = EngineConfig::default();
        let rendered = config.to_toml().unwrap();
        let parsed: EngineConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
