//! # Store Error Types
//!
//! Error types for inventory persistence.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  sqlx::Error ─────┐                                                    │
//! │  reqwest::Error ──┼──► StoreError (this module)                         │
//! │  serde_json ──────┘        │                                            │
//! │                            ▼                                            │
//! │               InventoryChain turns it into a warning                   │
//! │               and tries the next source                                │
//! │                            │                                            │
//! │                            ▼                                            │
//! │               AllSourcesFailed only when nothing answered              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Inventory store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Cache file can't be created (permissions, missing directory)
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// The shared store could not be reached.
    #[error("Network error: {0}")]
    Network(String),

    /// The shared store answered with a non-success status.
    #[error("Remote store returned {status}: {body}")]
    Remote { status: u16, body: String },

    /// Stored data is not a valid inventory document.
    #[error("Invalid inventory data: {0}")]
    Decode(String),

    /// The source does not accept writes.
    #[error("{source_name} is read-only")]
    ReadOnly { source_name: String },

    /// No source in the chain produced (or accepted) an inventory.
    #[error("All inventory sources failed: {}", .failures.join("; "))]
    AllSourcesFailed { failures: Vec<String> },

    /// Internal error.
    #[error("Internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Whether the same call might succeed later.
    pub fn is_retryable(&self) -> bool {
        match self {
            StoreError::Network(_) | StoreError::PoolExhausted => true,
            StoreError::Remote { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

/// Convert sqlx errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → StoreError::QueryFailed
/// sqlx::Error::PoolTimedOut   → StoreError::PoolExhausted
/// sqlx::Error::PoolClosed     → StoreError::ConnectionFailed
/// Other                       → StoreError::Internal
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => StoreError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => StoreError::PoolExhausted,
            sqlx::Error::PoolClosed => StoreError::ConnectionFailed("Pool is closed".to_string()),
            _ => StoreError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Decode(err.to_string())
        } else {
            StoreError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
