//! # Database Migrations
//!
//! Embedded SQL migrations for the local inventory cache.
//!
//! ```text
//!   startup ──► _sqlx_migrations ──► compare with embedded files
//!                                          │
//!                     001_inventory_snapshot.sql ✓ / ⬜ ──► run pending in order
//! ```
//!
//! Never edit an applied migration; add the next numbered file to
//! `migrations/sqlite/` instead.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::StoreResult;

/// Migrations embedded from `migrations/sqlite` at compile time.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending migrations. Each one runs in its own transaction.
pub async fn run_migrations(pool: &SqlitePool) -> StoreResult<()> {
    info!("Checking for pending migrations");
    MIGRATOR.run(pool).await?;
    info!("All migrations applied successfully");
    Ok(())
}

/// Returns `(embedded, applied)` migration counts, for diagnostics.
pub async fn migration_status(pool: &SqlitePool) -> StoreResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();
    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .unwrap_or(0);
    Ok((total, applied as usize))
}
