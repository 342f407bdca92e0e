//! # Snapshot Repository
//!
//! Whole-document storage for the local inventory cache.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ inventory_snapshot                                           │
//! │ ──────────────────────────────────────────────────────────── │
//! │ id = "shared" │ data = [{"id":"1","name":...}] │ updated_at  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! A save replaces the entire `data` column in a single statement, so a
//! reader sees either the previous list or the new one, never a mix.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::StoreResult;
use totem_core::TotemModel;

/// An inventory list with the time it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct InventorySnapshot {
    pub models: Vec<TotemModel>,
    pub updated_at: DateTime<Utc>,
}

/// Repository for inventory snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotRepository {
    pool: SqlitePool,
}

impl SnapshotRepository {
    /// Creates a new SnapshotRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SnapshotRepository { pool }
    }

    /// Reads the snapshot stored under `key`, if any.
    pub async fn get(&self, key: &str) -> StoreResult<Option<InventorySnapshot>> {
        let row: Option<(String, DateTime<Utc>)> =
            sqlx::query_as("SELECT data, updated_at FROM inventory_snapshot WHERE id = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        let Some((data, updated_at)) = row else {
            debug!(key = %key, "No cached snapshot");
            return Ok(None);
        };

        let models: Vec<TotemModel> = serde_json::from_str(&data)?;
        debug!(key = %key, models = models.len(), "Loaded cached snapshot");
        Ok(Some(InventorySnapshot { models, updated_at }))
    }

    /// Replaces the snapshot stored under `key`.
    pub async fn put(&self, key: &str, models: &[TotemModel]) -> StoreResult<DateTime<Utc>> {
        let data = serde_json::to_string(models)?;
        let updated_at = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO inventory_snapshot (id, data, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                data = excluded.data,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(&data)
        .bind(updated_at)
        .execute(&self.pool)
        .await?;

        debug!(key = %key, models = models.len(), "Stored snapshot");
        Ok(updated_at)
    }

    /// Removes the snapshot under `key`. Returns whether a row existed.
    pub async fn delete(&self, key: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM inventory_snapshot WHERE id = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::{Database, DbConfig};
    use totem_core::catalog::{add_model, seed_inventory};

    async fn repo() -> SnapshotRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().snapshots()
    }

    #[tokio::test]
    async fn test_missing_snapshot_is_none() {
        assert!(repo().await.get("shared").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_whole_document() {
        let repo = repo().await;
        let seed = seed_inventory();
        repo.put("shared", &seed).await.unwrap();

        let (two, _) = add_model(&seed, "Totem Touch").unwrap();
        repo.put("shared", &two).await.unwrap();

        let stored = repo.get("shared").await.unwrap().unwrap();
        assert_eq!(stored.models, two);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let repo = repo().await;
        repo.put("a", &seed_inventory()).await.unwrap();
        assert!(repo.get("b").await.unwrap().is_none());
        assert!(repo.delete("a").await.unwrap());
        assert!(!repo.delete("a").await.unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_row_is_decode_error() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        sqlx::query("INSERT INTO inventory_snapshot (id, data, updated_at) VALUES ('shared', 'not json', '2024-01-01T00:00:00Z')")
            .execute(db.pool())
            .await
            .unwrap();
        let err = db.snapshots().get("shared").await.unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }
}
