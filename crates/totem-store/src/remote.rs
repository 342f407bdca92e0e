//! # Remote Inventory
//!
//! Client for the shared inventory row behind a PostgREST endpoint
//! (Supabase-compatible).
//!
//! ## Wire Format
//! ```text
//!   GET  {base}/rest/v1/shared_inventory?id=eq.shared&select=data,updated_at
//!        apikey: <key>
//!        Authorization: Bearer <key>
//!   ◄──  [{"data": [<TotemModel>, ...], "updated_at": "2024-05-01T10:00:00Z"}]
//!        []                      ← row never written: no data
//!
//!   POST {base}/rest/v1/shared_inventory
//!        Prefer: resolution=merge-duplicates,return=minimal
//!        {"id": "shared", "data": [...], "updated_at": "..."}
//! ```
//!
//! Concurrent writers are not reconciled: the last upsert wins.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use totem_core::TotemModel;

/// Connection settings for the shared store.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    pub base_url: String,
    pub api_key: String,
    pub table: String,
    pub row_id: String,
    pub timeout: Duration,
}

impl RemoteConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        RemoteConfig {
            base_url: base_url.into(),
            api_key: api_key.into(),
            table: "shared_inventory".to_string(),
            row_id: "shared".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Sets the table name.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), self.table)
    }
}

#[derive(Debug, Deserialize)]
struct InventoryRow {
    #[serde(default)]
    data: Option<Vec<TotemModel>>,
}

#[derive(Debug, Serialize)]
struct InventoryUpsert<'a> {
    id: &'a str,
    data: &'a [TotemModel],
    updated_at: String,
}

/// HTTP client for the shared inventory row.
#[derive(Debug, Clone)]
pub struct RemoteInventory {
    client: reqwest::Client,
    config: RemoteConfig,
}

impl RemoteInventory {
    pub fn new(config: RemoteConfig) -> StoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        Ok(RemoteInventory { client, config })
    }

    /// Fetches the shared list. `None` when the row does not exist yet.
    pub async fn fetch(&self) -> StoreResult<Option<Vec<TotemModel>>> {
        debug!(table = %self.config.table, "Fetching shared inventory");

        let response = self
            .client
            .get(self.config.table_url())
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .query(&[
                ("id", format!("eq.{}", self.config.row_id)),
                ("select", "data,updated_at".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let rows: Vec<InventoryRow> = response.json().await?;
        Ok(rows.into_iter().next().and_then(|row| row.data))
    }

    /// Upserts the whole list into the shared row.
    pub async fn store(&self, models: &[TotemModel]) -> StoreResult<()> {
        debug!(
            table = %self.config.table,
            models = models.len(),
            "Writing shared inventory"
        );

        let body = InventoryUpsert {
            id: &self.config.row_id,
            data: models,
            updated_at: Utc::now().to_rfc3339(),
        };

        let response = self
            .client
            .post(self.config.table_url())
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        Ok(())
    }
}

async fn status_error(response: reqwest::Response) -> StoreError {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    warn!(status, "Shared inventory request failed");
    StoreError::Remote { status, body }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use totem_core::catalog::seed_inventory;
    use wiremock::matchers::{body_partial_json, header, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn remote(server: &MockServer) -> RemoteInventory {
        RemoteInventory::new(RemoteConfig::new(server.uri(), "anon-key")).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_reads_data_column() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/shared_inventory"))
            .and(query_param("id", "eq.shared"))
            .and(header("apikey", "anon-key"))
            .and(header("authorization", "Bearer anon-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "data": [{"id": "1", "name": "Totem", "pricingTiers": [{"quantity": 1, "dailyRate": 99.5}]}],
                "updated_at": "2024-05-01T10:00:00+00:00"
            }])))
            .mount(&server)
            .await;

        let models = remote(&server).fetch().await.unwrap().unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].pricing_tiers[0].daily_rate.cents(), 9950);
    }

    #[tokio::test]
    async fn test_missing_row_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        assert!(remote(&server).fetch().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = remote(&server).fetch().await.unwrap_err();
        match err {
            StoreError::Remote { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_store_upserts_whole_list() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/shared_inventory"))
            .and(header_exists("prefer"))
            .and(body_partial_json(json!({"id": "shared"})))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        remote(&server).store(&seed_inventory()).await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_store_is_network_error() {
        let config = RemoteConfig::new("http://127.0.0.1:9", "k").timeout(Duration::from_millis(500));
        let err = RemoteInventory::new(config).unwrap().fetch().await.unwrap_err();
        assert!(err.is_retryable());
    }
}
