// ABOUTME: Remote table store backend over a SeaTable-style REST API
// ABOUTME: Shared pooled reqwest client, token auth, concurrent per-table fetches
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fournee

use super::{ColumnSpec, ColumnType, RowUpdate, TableStore};
use async_trait::async_trait;
use fournee_core::errors::{AppError, AppResult};
use fournee_core::models::Row;
use futures_util::future::try_join_all;
use reqwest::{Client, ClientBuilder, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connection timeout in seconds
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Configured timeout values for the shared client
static CLIENT_TIMEOUTS: OnceLock<(u64, u64)> = OnceLock::new();

/// Global shared HTTP client for table-store calls
static SHARED_CLIENT: OnceLock<Client> = OnceLock::new();

/// Initialize the shared HTTP client timeout configuration.
///
/// Must be called once at server startup before the store issues requests.
/// If not called, reasonable defaults are used.
pub fn initialize_shared_client(timeout_secs: u64, connect_timeout_secs: u64) {
    let _ = CLIENT_TIMEOUTS.set((timeout_secs, connect_timeout_secs));
}

/// Get the shared pooled HTTP client
fn shared_client() -> &'static Client {
    SHARED_CLIENT.get_or_init(|| {
        let (timeout, connect_timeout) = CLIENT_TIMEOUTS
            .get()
            .copied()
            .unwrap_or((DEFAULT_TIMEOUT_SECS, DEFAULT_CONNECT_TIMEOUT_SECS));

        ClientBuilder::new()
            .timeout(Duration::from_secs(timeout))
            .connect_timeout(Duration::from_secs(connect_timeout))
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}

/// Remote [`TableStore`] backed by a SeaTable-style REST API.
///
/// All requests carry token auth; read failures map to
/// [`ErrorCode::ExternalService`](fournee_core::errors::ErrorCode::ExternalService)
/// so callers can apply their retry policy to idempotent reads.
pub struct SeaTableStore {
    base_url: String,
    api_token: String,
}

#[derive(Deserialize)]
struct RowsResponse {
    rows: Vec<Row>,
}

impl SeaTableStore {
    /// Create a store client for the given base URL and API token
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            api_token: api_token.into(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        shared_client()
            .request(method, format!("{}{path}", self.base_url))
            .header("Authorization", format!("Token {}", self.api_token))
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        context: &str,
    ) -> AppResult<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::external_service("table store", context).with_source(e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Body detail stays in server logs only
        let body = response.text().await.unwrap_or_default();
        debug!("table store call failed: {context}: {status}: {body}");
        Err(AppError::external_service(
            "table store",
            format!("{context}: HTTP {status}"),
        ))
    }

    async fn fetch_map(&self, name: &str) -> AppResult<(String, Vec<Row>)> {
        let request = self
            .request(reqwest::Method::GET, "/api/v1/rows")
            .query(&[("table_name", name)]);

        let response = self.send(request, &format!("fetch {name}")).await?;
        let rows: RowsResponse = response
            .json()
            .await
            .map_err(|e| AppError::external_service("table store", "decode rows").with_source(e))?;

        debug!("fetched {} rows from {name}", rows.rows.len());
        Ok((name.to_owned(), rows.rows))
    }
}

#[async_trait]
impl TableStore for SeaTableStore {
    async fn get_maps(&self, names: &[&str]) -> AppResult<HashMap<String, Vec<Row>>> {
        // Independent tables populate disjoint keys; fetch them concurrently
        // and await together.
        let fetched = try_join_all(names.iter().map(|name| self.fetch_map(name))).await?;
        Ok(fetched.into_iter().collect())
    }

    async fn update_rows(&self, table: &str, updates: &[RowUpdate]) -> AppResult<()> {
        let payload = json!({
            "table_name": table,
            "updates": updates,
        });

        let request = self
            .request(reqwest::Method::PUT, "/api/v1/rows/batch")
            .json(&payload);
        self.send(request, &format!("update {} rows in {table}", updates.len()))
            .await?;
        Ok(())
    }

    async fn rename_and_retype_column(
        &self,
        table: &str,
        old_name: &str,
        new_name: &str,
        new_type: ColumnType,
    ) -> AppResult<()> {
        let payload = json!({
            "table_name": table,
            "column": old_name,
            "new_column_name": new_name,
            "new_column_type": new_type,
        });

        let request = self
            .request(reqwest::Method::PUT, "/api/v1/columns")
            .json(&payload);
        self.send(request, &format!("rename {table}.{old_name} to {new_name}"))
            .await?;
        Ok(())
    }

    async fn create_table(&self, table: &str, columns: &[ColumnSpec]) -> AppResult<()> {
        let payload = json!({
            "table_name": table,
            "columns": columns,
        });

        let request = self
            .request(reqwest::Method::POST, "/api/v1/tables")
            .json(&payload);
        self.send(request, &format!("create table {table}")).await?;
        Ok(())
    }

    async fn delete_table(&self, table: &str) -> AppResult<()> {
        let request = self
            .request(reqwest::Method::DELETE, "/api/v1/tables")
            .query(&[("table_name", table)]);

        match self.send(request, &format!("delete table {table}")).await {
            Ok(_) => Ok(()),
            // Deleting an absent table is a no-op so full rebuilds are
            // idempotent on retry.
            Err(e) if e.message.contains(&StatusCode::NOT_FOUND.as_u16().to_string()) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn append_rows(&self, table: &str, rows: Vec<Row>) -> AppResult<()> {
        let payload = json!({
            "table_name": table,
            "rows": rows,
        });

        let request = self
            .request(reqwest::Method::POST, "/api/v1/rows/batch")
            .json(&payload);
        self.send(request, &format!("append {} rows to {table}", rows.len()))
            .await?;
        Ok(())
    }
}
