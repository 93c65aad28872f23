// ABOUTME: In-memory table store backend for tests and hermetic runs
// ABOUTME: Plain RwLock-guarded tables implementing the TableStore contract
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fournee

use super::{id_column, ColumnSpec, ColumnType, RowUpdate, TableStore};
use async_trait::async_trait;
use fournee_core::errors::{AppError, AppResult};
use fournee_core::models::Row;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory [`TableStore`] implementation.
///
/// Row order is preserved as seeded, which makes builds over it fully
/// deterministic — the same property the remote store provides through its
/// stable row ordering.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Vec<Row>>>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a table wholesale, replacing any existing rows
    pub async fn seed(&self, table: impl Into<String>, rows: Vec<Row>) {
        self.tables.write().await.insert(table.into(), rows);
    }

    /// Snapshot a table's rows (test inspection helper)
    pub async fn rows(&self, table: &str) -> Option<Vec<Row>> {
        self.tables.read().await.get(table).cloned()
    }

    /// Whether a table exists
    pub async fn has_table(&self, table: &str) -> bool {
        self.tables.read().await.contains_key(table)
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn get_maps(&self, names: &[&str]) -> AppResult<HashMap<String, Vec<Row>>> {
        let tables = self.tables.read().await;
        let mut maps = HashMap::with_capacity(names.len());

        for name in names {
            let rows = tables.get(*name).ok_or_else(|| {
                AppError::external_service("memory store", format!("unknown table {name}"))
            })?;
            maps.insert((*name).to_owned(), rows.clone());
        }

        Ok(maps)
    }

    async fn update_rows(&self, table: &str, updates: &[RowUpdate]) -> AppResult<()> {
        let key = id_column(table);
        let mut tables = self.tables.write().await;
        let rows = tables.get_mut(table).ok_or_else(|| {
            AppError::external_service("memory store", format!("unknown table {table}"))
        })?;

        for update in updates {
            let row = rows
                .iter_mut()
                .find(|row| {
                    row.get(&key).and_then(serde_json::Value::as_i64) == Some(update.row_id)
                })
                .ok_or_else(|| {
                    AppError::data_integrity(format!(
                        "no row with {key}={} in {table}",
                        update.row_id
                    ))
                })?;

            for (column, value) in &update.fields {
                row.insert(column.clone(), value.clone());
            }
        }

        Ok(())
    }

    async fn rename_and_retype_column(
        &self,
        table: &str,
        old_name: &str,
        new_name: &str,
        _new_type: ColumnType,
    ) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let rows = tables.get_mut(table).ok_or_else(|| {
            AppError::external_service("memory store", format!("unknown table {table}"))
        })?;

        for row in rows {
            if let Some(value) = row.remove(old_name) {
                row.insert(new_name.to_owned(), value);
            }
        }

        Ok(())
    }

    async fn create_table(&self, table: &str, _columns: &[ColumnSpec]) -> AppResult<()> {
        self.tables.write().await.insert(table.to_owned(), Vec::new());
        Ok(())
    }

    async fn delete_table(&self, table: &str) -> AppResult<()> {
        self.tables.write().await.remove(table);
        Ok(())
    }

    async fn append_rows(&self, table: &str, rows: Vec<Row>) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let existing = tables.get_mut(table).ok_or_else(|| {
            AppError::external_service("memory store", format!("unknown table {table}"))
        })?;
        existing.extend(rows);
        Ok(())
    }
}
