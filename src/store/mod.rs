// ABOUTME: Table store abstraction for the source-of-truth tabular data
// ABOUTME: Async trait seam with remote (SeaTable-style) and in-memory backends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fournee

//! # Table Store
//!
//! The pipeline's source of truth is a remote spreadsheet-like service
//! exposing named "maps" (row arrays per logical table). [`TableStore`] is the
//! narrow seam the pipeline talks through; [`seatable::SeaTableStore`] backs
//! it with the remote REST API and [`memory::MemoryStore`] backs it with plain
//! in-process tables for tests and hermetic runs.

/// In-memory backend for tests and hermetic runs
pub mod memory;
/// Remote REST backend
pub mod seatable;

use async_trait::async_trait;
use fournee_core::errors::AppResult;
use fournee_core::models::Row;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Column data type for schema mutations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Numeric column
    Number,
    /// Text column
    Text,
    /// Boolean column
    Checkbox,
}

/// Column definition for table creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name
    pub name: String,
    /// Column data type
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl ColumnSpec {
    /// Convenience constructor
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// A partial field update for one row, addressed by the table's own id column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowUpdate {
    /// Value of the table's `<TableName>ID` column
    pub row_id: i64,
    /// Columns to set
    pub fields: Row,
}

/// The id column a table addresses its own rows by: `IngredientMap` rows
/// carry `IngredientID`, and so on.
#[must_use]
pub fn id_column(table: &str) -> String {
    format!("{}ID", table.strip_suffix("Map").unwrap_or(table))
}

/// Narrow contract over the remote tabular service. Implementations must
/// reflect the latest synced snapshot on reads.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Fetch the requested named maps. Independent tables may be fetched
    /// concurrently; results populate disjoint keys.
    async fn get_maps(&self, names: &[&str]) -> AppResult<HashMap<String, Vec<Row>>>;

    /// Apply partial field updates by row identity. Applications for one
    /// table must be serialized by the caller; this call is one serialized
    /// batch.
    async fn update_rows(&self, table: &str, updates: &[RowUpdate]) -> AppResult<()>;

    /// Rename a column and change its type (remote schema mutation)
    async fn rename_and_retype_column(
        &self,
        table: &str,
        old_name: &str,
        new_name: &str,
        new_type: ColumnType,
    ) -> AppResult<()>;

    /// Create a table with the given columns
    async fn create_table(&self, table: &str, columns: &[ColumnSpec]) -> AppResult<()>;

    /// Delete a table wholesale (used when rebuilding the derived product table)
    async fn delete_table(&self, table: &str) -> AppResult<()>;

    /// Append rows to a table
    async fn append_rows(&self, table: &str, rows: Vec<Row>) -> AppResult<()>;
}

#[cfg(test)]
mod tests {
    use super::id_column;

    #[test]
    fn id_column_strips_map_suffix() {
        assert_eq!(id_column("IngredientMap"), "IngredientID");
        assert_eq!(id_column("CategoryShapeSizeMap"), "CategoryShapeSizeID");
        assert_eq!(id_column("Product"), "ProductID");
    }
}
