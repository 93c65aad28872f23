// ABOUTME: Bidirectional foreign-key column conversion between id and name views
// ABOUTME: Resolves columns through the typed registry, rewrites values and column schema
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fournee

//! # Foreign-Key Converter
//!
//! Editors maintain the map tables with human-readable name columns
//! (`CategoryName`); the build pipeline wants relational id columns
//! (`CategoryID`). The converter rewrites a table between the two views:
//! every candidate column resolves through the [registry](crate::registry),
//! its values are looked up in the referenced map, and the column is renamed
//! and retyped in the store.
//!
//! A column converts atomically or not at all: one unmatched value fails the
//! whole column and leaves it untouched, so a half-converted table can never
//! exist. Converting a table already in the requested view is a no-op with an
//! empty report, which makes the operation idempotent.

use fournee_core::errors::{AppError, AppResult};
use fournee_core::models::Row;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::BuildCache;
use crate::registry::{self, ForeignKeyRelation};
use crate::store::{id_column, ColumnType, RowUpdate};

/// Conversion direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Name columns become id columns
    ToId,
    /// Id columns become name columns
    ToName,
}

impl Direction {
    /// Parse from the query-string form
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error for anything but `id` or `name`.
    pub fn parse(raw: &str) -> AppResult<Self> {
        match raw {
            "id" => Ok(Self::ToId),
            "name" => Ok(Self::ToName),
            other => Err(AppError::invalid_input(format!(
                "conversion target must be \"id\" or \"name\", got {other:?}"
            ))),
        }
    }
}

/// Per-table outcome of a conversion
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionReport {
    /// Table that was converted
    pub table: String,
    /// Columns rewritten to the requested view
    pub converted: Vec<String>,
    /// Columns with the right suffix but no registered relation
    pub skipped: Vec<String>,
    /// Columns left untouched because a value had no match
    pub failed: Vec<String>,
}

impl ConversionReport {
    /// Whether any column actually changed
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.converted.is_empty()
    }
}

/// Convert every eligible foreign-key column of `table` to the requested view.
///
/// # Errors
///
/// Propagates store failures; per-column data problems land in the report
/// instead.
pub async fn convert_table(
    cache: &BuildCache,
    table: &str,
    direction: Direction,
) -> AppResult<ConversionReport> {
    // Fresh fetch: the table is about to be rewritten, a cached view could be
    // mid-TTL stale
    let mut fetched = cache.store().get_maps(&[table]).await?;
    let mut rows = fetched.remove(table).unwrap_or_default();

    let mut report = ConversionReport {
        table: table.to_owned(),
        ..ConversionReport::default()
    };

    let Some(first) = rows.first() else {
        debug!("table {table} is empty, nothing to convert");
        return Ok(report);
    };

    let own_id = id_column(table);
    let candidates = gather_candidates(first, &own_id, direction, &mut report);

    for (column, relation) in candidates {
        let reference = cache.get_maps(&[relation.map]).await?;
        let reference = reference
            .get(relation.map)
            .ok_or_else(|| AppError::data_integrity(format!("map {} was not fetched", relation.map)))?;

        match convert_column(&rows, &own_id, &column, relation, direction, reference) {
            Ok(converted) => {
                let (new_column, column_type) = match direction {
                    Direction::ToId => (relation.id_column, ColumnType::Number),
                    Direction::ToName => (relation.name_column, ColumnType::Text),
                };

                cache
                    .store()
                    .rename_and_retype_column(table, &column, new_column, column_type)
                    .await?;
                cache.store().update_rows(table, &converted).await?;

                apply_locally(&mut rows, &own_id, &column, &converted);
                report.converted.push(column);
            }
            Err(e) => {
                warn!("column {column} of {table} left unconverted: {e}");
                report.failed.push(column);
            }
        }
    }

    if report.changed() {
        // Keep the cache's view of the table consistent with the rewrite
        cache.set_rows(table, rows).await;
        info!(
            "converted {} column(s) of {table} ({} skipped, {} failed)",
            report.converted.len(),
            report.skipped.len(),
            report.failed.len()
        );
    }

    Ok(report)
}

/// Columns eligible for conversion: right suffix for the direction, not the
/// table's own id column, and known to the registry. Suffix matches without a
/// registered relation are recorded as skips.
fn gather_candidates(
    first: &Row,
    own_id: &str,
    direction: Direction,
    report: &mut ConversionReport,
) -> Vec<(String, &'static ForeignKeyRelation)> {
    let mut candidates = Vec::new();

    for column in first.keys() {
        if column == own_id {
            continue;
        }

        let relation = match direction {
            Direction::ToId => {
                if !column.ends_with("Name") {
                    continue;
                }
                registry::by_name_column(column)
            }
            Direction::ToName => {
                if !column.ends_with("ID") {
                    continue;
                }
                registry::by_id_column(column)
            }
        };

        match relation {
            Some(relation) => candidates.push((column.clone(), relation)),
            None => {
                warn!("column {column} has no registered relation, skipping");
                report.skipped.push(column.clone());
            }
        }
    }

    candidates
}

/// Build the per-row updates for one column, failing on the first value with
/// no match in the referenced map.
fn convert_column(
    rows: &[Row],
    own_id: &str,
    column: &str,
    relation: &ForeignKeyRelation,
    direction: Direction,
    reference: &[Row],
) -> AppResult<Vec<RowUpdate>> {
    let new_column = match direction {
        Direction::ToId => relation.id_column,
        Direction::ToName => relation.name_column,
    };

    let mut updates = Vec::with_capacity(rows.len());

    for row in rows {
        let row_id = row
            .get(own_id)
            .and_then(Value::as_i64)
            .ok_or_else(|| AppError::data_integrity(format!("row without {own_id}")))?;

        let new_value = match direction {
            Direction::ToId => {
                let name = row
                    .get(column)
                    .and_then(Value::as_str)
                    .ok_or_else(|| missing(column, row_id))?;
                reference
                    .iter()
                    .find(|r| r.get("Name").and_then(Value::as_str) == Some(name))
                    .and_then(|r| r.get(relation.map_id_column).cloned())
                    .ok_or_else(|| no_match(relation, name))?
            }
            Direction::ToName => {
                let id = row
                    .get(column)
                    .and_then(Value::as_i64)
                    .ok_or_else(|| missing(column, row_id))?;
                reference
                    .iter()
                    .find(|r| r.get(relation.map_id_column).and_then(Value::as_i64) == Some(id))
                    .and_then(|r| r.get("Name").cloned())
                    .ok_or_else(|| no_match(relation, &id.to_string()))?
            }
        };

        let mut fields = Row::new();
        fields.insert(new_column.to_owned(), new_value);
        updates.push(RowUpdate { row_id, fields });
    }

    Ok(updates)
}

fn missing(column: &str, row_id: i64) -> AppError {
    AppError::data_integrity(format!("row {row_id} has no usable {column} value"))
}

fn no_match(relation: &ForeignKeyRelation, value: &str) -> AppError {
    AppError::data_integrity(format!("{} has no entry for {value:?}", relation.map))
}

/// Mirror the store rewrite onto the locally held rows. The update fields
/// already carry the new column name.
fn apply_locally(rows: &mut [Row], own_id: &str, old_column: &str, updates: &[RowUpdate]) {
    for row in rows.iter_mut() {
        row.remove(old_column);
        let row_id = row.get(own_id).and_then(Value::as_i64);
        if let Some(update) = updates.iter().find(|u| Some(u.row_id) == row_id) {
            for (key, value) in &update.fields {
                row.insert(key.clone(), value.clone());
            }
        }
    }
}
