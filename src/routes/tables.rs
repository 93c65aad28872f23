// ABOUTME: Foreign-key conversion endpoint
// ABOUTME: Converts one table's FK columns between id and name views
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fournee

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::build::fkeys::{self, Direction};
use crate::ServerResources;

use super::ApiError;

/// Query parameters for a conversion request
#[derive(Debug, Deserialize)]
pub struct ConvertParams {
    /// Target view: `id` or `name`
    pub to: String,
}

/// Convert one table's foreign-key columns to the requested view
pub async fn convert(
    State(resources): State<Arc<ServerResources>>,
    Path(table): Path<String>,
    Query(params): Query<ConvertParams>,
) -> Result<Json<Value>, ApiError> {
    let direction = Direction::parse(&params.to)?;
    let report = fkeys::convert_table(&resources.cache, &table, direction).await?;

    Ok(Json(json!({
        "success": true,
        "report": report,
    })))
}
