// ABOUTME: Bag packing endpoints
// ABOUTME: Optimal bag lookup by dimension key plus a packaging cache refresh
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fournee

use axum::extract::{Query, State};
use axum::Json;
use fournee_core::constants::maps;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::build::packing;
use crate::ServerResources;

use super::ApiError;

/// Query parameters for an optimal-bag lookup
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimalBagParams {
    /// Treat dimension key, `sub-shape-size` digits
    pub dimension_key: String,
    /// Number of treats to pack
    pub amount: u32,
}

/// Cheapest bag combination for an order, or `null` when no catalog bag can
/// hold even one treat.
pub async fn optimal_bag(
    State(resources): State<Arc<ServerResources>>,
    Query(params): Query<OptimalBagParams>,
) -> Result<Json<Value>, ApiError> {
    let combination =
        packing::optimal_bag(&resources.cache, &params.dimension_key, params.amount).await?;

    Ok(Json(json!({
        "success": true,
        "combination": combination,
    })))
}

/// Drop the cached packaging catalog so the next lookup refetches it. The
/// catalog otherwise holds for a day.
pub async fn refresh(State(resources): State<Arc<ServerResources>>) -> Json<Value> {
    resources.cache.invalidate(maps::PACKAGING).await;

    Json(json!({
        "success": true,
        "message": "packaging catalog will be refetched on next use",
    }))
}
