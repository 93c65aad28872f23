// ABOUTME: Pipeline trigger endpoints
// ABOUTME: Recipe/product preview build and the full publishing update
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fournee

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::build::{self, maps::TableMaps, products, recipes};
use crate::ServerResources;

use super::ApiError;

/// Build recipes and products from the current maps without publishing
/// anything. Useful for previewing the effect of table edits.
pub async fn build_recipes(
    State(resources): State<Arc<ServerResources>>,
) -> Result<Json<Value>, ApiError> {
    let table_maps = TableMaps::fetch(&resources.cache).await?;

    let recipe_outcome = recipes::build_recipes(&table_maps)?;
    let product_outcome = products::build_products(&table_maps, &recipe_outcome.recipes)?;

    let skipped: Vec<String> = recipe_outcome
        .skipped
        .iter()
        .chain(product_outcome.skipped.iter())
        .map(ToString::to_string)
        .collect();

    Ok(Json(json!({
        "success": true,
        "recipeCount": recipe_outcome.recipes.len(),
        "productCount": product_outcome.products.len(),
        "recipes": recipe_outcome.recipes,
        "products": product_outcome.products,
        "skipped": skipped,
    })))
}

/// Run the full pipeline: normalize junction tables, rebuild the product
/// table, refresh nutrition caches.
pub async fn full_update(
    State(resources): State<Arc<ServerResources>>,
) -> Result<Json<Value>, ApiError> {
    let report = build::full_update(&resources).await?;

    Ok(Json(json!({
        "success": true,
        "report": report,
    })))
}
