// ABOUTME: Build pipeline orchestration from raw table maps to derived artifacts
// ABOUTME: Full update sequences FK conversion, recipe/product builds, and nutrition caches
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fournee

//! # Build Pipeline
//!
//! The pipeline derives everything sellable from the hand-maintained map
//! tables: recipes from ingredient slots, products from recipes and physical
//! variants, nutrition labels from both, and a rebuilt `ProductMap` the
//! storefront reads. [`full_update`] runs the whole chain in dependency
//! order; the sub-modules are each independently callable.

/// Foreign-key column conversion between id and name views
pub mod fkeys;
/// Typed access over fetched table maps
pub mod maps;
/// Nutrition aggregation and persisted label caches
pub mod nutrition;
/// Heuristic shipping bag selection
pub mod packing;
/// Product expansion across shape/size variants
pub mod products;
/// Recipe generation from ingredient slots
pub mod recipes;

use fournee_core::constants::maps as map_names;
use fournee_core::errors::{AppError, AppResult};
use fournee_core::models::{Product, Row};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::store::{ColumnSpec, ColumnType};
use crate::ServerResources;

use self::fkeys::{ConversionReport, Direction};
use self::maps::TableMaps;

/// Junction tables the pipeline needs in the relational id view before a
/// build can run
pub const ID_VIEW_TABLES: &[&str] = &[
    map_names::CATEGORY_INGREDIENT,
    map_names::SUB_CATEGORY_INGREDIENT,
    map_names::CATEGORY_SHAPE,
    map_names::CATEGORY_SHAPE_SIZE,
    map_names::SUB_CATEGORY_AVG_WEIGHT,
];

/// Summary of one full pipeline run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FullUpdateReport {
    /// Per-table conversion outcomes
    pub conversions: Vec<ConversionReport>,
    /// Recipes constructed
    pub recipes_built: usize,
    /// Products constructed
    pub products_built: usize,
    /// Products with persisted nutrition facts
    pub nutrition_facts_built: usize,
    /// Per-unit errors that were skipped during the build
    pub skipped: Vec<String>,
}

/// Run the complete pipeline: normalize the junction tables to the id view,
/// build recipes and products, rebuild the product table, and refresh the
/// nutrition caches.
///
/// # Errors
///
/// Fails when every junction table refuses conversion, when a required map
/// cannot be fetched, or when the product table rebuild fails. Per-row and
/// per-recipe data problems are reported, not fatal.
pub async fn full_update(resources: &ServerResources) -> AppResult<FullUpdateReport> {
    let cache = &resources.cache;

    // Junction tables may arrive in either view; normalize before building
    let mut conversions = Vec::with_capacity(ID_VIEW_TABLES.len());
    let mut conversion_errors = 0usize;
    for table in ID_VIEW_TABLES {
        match fkeys::convert_table(cache, table, Direction::ToId).await {
            Ok(report) => conversions.push(report),
            Err(e) => {
                warn!("conversion of {table} failed: {e}");
                conversion_errors += 1;
            }
        }
    }
    if conversion_errors == ID_VIEW_TABLES.len() {
        return Err(AppError::external_service(
            "table store",
            "no junction table could be converted to the id view",
        ));
    }

    let table_maps = TableMaps::fetch(cache).await?;

    let recipe_outcome = recipes::build_recipes(&table_maps)?;
    let product_outcome = products::build_products(&table_maps, &recipe_outcome.recipes)?;

    publish_products(resources, &product_outcome.products).await?;

    let recipe_facts = nutrition::build_recipe_facts(&table_maps, &recipe_outcome.recipes)?;
    let product_facts =
        nutrition::build_product_facts(&table_maps, &recipe_facts, &product_outcome.products)?;

    let paths = &resources.config.nutrition;
    nutrition::write_cache(&paths.recipe_facts_path, &recipe_facts).await?;
    nutrition::write_cache(&paths.product_facts_path, &product_facts).await?;

    let report = FullUpdateReport {
        conversions,
        recipes_built: recipe_outcome.recipes.len(),
        products_built: product_outcome.products.len(),
        nutrition_facts_built: product_facts.count,
        skipped: recipe_outcome
            .skipped
            .iter()
            .chain(product_outcome.skipped.iter())
            .map(ToString::to_string)
            .collect(),
    };

    info!(
        "full update: {} recipes, {} products, {} nutrition entries, {} skipped",
        report.recipes_built,
        report.products_built,
        report.nutrition_facts_built,
        report.skipped.len()
    );

    Ok(report)
}

/// Columns of the rebuilt product table
fn product_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("ProductID", ColumnType::Number),
        ColumnSpec::new("SKU", ColumnType::Text),
        ColumnSpec::new("RecipeSKU", ColumnType::Text),
        ColumnSpec::new("Name", ColumnType::Text),
        ColumnSpec::new("Description", ColumnType::Text),
        ColumnSpec::new("RecipeCost", ColumnType::Number),
        ColumnSpec::new("Available", ColumnType::Checkbox),
        ColumnSpec::new("Ingredients", ColumnType::Text),
    ]
}

/// Replace the derived product table wholesale. The table is rebuilt from
/// scratch on every run, so a failure here fails the whole update rather than
/// leaving a half-written table in place.
async fn publish_products(resources: &ServerResources, products: &[Product]) -> AppResult<()> {
    let store = resources.cache.store();

    store.delete_table(map_names::PRODUCT).await?;
    store
        .create_table(map_names::PRODUCT, &product_columns())
        .await?;

    let rows: Vec<Row> = products
        .iter()
        .enumerate()
        .filter_map(|(index, product)| {
            json!({
                "ProductID": index as i64 + 1,
                "SKU": product.sku,
                "RecipeSKU": product.recipe_sku,
                "Name": product.name,
                "Description": product.description,
                "RecipeCost": product.recipe_cost,
                "Available": product.available,
                "Ingredients": product.ingredients.join(", "),
            })
            .as_object()
            .cloned()
        })
        .collect();

    store.append_rows(map_names::PRODUCT, rows).await?;
    resources.cache.invalidate(map_names::PRODUCT).await;

    info!("published {} products", products.len());
    Ok(())
}
