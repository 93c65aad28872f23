// ABOUTME: Shared test utilities and fixture data for integration tests
// ABOUTME: Provides a seeded in-memory table store modelling a small bakery
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fournee
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::too_many_lines,
    clippy::uninlined_format_args
)]

//! Shared test utilities for `fournee_build_server`
//!
//! One fixture bakery: a Cookie category with two subcategories, two flours,
//! two flavors (one unavailable), eggs and sugar as fixed subcategory
//! ingredients, one shape in two sizes, and a three-bag packaging catalog.

use fournee_build_server::cache::BuildCache;
use fournee_build_server::config::environment::ServerConfig;
use fournee_build_server::store::memory::MemoryStore;
use fournee_build_server::store::TableStore;
use fournee_build_server::ServerResources;
use fournee_core::constants::maps;
use fournee_core::models::Row;
use serde_json::{json, Value};
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

pub fn row(value: Value) -> Row {
    value.as_object().cloned().unwrap()
}

pub fn rows(values: Vec<Value>) -> Vec<Row> {
    values.into_iter().map(row).collect()
}

/// Grams expressed as the ounce figure the packaging catalog stores
pub fn grams_as_oz(grams: f64) -> f64 {
    grams / 28.3495
}

/// Seed the fixture bakery into a fresh in-memory store. All junction tables
/// are seeded in the relational id view.
pub async fn seeded_store() -> Arc<MemoryStore> {
    init_test_logging();
    let store = Arc::new(MemoryStore::new());

    store
        .seed(
            maps::CATEGORY,
            rows(vec![json!({"CategoryID": 1, "Name": "Cookie"})]),
        )
        .await;

    store
        .seed(
            maps::SUB_CATEGORY,
            rows(vec![
                json!({"SubCategoryID": 1, "Name": "Classic", "CategoryID": 1}),
                json!({"SubCategoryID": 2, "Name": "Chunky", "CategoryID": 1}),
            ]),
        )
        .await;

    store
        .seed(
            maps::INGREDIENT,
            rows(vec![
                json!({"IngredientID": 1, "Name": "All Purpose", "Category": "Flour",
                       "UnitType": "kg", "UnitSize": 1.0, "PurchaseCost": 2.0, "Available": true}),
                json!({"IngredientID": 2, "Name": "Whole Wheat", "Category": "Flour",
                       "UnitType": "kg", "UnitSize": 1.0, "PurchaseCost": 3.0, "Available": true}),
                json!({"IngredientID": 3, "Name": "Chocolate", "Category": "Flavor",
                       "UnitType": "kg", "UnitSize": 1.0, "PurchaseCost": 10.0, "Available": true}),
                json!({"IngredientID": 4, "Name": "Vanilla", "Category": "Flavor",
                       "UnitType": "kg", "UnitSize": 1.0, "PurchaseCost": 20.0, "Available": false}),
                json!({"IngredientID": 5, "Name": "Egg", "Category": "Egg",
                       "UnitType": "ct", "UnitSize": 12.0, "PurchaseCost": 3.60, "Available": true}),
                json!({"IngredientID": 6, "Name": "Sugar", "Category": "Sweetener",
                       "UnitType": "kg", "UnitSize": 1.0, "PurchaseCost": 1.0, "Available": true}),
            ]),
        )
        .await;

    store
        .seed(
            maps::CATEGORY_INGREDIENT,
            rows(vec![
                json!({"CategoryIngredientID": 1, "CategoryID": 1,
                       "IngredientCategory": "Flour", "Quantity": 500.0}),
                json!({"CategoryIngredientID": 2, "CategoryID": 1,
                       "IngredientCategory": "Flavor", "Quantity": 100.0}),
            ]),
        )
        .await;

    store
        .seed(
            maps::SUB_CATEGORY_INGREDIENT,
            rows(vec![
                json!({"SubCategoryIngredientID": 1, "SubCategoryID": 1,
                       "IngredientID": 5, "Quantity": 2.0}),
                json!({"SubCategoryIngredientID": 2, "SubCategoryID": 1,
                       "IngredientID": 6, "Quantity": 200.0}),
                json!({"SubCategoryIngredientID": 3, "SubCategoryID": 2,
                       "IngredientID": 6, "Quantity": 100.0}),
            ]),
        )
        .await;

    store
        .seed(
            maps::FLOUR,
            rows(vec![
                json!({"FlourID": 1, "Name": "All Purpose"}),
                json!({"FlourID": 2, "Name": "Whole Wheat"}),
            ]),
        )
        .await;

    store
        .seed(
            maps::FLAVOR,
            rows(vec![
                json!({"FlavorID": 1, "Name": "Chocolate"}),
                json!({"FlavorID": 2, "Name": "Vanilla"}),
            ]),
        )
        .await;

    store
        .seed(maps::SHAPE, rows(vec![json!({"ShapeID": 1, "Name": "Round"})]))
        .await;

    store
        .seed(
            maps::SIZE,
            rows(vec![
                json!({"SizeID": 1, "Name": "Regular"}),
                json!({"SizeID": 2, "Name": "Large"}),
            ]),
        )
        .await;

    store
        .seed(
            maps::CATEGORY_SHAPE,
            rows(vec![json!({"CategoryShapeID": 1, "CategoryID": 1, "ShapeID": 1})]),
        )
        .await;

    store
        .seed(
            maps::CATEGORY_SHAPE_SIZE,
            rows(vec![
                json!({"CategoryShapeSizeID": 1, "CategoryShapeID": 1, "SizeID": 1,
                       "BatchSize": 12.0, "DimWidth": 5.0, "DimDepth": 5.0, "DimHeight": 2.0}),
                json!({"CategoryShapeSizeID": 2, "CategoryShapeID": 1, "SizeID": 2,
                       "BatchSize": 6.0, "DimWidth": 8.0, "DimDepth": 8.0, "DimHeight": 4.0}),
            ]),
        )
        .await;

    store
        .seed(
            maps::SUB_CATEGORY_AVG_WEIGHT,
            rows(vec![
                json!({"SubCategoryAvgWeightID": 1, "CategoryShapeSizeID": 1,
                       "SubCategoryID": 1, "AvgWeight": 40.0, "Baked": true}),
                // Raw dough weight for the same variant, must be ignored
                json!({"SubCategoryAvgWeightID": 2, "CategoryShapeSizeID": 1,
                       "SubCategoryID": 1, "AvgWeight": 55.0, "Baked": false}),
                json!({"SubCategoryAvgWeightID": 3, "CategoryShapeSizeID": 1,
                       "SubCategoryID": 2, "AvgWeight": 45.0, "Baked": true}),
                json!({"SubCategoryAvgWeightID": 4, "CategoryShapeSizeID": 2,
                       "SubCategoryID": 1, "AvgWeight": 80.0, "Baked": true}),
                json!({"SubCategoryAvgWeightID": 5, "CategoryShapeSizeID": 2,
                       "SubCategoryID": 2, "AvgWeight": 90.0, "Baked": true}),
            ]),
        )
        .await;

    store
        .seed(
            maps::NUTRITION_FACT,
            rows(vec![
                json!({"NutritionFactID": 1, "IngredientID": 1, "ServingSize": 100.0,
                       "Calories": 364.0, "Protein": 10.0}),
                json!({"NutritionFactID": 2, "IngredientID": 2, "ServingSize": 100.0,
                       "Calories": 340.0, "Protein": 13.0}),
                json!({"NutritionFactID": 3, "IngredientID": 3, "ServingSize": 100.0,
                       "Calories": 546.0, "Protein": 5.0}),
                json!({"NutritionFactID": 4, "IngredientID": 4, "ServingSize": 100.0,
                       "Calories": 288.0, "Protein": 0.0}),
                json!({"NutritionFactID": 5, "IngredientID": 5, "ServingSize": 100.0,
                       "Calories": 143.0, "Protein": 13.0}),
                json!({"NutritionFactID": 6, "IngredientID": 6, "ServingSize": 100.0,
                       "Calories": 387.0, "Protein": 0.0}),
            ]),
        )
        .await;

    store
        .seed(
            maps::PACKAGING,
            rows(vec![
                json!({"PackagingID": 1, "Size": "Small", "DimWidth": 10.0, "DimDepth": 10.0,
                       "DimHeight": 10.0, "MaxWeight": grams_as_oz(500.0), "PricePerUnit": 0.10}),
                json!({"PackagingID": 2, "Size": "Medium", "DimWidth": 30.0, "DimDepth": 10.0,
                       "DimHeight": 10.0, "MaxWeight": grams_as_oz(1500.0), "PricePerUnit": 0.25}),
                json!({"PackagingID": 3, "Size": "Large", "DimWidth": 40.0, "DimDepth": 20.0,
                       "DimHeight": 10.0, "MaxWeight": grams_as_oz(4000.0), "PricePerUnit": 0.50}),
            ]),
        )
        .await;

    store
}

/// A cache over the fixture store
pub async fn seeded_cache() -> BuildCache {
    let store = seeded_store().await;
    BuildCache::new(store as Arc<dyn TableStore>)
}

/// Full server resources over the fixture store, with nutrition cache files
/// under the given directory.
pub async fn seeded_resources(data_dir: &std::path::Path) -> ServerResources {
    let store = seeded_store().await;

    let mut config = ServerConfig::default();
    config.nutrition.recipe_facts_path = data_dir.join("recipe_nutrition.json");
    config.nutrition.product_facts_path = data_dir.join("product_nutrition.json");

    ServerResources::new(config, store as Arc<dyn TableStore>)
}
