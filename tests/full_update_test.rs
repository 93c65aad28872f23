// ABOUTME: End-to-end test of the full pipeline run
// ABOUTME: Verifies the rebuilt product table and persisted nutrition caches
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fournee

mod common;

use fournee_build_server::build::full_update;
use fournee_build_server::build::nutrition::{load_cache, ProductFactsFile, RecipeFactsFile};
use fournee_core::constants::maps;
use serde_json::Value;

#[tokio::test]
async fn full_update_publishes_products_and_nutrition() {
    let dir = tempfile::tempdir().unwrap();
    let resources = common::seeded_resources(dir.path()).await;

    let report = full_update(&resources).await.unwrap();

    assert_eq!(report.recipes_built, 8);
    assert_eq!(report.products_built, 16);
    assert_eq!(report.nutrition_facts_built, 16);
    assert!(report.skipped.is_empty());

    // Junction tables were already in the id view, so nothing converted
    assert_eq!(report.conversions.len(), 5);
    assert!(report.conversions.iter().all(|c| c.converted.is_empty()));

    // The product table was rebuilt wholesale
    let products = resources
        .cache
        .store()
        .get_maps(&[maps::PRODUCT])
        .await
        .unwrap()
        .remove(maps::PRODUCT)
        .unwrap();
    assert_eq!(products.len(), 16);
    assert!(products[0].get("SKU").and_then(Value::as_str).is_some());
    assert!(products[0].get("RecipeCost").and_then(Value::as_f64).is_some());

    // Both nutrition caches landed on disk and parse back
    let recipe_facts: RecipeFactsFile =
        load_cache(&resources.config.nutrition.recipe_facts_path)
            .await
            .unwrap();
    assert_eq!(recipe_facts.facts.len(), 8);

    let product_facts: ProductFactsFile =
        load_cache(&resources.config.nutrition.product_facts_path)
            .await
            .unwrap();
    assert_eq!(product_facts.count, 16);
    assert!(product_facts.facts.contains_key("111-11"));
}

#[tokio::test]
async fn full_update_is_repeatable() {
    let dir = tempfile::tempdir().unwrap();
    let resources = common::seeded_resources(dir.path()).await;

    let first = full_update(&resources).await.unwrap();
    let second = full_update(&resources).await.unwrap();

    assert_eq!(first.recipes_built, second.recipes_built);
    assert_eq!(first.products_built, second.products_built);
    assert_eq!(first.nutrition_facts_built, second.nutrition_facts_built);

    let products = resources
        .cache
        .store()
        .get_maps(&[maps::PRODUCT])
        .await
        .unwrap()
        .remove(maps::PRODUCT)
        .unwrap();
    assert_eq!(products.len(), 16);
}
