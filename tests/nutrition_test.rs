// ABOUTME: Integration tests for nutrition aggregation and persisted caches
// ABOUTME: Covers egg gram conversion, serving-size semantics, baked-weight rescaling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fournee

mod common;

use fournee_build_server::build::maps::TableMaps;
use fournee_build_server::build::nutrition::{
    build_product_facts, build_recipe_facts, load_cache, write_cache, RecipeFactsFile,
};
use fournee_build_server::build::products::build_products;
use fournee_build_server::build::recipes::build_recipes;
use fournee_build_server::cache::BuildCache;
use fournee_build_server::store::TableStore;
use fournee_core::constants::maps;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn recipe_totals_scale_by_used_grams_over_serving_size() {
    let cache = common::seeded_cache().await;
    let table_maps = TableMaps::fetch(&cache).await.unwrap();

    let recipes = build_recipes(&table_maps).unwrap().recipes;
    let facts = build_recipe_facts(&table_maps, &recipes).unwrap();

    let classic_choc = facts.facts.iter().find(|f| f.sku == "111").unwrap();

    // 500 g flour + 100 g chocolate + 2 eggs at 48 g + 200 g sugar
    assert!((classic_choc.nutrients.serving_size - 896.0).abs() < 1e-9);
    // 364*5 + 546*1 + 143*0.96 + 387*2
    assert!((classic_choc.nutrients.nutrients["Calories"] - 3277.28).abs() < 1e-9);
    assert!((classic_choc.nutrients.nutrients["Protein"] - 67.48).abs() < 1e-9);
}

#[tokio::test]
async fn product_facts_rescale_to_the_baked_weight() {
    let cache = common::seeded_cache().await;
    let table_maps = TableMaps::fetch(&cache).await.unwrap();

    let recipes = build_recipes(&table_maps).unwrap().recipes;
    let products = build_products(&table_maps, &recipes).unwrap().products;
    let recipe_facts = build_recipe_facts(&table_maps, &recipes).unwrap();
    let product_facts = build_product_facts(&table_maps, &recipe_facts, &products).unwrap();

    assert_eq!(product_facts.count, products.len());

    let entry = &product_facts.facts["111-11"];
    // ServingSize is replaced by the baked weight, never scaled
    assert!((entry.nutrients.serving_size - 40.0).abs() < 1e-9);
    // Calories scale by 40/896, not the unbaked 55 g row
    let expected = 3277.28 * 40.0 / 896.0;
    assert!((entry.nutrients.nutrients["Calories"] - expected).abs() < 1e-9);

    // SHA-256 hex digest over the serialized nutrients
    assert_eq!(entry.content_hash.len(), 64);
    assert!(entry.content_hash.chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn content_hashes_are_stable_across_rebuilds() {
    let build = || async {
        let cache = common::seeded_cache().await;
        let table_maps = TableMaps::fetch(&cache).await.unwrap();
        let recipes = build_recipes(&table_maps).unwrap().recipes;
        let products = build_products(&table_maps, &recipes).unwrap().products;
        let recipe_facts = build_recipe_facts(&table_maps, &recipes).unwrap();
        build_product_facts(&table_maps, &recipe_facts, &products).unwrap()
    };

    let first = build().await;
    let second = build().await;

    for (sku, entry) in &first.facts {
        assert_eq!(entry.content_hash, second.facts[sku].content_hash);
    }
}

#[tokio::test]
async fn variants_without_a_baked_weight_are_skipped() {
    let store = common::seeded_store().await;

    // Only raw dough weights remain; no label can be computed from them
    store
        .seed(
            maps::SUB_CATEGORY_AVG_WEIGHT,
            common::rows(vec![json!({
                "SubCategoryAvgWeightID": 1, "CategoryShapeSizeID": 1,
                "SubCategoryID": 1, "AvgWeight": 55.0, "Baked": false
            })]),
        )
        .await;

    let cache = BuildCache::new(store as Arc<dyn TableStore>);
    let table_maps = TableMaps::fetch(&cache).await.unwrap();

    let recipes = build_recipes(&table_maps).unwrap().recipes;
    let products = build_products(&table_maps, &recipes).unwrap().products;
    let recipe_facts = build_recipe_facts(&table_maps, &recipes).unwrap();
    let product_facts = build_product_facts(&table_maps, &recipe_facts, &products).unwrap();

    assert_eq!(product_facts.count, 0);
    assert!(product_facts.facts.is_empty());
}

#[tokio::test]
async fn caches_round_trip_through_the_filesystem() {
    let cache = common::seeded_cache().await;
    let table_maps = TableMaps::fetch(&cache).await.unwrap();

    let recipes = build_recipes(&table_maps).unwrap().recipes;
    let facts = build_recipe_facts(&table_maps, &recipes).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("recipe_nutrition.json");

    write_cache(&path, &facts).await.unwrap();
    let loaded: RecipeFactsFile = load_cache(&path).await.unwrap();

    assert_eq!(loaded.facts.len(), facts.facts.len());
    let original = facts.facts.iter().find(|f| f.sku == "111").unwrap();
    let reloaded = loaded.facts.iter().find(|f| f.sku == "111").unwrap();
    assert_eq!(original.nutrients, reloaded.nutrients);
}
