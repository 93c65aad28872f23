// ABOUTME: Integration tests for recipe generation from the fixture bakery
// ABOUTME: Covers Cartesian expansion, cost additivity, availability, and determinism
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fournee

mod common;

use fournee_build_server::build::maps::TableMaps;
use fournee_build_server::build::recipes::build_recipes;

#[tokio::test]
async fn expands_every_slot_combination_per_subcategory() {
    let cache = common::seeded_cache().await;
    let maps = TableMaps::fetch(&cache).await.unwrap();

    let outcome = build_recipes(&maps).unwrap();

    // 2 flours x 2 flavors x 2 subcategories
    assert_eq!(outcome.recipes.len(), 8);
    assert!(outcome.skipped.is_empty());

    let skus: Vec<&str> = outcome.recipes.iter().map(|r| r.meta.sku.as_str()).collect();
    assert_eq!(
        skus,
        vec!["111", "112", "121", "122", "211", "212", "221", "222"]
    );
}

#[tokio::test]
async fn cost_and_weight_are_sums_over_ingredients() {
    let cache = common::seeded_cache().await;
    let maps = TableMaps::fetch(&cache).await.unwrap();

    let outcome = build_recipes(&maps).unwrap();
    let classic_choc = outcome
        .recipes
        .iter()
        .find(|r| r.meta.sku == "111")
        .unwrap();

    // 500 g all-purpose at 0.002 + 100 g chocolate at 0.01
    // + 2 eggs at 0.30 + 200 g sugar at 0.001
    assert!((classic_choc.meta.cost - 2.80).abs() < 1e-9);
    assert!((classic_choc.meta.weight - 802.0).abs() < 1e-9);
    assert_eq!(classic_choc.ingredients.len(), 4);
}

#[tokio::test]
async fn availability_is_the_conjunction_of_ingredient_availability() {
    let cache = common::seeded_cache().await;
    let maps = TableMaps::fetch(&cache).await.unwrap();

    let outcome = build_recipes(&maps).unwrap();

    for recipe in &outcome.recipes {
        let uses_vanilla = recipe.ingredients.iter().any(|i| i.name == "Vanilla");
        assert_eq!(
            recipe.meta.available, !uses_vanilla,
            "recipe {} availability should track the unavailable vanilla",
            recipe.meta.sku
        );
    }
}

#[tokio::test]
async fn ingredient_list_orders_by_descending_quantity() {
    let cache = common::seeded_cache().await;
    let maps = TableMaps::fetch(&cache).await.unwrap();

    let outcome = build_recipes(&maps).unwrap();
    let classic_choc = outcome
        .recipes
        .iter()
        .find(|r| r.meta.sku == "111")
        .unwrap();

    // 500 g flour, 200 g sugar, 100 g chocolate, 2 eggs
    assert_eq!(
        classic_choc.meta.ingredient_list,
        vec!["All Purpose", "Sugar", "Chocolate", "Egg"]
    );
    assert!(classic_choc.meta.name.contains("Chocolate"));
    assert!(classic_choc.meta.name.contains("Classic"));
}

#[tokio::test]
async fn identical_source_rows_build_identical_recipes() {
    let first = {
        let cache = common::seeded_cache().await;
        let maps = TableMaps::fetch(&cache).await.unwrap();
        build_recipes(&maps).unwrap()
    };
    let second = {
        let cache = common::seeded_cache().await;
        let maps = TableMaps::fetch(&cache).await.unwrap();
        build_recipes(&maps).unwrap()
    };

    let first_json = serde_json::to_string(&first.recipes).unwrap();
    let second_json = serde_json::to_string(&second.recipes).unwrap();
    assert_eq!(first_json, second_json);
}
