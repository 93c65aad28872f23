// ABOUTME: Integration tests for the bag packing endpoint logic
// ABOUTME: Resolves treats through the dimension chain and checks combination choice
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fournee

mod common;

use fournee_build_server::build::packing::optimal_bag;
use fournee_core::errors::ErrorCode;

#[tokio::test]
async fn resolves_the_dimension_chain_and_packs_cheaply() {
    let cache = common::seeded_cache().await;

    // Classic Round Regular: 50 volume, 40 g baked.
    // Small holds 12, Medium 36, Large 96; one Medium beats three Smalls.
    let combo = optimal_bag(&cache, "1-1-1", 30).await.unwrap().unwrap();

    assert_eq!(combo.bags.len(), 1);
    assert_eq!(combo.bags[0].size, "Medium");
    assert_eq!(combo.bags[0].treats_held, 30);
    assert!((combo.total_cost - 0.25).abs() < 1e-9);
    assert!((combo.total_weight - 1200.0).abs() < 1e-9);
}

#[tokio::test]
async fn large_orders_combine_full_bags_with_a_remainder_bag() {
    let cache = common::seeded_cache().await;

    // 100 treats: one Large (96) plus one Small (4)
    let combo = optimal_bag(&cache, "1-1-1", 100).await.unwrap().unwrap();

    assert_eq!(combo.bags.len(), 2);
    assert_eq!(combo.bags[0].size, "Large");
    assert_eq!(combo.bags[0].treats_held, 96);
    assert_eq!(combo.bags[1].size, "Small");
    assert_eq!(combo.bags[1].treats_held, 4);
    assert!((combo.total_cost - 0.60).abs() < 1e-9);
}

#[tokio::test]
async fn malformed_and_unknown_keys_are_distinct_errors() {
    let cache = common::seeded_cache().await;

    let malformed = optimal_bag(&cache, "not-a-key", 5).await.unwrap_err();
    assert_eq!(malformed.code, ErrorCode::InvalidInput);

    let unknown = optimal_bag(&cache, "9-1-1", 5).await.unwrap_err();
    assert_eq!(unknown.code, ErrorCode::DataIntegrity);
}
