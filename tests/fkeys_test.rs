// ABOUTME: Integration tests for foreign-key column conversion
// ABOUTME: Covers id/name round trips, idempotence, and atomic column failure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fournee

mod common;

use fournee_build_server::build::fkeys::{convert_table, Direction};
use fournee_build_server::cache::BuildCache;
use fournee_build_server::store::memory::MemoryStore;
use fournee_build_server::store::TableStore;
use fournee_core::constants::maps;
use serde_json::{json, Value};
use std::sync::Arc;

/// A store with lookup maps and a `CategoryShapeMap` in the editor-facing
/// name view
async fn name_view_store() -> Arc<MemoryStore> {
    common::init_test_logging();
    let store = Arc::new(MemoryStore::new());

    store
        .seed(
            maps::CATEGORY,
            common::rows(vec![json!({"CategoryID": 1, "Name": "Cookie"})]),
        )
        .await;
    store
        .seed(
            maps::SHAPE,
            common::rows(vec![
                json!({"ShapeID": 1, "Name": "Round"}),
                json!({"ShapeID": 2, "Name": "Square"}),
            ]),
        )
        .await;
    store
        .seed(
            maps::CATEGORY_SHAPE,
            common::rows(vec![
                json!({"CategoryShapeID": 1, "CategoryName": "Cookie", "ShapeName": "Round"}),
                json!({"CategoryShapeID": 2, "CategoryName": "Cookie", "ShapeName": "Square"}),
            ]),
        )
        .await;

    store
}

#[tokio::test]
async fn converts_name_columns_to_ids_and_back() {
    let store = name_view_store().await;
    let cache = BuildCache::new(Arc::clone(&store) as Arc<dyn TableStore>);

    let to_id = convert_table(&cache, maps::CATEGORY_SHAPE, Direction::ToId)
        .await
        .unwrap();
    assert_eq!(to_id.converted.len(), 2);
    assert!(to_id.failed.is_empty());

    let rows = store.rows(maps::CATEGORY_SHAPE).await.unwrap();
    assert_eq!(rows[0].get("CategoryID"), Some(&Value::from(1)));
    assert_eq!(rows[0].get("ShapeID"), Some(&Value::from(1)));
    assert_eq!(rows[1].get("ShapeID"), Some(&Value::from(2)));
    assert!(rows[0].get("CategoryName").is_none());
    assert!(rows[0].get("ShapeName").is_none());

    let to_name = convert_table(&cache, maps::CATEGORY_SHAPE, Direction::ToName)
        .await
        .unwrap();
    assert_eq!(to_name.converted.len(), 2);

    let rows = store.rows(maps::CATEGORY_SHAPE).await.unwrap();
    assert_eq!(rows[0].get("CategoryName"), Some(&Value::from("Cookie")));
    assert_eq!(rows[1].get("ShapeName"), Some(&Value::from("Square")));
    assert!(rows[0].get("ShapeID").is_none());
}

#[tokio::test]
async fn converting_an_already_converted_table_is_a_no_op() {
    let store = name_view_store().await;
    let cache = BuildCache::new(Arc::clone(&store) as Arc<dyn TableStore>);

    let first = convert_table(&cache, maps::CATEGORY_SHAPE, Direction::ToId)
        .await
        .unwrap();
    assert!(first.changed());
    let snapshot = store.rows(maps::CATEGORY_SHAPE).await.unwrap();

    let second = convert_table(&cache, maps::CATEGORY_SHAPE, Direction::ToId)
        .await
        .unwrap();
    assert!(!second.changed());
    assert!(second.failed.is_empty());
    assert_eq!(store.rows(maps::CATEGORY_SHAPE).await.unwrap(), snapshot);
}

#[tokio::test]
async fn one_unmatched_value_leaves_the_whole_column_untouched() {
    let store = name_view_store().await;

    let mut rows = store.rows(maps::CATEGORY_SHAPE).await.unwrap();
    rows.push(common::row(json!({
        "CategoryShapeID": 3, "CategoryName": "Cookie", "ShapeName": "Dodecahedron"
    })));
    store.seed(maps::CATEGORY_SHAPE, rows).await;

    let cache = BuildCache::new(Arc::clone(&store) as Arc<dyn TableStore>);
    let report = convert_table(&cache, maps::CATEGORY_SHAPE, Direction::ToId)
        .await
        .unwrap();

    // CategoryName converts cleanly; ShapeName fails atomically
    assert_eq!(report.converted, vec!["CategoryName"]);
    assert_eq!(report.failed, vec!["ShapeName"]);

    let rows = store.rows(maps::CATEGORY_SHAPE).await.unwrap();
    assert_eq!(rows[0].get("CategoryID"), Some(&Value::from(1)));
    assert_eq!(rows[0].get("ShapeName"), Some(&Value::from("Round")));
    assert_eq!(
        rows[2].get("ShapeName"),
        Some(&Value::from("Dodecahedron"))
    );
}

#[tokio::test]
async fn empty_tables_convert_to_an_empty_report() {
    common::init_test_logging();
    let store = Arc::new(MemoryStore::new());
    store.seed(maps::CATEGORY_SHAPE, Vec::new()).await;

    let cache = BuildCache::new(store as Arc<dyn TableStore>);
    let report = convert_table(&cache, maps::CATEGORY_SHAPE, Direction::ToId)
        .await
        .unwrap();

    assert!(!report.changed());
    assert!(report.skipped.is_empty());
    assert!(report.failed.is_empty());
}
