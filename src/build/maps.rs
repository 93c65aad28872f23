// ABOUTME: Typed access layer over fetched table maps
// ABOUTME: Deserializes raw rows into domain row types with skip-and-log semantics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fournee

//! Typed views over a batch of fetched maps. Builders work against these
//! accessors instead of raw JSON rows; a malformed row is logged and skipped
//! so one bad record never aborts a whole build.

use fournee_core::constants::maps;
use fournee_core::errors::{AppError, AppResult};
use fournee_core::models::{
    CategoryIngredientRow, CategoryRow, CategoryShapeRow, CategoryShapeSizeRow, IngredientRow,
    NamedRow, NutritionFactRow, PackagingRow, Row, SubCategoryAvgWeightRow, SubCategoryIngredientRow,
    SubCategoryRow,
};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use crate::cache::BuildCache;
use crate::store::id_column;

/// Maps the recipe/product/nutrition builders need
pub const BUILD_MAPS: &[&str] = &[
    maps::INGREDIENT,
    maps::CATEGORY,
    maps::SUB_CATEGORY,
    maps::CATEGORY_INGREDIENT,
    maps::SUB_CATEGORY_INGREDIENT,
    maps::CATEGORY_SHAPE,
    maps::CATEGORY_SHAPE_SIZE,
    maps::SUB_CATEGORY_AVG_WEIGHT,
    maps::NUTRITION_FACT,
    maps::FLOUR,
    maps::FLAVOR,
    maps::SHAPE,
    maps::SIZE,
];

/// A batch of fetched maps with typed accessors
pub struct TableMaps {
    inner: HashMap<String, Arc<Vec<Row>>>,
}

impl TableMaps {
    /// Wrap a fetched batch
    #[must_use]
    pub fn new(inner: HashMap<String, Arc<Vec<Row>>>) -> Self {
        Self { inner }
    }

    /// Fetch every build map through the cache
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn fetch(cache: &BuildCache) -> AppResult<Self> {
        Ok(Self::new(cache.get_maps(BUILD_MAPS).await?))
    }

    /// Raw rows of one map
    ///
    /// # Errors
    ///
    /// Returns a data-integrity error when the map was not part of the batch.
    pub fn rows(&self, name: &str) -> AppResult<&[Row]> {
        self.inner
            .get(name)
            .map(|rows| rows.as_slice())
            .ok_or_else(|| AppError::data_integrity(format!("map {name} was not fetched")))
    }

    fn typed<T: DeserializeOwned>(&self, name: &str) -> AppResult<Vec<T>> {
        let rows = self.rows(name)?;
        let mut parsed = Vec::with_capacity(rows.len());

        for row in rows {
            match serde_json::from_value(serde_json::Value::Object(row.clone())) {
                Ok(typed) => parsed.push(typed),
                Err(e) => warn!("skipping malformed {name} row: {e}"),
            }
        }

        Ok(parsed)
    }

    /// Ingredient master rows
    pub fn ingredients(&self) -> AppResult<Vec<IngredientRow>> {
        self.typed(maps::INGREDIENT)
    }

    /// Category rows
    pub fn categories(&self) -> AppResult<Vec<CategoryRow>> {
        self.typed(maps::CATEGORY)
    }

    /// Subcategory rows
    pub fn sub_categories(&self) -> AppResult<Vec<SubCategoryRow>> {
        self.typed(maps::SUB_CATEGORY)
    }

    /// Category-level ingredient slot rows
    pub fn category_ingredients(&self) -> AppResult<Vec<CategoryIngredientRow>> {
        self.typed(maps::CATEGORY_INGREDIENT)
    }

    /// Subcategory-level fixed ingredient rows
    pub fn sub_category_ingredients(&self) -> AppResult<Vec<SubCategoryIngredientRow>> {
        self.typed(maps::SUB_CATEGORY_INGREDIENT)
    }

    /// Category-shape link rows
    pub fn category_shapes(&self) -> AppResult<Vec<CategoryShapeRow>> {
        self.typed(maps::CATEGORY_SHAPE)
    }

    /// Category-shape-size rows
    pub fn category_shape_sizes(&self) -> AppResult<Vec<CategoryShapeSizeRow>> {
        self.typed(maps::CATEGORY_SHAPE_SIZE)
    }

    /// Average weight rows (baked and unbaked; consumers filter)
    pub fn avg_weights(&self) -> AppResult<Vec<SubCategoryAvgWeightRow>> {
        self.typed(maps::SUB_CATEGORY_AVG_WEIGHT)
    }

    /// Packaging catalog rows
    pub fn packaging(&self) -> AppResult<Vec<PackagingRow>> {
        self.typed(maps::PACKAGING)
    }

    /// Per-ingredient nutrition facts keyed by ingredient id
    pub fn nutrition_facts(&self) -> AppResult<HashMap<i64, NutritionFactRow>> {
        let rows = self.rows(maps::NUTRITION_FACT)?;
        let mut facts = HashMap::with_capacity(rows.len());

        for row in rows {
            match NutritionFactRow::from_row(row) {
                Ok(fact) => {
                    facts.insert(fact.ingredient_id, fact);
                }
                Err(e) => warn!("skipping malformed nutrition fact row: {e}"),
            }
        }

        Ok(facts)
    }

    /// Id/name lookup rows for a lookup map (`FlourMap`, `ShapeMap`, ...)
    pub fn named(&self, map: &str) -> AppResult<Vec<NamedRow>> {
        let key = id_column(map);
        let rows = self.rows(map)?;
        let mut parsed = Vec::with_capacity(rows.len());

        for row in rows {
            match NamedRow::from_row(row, &key) {
                Ok(named) => parsed.push(named),
                Err(e) => warn!("skipping malformed {map} row: {e}"),
            }
        }

        Ok(parsed)
    }
}
