// ABOUTME: Product expansion from recipes and the shape/size dimension tables
// ABOUTME: Emits one sellable SKU per recipe and physical variant, detecting duplicates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fournee

//! # Product Builder
//!
//! A product is a recipe in a concrete physical form. Each
//! `CategoryShapeSizeMap` row resolves through its `CategoryShapeMap` parent
//! to a (category, shape, size) triple; every recipe in that category gets
//! one product per triple, with the shape and size digits appended to the
//! recipe SKU.
//!
//! Duplicate product SKUs are a data error in the map tables (the encoding is
//! injective over valid single-digit ids), so they are reported loudly rather
//! than silently deduplicated.

use fournee_core::errors::{AppError, AppResult};
use fournee_core::models::{self, NamedRow, Product, Recipe};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use super::maps::TableMaps;

/// Result of a product build: the products plus per-unit skipped errors
pub struct ProductBuildOutcome {
    /// Constructed products in deterministic order
    pub products: Vec<Product>,
    /// Per-variant errors that did not abort the batch
    pub skipped: Vec<AppError>,
}

/// Expand recipes into products across every shape/size variant.
///
/// # Errors
///
/// Fails only when a required map is missing from the batch.
pub fn build_products(maps: &TableMaps, recipes: &[Recipe]) -> AppResult<ProductBuildOutcome> {
    let category_shapes = maps.category_shapes()?;
    let shape_sizes = maps.category_shape_sizes()?;
    let shapes = maps.named(fournee_core::constants::maps::SHAPE)?;
    let sizes = maps.named(fournee_core::constants::maps::SIZE)?;

    let shapes_by_id: HashMap<i64, &NamedRow> = shapes.iter().map(|s| (s.id, s)).collect();
    let sizes_by_id: HashMap<i64, &NamedRow> = sizes.iter().map(|s| (s.id, s)).collect();

    let mut products = Vec::new();
    let mut skipped = Vec::new();
    let mut seen_skus: HashSet<String> = HashSet::new();

    for shape_size in &shape_sizes {
        let Some(category_shape) = category_shapes
            .iter()
            .find(|cs| cs.id == shape_size.category_shape_id)
        else {
            let e = AppError::data_integrity(format!(
                "shape-size row {} references unknown category-shape {}",
                shape_size.id, shape_size.category_shape_id
            ));
            warn!("skipping shape-size row: {e}");
            skipped.push(e);
            continue;
        };

        let (Some(shape), Some(size)) = (
            shapes_by_id.get(&category_shape.shape_id),
            sizes_by_id.get(&shape_size.size_id),
        ) else {
            let e = AppError::data_integrity(format!(
                "shape-size row {} references unknown shape {} or size {}",
                shape_size.id, category_shape.shape_id, shape_size.size_id
            ));
            warn!("skipping shape-size row: {e}");
            skipped.push(e);
            continue;
        };

        for recipe in recipes
            .iter()
            .filter(|r| r.meta.category_id == category_shape.category_id)
        {
            let sku = match models::product_sku(&recipe.meta.sku, shape.id, size.id) {
                Ok(sku) => sku,
                Err(e) => {
                    warn!("skipping product for recipe {}: {e}", recipe.meta.sku);
                    skipped.push(e);
                    continue;
                }
            };

            if !seen_skus.insert(sku.clone()) {
                let e = AppError::duplicate_sku(&sku);
                warn!("{e}");
                skipped.push(e);
                continue;
            }

            products.push(Product {
                sku,
                recipe_sku: recipe.meta.sku.clone(),
                name: format!("{} {} {}", size.name, shape.name, recipe.meta.name),
                description: recipe.meta.description.clone(),
                recipe_cost: recipe.meta.cost,
                available: recipe.meta.available,
                ingredients: recipe.meta.ingredient_list.clone(),
            });
        }
    }

    debug!(
        "expanded {} recipes into {} products ({} skipped)",
        recipes.len(),
        products.len(),
        skipped.len()
    );

    Ok(ProductBuildOutcome { products, skipped })
}
