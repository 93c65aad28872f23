// ABOUTME: Nutrition fact aggregation for recipes and per-product rescaling
// ABOUTME: Ratio-scales ingredient facts, hashes product facts, persists JSON caches
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fournee

//! # Nutrition Engine
//!
//! Two stages. Recipe facts sum each ingredient's nutrition fact scaled by
//! `used grams / fact serving size`; the recipe's own serving size is the sum
//! of gram contributions. Product facts then rescale the recipe totals to the
//! baked average weight of the product's physical variant, so the label
//! describes one treat as sold.
//!
//! Egg quantities are stored as counts; they convert at a fixed 48 g per egg
//! for nutrition purposes only. Other count-measured ingredients have no gram
//! equivalent and contribute nothing.
//!
//! Both stages persist to JSON files so the storefront can serve labels
//! without a rebuild. Product entries carry a SHA-256 content hash for cheap
//! change detection downstream.

use chrono::{DateTime, Utc};
use fournee_core::constants::nutrition::GRAMS_PER_EGG;
use fournee_core::errors::{AppError, AppResult};
use fournee_core::models::{NutrientTotals, Product, Recipe};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, info, warn};

use super::maps::TableMaps;

/// Recipe-level nutrition totals for one SKU
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeFactEntry {
    /// Recipe SKU
    pub sku: String,
    /// Totals at the recipe's whole-batch serving size
    pub nutrients: NutrientTotals,
}

/// Persisted recipe nutrition cache
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeFactsFile {
    /// Build timestamp
    pub last_updated: DateTime<Utc>,
    /// One entry per recipe, in build order
    pub facts: Vec<RecipeFactEntry>,
}

/// Product-level nutrition totals with a content hash
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFactEntry {
    /// Totals rescaled to one baked treat
    pub nutrients: NutrientTotals,
    /// SHA-256 over the serialized nutrients, for change detection
    pub content_hash: String,
}

/// Persisted product nutrition cache, keyed by product SKU
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFactsFile {
    /// Build timestamp
    pub last_updated: DateTime<Utc>,
    /// Number of entries
    pub count: usize,
    /// Product SKU to its facts
    pub facts: BTreeMap<String, ProductFactEntry>,
}

/// Sum ingredient nutrition facts into per-recipe totals.
///
/// # Errors
///
/// Fails only when a required map is missing from the batch; a recipe whose
/// ingredients lack facts still gets an entry with whatever could be summed.
pub fn build_recipe_facts(maps: &TableMaps, recipes: &[Recipe]) -> AppResult<RecipeFactsFile> {
    let facts_by_ingredient = maps.nutrition_facts()?;
    let ingredients = maps.ingredients()?;
    let count_units: HashMap<i64, bool> = ingredients
        .iter()
        .map(|i| {
            (
                i.id,
                fournee_core::units::is_count_unit(&i.unit_type).unwrap_or(false),
            )
        })
        .collect();

    let mut entries = Vec::with_capacity(recipes.len());

    for recipe in recipes {
        let mut totals = NutrientTotals::default();

        for ingredient in &recipe.ingredients {
            let grams = if count_units.get(&ingredient.ingredient_id) == Some(&true) {
                if ingredient.name.eq_ignore_ascii_case("egg") {
                    ingredient.quantity * GRAMS_PER_EGG
                } else {
                    warn!(
                        "no gram equivalent for count-measured ingredient {}, skipping in nutrition",
                        ingredient.name
                    );
                    continue;
                }
            } else {
                ingredient.quantity
            };

            totals.serving_size += grams;

            let Some(fact) = facts_by_ingredient.get(&ingredient.ingredient_id) else {
                warn!(
                    "no nutrition fact for ingredient {}, contributes nothing",
                    ingredient.name
                );
                continue;
            };

            if fact.serving_size <= 0.0 {
                warn!(
                    "nutrition fact for {} has non-positive serving size, contributes nothing",
                    ingredient.name
                );
                continue;
            }

            totals.accumulate(fact, grams / fact.serving_size);
        }

        entries.push(RecipeFactEntry {
            sku: recipe.meta.sku.clone(),
            nutrients: totals,
        });
    }

    debug!("built nutrition totals for {} recipes", entries.len());

    Ok(RecipeFactsFile {
        last_updated: Utc::now(),
        facts: entries,
    })
}

/// Rescale recipe totals to per-treat product facts.
///
/// Each product's SKU is decoded back into its dimension chain; a product
/// whose variant has no baked average weight is skipped with a warning, since
/// an unbaked weight would misstate the label.
///
/// # Errors
///
/// Fails only when a required map is missing from the batch.
pub fn build_product_facts(
    maps: &TableMaps,
    recipe_facts: &RecipeFactsFile,
    products: &[Product],
) -> AppResult<ProductFactsFile> {
    let sub_categories = maps.sub_categories()?;
    let category_shapes = maps.category_shapes()?;
    let shape_sizes = maps.category_shape_sizes()?;
    let avg_weights = maps.avg_weights()?;

    let totals_by_recipe: HashMap<&str, &NutrientTotals> = recipe_facts
        .facts
        .iter()
        .map(|entry| (entry.sku.as_str(), &entry.nutrients))
        .collect();

    let mut facts = BTreeMap::new();

    for product in products {
        let parts = match fournee_core::models::parse_product_sku(&product.sku) {
            Ok(parts) => parts,
            Err(e) => {
                warn!("skipping product {}: {e}", product.sku);
                continue;
            }
        };

        let Some(recipe_totals) = totals_by_recipe.get(product.recipe_sku.as_str()) else {
            warn!(
                "product {} has no recipe totals for {}, skipping",
                product.sku, product.recipe_sku
            );
            continue;
        };

        let Some(category_id) = sub_categories
            .iter()
            .find(|s| s.id == parts.sub_category_id)
            .map(|s| s.category_id)
        else {
            warn!(
                "product {} references unknown subcategory {}, skipping",
                product.sku, parts.sub_category_id
            );
            continue;
        };

        let shape_size = category_shapes
            .iter()
            .find(|cs| cs.category_id == category_id && cs.shape_id == parts.shape_id)
            .and_then(|cs| {
                shape_sizes
                    .iter()
                    .find(|ss| ss.category_shape_id == cs.id && ss.size_id == parts.size_id)
            });
        let Some(shape_size) = shape_size else {
            warn!(
                "product {} has no shape-size row for its dimension chain, skipping",
                product.sku
            );
            continue;
        };

        // Labels describe the treat as sold, so only the baked weight counts
        let Some(weight) = avg_weights.iter().find(|w| {
            w.category_shape_size_id == shape_size.id
                && w.sub_category_id == parts.sub_category_id
                && w.baked
        }) else {
            warn!(
                "product {} has no baked average weight, skipping nutrition",
                product.sku
            );
            continue;
        };

        let nutrients = recipe_totals.rescaled_to(weight.avg_weight);
        let content_hash = hash_nutrients(&nutrients)?;

        facts.insert(
            product.sku.clone(),
            ProductFactEntry {
                nutrients,
                content_hash,
            },
        );
    }

    Ok(ProductFactsFile {
        last_updated: Utc::now(),
        count: facts.len(),
        facts,
    })
}

/// SHA-256 hex digest over the canonical serialization of the totals. Field
/// order is stable because the nutrient map is ordered.
fn hash_nutrients(totals: &NutrientTotals) -> AppResult<String> {
    let serialized = serde_json::to_vec(totals)?;
    let mut hasher = Sha256::new();
    hasher.update(&serialized);
    Ok(hex::encode(hasher.finalize()))
}

/// Persist a nutrition cache file, creating parent directories as needed.
///
/// # Errors
///
/// Returns a storage error on filesystem failures.
pub async fn write_cache<T: Serialize>(path: &Path, value: &T) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::storage(format!("creating {}: {e}", parent.display())))?;
    }

    let serialized = serde_json::to_vec_pretty(value)?;
    tokio::fs::write(path, serialized)
        .await
        .map_err(|e| AppError::storage(format!("writing {}: {e}", path.display())))?;

    info!("wrote nutrition cache {}", path.display());
    Ok(())
}

/// Load a previously persisted nutrition cache file.
///
/// # Errors
///
/// Returns a storage error when the file is missing or unreadable, and a
/// serialization error when its contents do not parse.
pub async fn load_cache<T: for<'de> Deserialize<'de>>(path: &Path) -> AppResult<T> {
    let raw = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::storage(format!("reading {}: {e}", path.display())))?;
    Ok(serde_json::from_slice(&raw)?)
}
