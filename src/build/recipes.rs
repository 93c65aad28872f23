// ABOUTME: Recipe generation from category and subcategory ingredient tables
// ABOUTME: Cartesian product over ingredient slots plus deterministic subcategory merges
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fournee

//! # Recipe Builder
//!
//! Expands the ingredient/category/subcategory tables into every valid
//! recipe. Category-level junction rows define ingredient *slots* (one per
//! `IngredientCategory` label); every ingredient whose category matches a
//! slot's label is a candidate for it, and the Cartesian product across slots
//! yields the base combinations. Subcategory-level ingredients are fixed and
//! merged into every base combination without variation.
//!
//! Failures are per unit of work: a category with unusable slot data or a
//! recipe whose SKU cannot be encoded is logged, reported, and skipped — the
//! rest of the batch proceeds.

use fournee_core::constants::MAX_COMBINATIONS_PER_CATEGORY;
use fournee_core::errors::{AppError, AppResult};
use fournee_core::models::{
    self, CategoryRow, IngredientRow, NamedRow, Recipe, RecipeIngredient, RecipeMeta,
    SubCategoryRow,
};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::registry;

use super::maps::TableMaps;

/// Result of a recipe build: the recipes plus every per-unit error that was
/// skipped over.
pub struct RecipeBuildOutcome {
    /// Constructed recipes in deterministic order
    pub recipes: Vec<Recipe>,
    /// Per-category and per-recipe errors that did not abort the batch
    pub skipped: Vec<AppError>,
}

/// An ingredient slot with its required quantity and candidate ingredients
struct Slot<'a> {
    label: &'a str,
    quantity: f64,
    candidates: Vec<&'a IngredientRow>,
}

/// Build every recipe from the fetched maps.
///
/// # Errors
///
/// Fails only when a required map is missing from the batch; data problems
/// inside a category or recipe are collected in the outcome instead.
pub fn build_recipes(maps: &TableMaps) -> AppResult<RecipeBuildOutcome> {
    let ingredients = maps.ingredients()?;
    let categories = maps.categories()?;
    let sub_categories = maps.sub_categories()?;
    let category_slots = maps.category_ingredients()?;
    let fixed_rows = maps.sub_category_ingredients()?;
    let flours = maps.named(fournee_core::constants::maps::FLOUR)?;
    let flavors = maps.named(fournee_core::constants::maps::FLAVOR)?;

    let ingredients_by_id: HashMap<i64, &IngredientRow> =
        ingredients.iter().map(|i| (i.id, i)).collect();

    let mut recipes = Vec::new();
    let mut skipped = Vec::new();

    for category in &categories {
        let slots = match gather_slots(category, &category_slots, &ingredients) {
            Ok(slots) => slots,
            Err(e) => {
                warn!("skipping category {}: {e}", category.name);
                skipped.push(e);
                continue;
            }
        };

        let combinations = match cartesian_product(category, &slots) {
            Ok(combinations) => combinations,
            Err(e) => {
                warn!("skipping category {}: {e}", category.name);
                skipped.push(e);
                continue;
            }
        };

        debug!(
            "category {}: {} slots, {} base combinations",
            category.name,
            slots.len(),
            combinations.len()
        );

        for sub_category in sub_categories.iter().filter(|s| s.category_id == category.id) {
            for combination in &combinations {
                match assemble_recipe(
                    category,
                    sub_category,
                    combination,
                    &fixed_rows,
                    &ingredients_by_id,
                    &flours,
                    &flavors,
                ) {
                    Ok(recipe) => recipes.push(recipe),
                    Err(e) => {
                        warn!(
                            "skipping recipe for subcategory {}: {e}",
                            sub_category.name
                        );
                        skipped.push(e);
                    }
                }
            }
        }
    }

    Ok(RecipeBuildOutcome { recipes, skipped })
}

/// Group a category's junction rows into slots with their candidate
/// ingredient sets. Slot order follows first appearance in the junction
/// table; candidate order follows the ingredient table. Both orderings are
/// what make repeated builds byte-identical.
fn gather_slots<'a>(
    category: &CategoryRow,
    category_slots: &'a [fournee_core::models::CategoryIngredientRow],
    ingredients: &'a [IngredientRow],
) -> AppResult<Vec<Slot<'a>>> {
    let mut slots: Vec<Slot<'a>> = Vec::new();

    for junction in category_slots.iter().filter(|j| j.category_id == category.id) {
        if slots.iter().any(|s| s.label == junction.ingredient_category) {
            warn!(
                "duplicate slot {} for category {}, keeping the first",
                junction.ingredient_category, category.name
            );
            continue;
        }

        let candidates: Vec<&IngredientRow> = ingredients
            .iter()
            .filter(|i| i.category == junction.ingredient_category)
            .collect();

        if candidates.is_empty() {
            return Err(AppError::data_integrity(format!(
                "no ingredients for slot {} of category {}",
                junction.ingredient_category, category.name
            )));
        }

        slots.push(Slot {
            label: &junction.ingredient_category,
            quantity: junction.quantity,
            candidates,
        });
    }

    if slots.is_empty() {
        return Err(AppError::data_integrity(format!(
            "category {} has no ingredient slots",
            category.name
        )));
    }

    Ok(slots)
}

/// Recursive backtracking over the slot candidate lists, producing every base
/// combination as (slot label, quantity, ingredient) triples.
fn cartesian_product<'a>(
    category: &CategoryRow,
    slots: &[Slot<'a>],
) -> AppResult<Vec<Vec<(&'a str, f64, &'a IngredientRow)>>> {
    let expected: usize = slots.iter().map(|s| s.candidates.len()).product();
    if expected > MAX_COMBINATIONS_PER_CATEGORY {
        return Err(AppError::data_integrity(format!(
            "category {} would expand to {expected} combinations (limit {MAX_COMBINATIONS_PER_CATEGORY})",
            category.name
        )));
    }

    let mut combinations = Vec::with_capacity(expected);
    let mut current = Vec::with_capacity(slots.len());
    expand(slots, &mut current, &mut combinations);
    Ok(combinations)
}

fn expand<'a>(
    remaining: &[Slot<'a>],
    current: &mut Vec<(&'a str, f64, &'a IngredientRow)>,
    out: &mut Vec<Vec<(&'a str, f64, &'a IngredientRow)>>,
) {
    let Some((slot, rest)) = remaining.split_first() else {
        out.push(current.clone());
        return;
    };

    for candidate in slot.candidates.iter().copied() {
        current.push((slot.label, slot.quantity, candidate));
        expand(rest, current, out);
        current.pop();
    }
}

/// Assemble one recipe: a base combination plus the subcategory's fixed
/// ingredients, with cost/weight/availability and SKU derivation.
#[allow(clippy::too_many_arguments)]
fn assemble_recipe(
    category: &CategoryRow,
    sub_category: &SubCategoryRow,
    combination: &[(&str, f64, &IngredientRow)],
    fixed_rows: &[fournee_core::models::SubCategoryIngredientRow],
    ingredients_by_id: &HashMap<i64, &IngredientRow>,
    flours: &[NamedRow],
    flavors: &[NamedRow],
) -> AppResult<Recipe> {
    let mut entries: Vec<RecipeIngredient> = Vec::with_capacity(combination.len());

    for (label, quantity, ingredient) in combination {
        entries.push(resolve_entry(label, *quantity, ingredient)?);
    }

    // Subcategory ingredients are deterministic, not combinatorial
    for fixed in fixed_rows.iter().filter(|f| f.sub_category_id == sub_category.id) {
        let ingredient = ingredients_by_id.get(&fixed.ingredient_id).ok_or_else(|| {
            AppError::data_integrity(format!(
                "subcategory {} references unknown ingredient {}",
                sub_category.name, fixed.ingredient_id
            ))
        })?;
        entries.push(resolve_entry(&ingredient.category, fixed.quantity, ingredient)?);
    }

    let flour_id = resolve_slot_id(&entries, "Flour", flours, sub_category)?;
    let flavor_id = resolve_slot_id(&entries, "Flavor", flavors, sub_category)?;
    let sku = models::recipe_sku(sub_category.id, flour_id, flavor_id)?;

    let cost = entries.iter().map(|e| e.cost).sum();
    let weight = entries.iter().map(|e| e.quantity).sum();
    let available = entries.iter().all(|e| e.available);

    let mut by_quantity: Vec<&RecipeIngredient> = entries.iter().collect();
    by_quantity.sort_by(|a, b| {
        b.quantity
            .partial_cmp(&a.quantity)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    let ingredient_list: Vec<String> = by_quantity.iter().map(|e| e.name.clone()).collect();

    let flavor_name = entries
        .iter()
        .find(|e| e.slot == "Flavor")
        .map_or_else(String::new, |e| e.name.clone());
    let name = format!("{flavor_name} {}", sub_category.name)
        .trim()
        .to_owned();
    let description = format!(
        "{} {} made with {}",
        sub_category.name,
        category.name.to_lowercase(),
        ingredient_list.join(", ")
    );

    let meta = RecipeMeta {
        sku,
        category_id: category.id,
        sub_category_id: sub_category.id,
        flour_id,
        flavor_id,
        cost,
        weight,
        ingredient_list,
        name,
        description,
        available,
    };

    Ok(Recipe {
        meta,
        ingredients: entries,
    })
}

/// Resolve one ingredient into a recipe entry with its cost contribution
fn resolve_entry(label: &str, quantity: f64, ingredient: &IngredientRow) -> AppResult<RecipeIngredient> {
    let cost_per_unit = ingredient.cost_per_unit()?;

    Ok(RecipeIngredient {
        slot: label.to_owned(),
        ingredient_id: ingredient.id,
        name: ingredient.name.clone(),
        category: ingredient.category.clone(),
        quantity,
        cost: quantity * cost_per_unit,
        available: ingredient.available,
    })
}

/// Resolve the lookup-map id for a SKU slot (flour, flavor) by name lookup on
/// the slot's chosen ingredient.
fn resolve_slot_id(
    entries: &[RecipeIngredient],
    label: &str,
    lookup: &[NamedRow],
    sub_category: &SubCategoryRow,
) -> AppResult<i64> {
    let relation = registry::by_slot_label(label).ok_or_else(|| {
        AppError::data_integrity(format!("no registry relation for slot {label}"))
    })?;

    let entry = entries.iter().find(|e| e.slot == label).ok_or_else(|| {
        AppError::data_integrity(format!(
            "subcategory {} recipe has no {label} ingredient for SKU encoding",
            sub_category.name
        ))
    })?;

    lookup
        .iter()
        .find(|row| row.name == entry.name)
        .map(|row| row.id)
        .ok_or_else(|| {
            AppError::data_integrity(format!(
                "{} has no {} entry named {:?}",
                relation.map, label, entry.name
            ))
        })
}
