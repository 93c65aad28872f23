// ABOUTME: Heuristic shipping bag selection for treat orders
// ABOUTME: Capacity model with a fixed packing efficiency, cheapest combination wins
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fournee

//! # Bag Packer
//!
//! Picks the cheapest shipping bag combination for an order of identical
//! treats. This is a heuristic, not an exact bin-packing solver: each bag's
//! capacity is its geometric volume discounted by a fixed packing efficiency
//! (treats do not tessellate), capped by its weight limit, and the search is
//! limited to combinations of repeated full bags of one size plus one
//! remainder bag. That shape covers real orders well and stays O(bags^2).
//!
//! A treat is identified by its dimension key, `sub-shape-size` digits
//! matching the SKU encoding; volume comes from the shape-size row and weight
//! from the baked average weight.

use fournee_core::constants::maps;
use fournee_core::constants::packing::EFFICIENCY;
use fournee_core::errors::{AppError, AppResult};
use fournee_core::models::{BagAssignment, BagCombination, PackagingRow};
use tracing::debug;

use crate::cache::BuildCache;

use super::maps::TableMaps;

/// Maps the packer resolves treats and bags from
const PACKING_MAPS: &[&str] = &[
    maps::PACKAGING,
    maps::SUB_CATEGORY,
    maps::CATEGORY_SHAPE,
    maps::CATEGORY_SHAPE_SIZE,
    maps::SUB_CATEGORY_AVG_WEIGHT,
];

/// Physical profile of one treat
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreatSpec {
    /// Geometric volume
    pub volume: f64,
    /// Baked weight in grams
    pub weight: f64,
}

/// A bag with its derived per-bag treat capacity
struct BagCandidate<'a> {
    bag: &'a PackagingRow,
    capacity: u32,
    volume: f64,
}

/// Parse a `sub-shape-size` dimension key into its digit components.
///
/// # Errors
///
/// Returns an invalid-input error when the key is not three dash-separated
/// digits.
pub fn parse_dimension_key(key: &str) -> AppResult<(i64, i64, i64)> {
    let malformed = || AppError::invalid_input(format!("malformed dimension key {key:?}"));

    let parts: Vec<i64> = key
        .split('-')
        .map(|part| {
            let mut chars = part.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => c.to_digit(10).map(i64::from),
                _ => None,
            }
        })
        .collect::<Option<Vec<i64>>>()
        .ok_or_else(malformed)?;

    match parts.as_slice() {
        [sub, shape, size] => Ok((*sub, *shape, *size)),
        _ => Err(malformed()),
    }
}

/// Resolve a dimension key to the treat's volume and baked weight.
///
/// # Errors
///
/// Returns a data-integrity error when any link of the dimension chain is
/// missing, or when the variant has no baked average weight.
pub fn resolve_treat(maps: &TableMaps, key: &str) -> AppResult<TreatSpec> {
    let (sub_id, shape_id, size_id) = parse_dimension_key(key)?;

    let sub_categories = maps.sub_categories()?;
    let category_shapes = maps.category_shapes()?;
    let shape_sizes = maps.category_shape_sizes()?;
    let avg_weights = maps.avg_weights()?;

    let category_id = sub_categories
        .iter()
        .find(|s| s.id == sub_id)
        .map(|s| s.category_id)
        .ok_or_else(|| AppError::data_integrity(format!("unknown subcategory in key {key:?}")))?;

    let shape_size = category_shapes
        .iter()
        .find(|cs| cs.category_id == category_id && cs.shape_id == shape_id)
        .and_then(|cs| {
            shape_sizes
                .iter()
                .find(|ss| ss.category_shape_id == cs.id && ss.size_id == size_id)
        })
        .ok_or_else(|| {
            AppError::data_integrity(format!("no shape-size row for dimension key {key:?}"))
        })?;

    let weight = avg_weights
        .iter()
        .find(|w| {
            w.category_shape_size_id == shape_size.id && w.sub_category_id == sub_id && w.baked
        })
        .ok_or_else(|| {
            AppError::data_integrity(format!("no baked average weight for dimension key {key:?}"))
        })?;

    Ok(TreatSpec {
        volume: shape_size.volume(),
        weight: weight.avg_weight,
    })
}

/// Find the cheapest bag combination for `amount` treats, or `None` when no
/// bag in the catalog can hold even one.
///
/// # Errors
///
/// Returns an invalid-input error for a zero amount or a treat with
/// non-positive volume or weight.
pub fn find_optimal_bag(
    bags: &[PackagingRow],
    treat: &TreatSpec,
    amount: u32,
) -> AppResult<Option<BagCombination>> {
    if amount == 0 {
        return Err(AppError::invalid_input("amount must be at least 1"));
    }
    if treat.volume <= 0.0 || treat.weight <= 0.0 {
        return Err(AppError::invalid_input(format!(
            "treat must have positive volume and weight, got {treat:?}"
        )));
    }

    let mut candidates: Vec<BagCandidate<'_>> = Vec::with_capacity(bags.len());
    for bag in bags {
        let usable_volume = bag.volume() * EFFICIENCY;
        let by_volume = (usable_volume / treat.volume).floor();
        let by_weight = (bag.max_weight_g()? / treat.weight).floor();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let capacity = by_volume.min(by_weight).max(0.0) as u32;

        if capacity > 0 {
            candidates.push(BagCandidate {
                bag,
                capacity,
                volume: bag.volume(),
            });
        }
    }

    if candidates.is_empty() {
        return Ok(None);
    }

    // Ascending volume, so remainder lookups and tie-breaks prefer the
    // smallest bag that fits
    candidates.sort_by(|a, b| {
        a.volume
            .partial_cmp(&b.volume)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut best: Option<BagCombination> = None;

    for primary in &candidates {
        let full_bags = amount / primary.capacity;
        let remainder = amount % primary.capacity;

        let mut bags_used: Vec<BagAssignment> = Vec::new();
        for _ in 0..full_bags {
            bags_used.push(assignment(primary.bag, primary.capacity, treat));
        }

        let mut total_cost = f64::from(full_bags) * primary.bag.price_per_unit;

        if remainder > 0 {
            let Some(tail) = candidates.iter().find(|c| c.capacity >= remainder) else {
                // Cannot finish the order starting from this bag size
                continue;
            };
            bags_used.push(assignment(tail.bag, remainder, treat));
            total_cost += tail.bag.price_per_unit;
        }

        let total_weight = bags_used.iter().map(|b| b.weight).sum();
        let combination = BagCombination {
            bags: bags_used,
            total_cost,
            total_weight,
        };

        // Strict comparison keeps the first-found winner on ties
        if best
            .as_ref()
            .is_none_or(|b| combination.total_cost < b.total_cost)
        {
            best = Some(combination);
        }
    }

    Ok(best)
}

fn assignment(bag: &PackagingRow, treats: u32, treat: &TreatSpec) -> BagAssignment {
    BagAssignment {
        size: bag.size.clone(),
        treats_held: treats,
        weight: f64::from(treats) * treat.weight,
    }
}

/// Resolve a dimension key and find the cheapest bag combination for it,
/// fetching the catalog and dimension maps through the cache.
///
/// # Errors
///
/// Propagates store, resolution, and input validation errors.
pub async fn optimal_bag(
    cache: &BuildCache,
    dimension_key: &str,
    amount: u32,
) -> AppResult<Option<BagCombination>> {
    let maps = TableMaps::new(cache.get_maps(PACKING_MAPS).await?);
    let treat = resolve_treat(&maps, dimension_key)?;
    let bags = maps.packaging()?;

    debug!(
        "packing {amount} treats of {dimension_key} ({} bags in catalog)",
        bags.len()
    );

    find_optimal_bag(&bags, &treat, amount)
}
