// ABOUTME: Domain models for the Fournee build pipeline
// ABOUTME: Typed table rows, constructed recipes/products, nutrition totals, and SKU encoding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fournee

//! # Domain Models
//!
//! Typed views over the table store's row maps, plus the transient records the
//! build pipeline constructs (recipes, products, nutrition totals, bag
//! combinations). Constructed records carry no identity beyond their SKU
//! string, which must be deterministic for identical source rows.
//!
//! ## SKU encoding
//!
//! `recipeSKU = subCategoryID ++ flourID ++ flavorID` as digit characters, and
//! `productSKU = recipeSKU ++ "-" ++ shapeID ++ sizeID`. The encoding is fixed
//! width: every component **must** be a single digit. Construction validates
//! this and fails loudly with [`ErrorCode::SkuOverflow`](crate::errors::ErrorCode::SkuOverflow)
//! instead of silently truncating.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::{AppError, AppResult};
use crate::units::{self, UnitError};

/// A raw table row: column name to JSON value
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Ingredient master row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientRow {
    /// Row id
    #[serde(rename = "IngredientID")]
    pub id: i64,
    /// Display name
    #[serde(rename = "Name")]
    pub name: String,
    /// Ingredient category label (slot name, e.g. "Flour")
    #[serde(rename = "Category")]
    pub category: String,
    /// Unit the purchase size is measured in
    #[serde(rename = "UnitType")]
    pub unit_type: String,
    /// Purchase size in `unit_type` units
    #[serde(rename = "UnitSize")]
    pub unit_size: f64,
    /// Cost of one purchase
    #[serde(rename = "PurchaseCost")]
    pub purchase_cost: f64,
    /// Whether the ingredient is currently in stock
    #[serde(rename = "Available")]
    pub available: bool,
}

impl IngredientRow {
    /// Cost per base unit: per gram for mass-measured ingredients, per piece
    /// for count-measured ones.
    ///
    /// # Errors
    ///
    /// Returns [`UnitError`] when the purchase unit cannot be resolved.
    pub fn cost_per_unit(&self) -> Result<f64, UnitError> {
        Ok(self.purchase_cost / units::to_base_units(self.unit_size, &self.unit_type)?)
    }
}

/// Category-level ingredient slot junction row. One slot per
/// `ingredient_category` label; every ingredient in that category is a
/// candidate for the slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryIngredientRow {
    /// Category this slot belongs to
    #[serde(rename = "CategoryID")]
    pub category_id: i64,
    /// Slot label, matching `IngredientRow.category`
    #[serde(rename = "IngredientCategory")]
    pub ingredient_category: String,
    /// Required quantity in the ingredient's base units
    #[serde(rename = "Quantity")]
    pub quantity: f64,
}

/// Subcategory-level fixed ingredient junction row. Deterministic, not varied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubCategoryIngredientRow {
    /// Subcategory this ingredient belongs to
    #[serde(rename = "SubCategoryID")]
    pub sub_category_id: i64,
    /// Concrete ingredient id
    #[serde(rename = "IngredientID")]
    pub ingredient_id: i64,
    /// Required quantity in the ingredient's base units
    #[serde(rename = "Quantity")]
    pub quantity: f64,
}

/// Product category row (e.g. Cookie, Loaf)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRow {
    /// Row id
    #[serde(rename = "CategoryID")]
    pub id: i64,
    /// Display name
    #[serde(rename = "Name")]
    pub name: String,
}

/// Subcategory row (e.g. Sourdough under Loaf)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubCategoryRow {
    /// Row id
    #[serde(rename = "SubCategoryID")]
    pub id: i64,
    /// Display name
    #[serde(rename = "Name")]
    pub name: String,
    /// Parent category
    #[serde(rename = "CategoryID")]
    pub category_id: i64,
}

/// Generic id/name lookup row (ShapeMap, SizeMap, FlourMap, FlavorMap). The
/// id column name differs per table (`ShapeID`, `FlourID`, ...), so these are
/// parsed explicitly rather than derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedRow {
    /// Row id
    pub id: i64,
    /// Display name
    pub name: String,
}

impl NamedRow {
    /// Parse a lookup row given its table-specific id column name
    ///
    /// # Errors
    ///
    /// Returns a data-integrity error when the id or name column is missing.
    pub fn from_row(row: &Row, id_column: &str) -> AppResult<Self> {
        let id = row
            .get(id_column)
            .and_then(serde_json::Value::as_i64)
            .ok_or_else(|| AppError::data_integrity(format!("lookup row without {id_column}")))?;
        let name = row
            .get("Name")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| AppError::data_integrity(format!("{id_column} row without Name")))?;

        Ok(Self {
            id,
            name: name.to_owned(),
        })
    }
}

/// Category-to-shape link
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryShapeRow {
    /// Row id
    #[serde(rename = "CategoryShapeID")]
    pub id: i64,
    /// Category
    #[serde(rename = "CategoryID")]
    pub category_id: i64,
    /// Shape
    #[serde(rename = "ShapeID")]
    pub shape_id: i64,
}

/// (Category, shape) to size link with batch size and physical dimensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryShapeSizeRow {
    /// Row id
    #[serde(rename = "CategoryShapeSizeID")]
    pub id: i64,
    /// Parent category-shape link
    #[serde(rename = "CategoryShapeID")]
    pub category_shape_id: i64,
    /// Size
    #[serde(rename = "SizeID")]
    pub size_id: i64,
    /// Treats produced per batch
    #[serde(rename = "BatchSize")]
    pub batch_size: f64,
    /// Width in cm
    #[serde(rename = "DimWidth")]
    pub dim_width: f64,
    /// Depth in cm
    #[serde(rename = "DimDepth")]
    pub dim_depth: f64,
    /// Height in cm
    #[serde(rename = "DimHeight")]
    pub dim_height: f64,
}

impl CategoryShapeSizeRow {
    /// Treat volume, width x depth x height
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.dim_width * self.dim_depth * self.dim_height
    }
}

/// Average treat weight for a (category shape size, subcategory) pair.
/// Only `baked` rows feed nutrition scaling and packing; unbaked rows must be
/// ignored by every consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubCategoryAvgWeightRow {
    /// Dimension chain this weight belongs to
    #[serde(rename = "CategoryShapeSizeID")]
    pub category_shape_size_id: i64,
    /// Subcategory this weight belongs to
    #[serde(rename = "SubCategoryID")]
    pub sub_category_id: i64,
    /// Average weight in grams
    #[serde(rename = "AvgWeight")]
    pub avg_weight: f64,
    /// Whether this is the post-bake weight
    #[serde(rename = "Baked")]
    pub baked: bool,
}

/// Shipping bag catalog row. Max weight is stored in ounces upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackagingRow {
    /// Row id
    #[serde(rename = "PackagingID")]
    pub id: i64,
    /// Bag size label (e.g. "Small")
    #[serde(rename = "Size")]
    pub size: String,
    /// Width in cm
    #[serde(rename = "DimWidth")]
    pub dim_width: f64,
    /// Depth in cm
    #[serde(rename = "DimDepth")]
    pub dim_depth: f64,
    /// Height in cm
    #[serde(rename = "DimHeight")]
    pub dim_height: f64,
    /// Maximum carried weight in ounces, as stored upstream
    #[serde(rename = "MaxWeight")]
    pub max_weight_oz: f64,
    /// Cost of one bag
    #[serde(rename = "PricePerUnit")]
    pub price_per_unit: f64,
}

impl PackagingRow {
    /// Geometric bag volume
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.dim_width * self.dim_depth * self.dim_height
    }

    /// Maximum carried weight converted to grams
    ///
    /// # Errors
    ///
    /// Returns [`UnitError`] when the ounce conversion fails (it cannot with
    /// the static unit table, but the converter owns that decision).
    pub fn max_weight_g(&self) -> Result<f64, UnitError> {
        units::convert(self.max_weight_oz, "oz", "g")
    }
}

/// Per-ingredient nutrition fact row. Nutrient columns vary by table version,
/// so they are held dynamically alongside the fixed identifier fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionFactRow {
    /// Ingredient this fact describes
    pub ingredient_id: i64,
    /// Serving size in grams that the nutrient amounts refer to
    pub serving_size: f64,
    /// Nutrient field name to amount at `serving_size`
    pub nutrients: BTreeMap<String, f64>,
}

impl NutritionFactRow {
    /// Parse a fact from a raw table row. Numeric columns other than
    /// identifier (`*ID`) columns and the serving size are nutrients.
    ///
    /// # Errors
    ///
    /// Returns a data-integrity error when the ingredient id or serving size
    /// is missing or non-numeric.
    pub fn from_row(row: &Row) -> AppResult<Self> {
        let ingredient_id = row
            .get("IngredientID")
            .and_then(serde_json::Value::as_i64)
            .ok_or_else(|| AppError::data_integrity("nutrition fact row without IngredientID"))?;

        let serving_size = row
            .get(crate::constants::nutrition::SERVING_SIZE_FIELD)
            .and_then(serde_json::Value::as_f64)
            .ok_or_else(|| AppError::data_integrity("nutrition fact row without ServingSize"))?;

        let mut nutrients = BTreeMap::new();
        for (column, value) in row {
            if column.ends_with("ID") || column == crate::constants::nutrition::SERVING_SIZE_FIELD {
                continue;
            }
            if let Some(amount) = value.as_f64() {
                nutrients.insert(column.clone(), amount);
            }
        }

        Ok(Self {
            ingredient_id,
            serving_size,
            nutrients,
        })
    }
}

/// Aggregated nutrient amounts at a serving size. `BTreeMap` keeps field order
/// deterministic for serialization and content hashing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientTotals {
    /// Serving size in grams the amounts refer to
    #[serde(rename = "ServingSize")]
    pub serving_size: f64,
    /// Nutrient field name to amount
    #[serde(flatten)]
    pub nutrients: BTreeMap<String, f64>,
}

impl NutrientTotals {
    /// Scale every nutrient by `ratio` and accumulate into `self`
    pub fn accumulate(&mut self, fact: &NutritionFactRow, ratio: f64) {
        for (field, amount) in &fact.nutrients {
            *self.nutrients.entry(field.clone()).or_insert(0.0) += amount * ratio;
        }
    }

    /// A copy rescaled from this serving size to `serving_size` grams; every
    /// nutrient is multiplied by the serving ratio and `ServingSize` itself is
    /// replaced, never scaled.
    #[must_use]
    pub fn rescaled_to(&self, serving_size: f64) -> Self {
        let ratio = if self.serving_size == 0.0 {
            0.0
        } else {
            serving_size / self.serving_size
        };

        Self {
            serving_size,
            nutrients: self
                .nutrients
                .iter()
                .map(|(field, amount)| (field.clone(), amount * ratio))
                .collect(),
        }
    }
}

/// One resolved ingredient inside a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIngredient {
    /// Slot label this ingredient fills (e.g. "Flour")
    pub slot: String,
    /// Ingredient row id
    pub ingredient_id: i64,
    /// Ingredient display name
    pub name: String,
    /// Ingredient category label
    pub category: String,
    /// Quantity in the ingredient's base units (grams or count)
    pub quantity: f64,
    /// Cost contribution: quantity x cost per base unit
    pub cost: f64,
    /// Ingredient availability
    pub available: bool,
}

/// Descriptive metadata derived for a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeMeta {
    /// Fixed-width digit SKU: subcategory, flour, flavor
    pub sku: String,
    /// Category the recipe belongs to
    pub category_id: i64,
    /// Subcategory the recipe belongs to
    pub sub_category_id: i64,
    /// Flour id extracted from the flour-slot ingredient name
    pub flour_id: i64,
    /// Flavor id extracted from the flavor-slot ingredient name
    pub flavor_id: i64,
    /// Sum of ingredient cost contributions
    pub cost: f64,
    /// Sum of ingredient quantities (base units)
    pub weight: f64,
    /// Ingredient names sorted by descending quantity
    pub ingredient_list: Vec<String>,
    /// Display name
    pub name: String,
    /// Display description
    pub description: String,
    /// AND over every ingredient's availability
    pub available: bool,
}

/// A concrete ingredient formulation for a category/subcategory combination,
/// prior to physical shape and size
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Derived metadata
    pub meta: RecipeMeta,
    /// Resolved ingredient slots
    pub ingredients: Vec<RecipeIngredient>,
}

/// A sellable SKU: recipe x physical shape x size
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Composed SKU: recipe SKU, "-", shape digit, size digit
    pub sku: String,
    /// Source recipe SKU
    pub recipe_sku: String,
    /// Display name
    pub name: String,
    /// Display description
    pub description: String,
    /// Source recipe cost
    pub recipe_cost: f64,
    /// Mirrors the source recipe's availability; no product-level override
    pub available: bool,
    /// Ingredient names from the source recipe, descending by quantity
    pub ingredients: Vec<String>,
}

/// One bag size used in a combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BagAssignment {
    /// Bag size label
    pub size: String,
    /// Treats packed into this bag
    pub treats_held: u32,
    /// Packed weight in grams
    pub weight: f64,
}

/// The bag packer's output for one (dimension key, amount) query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BagCombination {
    /// Bags in the combination
    pub bags: Vec<BagAssignment>,
    /// Summed bag cost
    pub total_cost: f64,
    /// Summed packed weight in grams
    pub total_weight: f64,
}

/// Validate that a SKU component fits the single-digit encoding and return
/// its digit character.
///
/// # Errors
///
/// Returns [`ErrorCode::SkuOverflow`](crate::errors::ErrorCode::SkuOverflow)
/// for ids outside `0..=9`.
pub fn sku_digit(component: &str, id: i64) -> AppResult<char> {
    if !(0..=9).contains(&id) {
        return Err(AppError::sku_overflow(component, id));
    }
    // Single ASCII digit by the guard above
    Ok(char::from(b'0' + id as u8))
}

/// Compose a recipe SKU from its components, validating each digit
///
/// # Errors
///
/// Returns an error when any component is not a single digit.
pub fn recipe_sku(sub_category_id: i64, flour_id: i64, flavor_id: i64) -> AppResult<String> {
    Ok([
        sku_digit("subcategory", sub_category_id)?,
        sku_digit("flour", flour_id)?,
        sku_digit("flavor", flavor_id)?,
    ]
    .iter()
    .collect())
}

/// Compose a product SKU from a recipe SKU and shape/size components
///
/// # Errors
///
/// Returns an error when the shape or size id is not a single digit.
pub fn product_sku(recipe_sku: &str, shape_id: i64, size_id: i64) -> AppResult<String> {
    Ok(format!(
        "{recipe_sku}-{}{}",
        sku_digit("shape", shape_id)?,
        sku_digit("size", size_id)?
    ))
}

/// Components recovered from a product SKU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductSkuParts {
    /// Subcategory digit
    pub sub_category_id: i64,
    /// Flour digit
    pub flour_id: i64,
    /// Flavor digit
    pub flavor_id: i64,
    /// Shape digit
    pub shape_id: i64,
    /// Size digit
    pub size_id: i64,
}

/// Parse a product SKU back into its components
///
/// # Errors
///
/// Returns a data-integrity error when the SKU does not match the
/// `DDD-DD` fixed-width layout.
pub fn parse_product_sku(sku: &str) -> AppResult<ProductSkuParts> {
    let malformed = || AppError::data_integrity(format!("malformed product SKU {sku:?}"));

    let (recipe, shape_size) = sku.split_once('-').ok_or_else(malformed)?;
    let digits: Vec<i64> = recipe
        .chars()
        .chain(shape_size.chars())
        .map(|c| c.to_digit(10).map(i64::from))
        .collect::<Option<Vec<i64>>>()
        .ok_or_else(malformed)?;

    match digits.as_slice() {
        [sub, flour, flavor, shape, size] => Ok(ProductSkuParts {
            sub_category_id: *sub,
            flour_id: *flour,
            flavor_id: *flavor,
            shape_id: *shape,
            size_id: *size,
        }),
        _ => Err(malformed()),
    }
}
