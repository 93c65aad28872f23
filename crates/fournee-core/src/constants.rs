// ABOUTME: Named constants for the Fournee build pipeline
// ABOUTME: Table map names, packing parameters, and cache TTLs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fournee

//! Centralized constants so that table names and tuning parameters live in one
//! place instead of being scattered as string and numeric literals.

/// Table map names exposed by the table store
pub mod maps {
    /// Ingredient master table
    pub const INGREDIENT: &str = "IngredientMap";
    /// Product categories (e.g. Cookie, Loaf)
    pub const CATEGORY: &str = "CategoryMap";
    /// Subcategories under a category (e.g. Sourdough under Loaf)
    pub const SUB_CATEGORY: &str = "SubCategoryMap";
    /// Category-level ingredient slots (combinatorial)
    pub const CATEGORY_INGREDIENT: &str = "CategoryIngredientMap";
    /// Subcategory-level fixed ingredients (deterministic)
    pub const SUB_CATEGORY_INGREDIENT: &str = "SubCategoryIngredientMap";
    /// Shapes available per category
    pub const CATEGORY_SHAPE: &str = "CategoryShapeMap";
    /// Sizes (with physical dimensions) per category shape
    pub const CATEGORY_SHAPE_SIZE: &str = "CategoryShapeSizeMap";
    /// Baked/unbaked average weights per (category shape size, subcategory)
    pub const SUB_CATEGORY_AVG_WEIGHT: &str = "SubCategoryAvgWeightMap";
    /// Shipping bag catalog
    pub const PACKAGING: &str = "PackagingMap";
    /// Per-ingredient nutrition facts
    pub const NUTRITION_FACT: &str = "NutritionFactMap";
    /// Flour lookup (name to id) used for SKU encoding
    pub const FLOUR: &str = "FlourMap";
    /// Flavor lookup (name to id) used for SKU encoding
    pub const FLAVOR: &str = "FlavorMap";
    /// Shape lookup
    pub const SHAPE: &str = "ShapeMap";
    /// Size lookup
    pub const SIZE: &str = "SizeMap";
    /// Derived sellable product table, rebuilt wholesale by full updates
    pub const PRODUCT: &str = "ProductMap";
}

/// Packing parameters for the bag combination solver
pub mod packing {
    /// Usable fraction of a bag's geometric volume. Irregular treats never
    /// tile a bag perfectly, so capacity is derated to 60%.
    pub const EFFICIENCY: f64 = 0.60;
}

/// Nutrition computation parameters
pub mod nutrition {
    /// Gram equivalent of one egg. Egg quantities are counts in the recipe
    /// tables but nutrition fact serving sizes are gram-denominated.
    pub const GRAMS_PER_EGG: f64 = 48.0;

    /// Column holding the serving size in a nutrition fact row; rescaled
    /// rather than summed when facts are combined.
    pub const SERVING_SIZE_FIELD: &str = "ServingSize";
}

/// Cache time-to-live values
pub mod cache {
    /// Table maps are read-mostly; refetch after five minutes
    pub const TTL_TABLE_MAP_SECS: u64 = 300;
    /// Bag catalog changes rarely; cached up to 24 hours
    pub const TTL_PACKAGING_SECS: u64 = 24 * 60 * 60;
}

/// Sanity bound on the recipe combination generator: more base combinations
/// than this for a single category is treated as a data error in the slot
/// tables rather than a workload.
pub const MAX_COMBINATIONS_PER_CATEGORY: usize = 10_000;
