// ABOUTME: Typed registry of foreign-key relationships between tables
// ABOUTME: Maps ID/Name column pairs to their referenced lookup map
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fournee

//! # Foreign-Key Registry
//!
//! The table store interleaves relational id columns (`CategoryID`) and
//! display-name columns (`CategoryName`). The registry is the one place that
//! knows which map a column pair refers to and which column in that map holds
//! the id. Conversion code resolves relations through this table; a column
//! with no registered relation is a logged skip, never a guessed map name.

use fournee_core::constants::maps;

/// One foreign-key relationship: an id/name column pair and the lookup map it
/// points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKeyRelation {
    /// Foreign-key id column as it appears on referencing tables
    pub id_column: &'static str,
    /// Display-name column as it appears on referencing tables
    pub name_column: &'static str,
    /// Map the relation points into
    pub map: &'static str,
    /// The referenced map's own id column
    pub map_id_column: &'static str,
    /// Ingredient slot label that resolves through this relation during
    /// recipe builds ("Flour" slot ingredients resolve to `FlourMap` ids)
    pub slot_label: Option<&'static str>,
}

/// Every known foreign-key relationship
pub const RELATIONS: &[ForeignKeyRelation] = &[
    ForeignKeyRelation {
        id_column: "CategoryID",
        name_column: "CategoryName",
        map: maps::CATEGORY,
        map_id_column: "CategoryID",
        slot_label: None,
    },
    ForeignKeyRelation {
        id_column: "SubCategoryID",
        name_column: "SubCategoryName",
        map: maps::SUB_CATEGORY,
        map_id_column: "SubCategoryID",
        slot_label: None,
    },
    ForeignKeyRelation {
        id_column: "IngredientID",
        name_column: "IngredientName",
        map: maps::INGREDIENT,
        map_id_column: "IngredientID",
        slot_label: None,
    },
    ForeignKeyRelation {
        id_column: "ShapeID",
        name_column: "ShapeName",
        map: maps::SHAPE,
        map_id_column: "ShapeID",
        slot_label: None,
    },
    ForeignKeyRelation {
        id_column: "SizeID",
        name_column: "SizeName",
        map: maps::SIZE,
        map_id_column: "SizeID",
        slot_label: None,
    },
    ForeignKeyRelation {
        id_column: "FlourID",
        name_column: "FlourName",
        map: maps::FLOUR,
        map_id_column: "FlourID",
        slot_label: Some("Flour"),
    },
    ForeignKeyRelation {
        id_column: "FlavorID",
        name_column: "FlavorName",
        map: maps::FLAVOR,
        map_id_column: "FlavorID",
        slot_label: Some("Flavor"),
    },
    ForeignKeyRelation {
        id_column: "CategoryShapeID",
        name_column: "CategoryShapeName",
        map: maps::CATEGORY_SHAPE,
        map_id_column: "CategoryShapeID",
        slot_label: None,
    },
    ForeignKeyRelation {
        id_column: "CategoryShapeSizeID",
        name_column: "CategoryShapeSizeName",
        map: maps::CATEGORY_SHAPE_SIZE,
        map_id_column: "CategoryShapeSizeID",
        slot_label: None,
    },
    ForeignKeyRelation {
        id_column: "PackagingID",
        name_column: "PackagingName",
        map: maps::PACKAGING,
        map_id_column: "PackagingID",
        slot_label: None,
    },
];

/// Find the relation for a foreign-key id column
#[must_use]
pub fn by_id_column(column: &str) -> Option<&'static ForeignKeyRelation> {
    RELATIONS.iter().find(|r| r.id_column == column)
}

/// Find the relation for a display-name column
#[must_use]
pub fn by_name_column(column: &str) -> Option<&'static ForeignKeyRelation> {
    RELATIONS.iter().find(|r| r.name_column == column)
}

/// Find the relation an ingredient slot label resolves through, if any
#[must_use]
pub fn by_slot_label(label: &str) -> Option<&'static ForeignKeyRelation> {
    RELATIONS.iter().find(|r| r.slot_label == Some(label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_and_name_columns_resolve_to_the_same_relation() {
        let by_id = by_id_column("CategoryID").unwrap();
        let by_name = by_name_column("CategoryName").unwrap();
        assert_eq!(by_id, by_name);
        assert_eq!(by_id.map, maps::CATEGORY);
    }

    #[test]
    fn unknown_columns_have_no_relation() {
        assert!(by_id_column("BakerID").is_none());
        assert!(by_name_column("Notes").is_none());
    }

    #[test]
    fn slot_labels_cover_sku_components() {
        assert_eq!(by_slot_label("Flour").unwrap().map, maps::FLOUR);
        assert_eq!(by_slot_label("Flavor").unwrap().map, maps::FLAVOR);
        assert!(by_slot_label("Fat").is_none());
    }
}
