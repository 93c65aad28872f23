// ABOUTME: Measurement unit conversion for ingredient and packaging math
// ABOUTME: Normalizes fuzzy unit strings and converts between mass and count units
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fournee

//! # Unit Conversion
//!
//! Converts physical quantities between measurement units using fixed factors.
//! Unit strings in the source tables are typed by hand ("Grams", "fl oz",
//! "pounds", ...), so resolution is forgiving: strings are normalized and, when
//! no exact match exists, matched to the closest known unit name by edit
//! distance.
//!
//! Mass units convert through grams. Count units (ct/pc/ea) are dimensionless
//! pass-throughs that convert only among themselves; a mass-to-count request
//! is an error, not a silent factor-1 conversion.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Unit resolution and conversion errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    /// The unit string could not be resolved to a canonical unit
    Unresolvable(String),
    /// The two units measure different dimensions (mass vs. count)
    Incompatible {
        /// Resolved source unit
        from: &'static str,
        /// Resolved target unit
        to: &'static str,
    },
}

impl Display for UnitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Unresolvable(raw) => write!(f, "cannot resolve unit: {raw:?}"),
            Self::Incompatible { from, to } => {
                write!(f, "units {from} and {to} measure different dimensions")
            }
        }
    }
}

impl Error for UnitError {}

/// Dimension a unit measures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dimension {
    Mass,
    Count,
}

/// A canonical unit with its conversion factor
struct UnitDef {
    /// Canonical abbreviation
    abbrev: &'static str,
    /// Grams per unit for mass units; 1.0 for count units
    grams_per_unit: f64,
    dimension: Dimension,
    /// Names and spellings that resolve to this unit after normalization
    aliases: &'static [&'static str],
}

/// Canonical unit table. Declaration order breaks fuzzy-match ties
/// (first-found wins).
const UNITS: &[UnitDef] = &[
    UnitDef {
        abbrev: "kg",
        grams_per_unit: 1000.0,
        dimension: Dimension::Mass,
        aliases: &["kg", "kilogram", "kilo"],
    },
    UnitDef {
        abbrev: "g",
        grams_per_unit: 1.0,
        dimension: Dimension::Mass,
        aliases: &["g", "gram"],
    },
    UnitDef {
        abbrev: "mg",
        grams_per_unit: 0.001,
        dimension: Dimension::Mass,
        aliases: &["mg", "milligram"],
    },
    UnitDef {
        abbrev: "lb",
        grams_per_unit: 453.592,
        dimension: Dimension::Mass,
        aliases: &["lb", "pound"],
    },
    UnitDef {
        abbrev: "oz",
        grams_per_unit: 28.3495,
        dimension: Dimension::Mass,
        aliases: &["oz", "ounce"],
    },
    UnitDef {
        abbrev: "fl_oz",
        grams_per_unit: 29.5735,
        dimension: Dimension::Mass,
        aliases: &["fl_oz", "fluid_ounce", "floz"],
    },
    UnitDef {
        abbrev: "ct",
        grams_per_unit: 1.0,
        dimension: Dimension::Count,
        aliases: &["ct", "count"],
    },
    UnitDef {
        abbrev: "pc",
        grams_per_unit: 1.0,
        dimension: Dimension::Count,
        aliases: &["pc", "piece"],
    },
    UnitDef {
        abbrev: "ea",
        grams_per_unit: 1.0,
        dimension: Dimension::Count,
        aliases: &["ea", "each"],
    },
];

/// Normalize a raw unit string: lowercase, spaces to underscores, strip
/// trailing "s"/"ies" pluralization.
fn normalize(raw: &str) -> String {
    let mut s = raw.trim().to_lowercase().replace(' ', "_");

    if let Some(stem) = s.strip_suffix("ies") {
        s = format!("{stem}y");
    } else if s.len() > 1 && s.ends_with('s') && !s.ends_with("ss") {
        s.truncate(s.len() - 1);
    }

    s
}

/// Levenshtein edit distance between two strings
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Resolve a raw unit string to its canonical unit definition.
///
/// Exact alias match first; otherwise the alias with minimum edit distance to
/// the normalized input, ties broken by declaration order.
fn resolve(raw: &str) -> Result<&'static UnitDef, UnitError> {
    let normalized = normalize(raw);
    if normalized.is_empty() {
        return Err(UnitError::Unresolvable(raw.to_owned()));
    }

    for unit in UNITS {
        if unit.aliases.contains(&normalized.as_str()) {
            return Ok(unit);
        }
    }

    let mut best: Option<(&'static UnitDef, usize)> = None;
    for unit in UNITS {
        for alias in unit.aliases {
            let distance = edit_distance(&normalized, alias);
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((unit, distance));
            }
        }
    }

    best.map(|(unit, _)| unit)
        .ok_or_else(|| UnitError::Unresolvable(raw.to_owned()))
}

/// Convert a value between two units.
///
/// # Errors
///
/// Returns [`UnitError::Unresolvable`] when either unit string cannot be
/// resolved, and [`UnitError::Incompatible`] for mass/count mismatches.
///
/// # Examples
///
/// ```
/// use fournee_core::units::convert;
///
/// let grams = convert(2.0, "kg", "g").unwrap();
/// assert!((grams - 2000.0).abs() < f64::EPSILON);
///
/// // Fuzzy resolution tolerates typos and plurals
/// let grams = convert(1.0, "Pounds", "grams").unwrap();
/// assert!((grams - 453.592).abs() < 1e-9);
/// ```
pub fn convert(value: f64, from: &str, to: &str) -> Result<f64, UnitError> {
    let from = resolve(from)?;
    let to = resolve(to)?;

    if from.dimension != to.dimension {
        return Err(UnitError::Incompatible {
            from: from.abbrev,
            to: to.abbrev,
        });
    }

    Ok(value * from.grams_per_unit / to.grams_per_unit)
}

/// Convert a value to its base unit: grams for mass units, count for count
/// units. This is the denominator of the per-unit cost derivation, where a
/// purchase is priced per gram or per piece depending on how it is measured.
///
/// # Errors
///
/// Returns [`UnitError::Unresolvable`] when the unit string cannot be resolved.
pub fn to_base_units(value: f64, unit: &str) -> Result<f64, UnitError> {
    let unit = resolve(unit)?;
    Ok(value * unit.grams_per_unit)
}

/// Whether a unit is count-like (ct/pc/ea) rather than a mass unit.
///
/// # Errors
///
/// Returns [`UnitError::Unresolvable`] when the unit string cannot be resolved.
pub fn is_count_unit(unit: &str) -> Result<bool, UnitError> {
    Ok(resolve(unit)?.dimension == Dimension::Count)
}
