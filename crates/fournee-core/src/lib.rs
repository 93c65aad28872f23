// ABOUTME: Foundation crate for the Fournee build pipeline
// ABOUTME: Error types, domain models, unit conversion, and shared constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fournee

//! # Fournee Core
//!
//! Foundation types shared across the Fournee build pipeline: the unified
//! error system, typed table-row models, the unit converter, and named
//! constants. Everything here is I/O-free; the pipeline, store access, and
//! HTTP surface live in the `fournee_build_server` crate.

/// Shared named constants (map names, packing and nutrition parameters, TTLs)
pub mod constants;
/// Unified error codes and the application error type
pub mod errors;
/// Typed table rows and constructed pipeline records
pub mod models;
/// Measurement unit conversion with fuzzy unit-name resolution
pub mod units;

pub use errors::{AppError, AppResult, ErrorCode};
