// ABOUTME: Unified error handling for the Fournee build pipeline
// ABOUTME: Defines error codes, HTTP status mapping, and convenience constructors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fournee

//! # Unified Error Handling
//!
//! Centralized error types for the build pipeline. Every fallible operation
//! returns [`AppResult`]; the [`ErrorCode`] taxonomy separates data problems
//! (a missing referenced row, an unresolvable unit string) from remote store
//! failures and plain misconfiguration.
//!
//! A legitimately empty packing result is **not** an error: the bag packer
//! returns `Ok(None)` when no bag fits.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Data integrity (1000-1999)
    /// A referenced row is missing for a computation that cannot proceed
    #[serde(rename = "DATA_INTEGRITY")]
    DataIntegrity = 1000,
    /// A SKU component exceeds the single-digit encoding range
    #[serde(rename = "SKU_OVERFLOW")]
    SkuOverflow = 1001,
    /// Two constructed records collide on the same SKU
    #[serde(rename = "DUPLICATE_SKU")]
    DuplicateSku = 1002,

    // Unit conversion (2000-2999)
    /// A unit string cannot be resolved to a canonical unit
    #[serde(rename = "UNIT_RESOLUTION")]
    UnitResolution = 2000,

    // Validation (3000-3999)
    /// The provided input is invalid
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,

    // External services (5000-5999)
    /// The remote table store or another external API call failed
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalService = 5000,

    // Configuration (6000-6999)
    /// Configuration is missing or invalid
    #[serde(rename = "CONFIG_ERROR")]
    Config = 6000,

    // Internal (9000-9999)
    /// An internal error occurred
    #[serde(rename = "INTERNAL_ERROR")]
    Internal = 9000,
    /// Data serialization or deserialization failed
    #[serde(rename = "SERIALIZATION_ERROR")]
    Serialization = 9001,
    /// Reading or writing a persisted cache file failed
    #[serde(rename = "STORAGE_ERROR")]
    Storage = 9002,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidInput => 400,
            Self::DataIntegrity | Self::SkuOverflow | Self::DuplicateSku => 422,
            Self::ExternalService => 502,
            Self::UnitResolution
            | Self::Config
            | Self::Internal
            | Self::Serialization
            | Self::Storage => 500,
        }
    }

    /// Get a short description of this error class
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::DataIntegrity => "A referenced row required for this computation is missing",
            Self::SkuOverflow => "A SKU component is not representable as a single digit",
            Self::DuplicateSku => "Duplicate SKU produced from the source tables",
            Self::UnitResolution => "The measurement unit could not be resolved",
            Self::InvalidInput => "The provided input is invalid",
            Self::ExternalService => "An external service call failed",
            Self::Config => "Configuration is missing or invalid",
            Self::Internal => "An internal error occurred",
            Self::Serialization => "Data serialization or deserialization failed",
            Self::Storage => "A persisted cache file could not be read or written",
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new error with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Attach a source error for chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Missing referenced row
    pub fn data_integrity(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DataIntegrity, message)
    }

    /// SKU component out of encoding range
    pub fn sku_overflow(component: &str, value: i64) -> Self {
        Self::new(
            ErrorCode::SkuOverflow,
            format!("{component} id {value} is not a single digit; SKU encoding would corrupt"),
        )
    }

    /// Duplicate SKU detected during a build
    pub fn duplicate_sku(sku: &str) -> Self {
        Self::new(
            ErrorCode::DuplicateSku,
            format!("duplicate SKU {sku} indicates a data error in the map tables"),
        )
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// External service failure
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalService,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Config, message)
    }

    /// Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }

    /// Serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Serialization, message)
    }

    /// Cache file storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Storage, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::Serialization, error.to_string()).with_source(error)
    }
}

impl From<crate::units::UnitError> for AppError {
    fn from(error: crate::units::UnitError) -> Self {
        Self::new(ErrorCode::UnitResolution, error.to_string()).with_source(error)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
