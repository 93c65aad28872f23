// ABOUTME: HTTP route assembly and error-to-response mapping
// ABOUTME: Axum router wiring build, table, packaging, and health endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fournee

//! # HTTP Routes
//!
//! Thin handlers over the pipeline: every endpoint delegates to a build
//! module and maps [`AppError`] onto the HTTP status its error code carries.
//! Response bodies follow one envelope: `{"success": bool, ...}` with a
//! `message` on failure.

/// Pipeline trigger endpoints
pub mod build;
/// Liveness and readiness probes
pub mod health;
/// Bag packing endpoints
pub mod packaging;
/// Foreign-key conversion endpoints
pub mod tables;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use fournee_core::errors::AppError;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

use crate::ServerResources;

/// [`AppError`] adapter carrying the HTTP mapping. Handlers return
/// `Result<_, ApiError>` and use `?` on pipeline calls.
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            warn!("request failed: {}", self.0);
        }

        let body = Json(json!({
            "success": false,
            "message": self.0.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Assemble the full application router
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/api/build/recipes", post(build::build_recipes))
        .route("/api/build/full", post(build::full_update))
        .route("/api/tables/:name/convert", post(tables::convert))
        .route("/api/packaging/optimal-bag", get(packaging::optimal_bag))
        .route("/api/packaging/refresh", post(packaging::refresh))
        .with_state(resources)
}
