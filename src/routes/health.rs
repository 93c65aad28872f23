// ABOUTME: Liveness and readiness endpoints
// ABOUTME: Readiness probes the table store through a lightweight map fetch
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fournee

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use fournee_core::constants::maps;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::ServerResources;

/// Liveness: the process is up and serving
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Readiness: the table store answers. Uses the smallest map so the probe
/// stays cheap.
pub async fn ready(State(resources): State<Arc<ServerResources>>) -> (StatusCode, Json<Value>) {
    match resources.cache.store().get_maps(&[maps::CATEGORY]).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({"status": "ready", "store": "reachable"})),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"status": "not_ready", "store": e.to_string()})),
        ),
    }
}
