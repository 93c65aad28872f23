// ABOUTME: Main library entry point for the Fournee build server
// ABOUTME: Wires configuration, table store, cache, and HTTP routes together
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fournee

#![recursion_limit = "256"]
#![deny(unsafe_code)]

//! # Fournee Build Server
//!
//! The build pipeline behind a small bakery storefront. The hand-maintained
//! source of truth lives in a remote spreadsheet-like table service; this
//! server derives everything sellable from it:
//!
//! - **Recipes**: every valid ingredient combination per category, with cost,
//!   weight, and availability
//! - **Products**: recipes expanded across their physical shape/size
//!   variants, published back as a rebuilt product table
//! - **Nutrition**: per-recipe totals and per-treat labels, persisted as JSON
//!   caches with content hashes
//! - **Packaging**: cheapest shipping bag combination for an order
//! - **Foreign keys**: conversion of editor-friendly name columns to
//!   relational id columns and back
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fournee_build_server::config::environment::ServerConfig;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = ServerConfig::from_env()?;
//! println!("Fournee build server configured on port {}", config.port);
//! # Ok(())
//! # }
//! ```

/// Build pipeline: recipes, products, nutrition, packing, FK conversion
pub mod build;

/// TTL cache over the table store
pub mod cache;

/// Environment-based configuration
pub mod config;

/// Tracing subscriber setup
pub mod logging;

/// Typed foreign-key relationship registry
pub mod registry;

/// HTTP routes
pub mod routes;

/// Table store backends
pub mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::cache::BuildCache;
use crate::config::environment::ServerConfig;
use crate::store::TableStore;

/// Shared server dependencies, constructed once at startup and injected into
/// every handler. Replaces module-level mutable state.
pub struct ServerResources {
    /// Runtime configuration
    pub config: ServerConfig,
    /// TTL cache over the table store
    pub cache: BuildCache,
}

impl ServerResources {
    /// Build resources from configuration and a store backend
    #[must_use]
    pub fn new(config: ServerConfig, store: Arc<dyn TableStore>) -> Self {
        let cache = BuildCache::with_ttls(
            store,
            std::time::Duration::from_secs(config.cache.table_map_ttl_secs),
            std::time::Duration::from_secs(config.cache.packaging_ttl_secs),
        );

        Self { config, cache }
    }
}

/// Serve the HTTP API until shutdown is requested.
///
/// # Errors
///
/// Returns an error when the listener cannot bind or the server fails.
pub async fn serve(resources: Arc<ServerResources>) -> Result<()> {
    let port = resources.config.port;

    let app = routes::router(resources)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Fournee build server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received, draining connections");
    }
}
