// ABOUTME: Production server binary for the Fournee build pipeline
// ABOUTME: Loads configuration, connects the table store, and serves the HTTP API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fournee

#![recursion_limit = "256"]

//! # Fournee Build Server Binary
//!
//! Starts the build pipeline HTTP API against the configured remote table
//! store.

use anyhow::Result;
use clap::Parser;
use fournee_build_server::{
    config::environment::ServerConfig,
    logging,
    store::seatable::{initialize_shared_client, SeaTableStore},
    ServerResources,
};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "fournee-build-server")]
#[command(about = "Fournee bakery build pipeline - recipes, products, nutrition, packaging")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    port: Option<u16>,

    /// Override log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.port {
        config.port = port;
    }

    if let Some(level) = args.log_level {
        std::env::set_var("FOURNEE_LOG_LEVEL", level);
    }
    logging::init_from_env()?;

    info!("Starting Fournee build server");
    info!(
        "table store at {}, map TTL {}s, packaging TTL {}s",
        config.store.base_url, config.cache.table_map_ttl_secs, config.cache.packaging_ttl_secs
    );

    initialize_shared_client(config.store.timeout_secs, config.store.connect_timeout_secs);

    let store = Arc::new(SeaTableStore::new(
        config.store.base_url.clone(),
        config.store.api_token.clone(),
    ));

    let resources = Arc::new(ServerResources::new(config, store));
    fournee_build_server::serve(resources).await
}
