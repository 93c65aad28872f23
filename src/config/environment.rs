// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses environment variables into a typed ServerConfig with defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fournee

//! Environment-based configuration management

use anyhow::{Context, Result};
use fournee_core::constants::cache as cache_ttl;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Standard operational logging
    #[default]
    Info,
    /// Verbose diagnostics
    Debug,
    /// Full tracing
    Trace,
}

impl LogLevel {
    /// Convert to a `tracing` level
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }

    /// Parse from string with fallback to the default
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

/// Remote table store connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the table store API
    pub base_url: String,
    /// API token for the store
    pub api_token: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
}

/// Cache TTL settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// TTL for ordinary table maps, in seconds
    pub table_map_ttl_secs: u64,
    /// TTL for the packaging catalog, in seconds
    pub packaging_ttl_secs: u64,
}

/// Persisted nutrition cache file locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionCacheConfig {
    /// Recipe-level facts JSON file
    pub recipe_facts_path: PathBuf,
    /// Product-level facts JSON file
    pub product_facts_path: PathBuf,
}

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen port
    pub port: u16,
    /// Log verbosity
    pub log_level: LogLevel,
    /// Remote store settings
    pub store: StoreConfig,
    /// Cache TTLs
    pub cache: CacheConfig,
    /// Nutrition cache file locations
    pub nutrition: NutritionCacheConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8081,
            log_level: LogLevel::default(),
            store: StoreConfig {
                base_url: "http://localhost:8570".to_owned(),
                api_token: String::new(),
                timeout_secs: 30,
                connect_timeout_secs: 10,
            },
            cache: CacheConfig {
                table_map_ttl_secs: cache_ttl::TTL_TABLE_MAP_SECS,
                packaging_ttl_secs: cache_ttl::TTL_PACKAGING_SECS,
            },
            nutrition: NutritionCacheConfig {
                recipe_facts_path: PathBuf::from("data/recipe_nutrition.json"),
                product_facts_path: PathBuf::from("data/product_nutrition.json"),
            },
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        Err(_) => Ok(default),
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Returns an error when a set variable fails to parse or when the store
    /// token is missing while a remote store URL is configured.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            port: env_or("FOURNEE_PORT", defaults.port)?,
            log_level: env::var("FOURNEE_LOG_LEVEL")
                .map(|raw| LogLevel::from_str_or_default(&raw))
                .unwrap_or_default(),
            store: StoreConfig {
                base_url: env::var("TABLE_STORE_URL").unwrap_or(defaults.store.base_url),
                api_token: env::var("TABLE_STORE_TOKEN").unwrap_or_default(),
                timeout_secs: env_or("TABLE_STORE_TIMEOUT_SECS", defaults.store.timeout_secs)?,
                connect_timeout_secs: env_or(
                    "TABLE_STORE_CONNECT_TIMEOUT_SECS",
                    defaults.store.connect_timeout_secs,
                )?,
            },
            cache: CacheConfig {
                table_map_ttl_secs: env_or(
                    "TABLE_CACHE_TTL_SECS",
                    defaults.cache.table_map_ttl_secs,
                )?,
                packaging_ttl_secs: env_or(
                    "PACKAGING_CACHE_TTL_SECS",
                    defaults.cache.packaging_ttl_secs,
                )?,
            },
            nutrition: NutritionCacheConfig {
                recipe_facts_path: env::var("NUTRITION_RECIPE_CACHE_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.nutrition.recipe_facts_path),
                product_facts_path: env::var("NUTRITION_PRODUCT_CACHE_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.nutrition.product_facts_path),
            },
        };

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8081);
        assert_eq!(config.cache.packaging_ttl_secs, 24 * 60 * 60);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn log_level_parses_with_fallback() {
        assert_eq!(LogLevel::from_str_or_default("DEBUG"), LogLevel::Debug);
        assert_eq!(LogLevel::from_str_or_default("nonsense"), LogLevel::Info);
    }
}
