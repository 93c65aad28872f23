// ABOUTME: TTL cache over the table store, injected into every pipeline component
// ABOUTME: Per-map expiry with explicit invalidation hooks and a mirror for FK conversions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fournee

//! # Build Cache
//!
//! An explicit cache context constructed once per process and injected into
//! each component, replacing hidden module-level mutable state. Table maps
//! are read-mostly: most maps refresh after a short TTL, the packaging
//! catalog is held for 24 hours, and callers invalidate manually when
//! upstream data changes.
//!
//! The design assumes at most one rebuild in flight at a time; the `RwLock`
//! makes concurrent reads safe but refresh races are not arbitrated beyond
//! last-write-wins.

use fournee_core::constants::{cache as ttl, maps};
use fournee_core::errors::AppResult;
use fournee_core::models::Row;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

use crate::store::TableStore;

/// A cached table map with its expiry
struct CacheEntry {
    rows: Arc<Vec<Row>>,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(rows: Vec<Row>, ttl: Duration) -> Self {
        Self {
            rows: Arc::new(rows),
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// TTL cache over a [`TableStore`]
pub struct BuildCache {
    store: Arc<dyn TableStore>,
    entries: RwLock<HashMap<String, CacheEntry>>,
    map_ttl: Duration,
    packaging_ttl: Duration,
}

impl BuildCache {
    /// Create a cache over the given store with default TTLs
    #[must_use]
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self::with_ttls(
            store,
            Duration::from_secs(ttl::TTL_TABLE_MAP_SECS),
            Duration::from_secs(ttl::TTL_PACKAGING_SECS),
        )
    }

    /// Create a cache with explicit TTLs (tests use short ones)
    #[must_use]
    pub fn with_ttls(
        store: Arc<dyn TableStore>,
        map_ttl: Duration,
        packaging_ttl: Duration,
    ) -> Self {
        Self {
            store,
            entries: RwLock::new(HashMap::new()),
            map_ttl,
            packaging_ttl,
        }
    }

    /// The underlying store
    #[must_use]
    pub fn store(&self) -> &Arc<dyn TableStore> {
        &self.store
    }

    fn ttl_for(&self, name: &str) -> Duration {
        if name == maps::PACKAGING {
            self.packaging_ttl
        } else {
            self.map_ttl
        }
    }

    /// Fetch the requested maps, serving fresh entries from cache and
    /// fetching the rest from the store in one concurrent batch.
    ///
    /// # Errors
    ///
    /// Propagates store failures for the missing maps.
    pub async fn get_maps(&self, names: &[&str]) -> AppResult<HashMap<String, Arc<Vec<Row>>>> {
        let mut result = HashMap::with_capacity(names.len());
        let mut missing: Vec<&str> = Vec::new();

        {
            let entries = self.entries.read().await;
            for name in names {
                match entries.get(*name) {
                    Some(entry) if !entry.is_expired() => {
                        result.insert((*name).to_owned(), Arc::clone(&entry.rows));
                    }
                    _ => missing.push(name),
                }
            }
        }

        if missing.is_empty() {
            return Ok(result);
        }

        debug!("cache miss for {missing:?}, fetching from store");
        let fetched = self.store.get_maps(&missing).await?;

        let mut entries = self.entries.write().await;
        for (name, rows) in fetched {
            let entry = CacheEntry::new(rows, self.ttl_for(&name));
            result.insert(name.clone(), Arc::clone(&entry.rows));
            entries.insert(name, entry);
        }

        Ok(result)
    }

    /// Replace a cached table's rows, mirroring a change already applied to
    /// the remote store (foreign-key conversions use this so the cache never
    /// serves the stale pre-conversion view).
    pub async fn set_rows(&self, name: &str, rows: Vec<Row>) {
        let entry = CacheEntry::new(rows, self.ttl_for(name));
        self.entries.write().await.insert(name.to_owned(), entry);
    }

    /// Drop one cached map
    pub async fn invalidate(&self, name: &str) {
        if self.entries.write().await.remove(name).is_some() {
            debug!("invalidated cached map {name}");
        }
    }

    /// Drop every cached map
    pub async fn invalidate_all(&self) {
        let mut entries = self.entries.write().await;
        let dropped = entries.len();
        entries.clear();
        debug!("invalidated {dropped} cached maps");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        value.as_object().cloned().unwrap_or_default()
    }

    async fn seeded_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store
            .seed(maps::CATEGORY, vec![row(json!({"CategoryID": 1, "Name": "Cookie"}))])
            .await;
        store
    }

    #[tokio::test]
    async fn serves_cached_rows_until_invalidated() {
        let store = seeded_store().await;
        let cache = BuildCache::new(Arc::clone(&store) as Arc<dyn TableStore>);

        let first = cache.get_maps(&[maps::CATEGORY]).await.unwrap();
        assert_eq!(first[maps::CATEGORY].len(), 1);

        // Mutate the store underneath; the cache still serves the snapshot
        store.seed(maps::CATEGORY, Vec::new()).await;
        let second = cache.get_maps(&[maps::CATEGORY]).await.unwrap();
        assert_eq!(second[maps::CATEGORY].len(), 1);

        cache.invalidate(maps::CATEGORY).await;
        let third = cache.get_maps(&[maps::CATEGORY]).await.unwrap();
        assert_eq!(third[maps::CATEGORY].len(), 0);
    }

    #[tokio::test]
    async fn expired_entries_are_refetched() {
        let store = seeded_store().await;
        let cache = BuildCache::with_ttls(
            Arc::clone(&store) as Arc<dyn TableStore>,
            Duration::from_millis(0),
            Duration::from_millis(0),
        );

        let _ = cache.get_maps(&[maps::CATEGORY]).await.unwrap();
        store.seed(maps::CATEGORY, Vec::new()).await;

        let refreshed = cache.get_maps(&[maps::CATEGORY]).await.unwrap();
        assert_eq!(refreshed[maps::CATEGORY].len(), 0);
    }
}
