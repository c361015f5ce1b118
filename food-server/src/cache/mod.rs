//! Response cache
//!
//! In-process, namespaced, TTL-bound read-through cache for list, detail
//! and search endpoints. Keys look like `food-cache:{namespace}:{key}`.
//! Values are stored as JSON so any serializable response can be cached.
//!
//! Writes invalidate whole namespaces; the cache is never consulted for
//! correctness decisions, and a disabled cache simply calls the loader.

use dashmap::DashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::utils::AppResult;

const KEY_PREFIX: &str = "food-cache";

/// Cache namespaces
pub mod ns {
    pub const RESTAURANTS: &str = "restaurants";
    pub const MENU_ITEMS: &str = "menu_items";
    pub const CUSTOMERS: &str = "customers";
    pub const ORDERS: &str = "orders";
    pub const REVIEWS: &str = "reviews";

    pub const ALL: [&str; 5] = [RESTAURANTS, MENU_ITEMS, CUSTOMERS, ORDERS, REVIEWS];
}

/// TTL per cached view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheTtl {
    RestaurantsList,
    RestaurantDetail,
    RestaurantSearch,
    ActiveRestaurants,
    RestaurantMenu,
    TrendingRestaurants,
}

impl CacheTtl {
    pub const ALL: [CacheTtl; 6] = [
        CacheTtl::RestaurantsList,
        CacheTtl::RestaurantDetail,
        CacheTtl::RestaurantSearch,
        CacheTtl::ActiveRestaurants,
        CacheTtl::RestaurantMenu,
        CacheTtl::TrendingRestaurants,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CacheTtl::RestaurantsList => "restaurants_list",
            CacheTtl::RestaurantDetail => "restaurant_detail",
            CacheTtl::RestaurantSearch => "restaurant_search",
            CacheTtl::ActiveRestaurants => "active_restaurants",
            CacheTtl::RestaurantMenu => "restaurant_menu",
            CacheTtl::TrendingRestaurants => "trending_restaurants",
        }
    }

    pub fn seconds(&self) -> u64 {
        match self {
            CacheTtl::RestaurantsList => 300,
            CacheTtl::RestaurantDetail => 600,
            CacheTtl::RestaurantSearch => 180,
            CacheTtl::ActiveRestaurants => 240,
            CacheTtl::RestaurantMenu => 360,
            CacheTtl::TrendingRestaurants => 120,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.seconds())
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: serde_json::Value,
    expires_at: Instant,
}

/// Cache statistics snapshot
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub enabled: bool,
    pub total_keys: usize,
    pub keys_by_namespace: BTreeMap<String, usize>,
    pub hits: u64,
    pub misses: u64,
    pub namespaces: Vec<&'static str>,
    pub ttl_settings: BTreeMap<&'static str, u64>,
}

/// Namespaced TTL cache shared by all handlers
#[derive(Debug, Clone)]
pub struct ResponseCache {
    enabled: bool,
    entries: Arc<DashMap<String, CacheEntry>>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl ResponseCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: Arc::new(DashMap::new()),
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_namespace(name: &str) -> bool {
        ns::ALL.contains(&name)
    }

    fn full_key(namespace: &str, key: &str) -> String {
        format!("{KEY_PREFIX}:{namespace}:{key}")
    }

    fn namespace_prefix(namespace: &str) -> String {
        format!("{KEY_PREFIX}:{namespace}:")
    }

    /// Cached value, if present, fresh and of the expected shape
    pub fn get<T: DeserializeOwned>(&self, namespace: &str, key: &str) -> Option<T> {
        if !self.enabled {
            return None;
        }
        let full_key = Self::full_key(namespace, key);
        let value = {
            let entry = self.entries.get(&full_key)?;
            if entry.expires_at <= Instant::now() {
                None
            } else {
                Some(entry.value.clone())
            }
        };
        match value.map(serde_json::from_value::<T>) {
            Some(Ok(v)) => Some(v),
            Some(Err(e)) => {
                tracing::warn!(key = %full_key, error = %e, "Dropping undecodable cache entry");
                self.entries.remove(&full_key);
                None
            }
            None => {
                self.entries
                    .remove_if(&full_key, |_, e| e.expires_at <= Instant::now());
                None
            }
        }
    }

    /// Store a value for `ttl`; returns false when disabled or unserializable
    pub fn set<T: Serialize>(&self, namespace: &str, key: &str, value: &T, ttl: Duration) -> bool {
        if !self.enabled {
            return false;
        }
        let full_key = Self::full_key(namespace, key);
        match serde_json::to_value(value) {
            Ok(value) => {
                self.entries.insert(
                    full_key,
                    CacheEntry {
                        value,
                        expires_at: Instant::now() + ttl,
                    },
                );
                true
            }
            Err(e) => {
                tracing::warn!(key = %full_key, error = %e, "Failed to serialize cache value");
                false
            }
        }
    }

    /// Read-through: serve from cache or run `loader` and store its result
    ///
    /// Loader errors are returned as-is and never cached.
    pub async fn get_or_load<T, F, Fut>(
        &self,
        namespace: &str,
        key: &str,
        ttl: CacheTtl,
        loader: F,
    ) -> AppResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        if !self.enabled {
            return loader().await;
        }
        if let Some(value) = self.get::<T>(namespace, key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(namespace, key, "Cache hit");
            return Ok(value);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(namespace, key, "Cache miss");

        let value = loader().await?;
        self.set(namespace, key, &value, ttl.duration());
        Ok(value)
    }

    /// Remove every key of a namespace, returning how many were removed
    pub fn clear_namespace(&self, namespace: &str) -> usize {
        let prefix = Self::namespace_prefix(namespace);
        let before = self.entries.len();
        self.entries.retain(|k, _| !k.starts_with(&prefix));
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            tracing::debug!(namespace, removed, "Cleared cache namespace");
        }
        removed
    }

    /// Remove every key, returning how many were removed
    pub fn clear_all(&self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        tracing::info!(removed, "Cleared entire cache");
        removed
    }

    /// Invalidate the namespaces affected by a write
    pub fn invalidate(&self, namespaces: &[&str]) {
        if !self.enabled {
            return;
        }
        for namespace in namespaces {
            self.clear_namespace(namespace);
        }
    }

    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        self.entries.retain(|_, e| e.expires_at > now);

        let mut keys_by_namespace: BTreeMap<String, usize> = BTreeMap::new();
        for entry in self.entries.iter() {
            if let Some(namespace) = entry
                .key()
                .strip_prefix(KEY_PREFIX)
                .and_then(|rest| rest.strip_prefix(':'))
                .and_then(|rest| rest.split(':').next())
            {
                *keys_by_namespace.entry(namespace.to_string()).or_default() += 1;
            }
        }

        CacheStats {
            enabled: self.enabled,
            total_keys: self.entries.len(),
            keys_by_namespace,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            namespaces: ns::ALL.to_vec(),
            ttl_settings: CacheTtl::ALL
                .into_iter()
                .map(|t| (t.name(), t.seconds()))
                .collect(),
        }
    }
}
