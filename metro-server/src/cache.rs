//! In-memory cache of presented routes.
//!
//! Keys include the graph generation, so publishing a new graph makes every
//! older entry unreachable without an explicit flush; they age out by TTL
//! and capacity.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{CostModel, StationId};
use crate::present::Path;

/// Cache key: (graph generation, source, target, cost model).
type RouteKey = (u64, StationId, StationId, CostModel);

/// Configuration for the route cache.
#[derive(Debug, Clone)]
pub struct RouteCacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for RouteCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(10 * 60),
            max_capacity: 10_000,
        }
    }
}

/// Cache of routes, shared between requests.
#[derive(Clone)]
pub struct RouteCache {
    routes: MokaCache<RouteKey, Arc<Path>>,
}

impl RouteCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &RouteCacheConfig) -> Self {
        let routes = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { routes }
    }

    pub async fn get(
        &self,
        generation: u64,
        from: StationId,
        to: StationId,
        model: CostModel,
    ) -> Option<Arc<Path>> {
        self.routes.get(&(generation, from, to, model)).await
    }

    pub async fn insert(
        &self,
        generation: u64,
        from: StationId,
        to: StationId,
        model: CostModel,
        path: Arc<Path>,
    ) {
        self.routes.insert((generation, from, to, model), path).await;
    }

    /// Approximate number of entries (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.routes.entry_count()
    }

    /// Flush pending maintenance so `entry_count` is exact.
    pub async fn run_pending_tasks(&self) {
        self.routes.run_pending_tasks().await;
    }
}
