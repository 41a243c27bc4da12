//! Name-based route queries over the current graph.

use std::sync::Arc;

use tracing::debug;

use crate::cache::{RouteCache, RouteCacheConfig};
use crate::domain::{CostModel, Station, StationId};
use crate::graph::MetroGraph;
use crate::planner::{PathConfig, PathEngine, QueryError};
use crate::present::{FareTable, Path, RouteOutcome, SUGGESTION_LIMIT};
use crate::store::{GraphStore, Snapshot};

/// Answers route queries against whatever graph the store currently holds.
///
/// Cheap to clone; clones share the store and cache.
#[derive(Clone)]
pub struct MetroRouter {
    store: GraphStore,
    config: Arc<PathConfig>,
    fares: Arc<FareTable>,
    cache: RouteCache,
}

impl MetroRouter {
    pub fn new(
        store: GraphStore,
        config: PathConfig,
        fares: FareTable,
        cache_config: &RouteCacheConfig,
    ) -> Self {
        Self {
            store,
            config: Arc::new(config),
            fares: Arc::new(fares),
            cache: RouteCache::new(cache_config),
        }
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn config(&self) -> &PathConfig {
        &self.config
    }

    /// Route between two stations given by name or synonym.
    pub async fn route(&self, from: &str, to: &str, model: CostModel) -> RouteOutcome {
        let snapshot = match self.store.current().await {
            Ok(snapshot) => snapshot,
            Err(e) => return RouteOutcome::from_error(None, e),
        };
        let graph = &snapshot.graph;

        let source = match station_or_suggest(graph, from) {
            Ok(id) => id,
            Err(outcome) => return outcome,
        };
        let target = match station_or_suggest(graph, to) {
            Ok(id) => id,
            Err(outcome) => return outcome,
        };

        self.route_in(&snapshot, source, target, model).await
    }

    /// Route between two stations given by id.
    pub async fn route_by_id(
        &self,
        source: StationId,
        target: StationId,
        model: CostModel,
    ) -> RouteOutcome {
        match self.store.current().await {
            Ok(snapshot) => self.route_in(&snapshot, source, target, model).await,
            Err(e) => RouteOutcome::from_error(None, e),
        }
    }

    async fn route_in(
        &self,
        snapshot: &Snapshot,
        source: StationId,
        target: StationId,
        model: CostModel,
    ) -> RouteOutcome {
        let generation = snapshot.generation;
        if let Some(path) = self.cache.get(generation, source, target, model).await {
            debug!(%source, %target, %model, "Route cache hit");
            return RouteOutcome::from_path(Path::clone(&path));
        }

        let graph = &snapshot.graph;
        let result = PathEngine::new(graph, &self.config).find_path(source, target, model);
        let outcome = RouteOutcome::from_result(graph, result, &self.fares);

        if let Some(path) = outcome.path() {
            self.cache
                .insert(generation, source, target, model, Arc::new(path.clone()))
                .await;
        }
        outcome
    }

    /// All station names, sorted.
    pub async fn station_names(&self) -> Result<Vec<String>, QueryError> {
        let snapshot = self.store.current().await?;
        Ok(snapshot.graph.station_names().to_vec())
    }

    /// Resolve a station name or synonym.
    pub async fn resolve(&self, name: &str) -> Result<Station, QueryError> {
        let snapshot = self.store.current().await?;
        snapshot
            .graph
            .find_station_by_name(name)
            .cloned()
            .ok_or_else(|| QueryError::UnknownStation(name.trim().to_string()))
    }
}

fn station_or_suggest(graph: &MetroGraph, name: &str) -> Result<StationId, RouteOutcome> {
    match graph.find_station_by_name(name) {
        Some(station) => Ok(station.id),
        None => {
            let name = name.trim().to_string();
            let suggestions = graph.suggest(&name, SUGGESTION_LIMIT);
            Err(RouteOutcome::UnknownStation { name, suggestions })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GeoPoint, Line, LineId};
    use crate::graph::GraphBuilder;

    fn graph(blue_name: &str) -> MetroGraph {
        let mut builder = GraphBuilder::default();
        for (id, name) in [(1, "Rajiv Chowk"), (2, "Mandi House"), (3, "Pragati Maidan"), (4, "Island")] {
            builder.add_station(Station::new(
                StationId::new(id),
                "",
                name,
                GeoPoint::new(28.62, 77.21 + f64::from(id) * 0.01),
            ));
        }
        builder.add_line(Line::new(LineId::new(1), "BLUE_Dwarka to Noida", ""));
        builder.add_line(Line::new(LineId::new(2), blue_name, ""));
        builder
            .add_segment(StationId::new(1), StationId::new(2), LineId::new(1), 1800)
            .unwrap();
        builder
            .add_segment(StationId::new(2), StationId::new(3), LineId::new(2), 1100)
            .unwrap();
        builder.add_synonym("CP", "Rajiv Chowk");
        builder.build().unwrap()
    }

    async fn router() -> MetroRouter {
        let store = GraphStore::new();
        store.publish(graph("VIOLET_Kashmere Gate")).await;
        MetroRouter::new(
            store,
            PathConfig::default(),
            FareTable::delhi(),
            &RouteCacheConfig::default(),
        )
    }

    #[tokio::test]
    async fn not_ready_before_publish() {
        let router = MetroRouter::new(
            GraphStore::new(),
            PathConfig::default(),
            FareTable::delhi(),
            &RouteCacheConfig::default(),
        );
        assert_eq!(
            router.route("A", "B", CostModel::Distance).await,
            RouteOutcome::NotReady
        );
        assert_eq!(router.station_names().await, Err(QueryError::NotInitialized));
    }

    #[tokio::test]
    async fn routes_by_name_and_synonym() {
        let router = router().await;
        let outcome = router.route("cp", "Pragati Maidan", CostModel::Time).await;

        let path = outcome.path().unwrap();
        assert_eq!(path.stations, vec!["Rajiv Chowk", "Mandi House", "Pragati Maidan"]);
        assert_eq!(path.interchanges, vec!["Mandi House"]);
        assert_eq!(path.fare, 20);
    }

    #[tokio::test]
    async fn unknown_station_suggests() {
        let router = router().await;
        let outcome = router.route("Mandi Hose", "Island", CostModel::Distance).await;

        match outcome {
            RouteOutcome::UnknownStation { name, suggestions } => {
                assert_eq!(name, "Mandi Hose");
                assert_eq!(suggestions.first().map(String::as_str), Some("Mandi House"));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_destination_reported() {
        let router = router().await;
        let outcome = router.route("Rajiv Chowk", "Atlantis", CostModel::Distance).await;
        assert!(matches!(
            outcome,
            RouteOutcome::UnknownStation { ref name, .. } if name == "Atlantis"
        ));
    }

    #[tokio::test]
    async fn no_route() {
        let router = router().await;
        let outcome = router.route("Rajiv Chowk", "Island", CostModel::Distance).await;
        assert!(matches!(outcome, RouteOutcome::NoRoute { .. }));
    }

    #[tokio::test]
    async fn cached_route_is_reused() {
        let router = router().await;
        let first = router
            .route_by_id(StationId::new(1), StationId::new(3), CostModel::Distance)
            .await;
        let second = router
            .route_by_id(StationId::new(1), StationId::new(3), CostModel::Distance)
            .await;
        assert_eq!(first, second);
        router.cache.run_pending_tasks().await;
        assert_eq!(router.cache.entry_count(), 1);
    }

    #[tokio::test]
    async fn reload_is_visible() {
        let router = router().await;
        let before = router.route("Rajiv Chowk", "Pragati Maidan", CostModel::Distance).await;
        assert_eq!(before.path().unwrap().interchange_count, 1);

        // same physical line after the reload, so no interchange
        router.store().publish(graph("BLUE_Dwarka to Vaishali")).await;
        let after = router.route("Rajiv Chowk", "Pragati Maidan", CostModel::Distance).await;
        assert_eq!(after.path().unwrap().interchange_count, 0);
    }

    #[tokio::test]
    async fn resolve_and_names() {
        let router = router().await;
        assert_eq!(router.resolve("CP").await.unwrap().name, "Rajiv Chowk");
        assert_eq!(
            router.resolve("nowhere").await,
            Err(QueryError::UnknownStation("nowhere".into()))
        );
        assert_eq!(
            router.station_names().await.unwrap(),
            vec!["Island", "Mandi House", "Pragati Maidan", "Rajiv Chowk"]
        );
    }
}
