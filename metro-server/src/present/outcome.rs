//! Typed query outcomes with user-facing messages.

use crate::graph::MetroGraph;
use crate::planner::{QueryError, RawPath};

use super::fare::FareTable;
use super::route::{Path, present};

/// Number of "did you mean" names offered for an unknown station.
pub const SUGGESTION_LIMIT: usize = 5;

/// Everything a route query can end in.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    /// A route with at least two stations.
    Found(Path),

    /// Source and destination are the same station.
    SameStation(Path),

    /// Both stations exist but aren't connected.
    NoRoute { from: String, to: String },

    /// A station name or id didn't resolve.
    UnknownStation {
        name: String,
        suggestions: Vec<String>,
    },

    /// The network hasn't finished loading.
    NotReady,

    /// The network failed to load and won't be served until a reload
    /// succeeds.
    LoadFailed { reason: String },
}

impl RouteOutcome {
    /// Present an engine result against the graph it ran on.
    pub fn from_result(
        graph: &MetroGraph,
        result: Result<RawPath, QueryError>,
        fares: &FareTable,
    ) -> Self {
        match result {
            Ok(raw) => Self::from_path(present(graph, &raw, fares)),
            Err(err) => Self::from_error(Some(graph), err),
        }
    }

    /// Wrap an already presented route.
    pub fn from_path(path: Path) -> Self {
        if path.is_valid() {
            RouteOutcome::Found(path)
        } else {
            RouteOutcome::SameStation(path)
        }
    }

    /// Outcome for a failed query. Suggestions need a graph.
    pub fn from_error(graph: Option<&MetroGraph>, err: QueryError) -> Self {
        match err {
            QueryError::UnknownStation(name) => {
                let suggestions = graph
                    .map(|g| g.suggest(&name, SUGGESTION_LIMIT))
                    .unwrap_or_default();
                RouteOutcome::UnknownStation { name, suggestions }
            }
            QueryError::Unreachable { from, to } => RouteOutcome::NoRoute { from, to },
            QueryError::NotInitialized => RouteOutcome::NotReady,
            QueryError::LoadFailed(reason) => RouteOutcome::LoadFailed { reason },
        }
    }

    /// The route, if there is one to show.
    pub fn path(&self) -> Option<&Path> {
        match self {
            RouteOutcome::Found(path) | RouteOutcome::SameStation(path) => Some(path),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, RouteOutcome::Found(_))
    }

    /// Short message suitable for display.
    pub fn message(&self) -> String {
        match self {
            RouteOutcome::Found(path) => format!(
                "{} stations, {} interchange{}",
                path.stations.len(),
                path.interchange_count,
                if path.interchange_count == 1 { "" } else { "s" }
            ),
            RouteOutcome::SameStation(_) => {
                "Source and destination are the same station".to_string()
            }
            RouteOutcome::NoRoute { .. } => "No route available".to_string(),
            RouteOutcome::UnknownStation { suggestions, .. } if !suggestions.is_empty() => {
                format!("Station not found. Did you mean {}?", suggestions.join(", "))
            }
            RouteOutcome::UnknownStation { .. } => "Station not found".to_string(),
            RouteOutcome::NotReady => "Metro network is still loading".to_string(),
            RouteOutcome::LoadFailed { reason } => {
                format!("Metro network failed to load: {reason}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CostModel, GeoPoint, Line, LineId, Station, StationId};
    use crate::graph::GraphBuilder;
    use crate::planner::{PathConfig, PathEngine};

    fn graph() -> MetroGraph {
        let mut builder = GraphBuilder::default();
        for (id, name) in [(1, "Rajiv Chowk"), (2, "Patel Chowk"), (3, "Dwarka")] {
            builder.add_station(Station::new(
                StationId::new(id),
                "",
                name,
                GeoPoint::new(28.6, 77.2 + f64::from(id) * 0.01),
            ));
        }
        builder.add_line(Line::new(LineId::new(1), "Yellow", ""));
        builder
            .add_segment(StationId::new(1), StationId::new(2), LineId::new(1), 1200)
            .unwrap();
        builder.build().unwrap()
    }

    fn outcome(g: &MetroGraph, from: &str, to: &str) -> RouteOutcome {
        let config = PathConfig::default();
        let result = PathEngine::new(g, &config).find_path_by_names(from, to, CostModel::Distance);
        RouteOutcome::from_result(g, result, &FareTable::delhi())
    }

    #[test]
    fn found() {
        let g = graph();
        let outcome = outcome(&g, "Rajiv Chowk", "Patel Chowk");
        assert!(outcome.is_found());
        assert_eq!(outcome.message(), "2 stations, 0 interchanges");
    }

    #[test]
    fn same_station() {
        let g = graph();
        let outcome = outcome(&g, "Rajiv Chowk", "rajiv chowk");
        assert!(matches!(outcome, RouteOutcome::SameStation(_)));
        assert!(outcome.path().is_some());
        assert!(!outcome.is_found());
    }

    #[test]
    fn no_route() {
        let g = graph();
        let outcome = outcome(&g, "Rajiv Chowk", "Dwarka");
        assert_eq!(
            outcome,
            RouteOutcome::NoRoute {
                from: "Rajiv Chowk".into(),
                to: "Dwarka".into()
            }
        );
        assert_eq!(outcome.message(), "No route available");
        assert!(outcome.path().is_none());
    }

    #[test]
    fn unknown_with_suggestions() {
        let g = graph();
        let outcome = outcome(&g, "Rajiv Chowck", "Dwarka");
        match &outcome {
            RouteOutcome::UnknownStation { name, suggestions } => {
                assert_eq!(name, "Rajiv Chowck");
                assert_eq!(suggestions.first().map(String::as_str), Some("Rajiv Chowk"));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(outcome.message().starts_with("Station not found"));
    }

    #[test]
    fn not_ready() {
        let outcome = RouteOutcome::from_error(None, QueryError::NotInitialized);
        assert_eq!(outcome, RouteOutcome::NotReady);
        assert_eq!(outcome.message(), "Metro network is still loading");
    }

    #[test]
    fn load_failure_is_not_loading() {
        let outcome = RouteOutcome::from_error(
            None,
            QueryError::LoadFailed("feed contains no usable stations".into()),
        );
        assert_ne!(outcome, RouteOutcome::NotReady);
        assert_eq!(
            outcome.message(),
            "Metro network failed to load: feed contains no usable stations"
        );
        assert!(outcome.path().is_none());
    }

    #[test]
    fn unknown_without_graph_has_no_suggestions() {
        let outcome = RouteOutcome::from_error(None, QueryError::UnknownStation("X".into()));
        assert_eq!(outcome.message(), "Station not found");
    }
}
