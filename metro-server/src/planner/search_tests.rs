//! Unit tests for the path engine.

use super::*;
use crate::domain::{GeoPoint, Line, LineId, Station};
use crate::graph::GraphBuilder;
use proptest::prelude::*;
use std::sync::Arc;

fn sid(id: u32) -> StationId {
    StationId::new(id)
}

fn lid(id: u32) -> LineId {
    LineId::new(id)
}

/// Builds small graphs with explicit segment lengths.
struct Network {
    builder: GraphBuilder,
}

impl Network {
    fn new(stations: &[(u32, &str)]) -> Self {
        let mut builder = GraphBuilder::default();
        for (i, (id, name)) in stations.iter().enumerate() {
            let location = GeoPoint::new(0.0, i as f64 * 0.01);
            builder.add_station(Station::new(sid(*id), "", *name, location));
        }
        Self { builder }
    }

    fn line(mut self, id: u32, name: &str) -> Self {
        self.builder.add_line(Line::new(lid(id), name, ""));
        self
    }

    fn segment(mut self, from: u32, to: u32, line: u32, meters: u32) -> Self {
        self.builder
            .add_segment(sid(from), sid(to), lid(line), meters)
            .unwrap();
        self
    }

    fn build(self) -> MetroGraph {
        self.builder.build().unwrap()
    }
}

fn names(graph: &MetroGraph, path: &RawPath) -> Vec<String> {
    path.stations()
        .map(|pos| graph.station_at(pos).name.clone())
        .collect()
}

/// A, B, C on Red at 1 km spacing.
fn red_line() -> MetroGraph {
    Network::new(&[(1, "A"), (2, "B"), (3, "C")])
        .line(1, "Red")
        .segment(1, 2, 1, 1000)
        .segment(2, 3, 1, 1000)
        .build()
}

/// A-B on Red, B-C on Blue.
fn red_blue() -> MetroGraph {
    Network::new(&[(1, "A"), (2, "B"), (3, "C")])
        .line(1, "Red")
        .line(2, "Blue")
        .segment(1, 2, 1, 1000)
        .segment(2, 3, 2, 1000)
        .build()
}

#[test]
fn single_line_path() {
    let graph = red_line();
    let config = PathConfig::default();
    let engine = PathEngine::new(&graph, &config);

    let path = engine.find_path(sid(1), sid(3), CostModel::Distance).unwrap();

    assert_eq!(names(&graph, &path), vec!["A", "B", "C"]);
    assert_eq!(path.cost, 2000);
    assert_eq!(path.total_meters(), 2000);
    assert_eq!(path.interchanges, 0);
    assert!(path.hops.iter().all(|hop| hop.line == 0));
}

#[test]
fn interchange_path() {
    let graph = red_blue();
    let config = PathConfig::default();
    let engine = PathEngine::new(&graph, &config);

    let path = engine.find_path(sid(1), sid(3), CostModel::Distance).unwrap();

    assert_eq!(names(&graph, &path), vec!["A", "B", "C"]);
    assert_eq!(path.interchanges, 1);
    // distance model carries no penalty
    assert_eq!(path.cost, 2000);
}

#[test]
fn time_model_adds_penalty() {
    let graph = red_blue();
    let config = PathConfig::new(300);
    let engine = PathEngine::new(&graph, &config);

    let path = engine.find_path(sid(1), sid(3), CostModel::Time).unwrap();
    let travel: u64 = path.hops.iter().map(|hop| u64::from(hop.secs)).sum();

    assert_eq!(path.cost, travel + 300);
    assert_eq!(path.total_secs(), travel + 300);
}

#[test]
fn same_station() {
    let graph = red_line();
    let config = PathConfig::default();
    let engine = PathEngine::new(&graph, &config);

    for model in [CostModel::Distance, CostModel::Time] {
        let path = engine.find_path(sid(2), sid(2), model).unwrap();
        assert!(path.is_same_station());
        assert_eq!(path.cost, 0);
        assert_eq!(path.interchanges, 0);
        assert_eq!(path.total_secs(), 0);
        assert_eq!(names(&graph, &path), vec!["B"]);
    }
}

#[test]
fn unknown_station_id() {
    let graph = red_line();
    let config = PathConfig::default();
    let engine = PathEngine::new(&graph, &config);

    assert_eq!(
        engine.find_path(sid(1), sid(42), CostModel::Distance),
        Err(QueryError::UnknownStation("42".to_string()))
    );
    assert_eq!(
        engine.find_path(sid(42), sid(1), CostModel::Time),
        Err(QueryError::UnknownStation("42".to_string()))
    );
}

#[test]
fn unknown_station_name() {
    let graph = red_line();
    let config = PathConfig::default();
    let engine = PathEngine::new(&graph, &config);

    assert_eq!(
        engine.find_path_by_names("A", " Nowhere ", CostModel::Distance),
        Err(QueryError::UnknownStation("Nowhere".to_string()))
    );
}

#[test]
fn lookup_by_name_is_case_insensitive() {
    let graph = red_line();
    let config = PathConfig::default();
    let engine = PathEngine::new(&graph, &config);

    let path = engine
        .find_path_by_names("a", "c", CostModel::Distance)
        .unwrap();
    assert_eq!(names(&graph, &path), vec!["A", "B", "C"]);
}

#[test]
fn disconnected_components_unreachable() {
    let graph = Network::new(&[(1, "A"), (2, "B"), (3, "C"), (4, "D")])
        .line(1, "Red")
        .line(2, "Blue")
        .segment(1, 2, 1, 1000)
        .segment(3, 4, 2, 1000)
        .build();
    let config = PathConfig::default();
    let engine = PathEngine::new(&graph, &config);

    assert_eq!(
        engine.find_path(sid(1), sid(4), CostModel::Distance),
        Err(QueryError::Unreachable {
            from: "A".to_string(),
            to: "D".to_string()
        })
    );
}

#[test]
fn isolated_station_unreachable() {
    let graph = Network::new(&[(1, "A"), (2, "B"), (3, "Island")])
        .line(1, "Red")
        .segment(1, 2, 1, 1000)
        .build();
    let config = PathConfig::default();
    let engine = PathEngine::new(&graph, &config);

    assert!(matches!(
        engine.find_path(sid(3), sid(1), CostModel::Time),
        Err(QueryError::Unreachable { .. })
    ));
}

#[test]
fn shorter_route_wins() {
    // A-B-D is 2 km, A-C-D is 3 km
    let graph = Network::new(&[(1, "A"), (2, "B"), (3, "C"), (4, "D")])
        .line(1, "Red")
        .segment(1, 2, 1, 1000)
        .segment(2, 4, 1, 1000)
        .segment(1, 3, 1, 1500)
        .segment(3, 4, 1, 1500)
        .build();
    let config = PathConfig::default();
    let engine = PathEngine::new(&graph, &config);

    let path = engine.find_path(sid(1), sid(4), CostModel::Distance).unwrap();
    assert_eq!(names(&graph, &path), vec!["A", "B", "D"]);
}

#[test]
fn equal_cost_prefers_fewer_interchanges() {
    // A-B-C entirely on Red, or A-X-C switching Blue to Green, both 2 km
    let graph = Network::new(&[(1, "A"), (2, "X"), (3, "C"), (4, "B")])
        .line(1, "Blue")
        .line(2, "Green")
        .line(3, "Red")
        .segment(1, 2, 1, 1000)
        .segment(2, 3, 2, 1000)
        .segment(1, 4, 3, 1000)
        .segment(4, 3, 3, 1000)
        .build();
    let config = PathConfig::default();
    let engine = PathEngine::new(&graph, &config);

    let path = engine.find_path(sid(1), sid(3), CostModel::Distance).unwrap();
    assert_eq!(path.cost, 2000);
    assert_eq!(path.interchanges, 0);
    assert_eq!(names(&graph, &path), vec!["A", "B", "C"]);
}

#[test]
fn branches_of_one_line_are_not_interchanges() {
    let graph = Network::new(&[(1, "A"), (2, "B"), (3, "C")])
        .line(1, "BLUE_Dwarka to Noida")
        .line(2, "BLUE_Dwarka to Vaishali")
        .segment(1, 2, 1, 1000)
        .segment(2, 3, 2, 1000)
        .build();
    let config = PathConfig::default();
    let engine = PathEngine::new(&graph, &config);

    let path = engine.find_path(sid(1), sid(3), CostModel::Time).unwrap();
    assert_eq!(path.interchanges, 0);
    assert!(!graph.is_interchange(sid(2)));
}

#[test]
fn time_model_avoids_costly_change() {
    // Red all the way A-B-C-D, or change to the Blue shortcut B-D: shorter,
    // but slower once the interchange penalty applies.
    let graph = Network::new(&[(1, "A"), (2, "B"), (3, "C"), (4, "D")])
        .line(1, "Red")
        .line(2, "Blue")
        .segment(1, 2, 1, 2000)
        .segment(2, 3, 1, 2000)
        .segment(3, 4, 1, 2000)
        .segment(2, 4, 2, 3000)
        .build();
    let config = PathConfig::default();
    let engine = PathEngine::new(&graph, &config);

    let shortest = engine.find_path(sid(1), sid(4), CostModel::Distance).unwrap();
    assert_eq!(names(&graph, &shortest), vec!["A", "B", "D"]);
    assert_eq!(shortest.interchanges, 1);

    let fastest = engine.find_path(sid(1), sid(4), CostModel::Time).unwrap();
    assert_eq!(names(&graph, &fastest), vec!["A", "B", "C", "D"]);
    assert_eq!(fastest.interchanges, 0);
}

#[test]
fn concurrent_queries_agree() {
    let graph = Arc::new(
        Network::new(&[(1, "A"), (2, "B"), (3, "C"), (4, "D"), (5, "E")])
            .line(1, "Red")
            .line(2, "Blue")
            .segment(1, 2, 1, 800)
            .segment(2, 3, 1, 900)
            .segment(3, 4, 2, 700)
            .segment(2, 5, 2, 1200)
            .segment(5, 4, 2, 600)
            .build(),
    );
    let config = PathConfig::default();
    let pairs: Vec<(u32, u32)> = (1..=5)
        .flat_map(|a| (1..=5).map(move |b| (a, b)))
        .collect();

    let engine = PathEngine::new(&graph, &config);
    let expected: Vec<_> = pairs
        .iter()
        .map(|&(a, b)| engine.find_path(sid(a), sid(b), CostModel::Time))
        .collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let graph = Arc::clone(&graph);
                let config = &config;
                let pairs = &pairs;
                scope.spawn(move || {
                    let engine = PathEngine::new(&graph, config);
                    pairs
                        .iter()
                        .map(|&(a, b)| engine.find_path(sid(a), sid(b), CostModel::Time))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

/// Cheapest simple path by exhaustive search, with the same cost rules as
/// the engine.
fn brute_force(graph: &MetroGraph, src: usize, dst: usize, model: CostModel, penalty: u32) -> Option<u64> {
    fn walk(
        graph: &MetroGraph,
        at: usize,
        dst: usize,
        key: u32,
        cost: u64,
        visited: &mut Vec<bool>,
        model: CostModel,
        penalty: u32,
        best: &mut Option<u64>,
    ) {
        if at == dst {
            *best = Some(best.map_or(cost, |b| b.min(cost)));
            return;
        }
        for edge in graph.neighbors(at) {
            if visited[edge.to] {
                continue;
            }
            let edge_key = graph.line_key_at(edge.line);
            let change = key != NO_LINE && key != edge_key;
            let step = match model {
                CostModel::Distance => u64::from(edge.meters),
                CostModel::Time => u64::from(edge.secs) + if change { u64::from(penalty) } else { 0 },
            };
            visited[edge.to] = true;
            walk(graph, edge.to, dst, edge_key, cost + step, visited, model, penalty, best);
            visited[edge.to] = false;
        }
    }

    let mut visited = vec![false; graph.station_count()];
    visited[src] = true;
    let mut best = None;
    walk(graph, src, dst, NO_LINE, 0, &mut visited, model, penalty, &mut best);
    best
}

fn arb_network() -> impl Strategy<Value = MetroGraph> {
    (3usize..7).prop_flat_map(|n| {
        prop::collection::vec((0..n, 0..n, 0u32..3, 100u32..3000), 1..12).prop_map(move |segments| {
            let stations: Vec<(u32, String)> =
                (0..n as u32).map(|i| (i + 1, format!("S{i}"))).collect();
            let refs: Vec<(u32, &str)> = stations.iter().map(|(id, s)| (*id, s.as_str())).collect();
            let mut network = Network::new(&refs)
                .line(1, "Red")
                .line(2, "Blue")
                .line(3, "Green");
            for (a, b, line, meters) in segments {
                if a != b {
                    network = network.segment(a as u32 + 1, b as u32 + 1, line + 1, meters);
                }
            }
            network.build()
        })
    })
}

proptest! {
    /// Engine cost matches exhaustive search, and missing paths agree
    #[test]
    fn optimal_against_brute_force(graph in arb_network(), a in 0usize..7, b in 0usize..7) {
        let n = graph.station_count();
        let (src, dst) = (a % n, b % n);
        let config = PathConfig::default();
        let engine = PathEngine::new(&graph, &config);
        let source = graph.station_at(src).id;
        let target = graph.station_at(dst).id;

        for model in [CostModel::Distance, CostModel::Time] {
            let expected = if src == dst {
                Some(0)
            } else {
                brute_force(&graph, src, dst, model, config.interchange_penalty_secs)
            };
            let actual = engine.find_path(source, target, model).ok().map(|p| p.cost);
            prop_assert_eq!(actual, expected);
        }
    }

    /// Distance is symmetric on an undirected network
    #[test]
    fn distance_symmetric(graph in arb_network(), a in 0usize..7, b in 0usize..7) {
        let n = graph.station_count();
        let source = graph.station_at(a % n).id;
        let target = graph.station_at(b % n).id;
        let config = PathConfig::default();
        let engine = PathEngine::new(&graph, &config);

        let there = engine.find_path(source, target, CostModel::Distance).ok().map(|p| p.cost);
        let back = engine.find_path(target, source, CostModel::Distance).ok().map(|p| p.cost);
        prop_assert_eq!(there, back);
    }

    /// Reconstructed hops are contiguous and sum to the reported cost
    #[test]
    fn hops_are_consistent(graph in arb_network(), a in 0usize..7, b in 0usize..7) {
        let n = graph.station_count();
        let source = graph.station_at(a % n).id;
        let target = graph.station_at(b % n).id;
        let config = PathConfig::default();
        let engine = PathEngine::new(&graph, &config);

        if let Ok(path) = engine.find_path(source, target, CostModel::Distance) {
            let mut at = path.source;
            for hop in &path.hops {
                prop_assert_eq!(hop.from, at);
                at = hop.to;
            }
            prop_assert_eq!(at, b % n);
            prop_assert_eq!(path.total_meters(), path.cost);
        }
    }
}
