//! User-facing route assembly.

use serde::Serialize;

use crate::domain::CostModel;
use crate::graph::MetroGraph;
use crate::planner::RawPath;

use super::fare::FareTable;

/// A presented route.
///
/// `stations` and `lines` always have the same length: `lines[0]` is the
/// line boarded at the first station and `lines[i]` the line used to arrive
/// at `stations[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Path {
    pub stations: Vec<String>,
    pub lines: Vec<String>,

    /// Stations where the rider changes physical line, in travel order.
    pub interchanges: Vec<String>,

    pub total_distance_km: f64,

    /// Travel time including interchange penalties, whichever model was
    /// minimised.
    pub total_time_minutes: f64,

    pub interchange_count: u32,

    /// Estimated fare. Zero for a single-station path.
    pub fare: u32,

    pub cost_model: CostModel,
}

impl Path {
    /// A path is displayable when it actually goes somewhere.
    pub fn is_valid(&self) -> bool {
        self.stations.len() >= 2
    }
}

/// Turn engine output into a [`Path`].
pub fn present(graph: &MetroGraph, raw: &RawPath, fares: &FareTable) -> Path {
    let stations: Vec<String> = raw
        .stations()
        .map(|pos| graph.station_at(pos).name.clone())
        .collect();

    let lines: Vec<String> = match raw.hops.first() {
        None => {
            let source = graph.station_at(raw.source);
            let name = graph
                .lines_for_station(source.id)
                .first()
                .and_then(|&id| graph.line(id))
                .map(|line| line.name.clone())
                .unwrap_or_default();
            vec![name]
        }
        Some(first) => std::iter::once(first)
            .chain(raw.hops.iter())
            .map(|hop| graph.line_at(hop.line).name.clone())
            .collect(),
    };

    let interchanges: Vec<String> = raw
        .hops
        .windows(2)
        .filter(|pair| graph.line_at(pair[0].line).key != graph.line_at(pair[1].line).key)
        .map(|pair| graph.station_at(pair[1].from).name.clone())
        .collect();
    let interchange_count = interchanges.len() as u32;

    let meters: u64 = raw.hops.iter().map(|hop| u64::from(hop.meters)).sum();
    let secs: u64 = raw.hops.iter().map(|hop| u64::from(hop.secs)).sum::<u64>()
        + u64::from(interchange_count) * u64::from(raw.interchange_penalty_secs);

    let total_distance_km = meters as f64 / 1000.0;
    let fare = if raw.is_same_station() {
        0
    } else {
        fares.fare_for_km(total_distance_km)
    };

    Path {
        stations,
        lines,
        interchanges,
        total_distance_km,
        total_time_minutes: secs as f64 / 60.0,
        interchange_count,
        fare,
        cost_model: raw.model,
    }
}
