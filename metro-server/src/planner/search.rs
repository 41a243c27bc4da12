//! Dijkstra path search over (station, line) states.
//!
//! A state is a station together with the physical line the rider is on, so
//! the search can charge for changing lines and break cost ties in favour of
//! fewer interchanges.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use tracing::{debug, trace};

use crate::domain::{CostModel, StationId};
use crate::graph::MetroGraph;

use super::config::PathConfig;

/// Error from a path query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// The station id or name doesn't exist in the network
    #[error("station not found: {0}")]
    UnknownStation(String),

    /// Both stations exist but no sequence of hops connects them
    #[error("no route from {from} to {to}")]
    Unreachable { from: String, to: String },

    /// No network has been loaded yet
    #[error("network not initialized")]
    NotInitialized,

    /// The first load failed fatally; no network will be served until a
    /// later load succeeds
    #[error("network failed to load: {0}")]
    LoadFailed(String),
}

/// One traversed edge of a path, in dense graph positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hop {
    pub from: usize,
    pub to: usize,
    pub line: usize,
    pub meters: u32,
    pub secs: u32,
}

/// Engine output before presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPath {
    pub model: CostModel,

    /// Position of the first station.
    pub source: usize,

    /// Hops in travel order. Empty when source and target coincide.
    pub hops: Vec<Hop>,

    /// Total search cost: metres, or seconds including penalties.
    pub cost: u64,

    /// Number of changes between physical lines.
    pub interchanges: u32,

    /// Penalty in effect for this query, so presentation can report time
    /// consistently for both models.
    pub interchange_penalty_secs: u32,
}

impl RawPath {
    /// Station positions visited, source first.
    pub fn stations(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::once(self.source).chain(self.hops.iter().map(|hop| hop.to))
    }

    /// Position of the last station.
    pub fn target(&self) -> usize {
        self.hops.last().map_or(self.source, |hop| hop.to)
    }

    pub fn is_same_station(&self) -> bool {
        self.hops.is_empty()
    }

    pub fn total_meters(&self) -> u64 {
        self.hops.iter().map(|hop| u64::from(hop.meters)).sum()
    }

    /// Travel time plus interchange penalties.
    pub fn total_secs(&self) -> u64 {
        let travel: u64 = self.hops.iter().map(|hop| u64::from(hop.secs)).sum();
        travel + u64::from(self.interchanges) * u64::from(self.interchange_penalty_secs)
    }
}

/// Line key id of a state before boarding anything.
const NO_LINE: u32 = u32::MAX;

/// Search state: (station position, line key id).
type State = (usize, u32);

/// Best known way of reaching a state.
#[derive(Debug, Clone, Copy)]
struct Label {
    cost: u64,
    changes: u32,
    via: Option<(State, Hop)>,
}

/// Shortest path search over a borrowed graph.
///
/// Each call allocates its own queue and labels, so one engine (or many
/// engines over the same `Arc<MetroGraph>`) can serve concurrent queries.
pub struct PathEngine<'a> {
    graph: &'a MetroGraph,
    config: &'a PathConfig,
}

impl<'a> PathEngine<'a> {
    /// Create a new engine.
    pub fn new(graph: &'a MetroGraph, config: &'a PathConfig) -> Self {
        Self { graph, config }
    }

    /// Find the cheapest path between two stations by name.
    pub fn find_path_by_names(
        &self,
        from: &str,
        to: &str,
        model: CostModel,
    ) -> Result<RawPath, QueryError> {
        let source = self
            .graph
            .find_station_by_name(from)
            .ok_or_else(|| QueryError::UnknownStation(from.trim().to_string()))?;
        let target = self
            .graph
            .find_station_by_name(to)
            .ok_or_else(|| QueryError::UnknownStation(to.trim().to_string()))?;
        self.find_path(source.id, target.id, model)
    }

    /// Find the cheapest path between two stations.
    ///
    /// Equal-cost paths are resolved in favour of fewer interchanges.
    pub fn find_path(
        &self,
        source: StationId,
        target: StationId,
        model: CostModel,
    ) -> Result<RawPath, QueryError> {
        let src = self
            .graph
            .position(source)
            .ok_or_else(|| QueryError::UnknownStation(source.to_string()))?;
        let dst = self
            .graph
            .position(target)
            .ok_or_else(|| QueryError::UnknownStation(target.to_string()))?;

        let penalty = self.config.interchange_penalty_secs;

        if src == dst {
            return Ok(RawPath {
                model,
                source: src,
                hops: Vec::new(),
                cost: 0,
                interchanges: 0,
                interchange_penalty_secs: penalty,
            });
        }

        let mut labels: HashMap<State, Label> = HashMap::new();
        let mut heap = BinaryHeap::new();

        let start = (src, NO_LINE);
        labels.insert(
            start,
            Label {
                cost: 0,
                changes: 0,
                via: None,
            },
        );
        heap.push(Reverse((0u64, 0u32, src, NO_LINE)));

        let mut expanded = 0usize;
        let mut reached = None;

        while let Some(Reverse((cost, changes, pos, key))) = heap.pop() {
            let state = (pos, key);
            match labels.get(&state) {
                Some(label) if label.cost == cost && label.changes == changes => {}
                _ => continue,
            }

            if pos == dst {
                reached = Some((state, cost, changes));
                break;
            }
            expanded += 1;

            for edge in self.graph.neighbors(pos) {
                let edge_key = self.graph.line_key_at(edge.line);
                let is_change = key != NO_LINE && key != edge_key;

                let step = match model {
                    CostModel::Distance => u64::from(edge.meters),
                    CostModel::Time => {
                        u64::from(edge.secs) + if is_change { u64::from(penalty) } else { 0 }
                    }
                };
                let next_cost = cost + step;
                let next_changes = changes + u32::from(is_change);
                let next = (edge.to, edge_key);

                let improves = labels
                    .get(&next)
                    .is_none_or(|l| (next_cost, next_changes) < (l.cost, l.changes));
                if improves {
                    let hop = Hop {
                        from: pos,
                        to: edge.to,
                        line: edge.line,
                        meters: edge.meters,
                        secs: edge.secs,
                    };
                    labels.insert(
                        next,
                        Label {
                            cost: next_cost,
                            changes: next_changes,
                            via: Some((state, hop)),
                        },
                    );
                    heap.push(Reverse((next_cost, next_changes, edge.to, edge_key)));
                }
            }
        }

        let Some((end, cost, changes)) = reached else {
            debug!(%source, %target, %model, expanded, "No route");
            return Err(QueryError::Unreachable {
                from: self.graph.station_at(src).name.clone(),
                to: self.graph.station_at(dst).name.clone(),
            });
        };

        let mut hops = Vec::new();
        let mut cursor = end;
        while let Some(Label {
            via: Some((prev, hop)),
            ..
        }) = labels.get(&cursor).copied()
        {
            hops.push(hop);
            cursor = prev;
        }
        hops.reverse();

        trace!(?hops, "Reconstructed path");
        debug!(
            %source,
            %target,
            %model,
            cost,
            interchanges = changes,
            hops = hops.len(),
            expanded,
            "Found path"
        );

        Ok(RawPath {
            model,
            source: src,
            hops,
            cost,
            interchanges: changes,
            interchange_penalty_secs: penalty,
        })
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
