//! Incremental construction of a [`MetroGraph`].

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, info, warn};

use crate::domain::{Line, LineId, Station, StationId};
use crate::feed::{FeedError, LoadReport};

use super::config::BuildConfig;
use super::edge::Edge;
use super::fallback;
use super::index::StationIndex;
use super::network::{GraphParts, MetroGraph};

/// Error from programmatic graph construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// A station id was referenced before being added
    #[error("unknown station {0}")]
    UnknownStation(StationId),

    /// A line id was referenced before being added
    #[error("unknown line {0}")]
    UnknownLine(LineId),
}

/// One stop of a scheduled trip, times in seconds past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripStop {
    pub station: StationId,
    pub arrival: Option<u32>,
    pub departure: Option<u32>,
}

impl TripStop {
    pub fn new(station: StationId, arrival: Option<u32>, departure: Option<u32>) -> Self {
        Self {
            station,
            arrival,
            departure,
        }
    }

    fn leaves_at(&self) -> Option<u32> {
        self.departure.or(self.arrival)
    }

    fn arrives_at(&self) -> Option<u32> {
        self.arrival.or(self.departure)
    }
}

/// Attributes of a directed `(from, to, line)` hop before it becomes an edge.
#[derive(Debug, Clone, Copy)]
struct HopAttrs {
    meters: u32,

    /// Smallest positive scheduled travel time seen, if any.
    scheduled: Option<u32>,
}

/// Where a line's ordered sequence came from.
#[derive(Debug, Clone)]
enum SequenceOrigin {
    None,
    Explicit,
    Trip(String),
}

/// Builds a [`MetroGraph`] from stations, lines and hops.
///
/// Parallel hops for the same `(from, to, line)` collapse to one edge keeping
/// the minimum distance and the minimum scheduled time.
///
/// # Examples
///
/// ```
/// use metro_server::domain::{GeoPoint, Line, LineId, Station, StationId};
/// use metro_server::graph::GraphBuilder;
///
/// let mut builder = GraphBuilder::default();
/// for (id, name) in [(1, "A"), (2, "B")] {
///     builder.add_station(Station::new(StationId::new(id), "", name, GeoPoint::new(28.6, 77.2)));
/// }
/// builder.add_line(Line::new(LineId::new(1), "Red", ""));
/// builder
///     .add_segment(StationId::new(1), StationId::new(2), LineId::new(1), 1_000)
///     .unwrap();
///
/// let graph = builder.build().unwrap();
/// assert_eq!(graph.edge_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    config: BuildConfig,
    stations: Vec<Station>,
    station_pos: HashMap<StationId, usize>,
    lines: Vec<Line>,
    line_pos: HashMap<LineId, usize>,
    sequences: Vec<Vec<usize>>,
    origins: Vec<SequenceOrigin>,
    members: Vec<BTreeSet<usize>>,
    hops: BTreeMap<(usize, usize, usize), HopAttrs>,
    synonyms: Vec<(String, String)>,
    degraded: bool,
    report: LoadReport,
}

impl GraphBuilder {
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Start from the counters of an earlier loading stage.
    pub(crate) fn with_report(config: BuildConfig, report: LoadReport) -> Self {
        Self {
            config,
            report,
            ..Self::default()
        }
    }

    pub(crate) fn report_mut(&mut self) -> &mut LoadReport {
        &mut self.report
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn has_station(&self, id: StationId) -> bool {
        self.station_pos.contains_key(&id)
    }

    /// Ids of the lines added so far.
    pub fn line_ids(&self) -> impl Iterator<Item = LineId> + '_ {
        self.lines.iter().map(|line| line.id)
    }

    /// Whether any hop has been added.
    pub fn has_edges(&self) -> bool {
        !self.hops.is_empty()
    }

    /// Add a station. A duplicate id is ignored with a warning and `false`.
    pub fn add_station(&mut self, station: Station) -> bool {
        if self.station_pos.contains_key(&station.id) {
            warn!(id = %station.id, name = %station.name, "Duplicate station id, keeping first");
            self.report.duplicate_stations += 1;
            return false;
        }
        self.station_pos.insert(station.id, self.stations.len());
        self.stations.push(station);
        true
    }

    /// Add a line. A duplicate id is ignored with a warning and `false`.
    pub fn add_line(&mut self, line: Line) -> bool {
        if self.line_pos.contains_key(&line.id) {
            warn!(id = %line.id, name = %line.name, "Duplicate line id, keeping first");
            return false;
        }
        self.line_pos.insert(line.id, self.lines.len());
        self.lines.push(line);
        self.sequences.push(Vec::new());
        self.origins.push(SequenceOrigin::None);
        self.members.push(BTreeSet::new());
        true
    }

    fn station_index(&self, id: StationId) -> Result<usize, GraphError> {
        self.station_pos
            .get(&id)
            .copied()
            .ok_or(GraphError::UnknownStation(id))
    }

    fn line_index(&self, id: LineId) -> Result<usize, GraphError> {
        self.line_pos
            .get(&id)
            .copied()
            .ok_or(GraphError::UnknownLine(id))
    }

    fn haversine_m(&self, a: usize, b: usize) -> u32 {
        self.stations[a]
            .location
            .distance_m(&self.stations[b].location)
            .round() as u32
    }

    fn add_hop(&mut self, from: usize, to: usize, line: usize, meters: u32, scheduled: Option<u32>) {
        if from == to {
            return;
        }
        self.members[line].insert(from);
        self.members[line].insert(to);
        self.hops
            .entry((from, to, line))
            .and_modify(|attrs| {
                attrs.meters = attrs.meters.min(meters);
                attrs.scheduled = match (attrs.scheduled, scheduled) {
                    (Some(a), Some(b)) => Some(a.min(b)),
                    (a, b) => a.or(b),
                };
            })
            .or_insert(HopAttrs { meters, scheduled });
    }

    /// Set the ordered stations of a line and link consecutive stations in
    /// both directions with haversine distances.
    pub fn add_line_sequence(
        &mut self,
        line: LineId,
        stations: &[StationId],
    ) -> Result<(), GraphError> {
        let line = self.line_index(line)?;
        let positions = stations
            .iter()
            .map(|&id| self.station_index(id))
            .collect::<Result<Vec<_>, _>>()?;
        self.set_sequence(line, positions, SequenceOrigin::Explicit);
        Ok(())
    }

    fn set_sequence(&mut self, line: usize, positions: Vec<usize>, origin: SequenceOrigin) {
        for pair in positions.windows(2) {
            let meters = self.haversine_m(pair[0], pair[1]);
            self.add_hop(pair[0], pair[1], line, meters, None);
            self.add_hop(pair[1], pair[0], line, meters, None);
        }
        for &pos in &positions {
            self.members[line].insert(pos);
        }
        self.sequences[line] = positions;
        self.origins[line] = origin;
    }

    /// Link two stations on a line in both directions with an explicit
    /// distance. Extends the line's sequence when `from` is its last station.
    pub fn add_segment(
        &mut self,
        from: StationId,
        to: StationId,
        line: LineId,
        meters: u32,
    ) -> Result<(), GraphError> {
        let line = self.line_index(line)?;
        let a = self.station_index(from)?;
        let b = self.station_index(to)?;

        self.add_hop(a, b, line, meters, None);
        self.add_hop(b, a, line, meters, None);

        let sequence = &mut self.sequences[line];
        if sequence.is_empty() {
            sequence.extend([a, b]);
            self.origins[line] = SequenceOrigin::Explicit;
        } else if sequence.last() == Some(&a) && !sequence.contains(&b) {
            sequence.push(b);
        }
        Ok(())
    }

    /// Add a scheduled trip on a line.
    ///
    /// Consecutive stops become hops in both directions; the forward hop
    /// records `arrival(next) - departure(prev)` when positive. The longest
    /// trip of a line becomes its sequence, ties going to the smallest trip id.
    pub fn add_trip(
        &mut self,
        line: LineId,
        trip_id: &str,
        stops: &[TripStop],
    ) -> Result<(), GraphError> {
        let line = self.line_index(line)?;
        let positions = stops
            .iter()
            .map(|stop| self.station_index(stop.station))
            .collect::<Result<Vec<_>, _>>()?;

        for (i, pair) in stops.windows(2).enumerate() {
            let (a, b) = (positions[i], positions[i + 1]);
            let meters = self.haversine_m(a, b);
            let scheduled = match (pair[0].leaves_at(), pair[1].arrives_at()) {
                (Some(dep), Some(arr)) if arr > dep && self.config.prefer_schedule => {
                    Some(arr - dep)
                }
                _ => None,
            };
            self.add_hop(a, b, line, meters, scheduled);
            self.add_hop(b, a, line, meters, None);
        }
        for &pos in &positions {
            self.members[line].insert(pos);
        }

        let replace = match &self.origins[line] {
            SequenceOrigin::None => true,
            SequenceOrigin::Explicit => false,
            SequenceOrigin::Trip(best) => {
                let current = self.sequences[line].len();
                positions.len() > current
                    || (positions.len() == current && trip_id < best.as_str())
            }
        };
        if replace {
            self.sequences[line] = positions;
            self.origins[line] = SequenceOrigin::Trip(trip_id.to_string());
        }
        Ok(())
    }

    /// Register an alternative name for the station named `station_name`.
    /// Resolved at build time; unmatched synonyms are dropped.
    pub fn add_synonym(&mut self, alias: impl Into<String>, station_name: impl Into<String>) {
        self.synonyms.push((alias.into(), station_name.into()));
    }

    /// Synthesize line orderings from station coordinates.
    ///
    /// Used when the feed has no usable trip data. Creates a single fallback
    /// line when there are no lines at all, and marks the graph degraded.
    pub fn apply_fallback(&mut self) {
        if self.stations.is_empty() {
            return;
        }
        if self.lines.is_empty() {
            self.add_line(Line::new(LineId::new(0), fallback::FALLBACK_LINE_NAME, ""));
        }

        let plan = fallback::plan(&self.stations, self.lines.len());
        for (line, window) in plan.windows.into_iter().enumerate() {
            self.set_sequence(line, window, SequenceOrigin::Explicit);
        }
        if let Some(chain) = plan.chain {
            debug!(stations = chain.len(), "Chaining stations left without edges");
            self.set_sequence(0, chain, SequenceOrigin::Explicit);
        }

        self.degraded = true;
    }

    /// Finish the graph.
    ///
    /// Fails with [`FeedError::EmptyFeed`] when no station was added.
    pub fn build(mut self) -> Result<MetroGraph, FeedError> {
        if self.stations.is_empty() {
            return Err(FeedError::EmptyFeed);
        }

        let mut adjacency: Vec<Vec<Edge>> = vec![Vec::new(); self.stations.len()];
        for (&(from, to, line), attrs) in &self.hops {
            let secs = attrs
                .scheduled
                .or_else(|| self.hops.get(&(to, from, line)).and_then(|r| r.scheduled))
                .unwrap_or_else(|| self.config.fallback_hop_secs(attrs.meters));
            adjacency[from].push(Edge::new(to, line, attrs.meters, secs));
        }

        let mut key_ids = HashMap::new();
        let line_keys: Vec<u32> = self
            .lines
            .iter()
            .map(|line| {
                let next = key_ids.len() as u32;
                *key_ids.entry(line.key.clone()).or_insert(next)
            })
            .collect();

        let mut memberships: Vec<Vec<usize>> = vec![Vec::new(); self.stations.len()];
        for (line, members) in self.members.iter().enumerate() {
            for &pos in members {
                memberships[pos].push(line);
            }
        }

        let mut synonyms = Vec::with_capacity(self.synonyms.len());
        if !self.synonyms.is_empty() {
            let by_name: HashMap<String, usize> = self
                .stations
                .iter()
                .enumerate()
                .rev()
                .map(|(pos, s)| (s.name.trim().to_lowercase(), pos))
                .collect();
            for (alias, name) in std::mem::take(&mut self.synonyms) {
                match by_name.get(&name.trim().to_lowercase()) {
                    Some(&pos) => synonyms.push((alias, pos)),
                    None => {
                        warn!(alias = %alias, station = %name, "Synonym for unknown station");
                        self.report.dropped_synonyms += 1;
                    }
                }
            }
        }

        let index = StationIndex::build(&self.stations, &self.lines, &memberships, &synonyms);

        let sequences = self
            .sequences
            .iter()
            .map(|seq| seq.iter().map(|&pos| self.stations[pos].id).collect())
            .collect();

        let edge_count: usize = adjacency.iter().map(Vec::len).sum();
        info!(
            stations = self.stations.len(),
            lines = self.lines.len(),
            edges = edge_count,
            degraded = self.degraded,
            "Built metro graph"
        );

        Ok(MetroGraph::from_parts(GraphParts {
            stations: self.stations,
            lines: self.lines,
            line_keys,
            sequences,
            adjacency,
            index,
            degraded: self.degraded,
            report: self.report,
        }))
    }
}
