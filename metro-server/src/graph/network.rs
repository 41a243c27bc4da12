//! The immutable metro network.

use std::collections::HashMap;

use crate::domain::{Line, LineId, Station, StationId};
use crate::feed::LoadReport;

use super::edge::Edge;
use super::index::StationIndex;

/// Stations, lines and adjacency of one metro network.
///
/// Built once by [`GraphBuilder`](super::GraphBuilder) and never mutated, so
/// it is shared between queries as `Arc<MetroGraph>`. Internally stations
/// and lines are addressed by dense positions; the public API speaks in feed
/// ids.
#[derive(Debug, Clone)]
pub struct MetroGraph {
    stations: Vec<Station>,
    lines: Vec<Line>,
    station_pos: HashMap<StationId, usize>,
    line_pos: HashMap<LineId, usize>,

    /// Dense key id per line position; lines sharing a `LineKey` share an id.
    line_keys: Vec<u32>,

    sequences: Vec<Vec<StationId>>,
    adjacency: Vec<Vec<Edge>>,
    index: StationIndex,
    degraded: bool,
    report: LoadReport,
}

/// Everything the builder hands over.
pub(crate) struct GraphParts {
    pub stations: Vec<Station>,
    pub lines: Vec<Line>,
    pub line_keys: Vec<u32>,
    pub sequences: Vec<Vec<StationId>>,
    pub adjacency: Vec<Vec<Edge>>,
    pub index: StationIndex,
    pub degraded: bool,
    pub report: LoadReport,
}

impl MetroGraph {
    pub(crate) fn from_parts(parts: GraphParts) -> Self {
        let station_pos = parts
            .stations
            .iter()
            .enumerate()
            .map(|(pos, s)| (s.id, pos))
            .collect();
        let line_pos = parts
            .lines
            .iter()
            .enumerate()
            .map(|(pos, l)| (l.id, pos))
            .collect();

        Self {
            stations: parts.stations,
            lines: parts.lines,
            station_pos,
            line_pos,
            line_keys: parts.line_keys,
            sequences: parts.sequences,
            adjacency: parts.adjacency,
            index: parts.index,
            degraded: parts.degraded,
            report: parts.report,
        }
    }

    /// Look up a station by id.
    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.position(id).map(|pos| &self.stations[pos])
    }

    /// Look up a line by id.
    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.line_pos.get(&id).map(|&pos| &self.lines[pos])
    }

    /// All stations in build order.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// All lines in build order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Dense position of a station.
    pub fn position(&self, id: StationId) -> Option<usize> {
        self.station_pos.get(&id).copied()
    }

    /// Station at a dense position.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is out of range. Positions come from this graph's own
    /// edges and lookups.
    pub fn station_at(&self, pos: usize) -> &Station {
        &self.stations[pos]
    }

    /// Line at a dense position.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is out of range.
    pub fn line_at(&self, pos: usize) -> &Line {
        &self.lines[pos]
    }

    /// Outgoing edges of the station at `pos`.
    pub fn neighbors(&self, pos: usize) -> &[Edge] {
        self.adjacency.get(pos).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Dense key id of the line at `pos`.
    pub(crate) fn line_key_at(&self, pos: usize) -> u32 {
        self.line_keys[pos]
    }

    /// Lines serving a station, sorted by id. Empty for unknown stations.
    pub fn lines_for_station(&self, id: StationId) -> &[LineId] {
        match self.position(id) {
            Some(pos) => self.index.lines_for(pos),
            None => &[],
        }
    }

    /// Whether a station is served by at least two physical lines.
    pub fn is_interchange(&self, id: StationId) -> bool {
        self.position(id)
            .is_some_and(|pos| self.index.is_interchange(pos))
    }

    /// Case-insensitive exact name lookup, falling back to synonyms.
    pub fn find_station_by_name(&self, name: &str) -> Option<&Station> {
        self.index.find_by_name(name).map(|pos| &self.stations[pos])
    }

    /// Distinct station names in alphabetical order.
    pub fn station_names(&self) -> &[String] {
        self.index.station_names()
    }

    /// Stations whose names contain `query`, prefix matches first.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Station> {
        self.index
            .search(query, limit)
            .into_iter()
            .map(|pos| &self.stations[pos])
            .collect()
    }

    /// Names of stations resembling `name`, best first.
    pub fn suggest(&self, name: &str, limit: usize) -> Vec<String> {
        self.index.suggest(&self.stations, name, limit)
    }

    /// Ordered station sequence of a line.
    pub fn line_sequence(&self, id: LineId) -> Option<&[StationId]> {
        self.line_pos
            .get(&id)
            .map(|&pos| self.sequences[pos].as_slice())
    }

    /// Whether line ordering was synthesized because the feed had no usable
    /// trip data.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Rows skipped or dropped while building.
    pub fn report(&self) -> &LoadReport {
        &self.report
    }
}
