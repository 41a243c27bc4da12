//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Station, StationId};
use crate::graph::MetroGraph;
use crate::store::Snapshot;

/// Query for the station search endpoint.
#[derive(Debug, Deserialize)]
pub struct StationSearchRequest {
    /// Search query (substring of the station name)
    pub q: String,

    /// Maximum results (default 10, capped at 50)
    pub limit: Option<usize>,
}

/// Station search response.
#[derive(Debug, Serialize)]
pub struct StationSearchResponse {
    pub stations: Vec<StationDto>,
}

/// A station with the lines serving it.
#[derive(Debug, Serialize)]
pub struct StationDto {
    pub id: StationId,
    pub code: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,

    /// Names of the lines calling here
    pub lines: Vec<String>,

    /// Whether more than one physical line calls here
    pub interchange: bool,
}

impl StationDto {
    pub fn from_station(graph: &MetroGraph, station: &Station) -> Self {
        let lines = graph
            .lines_for_station(station.id)
            .iter()
            .filter_map(|&id| graph.line(id))
            .map(|line| line.name.clone())
            .collect();

        Self {
            id: station.id,
            code: station.code.clone(),
            name: station.name.clone(),
            lat: station.location.lat,
            lon: station.location.lon,
            lines,
            interchange: graph.is_interchange(station.id),
        }
    }
}

/// Query for the path endpoint.
#[derive(Debug, Deserialize)]
pub struct PathRequest {
    /// Source station name or synonym
    pub from: String,

    /// Destination station name or synonym
    pub to: String,

    /// `distance` (default) or `time`
    pub model: Option<String>,
}

/// Network status.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub ready: bool,
    pub generation: Option<u64>,
    pub stations: usize,
    pub lines: usize,
    pub degraded: bool,

    /// RFC 3339 time of the last successful load
    pub loaded_at: Option<String>,

    /// Why the network failed to load, if it did
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusResponse {
    pub fn not_ready(error: Option<String>) -> Self {
        Self {
            ready: false,
            generation: None,
            stations: 0,
            lines: 0,
            degraded: false,
            loaded_at: None,
            error,
        }
    }

    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            ready: true,
            generation: Some(snapshot.generation),
            stations: snapshot.graph.station_count(),
            lines: snapshot.graph.line_count(),
            degraded: snapshot.graph.is_degraded(),
            loaded_at: Some(snapshot.loaded_at.to_rfc3339()),
            error: None,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Similar station names, for unknown stations
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}
