//! Building a graph from feed tables.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{info, warn};

use crate::domain::{GeoPoint, Line, LineId, Station, StationId};
use crate::feed::{
    FeedError, FeedSource, RawFeed, RouteRecord, STOPS_FILE, ROUTES_FILE, StopRecord,
    StopTimeRecord, TripRecord, parse_feed_time,
};

use super::builder::{GraphBuilder, TripStop};
use super::config::BuildConfig;
use super::network::MetroGraph;

/// Load a feed and build its graph.
///
/// Rows that can't be used are logged and counted in
/// [`MetroGraph::report`]. When the feed has no usable trips the line
/// ordering is synthesized and the graph is flagged degraded.
pub fn build(source: &dyn FeedSource, config: &BuildConfig) -> Result<MetroGraph, FeedError> {
    let raw = RawFeed::load(source)?;
    build_from_raw(raw, config)
}

/// Build a graph from already loaded feed rows.
pub fn build_from_raw(raw: RawFeed, config: &BuildConfig) -> Result<MetroGraph, FeedError> {
    let RawFeed {
        stops,
        routes,
        trips,
        stop_times,
        synonyms,
        report,
    } = raw;

    let mut builder = GraphBuilder::with_report(config.clone(), report);

    add_stations(&mut builder, &stops);
    add_lines(&mut builder, &routes);

    match (trips, stop_times) {
        (Some(trips), Some(stop_times)) => add_trips(&mut builder, &trips, &stop_times),
        _ => warn!("Feed has no trip data"),
    }

    if !builder.has_edges() {
        warn!(
            stations = builder.station_count(),
            lines = builder.line_count(),
            "No edges from trip data, synthesizing line order"
        );
        builder.apply_fallback();
    }

    for entry in synonyms {
        for alias in entry.synonyms {
            builder.add_synonym(alias, entry.value.as_str());
        }
    }

    let graph = builder.build()?;
    let report = graph.report();
    info!(
        malformed = report.malformed_rows,
        duplicates = report.duplicate_stations,
        dropped_trips = report.dropped_trips,
        dropped_stop_times = report.dropped_stop_times,
        "Feed build report"
    );
    Ok(graph)
}

fn malformed(builder: &mut GraphBuilder, file: &str, message: String) {
    let err = FeedError::InvalidRecord {
        file: file.to_string(),
        message,
    };
    warn!(error = %err, "Skipping row");
    builder.report_mut().malformed_rows += 1;
}

fn add_stations(builder: &mut GraphBuilder, stops: &[StopRecord]) {
    for stop in stops {
        let id = match StationId::parse(&stop.stop_id) {
            Ok(id) => id,
            Err(e) => {
                malformed(builder, STOPS_FILE, format!("stop_id '{}': {e}", stop.stop_id));
                continue;
            }
        };
        let location = GeoPoint::new(stop.stop_lat, stop.stop_lon);
        if !location.is_valid() {
            malformed(
                builder,
                STOPS_FILE,
                format!("stop {id} has invalid coordinates ({}, {})", stop.stop_lat, stop.stop_lon),
            );
            continue;
        }
        let name = stop.stop_name.trim();
        if name.is_empty() {
            malformed(builder, STOPS_FILE, format!("stop {id} has no name"));
            continue;
        }
        builder.add_station(Station::new(id, stop.stop_code.trim(), name, location));
    }
}

fn add_lines(builder: &mut GraphBuilder, routes: &[RouteRecord]) {
    for route in routes {
        let Some(id) = LineId::parse(&route.route_id) else {
            malformed(
                builder,
                ROUTES_FILE,
                format!("route_id '{}' is not a non-negative integer", route.route_id),
            );
            continue;
        };
        let line = match route.name() {
            Some(name) => Line::new(id, name, &route.route_color),
            None => Line::unnamed(id, &route.route_color),
        };
        builder.add_line(line);
    }
}

/// Feed trips in trip-id order so the build is deterministic.
fn add_trips(builder: &mut GraphBuilder, trips: &[TripRecord], stop_times: &[StopTimeRecord]) {
    let mut trip_lines: HashMap<&str, LineId> = HashMap::with_capacity(trips.len());
    let known_lines: HashSet<LineId> = builder.line_ids().collect();

    for trip in trips {
        match LineId::parse(&trip.route_id).filter(|id| known_lines.contains(id)) {
            Some(line) => {
                trip_lines.insert(trip.trip_id.as_str(), line);
            }
            None => {
                warn!(trip = %trip.trip_id, route = %trip.route_id, "Trip on unknown route");
                builder.report_mut().dropped_trips += 1;
            }
        }
    }

    let mut by_trip: BTreeMap<&str, Vec<&StopTimeRecord>> = BTreeMap::new();
    for st in stop_times {
        if trip_lines.contains_key(st.trip_id.as_str()) {
            by_trip.entry(st.trip_id.as_str()).or_default().push(st);
        } else {
            builder.report_mut().dropped_stop_times += 1;
        }
    }

    for (trip_id, mut rows) in by_trip {
        rows.sort_by_key(|st| st.stop_sequence);

        let mut stops = Vec::with_capacity(rows.len());
        for st in rows {
            match StationId::parse(&st.stop_id)
                .ok()
                .filter(|id| builder.has_station(*id))
            {
                Some(station) => stops.push(TripStop::new(
                    station,
                    parse_feed_time(&st.arrival_time),
                    parse_feed_time(&st.departure_time),
                )),
                None => {
                    warn!(trip = trip_id, stop = %st.stop_id, "Stop time for unknown stop");
                    builder.report_mut().dropped_stop_times += 1;
                }
            }
        }

        let Some(&line) = trip_lines.get(trip_id) else {
            continue;
        };
        if let Err(e) = builder.add_trip(line, trip_id, &stops) {
            warn!(trip = trip_id, error = %e, "Skipping trip");
            builder.report_mut().dropped_trips += 1;
        }
    }
}
