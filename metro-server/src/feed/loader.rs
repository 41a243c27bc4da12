//! Tolerant CSV loading of feed tables.

use std::io::Read;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::error::FeedError;
use super::records::{RouteRecord, StopRecord, StopTimeRecord, SynonymEntry, TripRecord};
use super::source::FeedSource;

pub const STOPS_FILE: &str = "stops.txt";
pub const ROUTES_FILE: &str = "routes.txt";
pub const TRIPS_FILE: &str = "trips.txt";
pub const STOP_TIMES_FILE: &str = "stop_times.txt";
pub const SYNONYMS_FILE: &str = "station_synonyms.json";

/// Counters for rows that were skipped or dropped while loading and building.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Rows that failed to parse.
    pub malformed_rows: usize,

    /// Station rows rejected because an id was already taken.
    pub duplicate_stations: usize,

    /// Trips whose route isn't in the line table.
    pub dropped_trips: usize,

    /// Stop times naming an unknown trip or stop.
    pub dropped_stop_times: usize,

    /// Synonyms naming a station that doesn't exist.
    pub dropped_synonyms: usize,
}

/// Raw rows of every table in a feed.
///
/// `trips` and `stop_times` are `None` when the table is absent or
/// unreadable; the graph builder falls back to synthetic line ordering in
/// that case.
#[derive(Debug, Clone, Default)]
pub struct RawFeed {
    pub stops: Vec<StopRecord>,
    pub routes: Vec<RouteRecord>,
    pub trips: Option<Vec<TripRecord>>,
    pub stop_times: Option<Vec<StopTimeRecord>>,
    pub synonyms: Vec<SynonymEntry>,
    pub report: LoadReport,
}

impl RawFeed {
    /// Load every table from `source`.
    ///
    /// Fails only when `stops.txt` or `routes.txt` is missing or unreadable.
    /// Malformed rows anywhere are skipped and counted.
    pub fn load(source: &dyn FeedSource) -> Result<Self, FeedError> {
        info!(source = %source.describe(), "Loading feed");

        let mut report = LoadReport::default();

        let stops = read_required(source, STOPS_FILE, &mut report)?;
        let routes = read_required(source, ROUTES_FILE, &mut report)?;
        let trips = read_optional(source, TRIPS_FILE, &mut report);
        let stop_times = read_optional(source, STOP_TIMES_FILE, &mut report);
        let synonyms = read_synonyms(source);

        debug!(
            stops = stops.len(),
            routes = routes.len(),
            trips = trips.as_ref().map(Vec::len),
            stop_times = stop_times.as_ref().map(Vec::len),
            synonyms = synonyms.len(),
            malformed = report.malformed_rows,
            "Feed tables loaded"
        );

        Ok(Self {
            stops,
            routes,
            trips,
            stop_times,
            synonyms,
            report,
        })
    }
}

fn read_required<T: DeserializeOwned>(
    source: &dyn FeedSource,
    name: &str,
    report: &mut LoadReport,
) -> Result<Vec<T>, FeedError> {
    let reader = source.open(name)?.ok_or_else(|| FeedError::MissingFile {
        name: name.to_string(),
    })?;
    Ok(parse_rows(reader, name, report))
}

fn read_optional<T: DeserializeOwned>(
    source: &dyn FeedSource,
    name: &str,
    report: &mut LoadReport,
) -> Option<Vec<T>> {
    match source.open(name) {
        Ok(Some(reader)) => Some(parse_rows(reader, name, report)),
        Ok(None) => {
            warn!(file = name, "Optional feed table absent");
            None
        }
        Err(e) => {
            warn!(file = name, error = %e, "Optional feed table unreadable");
            None
        }
    }
}

/// Deserialize every row of a CSV table, skipping the ones that fail.
fn parse_rows<T: DeserializeOwned>(
    reader: Box<dyn Read + '_>,
    name: &str,
    report: &mut LoadReport,
) -> Vec<T> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in rdr.deserialize::<T>() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                let err = FeedError::MalformedRow {
                    file: name.to_string(),
                    line: e.position().map(|p| p.line()).unwrap_or(0),
                    message: e.to_string(),
                };
                warn!(error = %err, "Skipping row");
                report.malformed_rows += 1;
            }
        }
    }
    rows
}

/// Load the optional synonyms file. Any problem is logged and ignored.
fn read_synonyms(source: &dyn FeedSource) -> Vec<SynonymEntry> {
    let mut reader = match source.open(SYNONYMS_FILE) {
        Ok(Some(reader)) => reader,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(file = SYNONYMS_FILE, error = %e, "Synonyms unreadable, ignoring");
            return Vec::new();
        }
    };

    let mut contents = String::new();
    if let Err(e) = reader.read_to_string(&mut contents) {
        warn!(file = SYNONYMS_FILE, error = %e, "Synonyms unreadable, ignoring");
        return Vec::new();
    }

    match serde_json::from_str(&contents) {
        Ok(entries) => entries,
        Err(e) => {
            let err = FeedError::Synonyms(e.to_string());
            warn!(error = %err, "Ignoring synonyms");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::MemoryFeed;

    const STOPS: &str = "stop_id,stop_code,stop_name,stop_desc,stop_lat,stop_lon\n\
        1,RCK,Rajiv Chowk,,28.6328,77.2197\n\
        2,KG,Kashmere Gate,,28.6675,77.2282\n";

    const ROUTES: &str = "route_id,agency_id,route_short_name,route_long_name,route_type,route_color\n\
        10,DMRC,Y,YELLOW_Samaypur Badli to Huda City Centre,1,FDD835\n";

    fn base_feed() -> MemoryFeed {
        MemoryFeed::new()
            .with_file(STOPS_FILE, STOPS)
            .with_file(ROUTES_FILE, ROUTES)
    }

    #[test]
    fn loads_required_tables_by_header() {
        let raw = RawFeed::load(&base_feed()).unwrap();

        assert_eq!(raw.stops.len(), 2);
        assert_eq!(raw.stops[0].stop_code, "RCK");
        assert_eq!(raw.stops[1].stop_name, "Kashmere Gate");
        assert_eq!(raw.routes.len(), 1);
        assert_eq!(raw.routes[0].route_color, "FDD835");
        assert!(raw.trips.is_none());
        assert!(raw.stop_times.is_none());
        assert_eq!(raw.report, LoadReport::default());
    }

    #[test]
    fn missing_stops_is_fatal() {
        let feed = base_feed().without_file(STOPS_FILE);
        let err = RawFeed::load(&feed).unwrap_err();
        assert!(matches!(err, FeedError::MissingFile { ref name } if name == STOPS_FILE));
    }

    #[test]
    fn missing_routes_is_fatal() {
        let feed = base_feed().without_file(ROUTES_FILE);
        let err = RawFeed::load(&feed).unwrap_err();
        assert!(matches!(err, FeedError::MissingFile { ref name } if name == ROUTES_FILE));
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let stops = "stop_id,stop_code,stop_name,stop_lat,stop_lon\n\
            1,A,Alpha,28.60,77.20\n\
            2,B,Bravo\n\
            3,C,Charlie,not-a-number,77.22\n\
            4,D,Delta,28.63,77.23\n";
        let feed = base_feed().with_file(STOPS_FILE, stops);

        let raw = RawFeed::load(&feed).unwrap();
        let names: Vec<_> = raw.stops.iter().map(|s| s.stop_name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Delta"]);
        assert_eq!(raw.report.malformed_rows, 2);
    }

    #[test]
    fn loads_trip_tables() {
        let feed = base_feed()
            .with_file(TRIPS_FILE, "route_id,service_id,trip_id\n10,WK,T1\n")
            .with_file(
                STOP_TIMES_FILE,
                "trip_id,arrival_time,departure_time,stop_id,stop_sequence\n\
                 T1,06:00:00,06:00:30,1,1\n\
                 T1,06:04:00,06:04:30,2,2\n",
            );

        let raw = RawFeed::load(&feed).unwrap();
        assert_eq!(raw.trips.as_ref().map(Vec::len), Some(1));
        let stop_times = raw.stop_times.unwrap();
        assert_eq!(stop_times.len(), 2);
        assert_eq!(stop_times[1].arrival_time, "06:04:00");
        assert_eq!(stop_times[1].stop_sequence, 2);
    }

    #[test]
    fn loads_synonyms() {
        let feed = base_feed().with_file(
            SYNONYMS_FILE,
            r#"[{"value": "Rajiv Chowk", "synonyms": ["CP", "Connaught Place"]}]"#,
        );
        let raw = RawFeed::load(&feed).unwrap();
        assert_eq!(raw.synonyms.len(), 1);
        assert_eq!(raw.synonyms[0].synonyms, vec!["CP", "Connaught Place"]);
    }

    #[test]
    fn invalid_synonyms_are_ignored() {
        let feed = base_feed().with_file(SYNONYMS_FILE, "{not json");
        let raw = RawFeed::load(&feed).unwrap();
        assert!(raw.synonyms.is_empty());
    }
}
