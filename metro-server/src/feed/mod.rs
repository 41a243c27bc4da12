//! Static transit feed input.
//!
//! A feed is a set of GTFS-style CSV tables (`stops.txt`, `routes.txt`,
//! `trips.txt`, `stop_times.txt`) plus an optional `station_synonyms.json`.
//! This module reads them into raw rows; turning rows into a graph is the
//! job of [`crate::graph`].

mod error;
mod loader;
mod records;
mod source;

pub use error::FeedError;
pub use loader::{
    LoadReport, RawFeed, ROUTES_FILE, STOP_TIMES_FILE, STOPS_FILE, SYNONYMS_FILE, TRIPS_FILE,
};
pub use records::{
    RouteRecord, StopRecord, StopTimeRecord, SynonymEntry, TripRecord, parse_feed_time,
};
pub use source::{DirectoryFeed, FeedSource, MemoryFeed};
