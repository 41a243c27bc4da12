//! Row types for the feed tables.
//!
//! Columns are matched by header name, so feeds may carry extra columns or
//! order them differently. Optional columns default to empty strings.

use serde::Deserialize;

/// A row of `stops.txt`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StopRecord {
    pub stop_id: String,
    #[serde(default)]
    pub stop_code: String,
    pub stop_name: String,
    pub stop_lat: f64,
    pub stop_lon: f64,
}

/// A row of `routes.txt`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RouteRecord {
    pub route_id: String,
    #[serde(default)]
    pub route_short_name: String,
    #[serde(default)]
    pub route_long_name: String,
    #[serde(default)]
    pub route_color: String,
}

impl RouteRecord {
    /// Long name, else short name. `None` when the feed names neither.
    pub fn name(&self) -> Option<&str> {
        [&self.route_long_name, &self.route_short_name]
            .into_iter()
            .map(|name| name.trim())
            .find(|name| !name.is_empty())
    }
}

/// A row of `trips.txt`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TripRecord {
    pub route_id: String,
    pub trip_id: String,
}

/// A row of `stop_times.txt`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StopTimeRecord {
    pub trip_id: String,
    #[serde(default)]
    pub arrival_time: String,
    #[serde(default)]
    pub departure_time: String,
    pub stop_id: String,
    pub stop_sequence: u32,
}

/// An entry of `station_synonyms.json`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SynonymEntry {
    /// Canonical station name as it appears in `stops.txt`.
    pub value: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

/// Parse a feed time (`H:MM:SS` or `HH:MM:SS`) into seconds past midnight.
///
/// Hours may exceed 23 for trips running past midnight, so `25:10:00` is
/// valid. Returns `None` for anything else, including empty strings.
///
/// # Examples
///
/// ```
/// use metro_server::feed::parse_feed_time;
///
/// assert_eq!(parse_feed_time("06:00:30"), Some(6 * 3600 + 30));
/// assert_eq!(parse_feed_time("5:59:00"), Some(5 * 3600 + 59 * 60));
/// assert_eq!(parse_feed_time("25:10:00"), Some(25 * 3600 + 600));
/// assert_eq!(parse_feed_time("06:60:00"), None);
/// assert_eq!(parse_feed_time(""), None);
/// ```
pub fn parse_feed_time(s: &str) -> Option<u32> {
    let mut parts = s.trim().split(':');
    let h = parts.next()?;
    let m = parts.next()?;
    let sec = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    if h.is_empty() || h.len() > 3 || m.len() != 2 || sec.len() != 2 {
        return None;
    }
    let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(h) || !all_digits(m) || !all_digits(sec) {
        return None;
    }
    let h: u32 = h.parse().ok()?;
    let m: u32 = m.parse().ok()?;
    let sec: u32 = sec.parse().ok()?;
    if m > 59 || sec > 59 {
        return None;
    }
    Some(h * 3600 + m * 60 + sec)
}
