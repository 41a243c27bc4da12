//! Station identifiers and records.

use std::fmt;

use serde::Serialize;

use super::GeoPoint;

/// Error returned when parsing an invalid station id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station id: {reason}")]
pub struct InvalidStationId {
    reason: &'static str,
}

/// A feed-assigned station identifier.
///
/// Feeds carry stop ids as text; this network only accepts non-negative
/// integer ids, so anything else is rejected at load time.
///
/// # Examples
///
/// ```
/// use metro_server::domain::StationId;
///
/// let id = StationId::parse("42").unwrap();
/// assert_eq!(id.get(), 42);
///
/// // Surrounding whitespace is tolerated
/// assert_eq!(StationId::parse(" 7 ").unwrap().get(), 7);
///
/// assert!(StationId::parse("").is_err());
/// assert!(StationId::parse("-1").is_err());
/// assert!(StationId::parse("A12").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct StationId(u32);

impl StationId {
    /// Wrap a raw id.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Parse a station id from feed text.
    pub fn parse(s: &str) -> Result<Self, InvalidStationId> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(InvalidStationId { reason: "empty" });
        }
        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidStationId {
                reason: "must be a non-negative integer",
            });
        }
        trimmed
            .parse::<u32>()
            .map(Self)
            .map_err(|_| InvalidStationId {
                reason: "out of range",
            })
    }

    /// Returns the raw id.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A metro station.
///
/// Created once when the graph is built and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub id: StationId,

    /// Short station code from the feed (may be empty).
    pub code: String,

    /// Display name.
    pub name: String,

    pub location: GeoPoint,
}

impl Station {
    /// Create a new station record.
    pub fn new(
        id: StationId,
        code: impl Into<String>,
        name: impl Into<String>,
        location: GeoPoint,
    ) -> Self {
        Self {
            id,
            code: code.into(),
            name: name.into(),
            location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_ids() {
        assert_eq!(StationId::parse("0").unwrap().get(), 0);
        assert_eq!(StationId::parse("1").unwrap().get(), 1);
        assert_eq!(StationId::parse("285").unwrap().get(), 285);
        assert_eq!(StationId::parse("4294967295").unwrap().get(), u32::MAX);
    }

    #[test]
    fn reject_non_numeric() {
        assert!(StationId::parse("abc").is_err());
        assert!(StationId::parse("1.5").is_err());
        assert!(StationId::parse("+3").is_err());
        assert!(StationId::parse("-3").is_err());
        assert!(StationId::parse("1 2").is_err());
    }

    #[test]
    fn reject_out_of_range() {
        let err = StationId::parse("4294967296").unwrap_err();
        assert_eq!(err.to_string(), "invalid station id: out of range");
    }

    #[test]
    fn display_and_debug() {
        let id = StationId::new(17);
        assert_eq!(id.to_string(), "17");
        assert_eq!(format!("{:?}", id), "StationId(17)");
    }

    #[test]
    fn ordering_follows_raw_id() {
        assert!(StationId::new(2) < StationId::new(10));
    }
}
