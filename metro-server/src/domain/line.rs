//! Metro line identity and records.

use std::fmt;

use serde::Serialize;

/// A feed-assigned line (route) identifier.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct LineId(u32);

impl LineId {
    /// Wrap a raw id.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Parse a line id from feed text.
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        trimmed.parse().ok().map(Self)
    }

    /// Returns the raw id.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineId({})", self.0)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical identity of a physical line.
///
/// Feeds often split one physical line into several route records
/// (one per branch or direction), e.g. `"BLUE_Dwarka to Noida"` and
/// `"BLUE_Dwarka to Vaishali"`. The key is the lowercased name prefix up to
/// the first `_` or space, so both records above map to `blue`.
///
/// # Examples
///
/// ```
/// use metro_server::domain::LineKey;
///
/// assert_eq!(LineKey::from_name("YELLOW_Huda City Centre to Samaypur Badli").as_str(), "yellow");
/// assert_eq!(LineKey::from_name("Red Line").as_str(), "red");
/// assert_eq!(LineKey::from_name("Airport").as_str(), "airport");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineKey(String);

impl LineKey {
    /// Derive the key from a line name.
    pub fn from_name(name: &str) -> Self {
        let trimmed = name.trim();
        let prefix = trimmed
            .split(|c: char| c == '_' || c.is_whitespace())
            .next()
            .unwrap_or(trimmed);
        Self(prefix.to_lowercase())
    }

    /// Key for a route the feed left unnamed. Distinct per route id; the
    /// embedded space keeps it apart from every name-derived key.
    pub fn for_unnamed_route(id: LineId) -> Self {
        Self(format!("route {id}"))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Colours for the well-known line names.
const NAMED_COLORS: &[(&str, &str)] = &[
    ("red", "#E53935"),
    ("yellow", "#FDD835"),
    ("blue", "#1E88E5"),
    ("green", "#43A047"),
    ("violet", "#8E24AA"),
    ("pink", "#EC407A"),
    ("magenta", "#9C27B0"),
    ("gray", "#9E9E9E"),
    ("grey", "#9E9E9E"),
    ("aqua", "#00BCD4"),
    ("orange", "#FF9800"),
    ("airport", "#FF9800"),
    ("rapid", "#00BCD4"),
];

/// Used for lines whose name doesn't identify a colour.
const DEFAULT_PALETTE: &[&str] = &[
    "#3F51B5", "#009688", "#795548", "#607D8B", "#CDDC39", "#FF5722",
];

/// Normalize a feed colour (`"ff0000"`, `"#FF0000"`) to `#RRGGBB`.
///
/// Returns `None` unless the input is exactly six hex digits with an optional
/// leading `#`.
pub fn normalize_color(raw: &str) -> Option<String> {
    let hex = raw.trim().trim_start_matches('#');
    if hex.len() == 6 && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        Some(format!("#{}", hex.to_ascii_uppercase()))
    } else {
        None
    }
}

/// Pick a display colour for a line that the feed left uncoloured.
pub fn derive_color(key: &LineKey, id: LineId) -> String {
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == key.as_str())
        .map(|(_, color)| (*color).to_string())
        .unwrap_or_else(|| {
            DEFAULT_PALETTE[id.get() as usize % DEFAULT_PALETTE.len()].to_string()
        })
}

/// A metro line.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub id: LineId,

    /// Display name as given by the feed.
    pub name: String,

    /// Display colour, `#RRGGBB`.
    pub color: String,

    /// Canonical identity used for interchange detection.
    pub key: LineKey,
}

impl Line {
    /// Create a line, deriving its key from the name.
    ///
    /// An invalid or empty `color` falls back to [`derive_color`].
    pub fn new(id: LineId, name: impl Into<String>, color: &str) -> Self {
        let name = name.into();
        let key = LineKey::from_name(&name);
        let color = normalize_color(color).unwrap_or_else(|| derive_color(&key, id));
        Self {
            id,
            name,
            color,
            key,
        }
    }

    /// Create a line for a route with no name. It is labelled `Line {id}`
    /// and never treated as the same physical line as any other route.
    pub fn unnamed(id: LineId, color: &str) -> Self {
        let key = LineKey::for_unnamed_route(id);
        let color = normalize_color(color).unwrap_or_else(|| derive_color(&key, id));
        Self {
            id,
            name: format!("Line {id}"),
            color,
            key,
        }
    }

    /// Whether `self` and `other` are the same physical line.
    pub fn same_line_as(&self, other: &Line) -> bool {
        self.id == other.id || self.key == other.key
    }
}
