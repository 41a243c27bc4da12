//! Path search configuration.

/// Configuration parameters for path search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathConfig {
    /// Time charged for each change between physical lines (seconds).
    /// Only the time model adds it to the search cost; reported travel
    /// times always include it.
    pub interchange_penalty_secs: u32,
}

impl PathConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(interchange_penalty_secs: u32) -> Self {
        Self {
            interchange_penalty_secs,
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            interchange_penalty_secs: 480, // 8 minutes
        }
    }
}
