//! Cost models for path search.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown cost model name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown cost model '{0}' (expected 'distance' or 'time')")]
pub struct InvalidCostModel(String);

/// The scalar minimised by a path query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostModel {
    /// Physical distance in metres. No interchange penalty.
    #[default]
    Distance,

    /// Estimated travel time in seconds, including interchange penalties.
    Time,
}

impl FromStr for CostModel {
    type Err = InvalidCostModel;

    /// Accepts `distance`/`shortest` and `time`/`fastest`, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "distance" | "shortest" => Ok(CostModel::Distance),
            "time" | "fastest" => Ok(CostModel::Time),
            _ => Err(InvalidCostModel(s.to_string())),
        }
    }
}

impl fmt::Display for CostModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostModel::Distance => f.write_str("distance"),
            CostModel::Time => f.write_str("time"),
        }
    }
}
