//! Domain types for the metro route planner.
//!
//! This module contains the value types shared by the graph builder, the
//! path engine and the presenter. Identifiers enforce their invariants at
//! construction time, so code that receives them can trust their validity.

mod cost;
mod geo;
mod line;
mod station;

pub use cost::{CostModel, InvalidCostModel};
pub use geo::GeoPoint;
pub use line::{Line, LineId, LineKey, derive_color, normalize_color};
pub use station::{InvalidStationId, Station, StationId};
