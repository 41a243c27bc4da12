//! Route presentation: station names, lines, interchanges, time and fare.

mod fare;
mod outcome;
mod route;

pub use fare::{FareTable, FareTableError};
pub use outcome::{RouteOutcome, SUGGESTION_LIMIT};
pub use route::{Path, present};
