//! Web layer for the metro route planner.
//!
//! Provides JSON endpoints for station lookup and path finding.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
