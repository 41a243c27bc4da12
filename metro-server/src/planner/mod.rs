//! Shortest path search over the metro graph.
//!
//! [`PathEngine`] runs Dijkstra over (station, line) states for both cost
//! models. It returns a [`RawPath`] of dense hops; turning that into a
//! user-facing route is the job of [`crate::present`].

mod config;
mod search;

pub use config::PathConfig;
pub use search::{Hop, PathEngine, QueryError, RawPath};
