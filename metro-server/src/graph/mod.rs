//! The metro network graph.
//!
//! [`build`] turns a feed into an immutable [`MetroGraph`]; [`GraphBuilder`]
//! does the same from code. Lookups by name, line membership and interchange
//! detection are answered by the graph itself.

mod builder;
mod config;
mod edge;
mod fallback;
mod index;
mod load;
mod network;

pub use builder::{GraphBuilder, GraphError, TripStop};
pub use config::BuildConfig;
pub use edge::Edge;
pub use fallback::FALLBACK_LINE_NAME;
pub use load::{build, build_from_raw};
pub use network::MetroGraph;
