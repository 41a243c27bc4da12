//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::RouteCacheConfig;
use crate::graph::BuildConfig;
use crate::planner::PathConfig;

pub const FEED_DIR_VAR: &str = "METRO_FEED_DIR";
pub const ADDR_VAR: &str = "METRO_ADDR";
pub const RELOAD_SECS_VAR: &str = "METRO_RELOAD_SECS";
pub const PENALTY_SECS_VAR: &str = "METRO_INTERCHANGE_PENALTY_SECS";

const DEFAULT_FEED_DIR: &str = "data";
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// A configuration variable that couldn't be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: invalid socket address '{value}'")]
    InvalidAddr { var: &'static str, value: String },

    #[error("{var}: expected a whole number of seconds, got '{value}'")]
    InvalidSeconds { var: &'static str, value: String },
}

/// Everything the server binary needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory holding the GTFS-style feed.
    pub feed_dir: PathBuf,

    pub addr: SocketAddr,

    /// How often to rebuild the graph from disk. `None` disables reloading.
    pub reload_interval: Option<Duration>,

    pub build: BuildConfig,
    pub path: PathConfig,
    pub cache: RouteCacheConfig,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`; unset or blank variables take
    /// their defaults.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let feed_dir = get(FEED_DIR_VAR).unwrap_or_else(|| DEFAULT_FEED_DIR.to_string());

        let addr = get(ADDR_VAR).unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr: SocketAddr = addr.trim().parse().map_err(|_| ConfigError::InvalidAddr {
            var: ADDR_VAR,
            value: addr.clone(),
        })?;

        let reload_interval = match get(RELOAD_SECS_VAR) {
            Some(value) => match parse_secs(RELOAD_SECS_VAR, &value)? {
                0 => None,
                secs => Some(Duration::from_secs(u64::from(secs))),
            },
            None => None,
        };

        let path = match get(PENALTY_SECS_VAR) {
            Some(value) => PathConfig::new(parse_secs(PENALTY_SECS_VAR, &value)?),
            None => PathConfig::default(),
        };

        Ok(Self {
            feed_dir: PathBuf::from(feed_dir),
            addr,
            reload_interval,
            build: BuildConfig::default(),
            path,
            cache: RouteCacheConfig::default(),
        })
    }
}

fn parse_secs(var: &'static str, value: &str) -> Result<u32, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidSeconds {
        var,
        value: value.to_string(),
    })
}
