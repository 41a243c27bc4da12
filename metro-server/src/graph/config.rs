//! Graph build configuration.

/// Parameters for deriving hop times and building the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildConfig {
    /// Assumed average train speed for hops without schedule data (km/h).
    pub average_speed_kmh: f64,

    /// Lower bound on any estimated hop time (seconds).
    /// Dwell and acceleration dominate very short hops.
    pub min_hop_secs: u32,

    /// Use `stop_times.txt` deltas for hop times when they exist.
    pub prefer_schedule: bool,
}

impl BuildConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(average_speed_kmh: f64, min_hop_secs: u32, prefer_schedule: bool) -> Self {
        Self {
            average_speed_kmh,
            min_hop_secs,
            prefer_schedule,
        }
    }

    /// Estimated travel time for a hop of `meters` without schedule data.
    pub fn fallback_hop_secs(&self, meters: u32) -> u32 {
        let speed_mps = self.average_speed_kmh * 1000.0 / 3600.0;
        let estimate = if speed_mps > 0.0 {
            (f64::from(meters) / speed_mps).round() as u32
        } else {
            0
        };
        estimate.max(self.min_hop_secs)
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            average_speed_kmh: 33.0,
            min_hop_secs: 90,
            prefer_schedule: true,
        }
    }
}
