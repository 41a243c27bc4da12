//! Synthetic line ordering for feeds without usable trip data.
//!
//! Each line is given a contiguous run of stations sorted along its own
//! axis through the network, so lines cross each other and the result stays
//! routable. The ordering is only plausible, not real; graphs built this way
//! are flagged as degraded.

use std::collections::HashSet;
use std::f64::consts::PI;

use crate::domain::Station;

/// Name of the line created when the feed has none.
pub const FALLBACK_LINE_NAME: &str = "Fallback Line";

/// Stations beyond the even share each line window gets.
const WINDOW_PADDING: usize = 5;

/// Station positions per line, plus an optional chain over every station
/// to attach to the first line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FallbackPlan {
    pub windows: Vec<Vec<usize>>,
    pub chain: Option<Vec<usize>>,
}

/// Station positions sorted by projection onto an axis at `angle` radians
/// from east. Ties go to the smaller station id.
pub(crate) fn axis_order(stations: &[Station], angle: f64) -> Vec<usize> {
    let (sin, cos) = angle.sin_cos();
    let projection = |s: &Station| s.location.lon * cos + s.location.lat * sin;

    let mut order: Vec<usize> = (0..stations.len()).collect();
    order.sort_by(|&a, &b| {
        projection(&stations[a])
            .total_cmp(&projection(&stations[b]))
            .then(stations[a].id.cmp(&stations[b].id))
    });
    order
}

/// Plan synthetic sequences for `line_count` lines.
///
/// Line `k` takes a window of `n / (L + 1) + 5` stations from its axis
/// ordering (axis rotated by `k * PI / L`), starting at `n * (k mod 3) / 6`.
pub(crate) fn plan(stations: &[Station], line_count: usize) -> FallbackPlan {
    let n = stations.len();
    if n == 0 || line_count == 0 {
        return FallbackPlan {
            windows: vec![Vec::new(); line_count],
            chain: None,
        };
    }

    let size = (n / (line_count + 1) + WINDOW_PADDING).min(n);
    let mut covered = HashSet::new();
    let mut windows = Vec::with_capacity(line_count);

    for k in 0..line_count {
        let angle = k as f64 * PI / line_count as f64;
        let order = axis_order(stations, angle);

        let start = (n * (k % 3) / 6).min(n - size);
        let window = order[start..start + size].to_vec();
        if window.len() >= 2 {
            covered.extend(window.iter().copied());
        }
        windows.push(window);
    }

    let chain = (covered.len() < n).then(|| axis_order(stations, 0.0));

    FallbackPlan { windows, chain }
}
