//! Distance-based fare estimates.

/// Error returned when constructing an inconsistent fare table.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FareTableError {
    /// A breakpoint is negative or not a finite number
    #[error("fare bucket {index} has invalid distance limit {max_km}")]
    InvalidBreakpoint { index: usize, max_km: f64 },

    /// Breakpoints must strictly increase
    #[error("fare bucket {index} does not extend past the previous bucket")]
    UnsortedBreakpoints { index: usize },

    /// Fares must not decrease with distance
    #[error("fare bucket {index} is cheaper than the previous bucket")]
    DecreasingFare { index: usize },

    /// The fare beyond the last bucket must not be cheaper than the last bucket
    #[error("fare above the last bucket is cheaper than the last bucket")]
    DecreasingAbove,
}

/// Step function from journey distance to fare.
///
/// Each bucket `(max_km, fare)` applies to distances up to and including
/// `max_km`; anything longer than the last bucket pays `above`.
///
/// # Examples
///
/// ```
/// use metro_server::present::FareTable;
///
/// let fares = FareTable::delhi();
/// assert_eq!(fares.fare_for_km(1.5), 10);
/// assert_eq!(fares.fare_for_km(2.0), 10);
/// assert_eq!(fares.fare_for_km(2.1), 20);
/// assert_eq!(fares.fare_for_km(40.0), 60);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FareTable {
    buckets: Vec<(f64, u32)>,
    above: u32,
}

impl FareTable {
    /// Create a table, rejecting unsorted breakpoints and decreasing fares.
    pub fn new(buckets: Vec<(f64, u32)>, above: u32) -> Result<Self, FareTableError> {
        for (index, &(max_km, fare)) in buckets.iter().enumerate() {
            if !max_km.is_finite() || max_km < 0.0 {
                return Err(FareTableError::InvalidBreakpoint { index, max_km });
            }
            if index > 0 {
                let (prev_km, prev_fare) = buckets[index - 1];
                if max_km <= prev_km {
                    return Err(FareTableError::UnsortedBreakpoints { index });
                }
                if fare < prev_fare {
                    return Err(FareTableError::DecreasingFare { index });
                }
            }
        }
        if buckets.last().is_some_and(|&(_, fare)| above < fare) {
            return Err(FareTableError::DecreasingAbove);
        }
        Ok(Self { buckets, above })
    }

    /// Delhi Metro distance slabs.
    pub fn delhi() -> Self {
        Self {
            buckets: vec![(2.0, 10), (5.0, 20), (12.0, 30), (21.0, 40), (32.0, 50)],
            above: 60,
        }
    }

    /// Fare for a journey of `km` kilometres.
    pub fn fare_for_km(&self, km: f64) -> u32 {
        let km = if km.is_nan() { 0.0 } else { km };
        self.buckets
            .iter()
            .find(|&&(max_km, _)| km <= max_km)
            .map_or(self.above, |&(_, fare)| fare)
    }

    pub fn buckets(&self) -> &[(f64, u32)] {
        &self.buckets
    }

    /// Fare beyond the last bucket.
    pub fn above(&self) -> u32 {
        self.above
    }
}

impl Default for FareTable {
    fn default() -> Self {
        Self::delhi()
    }
}
