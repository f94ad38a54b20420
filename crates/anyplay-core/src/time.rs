//! Millisecond-precision media time

use serde::{Deserialize, Serialize};

/// A non-negative media duration or position with millisecond precision.
///
/// Engines report positions in milliseconds; hosts mostly consume seconds.
/// A zero total duration means "duration unknown" throughout the crate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaTime(u64);

impl MediaTime {
    /// The zero time, also the reset value for all timing fields.
    pub const ZERO: MediaTime = MediaTime(0);

    /// Create from milliseconds; negative values clamp to zero.
    pub fn from_millis(millis: i64) -> Self {
        Self(millis.max(0) as u64)
    }

    /// Create from fractional seconds; negative or non-finite values clamp to zero.
    pub fn from_secs(secs: f64) -> Self {
        if !secs.is_finite() || secs <= 0.0 {
            return Self::ZERO;
        }
        Self((secs * 1000.0).round() as u64)
    }

    /// Whole milliseconds.
    pub fn millis(self) -> u64 {
        self.0
    }

    /// Fractional seconds.
    pub fn as_secs(self) -> f64 {
        self.0 as f64 * 0.001
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for MediaTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}s", self.as_secs())
    }
}
