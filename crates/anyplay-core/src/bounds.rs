//! Bounded playback properties
//!
//! Volume and rate are clamped at construction so no code path, including
//! deserialization, can observe an out-of-range value. The bounds are
//! independent of whatever range the native engine accepts.

use serde::{Deserialize, Serialize};

/// Playback volume clamped to `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct Volume(f32);

impl Volume {
    pub const MIN: f32 = 0.0;
    pub const MAX: f32 = 1.0;

    /// Create a volume, clamping into range. NaN clamps to the minimum.
    pub fn new(value: f32) -> Self {
        Self(value.max(Self::MIN).min(Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(1.0)
    }
}

impl From<f32> for Volume {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<Volume> for f32 {
    fn from(value: Volume) -> Self {
        value.0
    }
}

/// Playback rate clamped to `[0.5, 2.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct Rate(f32);

impl Rate {
    pub const MIN: f32 = 0.5;
    pub const MAX: f32 = 2.0;

    /// Create a rate, clamping into range. NaN clamps to the minimum.
    pub fn new(value: f32) -> Self {
        Self(value.max(Self::MIN).min(Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Self(1.0)
    }
}

impl From<f32> for Rate {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<Rate> for f32 {
    fn from(value: Rate) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_clamps() {
        assert_eq!(Volume::new(-1.0).get(), 0.0);
        assert_eq!(Volume::new(0.5).get(), 0.5);
        assert_eq!(Volume::new(1.5).get(), 1.0);
        assert_eq!(Volume::new(f32::NAN).get(), 0.0);
    }

    #[test]
    fn test_rate_clamps() {
        assert_eq!(Rate::new(0.0).get(), 0.5);
        assert_eq!(Rate::new(1.25).get(), 1.25);
        assert_eq!(Rate::new(16.0).get(), 2.0);
        assert_eq!(Rate::default().get(), 1.0);
    }
}
