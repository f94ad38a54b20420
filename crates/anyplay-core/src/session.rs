//! Playback session state
//!
//! One [`PlaybackSession`] exists per adapter instance. It is owned
//! exclusively by the adapter and mutated only on the control thread; it
//! carries no internal locking.

use crate::bounds::{Rate, Volume};
use crate::time::MediaTime;
use serde::{Deserialize, Serialize};
use std::ops::{BitOr, BitOrAssign};
use url::Url;
use uuid::Uuid;

/// Unique identifier for a playback session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Playback lifecycle state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayState {
    #[default]
    Unknown,
    Playing,
    Paused,
    Stopped,
    Failed,
}

impl std::fmt::Display for PlayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayState::Unknown => write!(f, "unknown"),
            PlayState::Playing => write!(f, "playing"),
            PlayState::Paused => write!(f, "paused"),
            PlayState::Stopped => write!(f, "stopped"),
            PlayState::Failed => write!(f, "failed"),
        }
    }
}

/// Buffering/readiness bitset, distinct from [`PlayState`].
///
/// A set rather than an enum: a session can be prepared and stalled at the
/// same time. The empty value is the reset state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadState(u8);

impl LoadState {
    /// The empty (reset) value.
    pub const NONE: LoadState = LoadState(0);
    /// Engine constructed and prepare issued.
    pub const PREPARED: LoadState = LoadState(1 << 0);
    /// Buffering with nothing to render.
    pub const STALLED: LoadState = LoadState(1 << 1);
    /// Enough buffered to play through.
    pub const PLAYTHROUGH: LoadState = LoadState(1 << 2);

    pub fn contains(self, other: LoadState) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for LoadState {
    type Output = LoadState;

    fn bitor(self, rhs: LoadState) -> LoadState {
        LoadState(self.0 | rhs.0)
    }
}

impl BitOrAssign for LoadState {
    fn bitor_assign(&mut self, rhs: LoadState) {
        self.0 |= rhs.0;
    }
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        let mut first = true;
        for (bit, name) in [
            (LoadState::PREPARED, "prepared"),
            (LoadState::STALLED, "stalled"),
            (LoadState::PLAYTHROUGH, "playthrough"),
        ] {
            if self.contains(bit) {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{name}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// How decoded video is fitted into the rendering surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingMode {
    /// Preserve aspect ratio, letterbox as needed.
    Fit,
    /// Preserve aspect ratio, crop to fill.
    #[default]
    Fill,
    /// Stretch without preserving aspect ratio.
    None,
}

/// Width/height of the decoded video, zero until known
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresentationSize {
    pub width: u32,
    pub height: u32,
}

impl PresentationSize {
    pub const ZERO: PresentationSize = PresentationSize { width: 0, height: 0 };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_zero(self) -> bool {
        self.width == 0 && self.height == 0
    }
}

impl std::fmt::Display for PresentationSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Mutable playback state, one per adapter instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackSession {
    /// Session identifier used in logs.
    pub id: SessionId,
    /// The active media source; setting it triggers stop-then-prepare.
    pub asset_url: Option<Url>,
    pub play_state: PlayState,
    pub load_state: LoadState,
    pub current_time: MediaTime,
    /// Zero means duration unknown.
    pub total_time: MediaTime,
    pub buffer_time: MediaTime,
    /// Seek requested before the engine could service it; consumed once applied.
    pub pending_seek: MediaTime,
    pub is_prepared: bool,
    pub is_playing: bool,
    pub is_muted: bool,
    pub should_autoplay: bool,
    pub volume: Volume,
    pub rate: Rate,
    pub scaling_mode: ScalingMode,
    pub presentation_size: PresentationSize,
    /// Distinguishes initial buffering from re-buffering; gates load-state
    /// transitions only.
    pub is_first_buffering: bool,
}

impl PlaybackSession {
    pub fn new(should_autoplay: bool) -> Self {
        Self {
            id: SessionId::new(),
            asset_url: None,
            play_state: PlayState::Unknown,
            load_state: LoadState::NONE,
            current_time: MediaTime::ZERO,
            total_time: MediaTime::ZERO,
            buffer_time: MediaTime::ZERO,
            pending_seek: MediaTime::ZERO,
            is_prepared: false,
            is_playing: false,
            is_muted: false,
            should_autoplay,
            volume: Volume::default(),
            rate: Rate::default(),
            scaling_mode: ScalingMode::default(),
            presentation_size: PresentationSize::ZERO,
            is_first_buffering: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_state_is_a_set() {
        let mut state = LoadState::NONE;
        assert!(state.is_empty());

        state |= LoadState::PREPARED;
        state |= LoadState::STALLED;
        assert!(state.contains(LoadState::PREPARED));
        assert!(state.contains(LoadState::STALLED));
        assert!(!state.contains(LoadState::PLAYTHROUGH));

        state = LoadState::NONE;
        assert!(state.is_empty());
    }

    #[test]
    fn test_load_state_display() {
        assert_eq!(LoadState::NONE.to_string(), "none");
        assert_eq!(
            (LoadState::PREPARED | LoadState::PLAYTHROUGH).to_string(),
            "prepared|playthrough"
        );
    }

    #[test]
    fn test_session_defaults() {
        let session = PlaybackSession::new(true);
        assert_eq!(session.play_state, PlayState::Unknown);
        assert!(session.load_state.is_empty());
        assert!(session.total_time.is_zero());
        assert!(session.should_autoplay);
        assert_eq!(session.volume.get(), 1.0);
        assert_eq!(session.rate.get(), 1.0);
        assert!(session.presentation_size.is_zero());
    }
}
