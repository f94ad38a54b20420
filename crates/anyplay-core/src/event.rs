//! Normalized playback events
//!
//! Every backend translates its native callbacks into [`EngineEvent`]s
//! (see [`crate::engine`]); the adapter turns those into the [`PlayerEvent`]
//! channel below. Observers receive events synchronously and in order on
//! the control thread.

use crate::session::{LoadState, PlayState, PresentationSize};
use crate::time::MediaTime;
use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

/// Backend-independent playback event delivered to registered observers
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PlayerEvent {
    /// Prepare started for the given asset.
    PreparingToPlay { url: Url },

    /// Engine finished preparing the given asset.
    ReadyToPlay { url: Url },

    /// Lifecycle state was written (fires on every write, changed or not).
    PlayStateChanged { state: PlayState },

    /// Load-state bitset was written.
    LoadStateChanged { state: LoadState },

    /// Position or duration moved.
    TimeChanged {
        current: MediaTime,
        total: MediaTime,
    },

    /// Buffered position moved.
    BufferChanged { buffered: MediaTime },

    /// Decoded video dimensions changed.
    SizeChanged { size: PresentationSize },

    /// Playback reached the end of the asset.
    PlaybackEnded,

    /// Native playback failure, normalized.
    PlaybackFailed { error: PlaybackError },
}

/// Normalized native playback failure
///
/// Carries the backend error domain plus whatever diagnostic fields the
/// vendor supplied, as a generic key-to-value bag.
#[derive(Debug, Clone, Serialize)]
pub struct PlaybackError {
    /// Backend name, e.g. `"cloudvod"`.
    pub domain: &'static str,
    /// Vendor error code.
    pub code: i64,
    /// Vendor error message.
    pub message: String,
    /// Extra vendor context (request ids, video ids, raw params).
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub details: Map<String, Value>,
}

impl std::fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {} ({})", self.domain, self.message, self.code)
    }
}

impl std::error::Error for PlaybackError {}

/// Registered event observer; invoked synchronously on the control thread.
pub type Observer = Box<dyn FnMut(&PlayerEvent)>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_tagged() {
        let event = PlayerEvent::BufferChanged {
            buffered: MediaTime::from_millis(1500),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "buffer_changed");
        assert_eq!(json["buffered"], 1500);
    }

    #[test]
    fn test_playback_error_display() {
        let error = PlaybackError {
            domain: "cloudvod",
            code: 404,
            message: "not found".into(),
            details: Map::new(),
        };
        assert_eq!(error.to_string(), "[cloudvod] not found (404)");
    }
}
