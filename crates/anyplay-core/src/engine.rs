//! Native engine boundary
//!
//! Everything genuinely vendor-specific lives behind [`Engine`] and
//! [`Backend`]. The adapter drives an engine through the operation set
//! below and receives [`EngineEvent`]s back through an [`EventSink`];
//! backend modules own the static tables that translate vendor callbacks
//! into that event set.

use crate::bounds::{Rate, Volume};
use crate::session::ScalingMode;
use crate::time::MediaTime;
use bytes::Bytes;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::sync::Arc;

/// One-time native engine configuration
///
/// Network timeout/retry policy is delegated to the engine; the adapter
/// itself enforces no timeouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Network timeout in milliseconds.
    pub timeout_ms: u64,
    /// Retry count on network timeout; each retry waits `timeout_ms`.
    pub retry_count: u32,
    /// Maximum buffer ahead of the playhead, in milliseconds.
    pub buffer_size_ms: u64,
    /// Interval between progress callbacks, in milliseconds.
    pub progress_interval_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            retry_count: 3,
            buffer_size_ms: 30_000,
            progress_interval_ms: 500,
        }
    }
}

/// Seek positioning mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeekMode {
    /// Frame-accurate positioning.
    Accurate,
    /// Nearest keyframe.
    Fast,
}

/// Native render-mode value as the vendor SDK encodes it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderMode(pub i32);

/// How volume writes reach the audio output for a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeRoute {
    /// The engine controls its own output volume.
    Native,
    /// The engine cannot; writes go through the OS volume side-channel.
    SystemOverlay,
}

/// Diagnostic payload of a native failure, pre-normalization
#[derive(Debug, Clone)]
pub struct EngineFault {
    pub code: i64,
    pub message: String,
    /// Vendor context (request ids, video ids, raw params).
    pub details: Map<String, Value>,
}

impl EngineFault {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Map::new(),
        }
    }
}

/// Event emitted by a backend's translation layer
///
/// This is the complete normalized vocabulary; vendor callbacks with no
/// entry here are dropped by the translation tables.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// Engine finished preparing the asset.
    Prepared,
    /// First video frame rendered.
    FirstFrame,
    /// Buffering started.
    LoadingStart,
    /// Buffering ended.
    LoadingEnd,
    /// A previously issued seek landed.
    SeekCompleted,
    /// Periodic position/duration tick.
    Progress,
    /// Decoded video dimensions known.
    VideoSize { width: u32, height: u32 },
    /// Playback reached the end of the asset.
    Completed,
    /// An earlier thumbnail request resolved.
    Thumbnail(Bytes),
    /// Terminal native failure.
    Error(EngineFault),
}

/// Cross-thread funnel for engine events
///
/// Native callbacks may arrive on arbitrary threads; sinks only enqueue.
/// The adapter drains the queue on the control thread before any event
/// touches session state, preserving arrival order.
#[derive(Clone, Default)]
pub struct EventSink {
    queue: Arc<Mutex<VecDeque<EngineEvent>>>,
}

impl EventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue an event; safe from any thread.
    pub fn emit(&self, event: EngineEvent) {
        self.queue.lock().push_back(event);
    }

    /// Take all queued events, oldest first. Normally called only by the
    /// adapter's drive loop.
    pub fn drain(&self) -> Vec<EngineEvent> {
        self.queue.lock().drain(..).collect()
    }

    /// Number of undelivered events.
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }
}

/// Operation surface of one native playback engine
///
/// Implementations wrap a vendor SDK handle. All methods are called on the
/// control thread; the engine reports back through the [`EventSink`] it was
/// constructed with.
pub trait Engine {
    fn set_volume(&mut self, volume: Volume);
    fn set_rate(&mut self, rate: Rate);
    fn set_muted(&mut self, muted: bool);
    fn set_render_mode(&mut self, mode: RenderMode);

    /// Bind the asset and begin preparation.
    fn load(&mut self, url: &url::Url);
    fn resume(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    fn seek(&mut self, to: MediaTime, mode: SeekMode);
    /// Release all native resources. The handle is unusable afterwards.
    fn destroy(&mut self);

    fn position(&self) -> MediaTime;
    /// Zero while the duration is unknown.
    fn duration(&self) -> MediaTime;
    fn buffered(&self) -> MediaTime;

    /// Ask the engine for a frame capture; resolves via
    /// [`EngineEvent::Thumbnail`].
    fn request_thumbnail(&mut self, at: MediaTime);

    fn supports_picture_in_picture(&self) -> bool {
        false
    }
    fn set_picture_in_picture(&mut self, _active: bool) {}
}

/// One backend variant: engine construction plus the constants and static
/// tables that genuinely differ between vendors.
pub trait Backend {
    type Engine: Engine;

    /// Backend name; doubles as the error domain.
    const NAME: &'static str;
    /// Whether prepare should immediately start playback by default.
    const DEFAULT_AUTOPLAY: bool;
    /// How volume writes reach the output.
    const VOLUME_ROUTE: VolumeRoute;
    /// Whether the vendor SDK has picture-in-picture at all.
    const SUPPORTS_PIP: bool;

    /// Static scaling-mode translation table.
    fn render_mode(mode: ScalingMode) -> RenderMode;

    /// Engine configuration applied once at construction.
    fn engine_config() -> EngineConfig {
        EngineConfig::default()
    }

    /// Construct a fresh engine bound to `sink`. `None` means native
    /// construction failed; the adapter logs and carries on unprepared.
    fn create_engine(&mut self, config: &EngineConfig, sink: EventSink) -> Option<Self::Engine>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_preserves_order() {
        let sink = EventSink::new();
        sink.emit(EngineEvent::Prepared);
        sink.emit(EngineEvent::FirstFrame);
        assert_eq!(sink.pending(), 2);

        let events = sink.drain();
        assert!(matches!(events[0], EngineEvent::Prepared));
        assert!(matches!(events[1], EngineEvent::FirstFrame));
        assert_eq!(sink.pending(), 0);
    }

    #[test]
    fn test_sink_is_shared() {
        let sink = EventSink::new();
        let clone = sink.clone();
        clone.emit(EngineEvent::Completed);
        assert_eq!(sink.pending(), 1);
    }
}
