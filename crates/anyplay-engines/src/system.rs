//! System media framework backend
//!
//! The OS-provided player. Observation-based rather than event-id-based:
//! the platform binding registers status observers, a periodic time
//! observer, and end-of-playback notifications, and forwards each as a
//! [`SystemNotification`].

use crate::EngineFactory;
use anyplay_core::{
    Backend, Engine, EngineConfig, EngineEvent, EngineFault, EventSink, RenderMode, ScalingMode,
    VolumeRoute,
};
use bytes::Bytes;

/// Observations the platform binding reports.
#[derive(Debug, Clone)]
pub enum SystemNotification {
    /// Item status moved to ready-to-play.
    StatusReadyToPlay,
    /// The render layer displayed its first frame.
    ReadyForDisplay,
    /// Playback buffer ran empty.
    BufferEmpty,
    /// Buffering recovered enough to keep up.
    LikelyToKeepUp,
    /// Periodic time observer tick.
    PeriodicTimeTick,
    /// An issued seek finished.
    SeekCompleted,
    /// Item presentation size became known or changed.
    PresentationSizeChanged { width: u32, height: u32 },
    /// The item played to its end time.
    DidPlayToEndTime,
    /// An earlier snapshot request produced image data.
    SnapshotCaptured(Bytes),
    /// Item status moved to failed.
    StatusFailed { code: i64, message: String },
}

/// Static translation table from platform observations to the normalized
/// event set.
pub fn translate(notification: SystemNotification) -> EngineEvent {
    match notification {
        SystemNotification::StatusReadyToPlay => EngineEvent::Prepared,
        SystemNotification::ReadyForDisplay => EngineEvent::FirstFrame,
        SystemNotification::BufferEmpty => EngineEvent::LoadingStart,
        SystemNotification::LikelyToKeepUp => EngineEvent::LoadingEnd,
        SystemNotification::PeriodicTimeTick => EngineEvent::Progress,
        SystemNotification::SeekCompleted => EngineEvent::SeekCompleted,
        SystemNotification::PresentationSizeChanged { width, height } => {
            EngineEvent::VideoSize { width, height }
        }
        SystemNotification::DidPlayToEndTime => EngineEvent::Completed,
        SystemNotification::SnapshotCaptured(image) => EngineEvent::Thumbnail(image),
        SystemNotification::StatusFailed { code, message } => {
            EngineEvent::Error(EngineFault::new(code, message))
        }
    }
}

/// Callback surface the platform observer registrations report into.
pub struct SystemCallbacks {
    sink: EventSink,
}

impl SystemCallbacks {
    pub fn new(sink: EventSink) -> Self {
        Self { sink }
    }

    pub fn notify(&self, notification: SystemNotification) {
        self.sink.emit(translate(notification));
    }
}

/// The system framework backend.
pub struct System<E: Engine> {
    factory: EngineFactory<E>,
}

impl<E: Engine> System<E> {
    pub fn new(factory: EngineFactory<E>) -> Self {
        Self { factory }
    }
}

impl<E: Engine> Backend for System<E> {
    type Engine = E;

    const NAME: &'static str = "system";
    const DEFAULT_AUTOPLAY: bool = true;
    const VOLUME_ROUTE: VolumeRoute = VolumeRoute::Native;
    const SUPPORTS_PIP: bool = true;

    fn render_mode(mode: ScalingMode) -> RenderMode {
        // Layer video gravity: 0 stretch, 1 aspect, 2 aspect-fill.
        match mode {
            ScalingMode::Fit => RenderMode(1),
            ScalingMode::Fill => RenderMode(2),
            ScalingMode::None => RenderMode(0),
        }
    }

    fn create_engine(&mut self, config: &EngineConfig, sink: EventSink) -> Option<E> {
        (self.factory)(config, sink)
    }
}
