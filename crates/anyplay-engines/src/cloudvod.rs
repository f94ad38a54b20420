//! Cloud VOD backend
//!
//! Delegate-style VOD SDK: one typed player-event callback plus dedicated
//! callbacks for errors, video size, position/buffer updates, and thumbnail
//! capture. Faults arrive as a structured error model carrying request and
//! video identifiers, which are preserved in the normalized detail bag.

use crate::EngineFactory;
use anyplay_core::{
    Backend, Engine, EngineConfig, EngineEvent, EngineFault, EventSink, RenderMode, ScalingMode,
    VolumeRoute,
};
use bytes::Bytes;
use serde_json::{Map, Value};

/// Player events the vendor delegate reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudVodEvent {
    PrepareDone,
    FirstRenderedStart,
    LoadingStart,
    LoadingEnd,
    SeekEnd,
    Completion,
}

/// Static translation table for the player-event callback.
pub fn translate(event: CloudVodEvent) -> EngineEvent {
    match event {
        CloudVodEvent::PrepareDone => EngineEvent::Prepared,
        CloudVodEvent::FirstRenderedStart => EngineEvent::FirstFrame,
        CloudVodEvent::LoadingStart => EngineEvent::LoadingStart,
        CloudVodEvent::LoadingEnd => EngineEvent::LoadingEnd,
        CloudVodEvent::SeekEnd => EngineEvent::SeekCompleted,
        CloudVodEvent::Completion => EngineEvent::Completed,
    }
}

/// The vendor's structured failure payload.
#[derive(Debug, Clone, Default)]
pub struct CloudVodErrorModel {
    pub code: i64,
    pub message: String,
    pub extra: String,
    pub request_id: String,
    pub video_id: String,
}

impl CloudVodErrorModel {
    /// Normalize into an engine fault, keeping the vendor identifiers as
    /// detail-bag entries. Empty fields are omitted.
    pub fn into_fault(self) -> EngineFault {
        let mut details = Map::new();
        for (key, value) in [
            ("extra", self.extra),
            ("request_id", self.request_id),
            ("video_id", self.video_id),
        ] {
            if !value.is_empty() {
                details.insert(key.to_string(), Value::String(value));
            }
        }
        EngineFault {
            code: self.code,
            message: self.message,
            details,
        }
    }
}

/// Callback surface the vendor delegate bindings report into.
pub struct CloudVodCallbacks {
    sink: EventSink,
}

impl CloudVodCallbacks {
    pub fn new(sink: EventSink) -> Self {
        Self { sink }
    }

    pub fn on_player_event(&self, event: CloudVodEvent) {
        self.sink.emit(translate(event));
    }

    pub fn on_error(&self, model: CloudVodErrorModel) {
        self.sink.emit(EngineEvent::Error(model.into_fault()));
    }

    pub fn on_video_size_changed(&self, width: u32, height: u32) {
        self.sink.emit(EngineEvent::VideoSize { width, height });
    }

    pub fn on_current_position_update(&self) {
        self.sink.emit(EngineEvent::Progress);
    }

    /// Buffered-position ticks carry no extra information for the driver,
    /// which reads the buffered position straight off the engine during
    /// loading transitions. Dropped.
    pub fn on_buffered_position_update(&self) {}

    pub fn on_thumbnail_captured(&self, image: Bytes) {
        self.sink.emit(EngineEvent::Thumbnail(image));
    }
}

/// The cloud VOD backend.
pub struct CloudVod<E: Engine> {
    factory: EngineFactory<E>,
}

impl<E: Engine> CloudVod<E> {
    pub fn new(factory: EngineFactory<E>) -> Self {
        Self { factory }
    }
}

impl<E: Engine> Backend for CloudVod<E> {
    type Engine = E;

    const NAME: &'static str = "cloudvod";
    const DEFAULT_AUTOPLAY: bool = true;
    const VOLUME_ROUTE: VolumeRoute = VolumeRoute::Native;
    const SUPPORTS_PIP: bool = true;

    fn render_mode(mode: ScalingMode) -> RenderMode {
        // Vendor scaling enum: 0 stretch-to-fill, 1 aspect-fit, 2 aspect-fill.
        match mode {
            ScalingMode::Fit => RenderMode(1),
            ScalingMode::Fill => RenderMode(2),
            ScalingMode::None => RenderMode(0),
        }
    }

    fn engine_config() -> EngineConfig {
        EngineConfig {
            timeout_ms: 2_000,
            retry_count: 2,
            ..EngineConfig::default()
        }
    }

    fn create_engine(&mut self, config: &EngineConfig, sink: EventSink) -> Option<E> {
        (self.factory)(config, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_table() {
        assert!(matches!(
            translate(CloudVodEvent::PrepareDone),
            EngineEvent::Prepared
        ));
        assert!(matches!(
            translate(CloudVodEvent::FirstRenderedStart),
            EngineEvent::FirstFrame
        ));
        assert!(matches!(
            translate(CloudVodEvent::SeekEnd),
            EngineEvent::SeekCompleted
        ));
        assert!(matches!(
            translate(CloudVodEvent::Completion),
            EngineEvent::Completed
        ));
    }

    #[test]
    fn test_error_model_keeps_vendor_ids() {
        let fault = CloudVodErrorModel {
            code: 537198592,
            message: "source load failed".into(),
            extra: "http 403".into(),
            request_id: "req-9".into(),
            video_id: "vid-3".into(),
        }
        .into_fault();

        assert_eq!(fault.code, 537198592);
        assert_eq!(fault.details["extra"], "http 403");
        assert_eq!(fault.details["request_id"], "req-9");
        assert_eq!(fault.details["video_id"], "vid-3");
    }

    #[test]
    fn test_error_model_omits_empty_fields() {
        let fault = CloudVodErrorModel {
            code: 1,
            message: "broken".into(),
            ..CloudVodErrorModel::default()
        }
        .into_fault();
        assert!(fault.details.is_empty());
    }

    #[test]
    fn test_timeout_config() {
        let config = <CloudVod<crate::testing::NullEngine> as Backend>::engine_config();
        assert_eq!(config.timeout_ms, 2_000);
        assert_eq!(config.retry_count, 2);
    }
}
