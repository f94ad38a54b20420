//! Lite VOD backend
//!
//! Integer-event-id VOD SDK: every native notification arrives through one
//! `on_play_event(id, params)` channel, including errors, which occupy the
//! negative id space. Fatality is a fixed id set, not a code range.

use crate::EngineFactory;
use anyplay_core::{
    Backend, Engine, EngineConfig, EngineEvent, EngineFault, EventSink, RenderMode, ScalingMode,
    VolumeRoute,
};
use serde_json::{Map, Value};

/// Vendor event ids.
pub mod event_id {
    /// First video frame received.
    pub const FIRST_VIDEO_FRAME: i32 = 2003;
    /// Playback started.
    pub const PLAY_BEGIN: i32 = 2004;
    /// Progress tick.
    pub const PLAY_PROGRESS: i32 = 2005;
    /// Playback reached the end.
    pub const PLAY_END: i32 = 2006;
    /// Buffering started.
    pub const PLAY_LOADING: i32 = 2007;
    /// Video resolution known or changed.
    pub const RESOLUTION_CHANGED: i32 = 2009;
    /// Asset prepared.
    pub const VOD_PREPARED: i32 = 2013;
    /// Buffering ended.
    pub const VOD_LOADING_END: i32 = 2014;
    /// A previously issued seek finished.
    pub const SEEK_COMPLETE: i32 = 2019;

    /// Network dropped and reconnection retries were exhausted.
    pub const ERR_NET_DISCONNECT: i32 = -2301;
    /// Playback file does not exist.
    pub const ERR_FILE_NOT_FOUND: i32 = -2303;
    /// HLS decryption key fetch failed.
    pub const ERR_HLS_KEY: i32 = -2305;
    /// File-info request for the VOD asset failed.
    pub const ERR_GET_PLAYINFO_FAIL: i32 = -2306;
    /// Licence check failed.
    pub const ERR_LICENCE_CHECK_FAIL: i32 = -2308;
    pub const ERR_UNKNOWN: i32 = -10000;
    pub const ERR_GENERAL: i32 = -10001;
    pub const ERR_DEMUXER_FAIL: i32 = -10002;
    pub const ERR_SYSTEM_PLAY_FAIL: i32 = -10003;
    pub const ERR_DEMUXER_TIMEOUT: i32 = -10004;
    pub const ERR_DECODE_VIDEO_FAIL: i32 = -10005;
    pub const ERR_DECODE_AUDIO_FAIL: i32 = -10006;
    pub const ERR_DECODE_SUBTITLE_FAIL: i32 = -10007;
    pub const ERR_RENDER_FAIL: i32 = -10008;
    pub const ERR_PROCESS_VIDEO_FAIL: i32 = -10009;
    pub const ERR_DOWNLOAD_FAIL: i32 = -10010;
}

/// Event params key carrying the human-readable description.
pub const PARAM_MESSAGE: &str = "EVT_MSG";
/// Event params keys carrying video width/height on resolution changes.
pub const PARAM_WIDTH: &str = "EVT_PARAM1";
pub const PARAM_HEIGHT: &str = "EVT_PARAM2";

/// The fatal event-id set for this vendor. Anything here terminates the
/// session with a failure event; other unrecognized ids are dropped.
pub const FATAL_EVENT_IDS: &[i32] = &[
    event_id::ERR_NET_DISCONNECT,
    event_id::ERR_FILE_NOT_FOUND,
    event_id::ERR_HLS_KEY,
    event_id::ERR_GET_PLAYINFO_FAIL,
    event_id::ERR_LICENCE_CHECK_FAIL,
    event_id::ERR_UNKNOWN,
    event_id::ERR_GENERAL,
    event_id::ERR_DEMUXER_FAIL,
    event_id::ERR_SYSTEM_PLAY_FAIL,
    event_id::ERR_DEMUXER_TIMEOUT,
    event_id::ERR_DECODE_VIDEO_FAIL,
    event_id::ERR_DECODE_AUDIO_FAIL,
    event_id::ERR_DECODE_SUBTITLE_FAIL,
    event_id::ERR_RENDER_FAIL,
    event_id::ERR_PROCESS_VIDEO_FAIL,
    event_id::ERR_DOWNLOAD_FAIL,
];

pub fn is_fatal(event_id: i32) -> bool {
    FATAL_EVENT_IDS.contains(&event_id)
}

fn dimension(params: &Map<String, Value>, key: &str) -> u32 {
    params
        .get(key)
        .and_then(Value::as_u64)
        .map(|v| v as u32)
        .unwrap_or(0)
}

/// Static translation table from vendor event ids to the normalized set.
/// Ids with no entry (and no fatality classification) return `None` and
/// are dropped.
pub fn translate(id: i32, params: &Map<String, Value>) -> Option<EngineEvent> {
    match id {
        event_id::FIRST_VIDEO_FRAME => Some(EngineEvent::FirstFrame),
        event_id::VOD_PREPARED => Some(EngineEvent::Prepared),
        event_id::PLAY_LOADING => Some(EngineEvent::LoadingStart),
        event_id::VOD_LOADING_END => Some(EngineEvent::LoadingEnd),
        event_id::SEEK_COMPLETE => Some(EngineEvent::SeekCompleted),
        event_id::PLAY_BEGIN | event_id::PLAY_PROGRESS => Some(EngineEvent::Progress),
        event_id::PLAY_END => Some(EngineEvent::Completed),
        event_id::RESOLUTION_CHANGED => Some(EngineEvent::VideoSize {
            width: dimension(params, PARAM_WIDTH),
            height: dimension(params, PARAM_HEIGHT),
        }),
        id if is_fatal(id) => {
            let message = params
                .get(PARAM_MESSAGE)
                .and_then(Value::as_str)
                .unwrap_or("playback error")
                .to_string();
            Some(EngineEvent::Error(EngineFault {
                code: id as i64,
                message,
                details: params.clone(),
            }))
        }
        _ => None,
    }
}

/// Callback surface the vendor listener binding reports into.
pub struct LiteVodCallbacks {
    sink: EventSink,
}

impl LiteVodCallbacks {
    pub fn new(sink: EventSink) -> Self {
        Self { sink }
    }

    pub fn on_play_event(&self, id: i32, params: &Map<String, Value>) {
        if let Some(event) = translate(id, params) {
            self.sink.emit(event);
        }
    }
}

/// The lite VOD backend.
pub struct LiteVod<E: Engine> {
    factory: EngineFactory<E>,
}

impl<E: Engine> LiteVod<E> {
    pub fn new(factory: EngineFactory<E>) -> Self {
        Self { factory }
    }
}

impl<E: Engine> Backend for LiteVod<E> {
    type Engine = E;

    const NAME: &'static str = "litevod";
    const DEFAULT_AUTOPLAY: bool = false;
    const VOLUME_ROUTE: VolumeRoute = VolumeRoute::Native;
    const SUPPORTS_PIP: bool = true;

    fn render_mode(mode: ScalingMode) -> RenderMode {
        // Vendor render enum: 0 fill-screen (crop), 1 fill-edge (letterbox).
        match mode {
            ScalingMode::Fill => RenderMode(0),
            ScalingMode::Fit | ScalingMode::None => RenderMode(1),
        }
    }

    fn engine_config() -> EngineConfig {
        EngineConfig {
            progress_interval_ms: 250,
            buffer_size_ms: 10_000,
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

    fn no_params() -> Map<String, Value> {
        Map::new()
    }

    #[test]
    fn test_lifecycle_ids_translate() {
        let p = no_params();
        assert!(matches!(
            translate(event_id::VOD_PREPARED, &p),
            Some(EngineEvent::Prepared)
        ));
        assert!(matches!(
            translate(event_id::FIRST_VIDEO_FRAME, &p),
            Some(EngineEvent::FirstFrame)
        ));
        assert!(matches!(
            translate(event_id::PLAY_BEGIN, &p),
            Some(EngineEvent::Progress)
        ));
        assert!(matches!(
            translate(event_id::PLAY_PROGRESS, &p),
            Some(EngineEvent::Progress)
        ));
        assert!(matches!(
            translate(event_id::PLAY_END, &p),
            Some(EngineEvent::Completed)
        ));
        assert!(matches!(
            translate(event_id::SEEK_COMPLETE, &p),
            Some(EngineEvent::SeekCompleted)
        ));
    }

    #[test]
    fn test_unknown_positive_ids_are_dropped() {
        assert!(translate(2100, &no_params()).is_none());
        assert!(translate(0, &no_params()).is_none());
    }

    #[test]
    fn test_resolution_change_reads_params() {
        let mut params = Map::new();
        params.insert(PARAM_WIDTH.into(), 1920u32.into());
        params.insert(PARAM_HEIGHT.into(), 1080u32.into());
        match translate(event_id::RESOLUTION_CHANGED, &params) {
            Some(EngineEvent::VideoSize { width, height }) => {
                assert_eq!((width, height), (1920, 1080));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_fatal_ids_become_faults_with_params() {
        let mut params = Map::new();
        params.insert(PARAM_MESSAGE.into(), "file not found".into());
        match translate(event_id::ERR_FILE_NOT_FOUND, &params) {
            Some(EngineEvent::Error(fault)) => {
                assert_eq!(fault.code, event_id::ERR_FILE_NOT_FOUND as i64);
                assert_eq!(fault.message, "file not found");
                assert_eq!(fault.details[PARAM_MESSAGE], "file not found");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_fatality_classification() {
        for id in FATAL_EVENT_IDS {
            assert!(is_fatal(*id));
        }
        assert!(!is_fatal(event_id::PLAY_PROGRESS));
        assert!(!is_fatal(-1));
    }

    #[test]
    fn test_engine_config_overrides() {
        let config = <LiteVod<crate::testing::NullEngine> as Backend>::engine_config();
        assert_eq!(config.progress_interval_ms, 250);
        assert_eq!(config.buffer_size_ms, 10_000);
    }
}
