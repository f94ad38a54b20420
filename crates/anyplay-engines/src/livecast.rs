//! Live-cast backend
//!
//! Live/webinar SDK. Two quirks set it apart from the VOD backends:
//! - it cannot control its own output volume, so volume writes route
//!   through the OS volume side-channel instead of the engine
//! - native seeks land synchronously by assigning the playback position,
//!   so [`LiveCastEngine`] completes every seek immediately, clamped one
//!   second short of the end of recorded content (seeking to the very end
//!   would finish playback on the spot)
//!
//! Asset references for this backend are built by [`live_asset_url`] from
//! room credentials rather than handed over as plain media URLs.

use crate::EngineFactory;
use anyplay_core::{
    Backend, Engine, EngineConfig, EngineEvent, EngineFault, EventSink, MediaTime, Rate,
    RenderMode, ScalingMode, SeekMode, Volume, VolumeRoute,
};
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

/// Margin kept before the end of content when clamping seeks.
const SEEK_END_MARGIN_MS: i64 = 1_000;

/// Player activity states the vendor reports through its status callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveCastState {
    Starting,
    Playing,
    Pause,
    Complete,
    Error,
}

/// Callback surface the vendor delegate bindings report into.
pub struct LiveCastCallbacks {
    sink: EventSink,
}

impl LiveCastCallbacks {
    pub fn new(sink: EventSink) -> Self {
        Self { sink }
    }

    /// Connection established; the room stream is ready.
    pub fn on_connect_succeed(&self) {
        self.sink.emit(EngineEvent::Prepared);
    }

    pub fn on_buffer_start(&self) {
        self.sink.emit(EngineEvent::LoadingStart);
    }

    pub fn on_buffer_stop(&self) {
        self.sink.emit(EngineEvent::LoadingEnd);
    }

    /// Activity-state callback: completion maps to the end of playback,
    /// every other state is a timing refresh opportunity.
    pub fn on_state_changed(&self, state: LiveCastState) {
        match state {
            LiveCastState::Complete => self.sink.emit(EngineEvent::Completed),
            _ => self.sink.emit(EngineEvent::Progress),
        }
    }

    /// Once-per-second playback time callback.
    pub fn on_time_tick(&self) {
        self.sink.emit(EngineEvent::Progress);
    }

    pub fn on_video_size(&self, width: u32, height: u32) {
        self.sink.emit(EngineEvent::VideoSize { width, height });
    }

    pub fn on_play_error(&self, error_type: i32, info: Map<String, Value>) {
        let message = info
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("live playback error")
            .to_string();
        self.sink.emit(EngineEvent::Error(EngineFault {
            code: error_type as i64,
            message,
            details: info,
        }));
    }
}

/// Wraps the raw vendor engine to give seeks their synchronous, clamped
/// semantics. All other operations pass straight through.
pub struct LiveCastEngine<E: Engine> {
    inner: E,
    sink: EventSink,
}

impl<E: Engine> LiveCastEngine<E> {
    pub fn new(inner: E, sink: EventSink) -> Self {
        Self { inner, sink }
    }
}

impl<E: Engine> Engine for LiveCastEngine<E> {
    fn set_volume(&mut self, volume: Volume) {
        self.inner.set_volume(volume);
    }

    fn set_rate(&mut self, rate: Rate) {
        self.inner.set_rate(rate);
    }

    fn set_muted(&mut self, muted: bool) {
        self.inner.set_muted(muted);
    }

    fn set_render_mode(&mut self, mode: RenderMode) {
        self.inner.set_render_mode(mode);
    }

    fn load(&mut self, url: &Url) {
        self.inner.load(url);
    }

    fn resume(&mut self) {
        self.inner.resume();
    }

    fn pause(&mut self) {
        self.inner.pause();
    }

    fn stop(&mut self) {
        self.inner.stop();
    }

    /// Position assignment, not an async request: clamp one second short
    /// of the end and report completion immediately.
    fn seek(&mut self, to: MediaTime, mode: SeekMode) {
        let total = self.inner.duration();
        let target = if to < total {
            to
        } else {
            MediaTime::from_millis(total.millis() as i64 - SEEK_END_MARGIN_MS)
        };
        debug!(requested = %to, target = %target, "live seek clamped");
        self.inner.seek(target, mode);
        self.sink.emit(EngineEvent::SeekCompleted);
    }

    fn destroy(&mut self) {
        self.inner.destroy();
    }

    fn position(&self) -> MediaTime {
        self.inner.position()
    }

    fn duration(&self) -> MediaTime {
        self.inner.duration()
    }

    fn buffered(&self) -> MediaTime {
        self.inner.buffered()
    }

    fn request_thumbnail(&mut self, at: MediaTime) {
        self.inner.request_thumbnail(at);
    }
}

/// The live-cast backend.
pub struct LiveCast<E: Engine> {
    factory: EngineFactory<E>,
}

impl<E: Engine> LiveCast<E> {
    pub fn new(factory: EngineFactory<E>) -> Self {
        Self { factory }
    }
}

impl<E: Engine> Backend for LiveCast<E> {
    type Engine = LiveCastEngine<E>;

    const NAME: &'static str = "livecast";
    const DEFAULT_AUTOPLAY: bool = true;
    const VOLUME_ROUTE: VolumeRoute = VolumeRoute::SystemOverlay;
    const SUPPORTS_PIP: bool = false;

    fn render_mode(mode: ScalingMode) -> RenderMode {
        // Vendor scaling enum: 0 none, 1 aspect-fit, 2 aspect-fill.
        match mode {
            ScalingMode::Fit => RenderMode(1),
            ScalingMode::Fill => RenderMode(2),
            ScalingMode::None => RenderMode(0),
        }
    }

    fn create_engine(
        &mut self,
        config: &EngineConfig,
        sink: EventSink,
    ) -> Option<LiveCastEngine<E>> {
        let inner = (self.factory)(config, sink.clone())?;
        Some(LiveCastEngine::new(inner, sink))
    }
}

/// Fixed scheme and path the room credentials are attached to.
pub const LIVECAST_ASSET_BASE: &str = "anyplay://livecast/play";

/// Build a live-cast asset URL from room credentials.
///
/// Only non-empty parameters appear in the query; a `"0"` record id is the
/// vendor's none-sentinel and is treated as absent.
pub fn live_asset_url(
    room_id: &str,
    record_id: Option<&str>,
    access_token: Option<&str>,
    pass: Option<&str>,
    name: &str,
    email: &str,
) -> Url {
    debug_assert!(!room_id.is_empty(), "room id must not be empty");
    let mut url = Url::parse(LIVECAST_ASSET_BASE).expect("fixed base url is well formed");
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("id", room_id);
        if let Some(record_id) = record_id {
            if !record_id.is_empty() && record_id != "0" {
                query.append_pair("record_id", record_id);
            }
        }
        for (key, value) in [("access_token", access_token), ("pass", pass)] {
            if let Some(value) = value {
                if !value.is_empty() {
                    query.append_pair(key, value);
                }
            }
        }
        if !name.is_empty() {
            query.append_pair("name", name);
        }
        if !email.is_empty() {
            query.append_pair("email", email);
        }
    }
    url
}
