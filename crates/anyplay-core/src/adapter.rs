//! Playback adapter
//!
//! [`Player`] implements the shared [`MediaPlayback`] contract once, for
//! any [`Backend`]. It owns the session state machine, normalizes engine
//! events into the [`PlayerEvent`] channel, and guarantees callers observe
//! identical behavior regardless of which backend is active.
//!
//! Everything here runs on the control thread. Native callbacks land in
//! the adapter's [`EventSink`] and are applied when the host pumps
//! [`drive`](MediaPlayback::drive).

use crate::bounds::{Rate, Volume};
use crate::engine::{
    Backend, Engine, EngineEvent, EngineFault, EventSink, SeekMode, VolumeRoute,
};
use crate::error::Error;
use crate::event::{Observer, PlaybackError, PlayerEvent};
use crate::session::{LoadState, PlayState, PlaybackSession, PresentationSize, ScalingMode};
use crate::time::MediaTime;
use crate::volume;
use bytes::Bytes;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};
use tracing::{debug, info, warn};
use url::Url;

/// Completion for a seek request; receives `false` when the seek was
/// deferred or the engine failed, `true` when it landed.
pub type SeekCompletion = Box<dyn FnOnce(bool)>;

/// Completion for a thumbnail request; receives the captured frame.
pub type ThumbnailCompletion = Box<dyn FnOnce(Bytes)>;

/// The shared playback-control contract.
///
/// Host code depends only on this trait; each backend sits behind it as a
/// [`Player`] variant. All methods must be called on the control thread.
pub trait MediaPlayback {
    /// Tear down any existing engine, construct a fresh one wired from the
    /// current session state, and start preparation. No-op without an
    /// asset URL.
    fn prepare(&mut self);
    /// Re-prepare, preserving the current position as the seek target.
    fn reload(&mut self);
    /// Start or resume playback; forwards to [`prepare`](Self::prepare)
    /// when not yet prepared.
    fn play(&mut self);
    fn pause(&mut self);
    /// Seek to zero, then play once the seek lands.
    fn replay(&mut self);
    /// Reset all timing and load state and release the engine. Idempotent.
    fn stop(&mut self);
    /// Seek to `to`. When the engine is not ready or the duration is
    /// unknown the request is recorded, the completion fires with `false`,
    /// and the seek replays automatically after the next first-frame.
    fn seek(&mut self, to: MediaTime, completion: Option<SeekCompletion>);
    /// Capture a frame at the current position. At most one request is
    /// outstanding; a new one silently replaces it.
    fn thumbnail_at_current_time(&mut self, completion: ThumbnailCompletion);

    fn supports_picture_in_picture(&self) -> bool;
    fn start_picture_in_picture(&mut self);
    fn stop_picture_in_picture(&mut self);

    /// Read-only view of the session state.
    fn session(&self) -> &PlaybackSession;
    /// Assign the media source; triggers stop-then-prepare.
    fn set_asset_url(&mut self, url: Option<Url>);
    fn set_volume(&mut self, volume: f32);
    fn set_rate(&mut self, rate: f32);
    fn set_muted(&mut self, muted: bool);
    fn set_scaling_mode(&mut self, mode: ScalingMode);
    fn set_autoplay(&mut self, autoplay: bool);

    /// Register an event observer; delivery is synchronous and ordered on
    /// the control thread.
    fn subscribe(&mut self, observer: Observer);

    /// Apply queued engine events. The host's control-thread pump.
    fn drive(&mut self);
}

/// What to do when an in-flight seek resolves.
enum PendingSeek {
    /// Invoke the host's completion.
    Host(SeekCompletion),
    /// Internal replay request: play on success.
    Replay,
    /// Deferred-seek replay after first frame; nothing to invoke.
    Silent,
}

/// Generic playback adapter over one backend.
pub struct Player<B: Backend> {
    backend: B,
    session: PlaybackSession,
    engine: Option<B::Engine>,
    sink: EventSink,
    observers: Vec<Observer>,
    pending_seek_completion: Option<PendingSeek>,
    pending_thumbnail: Option<ThumbnailCompletion>,
    /// Injected reachability signal; set by the host, read by the
    /// buffering policy.
    network_unreachable: Arc<AtomicBool>,
    control: ThreadId,
}

impl<B: Backend> Player<B> {
    /// Create an adapter. The calling thread becomes the control thread.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            session: PlaybackSession::new(B::DEFAULT_AUTOPLAY),
            engine: None,
            sink: EventSink::new(),
            observers: Vec::new(),
            pending_seek_completion: None,
            pending_thumbnail: None,
            network_unreachable: Arc::new(AtomicBool::new(false)),
            control: thread::current().id(),
        }
    }

    /// The sink engine bindings report native events into.
    ///
    /// Replaced on every engine construction, so bindings must fetch it
    /// after the asset is assigned.
    pub fn sink(&self) -> EventSink {
        self.sink.clone()
    }

    /// Share the network-unreachable flag with the host's reachability
    /// monitor. `true` suppresses buffering updates.
    pub fn set_network_signal(&mut self, unreachable: Arc<AtomicBool>) {
        self.network_unreachable = unreachable;
    }

    /// Release the native engine if one exists. Must be called on the
    /// control thread. Returns whether an engine was destroyed.
    pub fn destroy_player(&mut self) -> bool {
        self.assert_control_thread("destroy_player");
        let Some(mut engine) = self.engine.take() else {
            return false;
        };
        engine.stop();
        engine.destroy();
        // Anything the engine queued before teardown dies with it.
        let discarded = self.sink.drain().len();
        debug!(
            backend = B::NAME,
            session = %self.session.id,
            discarded,
            "engine destroyed"
        );
        true
    }

    fn assert_control_thread(&self, operation: &str) {
        debug_assert_eq!(
            thread::current().id(),
            self.control,
            "{operation} must run on the control thread"
        );
    }

    fn emit(&mut self, event: PlayerEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }

    /// Fires on every write, changed or not, like the backends it fronts.
    fn set_play_state(&mut self, state: PlayState) {
        let previous = self.session.play_state;
        self.session.play_state = state;
        info!(
            backend = B::NAME,
            session = %self.session.id,
            from = %previous,
            to = %state,
            "play state"
        );
        self.emit(PlayerEvent::PlayStateChanged { state });
    }

    fn set_load_state(&mut self, state: LoadState) {
        self.session.load_state = state;
        debug!(backend = B::NAME, state = %state, "load state");
        self.emit(PlayerEvent::LoadStateChanged { state });
    }

    fn set_presentation_size(&mut self, size: PresentationSize) {
        self.session.presentation_size = size;
        self.emit(PlayerEvent::SizeChanged { size });
    }

    /// Tear down the previous engine and build a fresh one wired from the
    /// current session state, then hand it the asset.
    fn initialize_engine(&mut self, url: &Url) {
        self.destroy_player();

        // Fresh sink per engine generation: clones still held by
        // torn-down bindings go nowhere.
        self.sink = EventSink::new();
        let config = B::engine_config();
        let Some(mut engine) = self.backend.create_engine(&config, self.sink.clone()) else {
            let error = Error::EngineConstruction { backend: B::NAME };
            debug_assert!(false, "{error}");
            warn!(%error, "engine construction failed");
            return;
        };

        engine.set_render_mode(B::render_mode(self.session.scaling_mode));
        if B::VOLUME_ROUTE == VolumeRoute::Native {
            engine.set_volume(self.session.volume);
        }
        engine.set_rate(self.session.rate);
        engine.set_muted(self.session.is_muted);
        engine.load(url);
        self.engine = Some(engine);
        debug!(backend = B::NAME, session = %self.session.id, url = %url, "engine initialized");
    }

    fn resume_engine(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            engine.resume();
        }
        self.session.is_playing = true;
        self.set_play_state(PlayState::Playing);
    }

    fn seek_with(&mut self, to: MediaTime, pending: Option<PendingSeek>) {
        let ready = self.engine.is_some() && !self.session.total_time.is_zero();
        if !ready {
            self.session.pending_seek = to;
            if let Some(pending) = pending {
                self.resolve_seek(pending, false);
            }
            return;
        }

        // A new request silently replaces any outstanding completion of
        // the same kind; the replaced closure is never invoked.
        self.pending_seek_completion = pending;
        if let Some(engine) = self.engine.as_mut() {
            engine.seek(to, SeekMode::Accurate);
        }
        self.session.pending_seek = MediaTime::ZERO;
    }

    fn resolve_seek(&mut self, pending: PendingSeek, finished: bool) {
        match pending {
            PendingSeek::Host(completion) => completion(finished),
            PendingSeek::Replay => {
                if finished {
                    self.play();
                }
            }
            PendingSeek::Silent => {}
        }
    }

    /// Shared buffering policy: never while stopped, never while the
    /// network is unreachable.
    fn buffering_update(&mut self, buffered: MediaTime) {
        if self.session.play_state == PlayState::Stopped {
            return;
        }
        if self.network_unreachable.load(Ordering::Relaxed) {
            return;
        }
        self.session.buffer_time = buffered;
        self.emit(PlayerEvent::BufferChanged { buffered });
    }

    /// Refresh current/total time from the engine; fires `TimeChanged`
    /// when the duration is known and either value moved. Runs ahead of
    /// every engine event, mirroring how the vendor SDKs piggyback
    /// progress on their event pumps.
    fn refresh_timing(&mut self) {
        let Some(engine) = self.engine.as_ref() else {
            return;
        };
        let total = engine.duration();
        if total.is_zero() {
            return;
        }
        let current = engine.position();
        if self.session.total_time != total || self.session.current_time != current {
            self.session.total_time = total;
            self.session.current_time = current;
            self.emit(PlayerEvent::TimeChanged { current, total });
        }
    }

    fn handle_event(&mut self, event: EngineEvent) {
        // No engine means whoever emitted this was already torn down.
        if self.engine.is_none() {
            debug!(backend = B::NAME, event = ?event, "stale engine event dropped");
            return;
        }
        debug!(backend = B::NAME, event = ?event, "engine event");
        self.refresh_timing();

        match event {
            EngineEvent::Prepared => self.on_prepared(),
            EngineEvent::FirstFrame => self.on_first_frame(),
            EngineEvent::LoadingStart => self.on_loading_start(),
            EngineEvent::LoadingEnd => self.on_loading_end(),
            EngineEvent::SeekCompleted => {
                if let Some(pending) = self.pending_seek_completion.take() {
                    self.resolve_seek(pending, true);
                }
            }
            // Timing already refreshed above.
            EngineEvent::Progress => {}
            EngineEvent::VideoSize { width, height } => {
                self.set_presentation_size(PresentationSize::new(width, height));
            }
            EngineEvent::Completed => {
                self.set_play_state(PlayState::Stopped);
                self.emit(PlayerEvent::PlaybackEnded);
            }
            EngineEvent::Thumbnail(image) => {
                if let Some(completion) = self.pending_thumbnail.take() {
                    completion(image);
                }
            }
            EngineEvent::Error(fault) => self.on_error(fault),
        }
    }

    fn on_prepared(&mut self) {
        self.session.current_time = MediaTime::ZERO;
        self.session.buffer_time = MediaTime::ZERO;
        self.set_load_state(self.session.load_state | LoadState::PREPARED);
        if let Some(url) = self.session.asset_url.clone() {
            self.emit(PlayerEvent::ReadyToPlay { url });
        }
    }

    fn on_first_frame(&mut self) {
        let deferred = self.session.pending_seek;
        if !deferred.is_zero() {
            self.seek_with(deferred, Some(PendingSeek::Silent));
        }
    }

    fn on_loading_start(&mut self) {
        let buffered = self
            .engine
            .as_ref()
            .map(|engine| engine.buffered())
            .unwrap_or(MediaTime::ZERO);
        if buffered.is_zero() {
            self.session.is_first_buffering = true;
            self.set_load_state(LoadState::STALLED);
        }
        self.buffering_update(buffered);
    }

    fn on_loading_end(&mut self) {
        let buffered = self
            .engine
            .as_ref()
            .map(|engine| engine.buffered())
            .unwrap_or(MediaTime::ZERO);
        if self.session.is_first_buffering {
            self.set_load_state(self.session.load_state | LoadState::PLAYTHROUGH);
            self.session.is_first_buffering = false;
        }
        self.buffering_update(buffered);
    }

    fn on_error(&mut self, fault: EngineFault) {
        // An in-flight seek fails before the failure event goes out.
        if let Some(pending) = self.pending_seek_completion.take() {
            self.resolve_seek(pending, false);
        }
        self.set_play_state(PlayState::Failed);
        self.session.is_playing = false;

        let error = PlaybackError {
            domain: B::NAME,
            code: fault.code,
            message: fault.message,
            details: fault.details,
        };
        warn!(backend = B::NAME, session = %self.session.id, %error, "playback failed");
        self.emit(PlayerEvent::PlaybackFailed { error });
    }
}

impl<B: Backend> MediaPlayback for Player<B> {
    fn prepare(&mut self) {
        let Some(url) = self.session.asset_url.clone() else {
            return;
        };
        self.session.is_prepared = true;
        self.initialize_engine(&url);
        // Guarded on the engine so a failed construction cannot bounce
        // play() back into prepare() forever.
        if self.session.should_autoplay && self.engine.is_some() {
            self.resume_engine();
        }
        self.set_load_state(LoadState::PREPARED);
        self.emit(PlayerEvent::PreparingToPlay { url });
    }

    fn reload(&mut self) {
        self.session.pending_seek = self.session.current_time;
        self.prepare();
    }

    fn play(&mut self) {
        if !self.session.is_prepared || self.engine.is_none() {
            self.prepare();
            return;
        }
        self.resume_engine();
    }

    fn pause(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            engine.pause();
        }
        self.session.is_playing = false;
        self.set_play_state(PlayState::Paused);
    }

    fn replay(&mut self) {
        self.seek_with(MediaTime::ZERO, Some(PendingSeek::Replay));
    }

    fn stop(&mut self) {
        if self.engine.is_none() {
            return;
        }
        self.set_load_state(LoadState::NONE);
        self.set_play_state(PlayState::Stopped);
        self.set_presentation_size(PresentationSize::ZERO);
        self.session.is_playing = false;
        self.destroy_player();
        self.session.is_prepared = false;
        self.session.asset_url = None;
        self.session.current_time = MediaTime::ZERO;
        self.session.total_time = MediaTime::ZERO;
        self.session.buffer_time = MediaTime::ZERO;
        self.session.is_first_buffering = false;
    }

    fn seek(&mut self, to: MediaTime, completion: Option<SeekCompletion>) {
        self.seek_with(to, completion.map(PendingSeek::Host));
    }

    fn thumbnail_at_current_time(&mut self, completion: ThumbnailCompletion) {
        let Some(engine) = self.engine.as_ref() else {
            return;
        };
        let at = engine.position();
        // Silent replacement, same policy as seeks.
        self.pending_thumbnail = Some(completion);
        if let Some(engine) = self.engine.as_mut() {
            engine.request_thumbnail(at);
        }
    }

    fn supports_picture_in_picture(&self) -> bool {
        if !B::SUPPORTS_PIP {
            return false;
        }
        self.engine
            .as_ref()
            .map(Engine::supports_picture_in_picture)
            .unwrap_or(false)
    }

    fn start_picture_in_picture(&mut self) {
        if !self.supports_picture_in_picture() {
            return;
        }
        if let Some(engine) = self.engine.as_mut() {
            engine.set_picture_in_picture(true);
        }
    }

    fn stop_picture_in_picture(&mut self) {
        if !self.supports_picture_in_picture() {
            return;
        }
        if let Some(engine) = self.engine.as_mut() {
            engine.set_picture_in_picture(false);
        }
    }

    fn session(&self) -> &PlaybackSession {
        &self.session
    }

    fn set_asset_url(&mut self, url: Option<Url>) {
        self.stop();
        self.session.asset_url = url;
        self.prepare();
    }

    fn set_volume(&mut self, volume: f32) {
        self.session.volume = Volume::new(volume);
        match B::VOLUME_ROUTE {
            VolumeRoute::Native => {
                let clamped = self.session.volume;
                if let Some(engine) = self.engine.as_mut() {
                    engine.set_volume(clamped);
                }
            }
            VolumeRoute::SystemOverlay => {
                volume::set_system_volume(self.session.volume.get());
            }
        }
    }

    fn set_rate(&mut self, rate: f32) {
        self.session.rate = Rate::new(rate);
        let clamped = self.session.rate;
        if let Some(engine) = self.engine.as_mut() {
            engine.set_rate(clamped);
        }
    }

    fn set_muted(&mut self, muted: bool) {
        self.session.is_muted = muted;
        if let Some(engine) = self.engine.as_mut() {
            engine.set_muted(muted);
        }
    }

    fn set_scaling_mode(&mut self, mode: ScalingMode) {
        self.session.scaling_mode = mode;
        if let Some(engine) = self.engine.as_mut() {
            engine.set_render_mode(B::render_mode(mode));
        }
    }

    fn set_autoplay(&mut self, autoplay: bool) {
        self.session.should_autoplay = autoplay;
    }

    fn subscribe(&mut self, observer: Observer) {
        self.observers.push(observer);
    }

    fn drive(&mut self) {
        self.assert_control_thread("drive");
        for event in self.sink.drain() {
            self.handle_event(event);
        }
    }
}

impl<B: Backend> Drop for Player<B> {
    fn drop(&mut self) {
        self.destroy_player();
    }
}
