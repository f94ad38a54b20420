//! Integration tests: real backends driving the generic player.

use anyplay_core::{
    Engine, LoadState, MediaPlayback, MediaTime, PlayState, Player, PlayerEvent, Rate, RenderMode,
    SeekMode, Volume,
};
use anyplay_engines::litevod::{event_id, PARAM_MESSAGE};
use anyplay_engines::{live_asset_url, LiteVod, LiteVodCallbacks, LiveCast, LiveCastCallbacks};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use url::Url;

#[derive(Default)]
struct MockState {
    volume: Option<f32>,
    render_mode: Option<i32>,
    loaded: Vec<Url>,
    seeks: Vec<MediaTime>,
    resumed: bool,
    duration: MediaTime,
    position: MediaTime,
    buffered: MediaTime,
}

type StateHandle = Arc<Mutex<MockState>>;

struct MockEngine {
    state: StateHandle,
}

impl Engine for MockEngine {
    fn set_volume(&mut self, volume: Volume) {
        self.state.lock().volume = Some(volume.get());
    }
    fn set_rate(&mut self, _rate: Rate) {}
    fn set_muted(&mut self, _muted: bool) {}
    fn set_render_mode(&mut self, mode: RenderMode) {
        self.state.lock().render_mode = Some(mode.0);
    }
    fn load(&mut self, url: &Url) {
        self.state.lock().loaded.push(url.clone());
    }
    fn resume(&mut self) {
        self.state.lock().resumed = true;
    }
    fn pause(&mut self) {}
    fn stop(&mut self) {}
    fn seek(&mut self, to: MediaTime, _mode: SeekMode) {
        let mut state = self.state.lock();
        state.seeks.push(to);
        state.position = to;
    }
    fn destroy(&mut self) {}
    fn position(&self) -> MediaTime {
        self.state.lock().position
    }
    fn duration(&self) -> MediaTime {
        self.state.lock().duration
    }
    fn buffered(&self) -> MediaTime {
        self.state.lock().buffered
    }
    fn request_thumbnail(&mut self, _at: MediaTime) {}
}

fn mock_factory() -> (
    anyplay_engines::EngineFactory<MockEngine>,
    Arc<Mutex<Vec<StateHandle>>>,
) {
    let created: Arc<Mutex<Vec<StateHandle>>> = Arc::new(Mutex::new(Vec::new()));
    let handle = Arc::clone(&created);
    let factory: anyplay_engines::EngineFactory<MockEngine> =
        Box::new(move |_config, _sink| {
            let state = StateHandle::default();
            handle.lock().push(Arc::clone(&state));
            Some(MockEngine { state })
        });
    (factory, created)
}

fn vod_asset() -> Url {
    Url::parse("https://vod.example.com/clip.mp4").unwrap()
}

#[test]
fn test_litevod_event_stream_drives_player() {
    let (factory, created) = mock_factory();
    let mut player = Player::new(LiteVod::new(factory));
    let events = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&events);
    player.subscribe(Box::new(move |event: &PlayerEvent| {
        log.borrow_mut().push(event.clone());
    }));

    // Autoplay defaults off for this vendor.
    player.set_asset_url(Some(vod_asset()));
    assert!(!player.session().is_playing);
    assert_eq!(created.lock().len(), 1);

    let state = Arc::clone(created.lock().last().unwrap());
    state.lock().duration = MediaTime::from_secs(120.0);

    let callbacks = LiteVodCallbacks::new(player.sink());
    let params = Map::new();
    callbacks.on_play_event(event_id::VOD_PREPARED, &params);
    callbacks.on_play_event(event_id::FIRST_VIDEO_FRAME, &params);
    callbacks.on_play_event(9999, &params);
    player.drive();

    assert!(player.session().load_state.contains(LoadState::PREPARED));
    assert_eq!(player.session().total_time, MediaTime::from_secs(120.0));
    assert!(events
        .borrow()
        .iter()
        .any(|e| matches!(e, PlayerEvent::ReadyToPlay { url } if *url == vod_asset())));
    // No pending seek, so the first frame issues none.
    assert!(state.lock().seeks.is_empty());

    player.play();
    assert!(state.lock().resumed);
    assert_eq!(player.session().play_state, PlayState::Playing);

    callbacks.on_play_event(event_id::PLAY_END, &params);
    player.drive();
    assert_eq!(player.session().play_state, PlayState::Stopped);
    assert_eq!(
        events
            .borrow()
            .iter()
            .filter(|e| matches!(e, PlayerEvent::PlaybackEnded))
            .count(),
        1
    );
}

#[test]
fn test_litevod_fatal_event_fails_playback() {
    let (factory, _created) = mock_factory();
    let mut player = Player::new(LiteVod::new(factory));
    let events = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&events);
    player.subscribe(Box::new(move |event: &PlayerEvent| {
        log.borrow_mut().push(event.clone());
    }));
    player.set_asset_url(Some(vod_asset()));

    let callbacks = LiteVodCallbacks::new(player.sink());
    let mut params = Map::new();
    params.insert(PARAM_MESSAGE.into(), Value::String("no such file".into()));
    callbacks.on_play_event(event_id::ERR_FILE_NOT_FOUND, &params);
    player.drive();

    assert_eq!(player.session().play_state, PlayState::Failed);
    let events = events.borrow();
    let failure = events
        .iter()
        .find_map(|e| match e {
            PlayerEvent::PlaybackFailed { error } => Some(error),
            _ => None,
        })
        .expect("no failure event");
    assert_eq!(failure.domain, "litevod");
    assert_eq!(failure.code, event_id::ERR_FILE_NOT_FOUND as i64);
    assert_eq!(failure.message, "no such file");
}

#[test]
fn test_litevod_render_mode_fills_screen_for_fill() {
    let (factory, created) = mock_factory();
    let mut player = Player::new(LiteVod::new(factory));
    player.set_asset_url(Some(vod_asset()));
    // Session default is Fill, which this vendor renders as fill-screen.
    assert_eq!(created.lock()[0].lock().render_mode, Some(0));
}

#[test]
fn test_livecast_room_url_reaches_engine() {
    let (factory, created) = mock_factory();
    let mut player = Player::new(LiveCast::new(factory));

    let url = live_asset_url("42", None, Some("tok"), None, "A", "a@b.com");
    player.set_asset_url(Some(url.clone()));

    // Autoplay defaults on for this vendor.
    assert!(player.session().is_playing);
    assert_eq!(created.lock()[0].lock().loaded, vec![url]);
}

#[test]
fn test_livecast_seek_lands_synchronously() {
    let (factory, created) = mock_factory();
    let mut player = Player::new(LiveCast::new(factory));
    player.set_asset_url(Some(live_asset_url("42", None, None, None, "A", "a@b.com")));

    let state = Arc::clone(created.lock().last().unwrap());
    state.lock().duration = MediaTime::from_secs(100.0);

    let callbacks = LiveCastCallbacks::new(player.sink());
    callbacks.on_time_tick();
    player.drive();
    assert_eq!(player.session().total_time, MediaTime::from_secs(100.0));

    let resolved = Rc::new(RefCell::new(None));
    let flag = Rc::clone(&resolved);
    player.seek(
        MediaTime::from_secs(500.0),
        Some(Box::new(move |finished| {
            *flag.borrow_mut() = Some(finished);
        })),
    );
    // The wrapper clamped one second short of the end and completed at once.
    assert_eq!(state.lock().seeks, vec![MediaTime::from_secs(99.0)]);
    player.drive();
    assert_eq!(*resolved.borrow(), Some(true));
}

#[test]
fn test_livecast_volume_bypasses_engine() {
    let (factory, created) = mock_factory();
    let mut player = Player::new(LiveCast::new(factory));
    player.set_asset_url(Some(live_asset_url("42", None, None, None, "A", "a@b.com")));

    player.set_volume(0.4);
    assert_eq!(created.lock()[0].lock().volume, None);
    assert_eq!(player.session().volume.get(), 0.4);
}

#[test]
fn test_completed_state_event_reaches_player() {
    let (factory, _created) = mock_factory();
    let mut player = Player::new(LiveCast::new(factory));
    player.set_asset_url(Some(live_asset_url("42", None, None, None, "A", "a@b.com")));

    let callbacks = LiveCastCallbacks::new(player.sink());
    callbacks.on_connect_succeed();
    callbacks.on_state_changed(anyplay_engines::LiveCastState::Complete);
    player.drive();

    assert_eq!(player.session().play_state, PlayState::Stopped);
}
