//! Shared test doubles for backend unit tests.

use anyplay_core::{Engine, MediaTime, Rate, RenderMode, SeekMode, Volume};
use url::Url;

/// An engine that does nothing, for exercising backend constants and tables.
pub(crate) struct NullEngine;

impl Engine for NullEngine {
    fn set_volume(&mut self, _volume: Volume) {}
    fn set_rate(&mut self, _rate: Rate) {}
    fn set_muted(&mut self, _muted: bool) {}
    fn set_render_mode(&mut self, _mode: RenderMode) {}
    fn load(&mut self, _url: &Url) {}
    fn resume(&mut self) {}
    fn pause(&mut self) {}
    fn stop(&mut self) {}
    fn seek(&mut self, _to: MediaTime, _mode: SeekMode) {}
    fn destroy(&mut self) {}
    fn position(&self) -> MediaTime {
        MediaTime::ZERO
    }
    fn duration(&self) -> MediaTime {
        MediaTime::ZERO
    }
    fn buffered(&self) -> MediaTime {
        MediaTime::ZERO
    }
    fn request_thumbnail(&mut self, _at: MediaTime) {}
}
