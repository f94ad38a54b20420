//! Anyplay Core - Unified Playback Adapter
//!
//! This crate provides one playback-control surface over interchangeable
//! native video engines:
//! - The [`MediaPlayback`] contract every backend satisfies
//! - The generic [`Player`] state machine that implements it once
//! - The [`Engine`]/[`Backend`] boundary vendor SDK bindings plug into
//! - Normalized [`PlayerEvent`] delivery to registered observers
//! - The OS volume side-channel for engines without native volume control
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       Anyplay Core                           │
//! ├──────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │   host code ──────► MediaPlayback (trait)                    │
//! │                          │                                   │
//! │                    ┌─────┴──────┐                            │
//! │                    │  Player<B> │  session state machine     │
//! │                    └─────┬──────┘                            │
//! │                          │ Engine ops        EngineEvent     │
//! │                          ▼                       ▲           │
//! │                 ┌────────────────┐       ┌───────┴────────┐  │
//! │                 │ Backend/Engine │ ────► │   EventSink    │  │
//! │                 │ (vendor glue)  │       │ (any thread)   │  │
//! │                 └────────────────┘       └────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod adapter;
pub mod bounds;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod event;
pub mod session;
pub mod time;
pub mod volume;

pub use adapter::{MediaPlayback, Player, SeekCompletion, ThumbnailCompletion};
pub use bounds::{Rate, Volume};
pub use dispatch::Dispatch;
pub use engine::{
    Backend, Engine, EngineConfig, EngineEvent, EngineFault, EventSink, RenderMode, SeekMode,
    VolumeRoute,
};
pub use error::{Error, Result};
pub use event::{Observer, PlaybackError, PlayerEvent};
pub use session::{
    LoadState, PlayState, PlaybackSession, PresentationSize, ScalingMode, SessionId,
};
pub use time::MediaTime;
pub use volume::{install_overlay, set_system_volume, VolumeSlider, VolumeSurface};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the player library with default configuration
pub fn init() {
    tracing::info!(version = VERSION, "Anyplay Core initialized");
}
