//! Anyplay Engines - Backend Variants
//!
//! The four backend implementations of the shared playback contract. Each
//! module holds what genuinely differs between vendors and nothing else:
//! - the vendor's native event vocabulary (enums or integer event ids)
//! - a static translation table into the normalized
//!   [`EngineEvent`](anyplay_core::EngineEvent) set
//! - a callback surface the native SDK bindings report into
//! - the [`Backend`](anyplay_core::Backend) implementation carrying the
//!   vendor's constants (autoplay default, volume route, render-mode table,
//!   engine configuration)
//!
//! The native SDK handles themselves live behind
//! [`Engine`](anyplay_core::Engine) and are injected through an
//! [`EngineFactory`], so the translation and wiring logic here stays free of
//! FFI concerns.

use anyplay_core::{EngineConfig, EventSink};

pub mod cloudvod;
pub mod litevod;
pub mod livecast;
pub mod system;

#[cfg(test)]
pub(crate) mod testing;

pub use cloudvod::{CloudVod, CloudVodCallbacks, CloudVodErrorModel, CloudVodEvent};
pub use litevod::{LiteVod, LiteVodCallbacks};
pub use livecast::{live_asset_url, LiveCast, LiveCastCallbacks, LiveCastEngine, LiveCastState};
pub use system::{System, SystemCallbacks, SystemNotification};

/// Constructs a fresh native engine handle bound to an event sink.
///
/// `None` means native construction failed; the adapter logs and stays
/// unprepared.
pub type EngineFactory<E> = Box<dyn FnMut(&EngineConfig, EventSink) -> Option<E>>;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
