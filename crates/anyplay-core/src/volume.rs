//! OS volume side-channel
//!
//! One backend cannot control its own output volume and instead drives the
//! platform volume control directly. The platform hosts a minimal overlay
//! surface containing the native volume slider; locating that slider is a
//! structural search that may not succeed immediately after the overlay is
//! mounted, so writes retry a bounded number of times before giving up
//! permanently.
//!
//! Everything platform-specific hides behind [`VolumeSurface`]; the rest of
//! the crate only ever calls [`set_system_volume`].

use crate::dispatch::Dispatch;
use crate::error::Error;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::{debug, error, warn};

/// Retry budget shared across all writes; never replenished.
const RETRY_ATTEMPTS: i32 = 10;
/// Delay between slider-location retries.
const RETRY_INTERVAL: Duration = Duration::from_millis(100);

/// Platform overlay hosting the native volume control.
///
/// Implementations create the overlay lazily and keep it resident for the
/// life of the process; there is no teardown.
pub trait VolumeSurface: Send + Sync {
    /// Structural search for the native slider. `None` until the platform
    /// has mounted it.
    fn locate_slider(&self) -> Option<Arc<dyn VolumeSlider>>;
}

/// The located native volume slider.
pub trait VolumeSlider: Send + Sync {
    /// Write a level in `[0.0, 1.0]` to the system volume.
    fn set_level(&self, level: f32);
}

/// Process-wide volume override resource.
pub struct VolumeOverlay {
    surface: Box<dyn VolumeSurface>,
    dispatch: Arc<Dispatch>,
    attempts_left: AtomicI32,
}

impl VolumeOverlay {
    pub fn new(surface: Box<dyn VolumeSurface>, dispatch: Arc<Dispatch>) -> Arc<Self> {
        Arc::new(Self {
            surface,
            dispatch,
            attempts_left: AtomicI32::new(RETRY_ATTEMPTS),
        })
    }

    /// Write `level` to the system volume, retrying while the slider is
    /// still being mounted. After the retry budget is exhausted the
    /// overlay gives up permanently: the platform control hierarchy has
    /// changed and that is an integration bug, not a runtime condition.
    pub fn set_volume(self: &Arc<Self>, level: f32) {
        if let Some(slider) = self.surface.locate_slider() {
            let level = level.max(0.0).min(1.0);
            debug!(level, "system volume write");
            slider.set_level(level);
            return;
        }

        if self.attempts_left.load(Ordering::Acquire) <= 0 {
            let error = Error::VolumeSliderNotFound {
                attempts: RETRY_ATTEMPTS as u32,
            };
            debug_assert!(false, "{error}");
            error!(%error, "system volume slider not found, giving up");
            return;
        }

        self.attempts_left.fetch_sub(1, Ordering::AcqRel);
        let this = Arc::clone(self);
        self.dispatch.run_after(RETRY_INTERVAL, move || {
            this.set_volume(level);
        });
    }
}

static OVERLAY: OnceLock<Arc<VolumeOverlay>> = OnceLock::new();

/// Install the process-wide overlay on first use. Later installs are
/// ignored; the first surface stays resident for the life of the process.
pub fn install_overlay(surface: Box<dyn VolumeSurface>, dispatch: Arc<Dispatch>) {
    let _ = OVERLAY.set(VolumeOverlay::new(surface, dispatch));
}

/// Write `level` to the system volume through the installed overlay.
///
/// The single entry point for backends without native volume control.
pub fn set_system_volume(level: f32) {
    match OVERLAY.get() {
        Some(overlay) => overlay.set_volume(level),
        None => warn!("no volume overlay installed, system volume write dropped"),
    }
}
