//! Error types for Anyplay Core

use thiserror::Error;

/// Result type alias for player operations
pub type Result<T> = std::result::Result<T, Error>;

/// Player error types
///
/// Native playback failures are not `Err` values; they surface through the
/// [`PlayerEvent::PlaybackFailed`](crate::event::PlayerEvent) channel so the
/// host sees one failure path regardless of backend.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to construct {backend} engine")]
    EngineConstruction { backend: &'static str },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("System volume slider not found after {attempts} attempts")]
    VolumeSliderNotFound { attempts: u32 },

    #[error("Called off the control thread: {operation}")]
    ThreadAffinity { operation: &'static str },
}

impl Error {
    /// Returns the error code used in diagnostics
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::EngineConstruction { .. } => "ENGINE_CONSTRUCTION",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::VolumeSliderNotFound { .. } => "VOLUME_SLIDER",
            Error::ThreadAffinity { .. } => "THREAD_AFFINITY",
        }
    }
}
