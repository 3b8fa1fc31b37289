//! Error types for the visage engine

use thiserror::Error;

/// Errors surfaced at construction or load time.
///
/// The per-frame update path is total and never produces these: frame-time
/// irregularities (missing channels, absent tracks, cursor desync, stale
/// fetches) degrade silently per component instead.
#[derive(Error, Debug)]
pub enum VisageError {
    // Track errors
    #[error("Invalid track: {0}")]
    InvalidTrack(String),

    #[error("Track fetch failed: {0}")]
    TrackFetch(String),

    #[error("Track fetch cancelled")]
    FetchCancelled,

    // Rig errors
    #[error("Duplicate mesh name: {0}")]
    DuplicateMesh(String),

    // Clip errors
    #[error("Unknown clip: {0}")]
    UnknownClip(String),

    // Audio errors
    #[error("Audio transport error: {0}")]
    AudioTransport(String),
}

/// Result type for visage operations
pub type VisageResult<T> = Result<T, VisageError>;
