//! Visage Session - Per-frame driver for one animated avatar
//!
//! An [`AvatarSession`] owns a rig, an animation scheduler, a blink
//! machine, and a viseme compositor, and advances them all from a single
//! [`AvatarSession::frame`] call. Speech audio and lipsync tracks arrive
//! through two seams: [`AudioTransport`] for the playback clock and
//! [`TrackSource`] for asynchronous cue-track fetches.

pub mod audio;
pub mod loader;
pub mod session;

pub use audio::*;
pub use loader::*;
pub use session::*;
