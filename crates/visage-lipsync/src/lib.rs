//! Visage Lipsync - Cue-timed viseme blending
//!
//! Everything between a phoneme cue track and the mouth: the cue symbol and
//! viseme tables, the JSON track schema with validation, the cue cursor that
//! follows the audio clock, and the compositor that writes smoothed viseme
//! weights into the rig.

pub mod viseme;
pub mod track;
pub mod cursor;
pub mod compositor;

pub use viseme::*;
pub use track::*;
pub use cursor::*;
pub use compositor::*;
