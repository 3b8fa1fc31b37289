//! Visage Core - Fundamental types and primitives
//!
//! This crate defines the core types used throughout the visage engine:
//! - Identifiers (MeshId)
//! - Time primitives (FrameTime, AudioTime)
//! - The exponential smoothing primitive and response-rate selection
//! - Error types

pub mod id;
pub mod time;
pub mod smoothing;
pub mod error;

pub use id::*;
pub use time::*;
pub use smoothing::*;
pub use error::*;
