//! Visage Rig - Morph-target rig model
//!
//! The rig owns the mutable surface the animation core writes into: one
//! influence array per mesh, addressed through stable slots resolved once
//! from channel names. The renderer reads the arrays back after each frame;
//! nothing else in the engine touches mesh data.

pub mod mesh;
pub mod rig;

pub use mesh::*;
pub use rig::*;
