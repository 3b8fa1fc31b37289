//! Visage Test - Simulation harness for avatar sessions
//!
//! Deterministic stand-ins for the two session seams (a hand-cranked audio
//! clock and a manually resolved track source), plus a fixed-step frame
//! simulator with ready-made scenarios. Everything here is driven
//! synchronously so whole-session behavior can be asserted frame by frame.
//! The end-to-end suite lives in the `integration` module.

pub mod scripted;
pub mod frame_sim;

#[cfg(test)]
mod integration;

pub use scripted::*;
pub use frame_sim::*;
