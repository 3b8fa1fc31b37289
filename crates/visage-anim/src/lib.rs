//! Visage Anim - Clip actions, transition scheduling, and the blink machine
//!
//! This crate owns everything that moves on its own schedule rather than in
//! response to speech:
//!
//! - [`AnimationAction`]: one clip's playback head and blend weight
//! - [`CrossfadeScheduler`]: a dominant clip with jittered idle variations
//! - [`BlendScheduler`]: two loops sharing weight, flipping on a jittered timer
//! - [`BlinkMachine`]: the periodic eyelid cycle
//! - [`AnimationScheduler`]: the facade a session drives every frame

pub mod clip;
pub mod action;
pub mod crossfade;
pub mod blend;
pub mod blink;
pub mod scheduler;

mod jitter;

pub use clip::*;
pub use action::*;
pub use crossfade::*;
pub use blend::*;
pub use blink::*;
pub use scheduler::*;
