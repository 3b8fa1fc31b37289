//! Scheduler facade - one per-frame surface over both disciplines

use std::time::Duration;

use visage_core::FrameTime;

use crate::blend::BlendScheduler;
use crate::crossfade::CrossfadeScheduler;

/// The transition discipline a session drives. Chosen at construction;
/// sessions never switch disciplines mid-run.
#[derive(Debug)]
pub enum AnimationScheduler {
    Crossfade(CrossfadeScheduler),
    Blend(BlendScheduler),
}

impl AnimationScheduler {
    pub fn update(&mut self, now: FrameTime, dt: Duration) {
        match self {
            AnimationScheduler::Crossfade(s) => s.update(now, dt),
            AnimationScheduler::Blend(s) => s.update(now, dt),
        }
    }

    /// The clip currently leading the pose.
    pub fn active_clip(&self) -> &str {
        match self {
            AnimationScheduler::Crossfade(s) => s.active_clip(),
            AnimationScheduler::Blend(s) => s.leaning_clip(),
        }
    }

    pub fn weight_of(&self, clip: &str) -> f32 {
        match self {
            AnimationScheduler::Crossfade(s) => s.weight_of(clip),
            AnimationScheduler::Blend(s) => s.weight_of(clip),
        }
    }
}

impl From<CrossfadeScheduler> for AnimationScheduler {
    fn from(s: CrossfadeScheduler) -> Self {
        AnimationScheduler::Crossfade(s)
    }
}

impl From<BlendScheduler> for AnimationScheduler {
    fn from(s: BlendScheduler) -> Self {
        AnimationScheduler::Blend(s)
    }
}
