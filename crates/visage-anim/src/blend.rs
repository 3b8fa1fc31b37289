//! Continuous blending - two loops sharing one unit of weight
//!
//! Alternative to the cross-fade discipline: both clips play all the time
//! and a single smoothed mix value decides how much of each shows. A
//! jittered timer flips the mix target between 0 and 1; the smoother walks
//! it there. The two weights are complementary by construction, so the
//! rig never sees an over- or under-weighted pose.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;
use visage_core::{smooth_toward, FrameTime, VisageError, VisageResult};

use crate::action::{AnimationAction, LoopMode};
use crate::clip::ClipLibrary;
use crate::jitter;

/// Tuning for the continuous-blend discipline.
#[derive(Clone, Debug)]
pub struct BlendConfig {
    /// Uniform window between mix target flips.
    pub flip_window: (Duration, Duration),
    /// Approach rate of the mix value, per second.
    pub rate: f32,
}

impl Default for BlendConfig {
    fn default() -> Self {
        BlendConfig {
            flip_window: (Duration::from_secs(8), Duration::from_secs(15)),
            rate: 1.5,
        }
    }
}

/// Scheduler that drifts between two looping clips.
#[derive(Debug)]
pub struct BlendScheduler {
    config: BlendConfig,
    primary: AnimationAction,
    secondary: AnimationAction,
    /// Where the mix is heading: 0 = all primary, 1 = all secondary.
    target: f32,
    /// Smoothed mix value, also the secondary clip's weight.
    mix: f32,
    next_flip_at: FrameTime,
    rng: StdRng,
}

impl BlendScheduler {
    pub fn new(
        library: &ClipLibrary,
        primary: &str,
        secondary: &str,
        config: BlendConfig,
        start: FrameTime,
        seed: u64,
    ) -> VisageResult<Self> {
        let resolve = |name: &str| -> VisageResult<AnimationAction> {
            let spec = library
                .get(name)
                .ok_or_else(|| VisageError::UnknownClip(name.to_string()))?;
            Ok(AnimationAction::new(&spec.name, spec.duration, LoopMode::Repeat))
        };
        let mut primary = resolve(primary)?;
        let mut secondary = resolve(secondary)?;
        primary.play();
        primary.set_weight(1.0);
        secondary.play();
        secondary.set_weight(0.0);

        let mut rng = StdRng::seed_from_u64(seed);
        let next_flip_at = start + jitter::draw(&mut rng, config.flip_window);
        Ok(BlendScheduler {
            config,
            primary,
            secondary,
            target: 0.0,
            mix: 0.0,
            next_flip_at,
            rng,
        })
    }

    /// Advances both loops, flips the target when due, and re-splits the
    /// weights around the smoothed mix.
    pub fn update(&mut self, now: FrameTime, dt: Duration) {
        self.primary.advance(dt);
        self.secondary.advance(dt);

        if now >= self.next_flip_at {
            self.target = 1.0 - self.target;
            let delay = jitter::draw(&mut self.rng, self.config.flip_window);
            self.next_flip_at = now + delay;
            debug!(
                target = self.target,
                clip = self.leaning_clip(),
                "blend target flipped"
            );
        }

        let step = smooth_toward(self.mix, self.target, dt.as_secs_f32(), self.config.rate);
        self.mix = step.clamp(0.0, 1.0);
        self.secondary.set_weight(self.mix);
        self.primary.set_weight(1.0 - self.mix);
    }

    /// The clip the mix is currently heading toward.
    pub fn leaning_clip(&self) -> &str {
        if self.target >= 0.5 {
            self.secondary.name()
        } else {
            self.primary.name()
        }
    }

    pub fn mix(&self) -> f32 {
        self.mix
    }

    pub fn weight_of(&self, clip: &str) -> f32 {
        if self.primary.name() == clip {
            self.primary.weight()
        } else if self.secondary.name() == clip {
            self.secondary.weight()
        } else {
            0.0
        }
    }

    pub fn weights(&self) -> (f32, f32) {
        (self.primary.weight(), self.secondary.weight())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: Duration = Duration::from_millis(16);

    fn library() -> ClipLibrary {
        ClipLibrary::new(vec![
            crate::ClipSpec::new("Idle", 9.4),
            crate::ClipSpec::new("StandingIdle", 7.0),
        ])
    }

    fn scheduler(seed: u64) -> BlendScheduler {
        BlendScheduler::new(
            &library(),
            "Idle",
            "StandingIdle",
            BlendConfig::default(),
            FrameTime::ZERO,
            seed,
        )
        .unwrap()
    }

    #[test]
    fn test_starts_fully_on_primary() {
        let s = scheduler(1);
        assert_eq!(s.weights(), (1.0, 0.0));
        assert_eq!(s.leaning_clip(), "Idle");
    }

    #[test]
    fn test_flip_happens_within_window() {
        let mut s = scheduler(5);
        let (lo, hi) = s.config.flip_window;
        let mut now = FrameTime::ZERO;
        let mut flipped_at = None;
        for _ in 0..1500 {
            now = now + DT;
            s.update(now, DT);
            if s.target > 0.5 {
                flipped_at = Some(now);
                break;
            }
        }
        let at = flipped_at.expect("no flip inside 24s");
        let wait = at - FrameTime::ZERO;
        assert!(wait >= lo && wait <= hi + DT, "flipped after {wait:?}");
    }

    #[test]
    fn test_mix_approaches_flipped_target() {
        let mut s = scheduler(5);
        let mut now = FrameTime::ZERO;
        // Ride to the first flip, then watch the mix climb.
        while s.target < 0.5 {
            now = now + DT;
            s.update(now, DT);
        }
        let mut last = s.mix();
        let mut next_flip = s.next_flip_at;
        for _ in 0..120 {
            now = now + DT;
            if now >= next_flip {
                break; // target flipped back, approach direction changes
            }
            s.update(now, DT);
            next_flip = s.next_flip_at;
            assert!(s.mix() >= last);
            last = s.mix();
        }
        // Nearly two seconds at rate 1.5 leaves the mix visibly moved.
        assert!(last > 0.5, "mix only reached {last}");
    }

    #[test]
    fn test_unknown_clip_is_rejected() {
        let result = BlendScheduler::new(
            &library(),
            "Idle",
            "Moonwalk",
            BlendConfig::default(),
            FrameTime::ZERO,
            1,
        );
        assert!(matches!(result, Err(VisageError::UnknownClip(name)) if name == "Moonwalk"));
    }

    proptest! {
        /// The two weights always split exactly one unit, whatever frame
        /// cadence drives the scheduler.
        #[test]
        fn prop_weights_stay_complementary(
            seed in 0u64..1000,
            dts in prop::collection::vec(1u64..100, 1..300),
        ) {
            let mut s = scheduler(seed);
            let mut now = FrameTime::ZERO;
            for dt_ms in dts {
                let dt = Duration::from_millis(dt_ms);
                now = now + dt;
                s.update(now, dt);
                let (primary, secondary) = s.weights();
                prop_assert!((primary + secondary - 1.0).abs() < 1e-6);
                prop_assert!((0.0..=1.0).contains(&primary));
                prop_assert!((0.0..=1.0).contains(&secondary));
            }
        }
    }
}
