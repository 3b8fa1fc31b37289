//! Cross-fade scheduling - one dominant clip, jittered idle variations
//!
//! The discipline: exactly one clip is the cross-fade target at a time.
//! Startup fades the idle loop in, hands over to a greeting one-shot after a
//! fixed delay, settles back onto idle when the greeting completes, then
//! fires an idle-variation one-shot on a jittered timer, rescheduling the
//! timer each time a variation finishes. One-shot completion is observed by
//! polling the actions each frame, never through callbacks.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;
use visage_core::{FrameTime, VisageError, VisageResult};

use crate::action::{AnimationAction, LoopMode};
use crate::clip::ClipLibrary;
use crate::jitter;

/// Timing tuning for the cross-fade discipline.
#[derive(Clone, Debug)]
pub struct CrossfadeConfig {
    /// Fade-in applied to the idle loop at startup.
    pub startup_fade: Duration,
    /// Delay from session start to the greeting one-shot.
    pub greeting_delay: Duration,
    /// Fade used for the transition into the greeting.
    pub greeting_fade: Duration,
    /// Fade used when settling back onto idle and into variations.
    pub settle_fade: Duration,
    /// Uniform window between settling on idle and the next variation.
    pub variation_window: (Duration, Duration),
}

impl Default for CrossfadeConfig {
    fn default() -> Self {
        CrossfadeConfig {
            startup_fade: Duration::from_millis(500),
            greeting_delay: Duration::from_secs(3),
            greeting_fade: Duration::from_millis(600),
            settle_fade: Duration::from_millis(800),
            variation_window: (Duration::from_secs(6), Duration::from_secs(12)),
        }
    }
}

/// Which library clip plays which part. Greeting and variation are
/// optional; a bare idle loop is a valid setup.
#[derive(Clone, Debug)]
pub struct CrossfadeRoles {
    pub idle: String,
    pub greeting: Option<String>,
    pub variation: Option<String>,
}

impl CrossfadeRoles {
    pub fn idle_only(idle: impl Into<String>) -> Self {
        CrossfadeRoles {
            idle: idle.into(),
            greeting: None,
            variation: None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Phase {
    /// Idle fading in; greeting pending if one is scheduled.
    Intro,
    /// Greeting one-shot in flight.
    Greeting,
    /// On idle, waiting out the variation window.
    Settled,
    /// Variation one-shot in flight.
    Variation,
}

/// Scheduler for the startup / greeting / idle-variation life cycle.
#[derive(Debug)]
pub struct CrossfadeScheduler {
    config: CrossfadeConfig,
    actions: Vec<AnimationAction>,
    idle: usize,
    greeting: Option<usize>,
    variation: Option<usize>,
    phase: Phase,
    greeting_at: Option<FrameTime>,
    next_variation_at: Option<FrameTime>,
    active: usize,
    rng: StdRng,
}

impl CrossfadeScheduler {
    /// Builds the scheduler and starts the idle fade-in at `start`.
    ///
    /// Fails with [`VisageError::UnknownClip`] if any role names a clip the
    /// library does not have; role resolution is the one fallible step, the
    /// per-frame path after it is total.
    pub fn new(
        library: &ClipLibrary,
        roles: CrossfadeRoles,
        config: CrossfadeConfig,
        start: FrameTime,
        seed: u64,
    ) -> VisageResult<Self> {
        let mut actions = Vec::new();
        let mut add = |name: &str, loop_mode: LoopMode| -> VisageResult<usize> {
            let spec = library
                .get(name)
                .ok_or_else(|| VisageError::UnknownClip(name.to_string()))?;
            actions.push(AnimationAction::new(&spec.name, spec.duration, loop_mode));
            Ok(actions.len() - 1)
        };

        let idle = add(&roles.idle, LoopMode::Repeat)?;
        let greeting = match &roles.greeting {
            Some(name) => Some(add(name, LoopMode::Once)?),
            None => None,
        };
        let variation = match &roles.variation {
            Some(name) => Some(add(name, LoopMode::Once)?),
            None => None,
        };

        let mut scheduler = CrossfadeScheduler {
            greeting_at: greeting.map(|_| start + config.greeting_delay),
            next_variation_at: None,
            phase: if greeting.is_some() {
                Phase::Intro
            } else {
                Phase::Settled
            },
            config,
            actions,
            idle,
            greeting,
            variation,
            active: idle,
            rng: StdRng::seed_from_u64(seed),
        };

        let fade = scheduler.config.startup_fade;
        let idle_action = &mut scheduler.actions[idle];
        idle_action.play();
        idle_action.fade_to(1.0, fade);

        // Without a greeting the variation window opens immediately.
        if scheduler.phase == Phase::Settled {
            scheduler.schedule_variation(start);
        }

        Ok(scheduler)
    }

    /// Advances all actions, then runs any due phase transition.
    pub fn update(&mut self, now: FrameTime, dt: Duration) {
        for action in &mut self.actions {
            action.advance(dt);
        }

        match self.phase {
            Phase::Intro => {
                if let (Some(at), Some(greeting)) = (self.greeting_at, self.greeting) {
                    if now >= at {
                        debug!(clip = self.actions[greeting].name(), "greeting starts");
                        let fade = self.config.greeting_fade;
                        self.crossfade_index(greeting, fade);
                        self.phase = Phase::Greeting;
                    }
                }
            }
            Phase::Greeting => {
                let done = self
                    .greeting
                    .is_some_and(|g| self.actions[g].take_finished());
                if done {
                    debug!("greeting finished, settling on idle");
                    let fade = self.config.settle_fade;
                    self.crossfade_index(self.idle, fade);
                    self.phase = Phase::Settled;
                    self.schedule_variation(now);
                }
            }
            Phase::Settled => {
                if let (Some(at), Some(variation)) = (self.next_variation_at, self.variation) {
                    if now >= at {
                        debug!(clip = self.actions[variation].name(), "idle variation");
                        let fade = self.config.settle_fade;
                        self.crossfade_index(variation, fade);
                        self.phase = Phase::Variation;
                    }
                }
            }
            Phase::Variation => {
                let done = self
                    .variation
                    .is_some_and(|v| self.actions[v].take_finished());
                if done {
                    let fade = self.config.settle_fade;
                    self.crossfade_index(self.idle, fade);
                    self.phase = Phase::Settled;
                    self.schedule_variation(now);
                }
            }
        }
    }

    /// Fades out every other running action and ramps the named clip in
    /// from zero. Unknown names are ignored.
    pub fn crossfade_to(&mut self, name: &str, fade: Duration) {
        match self.actions.iter().position(|a| a.name() == name) {
            Some(index) => self.crossfade_index(index, fade),
            None => debug!(clip = name, "unknown cross-fade target ignored"),
        }
    }

    fn crossfade_index(&mut self, target: usize, fade: Duration) {
        for (i, action) in self.actions.iter_mut().enumerate() {
            if i != target && action.is_running() {
                action.fade_to(0.0, fade);
            }
        }
        let action = &mut self.actions[target];
        action.rewind();
        action.play();
        action.set_weight(0.0);
        action.fade_to(1.0, fade);
        self.active = target;
    }

    fn schedule_variation(&mut self, now: FrameTime) {
        if self.variation.is_some() {
            let delay = jitter::draw(&mut self.rng, self.config.variation_window);
            self.next_variation_at = Some(now + delay);
        }
    }

    /// The clip most recently made the cross-fade target.
    pub fn active_clip(&self) -> &str {
        self.actions[self.active].name()
    }

    pub fn weight_of(&self, clip: &str) -> f32 {
        self.actions
            .iter()
            .find(|a| a.name() == clip)
            .map_or(0.0, |a| a.weight())
    }

    pub fn actions(&self) -> &[AnimationAction] {
        &self.actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use visage_core::FrameTime;

    const DT: Duration = Duration::from_millis(16);

    fn library() -> ClipLibrary {
        ClipLibrary::new(vec![
            crate::ClipSpec::new("Idle", 9.4),
            crate::ClipSpec::new("Greeting", 1.2),
            crate::ClipSpec::new("Stretch", 0.8),
        ])
    }

    fn roles() -> CrossfadeRoles {
        CrossfadeRoles {
            idle: "Idle".into(),
            greeting: Some("Greeting".into()),
            variation: Some("Stretch".into()),
        }
    }

    fn run_until(
        scheduler: &mut CrossfadeScheduler,
        now: &mut FrameTime,
        mut stop: impl FnMut(&CrossfadeScheduler) -> bool,
        max_frames: usize,
    ) -> bool {
        for _ in 0..max_frames {
            *now = *now + DT;
            scheduler.update(*now, DT);
            if stop(scheduler) {
                return true;
            }
        }
        false
    }

    #[test]
    fn test_startup_fades_idle_in() {
        let mut scheduler = CrossfadeScheduler::new(
            &library(),
            roles(),
            CrossfadeConfig::default(),
            FrameTime::ZERO,
            1,
        )
        .unwrap();

        let mut now = FrameTime::ZERO;
        // 0.5s fade at 16ms frames: complete within 32 frames.
        run_until(&mut scheduler, &mut now, |s| s.weight_of("Idle") >= 1.0, 40);
        assert_eq!(scheduler.weight_of("Idle"), 1.0);
        assert_eq!(scheduler.active_clip(), "Idle");
        assert_eq!(scheduler.weight_of("Greeting"), 0.0);
    }

    #[test]
    fn test_greeting_fires_after_delay_then_settles() {
        let mut scheduler = CrossfadeScheduler::new(
            &library(),
            roles(),
            CrossfadeConfig::default(),
            FrameTime::ZERO,
            1,
        )
        .unwrap();
        let mut now = FrameTime::ZERO;

        let fired = run_until(
            &mut scheduler,
            &mut now,
            |s| s.active_clip() == "Greeting",
            250,
        );
        assert!(fired);
        let greeting_at = now.as_secs_f64();
        assert!((greeting_at - 3.0).abs() < 0.05, "fired at {greeting_at}");

        // The 1.2s one-shot completes and idle takes over again.
        let settled = run_until(
            &mut scheduler,
            &mut now,
            |s| s.active_clip() == "Idle" && s.weight_of("Idle") >= 1.0,
            200,
        );
        assert!(settled);
        assert_eq!(scheduler.weight_of("Greeting"), 0.0);
    }

    #[test]
    fn test_crossfade_weights_sum_to_one_mid_fade() {
        let mut scheduler = CrossfadeScheduler::new(
            &library(),
            roles(),
            CrossfadeConfig::default(),
            FrameTime::ZERO,
            1,
        )
        .unwrap();
        let mut now = FrameTime::ZERO;
        run_until(&mut scheduler, &mut now, |s| s.weight_of("Idle") >= 1.0, 40);

        // Matching fade lengths keep the outgoing and incoming weights
        // complementary throughout the transition.
        scheduler.crossfade_to("Greeting", Duration::from_millis(600));
        for _ in 0..30 {
            now = now + DT;
            scheduler.update(now, DT);
            let total = scheduler.weight_of("Idle") + scheduler.weight_of("Greeting");
            assert!((total - 1.0).abs() < 1e-4, "sum drifted to {total}");
        }
    }

    #[test]
    fn test_variation_fires_within_window() {
        let config = CrossfadeConfig::default();
        let (lo, hi) = config.variation_window;
        let mut scheduler =
            CrossfadeScheduler::new(&library(), roles(), config, FrameTime::ZERO, 99).unwrap();
        let mut now = FrameTime::ZERO;

        // Ride through greeting back to settled idle.
        let settled = run_until(
            &mut scheduler,
            &mut now,
            |s| s.phase == Phase::Settled && s.active_clip() == "Idle",
            600,
        );
        assert!(settled);
        let settled_at = now;

        let varied = run_until(
            &mut scheduler,
            &mut now,
            |s| s.active_clip() == "Stretch",
            1000,
        );
        assert!(varied);
        let wait = now - settled_at;
        assert!(wait >= lo && wait <= hi + DT, "variation after {wait:?}");

        // After the variation completes the cycle re-arms.
        let resettled = run_until(
            &mut scheduler,
            &mut now,
            |s| s.phase == Phase::Settled && s.active_clip() == "Idle",
            200,
        );
        assert!(resettled);
        assert!(scheduler.next_variation_at.unwrap() > now);
    }

    #[test]
    fn test_idle_only_setup_never_transitions() {
        let mut scheduler = CrossfadeScheduler::new(
            &library(),
            CrossfadeRoles::idle_only("Idle"),
            CrossfadeConfig::default(),
            FrameTime::ZERO,
            1,
        )
        .unwrap();
        let mut now = FrameTime::ZERO;

        for _ in 0..2000 {
            now = now + DT;
            scheduler.update(now, DT);
        }
        assert_eq!(scheduler.active_clip(), "Idle");
        assert_eq!(scheduler.weight_of("Idle"), 1.0);
    }

    #[test]
    fn test_unknown_role_clip_is_rejected() {
        let result = CrossfadeScheduler::new(
            &library(),
            CrossfadeRoles::idle_only("Moonwalk"),
            CrossfadeConfig::default(),
            FrameTime::ZERO,
            1,
        );
        assert!(matches!(result, Err(VisageError::UnknownClip(name)) if name == "Moonwalk"));
    }

    #[test]
    fn test_unknown_crossfade_target_ignored() {
        let mut scheduler = CrossfadeScheduler::new(
            &library(),
            roles(),
            CrossfadeConfig::default(),
            FrameTime::ZERO,
            1,
        )
        .unwrap();
        scheduler.crossfade_to("Moonwalk", Duration::from_millis(100));
        assert_eq!(scheduler.active_clip(), "Idle");
    }
}
