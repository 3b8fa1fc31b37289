//! Blink machine - the periodic eyelid cycle
//!
//! Blinks run on wall-clock deadlines, not on the audio clock, so the eyes
//! keep moving while speech is paused. The produced weight is written to
//! the rig as-is each frame; routing it through the viseme smoother would
//! soften the closure and read as drowsiness rather than a blink.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;
use visage_core::FrameTime;

use crate::jitter;

/// Tuning for blink cadence and shape.
#[derive(Clone, Debug)]
pub struct BlinkConfig {
    /// Time for the lid to travel open to closed.
    pub close_duration: Duration,
    /// Time for the lid to travel closed to open.
    pub open_duration: Duration,
    /// Uniform window before the first blink of a session.
    pub initial_window: (Duration, Duration),
    /// Uniform window between subsequent blinks.
    pub repeat_window: (Duration, Duration),
    /// Chance that a completed blink is followed by a quick second one.
    pub double_blink_chance: f64,
    /// Delay before the follow-up blink of a double.
    pub double_blink_delay: Duration,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        BlinkConfig {
            close_duration: Duration::from_millis(60),
            open_duration: Duration::from_millis(100),
            initial_window: (Duration::from_secs(2), Duration::from_secs(5)),
            repeat_window: (Duration::from_secs(2), Duration::from_secs(6)),
            double_blink_chance: 0.2,
            double_blink_delay: Duration::from_millis(150),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BlinkPhase {
    /// Eyes open, waiting for the next deadline.
    Idle,
    /// Lid travelling down.
    Closing,
    /// Lid travelling back up.
    Opening,
}

/// State machine producing the eyelid closure weight.
#[derive(Debug)]
pub struct BlinkMachine {
    config: BlinkConfig,
    phase: BlinkPhase,
    /// Closure amount, 0 = open, 1 = closed.
    progress: f32,
    next_blink_at: FrameTime,
    rng: StdRng,
}

impl BlinkMachine {
    pub fn new(config: BlinkConfig, start: FrameTime, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let next_blink_at = start + jitter::draw(&mut rng, config.initial_window);
        BlinkMachine {
            config,
            phase: BlinkPhase::Idle,
            progress: 0.0,
            next_blink_at,
            rng,
        }
    }

    /// Advances the cycle and returns this frame's eyelid closure weight.
    ///
    /// The frame that crosses a phase boundary spends no travel time in the
    /// new phase; motion starts on the following frame.
    pub fn update(&mut self, now: FrameTime, dt: Duration) -> f32 {
        match self.phase {
            BlinkPhase::Idle => {
                if now >= self.next_blink_at {
                    self.phase = BlinkPhase::Closing;
                    debug!("blink");
                }
            }
            BlinkPhase::Closing => {
                self.progress += dt.as_secs_f32() / travel(self.config.close_duration);
                if self.progress >= 1.0 {
                    self.progress = 1.0;
                    self.phase = BlinkPhase::Opening;
                }
            }
            BlinkPhase::Opening => {
                self.progress -= dt.as_secs_f32() / travel(self.config.open_duration);
                if self.progress <= 0.0 {
                    self.progress = 0.0;
                    self.phase = BlinkPhase::Idle;
                    self.next_blink_at = now + self.next_delay();
                }
            }
        }
        self.progress
    }

    fn next_delay(&mut self) -> Duration {
        let chance = self.config.double_blink_chance.clamp(0.0, 1.0);
        if self.rng.gen_bool(chance) {
            self.config.double_blink_delay
        } else {
            jitter::draw(&mut self.rng, self.config.repeat_window)
        }
    }

    pub fn phase(&self) -> BlinkPhase {
        self.phase
    }

    /// Current closure weight without advancing the machine.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn next_blink_at(&self) -> FrameTime {
        self.next_blink_at
    }
}

/// Travel durations are divisors; a zero config value degenerates to a
/// one-frame snap instead of poisoning the weight.
fn travel(d: Duration) -> f32 {
    d.as_secs_f32().max(1e-6)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: Duration = Duration::from_millis(20);

    /// Fixed windows make the cycle deterministic regardless of seed.
    fn fixed_config(double_chance: f64) -> BlinkConfig {
        BlinkConfig {
            initial_window: (Duration::from_secs(2), Duration::from_secs(2)),
            repeat_window: (Duration::from_secs(3), Duration::from_secs(3)),
            double_blink_chance: double_chance,
            ..BlinkConfig::default()
        }
    }

    fn run_cycle(machine: &mut BlinkMachine, now: &mut FrameTime) -> Vec<f32> {
        let mut weights = Vec::new();
        loop {
            *now = *now + DT;
            let w = machine.update(*now, DT);
            weights.push(w);
            if machine.phase() == BlinkPhase::Idle && w == 0.0 && weights.len() > 1 {
                return weights;
            }
            assert!(weights.len() < 100, "cycle never completed");
        }
    }

    #[test]
    fn test_full_cycle_shape() {
        let mut machine = BlinkMachine::new(fixed_config(0.0), FrameTime::ZERO, 1);
        let mut now = FrameTime::ZERO;

        // Nothing happens before the deadline.
        for _ in 0..99 {
            now = now + DT;
            assert_eq!(machine.update(now, DT), 0.0);
            assert_eq!(machine.phase(), BlinkPhase::Idle);
        }

        // Frame 100 lands exactly on the 2s deadline: the transition frame
        // consumes no travel time.
        now = now + DT;
        assert_eq!(machine.update(now, DT), 0.0);
        assert_eq!(machine.phase(), BlinkPhase::Closing);

        // 60ms close at 20ms frames: strictly rising, closed on the third.
        let mut last = 0.0;
        for _ in 0..3 {
            now = now + DT;
            let w = machine.update(now, DT);
            assert!(w > last);
            last = w;
        }
        assert_eq!(last, 1.0);
        assert_eq!(machine.phase(), BlinkPhase::Opening);

        // 100ms open: strictly falling, essentially open after five frames
        // (rounding can leave a sub-visible residue for one extra frame).
        for _ in 0..5 {
            now = now + DT;
            let w = machine.update(now, DT);
            assert!(w < last);
            last = w;
        }
        assert!(last < 1e-6);

        now = now + DT;
        assert_eq!(machine.update(now, DT), 0.0);
        assert_eq!(machine.phase(), BlinkPhase::Idle);
    }

    #[test]
    fn test_repeat_deadline_counts_from_reopen() {
        let mut machine = BlinkMachine::new(fixed_config(0.0), FrameTime::ZERO, 1);
        let mut now = FrameTime::ZERO;

        while machine.phase() == BlinkPhase::Idle {
            now = now + DT;
            machine.update(now, DT);
        }
        run_cycle(&mut machine, &mut now);
        let reopened_at = now;

        assert_eq!(
            machine.next_blink_at() - reopened_at,
            Duration::from_secs(3)
        );
    }

    #[test]
    fn test_double_blink_uses_short_delay() {
        let mut machine = BlinkMachine::new(fixed_config(1.0), FrameTime::ZERO, 1);
        let mut now = FrameTime::ZERO;

        while machine.phase() == BlinkPhase::Idle {
            now = now + DT;
            machine.update(now, DT);
        }
        run_cycle(&mut machine, &mut now);

        assert_eq!(
            machine.next_blink_at() - now,
            Duration::from_millis(150)
        );
    }

    #[test]
    fn test_weight_bounded_over_long_run() {
        let mut machine = BlinkMachine::new(BlinkConfig::default(), FrameTime::ZERO, 7);
        let mut now = FrameTime::ZERO;
        let mut blinks = 0;
        let mut was_closing = false;
        for _ in 0..60_000 {
            now = now + Duration::from_millis(16);
            let w = machine.update(now, Duration::from_millis(16));
            assert!((0.0..=1.0).contains(&w));
            let closing = machine.phase() == BlinkPhase::Closing;
            if closing && !was_closing {
                blinks += 1;
            }
            was_closing = closing;
        }
        // 16 minutes with 2-6s gaps (and occasional 150ms doubles).
        assert!(blinks > 100, "only {blinks} blinks");
    }
}
