//! Animation actions - playback heads and weight ramps
//!
//! An [`AnimationAction`] is one clip as a scheduler sees it: a playback
//! head, a blend weight, and optionally a linear ramp moving that weight.
//! Weight ramps are deliberately linear; the exponential smoother in
//! `visage_core` is for continuous targets, not fixed-length fades.

use std::time::Duration;

/// How a clip behaves when its head reaches the end.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LoopMode {
    /// Wrap around and keep playing.
    Repeat,
    /// Clamp on the final frame and report completion once.
    Once,
}

/// In-flight linear weight fade.
#[derive(Clone, Copy, Debug)]
struct WeightRamp {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
}

/// One clip's playback state inside a scheduler.
#[derive(Clone, Debug)]
pub struct AnimationAction {
    name: String,
    /// Clip length in seconds.
    duration: f32,
    loop_mode: LoopMode,
    /// Playback head in seconds.
    time: f32,
    playing: bool,
    weight: f32,
    ramp: Option<WeightRamp>,
    finished: bool,
    just_finished: bool,
}

impl AnimationAction {
    pub fn new(name: impl Into<String>, duration: f32, loop_mode: LoopMode) -> Self {
        AnimationAction {
            name: name.into(),
            duration,
            loop_mode,
            time: 0.0,
            playing: false,
            weight: 0.0,
            ramp: None,
            finished: false,
            just_finished: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Playback head position in seconds.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether a one-shot has clamped on its final frame.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether this action still contributes to the pose: playing with
    /// nonzero weight, or mid-ramp toward one.
    pub fn is_running(&self) -> bool {
        self.playing && (self.weight > 0.0 || self.ramp.is_some())
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    /// Halts playback and drops the pose contribution immediately.
    pub fn stop(&mut self) {
        self.playing = false;
        self.weight = 0.0;
        self.ramp = None;
    }

    /// Moves the head back to the start and clears any completion clamp.
    pub fn rewind(&mut self) {
        self.time = 0.0;
        self.finished = false;
        self.just_finished = false;
    }

    /// Sets the weight directly, cancelling any ramp in flight.
    pub fn set_weight(&mut self, weight: f32) {
        self.weight = weight;
        self.ramp = None;
    }

    /// Starts a linear fade from the current weight to `target`.
    pub fn fade_to(&mut self, target: f32, fade: Duration) {
        self.ramp = Some(WeightRamp {
            from: self.weight,
            to: target,
            elapsed: 0.0,
            duration: fade.as_secs_f32(),
        });
    }

    /// Reports a one-shot completion exactly once per playthrough.
    pub fn take_finished(&mut self) -> bool {
        std::mem::take(&mut self.just_finished)
    }

    /// Advances the head and any weight ramp by `dt`. Stopped actions are
    /// frozen; a fade-out that lands on zero stops the action.
    pub fn advance(&mut self, dt: Duration) {
        if !self.playing {
            return;
        }
        let dt = dt.as_secs_f32();

        if let Some(ramp) = &mut self.ramp {
            ramp.elapsed += dt;
            let t = if ramp.duration > 0.0 {
                (ramp.elapsed / ramp.duration).min(1.0)
            } else {
                1.0
            };
            self.weight = ramp.from + (ramp.to - ramp.from) * t;
            if t >= 1.0 {
                let landed = ramp.to;
                self.ramp = None;
                if landed <= 0.0 {
                    self.playing = false;
                    return;
                }
            }
        }

        if self.finished || self.duration <= 0.0 {
            return;
        }

        self.time += dt;
        match self.loop_mode {
            LoopMode::Repeat => {
                while self.time >= self.duration {
                    self.time -= self.duration;
                }
            }
            LoopMode::Once => {
                if self.time >= self.duration {
                    self.time = self.duration;
                    self.finished = true;
                    self.just_finished = true;
                }
            }
        }
    }
}
