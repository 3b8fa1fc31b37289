//! Exponential approach smoothing
//!
//! The single easing primitive used for every continuously animated value:
//! viseme channel weights, blend weights, fade tails. Each step closes a
//! fixed fraction of the remaining gap per unit time, which makes the result
//! frame-rate independent: two half-steps land exactly where one full step
//! does.

/// Move `current` toward `target` by the exponential-decay step for an
/// elapsed time of `dt` seconds at `rate` per second.
///
/// Never overshoots, and returns `current` unchanged when `dt` or `rate`
/// is not positive.
#[inline]
pub fn smooth_toward(current: f32, target: f32, dt: f32, rate: f32) -> f32 {
    if dt <= 0.0 || rate <= 0.0 {
        return current;
    }
    current + (target - current) * (1.0 - (-rate * dt).exp())
}

/// Per-update rate selection for asymmetric smoothing.
///
/// Rising values (a viseme channel being driven toward its peak) use the
/// attack rate; falling values use the release rate. Mouth shapes read
/// better when they snap on faster than they let go.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResponseRates {
    /// Rate per second when the target is above the current value.
    pub attack: f32,
    /// Rate per second when the target is at or below the current value.
    pub release: f32,
}

impl Default for ResponseRates {
    fn default() -> Self {
        ResponseRates {
            attack: 18.0,
            release: 12.0,
        }
    }
}

impl ResponseRates {
    /// Same rate in both directions.
    pub fn uniform(rate: f32) -> Self {
        ResponseRates {
            attack: rate,
            release: rate,
        }
    }

    /// The rate the next update should use for this current/target pair.
    #[inline]
    pub fn rate_for(&self, current: f32, target: f32) -> f32 {
        if target > current {
            self.attack
        } else {
            self.release
        }
    }

    /// One smoothing step with directional rate selection.
    #[inline]
    pub fn step(&self, current: f32, target: f32, dt: f32) -> f32 {
        smooth_toward(current, target, dt, self.rate_for(current, target))
    }
}
