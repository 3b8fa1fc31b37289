//! Jittered scheduling draws

use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;

/// Draws a duration uniformly from the closed window `(lo, hi)`.
///
/// Collapsed or inverted windows yield `lo`, so fixed schedules can be
/// expressed as `(d, d)`.
pub(crate) fn draw(rng: &mut StdRng, window: (Duration, Duration)) -> Duration {
    let (lo, hi) = window;
    if hi <= lo {
        return lo;
    }
    let micros = rng.gen_range(lo.as_micros() as u64..=hi.as_micros() as u64);
    Duration::from_micros(micros)
}
