//! Time primitives for the visage engine
//!
//! Two clocks drive an avatar session:
//! - FrameTime: monotonic, supplied by the frame driver, never decreases
//! - AudioTime: elastic playback position, may jump backward on seek

use std::ops::{Add, Sub};
use std::time::Duration;

/// Monotonic session time, in microseconds since session start.
///
/// Every scheduling deadline (next blink, next idle variation, next blend
/// flip) is stored as an absolute `FrameTime` and compared against the
/// frame clock, so there are no ambient timers to leak.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FrameTime(pub u64);

impl FrameTime {
    pub const ZERO: FrameTime = FrameTime(0);

    #[inline]
    pub fn from_micros(micros: u64) -> Self {
        FrameTime(micros)
    }

    #[inline]
    pub fn from_millis(millis: u64) -> Self {
        FrameTime(millis * 1000)
    }

    #[inline]
    pub fn from_secs_f64(secs: f64) -> Self {
        FrameTime((secs * 1_000_000.0) as u64)
    }

    #[inline]
    pub fn as_micros(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn as_millis(self) -> u64 {
        self.0 / 1000
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    #[inline]
    pub fn saturating_add(self, duration: Duration) -> Self {
        FrameTime(self.0.saturating_add(duration.as_micros() as u64))
    }
}

impl Add<Duration> for FrameTime {
    type Output = FrameTime;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        FrameTime(self.0 + rhs.as_micros() as u64)
    }
}

impl Sub<FrameTime> for FrameTime {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: FrameTime) -> Self::Output {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

impl std::fmt::Debug for FrameTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Frame({:.3}ms)", self.0 as f64 / 1000.0)
    }
}

/// Elastic audio playback position, in microseconds.
///
/// Tracks whatever the audio transport reports. Unlike [`FrameTime`] it is
/// signed and free to move backward: a seek or a script change rewinds it,
/// and the cue cursor is expected to cope.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AudioTime(pub i64);

impl AudioTime {
    pub const ZERO: AudioTime = AudioTime(0);

    #[inline]
    pub fn from_micros(micros: i64) -> Self {
        AudioTime(micros)
    }

    #[inline]
    pub fn from_millis(millis: i64) -> Self {
        AudioTime(millis * 1000)
    }

    #[inline]
    pub fn from_secs_f64(secs: f64) -> Self {
        AudioTime((secs * 1_000_000.0) as i64)
    }

    #[inline]
    pub fn as_micros(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn as_millis(self) -> i64 {
        self.0 / 1000
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    #[inline]
    pub fn saturating_add(self, duration: Duration) -> Self {
        AudioTime(self.0.saturating_add(duration.as_micros() as i64))
    }

    #[inline]
    pub fn saturating_sub(self, duration: Duration) -> Self {
        AudioTime(self.0.saturating_sub(duration.as_micros() as i64))
    }
}

impl Add<Duration> for AudioTime {
    type Output = AudioTime;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        AudioTime(self.0 + rhs.as_micros() as i64)
    }
}

impl Sub<Duration> for AudioTime {
    type Output = AudioTime;

    #[inline]
    fn sub(self, rhs: Duration) -> Self::Output {
        AudioTime(self.0 - rhs.as_micros() as i64)
    }
}

impl Sub<AudioTime> for AudioTime {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: AudioTime) -> Self::Output {
        let diff = self.0 - rhs.0;
        if diff >= 0 {
            Duration::from_micros(diff as u64)
        } else {
            Duration::ZERO
        }
    }
}

impl std::fmt::Debug for AudioTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Audio({:.3}ms)", self.0 as f64 / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_time_monotonic() {
        let t1 = FrameTime::from_millis(100);
        let t2 = t1 + Duration::from_millis(10);

        assert!(t2 > t1);
        assert_eq!(t2 - t1, Duration::from_millis(10));
    }

    #[test]
    fn test_frame_time_secs_conversion() {
        let t = FrameTime::from_secs_f64(1.5);

        assert_eq!(t.as_micros(), 1_500_000);
        assert!((t.as_secs_f64() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_audio_time_seek_backward() {
        let before = AudioTime::from_secs_f64(1.8);
        let after = AudioTime::from_secs_f64(0.2);

        // A seek is just a smaller position; ordering must reflect it.
        assert!(after < before);
        assert_eq!(before - after, Duration::from_micros(1_600_000));
        assert_eq!(after - before, Duration::ZERO);
    }

    #[test]
    fn test_audio_time_duration_ops() {
        let t = AudioTime::from_millis(500);

        assert_eq!(t + Duration::from_millis(250), AudioTime::from_millis(750));
        assert_eq!(t - Duration::from_millis(250), AudioTime::from_millis(250));
        assert_eq!(
            AudioTime::ZERO.saturating_sub(Duration::from_millis(1)),
            AudioTime::from_millis(-1)
        );
    }
}
