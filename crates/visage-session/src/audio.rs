//! Audio transport seam
//!
//! The session never extrapolates speech time on its own: every frame it
//! asks the transport where playback is and drives the mouth from that.
//! Pauses, stalls, and seeks in the transport therefore reach the face
//! without any session-side bookkeeping.

use visage_core::{AudioTime, VisageResult};

/// Playback backend for speech audio.
///
/// Implementations own the clock. [`position`](AudioTransport::position)
/// is polled once per frame and may move backward (seeks) or stand still
/// (pauses); the rest of the pipeline is built to follow either.
pub trait AudioTransport {
    /// Prepares the clip for `script` and rewinds to the start.
    fn load(&mut self, script: &str) -> VisageResult<()>;

    fn play(&mut self);

    fn pause(&mut self);

    fn seek(&mut self, to: AudioTime);

    /// Current playback position on the speech clock.
    fn position(&self) -> AudioTime;

    fn is_playing(&self) -> bool;
}

/// Transport with no audio behind it: the clock only moves when seeked.
///
/// Useful for rigs that animate without speech, and as a stand-in while a
/// real backend is wired up.
#[derive(Debug, Default)]
pub struct NullAudio {
    position: AudioTime,
    playing: bool,
}

impl NullAudio {
    pub fn new() -> Self {
        NullAudio::default()
    }
}

impl AudioTransport for NullAudio {
    fn load(&mut self, _script: &str) -> VisageResult<()> {
        self.position = AudioTime::ZERO;
        Ok(())
    }

    fn play(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, to: AudioTime) {
        self.position = to;
    }

    fn position(&self) -> AudioTime {
        self.position
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}
