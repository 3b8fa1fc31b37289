//! Cue cursor - single-index scan over the lipsync track

use visage_core::AudioTime;

use crate::{CueSymbol, LipsyncTrack};

/// Position cursor over the current track.
///
/// Normal forward playback advances the index by at most a cue or two per
/// frame, so the scan is amortized O(1); a large forward seek degrades to
/// one O(n) catch-up scan. A backward seek past the previous cue boundary
/// resets to zero and rescans.
#[derive(Clone, Copy, Debug, Default)]
pub struct CueCursor {
    index: usize,
}

impl CueCursor {
    pub fn new() -> Self {
        CueCursor::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// Advance against the playback position and resolve the active symbol.
    ///
    /// Returns the cue symbol at `t`, or X when `t` falls outside every
    /// cue (leading silence, gaps, or past the end of the track).
    pub fn advance(&mut self, track: &LipsyncTrack, t: AudioTime) -> CueSymbol {
        if track.is_empty() {
            self.index = 0;
            return CueSymbol::X;
        }

        let cues = track.cues();
        let mut i = self.index.min(cues.len() - 1);

        // Playback regressed past the boundary where the previous cue
        // ended: rescan from the top.
        if i > 0 && t < cues[i - 1].end {
            i = 0;
        }

        while i < cues.len() - 1 && t > cues[i].end {
            i += 1;
        }
        self.index = i;

        let cue = &cues[i];
        if t >= cue.start && t <= cue.end {
            cue.symbol
        } else {
            CueSymbol::X
        }
    }
}
