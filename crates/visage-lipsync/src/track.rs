//! Lipsync track - the timed cue sequence and its JSON schema

use serde::Deserialize;
use visage_core::{AudioTime, VisageError, VisageResult};

use crate::CueSymbol;

/// One timed phoneme interval.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Cue {
    pub start: AudioTime,
    pub end: AudioTime,
    pub symbol: CueSymbol,
}

/// An ordered, validated cue sequence for one script.
///
/// Tracks are replaced wholesale on script change, never edited in place.
/// Validation guarantees every interval is non-empty, starts never
/// decrease, and cues do not overlap, which is what lets the cursor get
/// away with a single-index scan.
#[derive(Clone, Debug, Default)]
pub struct LipsyncTrack {
    cues: Vec<Cue>,
}

/// Wire schema, times in seconds:
/// `{ "mouthCues": [ { "start": 0.0, "end": 0.4, "value": "A" }, ... ] }`
#[derive(Deserialize)]
struct RawTrack {
    #[serde(rename = "mouthCues")]
    mouth_cues: Vec<RawCue>,
}

#[derive(Deserialize)]
struct RawCue {
    start: f64,
    end: f64,
    value: String,
}

impl LipsyncTrack {
    /// Build a track from cues, validating ordering and intervals.
    /// An empty cue list is a valid (silent) track.
    pub fn from_cues(cues: Vec<Cue>) -> VisageResult<Self> {
        for (i, cue) in cues.iter().enumerate() {
            if cue.end <= cue.start {
                return Err(VisageError::InvalidTrack(format!(
                    "cue {i} has empty interval ({:?} >= {:?})",
                    cue.start, cue.end
                )));
            }
            if i > 0 {
                let prev = &cues[i - 1];
                if cue.start < prev.start {
                    return Err(VisageError::InvalidTrack(format!(
                        "cue {i} starts before cue {} ({:?} < {:?})",
                        i - 1,
                        cue.start,
                        prev.start
                    )));
                }
                if cue.start < prev.end {
                    return Err(VisageError::InvalidTrack(format!(
                        "cue {i} overlaps cue {} ({:?} < {:?})",
                        i - 1,
                        cue.start,
                        prev.end
                    )));
                }
            }
        }

        Ok(LipsyncTrack { cues })
    }

    /// Parse and validate the JSON wire schema.
    pub fn from_json(text: &str) -> VisageResult<Self> {
        let raw: RawTrack = serde_json::from_str(text)
            .map_err(|e| VisageError::InvalidTrack(format!("malformed JSON: {e}")))?;

        let cues = raw
            .mouth_cues
            .into_iter()
            .map(|cue| Cue {
                start: AudioTime::from_secs_f64(cue.start),
                end: AudioTime::from_secs_f64(cue.end),
                symbol: CueSymbol::parse(&cue.value),
            })
            .collect();

        Self::from_cues(cues)
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn get(&self, index: usize) -> Option<&Cue> {
        self.cues.get(index)
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// End of the last cue, or zero for an empty track.
    pub fn duration(&self) -> AudioTime {
        self.cues.last().map(|cue| cue.end).unwrap_or(AudioTime::ZERO)
    }
}
