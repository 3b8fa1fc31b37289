//! Scripted doubles for the session seams

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::oneshot;
use visage_core::{AudioTime, VisageResult};
use visage_lipsync::{Cue, CueSymbol, LipsyncTrack};
use visage_session::{AudioTransport, PendingTrack, TrackSource};

/// Audio transport with a hand-cranked clock.
///
/// The position moves only through [`advance`](ScriptedAudio::advance) (and
/// only while playing), so tests control speech time exactly.
#[derive(Debug, Default)]
pub struct ScriptedAudio {
    position: AudioTime,
    playing: bool,
    loaded: Vec<String>,
}

impl ScriptedAudio {
    pub fn new() -> Self {
        ScriptedAudio::default()
    }

    /// Moves the playback clock forward if playing.
    pub fn advance(&mut self, dt: Duration) {
        if self.playing {
            self.position = self.position + dt;
        }
    }

    /// Every script ever loaded, in order.
    pub fn loaded(&self) -> &[String] {
        &self.loaded
    }
}

impl AudioTransport for ScriptedAudio {
    fn load(&mut self, script: &str) -> VisageResult<()> {
        self.loaded.push(script.to_string());
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

type PendingSender = oneshot::Sender<VisageResult<LipsyncTrack>>;

/// Track source whose fetches resolve only when the test says so.
///
/// Clones share state: keep one clone outside the session to answer (or
/// deliberately ignore) fetches from the test body.
#[derive(Clone, Default)]
pub struct ManualTrackSource {
    inner: Arc<Mutex<Vec<(String, PendingSender)>>>,
}

impl ManualTrackSource {
    pub fn new() -> Self {
        ManualTrackSource::default()
    }

    /// Answers the fetch for `script`. Returns false if no such fetch is
    /// waiting or the session has already moved on.
    pub fn resolve(&self, script: &str, result: VisageResult<LipsyncTrack>) -> bool {
        let mut inner = self.inner.lock().unwrap();
        match inner.iter().position(|(name, _)| name == script) {
            Some(index) => {
                let (_, tx) = inner.remove(index);
                tx.send(result).is_ok()
            }
            None => false,
        }
    }

    /// Scripts with a fetch still waiting, oldest first.
    pub fn pending(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }
}

impl TrackSource for ManualTrackSource {
    fn fetch(&mut self, script: &str) -> PendingTrack {
        let (tx, pending) = PendingTrack::channel();
        self.inner.lock().unwrap().push((script.to_string(), tx));
        pending
    }
}

/// A two-second spoken phrase with a leading pause, a mid-phrase breath,
/// and a trailing silence. Symbols cover vowels, a fricative, and a
/// dental, which is enough spread to watch channels trade places.
pub fn sample_track() -> LipsyncTrack {
    let cue = |start: i64, end: i64, symbol: CueSymbol| Cue {
        start: AudioTime::from_millis(start),
        end: AudioTime::from_millis(end),
        symbol,
    };
    LipsyncTrack::from_cues(vec![
        cue(0, 300, CueSymbol::X),
        cue(300, 450, CueSymbol::C),
        cue(450, 600, CueSymbol::B),
        cue(600, 850, CueSymbol::A),
        cue(850, 1000, CueSymbol::D),
        cue(1000, 1150, CueSymbol::X),
        cue(1150, 1300, CueSymbol::H),
        cue(1300, 1500, CueSymbol::B),
        cue(1500, 1700, CueSymbol::F),
        cue(1700, 2000, CueSymbol::X),
    ])
    .expect("sample track is well-formed")
}
