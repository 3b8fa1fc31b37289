//! Avatar session - the per-frame driver
//!
//! One session owns everything that moves on one avatar. Each frame it
//! completes any due track fetch, advances the animation scheduler and the
//! blink machine, reads the speech clock, and lets the viseme compositor
//! write the mouth. The frame path is total: fetch failures and missing
//! tracks are logged and counted, never surfaced as frame errors.

use std::time::Duration;

use tracing::{debug, warn};
use visage_anim::{AnimationScheduler, BlinkMachine};
use visage_core::{AudioTime, FrameTime, VisageResult};
use visage_lipsync::{LipsyncTrack, VisemeCompositor};
use visage_rig::{ChannelBinding, Rig};

use crate::audio::AudioTransport;
use crate::loader::{PendingTrack, TrackSource};

/// Session wiring knobs.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Rig channel the blink machine drives.
    pub eyelid_channel: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            eyelid_channel: "eyesClosed".to_string(),
        }
    }
}

/// Frame and fetch counters, cheap enough to keep always-on.
#[derive(Clone, Debug, Default)]
pub struct SessionStats {
    pub frames: u64,
    pub scripts_selected: u64,
    pub tracks_installed: u64,
    pub tracks_discarded: u64,
    pub fetch_failures: u64,
}

/// The per-frame driver for one animated avatar.
pub struct AvatarSession<A: AudioTransport, S: TrackSource> {
    rig: Rig,
    scheduler: AnimationScheduler,
    blink: BlinkMachine,
    compositor: VisemeCompositor,
    eyelid: ChannelBinding,
    audio: A,
    source: S,
    track: Option<LipsyncTrack>,
    pending: Option<(u64, PendingTrack)>,
    generation: u64,
    script: Option<String>,
    stats: SessionStats,
}

impl<A: AudioTransport, S: TrackSource> AvatarSession<A, S> {
    pub fn new(
        rig: Rig,
        scheduler: AnimationScheduler,
        blink: BlinkMachine,
        audio: A,
        source: S,
        config: SessionConfig,
    ) -> Self {
        let compositor = VisemeCompositor::new(&rig);
        let eyelid = rig.bind_channel(&config.eyelid_channel);
        AvatarSession {
            rig,
            scheduler,
            blink,
            compositor,
            eyelid,
            audio,
            source,
            track: None,
            pending: None,
            generation: 0,
            script: None,
            stats: SessionStats::default(),
        }
    }

    /// Switches the session to a new script.
    ///
    /// Everything speech-related resets synchronously: the cue cursor, the
    /// audio clock, and any fetch still in flight for the previous script.
    /// The new track is fetched off the frame path and installs on the
    /// frame its result lands.
    pub fn select_script(&mut self, script: &str) -> VisageResult<()> {
        self.generation += 1;
        if let Some((generation, pending)) = self.pending.take() {
            warn!(generation, "superseding lipsync fetch still in flight");
            self.stats.tracks_discarded += 1;
            drop(pending);
        }
        self.track = None;
        self.compositor.reset();

        self.audio.load(script)?;
        self.audio.seek(AudioTime::ZERO);

        self.pending = Some((self.generation, self.source.fetch(script)));
        self.script = Some(script.to_string());
        self.stats.scripts_selected += 1;
        debug!(script, generation = self.generation, "script selected");
        Ok(())
    }

    /// Starts or pauses speech playback on the transport.
    pub fn set_playing(&mut self, playing: bool) {
        if playing {
            self.audio.play();
        } else {
            self.audio.pause();
        }
    }

    /// Advances the whole avatar by one frame.
    ///
    /// `now` is the monotonic frame clock; `dt` the time since the last
    /// frame. This never fails: a session with no track, a paused clock,
    /// or a fetch error still produces a coherent pose.
    pub fn frame(&mut self, now: FrameTime, dt: Duration) {
        // 1. Complete a due lipsync fetch.
        if let Some((generation, mut pending)) = self.pending.take() {
            match pending.poll() {
                None => self.pending = Some((generation, pending)),
                Some(Ok(track)) => {
                    debug!(generation, cues = track.len(), "lipsync track installed");
                    self.track = Some(track);
                    self.stats.tracks_installed += 1;
                }
                Some(Err(e)) => {
                    warn!(generation, error = %e, "lipsync fetch failed");
                    self.stats.fetch_failures += 1;
                }
            }
        }

        // 2. Body clips.
        self.scheduler.update(now, dt);

        // 3. Eyelids bypass the smoother; the blink shape is the signal.
        let eyelid = self.blink.update(now, dt);
        self.rig.write_binding(&self.eyelid, eyelid);

        // 4. Mouth follows the speech clock.
        let at = self.audio.position();
        self.compositor.update(&mut self.rig, self.track.as_ref(), at, dt);

        self.stats.frames += 1;
    }

    pub fn rig(&self) -> &Rig {
        &self.rig
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    pub fn blink(&self) -> &BlinkMachine {
        &self.blink
    }

    pub fn compositor(&self) -> &VisemeCompositor {
        &self.compositor
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    /// Script most recently selected, if any.
    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn track(&self) -> Option<&LipsyncTrack> {
        self.track.as_ref()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }
}
