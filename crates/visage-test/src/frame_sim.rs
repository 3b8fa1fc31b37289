//! Frame simulator - fixed-step session driver
//!
//! Runs an [`AvatarSession`] on a deterministic frame clock with the
//! scripted seams from [`crate::scripted`]. The [`scenarios`] module has
//! ready-made setups so tests and benches start from the same rigs.

use std::time::Duration;

use visage_anim::BlinkPhase;
use visage_core::FrameTime;
use visage_lipsync::Viseme;
use visage_rig::InfluenceSlot;
use visage_session::AvatarSession;

use crate::scripted::{ManualTrackSource, ScriptedAudio};

/// Aggregate observations from a timed run.
#[derive(Clone, Debug, Default)]
pub struct SimRun {
    pub frames: u64,
    pub blinks: u64,
    pub peak_eyelid: f32,
    /// Highest non-silence viseme influence seen on the head.
    pub peak_mouth: f32,
}

/// Fixed-step driver around one session.
pub struct FrameSimulator {
    session: AvatarSession<ScriptedAudio, ManualTrackSource>,
    source: ManualTrackSource,
    now: FrameTime,
    dt: Duration,
}

impl FrameSimulator {
    /// Wraps a session built on the scripted seams. `source` must be a
    /// clone of the one handed to the session.
    pub fn new(
        session: AvatarSession<ScriptedAudio, ManualTrackSource>,
        source: ManualTrackSource,
    ) -> Self {
        FrameSimulator {
            session,
            source,
            now: FrameTime::ZERO,
            dt: Duration::from_millis(16),
        }
    }

    pub fn with_dt(mut self, dt: Duration) -> Self {
        self.dt = dt;
        self
    }

    /// One frame: the clock ticks, playing audio moves, the session runs.
    pub fn tick(&mut self) {
        self.now = self.now + self.dt;
        let dt = self.dt;
        self.session.audio_mut().advance(dt);
        self.session.frame(self.now, dt);
    }

    pub fn run(&mut self, frames: usize) {
        for _ in 0..frames {
            self.tick();
        }
    }

    /// Runs for `span` of simulated time, collecting run statistics.
    pub fn run_for(&mut self, span: Duration) -> SimRun {
        let frames = (span.as_micros() / self.dt.as_micros()).max(1) as u64;
        let mut run = SimRun::default();
        let mut was_closing = false;

        for _ in 0..frames {
            self.tick();
            run.frames += 1;

            run.peak_eyelid = run.peak_eyelid.max(self.head_influence("eyesClosed"));
            let closing = self.session.blink().phase() == BlinkPhase::Closing;
            if closing && !was_closing {
                run.blinks += 1;
            }
            was_closing = closing;

            for viseme in Viseme::ALL {
                if viseme != Viseme::Sil {
                    run.peak_mouth = run.peak_mouth.max(self.head_influence(viseme.channel()));
                }
            }
        }
        run
    }

    /// Influence of one head channel, 0.0 when the channel is absent.
    pub fn head_influence(&self, channel: &str) -> f32 {
        let rig = self.session.rig();
        let slot = rig.mesh_id("Head").and_then(|mesh| {
            rig.mesh(mesh)
                .and_then(|m| m.channel_index(channel))
                .map(|index| InfluenceSlot { mesh, index })
        });
        match slot {
            Some(slot) => rig.influence(slot),
            None => 0.0,
        }
    }

    pub fn session(&self) -> &AvatarSession<ScriptedAudio, ManualTrackSource> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut AvatarSession<ScriptedAudio, ManualTrackSource> {
        &mut self.session
    }

    /// Shared handle for answering track fetches.
    pub fn source(&self) -> &ManualTrackSource {
        &self.source
    }

    pub fn now(&self) -> FrameTime {
        self.now
    }
}

/// Ready-made session setups over the reference rig.
pub mod scenarios {
    use visage_anim::{
        BlendConfig, BlendScheduler, BlinkConfig, BlinkMachine, ClipLibrary, ClipSpec,
        CrossfadeConfig, CrossfadeRoles, CrossfadeScheduler,
    };
    use visage_core::FrameTime;
    use visage_rig::{MorphMesh, Rig};
    use visage_session::{AvatarSession, SessionConfig};

    use super::FrameSimulator;
    use crate::scripted::{ManualTrackSource, ScriptedAudio};

    /// Head, teeth, and two eye meshes with the channels the pipeline
    /// writes. The teeth carry a reduced channel set on purpose.
    pub fn reference_rig() -> Rig {
        let mut rig = Rig::new();
        rig.add_mesh(MorphMesh::new(
            "Head",
            [
                "viseme_sil",
                "viseme_aa",
                "viseme_E",
                "viseme_I",
                "viseme_O",
                "viseme_U",
                "viseme_FF",
                "viseme_nn",
                "viseme_TH",
                "eyesClosed",
                "browInnerUp",
            ],
        ))
        .expect("fresh rig");
        rig.add_mesh(MorphMesh::new(
            "Teeth",
            [
                "viseme_sil",
                "viseme_aa",
                "viseme_E",
                "viseme_I",
                "viseme_O",
                "viseme_U",
            ],
        ))
        .expect("fresh rig");
        rig.add_mesh(MorphMesh::new("EyeLeft", ["eyesClosed"])).expect("fresh rig");
        rig.add_mesh(MorphMesh::new("EyeRight", ["eyesClosed"])).expect("fresh rig");
        rig
    }

    /// The standard clip set: a long idle loop, a greeting one-shot, and a
    /// shorter one-shot reused as the idle variation.
    pub fn reference_library() -> ClipLibrary {
        ClipLibrary::new(vec![
            ClipSpec::new("Idle", 9.4),
            ClipSpec::new("StandingGreeting", 3.2),
            ClipSpec::new("StandingIdle", 7.0),
        ])
    }

    /// Full cross-fade setup: greeting on startup, jittered variations.
    pub fn talking_head(seed: u64) -> FrameSimulator {
        let source = ManualTrackSource::new();
        let scheduler = CrossfadeScheduler::new(
            &reference_library(),
            CrossfadeRoles {
                idle: "Idle".into(),
                greeting: Some("StandingGreeting".into()),
                variation: Some("StandingIdle".into()),
            },
            CrossfadeConfig::default(),
            FrameTime::ZERO,
            seed,
        )
        .expect("reference clips resolve");
        let session = AvatarSession::new(
            reference_rig(),
            scheduler.into(),
            BlinkMachine::new(BlinkConfig::default(), FrameTime::ZERO, seed),
            ScriptedAudio::new(),
            source.clone(),
            SessionConfig::default(),
        );
        FrameSimulator::new(session, source)
    }

    /// Continuous-blend setup drifting between the two idle loops.
    pub fn swaying_idle(seed: u64) -> FrameSimulator {
        let source = ManualTrackSource::new();
        let scheduler = BlendScheduler::new(
            &reference_library(),
            "Idle",
            "StandingIdle",
            BlendConfig::default(),
            FrameTime::ZERO,
            seed,
        )
        .expect("reference clips resolve");
        let session = AvatarSession::new(
            reference_rig(),
            scheduler.into(),
            BlinkMachine::new(BlinkConfig::default(), FrameTime::ZERO, seed),
            ScriptedAudio::new(),
            source.clone(),
            SessionConfig::default(),
        );
        FrameSimulator::new(session, source)
    }

    /// Minimal setup: idle loop only, no greeting and no variations.
    pub fn bare_head(seed: u64) -> FrameSimulator {
        let source = ManualTrackSource::new();
        let library = ClipLibrary::new(vec![ClipSpec::new("Idle", 9.4)]);
        let scheduler = CrossfadeScheduler::new(
            &library,
            CrossfadeRoles::idle_only("Idle"),
            CrossfadeConfig::default(),
            FrameTime::ZERO,
            seed,
        )
        .expect("reference clips resolve");
        let session = AvatarSession::new(
            reference_rig(),
            scheduler.into(),
            BlinkMachine::new(BlinkConfig::default(), FrameTime::ZERO, seed),
            ScriptedAudio::new(),
            source.clone(),
            SessionConfig::default(),
        );
        FrameSimulator::new(session, source)
    }
}
