//! Talking-head demo: runs a full avatar session in real time and narrates
//! what the rig is doing to the terminal.
//!
//! Usage: avatar-demo [tracks-dir] [script]
//!
//! Looks for `<tracks-dir>/<script>.json` (default
//! `demos/avatar-demo/tracks/welcome.json`, generated lipsync cues in the
//! usual `mouthCues` layout). Set RUST_LOG=debug to watch the scheduler
//! and loader decisions underneath the narration.

use std::time::Duration;

use tokio::runtime::Handle;
use tracing_subscriber::EnvFilter;
use visage_anim::{
    AnimationScheduler, BlinkConfig, BlinkMachine, BlinkPhase, ClipLibrary, ClipSpec,
    CrossfadeConfig, CrossfadeRoles, CrossfadeScheduler,
};
use visage_core::{AudioTime, FrameTime, VisageResult};
use visage_lipsync::Viseme;
use visage_rig::{InfluenceSlot, MorphMesh, Rig};
use visage_session::{
    AudioTransport, AvatarSession, JsonTrackSource, SessionConfig,
};

const DT: Duration = Duration::from_millis(16);

/// Audio clock driven by the frame loop. Stands in for a real playback
/// backend; position advances with the frames while playing.
struct DemoAudio {
    position: AudioTime,
    playing: bool,
}

impl DemoAudio {
    fn new() -> Self {
        DemoAudio {
            position: AudioTime::ZERO,
            playing: false,
        }
    }

    fn advance(&mut self, dt: Duration) {
        if self.playing {
            self.position = self.position + dt;
        }
    }
}

impl AudioTransport for DemoAudio {
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

fn demo_rig() -> Rig {
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
    .expect("empty rig");
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
    .expect("empty rig");
    rig.add_mesh(MorphMesh::new("EyeLeft", ["eyesClosed"])).expect("empty rig");
    rig.add_mesh(MorphMesh::new("EyeRight", ["eyesClosed"])).expect("empty rig");
    rig
}

/// Strongest open-mouth influence on the head, for the status line.
fn mouth_peak(session: &AvatarSession<DemoAudio, JsonTrackSource>) -> f32 {
    let rig = session.rig();
    let Some(mesh) = rig.mesh_id("Head") else {
        return 0.0;
    };
    let mut peak = 0.0f32;
    for viseme in Viseme::ALL {
        if viseme == Viseme::Sil {
            continue;
        }
        if let Some(index) = rig.mesh(mesh).and_then(|m| m.channel_index(viseme.channel())) {
            peak = peak.max(rig.influence(InfluenceSlot { mesh, index }));
        }
    }
    peak
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let tracks_dir = args
        .get(1)
        .cloned()
        .unwrap_or_else(|| "demos/avatar-demo/tracks".to_string());
    let script = args.get(2).cloned().unwrap_or_else(|| "welcome".to_string());

    let library = ClipLibrary::new(vec![
        ClipSpec::new("Idle", 9.4),
        ClipSpec::new("StandingGreeting", 3.2),
        ClipSpec::new("StandingIdle", 7.0),
    ]);
    let scheduler: AnimationScheduler = CrossfadeScheduler::new(
        &library,
        CrossfadeRoles {
            idle: "Idle".into(),
            greeting: Some("StandingGreeting".into()),
            variation: Some("StandingIdle".into()),
        },
        CrossfadeConfig::default(),
        FrameTime::ZERO,
        0xFACADE,
    )?
    .into();

    let mut session = AvatarSession::new(
        demo_rig(),
        scheduler,
        BlinkMachine::new(BlinkConfig::default(), FrameTime::ZERO, 0xFACADE),
        DemoAudio::new(),
        JsonTrackSource::new(&tracks_dir, Handle::current()),
        SessionConfig::default(),
    );

    println!("visage avatar demo");
    println!(
        "  rig: {} meshes | clips: {}",
        session.rig().mesh_count(),
        library
            .names()
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("  tracks: {tracks_dir}/{script}.json");
    println!();

    let mut ticker = tokio::time::interval(DT);
    let mut now = FrameTime::ZERO;
    let mut blinks = 0u32;
    let mut was_closing = false;
    let mut speech_started = false;
    let mut seeked = false;
    let mut replayed = false;

    // 14 seconds: fade-in, greeting, the scripted line (with a mid-phrase
    // rewind and a full replay), and settling back.
    for frame in 0..875u32 {
        ticker.tick().await;
        now = now + DT;
        session.audio_mut().advance(DT);
        session.frame(now, DT);

        let closing = session.blink().phase() == BlinkPhase::Closing;
        if closing && !was_closing {
            blinks += 1;
        }
        was_closing = closing;

        // Kick the scripted line off once the greeting is underway.
        if !speech_started && now.as_secs_f64() >= 4.0 {
            speech_started = true;
            match session.select_script(&script) {
                Ok(()) => {
                    session.set_playing(true);
                    println!("[{:5.2}s] speaking '{script}'", now.as_secs_f64());
                }
                Err(e) => println!("[{:5.2}s] no speech: {e}", now.as_secs_f64()),
            }
        }

        // Scrub back mid-phrase; the mouth re-tracks from the new position.
        if speech_started && !seeked && now.as_secs_f64() >= 5.5 {
            seeked = true;
            session.audio_mut().seek(AudioTime::from_millis(300));
            println!("[{:5.2}s] seek back to 0.30s of audio", now.as_secs_f64());
        }

        // Select the script again: the session rewinds, drops the old
        // track, and fetches a fresh one.
        if seeked && !replayed && now.as_secs_f64() >= 9.0 {
            replayed = true;
            match session.select_script(&script) {
                Ok(()) => {
                    session.set_playing(true);
                    println!("[{:5.2}s] replaying '{script}'", now.as_secs_f64());
                }
                Err(e) => println!("[{:5.2}s] no replay: {e}", now.as_secs_f64()),
            }
        }

        if frame % 30 == 29 {
            let viseme = format!("{:?}", session.compositor().active_viseme());
            println!(
                "[{:5.2}s] clip {:<16} w {:4.2} | viseme {:<3} mouth {:4.2} | eyelid {:4.2}",
                now.as_secs_f64(),
                session.scheduler().active_clip(),
                session.scheduler().weight_of(session.scheduler().active_clip()),
                viseme,
                mouth_peak(&session),
                session.blink().progress(),
            );
        }
    }

    session.set_playing(false);
    let stats = session.stats();
    println!();
    println!(
        "done: {} frames, {} tracks installed, {} fetch failures, {} blinks",
        stats.frames, stats.tracks_installed, stats.fetch_failures, blinks
    );
    Ok(())
}
