//! Blend-shape compositor - smoothed viseme weights into the rig

use std::time::Duration;

use visage_core::{AudioTime, ResponseRates};
use visage_rig::{ChannelBinding, Rig};

use crate::{ChannelStrength, CueCursor, LipsyncTrack, Viseme, VisemeMap};

/// Drives every viseme channel toward its target each frame.
///
/// Exactly one viseme is the active target at a time; all others are driven
/// toward zero. The asymmetric rates make shapes snap on and release
/// softly, so the previously active channel stays transiently non-zero
/// while it decays.
#[derive(Debug)]
pub struct VisemeCompositor {
    map: VisemeMap,
    strengths: ChannelStrength,
    rates: ResponseRates,
    cursor: CueCursor,
    active: Viseme,
    bindings: Vec<(Viseme, ChannelBinding)>,
}

impl VisemeCompositor {
    /// Default tables and rates, channels resolved against `rig` once.
    pub fn new(rig: &Rig) -> Self {
        Self::with_tuning(
            rig,
            VisemeMap::default(),
            ChannelStrength::default(),
            ResponseRates::default(),
        )
    }

    pub fn with_tuning(
        rig: &Rig,
        map: VisemeMap,
        strengths: ChannelStrength,
        rates: ResponseRates,
    ) -> Self {
        let bindings = Viseme::ALL
            .iter()
            .map(|&viseme| (viseme, rig.bind_channel(viseme.channel())))
            .collect();

        VisemeCompositor {
            map,
            strengths,
            rates,
            cursor: CueCursor::new(),
            active: Viseme::Sil,
            bindings,
        }
    }

    /// One frame of viseme compositing.
    ///
    /// With no track (or an empty one) this performs no writes at all, so
    /// whatever the influences decayed to stays on the mesh.
    pub fn update(&mut self, rig: &mut Rig, track: Option<&LipsyncTrack>, t: AudioTime, dt: Duration) {
        let Some(track) = track else {
            return;
        };
        if track.is_empty() {
            return;
        }

        let symbol = self.cursor.advance(track, t);
        self.active = self.map.viseme(symbol);

        let dt = dt.as_secs_f32();
        for (viseme, binding) in &self.bindings {
            let target = if *viseme == self.active {
                self.strengths.peak(viseme.channel())
            } else {
                0.0
            };

            // Rate selection is per slot: a channel still releasing on one
            // mesh can already be attacking on another.
            for &slot in binding.slots() {
                let current = rig.influence(slot);
                rig.set_influence(slot, self.rates.step(current, target, dt));
            }
        }
    }

    /// Back to the top of the track and silence, without touching the
    /// influence values; they decay over the following frames.
    pub fn reset(&mut self) {
        self.cursor.reset();
        self.active = Viseme::Sil;
    }

    pub fn active_viseme(&self) -> Viseme {
        self.active
    }

    pub fn cursor_index(&self) -> usize {
        self.cursor.index()
    }
}
