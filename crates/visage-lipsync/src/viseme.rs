//! Viseme tables - cue symbols, visemes, and per-channel strengths

use std::collections::HashMap;

/// Phoneme cue symbol as produced by the lipsync extraction tool.
///
/// The recognized alphabet is A through H plus X for silence; any other
/// symbol on the wire normalizes to X.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum CueSymbol {
    #[default]
    X,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl CueSymbol {
    /// Total parse: unrecognized symbols become X (silence).
    pub fn parse(symbol: &str) -> Self {
        match symbol {
            "A" => CueSymbol::A,
            "B" => CueSymbol::B,
            "C" => CueSymbol::C,
            "D" => CueSymbol::D,
            "E" => CueSymbol::E,
            "F" => CueSymbol::F,
            "G" => CueSymbol::G,
            "H" => CueSymbol::H,
            _ => CueSymbol::X,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CueSymbol::X => "X",
            CueSymbol::A => "A",
            CueSymbol::B => "B",
            CueSymbol::C => "C",
            CueSymbol::D => "D",
            CueSymbol::E => "E",
            CueSymbol::F => "F",
            CueSymbol::G => "G",
            CueSymbol::H => "H",
        }
    }
}

/// Mouth shape driven by the compositor, one blend-shape channel each.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Viseme {
    /// Closed/neutral mouth
    #[default]
    Sil,
    /// "ah" as in "father"
    Aa,
    /// "eh" as in "bed"
    E,
    /// "ee" as in "see"
    I,
    /// "oh" as in "boat"
    O,
    /// "oo" as in "boot"
    U,
    /// "f", "v" (teeth on lip)
    Ff,
    /// "n", "ng" (nasal)
    Nn,
    /// "th" (tongue between teeth)
    Th,
}

impl Viseme {
    pub const ALL: [Viseme; 9] = [
        Viseme::Sil,
        Viseme::Aa,
        Viseme::E,
        Viseme::I,
        Viseme::O,
        Viseme::U,
        Viseme::Ff,
        Viseme::Nn,
        Viseme::Th,
    ];

    /// The mesh blend-shape channel this viseme drives.
    ///
    /// Names follow the ARKit-style convention the reference rigs use;
    /// casing matters for dictionary lookups.
    pub fn channel(self) -> &'static str {
        match self {
            Viseme::Sil => "viseme_sil",
            Viseme::Aa => "viseme_aa",
            Viseme::E => "viseme_E",
            Viseme::I => "viseme_I",
            Viseme::O => "viseme_O",
            Viseme::U => "viseme_U",
            Viseme::Ff => "viseme_FF",
            Viseme::Nn => "viseme_nn",
            Viseme::Th => "viseme_TH",
        }
    }
}

/// Total mapping from cue symbol to viseme. Fixed at startup.
#[derive(Clone, Debug)]
pub struct VisemeMap {
    table: [Viseme; 9],
}

impl Default for VisemeMap {
    fn default() -> Self {
        // X,A..H in symbol order.
        VisemeMap {
            table: [
                Viseme::Sil,
                Viseme::Aa,
                Viseme::E,
                Viseme::I,
                Viseme::O,
                Viseme::U,
                Viseme::Ff,
                Viseme::Nn,
                Viseme::Th,
            ],
        }
    }
}

impl VisemeMap {
    pub fn viseme(&self, symbol: CueSymbol) -> Viseme {
        self.table[symbol as usize]
    }
}

/// Per-channel peak intensity, keyed by channel name.
///
/// The default table covers the full fifteen-channel viseme set even though
/// the default map only reaches nine of them, so retuned or remapped rigs
/// keep their levels. A channel absent from the table peaks at 1.0.
#[derive(Clone, Debug)]
pub struct ChannelStrength {
    table: HashMap<String, f32>,
}

impl Default for ChannelStrength {
    fn default() -> Self {
        let entries = [
            ("viseme_sil", 0.0),
            ("viseme_PP", 0.9),
            ("viseme_FF", 0.75),
            ("viseme_TH", 0.7),
            ("viseme_DD", 0.6),
            ("viseme_kk", 0.6),
            ("viseme_CH", 0.7),
            ("viseme_SS", 0.6),
            ("viseme_nn", 0.6),
            ("viseme_RR", 0.6),
            ("viseme_aa", 1.0),
            ("viseme_E", 0.8),
            ("viseme_I", 0.7),
            ("viseme_O", 0.9),
            ("viseme_U", 0.8),
        ];

        ChannelStrength {
            table: entries
                .into_iter()
                .map(|(name, peak)| (name.to_string(), peak))
                .collect(),
        }
    }
}

impl ChannelStrength {
    /// Peak intensity for a channel; 1.0 when the channel is not listed.
    pub fn peak(&self, channel: &str) -> f32 {
        self.table.get(channel).copied().unwrap_or(1.0)
    }

    /// Override one channel's peak, clamped to [0, 1].
    pub fn set(&mut self, channel: impl Into<String>, peak: f32) {
        self.table.insert(channel.into(), peak.clamp(0.0, 1.0));
    }
}
