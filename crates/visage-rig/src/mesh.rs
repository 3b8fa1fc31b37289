//! Morph mesh - one mesh's channel dictionary and influence array

use std::collections::HashMap;

/// A single mesh exposing morph-target channels.
///
/// Mirrors what a loaded model hands us: a name→index dictionary and a
/// parallel array of influence weights, one entry per morph target. The
/// dictionary is fixed at construction; only the weights change.
#[derive(Debug, Clone)]
pub struct MorphMesh {
    name: String,
    channels: HashMap<String, usize>,
    influences: Vec<f32>,
}

impl MorphMesh {
    /// Build a mesh from its channel names, in morph-target order.
    /// All influences start at zero.
    pub fn new<I, S>(name: impl Into<String>, channel_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut channels = HashMap::new();
        let mut count = 0;
        for (index, channel) in channel_names.into_iter().enumerate() {
            channels.insert(channel.into(), index);
            count = index + 1;
        }

        MorphMesh {
            name: name.into(),
            channels,
            influences: vec![0.0; count],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index of a channel in the influence array, if this mesh has it.
    pub fn channel_index(&self, channel: &str) -> Option<usize> {
        self.channels.get(channel).copied()
    }

    /// Number of morph-target channels.
    pub fn channel_count(&self) -> usize {
        self.influences.len()
    }

    /// The full influence array, for renderer read-back.
    pub fn influences(&self) -> &[f32] {
        &self.influences
    }

    #[inline]
    pub(crate) fn influence(&self, index: usize) -> Option<f32> {
        self.influences.get(index).copied()
    }

    #[inline]
    pub(crate) fn set_influence(&mut self, index: usize, weight: f32) {
        if let Some(slot) = self.influences.get_mut(index) {
            *slot = weight;
        }
    }
}
