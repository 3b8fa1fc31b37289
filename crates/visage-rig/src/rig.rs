//! Rig - the mesh collection and channel→slot resolution

use std::collections::HashMap;

use tracing::debug;
use visage_core::{MeshId, VisageError, VisageResult};

use crate::MorphMesh;

/// One writable influence entry: a mesh plus an index into its array.
///
/// Slots stay valid for the lifetime of the rig, so bindings are resolved
/// once and reused every frame.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct InfluenceSlot {
    pub mesh: MeshId,
    pub index: usize,
}

/// The resolved slot list for one channel name across all meshes.
///
/// A channel usually lands on several meshes at once (`viseme_aa` on head
/// and teeth, `eyesClosed` on head and both eyes). Meshes that lack the
/// channel are simply not in the list.
#[derive(Clone, Debug)]
pub struct ChannelBinding {
    channel: String,
    slots: Vec<InfluenceSlot>,
}

impl ChannelBinding {
    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn slots(&self) -> &[InfluenceSlot] {
        &self.slots
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// The morph-target rig: every mesh the animation core writes into.
#[derive(Debug, Default)]
pub struct Rig {
    meshes: Vec<MorphMesh>,
    by_name: HashMap<String, MeshId>,
}

impl Rig {
    pub fn new() -> Self {
        Rig::default()
    }

    /// Register a mesh. Mesh names must be unique within a rig.
    pub fn add_mesh(&mut self, mesh: MorphMesh) -> VisageResult<MeshId> {
        if self.by_name.contains_key(mesh.name()) {
            return Err(VisageError::DuplicateMesh(mesh.name().to_string()));
        }

        let id = MeshId::new(self.meshes.len() as u16);
        self.by_name.insert(mesh.name().to_string(), id);
        self.meshes.push(mesh);
        Ok(id)
    }

    pub fn mesh(&self, id: MeshId) -> Option<&MorphMesh> {
        self.meshes.get(id.index())
    }

    pub fn mesh_named(&self, name: &str) -> Option<&MorphMesh> {
        self.by_name.get(name).and_then(|id| self.mesh(*id))
    }

    pub fn mesh_id(&self, name: &str) -> Option<MeshId> {
        self.by_name.get(name).copied()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MorphMesh> {
        self.meshes.iter()
    }

    /// Resolve a channel name against every mesh.
    ///
    /// Meshes without the channel are skipped. A channel that resolves
    /// nowhere yields an empty binding and every later write through it is
    /// a no-op, so a renamed blend shape degrades that channel instead of
    /// failing the session.
    pub fn bind_channel(&self, channel: &str) -> ChannelBinding {
        let slots: Vec<InfluenceSlot> = self
            .meshes
            .iter()
            .enumerate()
            .filter_map(|(mesh_index, mesh)| {
                mesh.channel_index(channel).map(|index| InfluenceSlot {
                    mesh: MeshId::new(mesh_index as u16),
                    index,
                })
            })
            .collect();

        if slots.is_empty() {
            debug!(channel, "channel resolves to no mesh; writes will be dropped");
        }

        ChannelBinding {
            channel: channel.to_string(),
            slots,
        }
    }

    /// Read one influence. Out-of-rig slots read as 0.0.
    #[inline]
    pub fn influence(&self, slot: InfluenceSlot) -> f32 {
        self.meshes
            .get(slot.mesh.index())
            .and_then(|mesh| mesh.influence(slot.index))
            .unwrap_or(0.0)
    }

    /// Write one influence. Out-of-rig slots are ignored.
    #[inline]
    pub fn set_influence(&mut self, slot: InfluenceSlot, weight: f32) {
        if let Some(mesh) = self.meshes.get_mut(slot.mesh.index()) {
            mesh.set_influence(slot.index, weight);
        }
    }

    /// Write every slot of a binding to the same weight.
    pub fn write_binding(&mut self, binding: &ChannelBinding, weight: f32) {
        for &slot in binding.slots() {
            self.set_influence(slot, weight);
        }
    }
}
