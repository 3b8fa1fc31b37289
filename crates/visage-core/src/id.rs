//! Identifiers for visage entities

/// Identifies one morph mesh within a rig.
///
/// Assigned densely in registration order, so it doubles as an index into
/// the rig's mesh table. Stable for the lifetime of the rig.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MeshId(pub u16);

impl MeshId {
    #[inline]
    pub fn new(raw: u16) -> Self {
        MeshId(raw)
    }

    /// Index into the rig's mesh table.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Debug for MeshId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Mesh({})", self.0)
    }
}
