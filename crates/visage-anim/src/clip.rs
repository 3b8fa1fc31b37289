//! Clip descriptors - the library a scheduler draws from

/// Descriptor for one animation clip: its name and authored length.
///
/// Clip content (the actual keyframe data) lives with the renderer; the
/// schedulers only need to know how long each clip runs.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipSpec {
    pub name: String,
    /// Authored clip length in seconds.
    pub duration: f32,
}

impl ClipSpec {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        ClipSpec {
            name: name.into(),
            duration,
        }
    }
}

/// The set of clips available to a session's scheduler.
#[derive(Clone, Debug, Default)]
pub struct ClipLibrary {
    clips: Vec<ClipSpec>,
}

impl ClipLibrary {
    pub fn new(clips: Vec<ClipSpec>) -> Self {
        ClipLibrary { clips }
    }

    /// Adds a clip, replacing any existing entry with the same name.
    pub fn insert(&mut self, spec: ClipSpec) {
        if let Some(existing) = self.clips.iter_mut().find(|c| c.name == spec.name) {
            *existing = spec;
        } else {
            self.clips.push(spec);
        }
    }

    pub fn get(&self, name: &str) -> Option<&ClipSpec> {
        self.clips.iter().find(|c| c.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.clips.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}
