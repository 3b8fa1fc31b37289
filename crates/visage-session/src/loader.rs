//! Lipsync track fetching
//!
//! Track fetches run off the frame path. A [`TrackSource`] hands back a
//! [`PendingTrack`]; the session polls it once per frame and installs the
//! track on the frame the result lands. Dropping a [`PendingTrack`]
//! cancels interest in the fetch, which is how superseded script changes
//! are discarded.

use std::path::PathBuf;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::debug;
use visage_core::{VisageError, VisageResult};
use visage_lipsync::LipsyncTrack;

/// A fetch in flight. Poll each frame until a result lands.
#[derive(Debug)]
pub struct PendingTrack {
    rx: oneshot::Receiver<VisageResult<LipsyncTrack>>,
}

impl PendingTrack {
    /// Creates a pending fetch and the sender that resolves it.
    pub fn channel() -> (oneshot::Sender<VisageResult<LipsyncTrack>>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, PendingTrack { rx })
    }

    /// Non-blocking check for the fetch result.
    ///
    /// Returns `None` while the fetch is still running. A source that went
    /// away without answering surfaces as [`VisageError::FetchCancelled`].
    pub fn poll(&mut self) -> Option<VisageResult<LipsyncTrack>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => {
                Some(Err(VisageError::FetchCancelled))
            }
        }
    }
}

/// Source of lipsync cue tracks, keyed by script name.
pub trait TrackSource {
    /// Starts fetching the track for `script`. Never blocks the caller.
    fn fetch(&mut self, script: &str) -> PendingTrack;
}

/// Loads `<root>/<script>.json` cue files off the frame path.
///
/// Files use the common lipsync-generator layout: a `mouthCues` array of
/// `{ start, end, value }` entries with times in seconds.
#[derive(Debug, Clone)]
pub struct JsonTrackSource {
    root: PathBuf,
    handle: Handle,
}

impl JsonTrackSource {
    /// `handle` names the runtime that runs the file reads.
    pub fn new(root: impl Into<PathBuf>, handle: Handle) -> Self {
        JsonTrackSource {
            root: root.into(),
            handle,
        }
    }
}

impl TrackSource for JsonTrackSource {
    fn fetch(&mut self, script: &str) -> PendingTrack {
        let (tx, pending) = PendingTrack::channel();
        let path = self.root.join(format!("{script}.json"));
        self.handle.spawn(async move {
            debug!(path = %path.display(), "reading lipsync track");
            let result = match tokio::fs::read_to_string(&path).await {
                Ok(text) => LipsyncTrack::from_json(&text),
                Err(e) => Err(VisageError::TrackFetch(format!(
                    "{}: {e}",
                    path.display()
                ))),
            };
            // The session may have moved on to another script; a closed
            // receiver is the cancellation signal, not a fault.
            let _ = tx.send(result);
        });
        pending
    }
}
