//! Playback navigation
//!
//! Walks the tree from the root: activating a memo on the current node plays
//! its recording and, when the memo points at another node, moves there while
//! remembering where it came from.
//!
//! At most one sound is loaded at a time. The previous sound is stopped and
//! unloaded before the next one loads, and whatever is loaded when the
//! navigator is refreshed, stopped or dropped is released too.

use crate::error::{MemoTreeError, Result};
use crate::node::Node;
use crate::recording::{self, Recording};
use crate::store::Snapshot;

/// A loaded, playable sound
pub trait Sound {
    fn play(&mut self) -> Result<()>;
    fn stop_and_unload(&mut self);
}

/// Device audio: turns a recording URI into a loaded sound
pub trait AudioBackend {
    type Sound: Sound;

    fn load(&mut self, uri: &str) -> Result<Self::Sound>;
}

/// Effect of activating a memo
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Moved to the memo's connected node
    Moved { from: String, to: String },
    /// No (resolvable) connected node; stayed put
    Stayed,
}

/// State machine over the current node and a back-stack of visited nodes
pub struct PlaybackNavigator<A: AudioBackend> {
    backend: A,
    tree: Snapshot,
    recordings: Vec<Recording>,
    current: Option<String>,
    back_stack: Vec<String>,
    sound: Option<A::Sound>,
}

impl<A: AudioBackend> PlaybackNavigator<A> {
    /// Start at the root of `tree`
    pub fn new(backend: A, tree: Snapshot, recordings: Vec<Recording>) -> Self {
        let current = tree.tree().map(|root| root.key.clone());
        Self {
            backend,
            tree,
            recordings,
            current,
            back_stack: Vec::new(),
            sound: None,
        }
    }

    pub fn current_node(&self) -> Option<&Node> {
        self.current.as_deref().and_then(|key| self.tree.find(key))
    }

    /// Keys of the nodes `go_back` will return to, oldest first
    pub fn back_stack(&self) -> &[String] {
        &self.back_stack
    }

    pub fn recordings(&self) -> &[Recording] {
        &self.recordings
    }

    pub fn is_playing(&self) -> bool {
        self.sound.is_some()
    }

    pub fn backend(&self) -> &A {
        &self.backend
    }

    /// Play the memo `memo_id` on the current node and follow its link.
    ///
    /// Unknown memos and recordings are reported and change nothing. A failure
    /// to load or start the audio is logged only; navigation still happens.
    pub fn activate_memo(&mut self, memo_id: &str) -> Result<Navigation> {
        let current = self.current_node().ok_or_else(|| {
            log::warn!("Memo {} activated with no tree loaded", memo_id);
            MemoTreeError::NoTree
        })?;
        let memo = current.memo(memo_id).ok_or_else(|| {
            log::warn!("Memo {} is not on node {}", memo_id, current.key);
            MemoTreeError::memo_not_found(&current.key, memo_id)
        })?;
        let recording = recording::find(&self.recordings, &memo.id).ok_or_else(|| {
            log::warn!("Memo {} has no catalogued recording", memo.id);
            MemoTreeError::recording_not_found(&memo.id)
        })?;

        let from = current.key.clone();
        let target = memo.connected_node_id.clone();
        let uri = recording.uri.clone();

        self.start_playback(&uri);

        let Some(target) = target else {
            return Ok(Navigation::Stayed);
        };
        if self.tree.find(&target).is_none() {
            log::warn!("Memo {} targets missing node {}, staying on {}", memo_id, target, from);
            return Ok(Navigation::Stayed);
        }

        log::debug!("Navigating {} -> {}", from, target);
        self.back_stack.push(from.clone());
        self.current = Some(target.clone());
        Ok(Navigation::Moved { from, to: target })
    }

    /// Return to the previously visited node; false when there is none
    pub fn go_back(&mut self) -> bool {
        match self.back_stack.pop() {
            Some(key) => {
                log::debug!("Back to {}", key);
                self.current = Some(key);
                true
            }
            None => false,
        }
    }

    /// Swap in fresh inputs and start over from the root
    pub fn refresh(&mut self, tree: Snapshot, recordings: Vec<Recording>) {
        self.release_sound();
        self.current = tree.tree().map(|root| root.key.clone());
        self.tree = tree;
        self.recordings = recordings;
        self.back_stack.clear();
    }

    /// Stop and unload the current sound, if any
    pub fn stop(&mut self) {
        self.release_sound();
    }

    fn start_playback(&mut self, uri: &str) {
        self.release_sound();
        match self.backend.load(uri) {
            Ok(mut sound) => {
                if let Err(e) = sound.play() {
                    log::error!("Failed to play {}: {}", uri, e);
                }
                self.sound = Some(sound);
            }
            Err(e) => log::error!("Failed to load {}: {}", uri, e),
        }
    }

    fn release_sound(&mut self) {
        if let Some(mut sound) = self.sound.take() {
            sound.stop_and_unload();
        }
    }
}

impl<A: AudioBackend> Drop for PlaybackNavigator<A> {
    fn drop(&mut self) {
        self.release_sound();
    }
}
