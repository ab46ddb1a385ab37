//! In-memory tree store
//!
//! Holds the current tree as an immutable, revisioned snapshot. Readers get a
//! cheap `Arc` clone; the editor is the only writer and always swaps in a new
//! snapshot, so a snapshot handed out earlier (e.g. one being persisted) never
//! changes underneath its holder.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::node::Node;

/// An immutable view of the tree at one revision
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub revision: u64,
    pub root: Option<Arc<Node>>,
}

impl Snapshot {
    pub fn tree(&self) -> Option<&Node> {
        self.root.as_deref()
    }

    pub fn find(&self, key: &str) -> Option<&Node> {
        self.tree().and_then(|root| root.find(key))
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }
}

/// Outcome of a store update closure
pub enum Change<R> {
    /// The tree was modified; publish a new snapshot
    Modified(R),
    /// Nothing changed; keep the current snapshot
    Unchanged(R),
}

/// Owner of the current tree snapshot
#[derive(Debug, Default)]
pub struct TreeStore {
    current: RwLock<Snapshot>,
}

impl TreeStore {
    pub fn new(tree: Option<Node>) -> Self {
        Self {
            current: RwLock::new(Snapshot {
                revision: 0,
                root: tree.map(Arc::new),
            }),
        }
    }

    /// The current snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.current.read().clone()
    }

    pub fn revision(&self) -> u64 {
        self.current.read().revision
    }

    /// Apply `f` to a private copy of the tree.
    ///
    /// On [`Change::Modified`] the copy becomes the new snapshot with the next
    /// revision. Returns the closure's value and the snapshot now current.
    pub fn update<R, E>(
        &self,
        f: impl FnOnce(&mut Option<Node>) -> Result<Change<R>, E>,
    ) -> Result<(R, Snapshot), E> {
        let mut current = self.current.write();
        let mut draft: Option<Node> = current.root.as_deref().cloned();

        match f(&mut draft)? {
            Change::Modified(value) => {
                let revision = current.revision + 1;
                *current = Snapshot {
                    revision,
                    root: draft.map(Arc::new),
                };
                Ok((value, current.clone()))
            }
            Change::Unchanged(value) => Ok((value, current.clone())),
        }
    }

    /// Replace the whole tree (used when loading from disk)
    pub fn replace(&self, tree: Option<Node>) -> Snapshot {
        let mut current = self.current.write();
        let revision = current.revision + 1;
        *current = Snapshot {
            revision,
            root: tree.map(Arc::new),
        };
        current.clone()
    }
}
