//! Tree editor
//!
//! The single writer for the memo tree. Every operation edits a private copy
//! through [`TreeStore::update`], publishes the result as a new snapshot and
//! then overwrites the tree document with exactly that snapshot.
//!
//! Lookup failures and duplicate attachments come back as errors and are
//! logged; they never leave a half-applied edit behind. An I/O failure while
//! persisting is returned as well, but the published snapshot stays current.

use std::sync::Arc;

use crate::documents::{DocumentStore, SaveOutcome};
use crate::error::{MemoTreeError, Result};
use crate::node::{generate_key, MemoRef, Node};
use crate::store::{Change, Snapshot, TreeStore};

/// Mutation API over a [`TreeStore`] backed by a [`DocumentStore`]
pub struct TreeEditor {
    store: Arc<TreeStore>,
    documents: Arc<DocumentStore>,
}

impl TreeEditor {
    pub fn new(store: Arc<TreeStore>, documents: Arc<DocumentStore>) -> Self {
        Self { store, documents }
    }

    pub fn store(&self) -> &Arc<TreeStore> {
        &self.store
    }

    pub fn documents(&self) -> &Arc<DocumentStore> {
        &self.documents
    }

    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    /// Load the tree document into the store.
    ///
    /// A root-only tree is created on first use (no document yet). A document
    /// holding an emptied tree loads as empty. A document that needed repair
    /// is written back in canonical form so generated keys survive reloads.
    pub async fn load(&self) -> Result<Snapshot> {
        if !self.documents.has_tree().await.map_err(|e| reported("load", e))? {
            log::info!("No tree document yet, creating root");
            return self.initialize_root().await;
        }
        let (tree, report) = self
            .documents
            .load_tree_migrated()
            .await
            .map_err(|e| reported("load", e))?;
        if let Some(tree) = &tree {
            log::info!("Loaded tree with {} nodes", tree.iter().count());
        }

        let snapshot = self.store.replace(tree);
        if !report.is_clean() {
            log::info!("Rewriting migrated tree document");
            self.persist(&snapshot).await?;
        }
        Ok(snapshot)
    }

    /// Replace the whole tree with a single root node
    pub async fn initialize_root(&self) -> Result<Snapshot> {
        let ((), snapshot) = self.store.update(|tree| {
            *tree = Some(Node::root());
            Ok::<_, MemoTreeError>(Change::Modified(()))
        })?;
        self.persist(&snapshot).await?;
        Ok(snapshot)
    }

    /// Append a new placeholder child under `parent`.
    ///
    /// With no target node this is a silent no-op returning `None`.
    pub async fn add_child(&self, parent: Option<&str>) -> Result<Option<Node>> {
        let Some(parent_key) = parent else {
            log::debug!("add_child without a target node, ignoring");
            return Ok(None);
        };

        let (child, snapshot) = self
            .store
            .update(|tree| {
                let root = tree.as_mut().ok_or(MemoTreeError::NoTree)?;
                let mut child = Node::new_child();
                while root.contains(&child.key) {
                    child.key = generate_key();
                }
                let parent = root
                    .find_mut(parent_key)
                    .ok_or_else(|| MemoTreeError::node_not_found(parent_key))?;
                parent.children.push(child.clone());
                Ok::<_, MemoTreeError>(Change::Modified(child))
            })
            .map_err(|e| reported("add_child", e))?;

        self.persist(&snapshot).await?;
        Ok(Some(child))
    }

    /// Remove `key` and its subtree; deleting the root empties the whole tree
    pub async fn delete_node(&self, key: &str) -> Result<bool> {
        let (deleted, snapshot) = self.store.update(|tree| {
            let Some(root) = tree.as_mut() else {
                return Ok::<_, MemoTreeError>(Change::Unchanged(false));
            };
            if root.key == key {
                *tree = None;
                return Ok(Change::Modified(true));
            }
            Ok(match root.remove_descendant(key) {
                Some(_) => Change::Modified(true),
                None => Change::Unchanged(false),
            })
        })?;

        if deleted {
            self.persist(&snapshot).await?;
        } else {
            log::debug!("delete_node: {} not in tree", key);
        }
        Ok(deleted)
    }

    /// Change a node's display label
    pub async fn rename_node(&self, key: &str, name: &str) -> Result<bool> {
        let (renamed, snapshot) = self.store.update(|tree| {
            let node = tree.as_mut().and_then(|root| root.find_mut(key));
            Ok::<_, MemoTreeError>(match node {
                Some(node) if node.name != name => {
                    node.name = name.to_string();
                    Change::Modified(true)
                }
                _ => Change::Unchanged(false),
            })
        })?;

        if renamed {
            self.persist(&snapshot).await?;
        }
        Ok(renamed)
    }

    /// Attach a recording to a node; a second attachment of the same id is rejected
    pub async fn attach_memo(&self, node_key: &str, recording_id: &str) -> Result<()> {
        let ((), snapshot) = self
            .store
            .update(|tree| {
                let node = find_node_mut(tree, node_key)?;
                if node.has_memo(recording_id) {
                    return Err(MemoTreeError::duplicate_memo(node_key, recording_id));
                }
                node.memos.push(MemoRef::new(recording_id));
                Ok::<_, MemoTreeError>(Change::Modified(()))
            })
            .map_err(|e| reported("attach_memo", e))?;

        self.persist(&snapshot).await
    }

    /// Remove a memo reference from a node; absent ids are a no-op
    pub async fn detach_memo(&self, node_key: &str, memo_id: &str) -> Result<bool> {
        let (detached, snapshot) = self.store.update(|tree| {
            let Some(node) = tree.as_mut().and_then(|root| root.find_mut(node_key)) else {
                return Ok::<_, MemoTreeError>(Change::Unchanged(false));
            };
            let before = node.memos.len();
            node.memos.retain(|memo| memo.id != memo_id);
            Ok(if node.memos.len() < before {
                Change::Modified(true)
            } else {
                Change::Unchanged(false)
            })
        })?;

        if detached {
            self.persist(&snapshot).await?;
        }
        Ok(detached)
    }

    /// Point a memo at the node playback should move to (`None` clears it).
    ///
    /// The target is not required to be a child of `node_key`; targets that
    /// are not children, or not in the tree at all, are accepted and logged.
    pub async fn set_memo_target(
        &self,
        node_key: &str,
        memo_id: &str,
        child_key: Option<&str>,
    ) -> Result<()> {
        let ((), snapshot) = self
            .store
            .update(|tree| {
                let node = find_node_mut(tree, node_key)?;
                let is_child = child_key
                    .map_or(true, |target| node.children.iter().any(|child| child.key == target));
                let memo = node
                    .memo_mut(memo_id)
                    .ok_or_else(|| MemoTreeError::memo_not_found(node_key, memo_id))?;
                if !is_child {
                    log::warn!(
                        "Memo {} on {} targets {:?} which is not one of its children",
                        memo_id,
                        node_key,
                        child_key
                    );
                }
                memo.connected_node_id = child_key.map(str::to_string);
                Ok::<_, MemoTreeError>(Change::Modified(()))
            })
            .map_err(|e| reported("set_memo_target", e))?;

        self.persist(&snapshot).await
    }

    async fn persist(&self, snapshot: &Snapshot) -> Result<()> {
        match self
            .documents
            .save_tree(snapshot.revision, snapshot.tree())
            .await
        {
            Ok(SaveOutcome::Written { .. }) => Ok(()),
            Ok(SaveOutcome::Superseded { attempted, persisted }) => {
                log::debug!(
                    "Snapshot {} superseded on disk by {}",
                    attempted,
                    persisted
                );
                Ok(())
            }
            Err(e) => Err(reported("persist", e)),
        }
    }
}

fn find_node_mut<'a>(tree: &'a mut Option<Node>, key: &str) -> Result<&'a mut Node> {
    tree.as_mut()
        .ok_or(MemoTreeError::NoTree)?
        .find_mut(key)
        .ok_or_else(|| MemoTreeError::node_not_found(key))
}

/// Log a failed operation on the diagnostic channel and hand the error back
fn reported(op: &str, err: MemoTreeError) -> MemoTreeError {
    match &err {
        MemoTreeError::Io(_) | MemoTreeError::Json(_) => log::error!("{} failed: {}", op, err),
        _ => log::warn!("{} rejected: {}", op, err),
    }
    err
}
