//! Tree node and memo reference types
//!
//! Core types for representing the memo tree. A tree is a single root [`Node`]
//! owning its children; memos attach to nodes by recording id.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reserved key of the root node
pub const ROOT_KEY: &str = "root";

/// Display label given to a freshly created root
pub const ROOT_NAME: &str = "Root";

/// Display label given to freshly added children
pub const DEFAULT_NODE_NAME: &str = "New Node";

/// Generate a fresh, tree-unique node key
pub fn generate_key() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Reference from a node to a recording
///
/// `id` is a foreign key into the recordings catalogue. When
/// `connected_node_id` is set, activating the memo during playback moves to
/// the node with that key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoRef {
    pub id: String,
    #[serde(default, alias = "connectedNodeId")]
    pub connected_node_id: Option<String>,
}

impl MemoRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            connected_node_id: None,
        }
    }

    pub fn with_target(mut self, key: impl Into<String>) -> Self {
        self.connected_node_id = Some(key.into());
        self
    }
}

/// A node in the memo tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Unique key across the whole tree
    pub key: String,
    /// Display label
    pub name: String,
    /// Ordered children; insertion order is display order
    #[serde(default)]
    pub children: Vec<Node>,
    /// Memo references attached to this node
    #[serde(default)]
    pub memos: Vec<MemoRef>,
}

impl Node {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            children: Vec::new(),
            memos: Vec::new(),
        }
    }

    /// A root-only tree
    pub fn root() -> Self {
        Self::new(ROOT_KEY, ROOT_NAME)
    }

    /// A new child with a generated key and the placeholder name
    pub fn new_child() -> Self {
        Self::new(generate_key(), DEFAULT_NODE_NAME)
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_memo(mut self, memo: MemoRef) -> Self {
        self.memos.push(memo);
        self
    }

    pub fn is_root(&self) -> bool {
        self.key == ROOT_KEY
    }

    /// Depth-first search for a node by key, including `self`
    pub fn find(&self, key: &str) -> Option<&Node> {
        if self.key == key {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(key))
    }

    /// Mutable variant of [`Node::find`]
    pub fn find_mut(&mut self, key: &str) -> Option<&mut Node> {
        if self.key == key {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Splice the descendant with `key` (and its subtree) out of its parent.
    ///
    /// Never matches `self`; the caller decides what removing the root means.
    pub fn remove_descendant(&mut self, key: &str) -> Option<Node> {
        if let Some(pos) = self.children.iter().position(|child| child.key == key) {
            return Some(self.children.remove(pos));
        }
        self.children
            .iter_mut()
            .find_map(|child| child.remove_descendant(key))
    }

    pub fn memo(&self, id: &str) -> Option<&MemoRef> {
        self.memos.iter().find(|memo| memo.id == id)
    }

    pub fn memo_mut(&mut self, id: &str) -> Option<&mut MemoRef> {
        self.memos.iter_mut().find(|memo| memo.id == id)
    }

    pub fn has_memo(&self, id: &str) -> bool {
        self.memo(id).is_some()
    }

    /// Number of levels in the subtree rooted here (a leaf has depth 1)
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Node::depth).max().unwrap_or(0)
    }

    /// Pre-order traversal of the subtree rooted here
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }
}

/// Pre-order iterator over a subtree
pub struct Iter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
