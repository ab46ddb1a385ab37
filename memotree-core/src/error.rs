//! Error types for memotree-core

use thiserror::Error;

/// Errors that can occur while editing, persisting or playing a memo tree
#[derive(Debug, Error)]
pub enum MemoTreeError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No node with the given key in the tree
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// No memo reference with the given id on the node
    #[error("Memo not found: {memo_id} on node {node_key}")]
    MemoNotFound { node_key: String, memo_id: String },

    /// No recording with the given id in the catalogue
    #[error("Recording not found: {0}")]
    RecordingNotFound(String),

    /// The node already carries a memo reference with this id
    #[error("Memo {memo_id} is already attached to node {node_key}")]
    DuplicateMemo { node_key: String, memo_id: String },

    /// The catalogue already holds a recording with this id
    #[error("Recording {0} is already catalogued")]
    DuplicateRecording(String),

    /// The operation needs a tree but none has been created
    #[error("No tree loaded")]
    NoTree,

    /// Audio backend failure
    #[error("Playback error: {0}")]
    Playback(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl MemoTreeError {
    /// Create a node not found error
    pub fn node_not_found(key: impl Into<String>) -> Self {
        Self::NodeNotFound(key.into())
    }

    /// Create a memo not found error
    pub fn memo_not_found(node_key: impl Into<String>, memo_id: impl Into<String>) -> Self {
        Self::MemoNotFound {
            node_key: node_key.into(),
            memo_id: memo_id.into(),
        }
    }

    /// Create a recording not found error
    pub fn recording_not_found(id: impl Into<String>) -> Self {
        Self::RecordingNotFound(id.into())
    }

    /// Create a duplicate memo error
    pub fn duplicate_memo(node_key: impl Into<String>, memo_id: impl Into<String>) -> Self {
        Self::DuplicateMemo {
            node_key: node_key.into(),
            memo_id: memo_id.into(),
        }
    }

    /// Create a duplicate recording error
    pub fn duplicate_recording(id: impl Into<String>) -> Self {
        Self::DuplicateRecording(id.into())
    }

    /// Create a playback error
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// True for the "reported, no-op" lookup failures
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NodeNotFound(_) | Self::MemoNotFound { .. } | Self::RecordingNotFound(_)
        )
    }
}

/// Result type for memo tree operations
pub type Result<T> = std::result::Result<T, MemoTreeError>;
