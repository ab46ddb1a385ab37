//! Memotree Core
//!
//! Engine behind the voice memo tree: recordings are attached to nodes of a
//! tree, the tree is laid out on a canvas, and playback walks it by following
//! the node each memo points at.
//!
//! ## Features
//!
//! - **Typed tree documents** - legacy shapes are migrated on read, the canonical shape is written
//! - **Snapshot store** - every edit publishes a new immutable snapshot; persistence writes exactly that snapshot
//! - **Level layout** - nodes bucketed by depth and spread evenly across the canvas
//! - **Graph rendering** - boxes, edges, root-moved and node-tapped events, SVG output
//! - **Playback navigation** - memo activation with a back-stack and one sound loaded at a time
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use memotree_core::{DocumentStore, TreeEditor, TreeStore, ROOT_KEY};
//!
//! let documents = Arc::new(DocumentStore::open(&data_dir).await?);
//! let editor = TreeEditor::new(Arc::new(TreeStore::default()), documents);
//! editor.load().await?;
//!
//! let child = editor.add_child(Some(ROOT_KEY)).await?;
//! editor.attach_memo(ROOT_KEY, "20240501T123045123Z").await?;
//! ```

pub mod documents;
pub mod editor;
pub mod error;
pub mod layout;
pub mod migration;
pub mod navigator;
pub mod node;
pub mod recording;
pub mod render;
pub mod store;

// Re-exports for convenience
pub use documents::{DocumentStore, SaveOutcome, RECORDINGS_FILE, TREE_FILE};
pub use editor::TreeEditor;
pub use error::{MemoTreeError, Result};
pub use layout::{layout, Layout, LayoutConfig, Placement};
pub use migration::MigrationReport;
pub use navigator::{AudioBackend, Navigation, PlaybackNavigator, Sound};
pub use node::{MemoRef, Node, DEFAULT_NODE_NAME, ROOT_KEY};
pub use recording::Recording;
pub use render::{Edge, Frame, GraphEvent, GraphRenderer, NodeBox};
pub use store::{Snapshot, TreeStore};
