//! JSON document persistence
//!
//! The tree and the recordings catalogue each live in one JSON document in
//! the data directory. Both are read in full and rewritten in full; a write
//! goes to a temporary sibling first and is renamed into place.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use crate::error::Result;
use crate::error::MemoTreeError;
use crate::migration::{self, MigrationReport};
use crate::node::Node;
use crate::recording::{self, RawRecording, Recording};

/// Tree document file name
pub const TREE_FILE: &str = "treeData.json";

/// Recordings catalogue file name
pub const RECORDINGS_FILE: &str = "recordings.json";

/// Result of a tree write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The snapshot is now on disk
    Written { revision: u64 },
    /// A newer revision was already on disk; this write was rejected
    Superseded { attempted: u64, persisted: u64 },
}

/// Local document store rooted at a data directory
pub struct DocumentStore {
    dir: PathBuf,
    /// Revision of the last tree snapshot written; guards write ordering
    persisted_revision: Mutex<Option<u64>>,
    recordings_lock: Mutex<()>,
}

impl DocumentStore {
    /// Open (and create if needed) the data directory
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;
        log::info!("DocumentStore opened at: {}", dir.display());

        Ok(Self {
            dir,
            persisted_revision: Mutex::new(None),
            recordings_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn tree_path(&self) -> PathBuf {
        self.dir.join(TREE_FILE)
    }

    pub fn recordings_path(&self) -> PathBuf {
        self.dir.join(RECORDINGS_FILE)
    }

    /// Whether a tree document has ever been written
    pub async fn has_tree(&self) -> Result<bool> {
        Ok(tokio::fs::try_exists(self.tree_path()).await?)
    }

    /// Read the tree document; a missing file means no tree yet
    pub async fn load_tree(&self) -> Result<Option<Node>> {
        let (tree, _report) = self.load_tree_migrated().await?;
        Ok(tree)
    }

    /// Read the tree document along with what had to be repaired on the way.
    ///
    /// Keys generated for key-less legacy nodes only become stable once the
    /// repaired tree is written back.
    pub async fn load_tree_migrated(&self) -> Result<(Option<Node>, MigrationReport)> {
        let Some(json) = read_optional(&self.tree_path()).await? else {
            log::debug!("No tree document at {}", self.tree_path().display());
            return Ok((None, MigrationReport::default()));
        };
        migration::parse_tree(&json)
    }

    /// Overwrite the tree document with the snapshot taken at `revision`.
    ///
    /// Writes are serialized; a snapshot older than the one already on disk
    /// is rejected rather than allowed to clobber it.
    pub async fn save_tree(&self, revision: u64, tree: Option<&Node>) -> Result<SaveOutcome> {
        let mut persisted = self.persisted_revision.lock().await;
        if let Some(current) = *persisted {
            if revision < current {
                log::warn!(
                    "Rejected stale tree write: revision {} is older than persisted {}",
                    revision,
                    current
                );
                return Ok(SaveOutcome::Superseded {
                    attempted: revision,
                    persisted: current,
                });
            }
        }

        let bytes = serde_json::to_vec_pretty(&tree)?;
        write_atomic(&self.tree_path(), &bytes).await.map_err(|e| {
            log::error!("Failed to write {}: {}", self.tree_path().display(), e);
            e
        })?;
        *persisted = Some(revision);
        log::debug!("Tree revision {} written", revision);

        Ok(SaveOutcome::Written { revision })
    }

    /// Read the recordings catalogue; a missing file is an empty catalogue
    pub async fn load_recordings(&self) -> Result<Vec<Recording>> {
        let Some(json) = read_optional(&self.recordings_path()).await? else {
            return Ok(Vec::new());
        };
        let raw: Option<Vec<RawRecording>> = serde_json::from_str(&json)?;
        Ok(raw
            .unwrap_or_default()
            .into_iter()
            .map(Recording::from)
            .collect())
    }

    /// Overwrite the recordings catalogue
    pub async fn save_recordings(&self, recordings: &[Recording]) -> Result<()> {
        let _guard = self.recordings_lock.lock().await;
        self.write_recordings(recordings).await
    }

    /// Append one recording (read-modify-write of the whole catalogue).
    ///
    /// A recording whose id is already catalogued is rejected; the existing
    /// entry is left as it was.
    pub async fn append_recording(&self, recording: Recording) -> Result<Vec<Recording>> {
        let _guard = self.recordings_lock.lock().await;
        let mut recordings = self.load_recordings().await?;
        if recordings.iter().any(|r| r.id == recording.id) {
            log::warn!("Recording {} already catalogued, not appending", recording.id);
            return Err(MemoTreeError::duplicate_recording(recording.id));
        }
        recordings.push(recording);
        self.write_recordings(&recordings).await?;
        recording::sort_newest_first(&mut recordings);
        Ok(recordings)
    }

    async fn write_recordings(&self, recordings: &[Recording]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(recordings)?;
        write_atomic(&self.recordings_path(), &bytes)
            .await
            .map_err(|e| {
                log::error!("Failed to write {}: {}", self.recordings_path().display(), e);
                e
            })?;
        Ok(())
    }
}

async fn read_optional(path: &Path) -> Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(json) => Ok(Some(json)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => {
            log::error!("Failed to read {}: {}", path.display(), e);
            Err(e.into())
        }
    }
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await
}
