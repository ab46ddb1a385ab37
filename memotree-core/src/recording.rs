//! Recordings catalogue entries
//!
//! Recordings are owned by the recorder; the tree only refers to them by id.
//! Ids are derived from the capture timestamp so that the same stop event
//! always yields the same id.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A captured voice memo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recording {
    pub id: String,
    /// Playable audio resource locator
    pub uri: String,
    pub name: String,
    pub timestamp: DateTime<Utc>,
}

impl Recording {
    /// Recording created when capture stops
    pub fn captured(uri: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: recording_id(&timestamp),
            uri: uri.into(),
            name: iso_timestamp(&timestamp),
            timestamp,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// ISO-8601 UTC rendering with millisecond precision, e.g. `2024-05-01T12:30:45.123Z`
pub fn iso_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Derive a recording id from its timestamp by stripping separators
pub fn recording_id(timestamp: &DateTime<Utc>) -> String {
    iso_timestamp(timestamp)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// Catalogue entry as found on disk; the first recorder only stored `uri` and `timestamp`
#[derive(Debug, Deserialize)]
pub(crate) struct RawRecording {
    id: Option<String>,
    uri: String,
    name: Option<String>,
    timestamp: DateTime<Utc>,
}

impl From<RawRecording> for Recording {
    fn from(raw: RawRecording) -> Self {
        Self {
            id: raw.id.unwrap_or_else(|| recording_id(&raw.timestamp)),
            name: raw.name.unwrap_or_else(|| iso_timestamp(&raw.timestamp)),
            uri: raw.uri,
            timestamp: raw.timestamp,
        }
    }
}

/// Order recordings newest first
pub fn sort_newest_first(recordings: &mut [Recording]) {
    recordings.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// Look up a recording by id
pub fn find<'a>(recordings: &'a [Recording], id: &str) -> Option<&'a Recording> {
    recordings.iter().find(|recording| recording.id == id)
}
