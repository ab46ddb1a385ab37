//! Audio backend for a headless shell
//!
//! There is no audio device here: "playing" a recording checks that local
//! files exist and logs the URI.

use std::path::Path;

use memotree_core::{AudioBackend, MemoTreeError, Sound};

/// Backend that logs playback and remembers what it played
#[derive(Debug, Default)]
pub struct LogBackend {
    played: Vec<String>,
}

impl LogBackend {
    pub fn played(&self) -> &[String] {
        &self.played
    }
}

/// A "loaded" recording
#[derive(Debug)]
pub struct LoggedSound {
    uri: String,
}

impl Sound for LoggedSound {
    fn play(&mut self) -> memotree_core::Result<()> {
        tracing::info!("Playing {}", self.uri);
        Ok(())
    }

    fn stop_and_unload(&mut self) {
        tracing::debug!("Unloaded {}", self.uri);
    }
}

impl AudioBackend for LogBackend {
    type Sound = LoggedSound;

    fn load(&mut self, uri: &str) -> memotree_core::Result<LoggedSound> {
        if let Some(path) = uri.strip_prefix("file://") {
            if !Path::new(path).exists() {
                return Err(MemoTreeError::playback(format!("no such file: {}", path)));
            }
        }
        self.played.push(uri.to_string());
        Ok(LoggedSound {
            uri: uri.to_string(),
        })
    }
}
