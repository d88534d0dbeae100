//! Conversation history persistence.
//!
//! The history file is a human-readable JSON array of `{role, parts}`
//! records in transcript order. Saving is an overwrite of the whole file;
//! loading is best-effort per record so one corrupt entry cannot take the
//! whole transcript with it.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use vesper_core::types::Turn;

use crate::error::SessionError;

/// Persists and reloads an ordered conversation transcript.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    path: Option<PathBuf>,
}

impl HistoryStore {
    /// Create a store backed by the given file. `None` disables persistence.
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// The backing file path, if persistence is configured.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether a prior history file exists on disk.
    pub fn exists(&self) -> bool {
        self.path.as_deref().is_some_and(Path::exists)
    }

    /// Write the transcript to disk, overwriting any previous file.
    ///
    /// A missing path or an empty transcript is a logged no-op, not an error.
    pub fn save(&self, history: &[Turn]) -> Result<(), SessionError> {
        let Some(path) = self.path.as_deref() else {
            debug!("No history file configured; skipping save");
            return Ok(());
        };
        if history.is_empty() {
            debug!("No history to save");
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(history)
            .map_err(|e| SessionError::Storage(e.to_string()))?;
        std::fs::write(path, data)?;
        debug!(path = %path.display(), turns = history.len(), "History saved");
        Ok(())
    }

    /// Load the transcript from disk.
    ///
    /// Returns `Ok(None)` when no file exists (caller falls back to primer
    /// seeding). Records that fail to decode are skipped with a warning; a
    /// file that is not a JSON array at all is a storage error.
    pub fn load(&self) -> Result<Option<Vec<Turn>>, SessionError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }

        let data = std::fs::read_to_string(path)?;
        let records: Vec<serde_json::Value> = serde_json::from_str(&data)
            .map_err(|e| SessionError::Storage(format!("unreadable history file: {}", e)))?;

        let mut turns = Vec::with_capacity(records.len());
        for record in records {
            match serde_json::from_value::<Turn>(record) {
                Ok(turn) => turns.push(turn),
                Err(e) => warn!(error = %e, "Skipping undecodable history record"),
            }
        }
        debug!(path = %path.display(), turns = turns.len(), "History loaded");
        Ok(Some(turns))
    }
}
