use ngitung_core::note::Note;
use ngitung_core::store::NoteStore;
use ngitung_core::{NgitungError, NgitungResult};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Notes persisted as one JSON array in a single file. A missing file is an
/// empty store.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl NoteStore for JsonFileStore {
    fn load(&self) -> NgitungResult<Vec<Note>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.path).map_err(|e| {
            NgitungError::Storage(format!("Failed to read '{}': {}", self.path.display(), e))
        })?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn save(&mut self, notes: &[Note]) -> NgitungResult<()> {
        let json = serde_json::to_string_pretty(notes)?;
        // a failed write leaves the previous file intact
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| {
            NgitungError::Storage(format!("Failed to write '{}': {}", tmp.display(), e))
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            NgitungError::Storage(format!(
                "Failed to replace '{}': {}",
                self.path.display(),
                e
            ))
        })?;
        debug!(path = %self.path.display(), notes = notes.len(), "note store saved");
        Ok(())
    }
}
