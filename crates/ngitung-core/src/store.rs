use chrono::Utc;
use tracing::debug;

use crate::error::NgitungError;
use crate::note::Note;
use crate::NgitungResult;

/// Persistence seam for notes.
///
/// Implementors only load and save the whole collection; lookup, insert,
/// update and delete are built on top. `update` stamps `updated_at`.
pub trait NoteStore {
    fn load(&self) -> NgitungResult<Vec<Note>>;

    fn save(&mut self, notes: &[Note]) -> NgitungResult<()>;

    fn list(&self) -> NgitungResult<Vec<Note>> {
        self.load()
    }

    fn get(&self, id: &str) -> NgitungResult<Note> {
        self.load()?
            .into_iter()
            .find(|n| n.id == id)
            .ok_or_else(|| NgitungError::NoteNotFound(id.to_string()))
    }

    /// Create and persist a new, empty note.
    fn create(&mut self, name: &str) -> NgitungResult<Note> {
        let note = Note::new(name)?;
        let mut notes = self.load()?;
        notes.push(note.clone());
        self.save(&notes)?;
        debug!(id = %note.id, name = %note.name, "note created");
        Ok(note)
    }

    /// Replace the stored note with the same id and refresh its timestamp.
    fn update(&mut self, note: Note) -> NgitungResult<Note> {
        let mut notes = self.load()?;
        let slot = notes
            .iter_mut()
            .find(|n| n.id == note.id)
            .ok_or_else(|| NgitungError::NoteNotFound(note.id.clone()))?;
        *slot = Note {
            updated_at: Utc::now().timestamp_millis(),
            ..note
        };
        let updated = slot.clone();
        self.save(&notes)?;
        debug!(id = %updated.id, "note updated");
        Ok(updated)
    }

    /// Delete by id. Returns whether a note was removed.
    fn delete(&mut self, id: &str) -> NgitungResult<bool> {
        let mut notes = self.load()?;
        let before = notes.len();
        notes.retain(|n| n.id != id);
        let removed = notes.len() != before;
        if removed {
            self.save(&notes)?;
            debug!(%id, "note deleted");
        }
        Ok(removed)
    }
}

/// Volatile store, used by hosts that manage persistence themselves and by
/// tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryNoteStore {
    notes: Vec<Note>,
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notes(notes: Vec<Note>) -> Self {
        Self { notes }
    }
}

impl NoteStore for InMemoryNoteStore {
    fn load(&self) -> NgitungResult<Vec<Note>> {
        Ok(self.notes.clone())
    }

    fn save(&mut self, notes: &[Note]) -> NgitungResult<()> {
        self.notes = notes.to_vec();
        Ok(())
    }
}
