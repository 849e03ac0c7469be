use std::collections::BTreeMap;
use std::rc::Rc;

pub type NoteId = u64;

/// A single note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: NoteId,
    pub content: String,
    /// Id handed out by the server, once the note was created remotely
    pub remote_id: Option<String>,
}

impl Note {
    pub fn new(id: NoteId) -> Self {
        Self {
            id,
            content: String::new(),
            remote_id: None,
        }
    }

    /// First line of the content, trimmed; `Untitled` when that is empty
    pub fn title(&self) -> &str {
        let title = self.content.lines().next().unwrap_or_default().trim();
        if title.is_empty() {
            "Untitled"
        } else {
            title
        }
    }
}

/// Application state
///
/// `notes` is shared so that untouched state can be handed on without
/// copying, and so views can tell "same notes" apart by pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteState {
    pub next_note_id: NoteId,
    pub notes: Rc<BTreeMap<NoteId, Note>>,
    pub open_note_id: Option<NoteId>,
}

impl Default for NoteState {
    fn default() -> Self {
        Self {
            next_note_id: 1,
            notes: Rc::new(BTreeMap::new()),
            open_note_id: None,
        }
    }
}

impl NoteState {
    pub fn note(&self, id: NoteId) -> Option<&Note> {
        self.notes.get(&id)
    }

    pub fn open_note(&self) -> Option<&Note> {
        self.open_note_id.and_then(|id| self.note(id))
    }
}
