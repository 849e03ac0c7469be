//! Text views for the note app
//!
//! Views write whole lines to a [`Screen`]: the terminal when running, a
//! buffer in tests.

use std::cell::RefCell;
use std::rc::Rc;

pub mod note_app;
pub mod note_editor;

pub use note_app::{connect_note_app, EditorSlot, NoteAppView};
pub use note_editor::{connect_note_editor, NoteEditorView};

/// Where views draw
#[derive(Debug, Clone, Default)]
pub enum Screen {
    #[default]
    Stdout,
    Buffer(Rc<RefCell<Vec<String>>>),
}

impl Screen {
    /// A screen that keeps its lines in memory
    pub fn buffer() -> Self {
        Screen::Buffer(Rc::default())
    }

    pub fn line(&self, line: impl Into<String>) {
        match self {
            Screen::Stdout => println!("{}", line.into()),
            Screen::Buffer(lines) => lines.borrow_mut().push(line.into()),
        }
    }

    /// Drain the buffered lines; always empty for stdout
    pub fn take(&self) -> Vec<String> {
        match self {
            Screen::Stdout => Vec::new(),
            Screen::Buffer(lines) => std::mem::take(&mut *lines.borrow_mut()),
        }
    }
}
