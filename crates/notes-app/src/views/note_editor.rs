//! Editor for a single note, mounted under the root view
//!
//! Which note to show comes from the `note_id` own prop, so both mappings
//! depend on own props.

use super::Screen;
use crate::actions::{NoteAction, NoteDispatcher};
use crate::state::{NoteId, NoteState};
use mini_react_redux::{connect, Connect, ConnectContext, MapDispatch, MapState, PropValue, Props, View};

pub fn connect_note_editor() -> Connect<NoteState, NoteAction> {
    connect(MapState::with_own_props(map_state), MapDispatch::with_own_props(map_dispatch))
}

fn note_id(own_props: &Props) -> Option<NoteId> {
    own_props.get_int("note_id").and_then(|id| NoteId::try_from(id).ok())
}

fn map_state(state: &NoteState, own_props: &Props) -> Props {
    match note_id(own_props).and_then(|id| state.note(id)) {
        Some(note) => Props::new()
            .with("title", note.title())
            .with("content", note.content.as_str())
            .with("remote_id", note.remote_id.clone()),
        None => Props::new().with("missing", true),
    }
}

fn map_dispatch(dispatcher: &NoteDispatcher, own_props: &Props) -> Props {
    let close = dispatcher.clone();
    let mut props = Props::new().with(
        "on_close",
        PropValue::callback(move |(): ()| close.dispatch(NoteAction::CloseNote)),
    );

    if let Some(id) = note_id(own_props) {
        let change = dispatcher.clone();
        props.insert(
            "on_change",
            PropValue::callback(move |content: String| change.dispatch(NoteAction::UpdateNote { id, content })),
        );
    }
    props
}

pub struct NoteEditorView {
    screen: Screen,
}

impl NoteEditorView {
    pub fn new(screen: Screen) -> Self {
        Self { screen }
    }
}

impl View<NoteState, NoteAction> for NoteEditorView {
    fn render(&mut self, props: &Props, _context: &ConnectContext<NoteState, NoteAction>) {
        let id = props.get_int("note_id").unwrap_or_default();
        if props.contains_key("missing") {
            self.screen.line(format!("--- note {}: not found ---", id));
            return;
        }

        let title = props.get_str("title").unwrap_or_default();
        self.screen.line(format!("--- note {}: {} ---", id, title));
        for line in props.get_str("content").unwrap_or_default().lines() {
            self.screen.line(format!("| {}", line));
        }
        if let Some(remote_id) = props.get_str("remote_id") {
            self.screen.line(format!("(synced as {})", remote_id));
        }
        self.screen.line("edit <text> | close");
    }
}
