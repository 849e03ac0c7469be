//! Root view: the note list, or the editor for the open note

use super::note_editor::{connect_note_editor, NoteEditorView};
use super::Screen;
use crate::actions::{create_note_remotely, NoteAction, NoteDispatcher};
use crate::api::MockServerApi;
use crate::state::{Note, NoteId, NoteState};
use mini_react_redux::{connect, Connect, ConnectContext, Connected, MapDispatch, MapState, PropValue, Props, View};
use mini_redux::Dispatchable;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// The currently mounted editor, if a note is open
pub type EditorSlot = Rc<RefCell<Option<Connected<NoteState, NoteAction>>>>;

pub fn connect_note_app(api: MockServerApi) -> Connect<NoteState, NoteAction> {
    connect(
        MapState::new(map_state),
        MapDispatch::new(move |dispatcher: &NoteDispatcher| map_dispatch(dispatcher, &api)),
    )
}

fn map_state(state: &NoteState) -> Props {
    Props::new()
        .with("notes", PropValue::shared(Rc::clone(&state.notes)))
        .with("open_note_id", state.open_note_id)
}

fn map_dispatch(dispatcher: &NoteDispatcher, api: &MockServerApi) -> Props {
    let add = dispatcher.clone();
    let sync = dispatcher.clone();
    let open = dispatcher.clone();
    let api = api.clone();

    Props::new()
        .with(
            "on_add_note",
            PropValue::callback(move |(): ()| add.dispatch(NoteAction::CreateNote { id: None })),
        )
        .with(
            "on_sync_note",
            PropValue::callback(move |(): ()| {
                sync.dispatch(Dispatchable::<NoteState, NoteAction>::thunk(create_note_remotely(api.clone())))
            }),
        )
        .with(
            "on_open_note",
            PropValue::callback(move |id: NoteId| open.dispatch(NoteAction::OpenNote { id })),
        )
}

/// Lists notes while none is open; mounts a connected editor otherwise
pub struct NoteAppView {
    screen: Screen,
    editor: EditorSlot,
}

impl NoteAppView {
    pub fn new(screen: Screen) -> Self {
        Self {
            screen,
            editor: EditorSlot::default(),
        }
    }

    /// Shared handle to the mounted editor
    pub fn editor_slot(&self) -> EditorSlot {
        Rc::clone(&self.editor)
    }

    fn show_editor(&self, id: i64, context: &ConnectContext<NoteState, NoteAction>) {
        let own_props = Props::new().with("note_id", id);

        let mut editor = self.editor.borrow_mut();
        match editor.as_ref() {
            Some(mounted) => {
                mounted.receive_props(own_props);
            }
            None => {
                let view = NoteEditorView::new(self.screen.clone());
                *editor = Some(connect_note_editor().mount(context, own_props, view));
            }
        }
    }

    fn show_list(&self, props: &Props) {
        let notes = props.get_shared::<BTreeMap<NoteId, Note>>("notes").unwrap_or_default();

        self.screen.line("Notes:");
        if notes.is_empty() {
            self.screen.line("  (no notes yet)");
        }
        for note in notes.values() {
            match &note.remote_id {
                Some(remote_id) => self.screen.line(format!("  [{}] {} (synced as {})", note.id, note.title(), remote_id)),
                None => self.screen.line(format!("  [{}] {}", note.id, note.title())),
            }
        }
        self.screen.line("new | sync | open <id> | help");
    }
}

impl View<NoteState, NoteAction> for NoteAppView {
    fn render(&mut self, props: &Props, context: &ConnectContext<NoteState, NoteAction>) {
        match props.get_int("open_note_id") {
            Some(id) => self.show_editor(id, context),
            None => {
                // Dropping the editor unsubscribes it.
                let closed = self.editor.borrow_mut().take();
                drop(closed);
                self.show_list(props);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reducer::reduce;
    use mini_react_redux::{Callback, Provider};
    use mini_redux::{Pipeline, Store, ThunkMiddleware};
    use std::time::Duration;

    struct Fixture {
        store: Store<NoteState, NoteAction>,
        screen: Screen,
        root: Connected<NoteState, NoteAction>,
        editor: EditorSlot,
    }

    fn mount() -> Fixture {
        let store = Store::with_middleware(reduce, Pipeline::new().with(ThunkMiddleware)).unwrap();
        let provider = Provider::new(store.clone());
        let screen = Screen::buffer();
        let view = NoteAppView::new(screen.clone());
        let editor = view.editor_slot();
        let root = connect_note_app(MockServerApi::new(Duration::ZERO)).mount(&provider.context(), Props::new(), view);
        Fixture {
            store,
            screen,
            root,
            editor,
        }
    }

    fn root_callback<Args: 'static>(fixture: &Fixture, key: &str) -> Callback<Args> {
        fixture.root.props().callback::<Args>(key).unwrap()
    }

    #[test]
    fn test_empty_list_on_mount() {
        let fixture = mount();
        assert_eq!(
            fixture.screen.take(),
            vec!["Notes:", "  (no notes yet)", "new | sync | open <id> | help"]
        );
        assert!(fixture.editor.borrow().is_none());
    }

    #[test]
    fn test_add_note_opens_nested_editor() {
        let fixture = mount();
        fixture.screen.take();

        root_callback::<()>(&fixture, "on_add_note")(()).unwrap();

        let editor = fixture.editor.borrow();
        let editor = editor.as_ref().unwrap();
        assert_eq!(editor.props().get_int("note_id"), Some(1));
        assert_eq!(editor.props().get_str("title"), Some("Untitled"));
        assert!(!editor.subscription().is_root());
        assert_eq!(fixture.root.subscription().nested_count(), 1);
        assert_eq!(fixture.store.subscriber_count(), 1);
        assert_eq!(fixture.screen.take()[0], "--- note 1: Untitled ---");
    }

    #[test]
    fn test_closing_returns_to_list_and_drops_editor() {
        let fixture = mount();
        root_callback::<()>(&fixture, "on_add_note")(()).unwrap();
        let on_close = fixture.editor.borrow().as_ref().unwrap().props().callback::<()>("on_close").unwrap();
        fixture.screen.take();

        on_close(()).unwrap();

        assert!(fixture.editor.borrow().is_none());
        assert_eq!(fixture.root.subscription().nested_count(), 0);
        assert_eq!(
            fixture.screen.take(),
            vec!["Notes:", "  [1] Untitled", "new | sync | open <id> | help"]
        );
    }

    #[test]
    fn test_open_switches_editor_note() {
        let fixture = mount();
        let add = root_callback::<()>(&fixture, "on_add_note");
        add(()).unwrap();
        add(()).unwrap();
        let editor = Rc::clone(&fixture.editor);
        let first_editor_renders = editor.borrow().as_ref().unwrap().render_count();

        root_callback::<NoteId>(&fixture, "on_open_note")(1).unwrap();

        let editor = editor.borrow();
        let editor = editor.as_ref().unwrap();
        assert_eq!(editor.props().get_int("note_id"), Some(1));
        assert_eq!(editor.render_count(), first_editor_renders + 1);
    }
}
