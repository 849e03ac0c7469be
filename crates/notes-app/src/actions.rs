//! Note actions and action creators

use crate::api::MockServerApi;
use crate::state::{NoteId, NoteState};
use mini_redux::{Action, DispatchResult, Dispatched, Dispatcher, GetState, StoreError};
use serde::Deserialize;

/// Everything the note reducer understands
///
/// Decoded from JSON objects tagged by `type`, e.g.
/// `{"type": "UPDATE_NOTE", "id": 1, "content": "Hi"}`. Unknown tags decode
/// to [`NoteAction::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, strum::IntoStaticStr)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum NoteAction {
    Init,
    /// Add an empty note and open it; `id` is the server id when known
    CreateNote {
        #[serde(default)]
        id: Option<String>,
    },
    UpdateNote {
        id: NoteId,
        content: String,
    },
    OpenNote {
        id: NoteId,
    },
    CloseNote,
    #[serde(other)]
    Unknown,
}

impl Action for NoteAction {
    fn init() -> Self {
        NoteAction::Init
    }

    fn action_type(&self) -> &'static str {
        self.into()
    }
}

pub type NoteDispatcher = Dispatcher<NoteState, NoteAction>;

/// Create a note locally, then again once the server has answered
///
/// The first `CREATE_NOTE` is dispatched before the thunk returns. The second
/// one carries the server id and is dispatched from a local task, so this must
/// run inside a `tokio::task::LocalSet`.
pub fn create_note_remotely(
    api: MockServerApi,
) -> impl FnOnce(NoteDispatcher, GetState<NoteState>) -> DispatchResult + 'static {
    move |dispatcher: NoteDispatcher, _get_state: GetState<NoteState>| {
        dispatcher.dispatch(NoteAction::CreateNote { id: None })?;

        let pending = tokio::task::spawn_local(async move {
            let created = api.create_note().await;
            dispatcher.dispatch(NoteAction::CreateNote { id: Some(created.id) })?;
            Ok::<(), StoreError>(())
        });

        Ok(Dispatched::Pending(pending))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reducer::reduce;
    use mini_redux::{decode_action, LogEntry, LogJournal, LoggingMiddleware, Pipeline, Store, ThunkMiddleware};
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    #[test]
    fn test_action_types() {
        assert_eq!(NoteAction::Init.action_type(), mini_redux::INIT);
        assert_eq!(NoteAction::CreateNote { id: None }.action_type(), "CREATE_NOTE");
        assert_eq!(
            NoteAction::UpdateNote {
                id: 1,
                content: String::new()
            }
            .action_type(),
            "UPDATE_NOTE"
        );
        assert_eq!(NoteAction::OpenNote { id: 1 }.action_type(), "OPEN_NOTE");
        assert_eq!(NoteAction::CloseNote.action_type(), "CLOSE_NOTE");
    }

    #[test]
    fn test_decode_from_json() {
        assert_eq!(
            decode_action::<NoteAction>(json!({"type": "CREATE_NOTE"})).unwrap(),
            NoteAction::CreateNote { id: None }
        );
        assert_eq!(
            decode_action::<NoteAction>(json!({"type": "CREATE_NOTE", "id": "1"})).unwrap(),
            NoteAction::CreateNote {
                id: Some("1".to_string())
            }
        );
        assert_eq!(
            decode_action::<NoteAction>(json!({"type": "UPDATE_NOTE", "id": 1, "content": "Hi"})).unwrap(),
            NoteAction::UpdateNote {
                id: 1,
                content: "Hi".to_string()
            }
        );
        assert_eq!(
            decode_action::<NoteAction>(json!({"type": "NOPE"})).unwrap(),
            NoteAction::Unknown
        );
    }

    #[tokio::test]
    async fn test_create_note_remotely_reduces_twice_in_order() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let seen = Rc::new(RefCell::new(Vec::new()));
                let recorded = Rc::clone(&seen);
                let journal = LogJournal::new();
                let store = Store::with_middleware(
                    move |state: &Rc<NoteState>, action: &NoteAction| {
                        recorded.borrow_mut().push(action.clone());
                        reduce(state, action)
                    },
                    Pipeline::new()
                        .with(LoggingMiddleware::new().with_journal(journal.clone()))
                        .with(ThunkMiddleware),
                )
                .unwrap();
                seen.borrow_mut().clear();

                let dispatched = store
                    .dispatch_thunk(create_note_remotely(MockServerApi::new(Duration::from_millis(5))))
                    .unwrap();
                assert!(dispatched.is_pending());
                assert_eq!(*seen.borrow(), vec![NoteAction::CreateNote { id: None }]);

                dispatched.settled().await.unwrap();

                assert_eq!(
                    *seen.borrow(),
                    vec![
                        NoteAction::CreateNote { id: None },
                        NoteAction::CreateNote {
                            id: Some("1".to_string())
                        },
                    ]
                );
                let state = store.state();
                assert_eq!(state.notes.len(), 2);
                assert_eq!(state.note(2).and_then(|note| note.remote_id.as_deref()), Some("1"));

                // Thunk, its synchronous dispatch nested inside, then the late one.
                let actions: Vec<String> = journal
                    .entries()
                    .into_iter()
                    .filter_map(|entry| match entry {
                        LogEntry::Action(action) => Some(action),
                        _ => None,
                    })
                    .collect();
                assert_eq!(
                    actions,
                    vec![
                        "Thunk".to_string(),
                        "CreateNote { id: None }".to_string(),
                        "CreateNote { id: Some(\"1\") }".to_string(),
                    ]
                );
                assert_eq!(journal.len(), 9);
                assert!(matches!(journal.entries().last(), Some(LogEntry::After(_))));
            })
            .await;
    }
}
