//! Note reducer
//!
//! Every branch returns a new `NoteState` or, when nothing changes, the very
//! same `Rc` it was given. Untouched parts of the state (the notes map in
//! particular) are shared with the previous state.

use crate::actions::NoteAction;
use crate::state::{Note, NoteState};
use mini_redux::Action;
use std::rc::Rc;

pub fn reduce(state: &Rc<NoteState>, action: &NoteAction) -> anyhow::Result<Rc<NoteState>> {
    log::debug!("Reducer: {}", action.action_type());

    match action {
        NoteAction::CreateNote { id: remote_id } => {
            let id = state.next_note_id;
            let mut notes = (*state.notes).clone();
            notes.insert(
                id,
                Note {
                    remote_id: remote_id.clone(),
                    ..Note::new(id)
                },
            );

            Ok(Rc::new(NoteState {
                next_note_id: id + 1,
                notes: Rc::new(notes),
                open_note_id: Some(id),
            }))
        }

        NoteAction::UpdateNote { id, content } => {
            let Some(note) = state.note(*id) else {
                log::warn!("Reducer: cannot update unknown note {}", id);
                return Ok(Rc::clone(state));
            };

            let mut notes = (*state.notes).clone();
            notes.insert(
                *id,
                Note {
                    content: content.clone(),
                    ..note.clone()
                },
            );

            Ok(Rc::new(NoteState {
                notes: Rc::new(notes),
                ..(**state).clone()
            }))
        }

        NoteAction::OpenNote { id } => {
            if state.note(*id).is_none() {
                log::warn!("Reducer: cannot open unknown note {}", id);
                return Ok(Rc::clone(state));
            }

            Ok(Rc::new(NoteState {
                open_note_id: Some(*id),
                ..(**state).clone()
            }))
        }

        NoteAction::CloseNote => Ok(Rc::new(NoteState {
            open_note_id: None,
            ..(**state).clone()
        })),

        NoteAction::Init | NoteAction::Unknown => Ok(Rc::clone(state)),
    }
}
