//! ThunkMiddleware - runs callable actions
//!
//! A thunk is a deferred computation dispatched in place of an action. The
//! middleware calls it with the store's dispatcher and state reader instead of
//! forwarding it, which is how multi-step and asynchronous sequences go
//! through the store without the store knowing about asynchrony:
//!
//! ```rust,ignore
//! store.dispatch(Dispatchable::thunk(move |dispatch, _get_state| {
//!     dispatch.dispatch(NoteAction::CreateNote { id: None })?;
//!     let handle = tokio::task::spawn_local(async move {
//!         let created = api.create_note().await;
//!         dispatch.dispatch(NoteAction::CreateNote { id: Some(created.id) })?;
//!         Ok(())
//!     });
//!     Ok(Dispatched::Pending(handle))
//! }))?;
//! ```

use super::{Middleware, MiddlewareApi, Next};
use crate::action::Dispatchable;
use crate::dispatcher::{DispatchResult, Dispatcher, GetState};
use std::fmt;

type ThunkFn<S, A> = Box<dyn FnOnce(Dispatcher<S, A>, GetState<S>) -> DispatchResult>;

/// A callable action
pub struct Thunk<S, A> {
    run: ThunkFn<S, A>,
}

impl<S, A> Thunk<S, A> {
    pub fn new<F>(run: F) -> Self
    where
        F: FnOnce(Dispatcher<S, A>, GetState<S>) -> DispatchResult + 'static,
    {
        Self { run: Box::new(run) }
    }

    pub fn run(self, dispatcher: Dispatcher<S, A>, get_state: GetState<S>) -> DispatchResult {
        (self.run)(dispatcher, get_state)
    }
}

impl<S, A> fmt::Debug for Thunk<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Thunk")
    }
}

/// ThunkMiddleware - invokes thunks, forwards everything else
#[derive(Debug, Default, Clone, Copy)]
pub struct ThunkMiddleware;

impl<S, A> Middleware<S, A> for ThunkMiddleware {
    fn handle(&self, action: Dispatchable<S, A>, api: &MiddlewareApi<S, A>, next: &Next<S, A>) -> DispatchResult {
        match action {
            Dispatchable::Thunk(thunk) => {
                log::trace!("ThunkMiddleware: running thunk");
                thunk.run(api.dispatcher(), api.get_state())
            }
            action => next.dispatch(action),
        }
    }
}
