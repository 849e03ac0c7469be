//! Capabilities handed to middleware and thunks
//!
//! A [`Dispatcher`] sends actions back through the store's full middleware
//! pipeline, so anything dispatched from middleware or from a thunk is seen by
//! every middleware again, starting at the outermost one.
//!
//! Both handles are weak with respect to the store: holding one keeps neither
//! the store nor its pipeline alive.

use crate::action::Dispatchable;
use crate::error::StoreError;
use crate::store::StoreInner;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use tokio::task::JoinHandle;

/// Outcome of a dispatch that did not fail
#[derive(Debug)]
pub enum Dispatched {
    /// The action ran to completion (reduced, or consumed by middleware)
    Done,
    /// A thunk started local async work that dispatches again later
    Pending(JoinHandle<Result<(), StoreError>>),
}

impl Dispatched {
    pub fn is_pending(&self) -> bool {
        matches!(self, Dispatched::Pending(_))
    }

    /// True once there is nothing left to wait for
    pub fn is_finished(&self) -> bool {
        match self {
            Dispatched::Done => true,
            Dispatched::Pending(handle) => handle.is_finished(),
        }
    }

    /// Wait for any deferred work to finish
    pub async fn settled(self) -> Result<(), StoreError> {
        match self {
            Dispatched::Done => Ok(()),
            Dispatched::Pending(handle) => handle.await?,
        }
    }
}

pub type DispatchResult = Result<Dispatched, StoreError>;

/// A dispatch function: the core dispatch, or a middleware-wrapped one
pub type DispatchFn<S, A> = Rc<dyn Fn(Dispatchable<S, A>) -> DispatchResult>;

/// Dispatches through the store's full pipeline
pub struct Dispatcher<S, A> {
    store: Weak<StoreInner<S, A>>,
}

impl<S, A> Dispatcher<S, A> {
    pub(crate) fn new(store: Weak<StoreInner<S, A>>) -> Self {
        Self { store }
    }

    /// Whether the store behind this dispatcher still exists
    pub fn is_attached(&self) -> bool {
        self.store.strong_count() > 0
    }
}

impl<S: 'static, A: crate::Action> Dispatcher<S, A> {
    /// Dispatch an action, re-entering the middleware chain from the beginning
    pub fn dispatch(&self, action: impl Into<Dispatchable<S, A>>) -> DispatchResult {
        match self.store.upgrade() {
            Some(store) => store.dispatch(action.into()),
            None => {
                log::error!("Dispatcher: store dropped, discarding action");
                Err(StoreError::Detached)
            }
        }
    }
}

impl<S, A> Clone for Dispatcher<S, A> {
    fn clone(&self) -> Self {
        Self {
            store: Weak::clone(&self.store),
        }
    }
}

impl<S, A> fmt::Debug for Dispatcher<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// Reads the store's current state
pub struct GetState<S> {
    cell: Rc<RefCell<Rc<S>>>,
}

impl<S> GetState<S> {
    pub(crate) fn new(cell: Rc<RefCell<Rc<S>>>) -> Self {
        Self { cell }
    }

    pub fn get(&self) -> Rc<S> {
        Rc::clone(&self.cell.borrow())
    }
}

impl<S> Clone for GetState<S> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}
