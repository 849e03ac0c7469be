//! Middleware system for the store
//!
//! Middleware sits between `dispatch` and the reducer, allowing side effects,
//! async sequences, logging and other cross-cutting concerns to be handled in
//! a composable way.
//!
//! ## Design
//!
//! ```text
//! dispatch → m1 → m2 → ... → mn → core dispatch → reducer → subscribers
//! ```
//!
//! Each middleware receives the action, the [`MiddlewareApi`] (dispatch and
//! getState capabilities) and the [`Next`] link. It can:
//! - Inspect the action and state
//! - Forward the action (`next.dispatch(action)`), now or later
//! - Short-circuit by not forwarding
//! - Dispatch new actions through the full pipeline via the api
//!
//! A [`Pipeline`] composes the middleware in declaration order, so the first
//! one is outermost and sees every action first.

pub mod logging;
pub mod thunk;

use crate::action::Dispatchable;
use crate::dispatcher::{DispatchFn, DispatchResult, Dispatcher, GetState};
use crate::Action;
use std::rc::Rc;

/// Capabilities a middleware receives from the store
pub struct MiddlewareApi<S, A> {
    dispatcher: Dispatcher<S, A>,
    get_state: GetState<S>,
}

impl<S, A> MiddlewareApi<S, A> {
    pub(crate) fn new(dispatcher: Dispatcher<S, A>, get_state: GetState<S>) -> Self {
        Self {
            dispatcher,
            get_state,
        }
    }

    /// Current state of the store
    pub fn state(&self) -> Rc<S> {
        self.get_state.get()
    }

    pub fn dispatcher(&self) -> Dispatcher<S, A> {
        self.dispatcher.clone()
    }

    pub fn get_state(&self) -> GetState<S> {
        self.get_state.clone()
    }
}

impl<S: 'static, A: Action> MiddlewareApi<S, A> {
    /// Dispatch through the full pipeline, starting at the outermost middleware
    pub fn dispatch(&self, action: impl Into<Dispatchable<S, A>>) -> DispatchResult {
        self.dispatcher.dispatch(action)
    }
}

impl<S, A> Clone for MiddlewareApi<S, A> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
            get_state: self.get_state.clone(),
        }
    }
}

/// The rest of the chain after the current middleware
pub struct Next<S, A> {
    dispatch: DispatchFn<S, A>,
}

impl<S, A> Next<S, A> {
    pub fn dispatch(&self, action: Dispatchable<S, A>) -> DispatchResult {
        (self.dispatch)(action)
    }
}

/// Middleware trait - intercepts actions before they reach the reducer
///
/// Middleware is shared by every dispatch (including re-entrant ones), so it
/// takes `&self`; keep per-middleware state in `Cell`/`RefCell`.
pub trait Middleware<S, A> {
    /// Handle an action
    ///
    /// - `action`: The value being dispatched
    /// - `api`: Dispatch (full pipeline) and current state
    /// - `next`: The next middleware, or the core dispatch
    ///
    /// Return whatever the rest of the chain returned, or your own result to
    /// short-circuit.
    fn handle(&self, action: Dispatchable<S, A>, api: &MiddlewareApi<S, A>, next: &Next<S, A>) -> DispatchResult;
}

/// Middleware built from a closure, see [`from_fn`]
pub struct FnMiddleware<F> {
    handler: F,
}

/// Turn a closure into a middleware
pub fn from_fn<S, A, F>(handler: F) -> FnMiddleware<F>
where
    F: Fn(Dispatchable<S, A>, &MiddlewareApi<S, A>, &Next<S, A>) -> DispatchResult,
{
    FnMiddleware { handler }
}

impl<S, A, F> Middleware<S, A> for FnMiddleware<F>
where
    F: Fn(Dispatchable<S, A>, &MiddlewareApi<S, A>, &Next<S, A>) -> DispatchResult,
{
    fn handle(&self, action: Dispatchable<S, A>, api: &MiddlewareApi<S, A>, next: &Next<S, A>) -> DispatchResult {
        (self.handler)(action, api, next)
    }
}

/// An ordered list of middleware, applied when a store is created
pub struct Pipeline<S, A> {
    middleware: Vec<Rc<dyn Middleware<S, A>>>,
}

/// Collect middleware into a pipeline, first entry outermost
pub fn apply_middleware<S, A>(middleware: Vec<Box<dyn Middleware<S, A>>>) -> Pipeline<S, A> {
    Pipeline {
        middleware: middleware.into_iter().map(Rc::from).collect(),
    }
}

impl<S, A> Pipeline<S, A> {
    pub fn new() -> Self {
        Self {
            middleware: Vec::new(),
        }
    }

    /// Append a middleware; it runs after the ones already added
    pub fn with<M>(mut self, middleware: M) -> Self
    where
        M: Middleware<S, A> + 'static,
    {
        self.middleware.push(Rc::new(middleware));
        self
    }

    pub fn len(&self) -> usize {
        self.middleware.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middleware.is_empty()
    }
}

impl<S: 'static, A: 'static> Pipeline<S, A> {
    /// Compose the pipeline around `core`
    ///
    /// Yields `m1(api)(m2(api)(... mn(api)(core)))`. An empty pipeline is the
    /// core dispatch itself.
    pub(crate) fn build(self, api: MiddlewareApi<S, A>, core: DispatchFn<S, A>) -> DispatchFn<S, A> {
        self.middleware
            .into_iter()
            .rev()
            .fold(core, |next, middleware| {
                let api = api.clone();
                let next = Next { dispatch: next };
                let dispatch: DispatchFn<S, A> =
                    Rc::new(move |action: Dispatchable<S, A>| middleware.handle(action, &api, &next));
                dispatch
            })
    }
}

impl<S, A> Default for Pipeline<S, A> {
    fn default() -> Self {
        Self::new()
    }
}
