use crate::action::{Action, Dispatchable};
use crate::dispatcher::{DispatchFn, DispatchResult, Dispatched, Dispatcher, GetState};
use crate::error::StoreError;
use crate::listeners::{Listeners, Unsubscribe};
use crate::middleware::{MiddlewareApi, Pipeline};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Reducer - pure function that produces the next state from the current state and an action
///
/// Returning a clone of the incoming `Rc` means "nothing changed"; consumers
/// compare state by pointer to skip work.
pub trait Reducer<S, A> {
    fn reduce(&self, state: &Rc<S>, action: &A) -> anyhow::Result<Rc<S>>;
}

impl<S, A, F> Reducer<S, A> for F
where
    F: Fn(&Rc<S>, &A) -> anyhow::Result<Rc<S>>,
{
    fn reduce(&self, state: &Rc<S>, action: &A) -> anyhow::Result<Rc<S>> {
        self(state, action)
    }
}

/// Store - holds application state and runs the Redux loop
///
/// The store follows the Redux pattern:
/// - Centralized state, replaced (never mutated) on each action
/// - Actions flow through the middleware pipeline, then the reducer
/// - Subscribers are notified synchronously after every reduction
///
/// `Store` is a handle; clones refer to the same store.
///
/// # Example
/// ```rust,ignore
/// let store = Store::with_middleware(
///     reduce,
///     Pipeline::new().with(LoggingMiddleware::new()).with(ThunkMiddleware),
/// )?;
/// let unsubscribe = store.subscribe(|| log::info!("state changed"));
/// store.dispatch(NoteAction::CreateNote { id: None })?;
/// ```
pub struct Store<S, A> {
    inner: Rc<StoreInner<S, A>>,
}

pub(crate) struct StoreInner<S, A> {
    state: Rc<RefCell<Rc<S>>>,
    reducer: Box<dyn Reducer<S, A>>,
    listeners: Listeners,
    dispatch: DispatchFn<S, A>,
}

impl<S, A> Store<S, A>
where
    S: Default + 'static,
    A: Action,
{
    /// Create a store without middleware
    pub fn new<R>(reducer: R) -> Result<Self, StoreError>
    where
        R: Reducer<S, A> + 'static,
    {
        Self::with_middleware(reducer, Pipeline::new())
    }

    /// Create a store whose public `dispatch` runs through `pipeline`
    ///
    /// The reducer is bootstrapped with the `INIT` action against
    /// `S::default()` before this returns.
    pub fn with_middleware<R>(reducer: R, pipeline: Pipeline<S, A>) -> Result<Self, StoreError>
    where
        R: Reducer<S, A> + 'static,
    {
        let middleware_count = pipeline.len();
        let inner = Rc::new_cyclic(|weak: &Weak<StoreInner<S, A>>| {
            let state = Rc::new(RefCell::new(Rc::new(S::default())));
            let api = MiddlewareApi::new(Dispatcher::new(Weak::clone(weak)), GetState::new(Rc::clone(&state)));
            let dispatch = pipeline.build(api, core_dispatch_fn(Weak::clone(weak)));

            StoreInner {
                state,
                reducer: Box::new(reducer),
                listeners: Listeners::new(),
                dispatch,
            }
        });

        inner.core_dispatch(Dispatchable::Action(A::init()))?;
        log::debug!("Store created with {} middleware", middleware_count);

        Ok(Self { inner })
    }

    /// Dispatch an action through the middleware pipeline, then the reducer
    pub fn dispatch(&self, action: impl Into<Dispatchable<S, A>>) -> DispatchResult {
        self.inner.dispatch(action.into())
    }

    /// Dispatch a closure as a thunk
    ///
    /// Same as `dispatch(Dispatchable::thunk(run))`; needs a thunk middleware
    /// in the pipeline.
    pub fn dispatch_thunk<F>(&self, run: F) -> DispatchResult
    where
        F: FnOnce(Dispatcher<S, A>, GetState<S>) -> DispatchResult + 'static,
    {
        self.dispatch(Dispatchable::thunk(run))
    }
}

impl<S, A> Store<S, A> {
    /// Get the current state
    pub fn state(&self) -> Rc<S> {
        Rc::clone(&self.inner.state.borrow())
    }

    /// Register a handler invoked after every successful dispatch
    pub fn subscribe<F>(&self, handler: F) -> Unsubscribe
    where
        F: Fn() + 'static,
    {
        self.inner.listeners.add(handler)
    }

    /// Number of top-level subscribers
    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.len()
    }

    /// Get a dispatcher for this store
    pub fn dispatcher(&self) -> Dispatcher<S, A> {
        Dispatcher::new(Rc::downgrade(&self.inner))
    }

    /// Get a state reader for this store
    pub fn get_state(&self) -> GetState<S> {
        GetState::new(Rc::clone(&self.inner.state))
    }

    /// Whether two handles refer to the same store
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: 'static, A: Action> StoreInner<S, A> {
    pub(crate) fn dispatch(&self, action: Dispatchable<S, A>) -> DispatchResult {
        let dispatch = Rc::clone(&self.dispatch);
        dispatch(action)
    }

    /// The terminal link of the pipeline
    ///
    /// No borrow is held while the reducer or the subscribers run, so both may
    /// read state and subscribers may dispatch again.
    fn core_dispatch(&self, action: Dispatchable<S, A>) -> DispatchResult {
        let action = action.into_action()?;
        let current = Rc::clone(&self.state.borrow());

        let next = self
            .reducer
            .reduce(&current, &action)
            .map_err(StoreError::Reducer)?;

        if Rc::ptr_eq(&current, &next) {
            log::trace!("Store: {} left state unchanged", action.action_type());
        } else {
            log::trace!("Store: {} produced new state", action.action_type());
        }

        *self.state.borrow_mut() = next;
        self.listeners.notify();

        Ok(Dispatched::Done)
    }
}

fn core_dispatch_fn<S: 'static, A: Action>(store: Weak<StoreInner<S, A>>) -> DispatchFn<S, A> {
    Rc::new(move |action: Dispatchable<S, A>| match store.upgrade() {
        Some(store) => store.core_dispatch(action),
        None => Err(StoreError::Detached),
    })
}
