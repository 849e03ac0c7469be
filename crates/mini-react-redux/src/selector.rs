//! Memoized prop derivation
//!
//! A [`Selector`] turns store state, dispatch-bound callbacks and a unit's
//! own props into one merged [`Props`] value. It keeps the inputs and outputs
//! of its last run and only recomputes the parts whose inputs moved:
//!
//! - own props and state both changed: remap state, remap dispatch only if it
//!   reads own props, remerge
//! - only own props changed: remap whatever reads own props, remerge
//! - only state changed: remap state and remerge only if the mapped state
//!   props are not shallowly equal to the previous ones
//! - nothing changed: hand back the previous merged props
//!
//! Callers detect a change by comparing the returned `Rc` with the previous
//! one, which is what [`StatefulSelector`] does.

use crate::props::{merge_props, shallow_equal, Props};
use mini_redux::{Dispatcher, GetState};
use std::rc::Rc;

type MapStateFn<S> = dyn Fn(&S, &Props) -> Props;
type MapDispatchFn<S, A> = dyn Fn(&Dispatcher<S, A>, &Props) -> Props;

/// Derives props from store state
pub struct MapState<S> {
    map: Rc<MapStateFn<S>>,
    depends_on_own_props: bool,
}

impl<S: 'static> MapState<S> {
    /// A mapping that only reads state
    pub fn new<F>(map: F) -> Self
    where
        F: Fn(&S) -> Props + 'static,
    {
        Self {
            map: Rc::new(move |state: &S, _: &Props| map(state)),
            depends_on_own_props: false,
        }
    }

    /// A mapping that reads state and the unit's own props
    pub fn with_own_props<F>(map: F) -> Self
    where
        F: Fn(&S, &Props) -> Props + 'static,
    {
        Self {
            map: Rc::new(map),
            depends_on_own_props: true,
        }
    }

    /// Contribute nothing
    pub fn none() -> Self {
        Self::new(|_: &S| Props::new())
    }
}

impl<S> MapState<S> {
    pub fn depends_on_own_props(&self) -> bool {
        self.depends_on_own_props
    }

    fn call(&self, state: &S, own_props: &Props) -> Props {
        (self.map)(state, own_props)
    }
}

impl<S> Clone for MapState<S> {
    fn clone(&self) -> Self {
        Self {
            map: Rc::clone(&self.map),
            depends_on_own_props: self.depends_on_own_props,
        }
    }
}

/// Derives callback props from the store's dispatcher
pub struct MapDispatch<S, A> {
    map: Rc<MapDispatchFn<S, A>>,
    depends_on_own_props: bool,
}

impl<S: 'static, A: 'static> MapDispatch<S, A> {
    /// A mapping that only needs the dispatcher
    pub fn new<F>(map: F) -> Self
    where
        F: Fn(&Dispatcher<S, A>) -> Props + 'static,
    {
        Self {
            map: Rc::new(move |dispatcher: &Dispatcher<S, A>, _: &Props| map(dispatcher)),
            depends_on_own_props: false,
        }
    }

    /// A mapping that also reads the unit's own props
    pub fn with_own_props<F>(map: F) -> Self
    where
        F: Fn(&Dispatcher<S, A>, &Props) -> Props + 'static,
    {
        Self {
            map: Rc::new(map),
            depends_on_own_props: true,
        }
    }

    pub fn none() -> Self {
        Self::new(|_: &Dispatcher<S, A>| Props::new())
    }
}

impl<S, A> MapDispatch<S, A> {
    pub fn depends_on_own_props(&self) -> bool {
        self.depends_on_own_props
    }

    fn call(&self, dispatcher: &Dispatcher<S, A>, own_props: &Props) -> Props {
        (self.map)(dispatcher, own_props)
    }
}

impl<S, A> Clone for MapDispatch<S, A> {
    fn clone(&self) -> Self {
        Self {
            map: Rc::clone(&self.map),
            depends_on_own_props: self.depends_on_own_props,
        }
    }
}

struct Memo<S> {
    state: Rc<S>,
    own_props: Props,
    state_props: Props,
    dispatch_props: Props,
    merged: Rc<Props>,
}

/// Memoizing selector for one connected unit
pub struct Selector<S, A> {
    map_state: MapState<S>,
    map_dispatch: MapDispatch<S, A>,
    dispatcher: Dispatcher<S, A>,
    memo: Option<Memo<S>>,
}

impl<S, A> Selector<S, A> {
    pub fn new(map_state: MapState<S>, map_dispatch: MapDispatch<S, A>, dispatcher: Dispatcher<S, A>) -> Self {
        Self {
            map_state,
            map_dispatch,
            dispatcher,
            memo: None,
        }
    }

    /// Merged props for `state` and `own_props`
    pub fn select(&mut self, state: &Rc<S>, own_props: &Props) -> Rc<Props> {
        let memo = match self.memo.as_mut() {
            Some(memo) => memo,
            None => return self.first_run(state, own_props),
        };

        let props_changed = !shallow_equal(own_props, &memo.own_props);
        let state_changed = !Rc::ptr_eq(state, &memo.state);
        memo.state = Rc::clone(state);
        memo.own_props = own_props.clone();

        match (props_changed, state_changed) {
            (true, true) => {
                memo.state_props = self.map_state.call(state, own_props);
                if self.map_dispatch.depends_on_own_props() {
                    memo.dispatch_props = self.map_dispatch.call(&self.dispatcher, own_props);
                }
                memo.merged = Rc::new(merge_props(own_props, &memo.state_props, &memo.dispatch_props));
            }
            (true, false) => {
                if self.map_state.depends_on_own_props() {
                    memo.state_props = self.map_state.call(state, own_props);
                }
                if self.map_dispatch.depends_on_own_props() {
                    memo.dispatch_props = self.map_dispatch.call(&self.dispatcher, own_props);
                }
                memo.merged = Rc::new(merge_props(own_props, &memo.state_props, &memo.dispatch_props));
            }
            (false, true) => {
                let next_state_props = self.map_state.call(state, own_props);
                if !shallow_equal(&next_state_props, &memo.state_props) {
                    memo.state_props = next_state_props;
                    memo.merged = Rc::new(merge_props(own_props, &memo.state_props, &memo.dispatch_props));
                } else {
                    log::trace!("Selector: state changed, mapped props did not");
                }
            }
            (false, false) => {}
        }

        Rc::clone(&memo.merged)
    }

    fn first_run(&mut self, state: &Rc<S>, own_props: &Props) -> Rc<Props> {
        let state_props = self.map_state.call(state, own_props);
        let dispatch_props = self.map_dispatch.call(&self.dispatcher, own_props);
        let merged = Rc::new(merge_props(own_props, &state_props, &dispatch_props));
        self.memo = Some(Memo {
            state: Rc::clone(state),
            own_props: own_props.clone(),
            state_props,
            dispatch_props,
            merged: Rc::clone(&merged),
        });
        merged
    }
}

/// A [`Selector`] bound to a store, tracking whether its owner must re-render
pub struct StatefulSelector<S, A> {
    selector: Selector<S, A>,
    get_state: GetState<S>,
    props: Rc<Props>,
    should_component_update: bool,
}

impl<S, A> StatefulSelector<S, A> {
    /// Run once against the current state; the first result always asks for a render
    pub fn new(mut selector: Selector<S, A>, get_state: GetState<S>, own_props: &Props) -> Self {
        let props = selector.select(&get_state.get(), own_props);
        Self {
            selector,
            get_state,
            props,
            should_component_update: true,
        }
    }

    /// Rerun against the current state; flags an update if the merged props moved
    pub fn run(&mut self, own_props: &Props) {
        let next = self.selector.select(&self.get_state.get(), own_props);
        if !Rc::ptr_eq(&next, &self.props) {
            self.props = next;
            self.should_component_update = true;
        }
    }

    pub fn props(&self) -> Rc<Props> {
        Rc::clone(&self.props)
    }

    pub fn should_component_update(&self) -> bool {
        self.should_component_update
    }

    /// Clear the update flag once the owner has rendered
    pub fn mark_rendered(&mut self) {
        self.should_component_update = false;
    }
}
