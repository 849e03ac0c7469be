//! Binding views to the store
//!
//! [`connect`] pairs a state mapping with a dispatch mapping. Mounting the
//! result with a view yields a [`Connected`] unit that owns a selector and a
//! subscription node, renders once, and from then on renders again only when
//! its merged props change. Nested units are mounted from inside a parent's
//! render with the context the parent passes down, which places them under
//! the parent in the subscription tree.

use crate::props::Props;
use crate::provider::ConnectContext;
use crate::selector::{MapDispatch, MapState, Selector, StatefulSelector};
use crate::subscription::Subscription;
use mini_redux::Action;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Something that can be drawn from props
///
/// `context` is the context for connected children mounted during this
/// render.
pub trait View<S, A> {
    fn render(&mut self, props: &Props, context: &ConnectContext<S, A>);
}

impl<S, A, F> View<S, A> for F
where
    F: FnMut(&Props),
{
    fn render(&mut self, props: &Props, _context: &ConnectContext<S, A>) {
        self(props)
    }
}

/// A pair of mappings waiting for a view
pub struct Connect<S, A> {
    map_state: MapState<S>,
    map_dispatch: MapDispatch<S, A>,
}

pub fn connect<S, A>(map_state: MapState<S>, map_dispatch: MapDispatch<S, A>) -> Connect<S, A> {
    Connect {
        map_state,
        map_dispatch,
    }
}

impl<S, A> Clone for Connect<S, A> {
    fn clone(&self) -> Self {
        Self {
            map_state: self.map_state.clone(),
            map_dispatch: self.map_dispatch.clone(),
        }
    }
}

impl<S: 'static, A: Action> Connect<S, A> {
    /// Mount `view` under `context`, render it and subscribe
    pub fn mount<V>(&self, context: &ConnectContext<S, A>, own_props: Props, view: V) -> Connected<S, A>
    where
        V: View<S, A> + 'static,
    {
        let store = context.store().clone();
        let selector = Selector::new(self.map_state.clone(), self.map_dispatch.clone(), store.dispatcher());
        let selector = StatefulSelector::new(selector, store.get_state(), &own_props);

        let inner = Rc::new_cyclic(|weak: &Weak<ConnectedInner<S, A>>| {
            let weak = Weak::clone(weak);
            let subscription = Subscription::new(store.clone(), context.parent_subscription().cloned(), move || {
                if let Some(inner) = weak.upgrade() {
                    inner.on_state_change();
                }
            });

            ConnectedInner {
                selector: RefCell::new(selector),
                own_props: RefCell::new(own_props),
                view: RefCell::new(Box::new(view)),
                child_context: ConnectContext::nested(store.clone(), subscription.clone()),
                subscription,
                render_count: Cell::new(0),
                rendering: Cell::new(false),
                stale: Cell::new(false),
            }
        });

        inner.render();
        inner.subscription.try_subscribe();
        // The first render may have dispatched before the subscription existed.
        inner.rerun();
        log::debug!(
            "Connected unit mounted ({})",
            if inner.subscription.is_root() { "root" } else { "nested" }
        );

        Connected { inner }
    }
}

/// A mounted view with its selector and subscription node
///
/// Dropping it unsubscribes.
pub struct Connected<S, A> {
    inner: Rc<ConnectedInner<S, A>>,
}

struct ConnectedInner<S, A> {
    selector: RefCell<StatefulSelector<S, A>>,
    own_props: RefCell<Props>,
    view: RefCell<Box<dyn View<S, A>>>,
    subscription: Subscription<S, A>,
    child_context: ConnectContext<S, A>,
    render_count: Cell<usize>,
    rendering: Cell<bool>,
    /// A notification arrived mid-render and must be replayed
    stale: Cell<bool>,
}

impl<S, A> Connected<S, A> {
    /// Current merged props
    pub fn props(&self) -> Rc<Props> {
        self.inner.selector.borrow().props()
    }

    pub fn own_props(&self) -> Props {
        self.inner.own_props.borrow().clone()
    }

    pub fn render_count(&self) -> usize {
        self.inner.render_count.get()
    }

    pub fn child_context(&self) -> ConnectContext<S, A> {
        self.inner.child_context.clone()
    }

    pub fn subscription(&self) -> &Subscription<S, A> {
        &self.inner.subscription
    }

    pub fn is_subscribed(&self) -> bool {
        self.inner.subscription.is_subscribed()
    }

    /// Stop listening; the view keeps its last render
    pub fn unmount(&self) {
        self.inner.subscription.try_unsubscribe();
        log::debug!("Connected unit unmounted");
    }

    /// Replace own props, rendering if the merged props changed
    ///
    /// Returns whether a render happened. Nested units are not notified.
    pub fn receive_props(&self, own_props: Props) -> bool {
        *self.inner.own_props.borrow_mut() = own_props;
        self.inner.rerun()
    }
}

impl<S, A> ConnectedInner<S, A> {
    fn on_state_change(&self) {
        if self.rendering.get() {
            log::trace!("Connected: notified mid-render, deferring");
            self.stale.set(true);
            return;
        }
        self.rerun();
        self.subscription.notify_nested_subs();
    }

    /// Run the selector and render if it asks for it
    ///
    /// While the view is drawing, the run is deferred to the replay at the
    /// end of that render.
    fn rerun(&self) -> bool {
        if self.rendering.get() {
            log::trace!("Connected: rerun requested mid-render, deferring");
            self.stale.set(true);
            return false;
        }

        let own_props = self.own_props.borrow().clone();
        let should_update = match self.selector.try_borrow_mut() {
            Ok(mut selector) => {
                selector.run(&own_props);
                selector.should_component_update()
            }
            Err(_) => {
                log::warn!("Connected: selector re-entered from a mapping function, skipping");
                false
            }
        };
        should_update && self.render()
    }

    /// Draw the current props; returns whether the view was drawn
    fn render(&self) -> bool {
        let props = self.selector.borrow().props();
        {
            let Ok(mut view) = self.view.try_borrow_mut() else {
                log::trace!("Connected: render requested while already rendering, deferring");
                self.stale.set(true);
                return false;
            };
            self.rendering.set(true);
            view.render(&props, &self.child_context);
            self.rendering.set(false);
        }
        self.render_count.set(self.render_count.get() + 1);
        log::trace!("Connected: rendered ({} so far)", self.render_count.get());

        {
            let mut selector = self.selector.borrow_mut();
            if Rc::ptr_eq(&selector.props(), &props) {
                selector.mark_rendered();
            } else {
                // The drawn props are already outdated; keep the update flag.
                self.stale.set(true);
            }
        }

        if self.stale.replace(false) {
            self.on_state_change();
        }
        true
    }
}

impl<S, A> Drop for ConnectedInner<S, A> {
    fn drop(&mut self) {
        self.subscription.try_unsubscribe();
    }
}
