//! Subscription tree
//!
//! Every connected unit owns one [`Subscription`]. A root node subscribes to
//! the store; a nested node registers with its parent node instead, so a
//! store change reaches a child only after its ancestors have seen it. Since
//! a node always makes its parent subscribe before registering itself,
//! parents end up ahead of their children in every listener list.

use mini_redux::{Listener, Listeners, Store, Unsubscribe};
use std::cell::RefCell;
use std::rc::Rc;

/// A node in the subscription tree
pub struct Subscription<S, A> {
    inner: Rc<SubscriptionInner<S, A>>,
}

struct SubscriptionInner<S, A> {
    store: Store<S, A>,
    parent: Option<Subscription<S, A>>,
    on_state_change: Listener,
    /// Link to the parent's listeners or the store's; `Some` once subscribed
    link: RefCell<Option<Unsubscribe>>,
    nested: Listeners,
}

impl<S, A> Subscription<S, A> {
    pub fn new<F>(store: Store<S, A>, parent: Option<Subscription<S, A>>, on_state_change: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self {
            inner: Rc::new(SubscriptionInner {
                store,
                parent,
                on_state_change: Rc::new(on_state_change),
                link: RefCell::new(None),
                nested: Listeners::new(),
            }),
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.inner.link.borrow().is_some()
    }

    pub fn is_root(&self) -> bool {
        self.inner.parent.is_none()
    }

    pub fn parent(&self) -> Option<&Subscription<S, A>> {
        self.inner.parent.as_ref()
    }

    /// Subscribe this node once; later calls do nothing
    pub fn try_subscribe(&self) {
        if self.is_subscribed() {
            return;
        }

        let on_state_change = Rc::clone(&self.inner.on_state_change);
        let link = match &self.inner.parent {
            Some(parent) => parent.add_nested_sub(on_state_change),
            None => self.inner.store.subscribe(move || on_state_change()),
        };
        log::trace!(
            "Subscription: subscribed {} node",
            if self.is_root() { "root" } else { "nested" }
        );
        *self.inner.link.borrow_mut() = Some(link);
    }

    /// Register a child's listener, subscribing this node first
    pub fn add_nested_sub(&self, listener: Listener) -> Unsubscribe {
        self.try_subscribe();
        self.inner.nested.add_shared(listener)
    }

    /// Invoke every nested listener in registration order
    pub fn notify_nested_subs(&self) {
        self.inner.nested.notify();
    }

    pub fn nested_count(&self) -> usize {
        self.inner.nested.len()
    }

    /// Detach from the parent (or store) and forget nested listeners
    pub fn try_unsubscribe(&self) {
        let link = self.inner.link.borrow_mut().take();
        if let Some(link) = link {
            link.unsubscribe();
            log::trace!("Subscription: unsubscribed");
        }
        self.inner.nested.clear();
    }
}

impl<S, A> Clone for Subscription<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}
