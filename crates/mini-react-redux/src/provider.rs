use crate::subscription::Subscription;
use mini_redux::Store;

/// Hands a store to the connected units below it
///
/// There is no ambient store; every unit is mounted with a [`ConnectContext`]
/// that came from a provider or from its connected parent.
pub struct Provider<S, A> {
    store: Store<S, A>,
}

impl<S, A> Provider<S, A> {
    pub fn new(store: Store<S, A>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store<S, A> {
        &self.store
    }

    /// Context for root units: the store and no parent subscription
    pub fn context(&self) -> ConnectContext<S, A> {
        ConnectContext::root(self.store.clone())
    }
}

/// What a connected unit receives from above
pub struct ConnectContext<S, A> {
    store: Store<S, A>,
    parent_sub: Option<Subscription<S, A>>,
}

impl<S, A> ConnectContext<S, A> {
    pub fn root(store: Store<S, A>) -> Self {
        Self { store, parent_sub: None }
    }

    pub fn nested(store: Store<S, A>, parent_sub: Subscription<S, A>) -> Self {
        Self {
            store,
            parent_sub: Some(parent_sub),
        }
    }

    pub fn store(&self) -> &Store<S, A> {
        &self.store
    }

    pub fn parent_subscription(&self) -> Option<&Subscription<S, A>> {
        self.parent_sub.as_ref()
    }
}

impl<S, A> Clone for ConnectContext<S, A> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            parent_sub: self.parent_sub.clone(),
        }
    }
}
