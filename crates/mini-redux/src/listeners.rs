//! Ordered set of change listeners
//!
//! Used by the store for its top-level subscribers and by subscription nodes
//! for their nested listeners. Each listener is keyed by a [`ListenerId`]
//! handed out in registration order, so removal never depends on a position
//! and never touches a neighbour.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

/// A no-argument change callback
pub type Listener = Rc<dyn Fn()>;

/// Stable identity of a registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
struct ListenerTable {
    next_id: u64,
    entries: BTreeMap<ListenerId, Listener>,
}

/// Listeners notified in registration order
#[derive(Default, Clone)]
pub struct Listeners {
    table: Rc<RefCell<ListenerTable>>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; the returned handle removes exactly this one
    pub fn add<F>(&self, listener: F) -> Unsubscribe
    where
        F: Fn() + 'static,
    {
        self.add_shared(Rc::new(listener))
    }

    /// Register an already shared listener
    pub fn add_shared(&self, listener: Listener) -> Unsubscribe {
        let mut table = self.table.borrow_mut();
        let id = ListenerId(table.next_id);
        table.next_id += 1;
        table.entries.insert(id, listener);
        Unsubscribe {
            table: Rc::downgrade(&self.table),
            id,
        }
    }

    /// Invoke every listener registered at the time of the call
    ///
    /// Iterates over a snapshot: listeners may subscribe, unsubscribe or
    /// dispatch while being notified.
    pub fn notify(&self) {
        let snapshot: Vec<Listener> = self.table.borrow().entries.values().cloned().collect();
        for listener in snapshot {
            listener();
        }
    }

    pub fn len(&self) -> usize {
        self.table.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.table.borrow_mut().entries.clear();
    }
}

/// Handle returned by `subscribe`
///
/// Removing twice, or after the owning set is gone, does nothing.
#[derive(Debug, Clone)]
pub struct Unsubscribe {
    table: Weak<RefCell<ListenerTable>>,
    id: ListenerId,
}

impl Unsubscribe {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn unsubscribe(&self) {
        if let Some(table) = self.table.upgrade() {
            if table.borrow_mut().entries.remove(&self.id).is_some() {
                log::trace!("Listener {:?} removed", self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn recorder() -> Rc<RefCell<Vec<&'static str>>> {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[test]
    fn test_notify_in_registration_order() {
        let listeners = Listeners::new();
        let calls = recorder();
        for name in ["a", "b", "c"] {
            let calls = Rc::clone(&calls);
            listeners.add(move || calls.borrow_mut().push(name));
        }

        listeners.notify();
        assert_eq!(*calls.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_first_listener_is_removable() {
        let listeners = Listeners::new();
        let calls = recorder();
        let first = {
            let calls = Rc::clone(&calls);
            listeners.add(move || calls.borrow_mut().push("first"))
        };
        {
            let calls = Rc::clone(&calls);
            listeners.add(move || calls.borrow_mut().push("second"));
        }

        first.unsubscribe();
        listeners.notify();
        assert_eq!(*calls.borrow(), vec!["second"]);
    }

    #[test]
    fn test_double_unsubscribe_keeps_neighbours() {
        let listeners = Listeners::new();
        let a = listeners.add(|| {});
        listeners.add(|| {});
        listeners.add(|| {});

        a.unsubscribe();
        a.unsubscribe();
        assert_eq!(listeners.len(), 2);
    }

    #[test]
    fn test_unsubscribe_during_notify_uses_snapshot() {
        let listeners = Listeners::new();
        let calls = recorder();
        let victim: Rc<RefCell<Option<Unsubscribe>>> = Rc::new(RefCell::new(None));

        {
            let calls = Rc::clone(&calls);
            let victim = Rc::clone(&victim);
            listeners.add(move || {
                calls.borrow_mut().push("killer");
                if let Some(handle) = victim.borrow().as_ref() {
                    handle.unsubscribe();
                }
            });
        }
        let handle = {
            let calls = Rc::clone(&calls);
            listeners.add(move || calls.borrow_mut().push("victim"))
        };
        {
            let calls = Rc::clone(&calls);
            listeners.add(move || calls.borrow_mut().push("bystander"));
        }
        *victim.borrow_mut() = Some(handle);

        listeners.notify();
        assert_eq!(*calls.borrow(), vec!["killer", "victim", "bystander"]);

        calls.borrow_mut().clear();
        listeners.notify();
        assert_eq!(*calls.borrow(), vec!["killer", "bystander"]);
    }

    #[test]
    fn test_unsubscribe_after_set_dropped() {
        let listeners = Listeners::new();
        let handle = listeners.add(|| {});
        drop(listeners);
        handle.unsubscribe();
    }

    #[test]
    fn test_listener_added_during_notify_waits_for_next_pass() {
        let listeners = Listeners::new();
        let late_calls = Rc::new(Cell::new(0));
        {
            let inner = listeners.clone();
            let late_calls = Rc::clone(&late_calls);
            listeners.add(move || {
                let late_calls = Rc::clone(&late_calls);
                inner.add(move || late_calls.set(late_calls.get() + 1));
            });
        }

        listeners.notify();
        assert_eq!(late_calls.get(), 0);
        listeners.notify();
        assert_eq!(late_calls.get(), 1);
    }
}
