//! Minimal push-based observables
//!
//! An [`Observable`] fans every emitted value out to its subscribers. `map`,
//! `filter`, `reject` and `tap` return a new observable fed by this one, so
//! stages can be chained. Existing observables can be joined with `pipe`:
//!
//! ```rust,ignore
//! let numbers = Observable::new();
//! numbers
//!     .filter(|n: &i32| *n >= 0)
//!     .map(|n| n * 2)
//!     .subscribe(|n| println!("{}", n));
//! numbers.emit(&21);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

type Subscriber<T> = Rc<dyn Fn(&T)>;

/// A value stream with synchronous delivery
pub struct Observable<T> {
    subscribers: Rc<RefCell<Vec<Subscriber<T>>>>,
}

impl<T: 'static> Observable<T> {
    pub fn new() -> Self {
        Self {
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn subscribe<F>(&self, subscriber: F)
    where
        F: Fn(&T) + 'static,
    {
        self.subscribers.borrow_mut().push(Rc::new(subscriber));
    }

    /// Deliver `value` to every current subscriber, in subscription order
    pub fn emit(&self, value: &T) {
        let snapshot: Vec<Subscriber<T>> = self.subscribers.borrow().iter().cloned().collect();
        for subscriber in snapshot {
            subscriber(value);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Observable of `transform` applied to each value
    pub fn map<U, F>(&self, transform: F) -> Observable<U>
    where
        U: 'static,
        F: Fn(&T) -> U + 'static,
    {
        let mapped = Observable::new();
        let downstream = mapped.clone();
        self.subscribe(move |value| downstream.emit(&transform(value)));
        mapped
    }

    /// Observable of the values for which `predicate` holds
    pub fn filter<F>(&self, predicate: F) -> Observable<T>
    where
        F: Fn(&T) -> bool + 'static,
    {
        let filtered = Observable::new();
        let downstream = filtered.clone();
        self.subscribe(move |value| {
            if predicate(value) {
                downstream.emit(value);
            }
        });
        filtered
    }

    /// Observable of the values for which `predicate` does not hold
    pub fn reject<F>(&self, predicate: F) -> Observable<T>
    where
        F: Fn(&T) -> bool + 'static,
    {
        self.filter(move |value| !predicate(value))
    }

    /// Observable of the same values, after `effect` has seen each of them
    pub fn tap<F>(&self, effect: F) -> Observable<T>
    where
        F: Fn(&T) + 'static,
    {
        let tapped = Observable::new();
        let downstream = tapped.clone();
        self.subscribe(move |value| {
            effect(value);
            downstream.emit(value);
        });
        tapped
    }

    /// Feed this observable into each of `stages` in turn and return the last
    ///
    /// Every stage re-emits what the previous one emitted, on top of whatever
    /// it already receives. With no stages this observable is returned.
    pub fn pipe<I>(&self, stages: I) -> Observable<T>
    where
        I: IntoIterator<Item = Observable<T>>,
    {
        stages.into_iter().fold(self.clone(), |upstream, stage| {
            let downstream = stage.clone();
            upstream.subscribe(move |value| downstream.emit(value));
            stage
        })
    }
}

impl<T: 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            subscribers: Rc::clone(&self.subscribers),
        }
    }
}
