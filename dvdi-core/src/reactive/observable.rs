//! Observable Implementation
//!
//! An Observable holds one value and an ordered list of subscribers.
//!
//! # How Observables Work
//!
//! 1. `get` returns a clone of the current value.
//!
//! 2. `set` stores a new value and notifies every subscriber, synchronously
//!    and in subscription order, but only if the new value differs from the
//!    current one. Setting an equal value does nothing.
//!
//! 3. `subscribe` appends a callback. There is no unsubscribe: subscribers
//!    live as long as the observable.
//!
//! Observables do not batch. A component that wants one re-render per frame
//! subscribes through the scheduler.

use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use smallvec::SmallVec;
use tracing::trace;

/// Counter for generating unique observable IDs.
static OBSERVABLE_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_observable_id() -> u64 {
    OBSERVABLE_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Change callback registered with [`Observable::subscribe`].
type Subscriber = Rc<dyn Fn()>;

/// A single observable value. Clones share the value and subscribers.
///
/// # Example
///
/// ```rust,ignore
/// let count = create_observable(0);
/// count.subscribe(|| println!("changed"));
///
/// count.set(1); // prints "changed"
/// count.set(1); // equal value, no notification
/// ```
pub struct Observable<T> {
    id: u64,
    value: Rc<RefCell<T>>,
    subscribers: Rc<RefCell<SmallVec<[Subscriber; 2]>>>,
}

/// Create an observable holding `initial`.
pub fn create_observable<T>(initial: T) -> Observable<T>
where
    T: Clone + PartialEq + 'static,
{
    Observable::new(initial)
}

impl<T> Observable<T>
where
    T: Clone + PartialEq + 'static,
{
    pub fn new(value: T) -> Self {
        Self {
            id: next_observable_id(),
            value: Rc::new(RefCell::new(value)),
            subscribers: Rc::new(RefCell::new(SmallVec::new())),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Get the current value.
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Read the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }

    /// Store `value` and notify subscribers if it differs from the current
    /// value. Returns whether subscribers were notified.
    pub fn set(&self, value: T) -> bool {
        {
            let mut current = self.value.borrow_mut();
            if *current == value {
                return false;
            }
            *current = value;
        }

        self.notify_subscribers();
        true
    }

    /// Set the value computed from the current one.
    pub fn update(&self, f: impl FnOnce(&T) -> T) -> bool {
        let next = f(&self.value.borrow());
        self.set(next)
    }

    /// Register `notify` to run after every change.
    pub fn subscribe<F>(&self, notify: F)
    where
        F: Fn() + 'static,
    {
        self.subscribers.borrow_mut().push(Rc::new(notify));
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    fn notify_subscribers(&self) {
        // Subscribers may subscribe more callbacks; those run from the next
        // change on.
        let subscribers = self.subscribers.borrow().clone();
        trace!(id = self.id, count = subscribers.len(), "notifying subscribers");
        for subscriber in &subscribers {
            subscriber();
        }
    }
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            value: Rc::clone(&self.value),
            subscribers: Rc::clone(&self.subscribers),
        }
    }
}

impl<T> Debug for Observable<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("id", &self.id)
            .field("value", &*self.value.borrow())
            .field("subscriber_count", &self.subscribers.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn observable_get_and_set() {
        let observable = create_observable(0);
        assert_eq!(observable.get(), 0);

        observable.set(42);
        assert_eq!(observable.get(), 42);
    }

    #[test]
    fn observable_update() {
        let observable = create_observable(10);
        observable.update(|v| v + 5);
        assert_eq!(observable.get(), 15);
    }

    #[test]
    fn observable_notifies_subscribers() {
        let observable = create_observable(0);
        let call_count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&call_count);

        observable.subscribe(move || counter.set(counter.get() + 1));
        assert_eq!(call_count.get(), 0);

        observable.set(1);
        assert_eq!(call_count.get(), 1);

        observable.set(2);
        assert_eq!(call_count.get(), 2);
    }

    #[test]
    fn equal_value_does_not_notify() {
        let observable = create_observable(String::from("a"));
        let call_count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&call_count);
        observable.subscribe(move || counter.set(counter.get() + 1));

        assert!(!observable.set(String::from("a")));
        assert!(observable.set(String::from("b")));
        assert_eq!(call_count.get(), 1);
    }

    #[test]
    fn subscribers_run_in_order_and_see_new_value() {
        let observable = create_observable(0);
        let seen = Rc::new(RefCell::new(Vec::new()));

        for tag in ["first", "second"] {
            let seen = Rc::clone(&seen);
            let source = observable.clone();
            observable.subscribe(move || seen.borrow_mut().push((tag, source.get())));
        }

        observable.set(7);
        assert_eq!(*seen.borrow(), [("first", 7), ("second", 7)]);
    }

    #[test]
    fn subscribing_during_notification_is_allowed() {
        let observable = create_observable(0);
        let inner = observable.clone();
        observable.subscribe(move || {
            inner.subscribe(|| {});
        });

        observable.set(1);
        assert_eq!(observable.subscriber_count(), 2);
    }

    #[test]
    fn observable_clone_shares_state() {
        let observable1 = create_observable(0);
        let observable2 = observable1.clone();

        observable1.set(42);
        assert_eq!(observable2.get(), 42);
        assert_eq!(observable1.id(), observable2.id());
    }

    #[test]
    fn observable_ids_are_unique() {
        let o1 = create_observable(0);
        let o2 = create_observable(0);
        assert_ne!(o1.id(), o2.id());
    }
}
