//! Scoped listener registry.
//!
//! `Listeners<E>` is a single-threaded event source. Every `subscribe` call
//! hands back a [`Subscription`]; the listener stays registered exactly as
//! long as that handle lives. Views keep their handles in a field, so
//! unmounting a view (dropping it) unregisters everything it added.

#[cfg(test)]
#[path = "subscription_test.rs"]
mod subscription_test;

use std::cell::RefCell;
use std::rc::Rc;

type Listener<E> = Rc<dyn Fn(&E)>;

/// A list of listeners for events of type `E`.
pub struct Listeners<E> {
    listeners: Rc<RefCell<Vec<Listener<E>>>>,
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self { listeners: Rc::new(RefCell::new(Vec::new())) }
    }
}

impl<E: 'static> Listeners<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`. It is removed when the returned handle drops.
    #[must_use = "dropping the subscription unregisters the listener immediately"]
    pub fn subscribe(&self, listener: impl Fn(&E) + 'static) -> Subscription {
        let listener: Listener<E> = Rc::new(listener);
        self.listeners.borrow_mut().push(Rc::clone(&listener));

        let listeners = Rc::clone(&self.listeners);
        Subscription {
            teardown: Some(Box::new(move || {
                listeners.borrow_mut().retain(|item| !Rc::ptr_eq(item, &listener));
            })),
        }
    }

    /// Deliver `event` to every listener registered at the time of the call.
    ///
    /// The list is snapshotted first, so listeners may subscribe or drop
    /// handles while being notified.
    pub fn emit(&self, event: &E) {
        let snapshot = self.listeners.borrow().clone();
        for listener in snapshot {
            listener(event);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }
}

/// Handle that keeps one listener registered.
pub struct Subscription {
    teardown: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Unregister now instead of at drop.
    pub fn cancel(mut self) {
        self.run_teardown();
    }

    fn run_teardown(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_teardown();
    }
}
