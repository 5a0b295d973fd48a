#![forbid(unsafe_code)]

//! Broadcast point: a subscriber registry with RAII unsubscription.
//!
//! # Design
//!
//! [`Broadcast<E>`] holds its subscribers in shared, reference-counted
//! storage (`Rc<RefCell<..>>`). Subscribers are stored as `Weak` function
//! pointers; the strong end lives inside the [`Subscription`] guard handed
//! back by [`Broadcast::subscribe`], so dropping the guard unsubscribes.
//! Dead entries are pruned lazily during [`Broadcast::emit`].
//!
//! Cloning a `Broadcast` creates a new handle to the **same** subscriber
//! set; a collection and the closures it hands out can both reach it.
//!
//! # Invariants
//!
//! 1. Subscribers are notified in registration order.
//! 2. A dropped [`Subscription`]'s callback is never invoked after drop.
//! 3. `emit` dispatches synchronously on the caller's stack.
//!
//! # Failure Modes
//!
//! - **Re-entrant mutation**: a handler that mutates the collection it is
//!   observing during dispatch is forbidden by contract. The registry itself
//!   tolerates re-entrant `emit`/`subscribe` (the borrow is released before
//!   callbacks run), but collection state is not defended.
//! - **Subscriber leak**: guards stored indefinitely accumulate callbacks;
//!   dead weak references are cleaned lazily on the next emit.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type CallbackRc<E> = Rc<dyn Fn(&E)>;
type CallbackWeak<E> = Weak<dyn Fn(&E)>;

/// A named notification point delivering events of type `E`.
pub struct Broadcast<E> {
    subscribers: Rc<RefCell<Vec<CallbackWeak<E>>>>,
}

// Manual Clone: shares the same subscriber set.
impl<E> Clone for Broadcast<E> {
    fn clone(&self) -> Self {
        Self {
            subscribers: Rc::clone(&self.subscribers),
        }
    }
}

impl<E> Default for Broadcast<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for Broadcast<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcast")
            .field("subscriber_count", &self.subscribers.borrow().len())
            .finish()
    }
}

impl<E> Broadcast<E> {
    /// Create an empty broadcast point.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Subscribe to events. The callback is invoked with each emitted event
    /// until the returned [`Subscription`] guard is dropped.
    pub fn subscribe(&self, callback: impl Fn(&E) + 'static) -> Subscription
    where
        E: 'static,
    {
        let strong: CallbackRc<E> = Rc::new(callback);
        let weak = Rc::downgrade(&strong);
        self.subscribers.borrow_mut().push(weak);
        // `Rc<dyn Fn(&E)>` cannot coerce to `Rc<dyn Any>` directly, so the
        // guard type-erases through a box.
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Deliver `event` to every live subscriber, in registration order.
    /// Dead subscribers are pruned first.
    pub fn emit(&self, event: &E) {
        // Collect live callbacks first so the borrow is not held during calls.
        let callbacks: Vec<CallbackRc<E>> = {
            let mut subs = self.subscribers.borrow_mut();
            subs.retain(|w| w.strong_count() > 0);
            subs.iter().filter_map(Weak::upgrade).collect()
        };
        for cb in &callbacks {
            cb(event);
        }
    }

    /// Number of registered subscribers (including dead ones not yet pruned).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

/// RAII guard for a subscriber callback.
///
/// Dropping the guard drops the strong reference to the callback, so the
/// `Weak` entry in the broadcast's subscriber list fails to upgrade on the
/// next emission cycle.
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
