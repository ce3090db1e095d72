// ============================================================================
// REACTIVITY - Observable value with synchronous subscribers
// ============================================================================

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

type Callback<T> = Rc<dyn Fn(&T)>;

/// Handle returned by `subscribe`, used to unsubscribe later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Numeric form, for handing the id across the JS boundary
    pub fn raw(&self) -> u64 {
        self.0
    }

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

struct Subscribers<T> {
    next_id: Cell<u64>,
    callbacks: RefCell<Vec<(SubscriptionId, Callback<T>)>>,
    // Values written while a notification round is running
    pending: RefCell<VecDeque<T>>,
    notifying: Cell<bool>,
}

/// Shared reactive value. Clones are handles onto the same value and the
/// same subscriber list.
pub struct ReactiveState<T> {
    value: Rc<RefCell<T>>,
    subscribers: Rc<Subscribers<T>>,
}

impl<T: Clone> ReactiveState<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Rc::new(RefCell::new(value)),
            subscribers: Rc::new(Subscribers {
                next_id: Cell::new(0),
                callbacks: RefCell::new(Vec::new()),
                pending: RefCell::new(VecDeque::new()),
                notifying: Cell::new(false),
            }),
        }
    }

    /// Snapshot of the current value
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Replace the value and notify subscribers
    pub fn set(&self, new_value: T) {
        *self.value.borrow_mut() = new_value;
        self.notify();
    }

    /// Mutate in place, then notify. The borrow is released before any
    /// subscriber runs.
    pub fn update<F>(&self, updater: F)
    where
        F: FnOnce(&mut T),
    {
        updater(&mut *self.value.borrow_mut());
        self.notify();
    }

    /// Register `callback`. It runs once right away with the current value
    /// and again after every change.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + 'static,
    {
        let id = SubscriptionId(self.subscribers.next_id.get());
        self.subscribers.next_id.set(id.0 + 1);

        let callback: Callback<T> = Rc::new(callback);
        self.subscribers
            .callbacks
            .borrow_mut()
            .push((id, callback.clone()));

        let current = self.get();
        callback(&current);
        id
    }

    /// Returns `false` if `id` was not subscribed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut callbacks = self.subscribers.callbacks.borrow_mut();
        let before = callbacks.len();
        callbacks.retain(|(existing, _)| *existing != id);
        callbacks.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.callbacks.borrow().len()
    }

    /// Every subscriber receives each value before the next value is
    /// dispatched. A write made from inside a subscriber is queued and
    /// delivered by the outermost round.
    fn notify(&self) {
        self.subscribers.pending.borrow_mut().push_back(self.get());
        if self.subscribers.notifying.replace(true) {
            return;
        }

        loop {
            let next = self.subscribers.pending.borrow_mut().pop_front();
            let Some(value) = next else {
                break;
            };

            // Snapshot the list so callbacks may subscribe or unsubscribe
            let callbacks: Vec<Callback<T>> = self
                .subscribers
                .callbacks
                .borrow()
                .iter()
                .map(|(_, callback)| callback.clone())
                .collect();

            for callback in callbacks {
                callback(&value);
            }
        }

        self.subscribers.notifying.set(false);
    }
}

impl<T> Clone for ReactiveState<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            subscribers: self.subscribers.clone(),
        }
    }
}
