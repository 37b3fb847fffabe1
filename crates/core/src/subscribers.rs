//! Change subscriptions for the client-side stores.

use std::fmt;

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Handle returned by `subscribe`, used to unsubscribe.
    pub struct SubscriptionKey;
}

type Callback<E, S> = Box<dyn FnMut(&E, &S)>;

/// Registered callbacks that receive an event and the store state after each committed mutation.
pub struct Subscribers<E, S: ?Sized> {
    callbacks: SlotMap<SubscriptionKey, Callback<E, S>>,
}

impl<E, S: ?Sized> Subscribers<E, S> {
    /// Register a callback.
    pub fn subscribe(&mut self, callback: impl FnMut(&E, &S) + 'static) -> SubscriptionKey {
        self.callbacks.insert(Box::new(callback))
    }

    /// Remove a callback. Returns `false` if the key was already removed.
    pub fn unsubscribe(&mut self, key: SubscriptionKey) -> bool {
        self.callbacks.remove(key).is_some()
    }

    /// Call every registered callback.
    pub fn notify(&mut self, event: &E, state: &S) {
        for callback in self.callbacks.values_mut() {
            callback(event, state);
        }
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Whether nothing is subscribed.
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl<E, S: ?Sized> Default for Subscribers<E, S> {
    fn default() -> Self {
        Self {
            callbacks: SlotMap::with_key(),
        }
    }
}

impl<E, S: ?Sized> fmt::Debug for Subscribers<E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("len", &self.callbacks.len())
            .finish()
    }
}
