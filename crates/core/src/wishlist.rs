//! Wishlist
//!
//! A persisted set of product identifiers, stored under [`WISHLIST_KEY`] as a JSON array.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::{
    products::ProductId,
    storage::{Storage, StorageError, load_json, save_json},
    subscribers::{SubscriptionKey, Subscribers},
};

/// Storage key of the persisted wishlist.
pub const WISHLIST_KEY: &str = "wishlist";

/// Errors raised by the wishlist store.
#[derive(Debug, Error)]
pub enum WishlistError {
    /// Persisting the wishlist failed; the wishlist is unchanged.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A committed wishlist mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WishlistEvent {
    /// A product was added.
    Added(ProductId),

    /// A product was removed.
    Removed(ProductId),

    /// Stale products were pruned.
    Pruned(Vec<ProductId>),
}

/// The wishlist.
#[derive(Debug)]
pub struct WishlistStore<S: Storage> {
    ids: BTreeSet<ProductId>,
    storage: S,
    subscribers: Subscribers<WishlistEvent, BTreeSet<ProductId>>,
}

impl<S: Storage> WishlistStore<S> {
    /// Load the persisted wishlist. Nothing stored means an empty wishlist.
    ///
    /// # Errors
    ///
    /// Returns [`WishlistError::Storage`] if the stored list could not be read or decoded.
    pub fn load(storage: S) -> Result<Self, WishlistError> {
        let ids: Vec<ProductId> = load_json(&storage, WISHLIST_KEY)?.unwrap_or_default();

        Ok(Self {
            ids: ids.into_iter().collect(),
            storage,
            subscribers: Subscribers::default(),
        })
    }

    /// Add `id` if absent, remove it if present. Returns whether it is now on the wishlist.
    ///
    /// # Errors
    ///
    /// Returns [`WishlistError::Storage`] if persisting failed; the wishlist is unchanged.
    pub fn toggle(&mut self, id: ProductId) -> Result<bool, WishlistError> {
        let mut ids = self.ids.clone();

        let (present, event) = if ids.remove(&id) {
            (false, WishlistEvent::Removed(id))
        } else {
            ids.insert(id.clone());
            (true, WishlistEvent::Added(id))
        };

        self.commit(ids, &event)?;

        Ok(present)
    }

    /// Whether `id` is on the wishlist.
    pub fn contains(&self, id: &ProductId) -> bool {
        self.ids.contains(id)
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the wishlist is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Products on the wishlist, in identifier order.
    pub fn ids(&self) -> impl Iterator<Item = &ProductId> {
        self.ids.iter()
    }

    /// Remove every product for which `keep` returns false. Returns the removed products;
    /// nothing is written when nothing is removed.
    ///
    /// # Errors
    ///
    /// Returns [`WishlistError::Storage`] if persisting failed; the wishlist is unchanged.
    pub fn prune(
        &mut self,
        mut keep: impl FnMut(&ProductId) -> bool,
    ) -> Result<Vec<ProductId>, WishlistError> {
        let (kept, removed): (BTreeSet<_>, BTreeSet<_>) =
            self.ids.iter().cloned().partition(|id| keep(id));

        if removed.is_empty() {
            return Ok(Vec::new());
        }

        let removed: Vec<ProductId> = removed.into_iter().collect();

        self.commit(kept, &WishlistEvent::Pruned(removed.clone()))?;

        Ok(removed)
    }

    /// Register a callback run after every committed mutation.
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&WishlistEvent, &BTreeSet<ProductId>) + 'static,
    ) -> SubscriptionKey {
        self.subscribers.subscribe(callback)
    }

    /// Remove a callback. Returns `false` if it was already removed.
    pub fn unsubscribe(&mut self, key: SubscriptionKey) -> bool {
        self.subscribers.unsubscribe(key)
    }

    fn commit(
        &mut self,
        ids: BTreeSet<ProductId>,
        event: &WishlistEvent,
    ) -> Result<(), WishlistError> {
        save_json(&mut self.storage, WISHLIST_KEY, &ids)?;

        self.ids = ids;
        self.subscribers.notify(event, &self.ids);

        Ok(())
    }
}
