//! Cart Store

use std::num::NonZeroU32;

use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize};

use crate::{
    cart::{
        errors::CartError,
        models::{CartItem, LineId, SelectedOptions},
    },
    products::Product,
    storage::{Storage, load_json, save_json},
    subscribers::{SubscriptionKey, Subscribers},
};

/// Storage key of the persisted cart.
pub const CART_KEY: &str = "cart";

/// A committed cart mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// A new line was appended.
    Added {
        /// New line
        line: LineId,
        /// Its quantity
        quantity: NonZeroU32,
    },

    /// A line's quantity changed, including merges of repeated adds.
    QuantityChanged {
        /// Changed line
        line: LineId,
        /// New quantity
        quantity: NonZeroU32,
    },

    /// A line was removed.
    Removed {
        /// Removed line
        line: LineId,
    },

    /// Every line was removed.
    Cleared,
}

/// Direction of a quantity step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// Add one.
    Increment,

    /// Take one away; a line at one is removed.
    Decrement,
}

#[derive(Debug, Default, Deserialize)]
struct CartRecord {
    #[serde(default)]
    items: Vec<CartItem>,
}

#[derive(Debug, Serialize)]
struct CartSnapshot<'a> {
    items: &'a [CartItem],
}

/// The shopping cart.
#[derive(Debug)]
pub struct CartStore<S: Storage> {
    items: Vec<CartItem>,
    currency: &'static Currency,
    storage: S,
    subscribers: Subscribers<CartEvent, [CartItem]>,
}

impl<S: Storage> CartStore<S> {
    /// Load the persisted cart. Nothing stored means an empty cart.
    ///
    /// # Errors
    ///
    /// - [`CartError::Storage`]: the stored cart could not be read or decoded.
    /// - [`CartError::CurrencyMismatch`]: a stored line is priced in another currency.
    pub fn load(storage: S, currency: &'static Currency) -> Result<Self, CartError> {
        let record: CartRecord = load_json(&storage, CART_KEY)?.unwrap_or_default();

        for item in &record.items {
            ensure_currency(item.unit_price.currency(), currency)?;
        }

        Ok(Self {
            items: record.items,
            currency,
            storage,
            subscribers: Subscribers::default(),
        })
    }

    /// Cart currency.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Lines in the order they were added.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Look up a line.
    pub fn line(&self, line: &LineId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.line_id() == *line)
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Add `quantity` of `product` with `options`, merging into an existing line with the same
    /// identity.
    ///
    /// # Errors
    ///
    /// - [`CartError::Unavailable`]: the product is out of stock.
    /// - [`CartError::CurrencyMismatch`]: the product is priced in another currency.
    /// - [`CartError::Storage`]: persisting failed; the cart is unchanged.
    pub fn add_item(
        &mut self,
        product: &Product,
        quantity: NonZeroU32,
        options: SelectedOptions,
    ) -> Result<LineId, CartError> {
        if !product.is_purchasable() {
            return Err(CartError::Unavailable(product.id.clone()));
        }

        ensure_currency(product.price.currency(), self.currency)?;

        let line = LineId::new(&product.id, &options);
        let mut items = self.items.clone();

        let event = if let Some(existing) = items.iter_mut().find(|item| item.line_id() == line) {
            existing.quantity = existing.quantity.saturating_add(quantity.get());

            CartEvent::QuantityChanged {
                line: line.clone(),
                quantity: existing.quantity,
            }
        } else {
            items.push(CartItem::from_product(product, quantity, options));

            CartEvent::Added {
                line: line.clone(),
                quantity,
            }
        };

        self.commit(items, event)?;

        Ok(line)
    }

    /// Step a line's quantity by one. Returns the new quantity, or `None` when decrementing
    /// removed the line.
    ///
    /// # Errors
    ///
    /// - [`CartError::LineNotFound`]: no such line.
    /// - [`CartError::Storage`]: persisting failed; the cart is unchanged.
    pub fn update_quantity(
        &mut self,
        line: &LineId,
        change: QuantityChange,
    ) -> Result<Option<NonZeroU32>, CartError> {
        let current = self
            .line(line)
            .map(|item| item.quantity)
            .ok_or_else(|| CartError::LineNotFound(line.clone()))?;

        let next = match change {
            QuantityChange::Increment => Some(current.saturating_add(1)),
            QuantityChange::Decrement => NonZeroU32::new(current.get() - 1),
        };

        let mut items = self.items.clone();

        let event = if let Some(quantity) = next {
            for item in &mut items {
                if item.line_id() == *line {
                    item.quantity = quantity;
                }
            }

            CartEvent::QuantityChanged {
                line: line.clone(),
                quantity,
            }
        } else {
            items.retain(|item| item.line_id() != *line);

            CartEvent::Removed { line: line.clone() }
        };

        self.commit(items, event)?;

        Ok(next)
    }

    /// Remove a line. Returns whether anything was removed; removing a missing line is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if persisting failed; the cart is unchanged.
    pub fn remove_item(&mut self, line: &LineId) -> Result<bool, CartError> {
        if self.line(line).is_none() {
            return Ok(false);
        }

        let items = self
            .items
            .iter()
            .filter(|item| item.line_id() != *line)
            .cloned()
            .collect();

        self.commit(items, CartEvent::Removed { line: line.clone() })?;

        Ok(true)
    }

    /// Remove every line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if persisting failed; the cart is unchanged.
    pub fn clear(&mut self) -> Result<(), CartError> {
        self.commit(Vec::new(), CartEvent::Cleared)
    }

    /// Register a callback run after every committed mutation.
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&CartEvent, &[CartItem]) + 'static,
    ) -> SubscriptionKey {
        self.subscribers.subscribe(callback)
    }

    /// Remove a callback. Returns `false` if it was already removed.
    pub fn unsubscribe(&mut self, key: SubscriptionKey) -> bool {
        self.subscribers.unsubscribe(key)
    }

    fn commit(&mut self, items: Vec<CartItem>, event: CartEvent) -> Result<(), CartError> {
        save_json(&mut self.storage, CART_KEY, &CartSnapshot { items: &items })?;

        self.items = items;
        self.subscribers.notify(&event, &self.items);

        Ok(())
    }
}

fn ensure_currency(actual: &Currency, expected: &'static Currency) -> Result<(), CartError> {
    if actual == expected {
        Ok(())
    } else {
        Err(CartError::CurrencyMismatch {
            expected: expected.iso_alpha_code,
            actual: actual.iso_alpha_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use rusty_money::{
        Money,
        iso::{GBP, PKR},
    };
    use testresult::TestResult;

    use crate::{
        products::Availability,
        storage::{MemoryStorage, StorageError},
    };

    use super::*;

    /// Memory storage whose writes can be switched to fail.
    #[derive(Debug, Clone, Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        failing: Rc<RefCell<bool>>,
    }

    impl Storage for FlakyStorage {
        fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.read(key)
        }

        fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            if *self.failing.borrow() {
                return Err(StorageError::Io {
                    key: key.to_string(),
                    source: std::io::Error::other("quota exceeded"),
                });
            }

            self.inner.write(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    fn karahi() -> Product {
        Product::new("p-karahi", "Mutton Karahi", Money::from_minor(250_000, PKR))
    }

    fn one() -> NonZeroU32 {
        NonZeroU32::MIN
    }

    fn empty_cart() -> Result<CartStore<MemoryStorage>, CartError> {
        CartStore::load(MemoryStorage::new(), PKR)
    }

    #[test]
    fn missing_entry_loads_as_empty_cart() -> TestResult {
        let cart = empty_cart()?;

        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);

        Ok(())
    }

    #[test]
    fn adding_same_product_and_options_twice_merges() -> TestResult {
        let mut cart = empty_cart()?;
        let first = cart.add_item(&karahi(), one(), SelectedOptions::default())?;
        let second = cart.add_item(&karahi(), one(), SelectedOptions::default())?;

        assert_eq!(first, second);
        assert_eq!(cart.len(), 1);
        assert_eq!(
            cart.line(&first).map(|item| item.quantity.get()),
            Some(2)
        );

        Ok(())
    }

    #[test]
    fn different_options_make_separate_lines() -> TestResult {
        let mut cart = empty_cart()?;
        cart.add_item(&karahi(), one(), SelectedOptions::sized("Half"))?;
        cart.add_item(&karahi(), one(), SelectedOptions::sized("Full"))?;

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.item_count(), 2);

        Ok(())
    }

    #[test]
    fn size_and_matching_customization_do_not_merge() -> TestResult {
        let mut cart = empty_cart()?;
        let sized = cart.add_item(&karahi(), one(), SelectedOptions::sized("Half"))?;
        let customized = cart.add_item(
            &karahi(),
            one(),
            SelectedOptions::default().customize("size", "Half"),
        )?;

        assert_ne!(sized, customized);
        assert_eq!(cart.len(), 2);
        assert_eq!(
            cart.line(&customized).map(|item| item.options.size.clone()),
            Some(None)
        );

        Ok(())
    }

    #[test]
    fn out_of_stock_products_are_rejected() -> TestResult {
        let mut cart = empty_cart()?;
        let product = karahi().with_availability(Availability::OutOfStock);
        let result = cart.add_item(&product, one(), SelectedOptions::default());

        assert!(matches!(result, Err(CartError::Unavailable(_))));
        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn products_in_another_currency_are_rejected() -> TestResult {
        let mut cart = empty_cart()?;
        let product = Product::new("p-tea", "Tea", Money::from_minor(300, GBP));
        let result = cart.add_item(&product, one(), SelectedOptions::default());

        assert!(matches!(
            result,
            Err(CartError::CurrencyMismatch {
                expected: "PKR",
                actual: "GBP"
            })
        ));

        Ok(())
    }

    #[test]
    fn decrementing_quantity_one_removes_line() -> TestResult {
        let mut cart = empty_cart()?;
        let line = cart.add_item(&karahi(), one(), SelectedOptions::default())?;

        assert_eq!(
            cart.update_quantity(&line, QuantityChange::Increment)?
                .map(NonZeroU32::get),
            Some(2)
        );
        assert_eq!(
            cart.update_quantity(&line, QuantityChange::Decrement)?
                .map(NonZeroU32::get),
            Some(1)
        );
        assert_eq!(cart.update_quantity(&line, QuantityChange::Decrement)?, None);
        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn updating_unknown_line_is_an_error() -> TestResult {
        let mut cart = empty_cart()?;
        let result = cart.update_quantity(&LineId::from("missing"), QuantityChange::Increment);

        assert!(matches!(result, Err(CartError::LineNotFound(_))));

        Ok(())
    }

    #[test]
    fn remove_item_is_idempotent() -> TestResult {
        let mut cart = empty_cart()?;
        let line = cart.add_item(&karahi(), one(), SelectedOptions::default())?;

        assert!(cart.remove_item(&line)?);
        assert!(!cart.remove_item(&line)?);
        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn persisted_cart_reloads_with_identical_lines() -> TestResult {
        let storage = MemoryStorage::new();
        let mut cart = CartStore::load(storage.clone(), PKR)?;

        cart.add_item(
            &karahi(),
            NonZeroU32::new(3).ok_or("zero")?,
            SelectedOptions::sized("Full").customize("spice", "mild"),
        )?;

        let reloaded = CartStore::load(storage, PKR)?;

        assert_eq!(reloaded.items(), cart.items());

        Ok(())
    }

    #[test]
    fn stored_lines_in_another_currency_fail_to_load() -> TestResult {
        let storage = MemoryStorage::new();
        CartStore::load(storage.clone(), PKR)?.add_item(
            &karahi(),
            one(),
            SelectedOptions::default(),
        )?;

        let result = CartStore::load(storage, GBP);

        assert!(matches!(result, Err(CartError::CurrencyMismatch { .. })));

        Ok(())
    }

    #[test]
    fn storage_failure_leaves_cart_unchanged() -> TestResult {
        let storage = FlakyStorage::default();
        let mut cart = CartStore::load(storage.clone(), PKR)?;
        let line = cart.add_item(&karahi(), one(), SelectedOptions::default())?;

        *storage.failing.borrow_mut() = true;

        let result = cart.update_quantity(&line, QuantityChange::Increment);

        assert!(matches!(result, Err(CartError::Storage(_))));
        assert_eq!(cart.line(&line).map(|item| item.quantity.get()), Some(1));

        *storage.failing.borrow_mut() = false;

        let reloaded = CartStore::load(storage, PKR)?;

        assert_eq!(reloaded.items(), cart.items());

        Ok(())
    }

    #[test]
    fn subscribers_see_committed_mutations() -> TestResult {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut cart = empty_cart()?;

        let key = {
            let events = Rc::clone(&events);
            cart.subscribe(move |event, items| {
                events.borrow_mut().push((event.clone(), items.len()));
            })
        };

        let line = cart.add_item(&karahi(), one(), SelectedOptions::default())?;
        cart.add_item(&karahi(), one(), SelectedOptions::default())?;
        cart.clear()?;

        assert!(cart.unsubscribe(key));

        cart.add_item(&karahi(), one(), SelectedOptions::default())?;

        assert_eq!(
            *events.borrow(),
            vec![
                (
                    CartEvent::Added {
                        line: line.clone(),
                        quantity: one()
                    },
                    1
                ),
                (
                    CartEvent::QuantityChanged {
                        line,
                        quantity: NonZeroU32::new(2).ok_or("zero")?
                    },
                    1
                ),
                (CartEvent::Cleared, 0),
            ]
        );

        Ok(())
    }
}
