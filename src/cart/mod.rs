//! Cart ledger
//!
//! The cart is an ordered list of line items, merged by product and weight,
//! mirrored to a [`KeyValueStore`] after every change.

use std::sync::{Arc, atomic::AtomicBool};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    products::{Catalog, ProductId},
    storage::{KeyValueStore, StorageError},
};

mod checkout;
mod line_item;
mod totals;

pub use checkout::{
    CheckoutError, DEFAULT_CHECKOUT_DELAY, OrderConfirmation, OrderNumber, PendingCheckout,
};
pub use line_item::CartLineItem;
pub use totals::{CartTotals, DEFAULT_SHIPPING_COST};

/// Storage key holding the serialised cart.
pub const CART_STORAGE_KEY: &str = "kopiprima_cart";

/// Weight added when the shopper has not picked one.
pub const DEFAULT_WEIGHT_GRAMS: u32 = 1000;

/// Cart errors
#[derive(Debug, Error)]
pub enum CartError {
    /// The product is not in the loaded catalog.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// The line index does not address a cart line.
    #[error("cart line {index} out of range for cart of {len} lines")]
    IndexOutOfRange {
        /// Requested index
        index: usize,

        /// Number of lines in the cart
        len: usize,
    },

    /// The cart changed in memory but could not be saved.
    #[error("failed to persist cart")]
    Storage(#[from] StorageError),
}

/// Cart ledger
#[derive(Debug)]
pub struct CartLedger<S> {
    store: S,
    lines: Vec<CartLineItem>,
    shipping_cost: u64,
    checkout_pending: Arc<AtomicBool>,
}

impl<S: KeyValueStore> CartLedger<S> {
    /// Create a ledger backed by `store`, restoring any saved cart.
    ///
    /// A missing, unreadable or malformed saved cart yields an empty cart.
    pub fn new(store: S, shipping_cost: u64) -> Self {
        let lines = hydrate(&store);

        Self {
            store,
            lines,
            shipping_cost,
            checkout_pending: Arc::default(),
        }
    }

    /// Cart lines in insertion order.
    pub fn lines(&self) -> &[CartLineItem] {
        &self.lines
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Flat shipping charge.
    pub fn shipping_cost(&self) -> u64 {
        self.shipping_cost
    }

    /// Current totals.
    pub fn totals(&self) -> CartTotals {
        CartTotals::from_lines(&self.lines, self.shipping_cost)
    }

    /// Total units across all lines, as shown on the cart badge.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Add one unit of `product_id` at `weight_grams`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ProductNotFound`] without changing the cart if the
    /// product is not in `catalog`, or [`CartError::Storage`] if the updated
    /// cart could not be saved.
    pub fn add_to_cart(
        &mut self,
        catalog: &Catalog,
        product_id: ProductId,
        weight_grams: u32,
    ) -> Result<CartLineItem, CartError> {
        self.add_quantity(catalog, product_id, weight_grams, 1)
    }

    /// Add `quantity` units at once; zero is treated as one.
    ///
    /// # Errors
    ///
    /// As [`CartLedger::add_to_cart`].
    pub fn add_quantity(
        &mut self,
        catalog: &Catalog,
        product_id: ProductId,
        weight_grams: u32,
        quantity: u32,
    ) -> Result<CartLineItem, CartError> {
        let product = catalog
            .get(product_id)
            .ok_or(CartError::ProductNotFound(product_id))?;

        let quantity = quantity.max(1);
        let key = (product_id, weight_grams);

        let line = if let Some(line) = self.lines.iter_mut().find(|line| line.key() == key) {
            line.quantity = line.quantity.saturating_add(quantity);
            line.clone()
        } else {
            let line = CartLineItem {
                product_id,
                name: product.name.clone(),
                unit_price: product.price_for_weight(weight_grams),
                weight_grams,
                quantity,
                image: product.image.clone(),
                bean_type: product.bean_type,
            };
            self.lines.push(line.clone());
            line
        };

        debug!(
            product = %product_id,
            weight = weight_grams,
            quantity = line.quantity,
            unit_price = line.unit_price,
            "added to cart"
        );

        self.persist()?;

        Ok(line)
    }

    /// Set the quantity of the line at `index`; zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::IndexOutOfRange`] if there is no such line, or
    /// [`CartError::Storage`] if the updated cart could not be saved.
    pub fn update_quantity(&mut self, index: usize, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            self.remove_line(index)?;

            return Ok(());
        }

        let len = self.lines.len();
        let line = self
            .lines
            .get_mut(index)
            .ok_or(CartError::IndexOutOfRange { index, len })?;

        line.quantity = quantity;

        self.persist()
    }

    /// Remove and return the line at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::IndexOutOfRange`] if there is no such line, or
    /// [`CartError::Storage`] if the updated cart could not be saved.
    pub fn remove_line(&mut self, index: usize) -> Result<CartLineItem, CartError> {
        if index >= self.lines.len() {
            return Err(CartError::IndexOutOfRange {
                index,
                len: self.lines.len(),
            });
        }

        let line = self.lines.remove(index);

        self.persist()?;

        Ok(line)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the empty cart could not be saved.
    pub fn clear(&mut self) -> Result<(), CartError> {
        self.lines.clear();

        self.persist()
    }

    fn persist(&self) -> Result<(), CartError> {
        let document = serde_json::to_string(&self.lines).map_err(StorageError::from)?;

        self.store.set(CART_STORAGE_KEY, &document)?;

        debug!(lines = self.lines.len(), "cart saved");

        Ok(())
    }
}

fn hydrate<S: KeyValueStore>(store: &S) -> Vec<CartLineItem> {
    let document = match store.get(CART_STORAGE_KEY) {
        Ok(Some(document)) => document,
        Ok(None) => return Vec::new(),
        Err(error) => {
            warn!(%error, "saved cart unreadable, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<CartLineItem>>(&document) {
        Ok(mut lines) => {
            lines.retain(|line| line.quantity > 0);

            info!(lines = lines.len(), "cart restored");

            lines
        }
        Err(error) => {
            warn!(%error, "saved cart malformed, starting empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use serde_json::json;
    use testresult::TestResult;

    use crate::{
        products::{ProductMap, RawProduct, RawWeightOption},
        storage::{MemoryStore, MockKeyValueStore},
    };

    use super::*;

    fn catalog() -> Catalog {
        let mut map = ProductMap::new();

        map.insert(
            "1".to_string(),
            RawProduct {
                name: Some("Gayo Wine".to_string()),
                price: Some(Decimal::from(50_000)),
                weight_options: Some(vec![
                    RawWeightOption {
                        value: 250,
                        label: None,
                        price_multiplier: Some(Decimal::ONE),
                    },
                    RawWeightOption {
                        value: 500,
                        label: None,
                        price_multiplier: Some(Decimal::new(185, 2)),
                    },
                ]),
                ..RawProduct::default()
            },
        );

        map.insert(
            "2".to_string(),
            RawProduct {
                name: Some("Toraja Sapan".to_string()),
                price: Some(Decimal::from(33_333)),
                ..RawProduct::default()
            },
        );

        Catalog::from_raw(map)
    }

    fn ledger() -> CartLedger<MemoryStore> {
        CartLedger::new(MemoryStore::new(), DEFAULT_SHIPPING_COST)
    }

    #[test]
    fn repeated_add_merges_into_one_line() -> TestResult {
        let catalog = catalog();
        let mut cart = ledger();

        cart.add_to_cart(&catalog, ProductId::new(1), 250)?;
        let line = cart.add_to_cart(&catalog, ProductId::new(1), 250)?;

        assert_eq!(cart.len(), 1);
        assert_eq!(line.quantity, 2);

        let totals = cart.totals();
        assert_eq!(totals.subtotal, 100_000);
        assert_eq!(totals.total, 115_000);

        Ok(())
    }

    #[test]
    fn different_weights_are_separate_lines() -> TestResult {
        let catalog = catalog();
        let mut cart = ledger();

        cart.add_to_cart(&catalog, ProductId::new(1), 250)?;
        let line = cart.add_to_cart(&catalog, ProductId::new(1), 500)?;

        assert_eq!(cart.len(), 2);
        assert_eq!(line.unit_price, 92_500);

        Ok(())
    }

    #[test]
    fn unknown_weight_uses_base_price() -> TestResult {
        let catalog = catalog();
        let mut cart = ledger();

        let line = cart.add_to_cart(&catalog, ProductId::new(2), 1000)?;

        assert_eq!(line.unit_price, 33_333);

        Ok(())
    }

    #[test]
    fn unknown_product_leaves_cart_untouched() {
        let catalog = catalog();
        let mut cart = ledger();

        let result = cart.add_to_cart(&catalog, ProductId::new(99), 250);

        assert!(matches!(result, Err(CartError::ProductNotFound(id)) if id == ProductId::new(99)));
        assert!(cart.is_empty());
    }

    #[test]
    fn add_quantity_treats_zero_as_one() -> TestResult {
        let catalog = catalog();
        let mut cart = ledger();

        let line = cart.add_quantity(&catalog, ProductId::new(1), 250, 0)?;
        assert_eq!(line.quantity, 1);

        let line = cart.add_quantity(&catalog, ProductId::new(1), 250, 3)?;
        assert_eq!(line.quantity, 4);
        assert_eq!(cart.item_count(), 4);

        Ok(())
    }

    #[test]
    fn update_to_zero_removes_exactly_one_line() -> TestResult {
        let catalog = catalog();
        let mut cart = ledger();

        cart.add_to_cart(&catalog, ProductId::new(1), 250)?;
        cart.add_to_cart(&catalog, ProductId::new(2), 250)?;

        cart.update_quantity(0, 0)?;

        assert_eq!(cart.len(), 1);
        assert_eq!(
            cart.lines().first().map(|line| line.product_id),
            Some(ProductId::new(2))
        );

        Ok(())
    }

    #[test]
    fn update_sets_quantity() -> TestResult {
        let catalog = catalog();
        let mut cart = ledger();

        cart.add_to_cart(&catalog, ProductId::new(1), 250)?;
        cart.update_quantity(0, 5)?;

        assert_eq!(cart.lines().first().map(|line| line.quantity), Some(5));
        assert_eq!(cart.totals().subtotal, 250_000);

        Ok(())
    }

    #[test]
    fn out_of_range_index_is_reported() {
        let mut cart = ledger();

        assert!(matches!(
            cart.update_quantity(3, 1),
            Err(CartError::IndexOutOfRange { index: 3, len: 0 })
        ));
        assert!(matches!(
            cart.remove_line(0),
            Err(CartError::IndexOutOfRange { index: 0, len: 0 })
        ));
    }

    #[test]
    fn cart_survives_a_new_ledger() -> TestResult {
        let catalog = catalog();
        let store = Arc::new(MemoryStore::new());

        let mut cart = CartLedger::new(store.clone(), DEFAULT_SHIPPING_COST);
        cart.add_quantity(&catalog, ProductId::new(1), 500, 2)?;

        let restored = CartLedger::new(store, DEFAULT_SHIPPING_COST);

        assert_eq!(restored.lines(), cart.lines());

        Ok(())
    }

    #[test]
    fn stored_cart_uses_wire_field_names() -> TestResult {
        let catalog = catalog();
        let store = Arc::new(MemoryStore::new());

        let mut cart = CartLedger::new(store.clone(), DEFAULT_SHIPPING_COST);
        cart.add_to_cart(&catalog, ProductId::new(2), 250)?;

        let document = store.get(CART_STORAGE_KEY)?.unwrap_or_default();
        let value: serde_json::Value = serde_json::from_str(&document)?;

        let stored = value.get(0).ok_or("expected one stored line")?;

        assert_eq!(stored.get("id"), Some(&json!(2)));
        assert_eq!(stored.get("price"), Some(&json!(33_333)));
        assert_eq!(stored.get("weight"), Some(&json!(250)));
        assert_eq!(stored.get("quantity"), Some(&json!(1)));
        assert_eq!(stored.get("type"), Some(&json!("roasted-bean")));

        Ok(())
    }

    #[test]
    fn malformed_saved_cart_starts_empty() {
        let store = MemoryStore::with_entries([(CART_STORAGE_KEY, "{not json")]);

        let cart = CartLedger::new(store, DEFAULT_SHIPPING_COST);

        assert!(cart.is_empty());
    }

    #[test]
    fn zero_quantity_lines_are_dropped_on_restore() {
        let store = MemoryStore::with_entries([(
            CART_STORAGE_KEY,
            r#"[{"id":1,"price":10,"weight":250,"quantity":0},{"id":2,"price":10,"weight":250,"quantity":1}]"#,
        )]);

        let cart = CartLedger::new(store, DEFAULT_SHIPPING_COST);

        assert_eq!(cart.len(), 1);
        assert_eq!(
            cart.lines().first().map(|line| line.product_id),
            Some(ProductId::new(2))
        );
    }

    #[test]
    fn failed_save_keeps_the_change_in_memory() {
        let catalog = catalog();

        let mut store = MockKeyValueStore::new();
        store.expect_get().returning(|_| Ok(None));
        store
            .expect_set()
            .returning(|_, _| Err(StorageError::Poisoned));

        let mut cart = CartLedger::new(store, DEFAULT_SHIPPING_COST);

        let result = cart.add_to_cart(&catalog, ProductId::new(1), 250);

        assert!(matches!(result, Err(CartError::Storage(_))));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn clear_empties_and_saves() -> TestResult {
        let catalog = catalog();
        let store = Arc::new(MemoryStore::new());

        let mut cart = CartLedger::new(store.clone(), DEFAULT_SHIPPING_COST);
        cart.add_to_cart(&catalog, ProductId::new(1), 250)?;
        cart.clear()?;

        assert!(cart.is_empty());
        assert_eq!(store.get(CART_STORAGE_KEY)?.as_deref(), Some("[]"));

        Ok(())
    }
}
