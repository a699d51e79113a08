//! Shopping cart store.
//!
//! Holds one line per product, each line a snapshot of the product as it was
//! when added. Quantities are clamped to the snapshot's `stock_count` on
//! every mutation; totals are derived from the lines on demand and never
//! cached. Only the line items persist; the drawer-open flag is UI state and
//! always starts false.

use std::fmt;
use std::sync::{Arc, RwLock};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::persist::{StateStorage, load_state, save_state};
use crate::api::types::Product;
use vendora_core::{Price, ProductId};

#[cfg(test)]
use super::persist::MemoryStorage;

/// Durable storage key for the cart.
pub const CART_STORAGE_KEY: &str = "vendora.cart";

/// Snapshot format version.
const CART_VERSION: u32 = 1;

/// One line in the cart: a product snapshot plus a quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    /// Unit price from the stored snapshot.
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        Price::new(self.product.price, self.product.currency_code)
    }

    /// Price of this line: snapshot unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price().line_total(self.quantity).amount
    }
}

/// The persisted part of the cart.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartSnapshot {
    #[serde(default)]
    items: Vec<CartLine>,
}

#[derive(Default)]
struct CartState {
    items: Vec<CartLine>,
    is_open: bool,
    hydrated: bool,
}

/// Shopping cart store.
///
/// Cheaply cloneable; all clones share the same state and storage.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    storage: Arc<dyn StateStorage>,
    state: RwLock<CartState>,
}

impl CartStore {
    /// Create a store over the given storage. Starts empty and un-hydrated.
    #[must_use]
    pub fn new(storage: Arc<dyn StateStorage>) -> Self {
        Self {
            inner: Arc::new(CartStoreInner {
                storage,
                state: RwLock::new(CartState::default()),
            }),
        }
    }

    /// Convenience constructor over an in-memory fake, for tests.
    #[cfg(test)]
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Load the persisted line items, once. The drawer flag always starts
    /// closed regardless of what was persisted previously.
    pub fn hydrate(&self) -> bool {
        let mut state = self.write();
        if state.hydrated {
            return false;
        }

        match load_state::<CartSnapshot>(
            self.inner.storage.as_ref(),
            CART_STORAGE_KEY,
            CART_VERSION,
        ) {
            Ok(Some(snapshot)) => state.items = snapshot.items,
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "failed to load persisted cart, starting empty");
            }
        }

        state.hydrated = true;
        true
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add `quantity` units of a product.
    ///
    /// If a line for the product already exists its quantity grows and the
    /// stored snapshot stays as it was; otherwise a new line is appended.
    /// The resulting quantity is clamped to the stored snapshot's
    /// `stock_count`. A clamp down to zero (product out of stock) removes
    /// the line entirely.
    pub fn add_item(&self, product: Product, quantity: u32) {
        {
            let mut state = self.write();
            if let Some(line) = state.items.iter_mut().find(|l| l.product.id == product.id) {
                let requested = line.quantity.saturating_add(quantity);
                line.quantity = requested.min(line.product.stock_count);
            } else {
                let clamped = quantity.min(product.stock_count);
                state.items.push(CartLine {
                    product,
                    quantity: clamped,
                });
            }
            state.items.retain(|l| l.quantity > 0);
        }
        self.persist();
    }

    /// Remove the line for a product. Removing an absent product is a no-op.
    pub fn remove_item(&self, product_id: &ProductId) {
        {
            let mut state = self.write();
            state.items.retain(|l| &l.product.id != product_id);
        }
        self.persist();
    }

    /// Set the quantity for a product's line.
    ///
    /// A requested quantity of zero or less removes the line; anything else
    /// is clamped to the snapshot's `stock_count`. Updating an absent
    /// product is a no-op.
    pub fn update_quantity(&self, product_id: &ProductId, quantity: i64) {
        {
            let mut state = self.write();
            if quantity <= 0 {
                state.items.retain(|l| &l.product.id != product_id);
            } else if let Some(line) =
                state.items.iter_mut().find(|l| &l.product.id == product_id)
            {
                let requested = u32::try_from(quantity).unwrap_or(u32::MAX);
                line.quantity = requested.min(line.product.stock_count).max(1);
            }
        }
        self.persist();
    }

    /// Empty the cart.
    pub fn clear(&self) {
        {
            let mut state = self.write();
            state.items.clear();
        }
        self.persist();
    }

    // =========================================================================
    // Drawer flag (not persisted)
    // =========================================================================

    pub fn open_cart(&self) {
        self.write().is_open = true;
    }

    pub fn close_cart(&self) {
        self.write().is_open = false;
    }

    pub fn toggle_cart(&self) {
        let mut state = self.write();
        state.is_open = !state.is_open;
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.read().is_open
    }

    // =========================================================================
    // Derived views
    // =========================================================================

    /// A copy of the current line items.
    #[must_use]
    pub fn items(&self) -> Vec<CartLine> {
        self.read().items.clone()
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.read().items.iter().map(|l| l.quantity).sum()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.read().items.iter().map(CartLine::line_total).sum()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn read(&self) -> std::sync::RwLockReadGuard<'_, CartState> {
        self.inner
            .state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, CartState> {
        self.inner
            .state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn persist(&self) {
        let snapshot = CartSnapshot {
            items: self.read().items.clone(),
        };
        if let Err(e) = save_state(
            self.inner.storage.as_ref(),
            CART_STORAGE_KEY,
            CART_VERSION,
            &snapshot,
        ) {
            tracing::warn!(error = %e, "failed to persist cart");
        }
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read();
        f.debug_struct("CartStore")
            .field("lines", &state.items.len())
            .field("is_open", &state.is_open)
            .field("hydrated", &state.hydrated)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use vendora_core::{CurrencyCode, ShopId};

    fn product(id: &str, price: Decimal, stock: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            slug: format!("product-{id}"),
            description: String::new(),
            price,
            compare_price: None,
            currency_code: CurrencyCode::USD,
            stock_count: stock,
            images: Vec::new(),
            category_id: None,
            brand_id: None,
            shop_id: ShopId::new("s_1"),
            rating: None,
            review_count: 0,
        }
    }

    #[test]
    fn test_add_clamps_to_stock() {
        let cart = CartStore::in_memory();
        cart.hydrate();

        cart.add_item(product("p_1", dec!(120), 5), 10);

        let items = cart.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 5);
        assert_eq!(cart.total_items(), 5);
        assert_eq!(cart.total_price(), dec!(600));
    }

    #[test]
    fn test_add_merges_existing_line() {
        let cart = CartStore::in_memory();
        cart.hydrate();

        cart.add_item(product("p_1", dec!(10), 8), 3);
        cart.add_item(product("p_1", dec!(10), 8), 3);

        let items = cart.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 6);
    }

    #[test]
    fn test_merge_clamps_against_stored_snapshot() {
        let cart = CartStore::in_memory();
        cart.hydrate();

        cart.add_item(product("p_1", dec!(10), 4), 3);
        // Later add carries a different snapshot; the stored one wins.
        cart.add_item(product("p_1", dec!(10), 100), 5);

        assert_eq!(cart.items()[0].quantity, 4);
    }

    #[test]
    fn test_add_out_of_stock_leaves_cart_empty() {
        let cart = CartStore::in_memory();
        cart.hydrate();

        cart.add_item(product("p_1", dec!(10), 0), 2);
        assert!(cart.items().is_empty());
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_remove_item() {
        let cart = CartStore::in_memory();
        cart.hydrate();

        cart.add_item(product("p_1", dec!(10), 5), 1);
        cart.add_item(product("p_2", dec!(20), 5), 1);
        cart.remove_item(&ProductId::new("p_1"));

        let items = cart.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product.id.as_str(), "p_2");

        // Removing an absent product is a no-op.
        cart.remove_item(&ProductId::new("p_9"));
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let cart = CartStore::in_memory();
        cart.hydrate();

        cart.add_item(product("p_1", dec!(10), 5), 3);
        cart.update_quantity(&ProductId::new("p_1"), 0);
        assert!(cart.items().is_empty());
    }

    #[test]
    fn test_update_quantity_negative_removes() {
        let cart = CartStore::in_memory();
        cart.hydrate();

        cart.add_item(product("p_1", dec!(10), 5), 3);
        cart.update_quantity(&ProductId::new("p_1"), -2);
        assert!(cart.items().is_empty());
    }

    #[test]
    fn test_update_quantity_clamps_to_stock() {
        let cart = CartStore::in_memory();
        cart.hydrate();

        cart.add_item(product("p_1", dec!(10), 5), 1);
        cart.update_quantity(&ProductId::new("p_1"), 99);
        assert_eq!(cart.items()[0].quantity, 5);

        cart.update_quantity(&ProductId::new("p_1"), 2);
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_totals_are_derived() {
        let cart = CartStore::in_memory();
        cart.hydrate();

        cart.add_item(product("p_1", dec!(19.99), 10), 2);
        cart.add_item(product("p_2", dec!(5.50), 10), 3);

        assert_eq!(cart.total_items(), 5);
        assert_eq!(cart.total_price(), dec!(56.48));
        assert_eq!(cart.items()[0].unit_price().to_string(), "$19.99");

        cart.remove_item(&ProductId::new("p_2"));
        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.total_price(), dec!(39.98));
    }

    #[test]
    fn test_clear_empties_cart() {
        let cart = CartStore::in_memory();
        cart.hydrate();

        cart.add_item(product("p_1", dec!(10), 5), 2);
        cart.clear();
        assert!(cart.items().is_empty());
        assert_eq!(cart.total_price(), Decimal::ZERO);
    }

    #[test]
    fn test_drawer_flag() {
        let cart = CartStore::in_memory();
        assert!(!cart.is_open());

        cart.open_cart();
        assert!(cart.is_open());

        cart.toggle_cart();
        assert!(!cart.is_open());

        cart.toggle_cart();
        cart.close_cart();
        assert!(!cart.is_open());
    }

    #[test]
    fn test_items_persist_but_drawer_flag_does_not() {
        let storage = Arc::new(MemoryStorage::new());
        let cart = CartStore::new(Arc::clone(&storage) as Arc<dyn StateStorage>);
        cart.hydrate();

        cart.add_item(product("p_1", dec!(10), 5), 2);
        cart.open_cart();

        // Simulated reload: a fresh store over the same storage.
        let reloaded = CartStore::new(storage as Arc<dyn StateStorage>);
        reloaded.hydrate();
        assert_eq!(reloaded.total_items(), 2);
        assert!(!reloaded.is_open());
    }
}
