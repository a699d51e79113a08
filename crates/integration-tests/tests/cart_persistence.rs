//! Integration tests for cart persistence across simulated restarts, using
//! the same file-backed storage the binary runs with.

use std::sync::Arc;

use rust_decimal_macros::dec;
use serde_json::Value;

use vendora_core::{CurrencyCode, ProductId, ShopId};
use vendora_storefront::api::types::Product;
use vendora_storefront::store::{CartStore, FileStorage, StateStorage};

fn product(id: &str, price: rust_decimal::Decimal, stock: u32) -> Product {
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
fn test_cart_survives_restart_with_clamped_quantities() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(FileStorage::new(dir.path()));

    let cart = CartStore::new(Arc::clone(&storage) as Arc<dyn StateStorage>);
    cart.hydrate();

    // Stock of 5 clamps a request for 10.
    cart.add_item(product("p_1", dec!(120), 5), 10);
    cart.add_item(product("p_2", dec!(9.50), 100), 2);
    cart.open_cart();

    assert_eq!(cart.total_items(), 7);
    assert_eq!(cart.total_price(), dec!(619.00));

    // Simulated restart: a fresh store over the same directory.
    let reloaded = CartStore::new(Arc::clone(&storage) as Arc<dyn StateStorage>);
    reloaded.hydrate();

    assert_eq!(reloaded.total_items(), 7);
    assert_eq!(reloaded.total_price(), dec!(619.00));
    let items = reloaded.items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].quantity, 5);

    // The drawer flag is UI state and never persists.
    assert!(!reloaded.is_open());
}

#[test]
fn test_cart_snapshot_file_shape() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(FileStorage::new(dir.path()));

    let cart = CartStore::new(Arc::clone(&storage) as Arc<dyn StateStorage>);
    cart.hydrate();
    cart.add_item(product("p_1", dec!(10), 5), 1);

    // One JSON file per key, wrapped in the version envelope.
    let path = dir.path().join("vendora.cart.json");
    let raw: Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();

    assert_eq!(raw["version"], 1);
    assert_eq!(raw["state"]["items"][0]["quantity"], 1);
    assert_eq!(raw["state"]["items"][0]["product"]["id"], "p_1");
    // is_open is absent from the persisted snapshot.
    assert!(raw["state"].get("isOpen").is_none());
}

#[test]
fn test_clearing_cart_persists_the_empty_state() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(FileStorage::new(dir.path()));

    let cart = CartStore::new(Arc::clone(&storage) as Arc<dyn StateStorage>);
    cart.hydrate();
    cart.add_item(product("p_1", dec!(10), 5), 3);
    cart.clear();

    let reloaded = CartStore::new(storage as Arc<dyn StateStorage>);
    reloaded.hydrate();
    assert!(reloaded.items().is_empty());
}

#[test]
fn test_stale_snapshot_version_discarded_on_hydrate() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("vendora.cart.json"),
        r#"{"state":{"items":[{"bogus":true}]},"version":99}"#,
    )
    .unwrap();

    let storage = Arc::new(FileStorage::new(dir.path()));
    let cart = CartStore::new(storage as Arc<dyn StateStorage>);
    cart.hydrate();

    assert!(cart.items().is_empty());
}
