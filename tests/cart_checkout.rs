//! Cart and checkout against the ten-product fixture.
//!
//! Product 6 costs Rp 50.000 per kilogram; product 1 costs Rp 85.000 with a
//! 0.3 multiplier at 250g.

use std::{path::PathBuf, sync::Arc};

use tempfile::TempDir;
use testresult::TestResult;

use kopi_prima::{
    auth::{AuthService, MockAuthService, StoredSession},
    cart::{CART_STORAGE_KEY, CartError, CheckoutError},
    products::ProductId,
    settings::StorefrontSettings,
    sources::FixtureProductSource,
    storage::{FileStore, KeyValueStore, MemoryStore},
    storefront::{Storefront, StorefrontError},
};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/products.yaml")
}

fn settings() -> StorefrontSettings {
    StorefrontSettings {
        checkout_delay: std::time::Duration::ZERO,
        ..StorefrontSettings::default()
    }
}

async fn storefront<S: KeyValueStore>(store: S) -> Storefront<S> {
    let mut storefront = Storefront::new(store, settings());

    storefront
        .load(&FixtureProductSource::new(fixture_path()))
        .await;

    storefront
}

fn auth(signed_in: bool) -> MockAuthService {
    let mut auth = MockAuthService::new();
    auth.expect_is_authenticated().return_const(signed_in);
    auth
}

#[tokio::test]
async fn empty_cart_totals() {
    let storefront = storefront(MemoryStore::new()).await;
    let totals = storefront.cart().totals();

    assert_eq!(totals.subtotal, 0);
    assert_eq!(totals.total, 15_000);
    assert_eq!(totals.total, totals.shipping);
}

#[tokio::test]
async fn two_adds_of_the_same_weight_merge() -> TestResult {
    let mut storefront = storefront(MemoryStore::new()).await;

    storefront.add_to_cart(ProductId::new(6), 1000)?;
    storefront.add_to_cart(ProductId::new(6), 1000)?;

    let cart = storefront.cart();
    let totals = cart.totals();

    assert_eq!(cart.len(), 1);
    assert_eq!(cart.item_count(), 2);
    assert_eq!(totals.subtotal, 100_000);
    assert_eq!(totals.total, 115_000);
    assert_eq!(totals.total, totals.subtotal + totals.shipping);

    Ok(())
}

#[tokio::test]
async fn weight_multiplier_sets_unit_price() -> TestResult {
    let mut storefront = storefront(MemoryStore::new()).await;

    let line = storefront.add_to_cart(ProductId::new(1), 250)?;

    assert_eq!(line.unit_price, 25_500);
    assert_eq!(line.weight_label(), "250g");

    Ok(())
}

#[tokio::test]
async fn unknown_product_is_not_added() {
    let mut storefront = storefront(MemoryStore::new()).await;

    let result = storefront.add_to_cart(ProductId::new(404), 1000);

    assert!(matches!(
        result,
        Err(StorefrontError::Cart(CartError::ProductNotFound(_)))
    ));
    assert!(storefront.cart().is_empty());
}

#[tokio::test]
async fn zero_quantity_removes_exactly_one_line() -> TestResult {
    let mut storefront = storefront(MemoryStore::new()).await;

    storefront.add_to_cart(ProductId::new(1), 250)?;
    storefront.add_to_cart(ProductId::new(1), 500)?;
    storefront.add_to_cart(ProductId::new(2), 1000)?;

    storefront.cart_mut().update_quantity(1, 0)?;

    let weights: Vec<u32> = storefront
        .cart()
        .lines()
        .iter()
        .map(|line| line.weight_grams)
        .collect();

    assert_eq!(weights, [250, 1000]);

    Ok(())
}

#[tokio::test]
async fn signed_out_checkout_keeps_the_cart() -> TestResult {
    let mut storefront = storefront(MemoryStore::new()).await;

    storefront.add_to_cart(ProductId::new(6), 1000)?;

    let error = storefront
        .checkout(&auth(false))
        .await
        .err()
        .ok_or("expected checkout to be refused")?;

    assert!(matches!(
        error,
        StorefrontError::Checkout(CheckoutError::NotAuthenticated)
    ));
    assert_eq!(storefront.cart().len(), 1);

    Ok(())
}

#[tokio::test]
async fn signed_in_checkout_clears_the_cart() -> TestResult {
    let mut storefront = storefront(MemoryStore::new()).await;

    storefront.add_to_cart_quantity(ProductId::new(6), 1000, 2)?;

    let confirmation = storefront.checkout(&auth(true)).await?;

    assert_eq!(confirmation.total, 115_000);
    assert_eq!(confirmation.item_count, 2);
    assert!(confirmation.order_number.to_string().starts_with("ORD-"));
    assert_eq!(confirmation.order_number.to_string().len(), 12);
    assert!(storefront.cart().is_empty());

    Ok(())
}

#[tokio::test]
async fn empty_cart_checkout_is_refused() {
    let mut storefront = storefront(MemoryStore::new()).await;

    let result = storefront.checkout(&auth(true)).await;

    assert!(matches!(
        result,
        Err(StorefrontError::Checkout(CheckoutError::EmptyCart))
    ));
}

#[tokio::test]
async fn cart_and_session_survive_restart() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("state.json");

    {
        let store = Arc::new(FileStore::open(&path)?);
        let mut storefront = storefront(Arc::clone(&store)).await;

        storefront.add_to_cart_quantity(ProductId::new(3), 500, 3)?;
        StoredSession::new(store).login()?;
    }

    let store = Arc::new(FileStore::open(&path)?);
    let session = StoredSession::new(Arc::clone(&store));
    let mut storefront = storefront(Arc::clone(&store)).await;

    assert!(session.is_authenticated());
    assert_eq!(storefront.cart().item_count(), 3);

    storefront.checkout(&session).await?;

    let reopened = FileStore::open(&path)?;
    assert_eq!(reopened.get(CART_STORAGE_KEY)?.as_deref(), Some("[]"));

    Ok(())
}
