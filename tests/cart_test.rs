//! Cart aggregate behavior, with the inventory actor replaced by the
//! expectation-based mock so cart logic is exercised in isolation.

use std::sync::Arc;

use stockroom::cart::{CartError, CartService};
use stockroom::engine::mock::{receipt, settlement, MockInventory};
use stockroom::engine::InventoryError;
use stockroom::model::Product;
use stockroom::store::{CatalogStore, InMemoryCatalog};

async fn catalog_with_wine() -> (Arc<InMemoryCatalog>, String) {
    let catalog = Arc::new(InMemoryCatalog::new());
    let mut wine = Product::new("", "Douro Reserva", 50.0, 10);
    wine.promotional_price = Some(45.0);
    let id = catalog.create(wine).await.id;
    (catalog, id)
}

#[tokio::test]
async fn emptied_carts_are_not_reused() {
    let mock = MockInventory::new();
    let (catalog, _) = catalog_with_wine().await;
    let carts = CartService::new(mock.client(), catalog);

    let first = carts.get_or_create_cart("alice").await;
    // Still empty, so the next call issues a fresh cart.
    let second = carts.get_or_create_cart("alice").await;
    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn active_cart_is_reused() {
    let mut mock = MockInventory::new();
    mock.expect_check_availability().return_ok(true);

    let (catalog, wine) = catalog_with_wine().await;
    let carts = CartService::new(mock.client(), catalog);

    let cart = carts.get_or_create_cart("alice").await;
    carts.add_item(&cart.id, &wine, 2).await.unwrap();

    let again = carts.get_or_create_cart("alice").await;
    assert_eq!(again.id, cart.id);
    mock.verify();
}

#[tokio::test]
async fn add_item_snapshots_sale_price() {
    let mut mock = MockInventory::new();
    mock.expect_check_availability().return_ok(true);

    let (catalog, wine) = catalog_with_wine().await;
    let carts = CartService::new(mock.client(), catalog.clone());

    let cart = carts.get_or_create_cart("alice").await;
    let cart = carts.add_item(&cart.id, &wine, 2).await.unwrap();

    // The line captured the promotional price at add time.
    assert_eq!(cart.items[0].unit_price, 45.0);
    assert_eq!(cart.total_amount(), 90.0);

    // A later catalog price change does not disturb the cart total.
    let mut updated = catalog.get(&wine).await.unwrap();
    updated.price = 80.0;
    updated.promotional_price = None;
    catalog.update(updated).await.unwrap();
    let cart = carts.get_cart(&cart.id).await.unwrap();
    assert_eq!(cart.total_amount(), 90.0);
    mock.verify();
}

#[tokio::test]
async fn adding_same_product_accumulates_one_line() {
    let mut mock = MockInventory::new();
    mock.expect_check_availability().return_ok(true);
    mock.expect_check_availability().return_ok(true);

    let (catalog, wine) = catalog_with_wine().await;
    let carts = CartService::new(mock.client(), catalog);

    let cart = carts.get_or_create_cart("alice").await;
    carts.add_item(&cart.id, &wine, 2).await.unwrap();
    let cart = carts.add_item(&cart.id, &wine, 3).await.unwrap();

    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 5);
    assert_eq!(cart.total_items(), 5);
    mock.verify();
}

#[tokio::test]
async fn unavailable_product_fails_without_cart_mutation() {
    let mut mock = MockInventory::new();
    mock.expect_check_availability().return_ok(false);

    let (catalog, wine) = catalog_with_wine().await;
    let carts = CartService::new(mock.client(), catalog);

    let cart = carts.get_or_create_cart("alice").await;
    let err = carts.add_item(&cart.id, &wine, 99).await.unwrap_err();
    assert!(matches!(err, CartError::ProductUnavailable { requested: 99, .. }));
    assert!(carts.get_cart(&cart.id).await.unwrap().is_empty());
    mock.verify();
}

#[tokio::test]
async fn failed_reservation_leaves_cart_unmodified() {
    let mut mock = MockInventory::new();
    mock.expect_check_availability().return_ok(true);
    mock.expect_reserve().return_err(InventoryError::InsufficientStock {
        requested: 4,
        available: 1,
    });

    let (catalog, wine) = catalog_with_wine().await;
    let carts = CartService::new(mock.client(), catalog);

    let cart = carts.get_or_create_cart("alice").await;
    let err = carts
        .add_item_with_reservation(&cart.id, &wine, 4, "alice")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CartError::ReservationFailed(InventoryError::InsufficientStock { .. })
    ));
    assert!(carts.get_cart(&cart.id).await.unwrap().is_empty());
    mock.verify();
}

#[tokio::test]
async fn reservation_add_updates_owner() {
    let mut mock = MockInventory::new();
    mock.expect_check_availability().return_ok(true);
    mock.expect_reserve().return_ok(receipt("product_1", 10));

    let (catalog, wine) = catalog_with_wine().await;
    let carts = CartService::new(mock.client(), catalog);

    let cart = carts.get_or_create_cart("guest-session").await;
    let cart = carts
        .add_item_with_reservation(&cart.id, &wine, 2, "alice")
        .await
        .unwrap();
    assert_eq!(cart.user_id, "alice");
    assert_eq!(cart.total_items(), 2);
    mock.verify();
}

#[tokio::test]
async fn quantity_increase_reserves_only_the_difference() {
    let mut mock = MockInventory::new();
    mock.expect_check_availability().return_ok(true);
    mock.expect_reserve().return_ok(receipt("product_1", 10));
    // update to 5: availability checked for the new total, reserve for +3.
    mock.expect_check_availability().return_ok(true);
    mock.expect_reserve().return_ok(receipt("product_1", 10));

    let (catalog, wine) = catalog_with_wine().await;
    let carts = CartService::new(mock.client(), catalog);

    let cart = carts.get_or_create_cart("alice").await;
    carts
        .add_item_with_reservation(&cart.id, &wine, 2, "alice")
        .await
        .unwrap();
    let cart = carts.update_item_quantity(&cart.id, &wine, 5).await.unwrap();
    assert_eq!(cart.items[0].quantity, 5);
    mock.verify();
}

#[tokio::test]
async fn quantity_decrease_releases_the_difference() {
    let mut mock = MockInventory::new();
    mock.expect_check_availability().return_ok(true);
    mock.expect_reserve().return_ok(receipt("product_1", 10));
    mock.expect_check_availability().return_ok(true);
    mock.expect_release().return_ok(receipt("product_1", 10));

    let (catalog, wine) = catalog_with_wine().await;
    let carts = CartService::new(mock.client(), catalog);

    let cart = carts.get_or_create_cart("alice").await;
    carts
        .add_item_with_reservation(&cart.id, &wine, 5, "alice")
        .await
        .unwrap();
    let cart = carts.update_item_quantity(&cart.id, &wine, 2).await.unwrap();
    assert_eq!(cart.items[0].quantity, 2);
    mock.verify();
}

#[tokio::test]
async fn zero_quantity_update_removes_and_releases() {
    let mut mock = MockInventory::new();
    mock.expect_check_availability().return_ok(true);
    mock.expect_reserve().return_ok(receipt("product_1", 10));
    mock.expect_release().return_ok(receipt("product_1", 10));

    let (catalog, wine) = catalog_with_wine().await;
    let carts = CartService::new(mock.client(), catalog);

    let cart = carts.get_or_create_cart("alice").await;
    carts
        .add_item_with_reservation(&cart.id, &wine, 3, "alice")
        .await
        .unwrap();
    let cart = carts.update_item_quantity(&cart.id, &wine, 0).await.unwrap();
    assert!(cart.is_empty());
    mock.verify();
}

#[tokio::test]
async fn updating_a_missing_line_is_an_error() {
    let mock = MockInventory::new();
    let (catalog, wine) = catalog_with_wine().await;
    let carts = CartService::new(mock.client(), catalog);

    let cart = carts.get_or_create_cart("alice").await;
    let err = carts.update_item_quantity(&cart.id, &wine, 3).await.unwrap_err();
    assert_eq!(err, CartError::ItemNotFound(wine.clone()));
}

#[tokio::test]
async fn finalize_empty_cart_fails_without_settlement() {
    let mock = MockInventory::new();
    let (catalog, _) = catalog_with_wine().await;
    let carts = CartService::new(mock.client(), catalog);

    let cart = carts.get_or_create_cart("alice").await;
    let err = carts.finalize(&cart.id).await.unwrap_err();
    assert_eq!(err, CartError::EmptyCart);
    // No CompleteOrder command was ever sent.
    mock.verify();
}

#[tokio::test]
async fn finalize_settles_and_clears_without_release() {
    let mut mock = MockInventory::new();
    mock.expect_check_availability().return_ok(true);
    mock.expect_reserve().return_ok(receipt("product_1", 10));
    mock.expect_complete_order().return_ok(settlement("cart_1", 2));

    let (catalog, wine) = catalog_with_wine().await;
    let carts = CartService::new(mock.client(), catalog);

    let cart = carts.get_or_create_cart("alice").await;
    carts
        .add_item_with_reservation(&cart.id, &wine, 2, "alice")
        .await
        .unwrap();
    let result = carts.finalize(&cart.id).await.unwrap();
    assert_eq!(result.units_settled, 2);
    assert!(carts.get_cart(&cart.id).await.unwrap().is_empty());
    // Exactly the three expected commands: no release on finalize.
    mock.verify();
}

#[tokio::test]
async fn abandon_releases_every_line() {
    let mut mock = MockInventory::new();
    mock.expect_check_availability().return_ok(true);
    mock.expect_reserve().return_ok(receipt("product_1", 10));
    mock.expect_release().return_ok(receipt("product_1", 10));

    let (catalog, wine) = catalog_with_wine().await;
    let carts = CartService::new(mock.client(), catalog);

    let cart = carts.get_or_create_cart("alice").await;
    carts
        .add_item_with_reservation(&cart.id, &wine, 2, "alice")
        .await
        .unwrap();
    carts.abandon(&cart.id).await.unwrap();
    assert!(carts.get_cart(&cart.id).await.unwrap().is_empty());
    mock.verify();
}

#[tokio::test]
async fn abandon_of_empty_cart_trivially_succeeds() {
    let mock = MockInventory::new();
    let (catalog, _) = catalog_with_wine().await;
    let carts = CartService::new(mock.client(), catalog);

    let cart = carts.get_or_create_cart("alice").await;
    carts.abandon(&cart.id).await.unwrap();
    mock.verify();
}

#[tokio::test]
async fn operations_on_unknown_cart_fail() {
    let mock = MockInventory::new();
    let (catalog, wine) = catalog_with_wine().await;
    let carts = CartService::new(mock.client(), catalog);

    let err = carts.add_item("cart_404", &wine, 1).await.unwrap_err();
    assert_eq!(err, CartError::CartNotFound("cart_404".into()));
    assert!(carts.get_cart("cart_404").await.is_none());
}
