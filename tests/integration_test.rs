//! Full end-to-end tests with all real components wired by `StockSystem`.

use stockroom::cart::CartError;
use stockroom::engine::InventoryError;
use stockroom::lifecycle::StockSystem;
use stockroom::model::{MovementKind, Product};

#[tokio::test]
async fn cart_checkout_converts_holds_into_deductions() {
    let system = StockSystem::new();

    let wine = system
        .catalog
        .create(Product::new("", "Barolo DOCG", 90.0, 24))
        .await;

    let cart = system.carts.get_or_create_cart("alice").await;
    system
        .carts
        .add_item_with_reservation(&cart.id, &wine.id, 3, "alice")
        .await
        .expect("reservation should succeed");

    // The hold is soft: on-hand is unchanged until finalize.
    assert_eq!(system.catalog.get(&wine.id).await.unwrap().stock_quantity, 24);

    let settlement = system.carts.finalize(&cart.id).await.expect("finalize");
    assert_eq!(settlement.units_settled, 3);
    assert_eq!(system.catalog.get(&wine.id).await.unwrap().stock_quantity, 21);

    // The ledger tells the whole story: one hold, one sale.
    let history = system.inventory.history(&wine.id).await.unwrap();
    let kinds: Vec<MovementKind> = history.iter().map(|m| m.kind).collect();
    assert_eq!(kinds, vec![MovementKind::Reserved, MovementKind::Sale]);

    system.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn abandoned_cart_leaves_stock_sellable() {
    let system = StockSystem::new();
    let wine = system
        .catalog
        .create(Product::new("", "Chianti Classico", 35.0, 6))
        .await;

    let cart = system.carts.get_or_create_cart("bob").await;
    system
        .carts
        .add_item_with_reservation(&cart.id, &wine.id, 6, "bob")
        .await
        .unwrap();
    system.carts.abandon(&cart.id).await.unwrap();

    // Finalizing later must find nothing to settle.
    let next_cart = system.carts.get_or_create_cart("bob").await;
    assert_ne!(next_cart.id, cart.id);
    let stale = system.inventory.complete_order(&cart.id).await.unwrap();
    assert_eq!(stale.units_settled, 0);
    assert_eq!(system.catalog.get(&wine.id).await.unwrap().stock_quantity, 6);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn direct_stock_operations_round_trip() {
    let system = StockSystem::new();
    let wine = system
        .catalog
        .create(Product::new("", "Alvarinho", 28.0, 0))
        .await;

    system
        .inventory
        .add(&wine.id, 12, "initial delivery", "admin")
        .await
        .unwrap();
    system
        .inventory
        .remove(&wine.id, 2, "tasting room", "admin")
        .await
        .unwrap();
    system
        .inventory
        .process_return(&wine.id, 1, "unopened return", "clerk")
        .await
        .unwrap();
    let receipt = system
        .inventory
        .adjust(&wine.id, 10, "annual stocktake", "admin")
        .await
        .unwrap();
    assert_eq!(receipt.on_hand, 10);
    assert!(receipt.message.contains("reduced"));

    let err = system
        .inventory
        .remove(&wine.id, 1000, "oversell", "admin")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        InventoryError::InsufficientStock {
            requested: 1000,
            available: 10
        }
    );

    let report = system.inventory.inventory_report().await.unwrap();
    assert_eq!(report.total_products, 1);
    assert_eq!(report.total_units, 10);
    assert_eq!(report.inventory_value, 280.0);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn status_report_reflects_one_snapshot() {
    let system = StockSystem::new();
    system.catalog.create(Product::new("", "Empty", 10.0, 0)).await;
    system.catalog.create(Product::new("", "Scarce", 10.0, 3)).await;
    system.catalog.create(Product::new("", "Plenty", 10.0, 99)).await;

    let report = system.inventory.status_report().await.unwrap();
    assert_eq!(report.out_of_stock.len(), 1);
    assert_eq!(report.low_stock.len(), 1);
    assert_eq!(report.healthy_stock.len(), 1);

    let low = system.inventory.low_stock_products().await.unwrap();
    assert_eq!(low.len(), 2);

    system.shutdown().await.unwrap();
}

/// Concurrent shoppers racing for limited stock: the single-writer actor
/// serializes reservations, so the ledger never holds more than the shelf.
#[tokio::test]
async fn concurrent_reservations_never_oversell() {
    let system = StockSystem::new();
    let wine = system
        .catalog
        .create(Product::new("", "Limited Release", 150.0, 20))
        .await;

    let mut handles = vec![];
    for i in 0..10 {
        let inventory = system.inventory.clone();
        let product_id = wine.id.clone();
        handles.push(tokio::spawn(async move {
            inventory
                .reserve(&product_id, 2, &format!("order-{i}"))
                .await
        }));
    }

    let mut successful = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successful += 1;
        }
    }
    // 20 on hand / 2 per order: every reservation fits.
    assert_eq!(successful, 10);

    // Settle them all; stock lands exactly at zero, never below.
    for i in 0..10 {
        system
            .inventory
            .complete_order(&format!("order-{i}"))
            .await
            .unwrap();
    }
    assert_eq!(system.catalog.get(&wine.id).await.unwrap().stock_quantity, 0);

    system.shutdown().await.unwrap();
}

/// A line built up from several reservations, then decreased, must settle
/// exactly the final quantity: the decrease releases one unit, not a whole
/// underlying hold.
#[tokio::test]
async fn decreased_cart_quantity_settles_exactly_at_finalize() {
    let system = StockSystem::new();
    let wine = system
        .catalog
        .create(Product::new("", "Gran Reserva", 60.0, 20))
        .await;

    let cart = system.carts.get_or_create_cart("dave").await;
    system
        .carts
        .add_item_with_reservation(&cart.id, &wine.id, 2, "dave")
        .await
        .unwrap();
    // 2 -> 5 reserves a second 3-unit hold; 5 -> 4 releases one unit.
    system.carts.update_item_quantity(&cart.id, &wine.id, 5).await.unwrap();
    system.carts.update_item_quantity(&cart.id, &wine.id, 4).await.unwrap();

    let settlement = system.carts.finalize(&cart.id).await.unwrap();
    assert_eq!(settlement.units_settled, 4);
    assert_eq!(system.catalog.get(&wine.id).await.unwrap().stock_quantity, 16);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn finalize_twice_does_not_double_deduct() {
    let system = StockSystem::new();
    let wine = system
        .catalog
        .create(Product::new("", "Amarone", 75.0, 10))
        .await;

    let cart = system.carts.get_or_create_cart("carol").await;
    system
        .carts
        .add_item_with_reservation(&cart.id, &wine.id, 4, "carol")
        .await
        .unwrap();
    system.carts.finalize(&cart.id).await.unwrap();
    assert_eq!(system.catalog.get(&wine.id).await.unwrap().stock_quantity, 6);

    // The cart is empty now, so finalize refuses; and even a direct
    // re-completion of the same order settles nothing.
    let err = system.carts.finalize(&cart.id).await.unwrap_err();
    assert_eq!(err, CartError::EmptyCart);
    let again = system.inventory.complete_order(&cart.id).await.unwrap();
    assert_eq!(again.units_settled, 0);
    assert_eq!(system.catalog.get(&wine.id).await.unwrap().stock_quantity, 6);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn clients_fail_cleanly_when_the_actor_is_gone() {
    use std::sync::Arc;
    use stockroom::store::{InMemoryCatalog, InMemoryLedger};

    let (actor, client) = stockroom::engine::new(
        Arc::new(InMemoryCatalog::new()),
        Arc::new(InMemoryLedger::new()),
    );
    // Never run the actor; its receiver drops with it.
    drop(actor);

    let err = client.check_availability("product_1", 1).await.unwrap_err();
    assert_eq!(err, InventoryError::ActorClosed);
}
