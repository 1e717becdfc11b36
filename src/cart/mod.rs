//! # Cart Aggregate
//!
//! In-memory carts keyed by cart id, mediating between a shopper's intent
//! and the stock ledger engine.
//!
//! # Architecture Note
//! The cart map lives behind a single `tokio::sync::Mutex` that is held
//! across the engine awaits. That serializes cart operations, which is what
//! keeps "check availability, reserve, then mutate the cart" atomic from the
//! shopper's point of view. The inventory actor never calls back into the
//! cart layer, so holding the lock across those awaits cannot deadlock.
//!
//! # Reservation lifecycle
//! Reservations taken on behalf of a cart are keyed by the *cart id*, which
//! doubles as the order id at finalize time. Every path that drops a line
//! (remove, clear, abandon, quantity decrease) releases its hold, so no
//! reservation is left dangling in the ledger.

pub mod error;

pub use error::CartError;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::clients::InventoryClient;
use crate::model::{Cart, CartItem, OrderSettlement, Product};
use crate::store::CatalogStore;

/// Session-scoped cart storage and the operations on it.
pub struct CartService {
    inventory: InventoryClient,
    catalog: Arc<dyn CatalogStore>,
    carts: Mutex<HashMap<String, Cart>>,
    next_id: AtomicU64,
}

impl CartService {
    pub fn new(inventory: InventoryClient, catalog: Arc<dyn CatalogStore>) -> Self {
        Self {
            inventory,
            catalog,
            carts: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Returns the user's cart if one with items exists, else creates a
    /// fresh one. An emptied cart is never reused: cart identity is tied to
    /// an active line-item set, not to the user alone.
    #[instrument(skip(self))]
    pub async fn get_or_create_cart(&self, user_id: &str) -> Cart {
        let mut carts = self.carts.lock().await;
        if let Some(cart) = carts
            .values()
            .find(|c| c.user_id == user_id && !c.is_empty())
        {
            debug!(cart_id = %cart.id, "Reusing active cart");
            return cart.clone();
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let cart = Cart::new(format!("cart_{id}"), user_id);
        info!(cart_id = %cart.id, "Created cart");
        carts.insert(cart.id.clone(), cart.clone());
        cart
    }

    pub async fn get_cart(&self, cart_id: &str) -> Option<Cart> {
        self.carts.lock().await.get(cart_id).cloned()
    }

    /// Checks availability and fetches the product, the shared entry path of
    /// the add operations. Does not touch any cart state.
    async fn available_product(
        &self,
        product_id: &str,
        quantity: u32,
    ) -> Result<Product, CartError> {
        let available = self.inventory.check_availability(product_id, quantity).await?;
        if !available {
            return Err(CartError::ProductUnavailable {
                product_id: product_id.to_string(),
                requested: quantity,
            });
        }
        self.catalog
            .get(product_id)
            .await
            .ok_or_else(|| CartError::ProductUnavailable {
                product_id: product_id.to_string(),
                requested: quantity,
            })
    }

    /// Merges `quantity` of the product into the cart: an existing line
    /// accumulates, otherwise a new line snapshots name and sale price.
    fn merge_line(cart: &mut Cart, product: &Product, quantity: u32) {
        if let Some(item) = cart.item_mut(&product.id) {
            item.quantity += quantity;
        } else {
            let item = CartItem {
                id: cart.next_item_id(),
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                unit_price: product.sale_price(),
                quantity,
                added_at: Utc::now(),
            };
            cart.items.push(item);
        }
        cart.updated_at = Utc::now();
    }

    /// Adds to the cart without reserving stock.
    #[instrument(skip(self))]
    pub async fn add_item(
        &self,
        cart_id: &str,
        product_id: &str,
        quantity: u32,
    ) -> Result<Cart, CartError> {
        let mut carts = self.carts.lock().await;
        let cart = carts
            .get_mut(cart_id)
            .ok_or_else(|| CartError::CartNotFound(cart_id.to_string()))?;

        let product = self.available_product(product_id, quantity).await?;
        Self::merge_line(cart, &product, quantity);
        Ok(cart.clone())
    }

    /// Adds to the cart and reserves the stock for it, keyed by the cart id.
    /// Any failure leaves the cart unmodified. On success the cart's owning
    /// user is overwritten with `user_id`.
    #[instrument(skip(self))]
    pub async fn add_item_with_reservation(
        &self,
        cart_id: &str,
        product_id: &str,
        quantity: u32,
        user_id: &str,
    ) -> Result<Cart, CartError> {
        let mut carts = self.carts.lock().await;
        let cart = carts
            .get_mut(cart_id)
            .ok_or_else(|| CartError::CartNotFound(cart_id.to_string()))?;

        let product = self.available_product(product_id, quantity).await?;
        self.inventory
            .reserve(product_id, quantity, &cart.id)
            .await
            .map_err(CartError::ReservationFailed)?;

        Self::merge_line(cart, &product, quantity);
        cart.user_id = user_id.to_string();
        Ok(cart.clone())
    }

    /// Sets a line's quantity. Zero delegates to removal. An increase
    /// reserves exactly the difference; a decrease releases it.
    #[instrument(skip(self))]
    pub async fn update_item_quantity(
        &self,
        cart_id: &str,
        product_id: &str,
        new_quantity: u32,
    ) -> Result<Cart, CartError> {
        if new_quantity == 0 {
            return self.remove_item(cart_id, product_id).await;
        }

        let mut carts = self.carts.lock().await;
        let cart = carts
            .get_mut(cart_id)
            .ok_or_else(|| CartError::CartNotFound(cart_id.to_string()))?;
        let current = cart
            .item(product_id)
            .map(|item| item.quantity)
            .ok_or_else(|| CartError::ItemNotFound(product_id.to_string()))?;

        // Availability is checked for the new total, not the delta.
        let available = self
            .inventory
            .check_availability(product_id, new_quantity)
            .await?;
        if !available {
            return Err(CartError::ProductUnavailable {
                product_id: product_id.to_string(),
                requested: new_quantity,
            });
        }

        if new_quantity > current {
            self.inventory
                .reserve(product_id, new_quantity - current, &cart.id)
                .await
                .map_err(CartError::ReservationFailed)?;
        } else if new_quantity < current {
            self.inventory
                .release(product_id, current - new_quantity, &cart.id)
                .await?;
        }

        if let Some(item) = cart.item_mut(product_id) {
            item.quantity = new_quantity;
        }
        cart.updated_at = Utc::now();
        Ok(cart.clone())
    }

    /// Deletes a line and releases its hold.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, cart_id: &str, product_id: &str) -> Result<Cart, CartError> {
        let mut carts = self.carts.lock().await;
        let cart = carts
            .get_mut(cart_id)
            .ok_or_else(|| CartError::CartNotFound(cart_id.to_string()))?;
        let quantity = cart
            .item(product_id)
            .map(|item| item.quantity)
            .ok_or_else(|| CartError::ItemNotFound(product_id.to_string()))?;

        self.inventory.release(product_id, quantity, &cart.id).await?;

        cart.items.retain(|item| item.product_id != product_id);
        cart.updated_at = Utc::now();
        Ok(cart.clone())
    }

    /// Empties the cart, releasing every line's hold.
    #[instrument(skip(self))]
    pub async fn clear(&self, cart_id: &str) -> Result<(), CartError> {
        let mut carts = self.carts.lock().await;
        let cart = carts
            .get_mut(cart_id)
            .ok_or_else(|| CartError::CartNotFound(cart_id.to_string()))?;

        for item in &cart.items {
            self.inventory
                .release(&item.product_id, item.quantity, &cart.id)
                .await?;
        }
        cart.items.clear();
        cart.updated_at = Utc::now();
        Ok(())
    }

    /// Completes the order keyed by the cart's own id, converting its holds
    /// into deductions, then empties the cart. Fails on an empty cart.
    #[instrument(skip(self))]
    pub async fn finalize(&self, cart_id: &str) -> Result<OrderSettlement, CartError> {
        let mut carts = self.carts.lock().await;
        let cart = carts
            .get_mut(cart_id)
            .ok_or_else(|| CartError::CartNotFound(cart_id.to_string()))?;
        if cart.is_empty() {
            return Err(CartError::EmptyCart);
        }

        let settlement = self.inventory.complete_order(&cart.id).await?;
        info!(cart_id = %cart.id, units = settlement.units_settled, "Cart finalized");

        // The holds were just settled; clear lines without releasing.
        cart.items.clear();
        cart.updated_at = Utc::now();
        Ok(settlement)
    }

    /// Walks away from the cart: releases every hold and empties it.
    /// Trivially succeeds on an empty cart.
    #[instrument(skip(self))]
    pub async fn abandon(&self, cart_id: &str) -> Result<(), CartError> {
        let mut carts = self.carts.lock().await;
        let cart = carts
            .get_mut(cart_id)
            .ok_or_else(|| CartError::CartNotFound(cart_id.to_string()))?;
        if cart.is_empty() {
            return Ok(());
        }

        for item in &cart.items {
            self.inventory
                .release(&item.product_id, item.quantity, &cart.id)
                .await?;
        }
        cart.items.clear();
        cart.updated_at = Utc::now();
        info!(cart_id = %cart.id, "Cart abandoned");
        Ok(())
    }
}
