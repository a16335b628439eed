//! Client-side cart of listings pending checkout.
//!
//! The cart never leaves the client until checkout; the `bv` client persists
//! it as JSON between invocations. A listing can be in the cart at most once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::OrderLineRequest;
use crate::catalog::Listing;
use crate::types::{CartItemId, CurrencyCode, ListingId, Price, PriceError};

/// Errors from cart operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The listing is already in the cart.
    #[error("{url} is already in your cart")]
    AlreadyInCart { url: String },
}

const fn default_quantity() -> u32 {
    1
}

/// A listing held in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(flatten)]
    pub listing: Listing,
    pub cart_id: CartItemId,
    pub added_at: DateTime<Utc>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl CartItem {
    /// Price of the listing times the quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.listing.price.times(self.quantity)
    }
}

/// Ordered collection of cart items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Items in the order they were added.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the listing is already in the cart.
    #[must_use]
    pub fn contains(&self, listing_id: ListingId) -> bool {
        self.items.iter().any(|item| item.listing.id == listing_id)
    }

    /// Add a listing with quantity 1, returning the new item.
    ///
    /// # Errors
    ///
    /// Returns `CartError::AlreadyInCart` if the listing is already present.
    pub fn add(&mut self, listing: Listing) -> Result<CartItem, CartError> {
        self.add_at(listing, Utc::now())
    }

    /// Add a listing with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// Returns `CartError::AlreadyInCart` if the listing is already present.
    pub fn add_at(&mut self, listing: Listing, now: DateTime<Utc>) -> Result<CartItem, CartError> {
        if self.contains(listing.id) {
            return Err(CartError::AlreadyInCart { url: listing.url });
        }

        let item = CartItem {
            listing,
            cart_id: CartItemId::generate(),
            added_at: now,
            quantity: 1,
        };
        self.items.push(item.clone());
        Ok(item)
    }

    /// Remove an item by cart id. Unknown ids are ignored.
    pub fn remove(&mut self, cart_id: CartItemId) -> Option<CartItem> {
        let pos = self.items.iter().position(|item| item.cart_id == cart_id)?;
        Some(self.items.remove(pos))
    }

    /// Set the quantity of an item. A quantity below 1 removes the item.
    ///
    /// Returns the updated item, or `None` if it was removed or not found.
    pub fn update_quantity(&mut self, cart_id: CartItemId, quantity: u32) -> Option<&CartItem> {
        if quantity < 1 {
            self.remove(cart_id);
            return None;
        }

        let item = self.items.iter_mut().find(|item| item.cart_id == cart_id)?;
        item.quantity = quantity;
        Some(item)
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of the line totals.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::CurrencyMismatch` if items are priced in
    /// different currencies.
    pub fn total(&self) -> Result<Price, PriceError> {
        let currency = self
            .items
            .first()
            .map_or(CurrencyCode::default(), |item| item.listing.price.currency_code);
        Price::sum(currency, self.items.iter().map(CartItem::line_total))
    }

    /// Checkout request lines for the cart contents.
    #[must_use]
    pub fn order_lines(&self) -> Vec<OrderLineRequest> {
        self.items
            .iter()
            .map(|item| OrderLineRequest {
                website_id: item.listing.id,
                quantity: Some(item.quantity),
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::catalog::fixtures::{catalog, listing};

    #[test]
    fn test_add_rejects_duplicate_listing() {
        let mut cart = Cart::new();
        let first = listing(1, "example.com", 50, "English", "India", 36);
        cart.add(first.clone()).unwrap();

        let err = cart.add(first).unwrap_err();
        assert_eq!(err.to_string(), "example.com is already in your cart");
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_total_is_sum_of_item_prices() {
        let mut cart = Cart::new();
        for l in catalog() {
            cart.add(l).unwrap();
        }
        // 36 + 89 + 120 + 75
        assert_eq!(cart.total().unwrap(), Price::usd(Decimal::from(320)));
    }

    #[test]
    fn test_total_counts_quantity() {
        let mut cart = Cart::new();
        let id = cart
            .add(listing(2, "techblog.com", 65, "English", "USA", 89))
            .unwrap()
            .cart_id;
        cart.update_quantity(id, 3).unwrap();
        assert_eq!(cart.total().unwrap(), Price::usd(Decimal::from(267)));
    }

    #[test]
    fn test_empty_cart_total_is_zero() {
        assert_eq!(
            Cart::new().total().unwrap(),
            Price::zero(CurrencyCode::USD)
        );
    }

    #[test]
    fn test_quantity_below_one_removes() {
        let mut cart = Cart::new();
        let id = cart
            .add(listing(1, "example.com", 50, "English", "India", 36))
            .unwrap()
            .cart_id;

        assert!(cart.update_quantity(id, 0).is_none());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut cart = Cart::new();
        cart.add(listing(1, "example.com", 50, "English", "India", 36))
            .unwrap();
        assert!(cart.remove(CartItemId::generate()).is_none());
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_persisted_shape_round_trips() {
        let mut cart = Cart::new();
        cart.add(listing(1, "example.com", 50, "English", "India", 36))
            .unwrap();

        let json = serde_json::to_value(&cart).unwrap();
        let item = &json["items"][0];
        assert_eq!(item["url"], "example.com");
        assert_eq!(item["metrics"]["domainRating"], 50);
        assert_eq!(item["quantity"], 1);
        assert!(item["cartId"].is_string());

        let restored: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_order_lines_follow_cart_order() {
        let mut cart = Cart::new();
        for l in catalog() {
            cart.add(l).unwrap();
        }
        let lines = cart.order_lines();
        let ids: Vec<i32> = lines.iter().map(|l| l.website_id.into_inner()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert!(lines.iter().all(|l| l.quantity == Some(1)));
    }
}
