//! Local cart and checkout.
//!
//! The cart lives in the state file. Only `add` and `checkout` talk to the
//! server: `add` snapshots the listing, `checkout` places the order and
//! empties the cart once the server accepts it.

use backlink_vista_core::api::CreateOrderRequest;
use backlink_vista_core::{CartItemId, ListingId, PaymentMethod};

use crate::client::ApiClient;
use crate::commands::account::require_session;
use crate::error::CliError;
use crate::output;
use crate::state::ClientState;

pub fn list(state: &ClientState) {
    output::emit(&output::cart(&state.cart));
}

pub async fn add(
    client: &ApiClient,
    state: &mut ClientState,
    id: ListingId,
) -> Result<(), CliError> {
    require_session(client)?;

    let listing = client.website(id).await?;
    let item = state.cart.add(listing)?;
    tracing::debug!(cart_id = %item.cart_id, listing_id = %id, "Added to cart");
    output::emit(&format!(
        "Added {} ({}) as {}",
        item.listing.url, item.listing.price, item.cart_id
    ));
    Ok(())
}

/// Remove an item. Unknown ids leave the cart unchanged.
pub fn remove(state: &mut ClientState, cart_id: CartItemId) {
    match state.cart.remove(cart_id) {
        Some(item) => output::emit(&format!("Removed {}", item.listing.url)),
        None => output::emit("Nothing to remove"),
    }
}

/// Set an item's quantity; zero removes it.
pub fn quantity(
    state: &mut ClientState,
    cart_id: CartItemId,
    quantity: u32,
) -> Result<(), CliError> {
    if !state.cart.items().iter().any(|item| item.cart_id == cart_id) {
        return Err(CliError::UnknownCartItem(cart_id.to_string()));
    }

    match state.cart.update_quantity(cart_id, quantity) {
        Some(item) => output::emit(&format!("{} x{}", item.listing.url, item.quantity)),
        None => output::emit("Removed from cart"),
    }
    Ok(())
}

pub fn clear(state: &mut ClientState) {
    state.cart.clear();
    output::emit("Cart cleared");
}

/// Place an order for the whole cart.
pub async fn checkout(
    client: &ApiClient,
    state: &mut ClientState,
    payment_method: PaymentMethod,
) -> Result<(), CliError> {
    require_session(client)?;
    if state.cart.is_empty() {
        return Err(CliError::EmptyCart);
    }

    let request = CreateOrderRequest {
        items: state.cart.order_lines(),
        payment_method: Some(payment_method),
    };
    let order = client.create_order(&request).await?;
    state.cart.clear();

    tracing::info!(order_id = %order.id, total = %order.total, "Order placed");
    output::emit(&output::order(&order));
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use backlink_vista_core::{Listing, ListingMetrics, Price};

    use super::*;

    fn state_with_item() -> (ClientState, CartItemId) {
        let listing = Listing {
            id: ListingId::new(1),
            url: "example.com".to_string(),
            metrics: ListingMetrics {
                domain_rating: 45,
                referring_domains: "5.3K".to_string(),
                total_backlinks: "50K".to_string(),
                total_keywords: "7.5K".to_string(),
                spam_score: "4%".to_string(),
                language: "English".to_string(),
                link_validity: "12 months".to_string(),
                traffic_by_country: "USA".to_string(),
            },
            price: Price::usd(Decimal::from(36)),
            category: None,
        };
        let mut state = ClientState::default();
        let item = state.cart.add_at(listing, Utc::now()).unwrap();
        (state, item.cart_id)
    }

    #[test]
    fn test_quantity_zero_removes() {
        let (mut state, id) = state_with_item();
        quantity(&mut state, id, 0).unwrap();
        assert!(state.cart.is_empty());
    }

    #[test]
    fn test_quantity_unknown_item_is_an_error() {
        let (mut state, _) = state_with_item();
        let err = quantity(&mut state, CartItemId::generate(), 2).unwrap_err();
        assert!(matches!(err, CliError::UnknownCartItem(_)));
        assert_eq!(state.cart.len(), 1);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let (mut state, _) = state_with_item();
        remove(&mut state, CartItemId::generate());
        assert_eq!(state.cart.len(), 1);
    }

    #[tokio::test]
    async fn test_checkout_requires_session() {
        let (mut state, _) = state_with_item();
        let client = ApiClient::new(
            crate::client::parse_server_url("http://127.0.0.1:9").unwrap(),
            None,
        )
        .unwrap();

        let err = checkout(&client, &mut state, PaymentMethod::CreditCard)
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::NotLoggedIn));
        assert_eq!(state.cart.len(), 1);
    }
}
