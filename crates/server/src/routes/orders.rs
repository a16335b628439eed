//! Order route handlers.
//!
//! Checkout resolves every line against the catalog, so the server's prices
//! are authoritative. Orders paid from the wallet are charged before they are
//! stored: a failed charge leaves no order behind.

use std::collections::{BTreeMap, HashSet};

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use backlink_vista_core::api::CreateOrderRequest;
use backlink_vista_core::{
    Order, OrderId, OrderItem, OrderQuery, OrderStatus, OrderSummary, PaymentMethod, UserId,
};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::{ApiJson, ApiQuery, RequireAuth};
use crate::state::AppState;
use crate::store::{Catalog, RepositoryError};

const ORDER_NOT_FOUND: &str = "Order not found";

fn order_not_found() -> AppError {
    AppError::NotFound(ORDER_NOT_FOUND.to_string())
}

fn parse_order_id(id: &str) -> Result<OrderId> {
    id.parse().map_err(|_| order_not_found())
}

/// Map a missing order to the order-specific 404.
fn scoped(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound(_) => order_not_found(),
        other => AppError::Repository(other),
    }
}

/// Body of `PATCH /api/orders/{id}/status`.
///
/// The status arrives as a plain string so that an unknown value is reported
/// against the field instead of as malformed JSON.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    status: Option<String>,
}

/// The current user's orders, newest first.
#[instrument(skip_all)]
pub async fn list_orders(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiQuery(query): ApiQuery<OrderQuery>,
) -> Json<Vec<Order>> {
    let orders = state
        .store()
        .orders()
        .list_for_user(user.profile.id, &query, Utc::now())
        .await;

    Json(orders)
}

/// Place an order for the requested listings.
#[instrument(skip_all)]
pub async fn create_order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(request): ApiJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    let user_id = user.profile.id;
    let payment_method = request.payment_method.unwrap_or_default();
    let now = Utc::now();

    let items = resolve_items(state.catalog(), &request)?;
    let order = Order::new(user_id, items, payment_method, now).map_err(RepositoryError::from)?;

    if payment_method == PaymentMethod::Balance {
        state
            .store()
            .wallets()
            .charge(user_id, order.total, format!("Order {}", order.id), now)
            .await?;
    }

    let order = state.store().orders().insert(order).await;
    tracing::info!(
        user_id = %user_id,
        order_id = %order.id,
        total = %order.total,
        items = order.items.len(),
        "Order placed"
    );
    add_breadcrumb("orders", "Order placed", &[("order_id", order.id.to_string())]);

    Ok((StatusCode::CREATED, Json(order)))
}

/// Turn request lines into priced order items.
///
/// Every problem is reported, keyed by the offending line.
fn resolve_items(catalog: &Catalog, request: &CreateOrderRequest) -> Result<Vec<OrderItem>> {
    if request.items.is_empty() {
        return Err(AppError::invalid_field(
            "Invalid order items",
            "items",
            "At least one website is required",
        ));
    }

    let mut errors = BTreeMap::new();
    let mut seen = HashSet::new();
    let mut items = Vec::with_capacity(request.items.len());

    for (index, line) in request.items.iter().enumerate() {
        let quantity = line.quantity.unwrap_or(1);
        if quantity == 0 {
            errors.insert(
                format!("items[{index}].quantity"),
                "Quantity must be at least 1".to_string(),
            );
        }
        if !seen.insert(line.website_id) {
            errors.insert(
                format!("items[{index}].websiteId"),
                format!("Website {} appears more than once", line.website_id),
            );
            continue;
        }

        match catalog.get(line.website_id) {
            Some(listing) => items.push(OrderItem::from_listing(listing, quantity)),
            None => {
                errors.insert(
                    format!("items[{index}].websiteId"),
                    format!("Website {} not found", line.website_id),
                );
            }
        }
    }

    if errors.is_empty() {
        Ok(items)
    } else {
        Err(AppError::Validation {
            message: "Invalid order items".to_string(),
            errors,
        })
    }
}

/// Dashboard counters over all of the current user's orders.
#[instrument(skip_all)]
pub async fn summary(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<OrderSummary>> {
    let orders = all_orders(&state, user.profile.id).await;
    let summary = OrderSummary::from_orders(&orders).map_err(RepositoryError::from)?;

    Ok(Json(summary))
}

async fn all_orders(state: &AppState, user_id: UserId) -> Vec<Order> {
    state
        .store()
        .orders()
        .list_for_user(user_id, &OrderQuery::default(), Utc::now())
        .await
}

/// One of the current user's orders.
#[instrument(skip_all)]
pub async fn get_order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<Order>> {
    let id = parse_order_id(&id)?;

    state
        .store()
        .orders()
        .get_for_user(user.profile.id, id)
        .await
        .map(Json)
        .ok_or_else(order_not_found)
}

/// Assign a status. Any known status is accepted from any other.
#[instrument(skip_all)]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<StatusUpdate>,
) -> Result<Json<Order>> {
    let id = parse_order_id(&id)?;
    let raw = update
        .status
        .ok_or_else(|| AppError::invalid_field("Invalid status", "status", "status is required"))?;
    let status: OrderStatus = raw
        .parse()
        .map_err(|e: String| AppError::invalid_field("Invalid status", "status", e))?;

    let order = state
        .store()
        .orders()
        .set_status(user.profile.id, id, status, Utc::now())
        .await
        .map_err(scoped)?;
    tracing::info!(order_id = %order.id, status = %order.status, "Order status updated");

    Ok(Json(order))
}

/// Cancel one of the current user's orders.
#[instrument(skip_all)]
pub async fn cancel_order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<Order>> {
    let id = parse_order_id(&id)?;

    let order = state
        .store()
        .orders()
        .set_status(user.profile.id, id, OrderStatus::Cancelled, Utc::now())
        .await
        .map_err(scoped)?;
    tracing::info!(order_id = %order.id, "Order cancelled");

    Ok(Json(order))
}
