//! Checkout and order management over HTTP.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use reqwest::{Method, StatusCode};
use rust_decimal::Decimal;
use serde_json::{Value, json};

use backlink_vista_core::{Order, OrderStatus, OrderSummary, PaymentMethod};
use backlink_vista_integration_tests::{TestContext, body};

async fn place(ctx: &TestContext, token: &str, order: Value) -> Order {
    let response = ctx
        .send_json(Method::POST, "/api/orders", Some(token), &order)
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.unwrap()
}

async fn list(ctx: &TestContext, token: &str, query: &str) -> Vec<Order> {
    let response = ctx.get(&format!("/api/orders{query}"), token).await;
    assert_eq!(response.status(), StatusCode::OK);
    response.json().await.unwrap()
}

async fn set_status(ctx: &TestContext, token: &str, order: &Order, status: &str) -> Order {
    let response = ctx
        .send_json(
            Method::PATCH,
            &format!("/api/orders/{}/status", order.id),
            Some(token),
            &json!({"status": status}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    response.json().await.unwrap()
}

#[tokio::test]
async fn test_checkout_prices_from_catalog() {
    let ctx = TestContext::new().await;
    let token = ctx.token().await;

    let order = place(
        &ctx,
        &token,
        json!({"items": [{"websiteId": 2, "quantity": 2}, {"websiteId": 3}]}),
    )
    .await;

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.payment_method, PaymentMethod::CreditCard);
    assert_eq!(order.delivery_time, "5-7 days");
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.items[0].url, "techblog.com");
    assert_eq!(order.items[0].line_total.amount, Decimal::from(178));
    assert_eq!(order.items[1].quantity, 1);
    assert_eq!(order.total.amount, Decimal::from(298));
    assert_eq!(
        order.total.amount,
        order.items.iter().map(|i| i.line_total.amount).sum::<Decimal>()
    );
}

#[tokio::test]
async fn test_checkout_validation() {
    let ctx = TestContext::new().await;
    let token = ctx.token().await;

    let response = ctx
        .send_json(Method::POST, "/api/orders", Some(&token), &json!({"items": []}))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body(response).await["errors"]["items"].is_string());

    let response = ctx
        .send_json(
            Method::POST,
            "/api/orders",
            Some(&token),
            &json!({"items": [{"websiteId": 1}, {"websiteId": 404}, {"websiteId": 1}]}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body(response).await;
    assert!(body["errors"]["items[1].websiteId"].is_string());
    assert!(body["errors"]["items[2].websiteId"].is_string());

    assert!(list(&ctx, &token, "").await.is_empty());
}

#[tokio::test]
async fn test_orders_are_private() {
    let ctx = TestContext::new().await;
    let alice = ctx.token().await;
    let bob = ctx.token().await;

    let order = place(&ctx, &alice, json!({"items": [{"websiteId": 5}]})).await;

    assert_eq!(list(&ctx, &alice, "").await.len(), 1);
    assert!(list(&ctx, &bob, "").await.is_empty());

    let response = ctx.get(&format!("/api/orders/{}", order.id), &bob).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body(response).await, json!({"message": "Order not found"}));

    let response = ctx
        .request(
            Method::POST,
            &format!("/api/orders/{}/cancel", order.id),
            Some(&bob),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx.get(&format!("/api/orders/{}", order.id), &alice).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_status_is_stored_verbatim() {
    let ctx = TestContext::new().await;
    let token = ctx.token().await;
    let order = place(&ctx, &token, json!({"items": [{"websiteId": 7}]})).await;

    let completed = set_status(&ctx, &token, &order, "completed").await;
    assert_eq!(completed.status, OrderStatus::Completed);
    assert!(completed.updated_at >= order.updated_at);

    let reopened = set_status(&ctx, &token, &order, "pending").await;
    assert_eq!(reopened.status, OrderStatus::Pending);

    let delayed = set_status(&ctx, &token, &order, "delayed").await;
    assert_eq!(delayed.status, OrderStatus::Delayed);

    let response = ctx
        .send_json(
            Method::PATCH,
            &format!("/api/orders/{}/status", order.id),
            Some(&token),
            &json!({"status": "shipped"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body(response).await["errors"]["status"].is_string());
}

#[tokio::test]
async fn test_cancel_and_filter_by_status() {
    let ctx = TestContext::new().await;
    let token = ctx.token().await;
    let first = place(&ctx, &token, json!({"items": [{"websiteId": 1}]})).await;
    let second = place(&ctx, &token, json!({"items": [{"websiteId": 9}]})).await;

    let response = ctx
        .request(
            Method::POST,
            &format!("/api/orders/{}/cancel", first.id),
            Some(&token),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cancelled: Order = response.json().await.unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    let all = list(&ctx, &token, "").await;
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, second.id);

    let only_cancelled = list(&ctx, &token, "?status=cancelled").await;
    assert_eq!(only_cancelled.len(), 1);
    assert_eq!(only_cancelled[0].id, first.id);

    let searched = list(&ctx, &token, "?search=education&period=7d").await;
    assert_eq!(searched.len(), 1);
    assert_eq!(searched[0].id, second.id);
}

#[tokio::test]
async fn test_summary_counts() {
    let ctx = TestContext::new().await;
    let token = ctx.token().await;
    let done = place(&ctx, &token, json!({"items": [{"websiteId": 10}]})).await;
    place(&ctx, &token, json!({"items": [{"websiteId": 11}]})).await;
    set_status(&ctx, &token, &done, "completed").await;

    let summary: OrderSummary = ctx
        .get("/api/orders/summary", &token)
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(summary.total_orders, 2);
    assert_eq!(summary.pending_orders, 1);
    assert_eq!(summary.completed_orders, 1);
    assert_eq!(summary.total_revenue.amount, Decimal::from(135));
}

#[tokio::test]
async fn test_malformed_order_ids_are_not_found() {
    let ctx = TestContext::new().await;
    let token = ctx.token().await;

    let response = ctx.get("/api/orders/not-a-uuid", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body(response).await["message"], "Order not found");
}
