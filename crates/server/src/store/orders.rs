//! Order repository.

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use backlink_vista_core::{Order, OrderId, OrderQuery, OrderStatus, UserId};

use super::RepositoryError;

/// Repository for order operations.
///
/// Every read is scoped to one user: another user's order behaves exactly
/// like a missing one.
pub struct OrderRepository<'a> {
    orders: &'a RwLock<Vec<Order>>,
}

impl<'a> OrderRepository<'a> {
    pub(crate) const fn new(orders: &'a RwLock<Vec<Order>>) -> Self {
        Self { orders }
    }

    /// Store a new order.
    pub async fn insert(&self, order: Order) -> Order {
        let mut orders = self.orders.write().await;
        orders.push(order.clone());
        order
    }

    /// A user's orders matching `query`, newest first.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
        query: &OrderQuery,
        now: DateTime<Utc>,
    ) -> Vec<Order> {
        let orders = self.orders.read().await;
        // Reverse insertion order breaks timestamp ties
        let mut matching: Vec<Order> = orders
            .iter()
            .rev()
            .filter(|o| o.user_id == user_id && query.matches(o, now))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching
    }

    /// One of the user's orders.
    pub async fn get_for_user(&self, user_id: UserId, order_id: OrderId) -> Option<Order> {
        let orders = self.orders.read().await;
        orders
            .iter()
            .find(|o| o.id == order_id && o.user_id == user_id)
            .cloned()
    }

    /// Assign a status to one of the user's orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user has no such order.
    pub async fn set_status(
        &self,
        user_id: UserId,
        order_id: OrderId,
        status: OrderStatus,
        now: DateTime<Utc>,
    ) -> Result<Order, RepositoryError> {
        let mut orders = self.orders.write().await;
        let order = orders
            .iter_mut()
            .find(|o| o.id == order_id && o.user_id == user_id)
            .ok_or_else(|| RepositoryError::NotFound(format!("order {order_id}")))?;

        order.set_status(status, now);
        Ok(order.clone())
    }
}
