//! Orders created from cart contents at checkout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Listing;
use crate::types::{
    CurrencyCode, ListingId, OrderId, OrderStatus, PaymentMethod, Price, PriceError, UserId,
};

/// Delivery estimate quoted for every placement.
pub const DEFAULT_DELIVERY_TIME: &str = "5-7 days";

/// One purchased placement, with the listing as it was at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub website_id: ListingId,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub price: Price,
    pub quantity: u32,
    pub line_total: Price,
}

impl OrderItem {
    /// Snapshot a listing into an order line.
    #[must_use]
    pub fn from_listing(listing: &Listing, quantity: u32) -> Self {
        Self {
            website_id: listing.id,
            url: listing.url.clone(),
            category: listing.category.clone(),
            price: listing.price,
            quantity,
            line_total: listing.price.times(quantity),
        }
    }
}

/// An order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    pub total: Price,
    pub payment_method: PaymentMethod,
    pub delivery_time: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Build a new `pending` order. The total is the sum of the line totals.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::CurrencyMismatch` if lines use different currencies.
    pub fn new(
        user_id: UserId,
        items: Vec<OrderItem>,
        payment_method: PaymentMethod,
        now: DateTime<Utc>,
    ) -> Result<Self, PriceError> {
        let currency = items
            .first()
            .map_or(CurrencyCode::default(), |item| item.price.currency_code);
        let total = Price::sum(currency, items.iter().map(|item| item.line_total))?;

        Ok(Self {
            id: OrderId::generate(),
            user_id,
            items,
            status: OrderStatus::Pending,
            total,
            payment_method,
            delivery_time: DEFAULT_DELIVERY_TIME.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Assign a status verbatim and stamp the update time.
    pub fn set_status(&mut self, status: OrderStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }
}

/// Age window for the order list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderPeriod {
    #[serde(rename = "7d")]
    Last7Days,
    #[serde(rename = "30d")]
    Last30Days,
    #[serde(rename = "90d")]
    Last90Days,
    #[default]
    #[serde(rename = "all")]
    All,
}

impl OrderPeriod {
    /// Maximum age in whole days, or `None` for no limit.
    #[must_use]
    pub const fn max_age_days(self) -> Option<i64> {
        match self {
            Self::Last7Days => Some(7),
            Self::Last30Days => Some(30),
            Self::Last90Days => Some(90),
            Self::All => None,
        }
    }
}

impl std::str::FromStr for OrderPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "7d" | "7days" => Ok(Self::Last7Days),
            "30d" | "30days" => Ok(Self::Last30Days),
            "90d" | "90days" => Ok(Self::Last90Days),
            "all" => Ok(Self::All),
            other => Err(format!("invalid period: {other}")),
        }
    }
}

/// Order list query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<OrderPeriod>,
    /// Substring of any item url.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl OrderQuery {
    /// Whether `order` passes the status, age and search constraints.
    #[must_use]
    pub fn matches(&self, order: &Order, now: DateTime<Utc>) -> bool {
        if self.status.is_some_and(|status| order.status != status) {
            return false;
        }

        if let Some(max_days) = self.period.and_then(OrderPeriod::max_age_days)
            && (now - order.created_at).num_days() > max_days
        {
            return false;
        }

        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_ascii_lowercase();
                order
                    .items
                    .iter()
                    .any(|item| item.url.to_ascii_lowercase().contains(&needle))
            }
            _ => true,
        }
    }
}

/// Dashboard counters over a user's orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub total_orders: usize,
    pub pending_orders: usize,
    pub in_progress_orders: usize,
    pub completed_orders: usize,
    pub cancelled_orders: usize,
    /// Sum of completed order totals.
    pub total_revenue: Price,
}

impl OrderSummary {
    /// Count orders by status and total the completed ones.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::CurrencyMismatch` if completed orders use
    /// different currencies.
    pub fn from_orders(orders: &[Order]) -> Result<Self, PriceError> {
        let count = |status: OrderStatus| orders.iter().filter(|o| o.status == status).count();
        let completed = orders
            .iter()
            .filter(|o| o.status == OrderStatus::Completed)
            .map(|o| o.total);
        let currency = orders
            .first()
            .map_or(CurrencyCode::default(), |o| o.total.currency_code);

        Ok(Self {
            total_orders: orders.len(),
            pending_orders: count(OrderStatus::Pending),
            in_progress_orders: count(OrderStatus::InProgress),
            completed_orders: count(OrderStatus::Completed),
            cancelled_orders: count(OrderStatus::Cancelled),
            total_revenue: Price::sum(currency, completed)?,
        })
    }
}
