//! Request and response bodies of the REST surface.
//!
//! Field names are camelCase on the wire. Request fields the server must
//! report as missing are `Option`s so that an absent field becomes a
//! validation error instead of a JSON parse failure.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{ListingFilter, split_list};
use crate::types::{ListingId, OrderStatus, PaymentMethod};
use crate::user::UserProfile;

/// `POST /api/auth/register`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// `POST /api/auth/login`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Successful register or login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserProfile,
    /// Opaque bearer token.
    pub token: String,
}

/// `PUT /api/auth/profile`. Absent or blank fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Query string of `GET /api/marketplace/websites`.
///
/// `language`, `country` and `category` accept comma-separated lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingQuery {
    #[serde(rename = "minDR", default, skip_serializing_if = "Option::is_none")]
    pub min_dr: Option<u8>,
    #[serde(rename = "maxDR", default, skip_serializing_if = "Option::is_none")]
    pub max_dr: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "minPrice", default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<Decimal>,
    #[serde(rename = "maxPrice", default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl From<ListingQuery> for ListingFilter {
    fn from(query: ListingQuery) -> Self {
        Self {
            min_dr: query.min_dr,
            max_dr: query.max_dr,
            languages: split_list(query.language.as_deref()),
            countries: split_list(query.country.as_deref()),
            categories: split_list(query.category.as_deref()),
            min_price: query.min_price,
            max_price: query.max_price,
            search: query.search.filter(|s| !s.trim().is_empty()),
        }
    }
}

const fn default_quantity() -> Option<u32> {
    Some(1)
}

/// One line of `POST /api/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineRequest {
    pub website_id: ListingId,
    #[serde(default = "default_quantity")]
    pub quantity: Option<u32>,
}

/// `POST /api/orders`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub items: Vec<OrderLineRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
}

/// `PATCH /api/orders/{id}/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

/// `POST /api/billing/funds`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddFundsRequest {
    pub amount: Decimal,
}

/// `GET /api/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// JSON envelope of every error response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    /// Per-field validation messages.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, String>,
}

impl ErrorBody {
    /// An envelope with no field errors.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_query_to_filter() {
        let query = ListingQuery {
            min_dr: Some(60),
            language: Some("English, German".to_string()),
            search: Some("  ".to_string()),
            ..Default::default()
        };
        let filter = ListingFilter::from(query);
        assert_eq!(filter.min_dr, Some(60));
        assert_eq!(filter.languages, vec!["English", "German"]);
        assert!(filter.countries.is_empty());
        assert_eq!(filter.search, None);
    }

    #[test]
    fn test_order_line_quantity_defaults_to_one() {
        let line: OrderLineRequest = serde_json::from_str(r#"{"websiteId": 3}"#).unwrap();
        assert_eq!(line.website_id, ListingId::new(3));
        assert_eq!(line.quantity, Some(1));
    }

    #[test]
    fn test_error_body_omits_empty_errors() {
        let json = serde_json::to_string(&ErrorBody::new("Unauthorized")).unwrap();
        assert_eq!(json, r#"{"message":"Unauthorized"}"#);
    }

    #[test]
    fn test_register_request_tolerates_missing_fields() {
        let req: RegisterRequest = serde_json::from_str(r#"{"email":"a@b.c"}"#).unwrap();
        assert_eq!(req.email.as_deref(), Some("a@b.c"));
        assert!(req.password.is_none());
    }
}
