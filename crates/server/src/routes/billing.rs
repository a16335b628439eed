//! Wallet route handlers.

use axum::{Json, extract::State};
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::instrument;

use backlink_vista_core::api::AddFundsRequest;
use backlink_vista_core::billing::{MAX_DEPOSIT, funds_offers};
use backlink_vista_core::{FundsOffer, Wallet};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::{ApiJson, RequireAuth};
use crate::state::AppState;

/// Balance and transaction history of the current user.
#[instrument(skip_all)]
pub async fn show(State(state): State<AppState>, RequireAuth(user): RequireAuth) -> Json<Wallet> {
    Json(state.store().wallets().get(user.profile.id).await)
}

/// Deposit bonus tiers.
pub async fn offers(RequireAuth(_user): RequireAuth) -> Json<Vec<FundsOffer>> {
    Json(funds_offers())
}

/// Credit a deposit to the current user's wallet.
#[instrument(skip_all)]
pub async fn add_funds(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(request): ApiJson<AddFundsRequest>,
) -> Result<Json<Wallet>> {
    validate_amount(request.amount)?;

    let wallet = state
        .store()
        .wallets()
        .deposit(user.profile.id, request.amount, Utc::now())
        .await?;
    tracing::info!(
        user_id = %user.profile.id,
        amount = %request.amount,
        balance = %wallet.balance,
        "Funds added"
    );
    add_breadcrumb("billing", "Funds added", &[("amount", request.amount.to_string())]);

    Ok(Json(wallet))
}

fn validate_amount(amount: Decimal) -> Result<()> {
    let max = Decimal::from(MAX_DEPOSIT);
    let detail = if amount <= Decimal::ZERO {
        "Amount must be positive".to_string()
    } else if amount > max {
        format!("Amount must not exceed {MAX_DEPOSIT}")
    } else if amount.normalize().scale() > 2 {
        "Amount must have at most two decimal places".to_string()
    } else {
        return Ok(());
    };

    Err(AppError::invalid_field("Invalid amount", "amount", detail))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap_or_default()
    }

    #[test]
    fn test_accepts_whole_and_cent_amounts() {
        assert!(validate_amount(dec("100")).is_ok());
        assert!(validate_amount(dec("19.99")).is_ok());
        assert!(validate_amount(dec("25.50")).is_ok());
        assert!(validate_amount(Decimal::from(MAX_DEPOSIT)).is_ok());
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(validate_amount(Decimal::ZERO).is_err());
        assert!(validate_amount(dec("-5")).is_err());
        assert!(validate_amount(Decimal::from(MAX_DEPOSIT) + Decimal::ONE).is_err());
    }

    #[test]
    fn test_rejects_sub_cent_amounts() {
        assert!(validate_amount(dec("1.005")).is_err());
    }
}
