//! Wallet balance, transactions and deposit offers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CurrencyCode, Price, TransactionId, TransactionKind, TransactionStatus};

/// Largest single deposit accepted.
pub const MAX_DEPOSIT: u32 = 100_000;

/// Deposit tiers as `(amount, bonus)` in whole dollars.
const OFFER_TIERS: [(u32, u32); 6] = [
    (500, 25),
    (1_000, 50),
    (5_000, 300),
    (10_000, 750),
    (15_000, 1_100),
    (20_000, 1_500),
];

/// A deposit amount that earns a bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundsOffer {
    pub amount: Decimal,
    pub bonus: Decimal,
}

/// All deposit offers, smallest first.
#[must_use]
pub fn funds_offers() -> Vec<FundsOffer> {
    OFFER_TIERS
        .iter()
        .map(|&(amount, bonus)| FundsOffer {
            amount: Decimal::from(amount),
            bonus: Decimal::from(bonus),
        })
        .collect()
}

/// Bonus earned by a deposit: that of the largest offer not above `amount`.
#[must_use]
pub fn bonus_for(amount: Decimal) -> Decimal {
    funds_offers()
        .into_iter()
        .filter(|offer| offer.amount <= amount)
        .map(|offer| offer.bonus)
        .next_back()
        .unwrap_or(Decimal::ZERO)
}

/// A wallet movement. Debits carry a negative amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub kind: TransactionKind,
    pub description: String,
    pub amount: Price,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// A completed transaction.
    #[must_use]
    pub fn completed(
        kind: TransactionKind,
        description: impl Into<String>,
        amount: Price,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TransactionId::generate(),
            kind,
            description: description.into(),
            amount,
            status: TransactionStatus::Completed,
            created_at: now,
        }
    }
}

/// A user's balance and transaction history (newest first).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub balance: Price,
    pub transactions: Vec<Transaction>,
}

impl Default for Wallet {
    fn default() -> Self {
        Self {
            balance: Price::zero(CurrencyCode::USD),
            transactions: Vec::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_bonus_below_smallest_offer_is_zero() {
        assert_eq!(bonus_for(Decimal::from(499)), Decimal::ZERO);
    }

    #[test]
    fn test_bonus_exact_offer() {
        assert_eq!(bonus_for(Decimal::from(5_000)), Decimal::from(300));
    }

    #[test]
    fn test_bonus_between_offers_uses_lower_tier() {
        assert_eq!(bonus_for(Decimal::from(12_345)), Decimal::from(750));
        assert_eq!(bonus_for(Decimal::from(99_000)), Decimal::from(1_500));
    }

    #[test]
    fn test_offers_are_ascending() {
        let offers = funds_offers();
        assert_eq!(offers.len(), 6);
        assert!(offers.windows(2).all(|w| w[0].amount < w[1].amount));
    }
}
