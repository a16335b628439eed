//! Wallet repository.
//!
//! Users without a wallet entry have a zero balance and no history.
//! Transactions are kept newest first.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use backlink_vista_core::billing::bonus_for;
use backlink_vista_core::{Price, Transaction, TransactionKind, UserId, Wallet};

use super::RepositoryError;

/// Repository for wallet operations.
pub struct WalletRepository<'a> {
    wallets: &'a RwLock<HashMap<UserId, Wallet>>,
}

impl<'a> WalletRepository<'a> {
    pub(crate) const fn new(wallets: &'a RwLock<HashMap<UserId, Wallet>>) -> Self {
        Self { wallets }
    }

    /// A user's wallet.
    pub async fn get(&self, user_id: UserId) -> Wallet {
        let wallets = self.wallets.read().await;
        wallets.get(&user_id).cloned().unwrap_or_default()
    }

    /// Credit a deposit, plus its bonus as a separate transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Price` if the wallet holds another currency.
    pub async fn deposit(
        &self,
        user_id: UserId,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<Wallet, RepositoryError> {
        let mut wallets = self.wallets.write().await;
        let wallet = wallets.entry(user_id).or_default();
        let currency = wallet.balance.currency_code;

        let deposit = Price::new(amount, currency);
        let mut balance = wallet.balance.checked_add(deposit)?;
        let mut credits = vec![Transaction::completed(
            TransactionKind::Deposit,
            "Funds added",
            deposit,
            now,
        )];

        let bonus = bonus_for(amount);
        if bonus > Decimal::ZERO {
            let bonus = Price::new(bonus, currency);
            balance = balance.checked_add(bonus)?;
            credits.push(Transaction::completed(
                TransactionKind::Bonus,
                format!("Bonus for {deposit} deposit"),
                bonus,
                now,
            ));
        }

        wallet.balance = balance;
        for tx in credits {
            wallet.transactions.insert(0, tx);
        }
        Ok(wallet.clone())
    }

    /// Debit a purchase.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InsufficientFunds` if the balance does not
    /// cover `amount`; the wallet is left untouched.
    pub async fn charge(
        &self,
        user_id: UserId,
        amount: Price,
        description: impl Into<String> + Send,
        now: DateTime<Utc>,
    ) -> Result<Transaction, RepositoryError> {
        let mut wallets = self.wallets.write().await;
        let wallet = wallets.entry(user_id).or_default();

        let remaining = wallet.balance.checked_add(amount.negated())?;
        if remaining.is_negative() {
            return Err(RepositoryError::InsufficientFunds {
                balance: wallet.balance,
                required: amount,
            });
        }

        let tx = Transaction::completed(
            TransactionKind::Purchase,
            description,
            amount.negated(),
            now,
        );
        wallet.balance = remaining;
        wallet.transactions.insert(0, tx.clone());
        Ok(tx)
    }
}
