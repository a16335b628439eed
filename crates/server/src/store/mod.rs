//! In-memory storage.
//!
//! Nothing is persisted: all users, orders and wallets are lost on restart.
//! Each collection sits behind its own `tokio::sync::RwLock`, and a lock is
//! held only for the duration of one repository call.
//!
//! Repositories are cheap borrowed views over the [`MemoryStore`]:
//!
//! ```rust,ignore
//! let user = state.store().users().get_by_id(user_id).await;
//! ```

pub mod catalog;
pub mod orders;
pub mod users;
pub mod wallets;

use std::collections::HashMap;

use thiserror::Error;
use tokio::sync::RwLock;

use backlink_vista_core::{Order, Price, PriceError, UserId, Wallet};

pub use catalog::Catalog;
pub use orders::OrderRepository;
pub use users::{NewUser, UserRepository};
pub use wallets::WalletRepository;

use users::UserTable;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Record not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Unique constraint violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Wallet balance does not cover a charge.
    #[error("insufficient funds: balance {balance}, required {required}")]
    InsufficientFunds { balance: Price, required: Price },

    /// Stored or loaded data is invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Price arithmetic failed.
    #[error("price error: {0}")]
    Price(#[from] PriceError),

    /// Reading a data file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Process-wide in-memory collections.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<UserTable>,
    orders: RwLock<Vec<Order>>,
    wallets: RwLock<HashMap<UserId, Wallet>>,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// User accounts and credentials.
    #[must_use]
    pub const fn users(&self) -> UserRepository<'_> {
        UserRepository::new(&self.users)
    }

    /// Orders of every user.
    #[must_use]
    pub const fn orders(&self) -> OrderRepository<'_> {
        OrderRepository::new(&self.orders)
    }

    /// Wallet balances and transactions.
    #[must_use]
    pub const fn wallets(&self) -> WalletRepository<'_> {
        WalletRepository::new(&self.wallets)
    }
}
