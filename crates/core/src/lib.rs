//! BacklinkVista Core - Shared marketplace records.
//!
//! This crate provides the types shared by every BacklinkVista component:
//! - `server` - REST backend (auth, catalog, orders, billing)
//! - `cli` - Terminal client (`bv`) with a locally persisted cart
//! - `integration-tests` - End-to-end tests against the router
//!
//! # Architecture
//!
//! The core crate contains only data types and pure functions - no I/O, no
//! HTTP, no locks. Filtering, cart bookkeeping and order summaries live here
//! so the client and the server agree on them.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails, and statuses
//! - [`catalog`] - Marketplace listings and their filters
//! - [`cart`] - Client-side cart of listings pending checkout
//! - [`order`] - Orders created at checkout, order queries and summaries
//! - [`billing`] - Wallet balance, transactions and deposit offers
//! - [`user`] - User profiles
//! - [`api`] - Request and response bodies of the REST surface

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod billing;
pub mod cart;
pub mod catalog;
pub mod order;
pub mod types;
pub mod user;

pub use billing::{FundsOffer, Transaction, Wallet};
pub use cart::{Cart, CartError, CartItem};
pub use catalog::{Facets, Listing, ListingFilter, ListingMetrics};
pub use order::{Order, OrderItem, OrderPeriod, OrderQuery, OrderSummary};
pub use types::*;
pub use user::UserProfile;
