//! Business logic services.
//!
//! - `auth` - Password registration and login, bearer tokens

pub mod auth;
