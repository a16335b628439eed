//! HTTP middleware stack and extractors.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (`http_request` span)
//! 3. Request ID (read or generate `x-request-id`)
//! 4. CORS
//! 5. Rate limiting on the credential endpoints (governor)

pub mod auth;
pub mod extract;
pub mod rate_limit;
pub mod request_id;

pub use auth::{CurrentUser, RequireAuth};
pub use extract::{ApiJson, ApiQuery};
pub use rate_limit::auth_rate_limiter;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
