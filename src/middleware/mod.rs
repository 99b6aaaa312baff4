//! HTTP middleware.
//!
//! # Architecture
//!
//! ```text
//! Request → Rate Limiter → Trace → Handler → Response
//!              ↓
//!          429 Too Many Requests
//! ```

pub mod rate_limit;

pub use rate_limit::{RateLimitLayer, RateLimitService};
