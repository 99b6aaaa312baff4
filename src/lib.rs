//! # Window Gate
//!
//! Fixed-window request limiting for Axum services. One shared counter admits
//! at most `max_requests` requests per window across all callers; excess
//! requests get `429 Too Many Requests` until a background task resets the
//! counter at the end of the window.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Axum HTTP Server                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Middleware (Rate Limit → Trace)                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Handler (hello)                                            │
//! └─────────────────────────────────────────────────────────────┘
//!        ▲                                   │
//!        │ admit()                           │
//! ┌──────┴──────────┐   reset_to_zero()  ┌───┴──────────────────┐
//! │  WindowCounter  │ ◀───────────────── │  Reset task (tokio)  │
//! └─────────────────┘                    └──────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use window_gate::{AppState, Config, build_router};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let state = AppState::new(&Config::default())?;
//!     let app = build_router(&state);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//!     axum::serve(listener, app).await?;
//!     state.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! ```bash
//! RATE_LIMIT_MAX_REQUESTS=100 RATE_LIMIT_WINDOW_SECS=60 cargo run
//! ```

pub mod config;
pub mod counter;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use counter::{Admitted, WindowCounter};
pub use error::{AppError, AppResult, RateLimitError, RateLimitExceeded};
pub use middleware::RateLimitLayer;
pub use routes::build_router;
pub use state::AppState;
