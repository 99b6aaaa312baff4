//! Application routing configuration with middleware stack.
//!
//! # Middleware Stack (applied in order)
//!
//! ```text
//! Request
//!    │
//!    ▼
//! ┌──────────────────┐
//! │  Rate Limiting   │ ← 429 if the window is full
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │     Tracing      │ ← HTTP request/response logging
//! └────────┬─────────┘
//!          │
//!          ▼
//!      Handler
//! ```
//!
//! Only `/` is registered, and the same handler is installed as the fallback,
//! so every path and method reaches it.

use axum::Router;
use axum::routing::any;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers;
use crate::middleware::RateLimitLayer;
use crate::state::AppState;

/// Build the application router with the limiter in front of every route.
pub fn build_router(state: &AppState) -> Router {
    let router = Router::new()
        .route("/", any(handlers::hello))
        .fallback(handlers::hello)
        .layer(TraceLayer::new_for_http());

    // Applied last, runs first in the request pipeline
    info!(
        max_requests = state.counter.max_requests(),
        window_secs = state.counter.window().as_secs(),
        "Rate limiting enabled"
    );
    router.layer(RateLimitLayer::new(state.counter.clone()))
}
