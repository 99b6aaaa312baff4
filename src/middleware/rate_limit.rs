//! Fixed-window rate limiting middleware.
//!
//! # Algorithm
//!
//! Every request, regardless of method, path or caller, takes one slot from a
//! shared [`WindowCounter`]. Once the window is full the request is answered
//! immediately and the inner service is never called. The counter is cleared
//! by the reset task spawned in [`AppState`](crate::state::AppState), not by
//! request traffic.
//!
//! # Response Headers
//!
//! On rate limit exceeded (429):
//! - `Retry-After`: Seconds until the window resets
//! - `X-RateLimit-Limit`: Configured requests per window
//! - `X-RateLimit-Remaining`: Always `0`
//!
//! Admitted requests pass through untouched.

use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{Request, Response};
use axum::response::IntoResponse;
use tower::{Layer, Service};
use tracing::{trace, warn};

use crate::counter::WindowCounter;
use crate::metrics;

/// Rate limiting layer for Tower middleware stack.
///
/// # Example
///
/// ```rust,ignore
/// let counter = Arc::new(WindowCounter::new(5, Duration::from_secs(10))?);
/// let app = Router::new()
///     .route("/", get(handler))
///     .layer(RateLimitLayer::new(counter));
/// ```
#[derive(Clone)]
pub struct RateLimitLayer {
    counter: Arc<WindowCounter>,
}

impl RateLimitLayer {
    /// Create a layer backed by an existing counter.
    pub fn new(counter: Arc<WindowCounter>) -> Self {
        Self { counter }
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimitService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimitService {
            inner,
            counter: self.counter.clone(),
        }
    }
}

/// Rate limiting service wrapper.
#[derive(Clone)]
pub struct RateLimitService<S> {
    inner: S,
    counter: Arc<WindowCounter>,
}

impl<S> Service<Request<Body>> for RateLimitService<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        // Decide before building the future so admission order follows call order
        match self.counter.admit() {
            Ok(admitted) => {
                trace!(remaining = admitted.remaining, "Request admitted");
                metrics::record_request_admitted();

                // Swap in the clone so the instance that was driven to ready is the one called
                let clone = self.inner.clone();
                let mut inner = std::mem::replace(&mut self.inner, clone);
                Box::pin(async move { inner.call(req).await })
            }
            Err(exceeded) => {
                warn!(
                    method = %req.method(),
                    path = %req.uri().path(),
                    retry_after_secs = exceeded.retry_after_secs(),
                    "Rate limit exceeded"
                );
                metrics::record_request_rejected();

                Box::pin(async move { Ok(exceeded.into_response()) })
            }
        }
    }
}
