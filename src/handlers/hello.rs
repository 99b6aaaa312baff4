//! Greeting endpoint.

use tracing::instrument;

/// Body returned by [`hello`].
pub const GREETING: &str = "Hello, World!";

/// Answer any method on any path with `200 OK` and a fixed greeting.
#[instrument]
pub async fn hello() -> &'static str {
    GREETING
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hello_returns_greeting() {
        assert_eq!(hello().await, "Hello, World!");
    }
}
