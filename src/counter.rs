//! Fixed-window request counter.
//!
//! # Algorithm
//!
//! A single count is shared by every caller. Each admitted request increments
//! it until `max_requests` is reached; further requests are refused without
//! touching the count. A background task calls [`WindowCounter::reset_to_zero`]
//! once per window, which reopens the gate.
//!
//! ```text
//! ACCEPTING (count < max) ──admit──▶ SATURATED (count == max)
//!        ▲                                   │
//!        └────────── reset_to_zero ──────────┘
//! ```
//!
//! # Thread Safety
//!
//! One `parking_lot::Mutex` guards the whole read-modify-write of both
//! `admit` and `reset_to_zero`, so two concurrent admits can never both
//! observe a free slot and overshoot the limit, and a reset can never land in
//! the middle of an increment. The guard is never held across an `.await`.

use std::num::NonZeroU32;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

use crate::error::{RateLimitError, RateLimitExceeded};

/// Successful admission into the current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admitted {
    /// Requests still available in this window after this one.
    pub remaining: u32,
}

#[derive(Debug)]
struct WindowState {
    count: u32,
    started_at: Instant,
}

/// Shared counter for the active window.
///
/// Wrap in an `Arc` and hand the same instance to the middleware layer and to
/// the reset task.
#[derive(Debug)]
pub struct WindowCounter {
    state: Mutex<WindowState>,
    max_requests: NonZeroU32,
    window: Duration,
}

impl WindowCounter {
    /// Create a counter admitting `max_requests` per `window`.
    ///
    /// # Errors
    ///
    /// Returns `RateLimitError::ZeroLimit` if `max_requests` is 0 and
    /// `RateLimitError::ZeroWindow` if `window` is zero.
    pub fn new(max_requests: u32, window: Duration) -> Result<Self, RateLimitError> {
        let max_requests = NonZeroU32::new(max_requests).ok_or(RateLimitError::ZeroLimit)?;
        if window.is_zero() {
            return Err(RateLimitError::ZeroWindow);
        }

        Ok(Self {
            state: Mutex::new(WindowState {
                count: 0,
                started_at: Instant::now(),
            }),
            max_requests,
            window,
        })
    }

    /// Try to take one slot in the current window.
    ///
    /// On success the count is incremented. On rejection the count is left
    /// untouched and the error reports how long until the next reset.
    pub fn admit(&self) -> Result<Admitted, RateLimitExceeded> {
        let limit = self.max_requests.get();
        let mut state = self.state.lock();

        if state.count >= limit {
            let elapsed = state.started_at.elapsed();
            return Err(RateLimitExceeded {
                limit,
                retry_after: self.window.saturating_sub(elapsed),
            });
        }

        state.count += 1;
        Ok(Admitted {
            remaining: limit - state.count,
        })
    }

    /// Boolean form of [`admit`](Self::admit).
    pub fn try_admit(&self) -> bool {
        self.admit().is_ok()
    }

    /// Clear the count and start a new window. Returns the cleared count.
    pub fn reset_to_zero(&self) -> u32 {
        let mut state = self.state.lock();
        let cleared = state.count;
        state.count = 0;
        state.started_at = Instant::now();
        cleared
    }

    /// Requests admitted so far in the current window.
    pub fn count(&self) -> u32 {
        self.state.lock().count
    }

    /// Requests still available in the current window.
    pub fn remaining(&self) -> u32 {
        self.max_requests.get() - self.count()
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests.get()
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn counter(max: u32) -> WindowCounter {
        WindowCounter::new(max, Duration::from_secs(10)).unwrap()
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        let result = WindowCounter::new(0, Duration::from_secs(10));
        assert!(matches!(result, Err(RateLimitError::ZeroLimit)));
    }

    #[test]
    fn test_zero_window_is_rejected() {
        let result = WindowCounter::new(5, Duration::ZERO);
        assert!(matches!(result, Err(RateLimitError::ZeroWindow)));
    }

    #[test]
    fn test_admits_up_to_limit() {
        let counter = counter(5);

        for expected_remaining in (0..5).rev() {
            let admitted = counter.admit().unwrap();
            assert_eq!(admitted.remaining, expected_remaining);
        }

        assert_eq!(counter.count(), 5);
        assert_eq!(counter.remaining(), 0);
    }

    #[test]
    fn test_rejection_does_not_increment() {
        let counter = counter(5);
        for _ in 0..5 {
            assert!(counter.try_admit());
        }

        assert!(!counter.try_admit());
        assert!(!counter.try_admit());
        assert_eq!(counter.count(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejection_reports_time_until_reset() {
        let counter = counter(1);
        assert!(counter.try_admit());

        tokio::time::advance(Duration::from_secs(3)).await;

        let err = counter.admit().unwrap_err();
        assert_eq!(err.limit, 1);
        assert_eq!(err.retry_after, Duration::from_secs(7));
    }

    #[test]
    fn test_reset_reopens_saturated_window() {
        let counter = counter(5);
        for _ in 0..5 {
            counter.try_admit();
        }
        assert!(!counter.try_admit());

        assert_eq!(counter.reset_to_zero(), 5);
        assert!(counter.try_admit());
        assert_eq!(counter.count(), 1);
    }

    #[test]
    fn test_reset_on_zero_is_idempotent() {
        let counter = counter(5);
        assert_eq!(counter.reset_to_zero(), 0);
        assert_eq!(counter.reset_to_zero(), 0);
        assert_eq!(counter.count(), 0);
        assert_eq!(counter.remaining(), 5);
    }

    #[test]
    fn test_concurrent_admits_never_exceed_limit() {
        let counter = Arc::new(counter(5));

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let counter = counter.clone();
                std::thread::spawn(move || counter.try_admit())
            })
            .collect();

        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(admitted, 5);
        assert_eq!(counter.count(), 5);
    }

    #[test]
    fn test_concurrent_resets_and_admits_stay_in_bounds() {
        let counter = Arc::new(counter(3));

        let resetter = {
            let counter = counter.clone();
            std::thread::spawn(move || {
                for _ in 0..1_000 {
                    counter.reset_to_zero();
                }
            })
        };
        let admitters: Vec<_> = (0..4)
            .map(|_| {
                let counter = counter.clone();
                std::thread::spawn(move || {
                    for _ in 0..1_000 {
                        counter.try_admit();
                        assert!(counter.count() <= 3);
                    }
                })
            })
            .collect();

        resetter.join().unwrap();
        for admitter in admitters {
            admitter.join().unwrap();
        }
        assert!(counter.count() <= 3);
    }
}
