//! Request admission pacing.
//!
//! A [`RateLimiter`] admits one caller per interval. It does not bound how
//! many admitted requests are in flight, only how fast new ones start.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until};


/// Shared gate admitting at most one caller per `interval`.
///
/// One limiter is created per pipeline run and shared by every worker of that
/// run through an `Arc`.
///
/// # Examples
///
/// ```
/// use libsweep::throttle::RateLimiter;
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() {
/// let limiter = RateLimiter::new(Duration::from_millis(10));
/// limiter.acquire().await; // first grant is immediate
/// limiter.acquire().await; // waits ~10ms
/// # }
/// ```
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    /// Time of the most recent grant; `None` before the first one
    last_grant: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Creates a limiter admitting one caller per `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_grant: Mutex::new(None),
        }
    }

    /// Waits until at least one interval has passed since the previous grant.
    ///
    /// The lock is held across the sleep, so concurrent callers queue up and
    /// are released one interval apart in FIFO order.
    pub async fn acquire(&self) {
        let mut last_grant = self.last_grant.lock().await;
        if let Some(previous) = *last_grant {
            sleep_until(previous + self.interval).await;
        }
        *last_grant = Some(Instant::now());
    }
}
