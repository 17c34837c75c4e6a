//! Token-bucket rate limiter shared by every clone of a client.
//!
//! Callers reserve a token under a short critical section and then sleep until
//! the reservation matures. Reservations are handed out in lock order, so a
//! waiter is never overtaken indefinitely while the bucket refills.

use std::{
    sync::{Mutex, PoisonError},
    time::Duration,
};

use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

use crate::{ManapoolError, Result};

// Deadline used when a wait is too long to represent.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Returned by [`RateLimiter::acquire`] when the wait was cancelled.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[error("rate limiter wait cancelled")]
pub struct Cancelled;

#[derive(Debug)]
struct Bucket {
    // Negative while reservations are outstanding.
    tokens: f64,
    last: Instant,
}

impl Bucket {
    fn advance(&mut self, now: Instant, rate: f64, burst: f64) {
        let elapsed = now.saturating_duration_since(self.last).as_secs_f64();
        self.tokens = (self.tokens + elapsed * rate).min(burst);
        self.last = now;
    }
}

/// Token bucket with a sustained `rate` (tokens per second) and a `burst`
/// capacity. The bucket starts full.
#[derive(Debug)]
pub struct RateLimiter {
    rate: f64,
    burst: u32,
    bucket: Mutex<Bucket>,
}

impl RateLimiter {
    /// Fails with a validation error unless `rate` is positive and finite and
    /// `burst` is at least 1.
    pub fn new(rate: f64, burst: u32) -> Result<Self> {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(ManapoolError::validation(
                "rate",
                format!("rate must be a positive finite number, got {rate}"),
            ));
        }
        if burst == 0 {
            return Err(ManapoolError::validation("burst", "burst must be at least 1"));
        }
        Ok(Self::unchecked(rate, burst))
    }

    fn unchecked(rate: f64, burst: u32) -> Self {
        Self {
            rate,
            burst,
            bucket: Mutex::new(Bucket {
                tokens: f64::from(burst),
                last: Instant::now(),
            }),
        }
    }

    /// Tokens added per second.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Bucket capacity.
    pub fn burst(&self) -> u32 {
        self.burst
    }

    /// Tokens that could be taken right now without waiting.
    pub fn available(&self) -> f64 {
        let mut bucket = self.lock();
        bucket.advance(Instant::now(), self.rate, f64::from(self.burst));
        bucket.tokens.max(0.0)
    }

    /// Waits for one token.
    ///
    /// Returns [`Cancelled`] without consuming a token if `cancel` fires
    /// first, including when it has already fired. Dropping the future before
    /// it completes also hands the reservation back.
    pub async fn acquire(
        &self,
        cancel: &CancellationToken,
    ) -> std::result::Result<(), Cancelled> {
        if cancel.is_cancelled() {
            return Err(Cancelled);
        }

        let ready_at = self.reserve();
        if ready_at <= Instant::now() {
            return Ok(());
        }

        let mut reservation = Reservation {
            limiter: self,
            pending: true,
        };
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Cancelled),
            _ = sleep_until(ready_at) => {
                reservation.pending = false;
                Ok(())
            }
        }
    }

    fn reserve(&self) -> Instant {
        let mut bucket = self.lock();
        let now = Instant::now();
        bucket.advance(now, self.rate, f64::from(self.burst));
        bucket.tokens -= 1.0;

        if bucket.tokens >= 0.0 {
            return now;
        }
        Duration::try_from_secs_f64(-bucket.tokens / self.rate)
            .ok()
            .and_then(|wait| now.checked_add(wait))
            .unwrap_or_else(|| now + FAR_FUTURE)
    }

    fn release(&self) {
        let mut bucket = self.lock();
        bucket.advance(Instant::now(), self.rate, f64::from(self.burst));
        bucket.tokens = (bucket.tokens + 1.0).min(f64::from(self.burst));
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Bucket> {
        self.bucket.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Token reserved by a waiter that has not been granted yet. Returned to the
/// bucket if the wait ends any other way.
struct Reservation<'a> {
    limiter: &'a RateLimiter,
    pending: bool,
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if self.pending {
            self.limiter.release();
        }
    }
}

/// 10 requests per second, burst of 1.
impl Default for RateLimiter {
    fn default() -> Self {
        Self::unchecked(10.0, 1)
    }
}
