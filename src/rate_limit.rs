//! Fixed-window rate limiting keyed by client identifier.
//!
//! Counters live for the whole process and stale keys are never evicted.
//! A burst straddling a window boundary can admit up to twice the limit.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use dashmap::DashMap;

// Source of "now" so tests can move time by hand
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// Rate limit entry - tracks requests per client key
#[derive(Debug, Clone, Copy)]
pub struct RateLimitEntry {
    pub count: u32,
    pub window_reset_at: Instant,
}

// Longest window honoured, larger ones are clamped
pub const MAX_WINDOW: Duration = Duration::from_secs(365 * 24 * 60 * 60);

pub struct RateLimiter {
    entries: DashMap<String, RateLimitEntry>,
    max_requests: u32,
    window: Duration,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self::with_clock(max_requests, window, Arc::new(SystemClock))
    }

    pub fn with_clock(max_requests: u32, window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            max_requests,
            window: window.min(MAX_WINDOW),
            clock,
        }
    }

    // Returns true if the request may proceed
    pub fn allow(&self, client_key: &str) -> bool {
        let now = self.clock.now();
        let reset_at = now.checked_add(self.window).unwrap_or(now);
        let fresh = RateLimitEntry {
            count: 1,
            window_reset_at: reset_at,
        };

        let mut entry = self
            .entries
            .entry(client_key.to_string())
            .or_insert_with(|| RateLimitEntry {
                count: 0,
                window_reset_at: reset_at,
            });

        // first request or window expired..? start over
        if entry.count == 0 || now > entry.window_reset_at {
            *entry = fresh;
            return true;
        }

        if entry.count >= self.max_requests {
            return false;
        }

        entry.count += 1;
        true
    }

    pub fn entry(&self, client_key: &str) -> Option<RateLimitEntry> {
        self.entries.get(client_key).map(|e| *e)
    }

    pub fn tracked_keys(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(60);

    fn limiter(max: u32) -> (RateLimiter, ManualClock) {
        let clock = ManualClock::new();
        let limiter = RateLimiter::with_clock(max, WINDOW, Arc::new(clock.clone()));
        (limiter, clock)
    }

    #[test]
    fn hundred_and_first_request_is_denied() {
        let (limiter, _) = limiter(100);

        for i in 1..=100 {
            assert!(limiter.allow("10.0.0.1"), "request {i} should pass");
        }
        assert!(!limiter.allow("10.0.0.1"));
        assert!(!limiter.allow("10.0.0.1"));
        assert_eq!(limiter.entry("10.0.0.1").map(|e| e.count), Some(100));
    }

    #[test]
    fn keys_have_separate_buckets() {
        let (limiter, _) = limiter(2);

        assert!(limiter.allow("a"));
        assert!(limiter.allow("a"));
        assert!(!limiter.allow("a"));
        assert!(limiter.allow("b"));
        assert_eq!(limiter.tracked_keys(), 2);
    }

    #[test]
    fn window_resets_only_after_reset_time_has_passed() {
        let (limiter, clock) = limiter(1);

        assert!(limiter.allow("k"));
        assert!(!limiter.allow("k"));

        // now == window_reset_at is still inside the window
        clock.advance(WINDOW);
        assert!(!limiter.allow("k"));

        clock.advance(Duration::from_millis(1));
        assert!(limiter.allow("k"));
        assert_eq!(limiter.entry("k").map(|e| e.count), Some(1));
    }

    #[test]
    fn new_window_starts_at_the_resetting_request() {
        let (limiter, clock) = limiter(5);

        assert!(limiter.allow("k"));
        clock.advance(Duration::from_secs(61));
        assert!(limiter.allow("k"));

        let entry = limiter.entry("k").unwrap();
        assert_eq!(entry.window_reset_at, clock.now() + WINDOW);
    }

    #[test]
    fn huge_window_does_not_overflow() {
        let clock = ManualClock::new();
        let limiter = RateLimiter::with_clock(2, Duration::MAX, Arc::new(clock.clone()));

        assert!(limiter.allow("k"));
        assert!(limiter.allow("k"));
        assert!(!limiter.allow("k"));

        let entry = limiter.entry("k").unwrap();
        assert_eq!(entry.window_reset_at, clock.now() + MAX_WINDOW);
    }

    #[test]
    fn boundary_burst_is_admitted() {
        let (limiter, clock) = limiter(3);

        for _ in 0..3 {
            assert!(limiter.allow("k"));
        }
        clock.advance(Duration::from_secs(61));
        for _ in 0..3 {
            assert!(limiter.allow("k"));
        }
        assert!(!limiter.allow("k"));
    }
}
