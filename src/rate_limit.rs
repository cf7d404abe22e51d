//! Per-client request rate limiting.
//!
//! DESIGN
//! ======
//! A fixed window per client key (session id or IP): 20 requests per minute
//! by default. Each check either admits and consumes one request or denies
//! without consuming. Denials are ordinary decisions, not errors — the chat
//! pipeline maps them to a 429 payload.

use crate::window::{Admission, Usage, WindowStore, now_ms};

pub struct RateLimiter {
    max_requests: u64,
    window: WindowStore,
}

impl RateLimiter {
    #[must_use]
    pub fn new(max_requests: u64, window_ms: i64) -> Self {
        Self { max_requests, window: WindowStore::new(window_ms) }
    }

    /// Check the identifier's window and record the request if admitted.
    pub fn check(&self, identifier: &str) -> Admission {
        self.check_at(identifier, now_ms())
    }

    fn check_at(&self, identifier: &str, now: i64) -> Admission {
        self.window.try_consume(identifier, 1, self.max_requests, now)
    }

    /// Read-only usage snapshot. Absent identifiers report a full budget.
    pub fn stats(&self, identifier: &str) -> Usage {
        self.window.usage(identifier, self.max_requests, now_ms())
    }

    /// Administrative reset for one identifier.
    pub fn reset(&self, identifier: &str) {
        self.window.reset(identifier);
    }

    /// Configured per-window request limit.
    #[must_use]
    pub fn limit(&self) -> u64 {
        self.max_requests
    }

    /// Drop expired windows; returns how many were removed.
    pub fn evict_expired(&self, now: i64) -> usize {
        self.window.evict_expired(now)
    }
}

#[cfg(test)]
#[path = "rate_limit_test.rs"]
mod tests;
