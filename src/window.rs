//! Fixed-window counters for admission control.
//!
//! DESIGN
//! ======
//! One `WindowStore` tracks consumption per opaque string identifier (client
//! key, session id, or user id). The rate limiter and the token quota each
//! own a distinct store; they share the mechanism but never the entries.
//!
//! Windows renew lazily: an entry whose `reset_at` has passed is replaced on
//! the next access, so no background sweep is needed for correctness. The
//! optional [`WindowStore::evict_expired`] sweep only bounds memory.
//!
//! Check-then-consume is a single critical section under one mutex, so two
//! concurrent requests for the same identifier can never both be admitted
//! against the last unit of budget. The lock is never held across an await.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since Unix epoch.
#[must_use]
pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Consumption recorded for one identifier within the current window.
#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    used: u64,
    reset_at: i64,
}

/// Outcome of an admission attempt.
#[derive(Debug, Clone, Copy)]
pub struct Admission {
    pub allowed: bool,
    /// Budget left after this attempt (unchanged on denial).
    pub remaining: u64,
    /// Epoch millis at which the window renews.
    pub reset_at: i64,
}

/// Read-only usage snapshot for one identifier.
#[derive(Debug, Clone, Copy)]
pub struct Usage {
    pub used: u64,
    pub limit: u64,
    pub remaining: u64,
    pub reset_at: i64,
}

pub struct WindowStore {
    window_ms: i64,
    entries: Mutex<HashMap<String, WindowEntry>>,
}

impl WindowStore {
    #[must_use]
    pub fn new(window_ms: i64) -> Self {
        Self { window_ms, entries: Mutex::new(HashMap::new()) }
    }

    /// Atomically check the identifier's window and consume `amount` units
    /// against `limit`. A denial leaves the entry untouched.
    pub fn try_consume(&self, identifier: &str, amount: u64, limit: u64, now: i64) -> Admission {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let entry = entries
            .entry(identifier.to_owned())
            .or_insert(WindowEntry { used: 0, reset_at: now + self.window_ms });
        if entry.reset_at <= now {
            *entry = WindowEntry { used: 0, reset_at: now + self.window_ms };
        }

        let remaining = limit.saturating_sub(entry.used);
        if amount > remaining {
            return Admission { allowed: false, remaining, reset_at: entry.reset_at };
        }

        entry.used += amount;
        Admission { allowed: true, remaining: limit.saturating_sub(entry.used), reset_at: entry.reset_at }
    }

    /// Usage snapshot without consuming. An absent or expired identifier
    /// reports a full budget.
    pub fn usage(&self, identifier: &str, limit: u64, now: i64) -> Usage {
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        match entries.get(identifier) {
            Some(entry) if entry.reset_at > now => Usage {
                used: entry.used,
                limit,
                remaining: limit.saturating_sub(entry.used),
                reset_at: entry.reset_at,
            },
            _ => Usage { used: 0, limit, remaining: limit, reset_at: now + self.window_ms },
        }
    }

    /// Administrative reset: drop the identifier's entry entirely.
    pub fn reset(&self, identifier: &str) {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(identifier);
    }

    /// Drop entries whose window has already expired. Returns the number of
    /// entries removed.
    pub fn evict_expired(&self, now: i64) -> usize {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, entry| entry.reset_at > now);
        before - entries.len()
    }
}

#[cfg(test)]
#[path = "window_test.rs"]
mod tests;
