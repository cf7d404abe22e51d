//! Per-user token quota with debit-on-reserve semantics.
//!
//! DESIGN
//! ======
//! A fixed window per user id (or client key for anonymous callers): 1000
//! tokens per 24 hours by default. An admitted reservation debits the full
//! amount immediately; there is no commit/release step and a failed LLM call
//! does not refund the tokens — quota is spent on attempt, not on success.

use crate::window::{Admission, Usage, WindowStore, now_ms};

pub struct TokenQuota {
    budget: u64,
    window: WindowStore,
}

impl TokenQuota {
    #[must_use]
    pub fn new(budget: u64, window_ms: i64) -> Self {
        Self { budget, window: WindowStore::new(window_ms) }
    }

    /// Check the user's window and debit `tokens_needed` if the budget
    /// covers it. A denial leaves the balance untouched.
    pub fn check_and_reserve(&self, user_id: &str, tokens_needed: u64) -> Admission {
        self.check_and_reserve_at(user_id, tokens_needed, now_ms())
    }

    fn check_and_reserve_at(&self, user_id: &str, tokens_needed: u64, now: i64) -> Admission {
        self.window.try_consume(user_id, tokens_needed, self.budget, now)
    }

    /// Read-only balance snapshot. Absent users report a full budget.
    pub fn remaining(&self, user_id: &str) -> Usage {
        self.window.usage(user_id, self.budget, now_ms())
    }

    /// Administrative reset for one user.
    pub fn reset(&self, user_id: &str) {
        self.window.reset(user_id);
    }

    /// Configured per-window token budget.
    #[must_use]
    pub fn budget(&self) -> u64 {
        self.budget
    }

    /// Drop expired windows; returns how many were removed.
    pub fn evict_expired(&self, now: i64) -> usize {
        self.window.evict_expired(now)
    }
}

#[cfg(test)]
#[path = "quota_test.rs"]
mod tests;
