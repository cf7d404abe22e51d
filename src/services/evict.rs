//! Background eviction of expired admission windows.
//!
//! DESIGN
//! ======
//! Window renewal is lazy, so expired entries are only replaced when their
//! identifier comes back. Idle identifiers would otherwise accumulate
//! forever; this task sweeps them on an interval. Session transcripts are
//! deliberately not touched — they live for the process lifetime.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::env_parse;
use crate::state::AppState;
use crate::window::now_ms;

const DEFAULT_EVICT_INTERVAL_SECS: u64 = 300;

/// Spawn the periodic sweep. Returns a handle for shutdown.
pub fn spawn_eviction_task(state: AppState) -> JoinHandle<()> {
    let interval_secs: u64 = env_parse("WINDOW_EVICT_INTERVAL_SECS", DEFAULT_EVICT_INTERVAL_SECS);
    info!(interval_secs, "admission window eviction configured");
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(interval_secs)).await;
            let now = now_ms();
            let rate = state.rate_limiter.evict_expired(now);
            let quota = state.token_quota.evict_expired(now);
            if rate + quota > 0 {
                debug!(rate, quota, "evicted expired admission windows");
            }
        }
    })
}
