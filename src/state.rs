//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. All
//! shared components are constructed once by the composition root and
//! Arc-wrapped here — no implicit globals, so the admission counters are
//! visible, injectable, and testable. Clone is required by Axum.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::llm::LlmGenerate;
use crate::quota::TokenQuota;
use crate::rate_limit::RateLimiter;
use crate::services::profile::ProfileStore;
use crate::services::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub rate_limiter: Arc<RateLimiter>,
    pub token_quota: Arc<TokenQuota>,
    pub sessions: Arc<SessionStore>,
    pub profiles: Arc<dyn ProfileStore>,
    pub llm: Arc<dyn LlmGenerate>,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig, llm: Arc<dyn LlmGenerate>, profiles: Arc<dyn ProfileStore>) -> Self {
        let rate_limiter = Arc::new(RateLimiter::new(config.rate_limit_max_requests, config.rate_limit_window_ms));
        let token_quota = Arc::new(TokenQuota::new(config.token_budget, config.token_window_ms));
        Self {
            config: Arc::new(config),
            rate_limiter,
            token_quota,
            sessions: Arc::new(SessionStore::new()),
            profiles,
            llm,
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
