//! Chat pipeline — admission control in front of the LLM backend.
//!
//! DESIGN
//! ======
//! Every question runs the same ordered stages: rate limit → validation →
//! session append → prompt assembly → token-quota reservation → LLM call →
//! sanitization → session append. A failure at any stage short-circuits with
//! no further mutation; the only state already committed is whatever earlier
//! stages legitimately wrote (the user turn stays recorded when the LLM call
//! fails, and reserved tokens are not refunded).
//!
//! CONCURRENCY
//! ===========
//! Counter checks are atomic inside their stores. No store lock is held
//! across the LLM await; the call itself is bounded only by the HTTP client
//! timeout.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::llm::LlmError;
use crate::services::profile::profile_context;
use crate::services::prompt::build_prompt;
use crate::services::sanitize::strip_prefatory;
use crate::services::session::TurnRole;
use crate::state::AppState;
use crate::window::now_ms;

const MAX_QUESTION_CHARS: usize = 500;
const MIN_QUESTION_CHARS: usize = 3;
const MIN_REQUEST_TOKENS: u64 = 10;
const RESPONSE_TOKEN_ALLOWANCE: u64 = 150;

const FORBIDDEN_PATTERNS: [&str; 5] = [
    r"ignore.*instruction",
    r"override.*prompt",
    r"system.*message",
    r"admin.*command",
    r"bypass.*rule",
];

fn forbidden_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        FORBIDDEN_PATTERNS
            .iter()
            .map(|p| Regex::new(&format!("(?i){p}")).expect("forbidden pattern"))
            .collect()
    })
}

// =============================================================================
// TYPES
// =============================================================================

/// Caller identity resolved by the transport layer.
#[derive(Debug, Clone)]
pub struct Caller {
    /// Opaque authenticated user id, when upstream auth provided one.
    pub user_id: Option<String>,
    /// Rate-limit key derived from session id or network origin. Never empty.
    pub client_key: String,
}

impl Caller {
    /// Session id: the authenticated user id, else the client key.
    #[must_use]
    pub fn session_id(&self) -> &str {
        self.user_id.as_deref().unwrap_or(&self.client_key)
    }
}

/// Rate-limit metadata attached to every chat response.
#[derive(Debug, Clone, Copy)]
pub struct RateInfo {
    pub limit: u64,
    pub remaining: u64,
    pub reset_at: i64,
}

/// Successful pipeline outcome.
#[derive(Debug)]
pub struct ChatReply {
    pub answer: String,
    pub rate: RateInfo,
}

#[derive(Debug, thiserror::Error)]
pub enum ChatErrorKind {
    #[error("Rate limit exceeded. Try again in {retry_secs} seconds.")]
    RateLimited { retry_secs: i64, remaining: u64, reset_at: i64 },

    #[error("Missing or invalid question")]
    MissingQuestion,

    #[error("Invalid input detected. Please rephrase your question.")]
    ForbiddenInput,

    #[error("What can I help you with today?")]
    TooShort,

    #[error("Token quota exhausted. Please wait for quota to reset or contact support to increase your limit.")]
    QuotaExhausted { remaining: u64, reset_at: i64 },

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Pipeline failure plus whatever rate-limit metadata was already
/// established when the stage failed.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct ChatError {
    pub kind: ChatErrorKind,
    pub rate: Option<RateInfo>,
}

impl ChatError {
    fn at_stage(kind: ChatErrorKind, rate: RateInfo) -> Self {
        Self { kind, rate: Some(rate) }
    }
}

// =============================================================================
// PIPELINE
// =============================================================================

/// Run one question through the admission pipeline.
///
/// # Errors
///
/// Returns a [`ChatError`] carrying the user-facing message for the failed
/// stage; see [`ChatErrorKind`] for the status each maps to.
pub async fn handle_chat(state: &AppState, caller: &Caller, question: Option<&Value>) -> Result<ChatReply, ChatError> {
    // Admission: per-client request window.
    let decision = state.rate_limiter.check(&caller.client_key);
    let rate = RateInfo {
        limit: state.rate_limiter.limit(),
        remaining: decision.remaining,
        reset_at: decision.reset_at,
    };
    if !decision.allowed {
        debug!(client = %caller.client_key, "chat: rate limited");
        let retry_secs = ((decision.reset_at - now_ms()).max(0) as u64).div_ceil(1000) as i64;
        return Err(ChatError::at_stage(
            ChatErrorKind::RateLimited {
                retry_secs,
                remaining: decision.remaining,
                reset_at: decision.reset_at,
            },
            rate,
        ));
    }

    // Validation: the question must be a string, free of injection bait,
    // and still meaningful after trim + truncation.
    let Some(Value::String(question)) = question else {
        return Err(ChatError::at_stage(ChatErrorKind::MissingQuestion, rate));
    };
    if forbidden_patterns().iter().any(|re| re.is_match(question)) {
        debug!(client = %caller.client_key, "chat: forbidden pattern in question");
        return Err(ChatError::at_stage(ChatErrorKind::ForbiddenInput, rate));
    }
    let sanitized: String = question.trim().chars().take(MAX_QUESTION_CHARS).collect();
    if sanitized.chars().count() < MIN_QUESTION_CHARS {
        return Err(ChatError::at_stage(ChatErrorKind::TooShort, rate));
    }

    // Context: record the question, then assemble the prompt from the full
    // transcript and the caller's platform profile.
    let session_id = caller.session_id().to_owned();
    state.sessions.append(&session_id, TurnRole::User, &sanitized);
    let transcript = state.sessions.context(&session_id);
    let profile = caller
        .user_id
        .as_deref()
        .and_then(|id| state.profiles.profile_of(id));
    let prompt = build_prompt(profile.as_ref(), &profile_context(profile.as_ref()), &transcript, &sanitized);

    // Admission: token budget. The estimate is a heuristic (chars/4 plus a
    // flat response allowance), debited in full up front.
    let tokens_needed = estimate_tokens(&sanitized);
    let quota = state.token_quota.check_and_reserve(&session_id, tokens_needed);
    if !quota.allowed {
        info!(session = %session_id, tokens_needed, remaining = quota.remaining, "chat: token quota exhausted");
        return Err(ChatError::at_stage(
            ChatErrorKind::QuotaExhausted { remaining: quota.remaining, reset_at: quota.reset_at },
            rate,
        ));
    }

    // The expensive call. Reserved tokens stay spent on failure, and the bot
    // turn is only recorded on success.
    let raw = match state.llm.generate(&prompt).await {
        Ok(text) => text,
        Err(e) => {
            warn!(session = %session_id, error = %e, "chat: LLM call failed");
            return Err(ChatError::at_stage(e.into(), rate));
        }
    };

    let answer = strip_prefatory(&raw);
    state.sessions.append(&session_id, TurnRole::Bot, &answer);

    info!(session = %session_id, tokens_needed, answer_len = answer.len(), "chat: answered");
    Ok(ChatReply { answer, rate })
}

/// Token estimate for admission: `ceil(chars/4)` with a floor of 10, plus a
/// flat allowance for the anticipated response.
fn estimate_tokens(question: &str) -> u64 {
    let chars = question.chars().count() as u64;
    chars.div_ceil(4).max(MIN_REQUEST_TOKENS) + RESPONSE_TOKEN_ALLOWANCE
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
