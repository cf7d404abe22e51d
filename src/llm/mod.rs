//! LLM — adapter for the locally-hosted inference backend.
//!
//! DESIGN
//! ======
//! The chat pipeline depends only on the [`LlmGenerate`] trait, so tests can
//! substitute a mock. The one real implementation is [`ollama::OllamaClient`],
//! which speaks the Ollama generate API.

pub mod ollama;

use async_trait::async_trait;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by LLM backend operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The backend returned a non-success HTTP status.
    #[error("LLM backend error {status}: {body}")]
    Backend { status: u16, body: String },

    /// The backend could not be reached at all.
    #[error("cannot connect to LLM at {url}: {message}")]
    Connect { url: String, message: String },

    /// The requested model is not installed on the backend.
    #[error("model '{model}' not found on the LLM backend")]
    ModelNotFound { model: String },

    /// The backend answered but the generated text was empty.
    #[error("LLM response is empty")]
    EmptyResponse,

    /// The HTTP request failed or the response body was malformed.
    #[error("LLM request error: {0}")]
    Request(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

// =============================================================================
// GENERATE TRAIT
// =============================================================================

/// Async trait for text generation. Enables mocking in tests.
#[async_trait]
pub trait LlmGenerate: Send + Sync {
    /// Send an assembled prompt to the backend and return the generated text.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] when the backend is unreachable, responds with
    /// a non-success status, or produces an empty or malformed body.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}
