//! Ollama client — local inference over `/api/generate`.
//!
//! DESIGN
//! ======
//! Non-streaming generate calls with a long request timeout (the backend may
//! legitimately take minutes on CPU). When the configured model is missing
//! upstream, the client lists installed models once and retries with the
//! first one sharing the requested base name (the part before the `:` tag),
//! so `mistral` still resolves when only `mistral:7b-instruct` is pulled.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{LlmError, LlmGenerate};
use crate::config::AppConfig;

pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    /// Build a client from the application config.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::HttpClientBuild`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: &AppConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.llm_request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.llm_connect_timeout_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.llm_backend_url.trim_end_matches('/').to_string(),
            model: config.llm_model.clone(),
        })
    }

    /// Configured model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn generate_once(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest { model, prompt, stream: false };

        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.request_error(&e))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::Request(e.to_string()))?;

        if status == 404 && text.contains("not found") {
            return Err(LlmError::ModelNotFound { model: model.to_string() });
        }
        if !(200..300).contains(&status) {
            return Err(LlmError::Backend { status, body: text });
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&text).map_err(|e| LlmError::Request(format!("malformed generate response: {e}")))?;
        if parsed.response.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(parsed.response)
    }

    /// Names of the models installed on the backend.
    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.request_error(&e))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::Request(e.to_string()))?;
        if !(200..300).contains(&status) {
            return Err(LlmError::Backend { status, body: text });
        }

        let parsed: TagsResponse =
            serde_json::from_str(&text).map_err(|e| LlmError::Request(format!("malformed tags response: {e}")))?;
        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }

    fn request_error(&self, e: &reqwest::Error) -> LlmError {
        if e.is_connect() {
            LlmError::Connect { url: self.base_url.clone(), message: e.to_string() }
        } else {
            LlmError::Request(e.to_string())
        }
    }
}

#[async_trait::async_trait]
impl LlmGenerate for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        match self.generate_once(&self.model, prompt).await {
            Err(LlmError::ModelNotFound { model }) => {
                let available = self.list_models().await?;
                let Some(fallback) = fallback_model(&model, &available) else {
                    return Err(LlmError::ModelNotFound { model });
                };
                warn!(requested = %model, fallback = %fallback, "configured model missing, retrying with fallback");
                self.generate_once(&fallback, prompt).await
            }
            other => other,
        }
    }
}

/// Model name without its `:` tag suffix.
fn base_name(model: &str) -> &str {
    model.split(':').next().unwrap_or(model)
}

/// First installed model sharing the requested base name.
fn fallback_model(requested: &str, available: &[String]) -> Option<String> {
    let base = base_name(requested);
    available
        .iter()
        .find(|name| base_name(name) == base)
        .cloned()
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}

#[cfg(test)]
#[path = "ollama_test.rs"]
mod tests;
