//! Application configuration parsed from environment variables.

const DEFAULT_LLM_BACKEND_URL: &str = "http://localhost:11434";
const DEFAULT_LLM_MODEL: &str = "mistral";
const DEFAULT_LLM_REQUEST_TIMEOUT_SECS: u64 = 120;
const DEFAULT_LLM_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u64 = 20;
const DEFAULT_RATE_LIMIT_WINDOW_MS: i64 = 60_000;
const DEFAULT_TOKEN_BUDGET: u64 = 1000;
const DEFAULT_TOKEN_WINDOW_MS: i64 = 86_400_000;
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the Ollama-compatible inference server.
    pub llm_backend_url: String,
    /// Model name requested on each generate call.
    pub llm_model: String,
    pub llm_request_timeout_secs: u64,
    pub llm_connect_timeout_secs: u64,
    /// When set, backend failures surface their real message to callers.
    pub debug: bool,
    pub rate_limit_max_requests: u64,
    pub rate_limit_window_ms: i64,
    pub token_budget: u64,
    pub token_window_ms: i64,
    pub port: u16,
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Recognized:
    /// - `LLM_BACKEND_URL` (default `http://localhost:11434`)
    /// - `LLM_MODEL_NAME` (default `mistral`)
    /// - `LLM_REQUEST_TIMEOUT_SECS` / `LLM_CONNECT_TIMEOUT_SECS`
    /// - `DEBUG` (bool), or `APP_ENV=development`
    /// - `RATE_LIMIT_MAX_REQUESTS` / `RATE_LIMIT_WINDOW_MS`
    /// - `DEFAULT_TOKENS` / `TOKEN_WINDOW_MS`
    /// - `PORT`
    #[must_use]
    pub fn from_env() -> Self {
        let debug = env_bool("DEBUG").unwrap_or(false)
            || std::env::var("APP_ENV").is_ok_and(|v| v.trim() == "development");

        Self {
            llm_backend_url: std::env::var("LLM_BACKEND_URL")
                .unwrap_or_else(|_| DEFAULT_LLM_BACKEND_URL.to_string()),
            llm_model: std::env::var("LLM_MODEL_NAME").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string()),
            llm_request_timeout_secs: env_parse("LLM_REQUEST_TIMEOUT_SECS", DEFAULT_LLM_REQUEST_TIMEOUT_SECS),
            llm_connect_timeout_secs: env_parse("LLM_CONNECT_TIMEOUT_SECS", DEFAULT_LLM_CONNECT_TIMEOUT_SECS),
            debug,
            rate_limit_max_requests: env_parse("RATE_LIMIT_MAX_REQUESTS", DEFAULT_RATE_LIMIT_MAX_REQUESTS),
            rate_limit_window_ms: env_parse("RATE_LIMIT_WINDOW_MS", DEFAULT_RATE_LIMIT_WINDOW_MS),
            token_budget: env_parse("DEFAULT_TOKENS", DEFAULT_TOKEN_BUDGET),
            token_window_ms: env_parse("TOKEN_WINDOW_MS", DEFAULT_TOKEN_WINDOW_MS),
            port: env_parse("PORT", DEFAULT_PORT),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm_backend_url: DEFAULT_LLM_BACKEND_URL.to_string(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            llm_request_timeout_secs: DEFAULT_LLM_REQUEST_TIMEOUT_SECS,
            llm_connect_timeout_secs: DEFAULT_LLM_CONNECT_TIMEOUT_SECS,
            debug: false,
            rate_limit_max_requests: DEFAULT_RATE_LIMIT_MAX_REQUESTS,
            rate_limit_window_ms: DEFAULT_RATE_LIMIT_WINDOW_MS,
            token_budget: DEFAULT_TOKEN_BUDGET,
            token_window_ms: DEFAULT_TOKEN_WINDOW_MS,
            port: DEFAULT_PORT,
        }
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}
