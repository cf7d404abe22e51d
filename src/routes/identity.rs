//! Caller identity extraction.
//!
//! DESIGN
//! ======
//! Authentication is out of scope: the platform edge injects `x-user-id` for
//! authenticated callers, and this extractor simply trusts it. The
//! rate-limit key prefers a session header, then proxy-forwarded addresses,
//! then the socket peer, so one noisy network origin cannot starve everyone
//! behind a shared fallback bucket.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;

use crate::services::chat::Caller;

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self { user_id: header(parts, "x-user-id"), client_key: client_key(parts) })
    }
}

fn header(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Rate-limit key: session id, forwarded address, real-ip, socket peer,
/// else a shared anonymous bucket.
fn client_key(parts: &Parts) -> String {
    if let Some(session) = header(parts, "x-session-id") {
        return format!("session:{session}");
    }
    if let Some(forwarded) = header(parts, "x-forwarded-for") {
        let first = forwarded.split(',').next().unwrap_or("").trim();
        if !first.is_empty() {
            return format!("ip:{first}");
        }
    }
    if let Some(real_ip) = header(parts, "x-real-ip") {
        return format!("ip:{real_ip}");
    }
    if let Some(ConnectInfo(addr)) = parts.extensions.get::<ConnectInfo<SocketAddr>>() {
        return format!("ip:{}", addr.ip());
    }
    "anonymous".to_string()
}

#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;
