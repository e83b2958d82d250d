//! Shared HTTP plumbing for hosted providers
//!
//! Every provider call is a single attempt: transport failures, non-success
//! statuses and undecodable bodies all surface as [`Error::Provider`].

use crate::error::{Error, Provider, Result};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

const ERROR_EXCERPT_CHARS: usize = 200;

/// Build an HTTP client with a fixed per-request timeout
pub fn build_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Parse a base URL so that relative joins append to its path
pub fn base_url(raw: &str) -> std::result::Result<Url, url::ParseError> {
    let raw = raw.trim();
    if raw.ends_with('/') {
        Url::parse(raw)
    } else {
        Url::parse(&format!("{}/", raw))
    }
}

/// Send a request and decode a JSON response body
pub async fn send_json<T: DeserializeOwned>(provider: Provider, request: RequestBuilder) -> Result<T> {
    let response = request
        .send()
        .await
        .map_err(|e| Error::provider(provider, format!("request failed: {}", e)))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| Error::provider(provider, format!("failed to read response: {}", e)))?;
    debug!("{} provider responded {} ({} bytes)", provider, status, body.len());

    if !status.is_success() {
        return Err(Error::provider(
            provider,
            format!("status {}: {}", status.as_u16(), error_excerpt(&body)),
        ));
    }

    serde_json::from_str(&body)
        .map_err(|e| Error::provider(provider, format!("malformed response: {}", e)))
}

/// Pull a readable message out of an error body
///
/// Understands `{"error": {"message": ..}}`, `{"error": ".."}` and
/// `{"message": ..}`; anything else is returned as a truncated raw excerpt.
pub fn error_excerpt(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let message = value
            .pointer("/error/message")
            .or_else(|| value.get("error"))
            .or_else(|| value.get("message"))
            .and_then(Value::as_str);
        if let Some(message) = message {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }
    truncate_chars(trimmed, ERROR_EXCERPT_CHARS)
}

/// Truncate on a char boundary, appending `...` when anything was cut
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
