use reqwest::{Client, Response};
use std::time::Duration;

use crate::error::{RecipeError, RecipeResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared HTTP client for both services.
pub fn http_client() -> Client {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("leftovers/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Falling back to default HTTP client");
            Client::new()
        })
}

/// Returns the response untouched on 2xx, otherwise the classified error.
pub async fn ensure_success(service: &'static str, response: Response) -> RecipeResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let error_body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to read error body".to_string());
    tracing::warn!(service, status = %status, "Upstream request rejected");
    Err(RecipeError::from_status(service, status, error_body))
}

/// Reads a configured key, treating blank values as missing.
pub fn require_key<'a>(key: Option<&'a str>, env_name: &'static str) -> RecipeResult<&'a str> {
    key.map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or(RecipeError::MissingCredential(env_name))
}
