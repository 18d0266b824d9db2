//! IMS client module
//!
//! Token cache/validation, refresh-token acquisition and the raw API client.

mod client;
mod exchange;
mod token;

pub use client::{CallMethod, ImsClient};
pub use exchange::ImsTokenClient;
pub use token::{get_token, ExchangedTokens, TokenExchange};

/// Pull a human-readable message out of an IMS error response body.
///
/// IMS error bodies carry `error_description` (and a short `error` code);
/// anything else falls back to the bare status code.
pub(crate) fn api_error_message(status: u16, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(description) = json.get("error_description").and_then(|v| v.as_str()) {
            return description.to_string();
        }
        if let Some(error) = json.get("error").and_then(|v| v.as_str()) {
            return error.to_string();
        }
    }
    format!("HTTP status {}", status)
}
