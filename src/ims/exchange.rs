//! Refresh-token exchange against the IMS token endpoint

use chrono::{Duration, Utc};
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use crate::config::api;
use crate::context::{Context, TokenRecord};
use crate::error::{ExchangeKind, ImsError, Result};

use super::api_error_message;
use super::token::{ExchangedTokens, TokenExchange};

/// Token endpoint response
#[derive(Deserialize, Debug)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    /// Access token lifetime in seconds
    expires_in: i64,
}

/// Real token acquisition client talking to the IMS token endpoint.
///
/// Exchanges are idempotent-safe to retry on transient failures, but this
/// client never retries on its own; it only classifies.
pub struct ImsTokenClient {
    client: Client,
}

impl Default for ImsTokenClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ImsTokenClient {
    /// Create a client with a bounded request timeout
    pub fn new() -> Self {
        let client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(api::REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }
}

impl TokenExchange for ImsTokenClient {
    async fn exchange(&self, ctx: &Context) -> Result<ExchangedTokens> {
        let refresh = ctx
            .refresh_token
            .as_ref()
            .ok_or_else(|| ImsError::AuthenticationRequired(ctx.client_id.clone()))?;

        let url = format!("{}{}", ctx.base_url(), api::TOKEN_PATH);
        debug!("Exchanging refresh token at {}", url);

        let form = [
            ("grant_type", "refresh_token"),
            ("client_id", ctx.client_id.as_str()),
            ("client_secret", ctx.client_secret.as_str()),
            ("refresh_token", refresh.value.as_str()),
        ];

        let response = match self.client.post(&url).form(&form).send().await {
            Ok(response) => response,
            // A timed-out or unreachable endpoint is worth retrying by the
            // caller; the exchange itself never got a definitive answer
            Err(e) if e.is_timeout() || e.is_connect() => {
                return Err(ImsError::Exchange {
                    kind: ExchangeKind::Transient,
                    message: e.to_string(),
                });
            }
            Err(e) => return Err(ImsError::Transport(e)),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let kind = if status.is_server_error() {
                ExchangeKind::Transient
            } else {
                // 4xx means the provider rejected the credential itself;
                // retrying cannot succeed, the user must log in again
                ExchangeKind::Permanent
            };
            return Err(ImsError::Exchange {
                kind,
                message: api_error_message(status.as_u16(), &body),
            });
        }

        let token_response: TokenResponse = response.json().await?;
        let now = Utc::now();

        let access = TokenRecord {
            value: token_response.access_token,
            expires_at: now + Duration::seconds(token_response.expires_in),
        };
        // IMS rotates refresh tokens occasionally; when present, the new one
        // inherits a conservative lifetime from the old record
        let refresh = token_response.refresh_token.map(|value| TokenRecord {
            value,
            expires_at: ctx
                .refresh_token
                .as_ref()
                .map(|r| r.expires_at)
                .unwrap_or(now),
        });

        Ok(ExchangedTokens { access, refresh })
    }
}
