//! Context configuration data models

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::{endpoints, token as token_config};
use crate::error::ImsError;

/// Top-level context configuration
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct ContextConfig {
    /// Name of the currently active context
    #[serde(rename = "current-context", skip_serializing_if = "Option::is_none")]
    pub current_context: Option<String>,
    /// Map of context name to context configuration
    #[serde(default)]
    pub contexts: BTreeMap<String, Context>,
}

/// IMS environment a context points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ImsEnv {
    Prod,
    Stage,
}

impl ImsEnv {
    /// Base URL of the IMS endpoint for this environment
    pub fn base_url(&self) -> &'static str {
        match self {
            ImsEnv::Prod => endpoints::PROD_BASE_URL,
            ImsEnv::Stage => endpoints::STAGE_BASE_URL,
        }
    }
}

impl std::fmt::Display for ImsEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImsEnv::Prod => write!(f, "prod"),
            ImsEnv::Stage => write!(f, "stage"),
        }
    }
}

/// A named context bundling environment, client credentials and cached tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Context {
    /// IMS environment (prod or stage)
    pub env: ImsEnv,
    /// OAuth client id
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Cached access token, refreshed transparently when expired
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<TokenRecord>,
    /// Refresh token used to mint new access tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<TokenRecord>,
    /// Free-form metadata (e.g. a base_url override for private deployments)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl Context {
    /// Effective IMS base URL: the `extra` override wins over the env default
    pub fn base_url(&self) -> String {
        self.extra
            .get(endpoints::BASE_URL_OVERRIDE_KEY)
            .cloned()
            .unwrap_or_else(|| self.env.base_url().to_string())
    }
}

/// An opaque token value with its declared expiry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenRecord {
    /// Opaque token value (an IMS JWT in practice)
    pub value: String,
    /// Declared expiry timestamp
    pub expires_at: DateTime<Utc>,
}

impl TokenRecord {
    /// A token is usable iff it will still be valid after the safety margin.
    /// A token expiring within the margin counts as already expired, so it
    /// cannot expire mid-call.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - Duration::seconds(token_config::SAFETY_MARGIN_SECS) > now
    }

    /// Convenience wrapper over [`Self::is_valid_at`] using the wall clock
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// Build a record from a raw IMS JWT, deriving the expiry from the
    /// `created_at` and `expires_in` payload claims (both in milliseconds).
    pub fn from_jwt(value: &str) -> Result<Self, ImsError> {
        let payload = value
            .split('.')
            .nth(1)
            .ok_or_else(|| ImsError::Config("Token is not a valid JWT".to_string()))?;

        let decoded = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|e| ImsError::Config(format!("Failed to decode JWT payload: {}", e)))?;

        let claims: serde_json::Value = serde_json::from_slice(&decoded)
            .map_err(|e| ImsError::Config(format!("Failed to parse JWT payload: {}", e)))?;

        let created_at = claim_millis(&claims, "created_at")?;
        let expires_in = claim_millis(&claims, "expires_in")?;

        let expires_at = DateTime::from_timestamp_millis(created_at + expires_in)
            .ok_or_else(|| ImsError::Config("JWT expiry out of range".to_string()))?;

        Ok(Self {
            value: value.to_string(),
            expires_at,
        })
    }
}

/// Read a millisecond claim that IMS encodes either as a number or a string
fn claim_millis(claims: &serde_json::Value, key: &str) -> Result<i64, ImsError> {
    let claim = claims
        .get(key)
        .ok_or_else(|| ImsError::Config(format!("JWT payload is missing '{}'", key)))?;

    match claim {
        serde_json::Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| ImsError::Config(format!("JWT claim '{}' is not an integer", key))),
        serde_json::Value::String(s) => s
            .parse::<i64>()
            .map_err(|_| ImsError::Config(format!("JWT claim '{}' is not an integer", key))),
        _ => Err(ImsError::Config(format!(
            "JWT claim '{}' has an unexpected type",
            key
        ))),
    }
}
