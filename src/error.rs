use std::fmt;

/// Failure classification for token-exchange errors.
///
/// Transient failures (timeouts, 5xx) are safe to retry by the caller;
/// permanent failures (revoked or invalid credentials) must not be retried
/// and should send the user back through a login flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeKind {
    Transient,
    Permanent,
}

/// Custom error type for IMS operations
#[derive(Debug)]
pub enum ImsError {
    /// Named context missing from the store, or no current context set
    ContextNotConfigured(Option<String>),
    /// API path does not start with the required /ims/ namespace prefix
    InvalidApi(String),
    /// No valid access or refresh token; user must re-authenticate
    AuthenticationRequired(String),
    /// Identity service returned HTTP 404 for the requested API
    ApiNotFound,
    /// Identity service returned a non-success status
    Api { status: u16, message: String },
    /// HTTP request failed before a response was received
    Transport(reqwest::Error),
    /// Token exchange with the identity provider failed
    Exchange { kind: ExchangeKind, message: String },
    /// Configuration error (store I/O, parse failures, bad input)
    Config(String),
    /// Dispatcher-level wrapper carrying the user-facing failure message
    CallFailed { api: String, reason: String },
}

impl fmt::Display for ImsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImsError::ContextNotConfigured(Some(name)) => {
                write!(f, "IMS context '{}' is not configured", name)
            }
            ImsError::ContextNotConfigured(None) => {
                write!(
                    f,
                    "No IMS context is configured. Use 'imsctl context use <name>' to select one."
                )
            }
            ImsError::InvalidApi(api) => {
                write!(f, "Invalid IMS API '{}' - must start with '/ims/'", api)
            }
            ImsError::AuthenticationRequired(name) => {
                write!(
                    f,
                    "No valid access or refresh token for context '{}'. \
                     Authenticate again and store fresh tokens with 'imsctl context set {}'.",
                    name, name
                )
            }
            ImsError::ApiNotFound => write!(f, "API does not exist"),
            ImsError::Api { message, .. } => write!(f, "{}", message),
            ImsError::Transport(e) => write!(f, "{}", e),
            ImsError::Exchange { kind, message } => {
                let kind = match kind {
                    ExchangeKind::Transient => "transient",
                    ExchangeKind::Permanent => "permanent",
                };
                write!(f, "Token exchange failed ({}): {}", kind, message)
            }
            ImsError::Config(msg) => write!(f, "{}", msg),
            ImsError::CallFailed { api, reason } => {
                write!(f, "Failed calling {}\nReason: {}", api, reason)
            }
        }
    }
}

impl std::error::Error for ImsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImsError::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ImsError {
    fn from(err: reqwest::Error) -> Self {
        ImsError::Transport(err)
    }
}

impl From<serde_json::Error> for ImsError {
    fn from(err: serde_json::Error) -> Self {
        ImsError::Config(format!("JSON error: {}", err))
    }
}

impl From<std::io::Error> for ImsError {
    fn from(err: std::io::Error) -> Self {
        ImsError::Config(err.to_string())
    }
}

/// Result type alias for IMS operations
pub type Result<T> = std::result::Result<T, ImsError>;
