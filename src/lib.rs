//! imsctl - Call Adobe IMS APIs from the command line
//!
//! A CLI tool for invoking raw IMS (identity management service) APIs under
//! named authentication contexts.
//!
//! # Features
//!
//! - Named contexts bundling environment, client credentials and tokens
//! - Transparent access-token reuse and refresh-token exchange
//! - Atomic token persistence safe under concurrent invocations
//! - Raw GET/POST calls to any /ims/ API with repeatable parameters
//!
//! # Example
//!
//! ```bash
//! # Create a context and make it current
//! imsctl context set prod --env prod --client-id <ID> --client-secret <SECRET>
//!
//! # Call an IMS API under the current context
//! imsctl get /ims/profile/v1
//!
//! # Pass request parameters
//! imsctl get /ims/userinfo/v2 -d client_id=<ID>
//!
//! # Use a different context for one call
//! imsctl post /ims/check/v1 -c stage -d token=<TOKEN>
//! ```

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod ims;
pub mod output;

pub use cli::{run_call_command, CallArgs, Cli, Command, ContextAction};
pub use context::{run_context_command, Context, ContextConfig, ContextStore, ImsEnv, TokenRecord};
pub use error::{ExchangeKind, ImsError, Result};
pub use ims::{get_token, CallMethod, ExchangedTokens, ImsClient, ImsTokenClient, TokenExchange};
pub use output::print_json;
