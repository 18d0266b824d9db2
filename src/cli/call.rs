//! Raw IMS API call dispatcher
//!
//! Linear flow: validate the API path, build the parameter map, resolve the
//! context, obtain a token (refreshing if needed), perform the call, print
//! the JSON result. Failures are wrapped into the user-facing
//! `Failed calling <api>` message; nothing is retried at this layer.

use log::debug;

use crate::config::api;
use crate::context::{resolve_active_context_name, ContextStore};
use crate::error::{ImsError, Result};
use crate::ims::{get_token, CallMethod, ImsClient, ImsTokenClient};
use crate::output::print_json;

use super::common::parse_key_value_pairs;
use super::CallArgs;

/// Run a `get` or `post` API call command
pub async fn run_call_command(
    store: &ContextStore,
    method: CallMethod,
    args: &CallArgs,
    cli_context: Option<&str>,
) -> Result<()> {
    match call_inner(store, method, args, cli_context).await {
        Ok(result) => {
            print_json(&result);
            Ok(())
        }
        Err(e) => Err(ImsError::CallFailed {
            api: args.api.clone(),
            reason: e.to_string(),
        }),
    }
}

async fn call_inner(
    store: &ContextStore,
    method: CallMethod,
    args: &CallArgs,
    cli_context: Option<&str>,
) -> Result<serde_json::Value> {
    // Namespace check comes before any context resolution
    if !args.api.starts_with(api::NAMESPACE_PREFIX) {
        return Err(ImsError::InvalidApi(args.api.clone()));
    }

    let params = parse_key_value_pairs(&args.data)?;

    debug!("API    : {}", args.api);
    debug!("Params : {:?}", params);

    // One resolve inside get_token serves both the token and the base URL
    let name = resolve_active_context_name(cli_context);
    let (ctx, token) = get_token(store, &ImsTokenClient::new(), name.as_deref()).await?;

    let client = ImsClient::new(ctx.base_url(), token);
    client.call(method, &args.api, &params).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn empty_store(dir: &TempDir) -> ContextStore {
        ContextStore::with_path(dir.path().join("config.json"))
    }

    fn call_args(api: &str) -> CallArgs {
        CallArgs {
            api: api.to_string(),
            data: vec![],
        }
    }

    #[tokio::test]
    async fn test_invalid_api_fails_before_context_resolution() {
        // The store is empty; a context lookup would fail with
        // ContextNotConfigured, so getting InvalidApi proves the prefix
        // check runs first.
        let dir = TempDir::new().unwrap();
        let store = empty_store(&dir);

        let result = run_call_command(
            &store,
            CallMethod::Get,
            &call_args("/profile/v1"),
            Some("any"),
        )
        .await;

        match result {
            Err(ImsError::CallFailed { api, reason }) => {
                assert_eq!(api, "/profile/v1");
                assert!(reason.contains("Invalid IMS API '/profile/v1'"));
                assert!(reason.contains("must start with '/ims/'"));
            }
            other => panic!("Expected CallFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unconfigured_context_fails() {
        let dir = TempDir::new().unwrap();
        let store = empty_store(&dir);

        let result = run_call_command(
            &store,
            CallMethod::Get,
            &call_args("/ims/profile/v1"),
            Some("ghost"),
        )
        .await;

        match result {
            Err(ImsError::CallFailed { reason, .. }) => {
                assert!(reason.contains("IMS context 'ghost' is not configured"));
            }
            other => panic!("Expected CallFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_data_pair_fails() {
        let dir = TempDir::new().unwrap();
        let store = empty_store(&dir);
        let args = CallArgs {
            api: "/ims/profile/v1".to_string(),
            data: vec!["broken".to_string()],
        };

        let result = run_call_command(&store, CallMethod::Get, &args, Some("any")).await;

        match result {
            Err(ImsError::CallFailed { reason, .. }) => {
                assert!(reason.contains("expected name=value"));
            }
            other => panic!("Expected CallFailed, got {:?}", other),
        }
    }
}
