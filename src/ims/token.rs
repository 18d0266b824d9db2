//! Token cache and validation
//!
//! `get_token` is the single entry point commands use to obtain a bearer
//! token for a context. It reuses a cached access token when still valid,
//! exchanges the refresh token when not, and persists whatever the exchange
//! returns. Note the documented side effect: a successful refresh writes
//! the new record(s) back to the context store.

use chrono::Utc;
use log::debug;

use crate::context::{Context, ContextStore, TokenRecord};
use crate::error::{ImsError, Result};

/// Tokens returned by a successful exchange. The identity provider may
/// rotate the refresh token alongside the new access token.
#[derive(Debug, Clone)]
pub struct ExchangedTokens {
    pub access: TokenRecord,
    pub refresh: Option<TokenRecord>,
}

/// Seam to the token acquisition client.
///
/// The real implementation talks to the IMS token endpoint; tests substitute
/// a mock to assert how often the cache reaches for the network.
#[allow(async_fn_in_trait)]
pub trait TokenExchange {
    /// Exchange the context's refresh token for fresh tokens
    async fn exchange(&self, ctx: &Context) -> Result<ExchangedTokens>;
}

/// Get a usable access token for a context.
///
/// 1. Resolve the context (`ContextNotConfigured` if absent).
/// 2. A valid cached access token is returned as-is, with no network call.
/// 3. Otherwise a valid refresh token is exchanged exactly once and the
///    result persisted before the new access token is returned.
/// 4. With neither token usable, fails with `AuthenticationRequired` and
///    performs no write.
///
/// Returns the resolved context snapshot alongside the token so callers
/// take the base URL and the token from the same config read. The snapshot
/// is as stored; a refresh is reflected on disk, not in the returned value.
pub async fn get_token<E: TokenExchange>(
    store: &ContextStore,
    exchange: &E,
    name: Option<&str>,
) -> Result<(Context, String)> {
    let (name, ctx) = store.resolve(name)?;
    let now = Utc::now();

    if let Some(access) = &ctx.access_token {
        if access.is_valid_at(now) {
            debug!("Reusing cached access token for context '{}'", name);
            let value = access.value.clone();
            return Ok((ctx, value));
        }
        debug!(
            "Access token for context '{}' expired at {} (or falls within the safety margin)",
            name, access.expires_at
        );
    }

    let refresh_valid = ctx
        .refresh_token
        .as_ref()
        .is_some_and(|r| r.is_valid_at(now));
    if !refresh_valid {
        return Err(ImsError::AuthenticationRequired(name));
    }

    debug!("Exchanging refresh token for context '{}'", name);
    let tokens = exchange.exchange(&ctx).await?;
    let value = tokens.access.value.clone();
    store.persist_tokens(&name, tokens.access, tokens.refresh)?;
    Ok((ctx, value))
}
