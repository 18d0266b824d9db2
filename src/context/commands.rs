//! Context command handlers

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};

use crate::cli::{parse_key_value_pairs, ContextAction, SetContextArgs};
use crate::error::{ImsError, Result};

use super::models::{Context, TokenRecord};
use super::store::ContextStore;

/// Dispatch context subcommands
pub fn run_context_command(store: &ContextStore, action: &ContextAction) -> Result<()> {
    match action {
        ContextAction::List => run_context_list(store),
        ContextAction::Current => run_context_show(store),
        ContextAction::Use(args) => run_context_use(store, &args.name),
        ContextAction::Set(args) => run_context_set(store, args),
        ContextAction::Delete(args) => run_context_delete(store, &args.name),
    }
}

/// List all contexts
fn run_context_list(store: &ContextStore) -> Result<()> {
    let config = store.load()?;

    if config.contexts.is_empty() {
        println!("No contexts configured.");
        println!("\nUse 'imsctl context set <name> --env <prod|stage> --client-id <ID> --client-secret <SECRET>' to create one.");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("CURRENT"),
            Cell::new("NAME"),
            Cell::new("ENV"),
            Cell::new("CLIENT ID"),
            Cell::new("ACCESS TOKEN"),
            Cell::new("REFRESH TOKEN"),
        ]);

    for (name, ctx) in &config.contexts {
        let is_current = config.current_context.as_ref().is_some_and(|c| c == name);
        let current_marker = if is_current { "*" } else { "" };

        table.add_row(vec![
            Cell::new(current_marker),
            Cell::new(name),
            Cell::new(ctx.env.to_string()),
            Cell::new(&ctx.client_id),
            Cell::new(token_summary(ctx.access_token.as_ref())),
            Cell::new(token_summary(ctx.refresh_token.as_ref())),
        ]);
    }

    println!("{table}");
    Ok(())
}

/// Show the current context details
fn run_context_show(store: &ContextStore) -> Result<()> {
    let config = store.load()?;

    let current_name = config
        .current_context
        .as_ref()
        .ok_or(ImsError::ContextNotConfigured(None))?;

    let ctx = config
        .contexts
        .get(current_name)
        .ok_or_else(|| ImsError::ContextNotConfigured(Some(current_name.clone())))?;

    println!("Current context: {}", current_name);
    println!("  Env:           {}", ctx.env);
    println!("  Client id:     {}", ctx.client_id);
    println!("  Client secret: {}", mask_secret(&ctx.client_secret));
    println!("  Access token:  {}", token_summary(ctx.access_token.as_ref()));
    println!("  Refresh token: {}", token_summary(ctx.refresh_token.as_ref()));

    Ok(())
}

/// Create or update a named context
fn run_context_set(store: &ContextStore, args: &SetContextArgs) -> Result<()> {
    let mut config = store.load()?;

    let access_token = args
        .access_token
        .as_deref()
        .map(TokenRecord::from_jwt)
        .transpose()?;
    let refresh_token = args
        .refresh_token
        .as_deref()
        .map(TokenRecord::from_jwt)
        .transpose()?;

    if let Some(existing) = config.contexts.get_mut(&args.name) {
        // Update existing context - merge provided fields
        if let Some(env) = args.env {
            existing.env = env;
        }
        if let Some(client_id) = &args.client_id {
            existing.client_id = client_id.clone();
        }
        if let Some(client_secret) = &args.client_secret {
            existing.client_secret = client_secret.clone();
        }
        if access_token.is_some() {
            existing.access_token = access_token;
        }
        if refresh_token.is_some() {
            existing.refresh_token = refresh_token;
        }
        for (key, value) in parse_key_value_pairs(&args.extra)? {
            existing.extra.insert(key, value);
        }
        store.save(&config)?;
        println!("✓ Updated context '{}'", args.name);
    } else {
        // Create new context - env and client credentials are required
        let env = args.env.ok_or_else(|| {
            ImsError::Config(format!(
                "--env is required when creating a new context. Usage:\n  \
                 imsctl context set {} --env <prod|stage> --client-id <ID> --client-secret <SECRET>",
                args.name
            ))
        })?;
        let client_id = args.client_id.clone().ok_or_else(|| {
            ImsError::Config("--client-id is required when creating a new context".to_string())
        })?;
        let client_secret = args.client_secret.clone().ok_or_else(|| {
            ImsError::Config("--client-secret is required when creating a new context".to_string())
        })?;

        let ctx = Context {
            env,
            client_id,
            client_secret,
            access_token,
            refresh_token,
            extra: parse_key_value_pairs(&args.extra)?,
        };

        config.contexts.insert(args.name.clone(), ctx);

        // Auto-set current-context if this is the first context
        if config.contexts.len() == 1 {
            config.current_context = Some(args.name.clone());
        }

        store.save(&config)?;
        println!("✓ Created context '{}'", args.name);
    }

    Ok(())
}

/// Switch the active context
fn run_context_use(store: &ContextStore, name: &str) -> Result<()> {
    let mut config = store.load()?;

    if !config.contexts.contains_key(name) {
        return Err(ImsError::ContextNotConfigured(Some(name.to_string())));
    }

    config.current_context = Some(name.to_string());
    store.save(&config)?;
    println!("✓ Switched to context '{}'", name);
    Ok(())
}

/// Delete a named context
fn run_context_delete(store: &ContextStore, name: &str) -> Result<()> {
    let mut config = store.load()?;

    if config.contexts.remove(name).is_none() {
        return Err(ImsError::ContextNotConfigured(Some(name.to_string())));
    }

    // Clear the pointer if it referenced the deleted context
    if config.current_context.as_deref() == Some(name) {
        config.current_context = None;
    }

    store.save(&config)?;
    println!("✓ Deleted context '{}'", name);
    Ok(())
}

/// Mask a secret, keeping a short prefix for recognition.
/// Counted in chars, not bytes, so multi-byte values cannot split.
fn mask_secret(secret: &str) -> String {
    if secret.chars().count() <= 4 {
        return "****".to_string();
    }
    let prefix: String = secret.chars().take(4).collect();
    format!("{}****", prefix)
}

/// One-line token status for display: masked value plus validity
fn token_summary(token: Option<&TokenRecord>) -> String {
    match token {
        None => "<not set>".to_string(),
        Some(t) if t.is_valid() => {
            format!("{} (valid until {})", mask_secret(&t.value), t.expires_at)
        }
        Some(t) => format!("{} (expired {})", mask_secret(&t.value), t.expires_at),
    }
}
