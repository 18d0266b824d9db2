//! CLI argument parsing

mod call;
mod common;

use clap::{Args, Parser, Subcommand};

use crate::config::defaults;
use crate::context::ImsEnv;

pub use call::run_call_command;
pub use common::parse_key_value_pairs;

/// Adobe IMS CLI
#[derive(Parser, Debug)]
#[command(name = "imsctl")]
#[command(version)]
#[command(about = "Call Adobe IMS APIs under named authentication contexts", long_about = None)]
pub struct Cli {
    /// Context to operate under (falls back to IMSCTL_CONTEXT, then the
    /// stored current-context)
    #[arg(short = 'c', long, global = true)]
    pub context: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short = 'l', long, default_value = defaults::LOG_LEVEL, global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Call an IMS API with GET; parameters are sent as query string
    Get(CallArgs),
    /// Call an IMS API with POST; parameters are sent as form body
    Post(CallArgs),
    /// Manage named authentication contexts
    Context {
        #[command(subcommand)]
        action: ContextAction,
    },
}

/// Arguments shared by the raw API call commands
#[derive(Args, Debug)]
pub struct CallArgs {
    /// The IMS API to call, for example: /ims/profile/v1
    pub api: String,

    /// Request parameter in the form of name=value. Repeat for multiple
    /// parameters; a duplicated name keeps the last value
    #[arg(short = 'd', long = "data")]
    pub data: Vec<String>,
}

/// Context management subcommands
#[derive(Subcommand, Debug)]
pub enum ContextAction {
    /// List all configured contexts
    List,
    /// Show the current context
    Current,
    /// Switch the current context
    Use(ContextNameArgs),
    /// Create or update a named context
    Set(SetContextArgs),
    /// Delete a named context
    Delete(ContextNameArgs),
}

/// A bare context name argument
#[derive(Args, Debug)]
pub struct ContextNameArgs {
    /// Context name
    pub name: String,
}

/// Arguments for creating or updating a context
#[derive(Args, Debug)]
pub struct SetContextArgs {
    /// Context name
    pub name: String,

    /// IMS environment
    #[arg(long, value_enum)]
    pub env: Option<ImsEnv>,

    /// OAuth client id
    #[arg(long)]
    pub client_id: Option<String>,

    /// OAuth client secret
    #[arg(long)]
    pub client_secret: Option<String>,

    /// Raw IMS access token (JWT); expiry is derived from its payload
    #[arg(long)]
    pub access_token: Option<String>,

    /// Raw IMS refresh token (JWT); expiry is derived from its payload
    #[arg(long)]
    pub refresh_token: Option<String>,

    /// Extra metadata in the form of name=value (e.g. base_url=https://...)
    #[arg(short = 'e', long = "extra")]
    pub extra: Vec<String>,
}
