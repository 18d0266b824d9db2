//! Context management module
//!
//! Provides named contexts that bundle an IMS environment, client
//! credentials and cached tokens, with an explicit current-context pointer.

mod commands;
mod models;
mod resolve;
mod store;

pub use commands::run_context_command;
pub use models::{Context, ContextConfig, ImsEnv, TokenRecord};
pub use resolve::resolve_active_context_name;
pub use store::ContextStore;
