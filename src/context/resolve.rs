//! Active context name resolution from multiple sources

use log::debug;

use crate::config::context as context_config;

/// Resolve the active context name from multiple sources:
/// 1. --context CLI flag
/// 2. IMSCTL_CONTEXT env var
/// 3. current-context from config file (handled by the store itself)
///
/// Returns None when neither flag nor env var names a context; the store's
/// resolve() then falls back to the persisted current-context pointer.
pub fn resolve_active_context_name(cli_context: Option<&str>) -> Option<String> {
    // 1. CLI flag
    if let Some(name) = cli_context {
        debug!("Using context from CLI flag: {}", name);
        return Some(name.to_string());
    }

    // 2. Environment variable
    if let Ok(name) = std::env::var(context_config::ENV_VAR) {
        if !name.is_empty() {
            debug!(
                "Using context from {} env var: {}",
                context_config::ENV_VAR,
                name
            );
            return Some(name);
        }
    }

    None
}
