//! Context configuration file I/O

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;

use crate::config::context as context_config;
use crate::error::{ImsError, Result};

use super::models::{Context, ContextConfig, TokenRecord};

/// Handles reading and writing the context configuration file
pub struct ContextStore {
    config_path: PathBuf,
}

impl Default for ContextStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextStore {
    /// Create a new store using the default config path (~/.imsctl/config.json),
    /// honoring the IMSCTL_CONFIG override
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a store with a custom config path (for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the config file path: IMSCTL_CONFIG env var, else ~/.imsctl/config.json
    fn default_config_path() -> PathBuf {
        if let Ok(path) = std::env::var(context_config::CONFIG_PATH_ENV_VAR) {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(context_config::DIR_NAME)
            .join(context_config::FILE_NAME)
    }

    /// Load the context configuration from disk.
    /// Returns Default if file doesn't exist, errors on corrupt JSON.
    pub fn load(&self) -> Result<ContextConfig> {
        if !self.config_path.exists() {
            return Ok(ContextConfig::default());
        }

        let content = fs::read_to_string(&self.config_path).map_err(|e| {
            ImsError::Config(format!(
                "Failed to read context config {}: {}",
                self.config_path.display(),
                e
            ))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            ImsError::Config(format!(
                "Failed to parse context config {}: {}",
                self.config_path.display(),
                e
            ))
        })
    }

    /// Save the context configuration to disk.
    ///
    /// The whole record set is replaced atomically: the config is written to
    /// a process-unique temp file and renamed into place, so a concurrent
    /// reader never observes a partial write and two concurrent writers
    /// cannot interleave content.
    pub fn save(&self, config: &ContextConfig) -> Result<()> {
        // Create parent directory if missing
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ImsError::Config(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let json = serde_json::to_string_pretty(config)
            .map_err(|e| ImsError::Config(format!("Failed to serialize context config: {}", e)))?;

        // Unique temp name per save call (pid + sequence) so concurrent
        // refreshes, in-process or across processes, never share an
        // in-flight temp file
        static SAVE_SEQ: AtomicU64 = AtomicU64::new(0);
        let tmp_path = self.config_path.with_extension(format!(
            "json.{}.{}.tmp",
            std::process::id(),
            SAVE_SEQ.fetch_add(1, Ordering::Relaxed)
        ));
        fs::write(&tmp_path, &json).map_err(|e| {
            ImsError::Config(format!(
                "Failed to write temp config file {}: {}",
                tmp_path.display(),
                e
            ))
        })?;

        // Set 0600 permissions on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&tmp_path, permissions).map_err(|e| {
                ImsError::Config(format!("Failed to set permissions on config file: {}", e))
            })?;
        }

        fs::rename(&tmp_path, &self.config_path).map_err(|e| {
            ImsError::Config(format!(
                "Failed to rename temp config file to {}: {}",
                self.config_path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Resolve a named context, falling back to the current-context pointer
    /// when no name is given. Returns the effective name alongside a clone
    /// of the stored record.
    pub fn resolve(&self, name: Option<&str>) -> Result<(String, Context)> {
        let config = self.load()?;

        let name = match name {
            Some(n) => n.to_string(),
            None => config
                .current_context
                .clone()
                .ok_or(ImsError::ContextNotConfigured(None))?,
        };

        match config.contexts.get(&name) {
            Some(ctx) => {
                debug!("Resolved context '{}': env={}", name, ctx.env);
                Ok((name.clone(), ctx.clone()))
            }
            None => Err(ImsError::ContextNotConfigured(Some(name))),
        }
    }

    /// Write refreshed tokens back into a named context.
    ///
    /// Read-modify-write of the whole file; the save is atomic so concurrent
    /// readers of the same context never see a partial update.
    pub fn persist_tokens(
        &self,
        name: &str,
        access_token: TokenRecord,
        refresh_token: Option<TokenRecord>,
    ) -> Result<()> {
        let mut config = self.load()?;

        let ctx = config
            .contexts
            .get_mut(name)
            .ok_or_else(|| ImsError::ContextNotConfigured(Some(name.to_string())))?;

        debug!(
            "Persisting refreshed access token for context '{}' (valid until {})",
            name, access_token.expires_at
        );
        ctx.access_token = Some(access_token);
        if let Some(refresh) = refresh_token {
            debug!("Identity provider rotated the refresh token; persisting it too");
            ctx.refresh_token = Some(refresh);
        }

        self.save(&config)
    }
}
