/// Configuration constants for the IMS API
pub mod api {
    /// Every callable IMS API path must start with this prefix
    pub const NAMESPACE_PREFIX: &str = "/ims/";

    /// Token endpoint used for refresh-token exchanges
    pub const TOKEN_PATH: &str = "/ims/token/v1";

    /// Request timeout for API and token-exchange calls, in seconds
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
}

/// IMS environment base URLs
pub mod endpoints {
    /// Production IMS endpoint
    pub const PROD_BASE_URL: &str = "https://ims-na1.adobelogin.com";

    /// Stage IMS endpoint
    pub const STAGE_BASE_URL: &str = "https://ims-na1-stg1.adobelogin.com";

    /// Context `extra` key that overrides the environment base URL
    pub const BASE_URL_OVERRIDE_KEY: &str = "base_url";
}

/// Configuration constants for the context store
pub mod context {
    /// Directory under $HOME holding the config file
    pub const DIR_NAME: &str = ".imsctl";

    /// Context configuration file name
    pub const FILE_NAME: &str = "config.json";

    /// Environment variable selecting the active context
    pub const ENV_VAR: &str = "IMSCTL_CONTEXT";

    /// Environment variable overriding the config file path
    pub const CONFIG_PATH_ENV_VAR: &str = "IMSCTL_CONFIG";
}

/// Token validity policy
pub mod token {
    /// Buffer subtracted from a token's declared expiry before comparison,
    /// so a token about to expire is never handed out for a call
    pub const SAFETY_MARGIN_SECS: i64 = 60;
}

/// Default values for CLI
pub mod defaults {
    /// Default log level
    pub const LOG_LEVEL: &str = "warn";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_prefix_format() {
        assert!(api::NAMESPACE_PREFIX.starts_with('/'));
        assert!(api::NAMESPACE_PREFIX.ends_with('/'));
    }

    #[test]
    fn test_token_path_is_namespaced() {
        assert!(api::TOKEN_PATH.starts_with(api::NAMESPACE_PREFIX));
    }

    #[test]
    fn test_endpoint_urls_are_https() {
        assert!(endpoints::PROD_BASE_URL.starts_with("https://"));
        assert!(endpoints::STAGE_BASE_URL.starts_with("https://"));
        assert!(!endpoints::PROD_BASE_URL.ends_with('/'));
        assert!(!endpoints::STAGE_BASE_URL.ends_with('/'));
    }

    #[test]
    fn test_safety_margin_is_positive() {
        assert!(token::SAFETY_MARGIN_SECS > 0);
    }
}
