//! Client configuration: API location, per-user config directory and the
//! file names shared with earlier versions of the CLI.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::error::AppError;

/// Default platform API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.ufazien.com/api";

/// Overrides the API endpoint.
pub const API_URL_ENV_VAR: &str = "UFAZIEN_API_URL";

/// Overrides the per-user configuration directory (default `~/.ufazien`).
pub const CONFIG_DIR_ENV_VAR: &str = "UFAZIEN_CONFIG_DIR";

/// Name of the configuration directory under the home directory.
pub const CONFIG_DIR_NAME: &str = ".ufazien";

/// Session record inside the configuration directory.
pub const TOKENS_FILE: &str = "tokens.json";

/// Project manifest at the project root.
pub const MANIFEST_FILE: &str = ".ufazien.json";

/// Exclusion patterns at the project root.
pub const IGNORE_FILE: &str = ".ufazienignore";

/// Suffix appended to subdomains when creating a domain.
pub const SUBDOMAIN_SUFFIX: &str = ".ufazien.com";

/// Transport timeout for regular requests. Long enough for large uploads.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Transport timeout for the token refresh call.
pub const REFRESH_TIMEOUT: Duration = Duration::from_secs(10);

/// Delay between two provisioning status checks.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Total time budget for provisioning status checks.
pub const POLL_MAX_WAIT: Duration = Duration::from_secs(60);

/// Resolved client configuration.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// API base URL, always ending in `/api`.
    pub api_url: String,
    /// Directory holding the session record.
    pub config_dir: PathBuf,
    /// Timeout for regular requests.
    pub timeout: Duration,
}

impl PlatformConfig {
    /// Creates a configuration for an explicit API URL and config directory.
    pub fn new(api_url: &str, config_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_url: normalize_api_url(api_url),
            config_dir: config_dir.into(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Resolves the configuration from the environment.
    pub fn from_env() -> Result<Self, AppError> {
        let api_url =
            std::env::var(API_URL_ENV_VAR).unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let config_dir = match std::env::var_os(CONFIG_DIR_ENV_VAR) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::home_dir()
                .map(|home| home.join(CONFIG_DIR_NAME))
                .ok_or_else(|| {
                    AppError::Config("Could not determine the home directory".into())
                })?,
        };

        Ok(Self::new(&api_url, config_dir))
    }

    /// Path of the persisted session record.
    pub fn tokens_path(&self) -> PathBuf {
        self.config_dir.join(TOKENS_FILE)
    }
}

/// Returns the manifest path for a project directory.
pub fn manifest_path(project_dir: &Path) -> PathBuf {
    project_dir.join(MANIFEST_FILE)
}

/// Returns the ignore file path for a project directory.
pub fn ignore_path(project_dir: &Path) -> PathBuf {
    project_dir.join(IGNORE_FILE)
}

/// Makes sure the base URL ends in `/api`.
pub fn normalize_api_url(url: &str) -> String {
    if url.ends_with("/api") {
        url.to_string()
    } else if let Some(stripped) = url.strip_suffix('/') {
        format!("{}/api", stripped)
    } else {
        format!("{}/api", url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_api_url() {
        assert_eq!(
            normalize_api_url("https://api.ufazien.com/api"),
            "https://api.ufazien.com/api"
        );
        assert_eq!(
            normalize_api_url("https://api.ufazien.com/"),
            "https://api.ufazien.com/api"
        );
        assert_eq!(
            normalize_api_url("http://localhost:8000"),
            "http://localhost:8000/api"
        );
    }

    #[test]
    fn test_tokens_path() {
        let config = PlatformConfig::new("http://localhost", "/tmp/ufz");
        assert_eq!(config.tokens_path(), PathBuf::from("/tmp/ufz/tokens.json"));
        assert_eq!(config.api_url, "http://localhost/api");
    }
}
