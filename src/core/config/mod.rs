//! Defines the runtime `ClientConfig` struct, its defaults, and related utilities.
//! Submodules handle loading, building, and validation.

pub(crate) mod builder;
pub(crate) mod file;
pub(crate) mod loading;
pub(crate) mod validation;

pub use builder::ConfigBuilder;
pub use file::ConfigFile;
pub use loading::{default_config_paths, load_config, CONFIG_FILE_NAME};

use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://platform.emaillistchecker.io/api/v1";

/// HTTP timeout applied to every request unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_API_KEY: &str = "EMAILLISTCHECKER_API_KEY";
pub const ENV_BASE_URL: &str = "EMAILLISTCHECKER_BASE_URL";
/// Timeout override, in seconds.
pub const ENV_TIMEOUT: &str = "EMAILLISTCHECKER_TIMEOUT";

pub fn default_user_agent() -> String {
    format!("EmailListChecker-Rust/{}", env!("CARGO_PKG_VERSION"))
}

/// Validated, immutable client settings. Build one with [`ConfigBuilder`].
#[derive(Clone)]
pub struct ClientConfig {
    pub(crate) api_key: String,
    pub(crate) base_url: Url,
    pub(crate) timeout: Duration,
    pub(crate) user_agent: String,
    pub(crate) loaded_config_path: Option<PathBuf>,
}

impl ClientConfig {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// The configuration file the settings were read from, if any.
    pub fn loaded_config_path(&self) -> Option<&Path> {
        self.loaded_config_path.as_deref()
    }
}

/// Shows everything except the API key.
pub(crate) fn redact(key: &str) -> String {
    if key.is_empty() {
        return String::new();
    }
    let visible: String = key.chars().take(4).collect();
    format!("{}****", visible)
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("loaded_config_path", &self.loaded_config_path)
            .finish()
    }
}
