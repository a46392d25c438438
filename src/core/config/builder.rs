//! Fluent construction of a `ClientConfig`, layering file, environment and
//! explicit settings.

use super::file::ConfigFile;
use super::validation;
use super::{
    default_user_agent, ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, ENV_API_KEY,
    ENV_BASE_URL, ENV_TIMEOUT,
};
use crate::core::error::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Collects settings; later calls override earlier ones.
#[derive(Default, Clone)]
pub struct ConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    loaded_config_path: Option<PathBuf>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout_secs(self, secs: u64) -> Self {
        self.timeout(Duration::from_secs(secs))
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Applies every value present in a parsed configuration file.
    pub fn apply_file(mut self, file: ConfigFile, path: Option<PathBuf>) -> Self {
        if let Some(key) = file.api.key {
            self.api_key = Some(key);
        }
        if let Some(base_url) = file.api.base_url {
            self.base_url = Some(base_url);
        }
        if let Some(secs) = file.network.timeout {
            self.timeout = Some(Duration::from_secs(secs));
        }
        if let Some(user_agent) = file.network.user_agent {
            self.user_agent = Some(user_agent);
        }
        if path.is_some() {
            self.loaded_config_path = path;
        }
        self
    }

    /// Applies `EMAILLISTCHECKER_*` environment variables.
    pub fn apply_env(self) -> Result<Self> {
        self.apply_env_with(|name| std::env::var(name).ok())
    }

    /// Same as [`ConfigBuilder::apply_env`] with a custom variable lookup.
    pub fn apply_env_with<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.base_url = Some(base_url);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT) {
            let secs: u64 = raw.trim().parse().map_err(|e| {
                Error::Config(format!("{} must be a number of seconds: {}", ENV_TIMEOUT, e))
            })?;
            self.timeout = Some(Duration::from_secs(secs));
        }
        Ok(self)
    }

    /// Validates the collected settings.
    pub fn build(self) -> Result<ClientConfig> {
        let api_key = validation::validate_api_key(self.api_key)?;
        let base_url =
            validation::parse_base_url(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;
        let timeout = validation::validate_timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))?;
        let user_agent =
            validation::validate_user_agent(self.user_agent.unwrap_or_else(default_user_agent))?;

        let config = ClientConfig {
            api_key,
            base_url,
            timeout,
            user_agent,
            loaded_config_path: self.loaded_config_path,
        };
        tracing::debug!(
            target: "emaillistchecker::config",
            "Built client configuration: {:?}",
            config
        );
        Ok(config)
    }
}

impl std::fmt::Debug for ConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigBuilder")
            .field("api_key", &self.api_key.as_deref().map(super::redact))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("loaded_config_path", &self.loaded_config_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn explicit_settings_are_kept() {
        let config = ConfigBuilder::new()
            .api_key("key")
            .base_url("http://127.0.0.1:9000/api/v1/")
            .timeout_secs(3)
            .user_agent("tests/1.0")
            .build()
            .unwrap();
        assert_eq!(config.base_url().as_str(), "http://127.0.0.1:9000/api/v1");
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert_eq!(config.user_agent(), "tests/1.0");
    }

    #[test]
    fn missing_key_fails_to_build() {
        let err = ConfigBuilder::new().build().unwrap_err();
        assert!(err.to_string().contains(ENV_API_KEY));
    }

    #[test]
    fn environment_overrides_file_values() {
        let file = ConfigFile::parse(
            "[api]\nkey = \"from-file\"\n[network]\ntimeout = 12\n",
        )
        .unwrap();
        let vars = env(&[(ENV_API_KEY, "from-env"), (ENV_TIMEOUT, "")]);

        let config = ConfigBuilder::new()
            .apply_file(file, Some(PathBuf::from("emaillistchecker.toml")))
            .apply_env_with(|name| vars.get(name).cloned())
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.api_key(), "from-env");
        assert_eq!(config.timeout(), Duration::from_secs(12));
        assert_eq!(
            config.loaded_config_path(),
            Some(std::path::Path::new("emaillistchecker.toml"))
        );
    }

    #[test]
    fn malformed_timeout_variable_is_a_config_error() {
        let vars = env(&[(ENV_TIMEOUT, "thirty")]);
        let err = ConfigBuilder::new()
            .apply_env_with(|name| vars.get(name).cloned())
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
