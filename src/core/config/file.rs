//! Defines the structure mirroring the TOML configuration file format.
//!
//! ```toml
//! [api]
//! key = "your_api_key"
//! base_url = "https://platform.emaillistchecker.io/api/v1"
//!
//! [network]
//! timeout = 30
//! user_agent = "my-app/1.0"
//! ```

use serde::Deserialize;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub(crate) api: ApiConfig,
    #[serde(default)]
    pub(crate) network: NetworkConfig,
}

#[derive(Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct ApiConfig {
    pub(crate) key: Option<String>,
    pub(crate) base_url: Option<String>,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("key", &self.key.as_deref().map(super::redact))
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct NetworkConfig {
    /// Seconds.
    pub(crate) timeout: Option<u64>,
    pub(crate) user_agent: Option<String>,
}

impl ConfigFile {
    pub fn parse(text: &str) -> crate::core::error::Result<Self> {
        Ok(toml::from_str(text)?)
    }
}
