//! Locates and reads the optional TOML configuration file.

use super::{ClientConfig, ConfigBuilder, ConfigFile};
use crate::core::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "emaillistchecker.toml";

/// Candidate locations, in search order: the working directory, then
/// `$HOME/.config/emaillistchecker/config.toml`.
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Ok(home) = std::env::var("HOME") {
        paths.push(
            PathBuf::from(home)
                .join(".config")
                .join("emaillistchecker")
                .join("config.toml"),
        );
    }
    paths
}

fn find_config_file() -> Option<PathBuf> {
    default_config_paths()
        .into_iter()
        .find(|path| path.is_file())
}

pub(crate) fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let text = fs::read_to_string(path)?;
    let file = ConfigFile::parse(&text)?;
    tracing::debug!(
        target: "emaillistchecker::config",
        "Loaded configuration from {}",
        path.display()
    );
    Ok(file)
}

impl ConfigBuilder {
    /// Applies the given configuration file. A missing file is an error.
    pub fn config_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = read_config_file(path)?;
        Ok(self.apply_file(file, Some(path.to_path_buf())))
    }

    /// Applies the first file found in [`default_config_paths`], if any.
    pub fn discover_config_file(self) -> Result<Self> {
        match find_config_file() {
            Some(path) => self.config_file(path),
            None => {
                tracing::debug!(
                    target: "emaillistchecker::config",
                    "No configuration file found, using defaults"
                );
                Ok(self)
            }
        }
    }
}

/// Builds a configuration from a file (the explicit path, or the first
/// default location that exists) overlaid with environment variables.
pub fn load_config(explicit_path: Option<&Path>) -> Result<ClientConfig> {
    let builder = match explicit_path {
        Some(path) => ConfigBuilder::new().config_file(path)?,
        None => ConfigBuilder::new().discover_config_file()?,
    };
    builder.apply_env()?.build()
}
