//! Checks applied when a `ConfigBuilder` is turned into a `ClientConfig`.

use crate::core::error::{Error, Result};
use std::time::Duration;
use url::Url;

pub(crate) fn validate_api_key(key: Option<String>) -> Result<String> {
    let key = key.map(|k| k.trim().to_string()).unwrap_or_default();
    if key.is_empty() {
        return Err(Error::Config(format!(
            "an API key is required (set it on the builder, in the config file, or via {})",
            super::ENV_API_KEY
        )));
    }
    if key.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return Err(Error::Config(
            "the API key contains whitespace or control characters".to_string(),
        ));
    }
    Ok(key)
}

/// Parses the base URL, dropping trailing slashes so that endpoint paths
/// are appended to the last segment.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::Config(format!(
            "base URL must use http or https, got '{}'",
            url.scheme()
        )));
    }
    if url.cannot_be_a_base() {
        return Err(Error::Config(format!("{} cannot be a base URL", url)));
    }
    Ok(url)
}

pub(crate) fn validate_timeout(timeout: Duration) -> Result<Duration> {
    if timeout.is_zero() {
        return Err(Error::Config("timeout must be greater than zero".to_string()));
    }
    Ok(timeout)
}

pub(crate) fn validate_user_agent(user_agent: String) -> Result<String> {
    if user_agent.trim().is_empty() || user_agent.chars().any(char::is_control) {
        return Err(Error::Config(
            "user agent must be a non-empty printable string".to_string(),
        ));
    }
    Ok(user_agent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_must_be_present() {
        assert!(validate_api_key(None).is_err());
        assert!(validate_api_key(Some("  ".to_string())).is_err());
        assert!(validate_api_key(Some("ab cd".to_string())).is_err());
        assert_eq!(validate_api_key(Some(" key ".to_string())).unwrap(), "key");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let url = parse_base_url("https://example.com/api/v1/").unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/v1");
    }

    #[test]
    fn base_url_rejects_other_schemes_and_garbage() {
        assert!(matches!(
            parse_base_url("ftp://example.com"),
            Err(Error::Config(_))
        ));
        assert!(matches!(parse_base_url("mailto:x@y.z"), Err(Error::Config(_))));
        assert!(matches!(parse_base_url("not a url"), Err(Error::Config(_))));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(validate_timeout(Duration::ZERO).is_err());
        assert!(validate_timeout(Duration::from_millis(1)).is_ok());
    }
}
