//! The authenticated HTTP client shared by every API operation.
//!
//! Operations live next to their domain (`verification`, `finder`,
//! `account`) as further `impl Client` blocks; this module owns request
//! construction, error classification and envelope decoding.

use crate::core::config::{ClientConfig, ConfigBuilder};
use crate::core::error::{classify, Error, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

pub(crate) const HTTP_TARGET: &str = "emaillistchecker::http";

/// Client for the EmailListChecker API.
///
/// Cheap to clone; clones share the connection pool and configuration.
/// Every operation sends exactly one request (except
/// [`Client::wait_for_batch`], which polls) and never retries.
#[derive(Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    http: reqwest::Client,
}

/// Status and body of a completed HTTP exchange.
pub(crate) struct RawResponse {
    pub(crate) status: StatusCode,
    pub(crate) body: Vec<u8>,
}

impl Client {
    /// Creates a client with the default base URL and timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(ConfigBuilder::new().api_key(api_key).build()?)
    }

    /// Creates a client from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the HTTP client cannot be set up with
    /// the configured headers.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key()))
            .map_err(|_| Error::Config("API key is not a valid header value".to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent())
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        tracing::debug!(
            target: HTTP_TARGET,
            "Client ready for {} (timeout {:?})",
            config.base_url(),
            config.timeout()
        );

        Ok(Self {
            config: Arc::new(config),
            http,
        })
    }

    /// Creates a client from the configuration file (explicit path or the
    /// default locations) and `EMAILLISTCHECKER_*` environment variables.
    pub fn from_config_file(path: Option<&Path>) -> Result<Self> {
        Self::with_config(crate::core::config::load_config(path)?)
    }

    /// Creates a client from `EMAILLISTCHECKER_*` environment variables only.
    pub fn from_env() -> Result<Self> {
        Self::with_config(ConfigBuilder::new().apply_env()?.build()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Appends path segments to the base URL; segments are percent-encoded.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.config.base_url().clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("{} cannot be a base URL", self.config.base_url())))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends a request and returns the raw response for a 2xx status.
    /// Any other status is classified into an [`Error`].
    pub(crate) async fn execute<F>(
        &self,
        method: Method,
        url: Url,
        configure: F,
    ) -> Result<RawResponse>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let started = Instant::now();
        tracing::debug!(target: HTTP_TARGET, "{} {}", method, url);

        let request = configure(self.http.request(method.clone(), url.clone()));
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    target: HTTP_TARGET,
                    "{} {} failed after {:.2?}: {}",
                    method,
                    url,
                    started.elapsed(),
                    e
                );
                return Err(Error::Transport(e));
            }
        };

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        tracing::debug!(
            target: HTTP_TARGET,
            "{} {} -> {} ({} bytes) in {:.2?}",
            method,
            url,
            status,
            body.len(),
            started.elapsed()
        );

        if !status.is_success() {
            let err = classify(status, &headers, &body);
            tracing::warn!(target: HTTP_TARGET, "{} {} rejected: {}", method, url, err);
            return Err(err);
        }

        Ok(RawResponse { status, body })
    }

    pub(crate) async fn get_json<T>(&self, segments: &[&str]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        let response = self.execute(Method::GET, url, |r| r).await?;
        decode(&response.body)
    }

    pub(crate) async fn post_json<B, T>(&self, segments: &[&str], body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        let response = self.execute(Method::POST, url, |r| r.json(body)).await?;
        decode(&response.body)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Parses a body as JSON; an empty body reads as `null`.
pub(crate) fn parse_body(body: &[u8]) -> Result<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(body)?)
}

/// Returns the `data` member of an object that has one, otherwise the value
/// itself.
pub(crate) fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

pub(crate) fn decode<T>(body: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let value = unwrap_envelope(parse_body(body)?);
    Ok(serde_json::from_value(value)?)
}
