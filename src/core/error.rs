//! Defines the error type for the EmailListChecker client and the classifier
//! that turns a failed HTTP exchange into exactly one error kind.

use crate::core::models::BatchStatus;
use chrono::Utc;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io;
use std::time::Duration;
use thiserror::Error;

/// Delay reported by [`Error::RateLimit`] when the server sends no usable
/// `Retry-After` header.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Longest slice of a non-JSON error body that is copied into a message.
const MAX_TEXT_MESSAGE: usize = 200;

/// The single error type returned by every client operation.
///
/// Callers can match on the variant for specific handling, or treat any
/// value as a generic failure through `Display`.
#[derive(Error, Debug)]
pub enum Error {
    /// The client configuration is invalid (missing key, bad base URL, ...).
    #[error("Configuration Error: {0}")]
    Config(String),

    /// The API key is missing, invalid or not allowed to use the endpoint
    /// (HTTP 401 / 403).
    #[error("Authentication Error ({status}): {message}")]
    Authentication {
        /// HTTP status returned by the server.
        status: u16,
        /// Message reported by the server.
        message: String,
    },

    /// The account balance does not cover the request (HTTP 402, or a body
    /// reporting an insufficient balance).
    #[error("Insufficient Credits ({status}): {message}")]
    InsufficientCredits {
        /// HTTP status returned by the server.
        status: u16,
        /// Message reported by the server.
        message: String,
    },

    /// Too many requests (HTTP 429). The client never retries on its own.
    #[error("Rate Limit Exceeded: retry after {secs} seconds", secs = .retry_after.as_secs())]
    RateLimit {
        /// How long the server asked the caller to wait.
        retry_after: Duration,
    },

    /// The request was rejected as invalid, either locally before sending or
    /// by the server (HTTP 422, or 400 with a field error map).
    #[error("Validation Error: {message}")]
    Validation {
        /// HTTP status, `None` when the check happened locally.
        status: Option<u16>,
        /// Human readable summary.
        message: String,
        /// Field name to messages, as reported by the server.
        fields: BTreeMap<String, Vec<String>>,
    },

    /// The addressed resource (batch, list, ...) does not exist (HTTP 404).
    #[error("Not Found: {message}")]
    NotFound {
        /// Message reported by the server.
        message: String,
    },

    /// Results were requested for a batch that has not completed.
    #[error("Batch {batch_id} is not completed (status: {status})")]
    BatchIncomplete {
        /// The batch that was queried.
        batch_id: String,
        /// Last status reported for the batch.
        status: BatchStatus,
    },

    /// Any other non-success HTTP response.
    #[error("API Error ({status}): {message}")]
    Api {
        /// HTTP status returned by the server.
        status: u16,
        /// Message reported by the server, or a generic description.
        message: String,
        /// Parsed JSON body, when the server sent one.
        body: Option<Value>,
    },

    /// The request never produced an HTTP response: connection failure,
    /// TLS failure or timeout.
    #[error("Transport Error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A successful response carried a body that could not be decoded.
    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading a local file (upload or configuration) failed.
    #[error("IO Error: {0}")]
    Io(#[from] io::Error),
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::Config(format!("invalid base URL: {}", err))
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(format!("invalid configuration file: {}", err))
    }
}

impl Error {
    /// Builds a locally detected validation error for a single field.
    pub(crate) fn invalid_argument(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut fields = BTreeMap::new();
        fields.insert(field.to_string(), vec![message.clone()]);
        Error::Validation {
            status: None,
            message,
            fields,
        }
    }

    /// HTTP status code behind this error, if the server answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Authentication { status, .. }
            | Error::InsufficientCredits { status, .. }
            | Error::Api { status, .. } => Some(*status),
            Error::RateLimit { .. } => Some(StatusCode::TOO_MANY_REQUESTS.as_u16()),
            Error::NotFound { .. } => Some(StatusCode::NOT_FOUND.as_u16()),
            Error::Validation { status, .. } => *status,
            Error::Transport(err) => err.status().map(|s| s.as_u16()),
            Error::Config(_) | Error::BatchIncomplete { .. } | Error::Json(_) | Error::Io(_) => {
                None
            }
        }
    }

    /// Delay requested by the server for [`Error::RateLimit`].
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Error::RateLimit { retry_after } => Some(*retry_after),
            _ => None,
        }
    }

    /// True for connectivity and timeout failures, as opposed to API
    /// level rejections.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    /// True when the request was abandoned because the timeout elapsed.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Transport(err) if err.is_timeout())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Maps a non-success HTTP response to its error kind.
///
/// Precedence: 429, then 401/403, then 402 or an insufficient-balance body,
/// then 422 or a 400 carrying an `errors` map, then 404, then everything
/// else. The result depends only on the arguments (and, for an HTTP-date
/// `Retry-After`, on the current time).
pub fn classify(status: StatusCode, headers: &HeaderMap, body: &[u8]) -> Error {
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = parse_retry_after(headers).unwrap_or(DEFAULT_RETRY_AFTER);
        return Error::RateLimit { retry_after };
    }

    let payload: Option<Value> = serde_json::from_slice(body).ok();
    let payload = payload.as_ref();
    let code = status.as_u16();

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Error::Authentication {
            status: code,
            message: error_message(payload, body).unwrap_or_else(|| "Invalid API key".to_string()),
        };
    }

    if status == StatusCode::PAYMENT_REQUIRED || indicates_insufficient_credits(payload) {
        return Error::InsufficientCredits {
            status: code,
            message: error_message(payload, body)
                .unwrap_or_else(|| "Insufficient credits".to_string()),
        };
    }

    let fields = validation_fields(payload);
    if status == StatusCode::UNPROCESSABLE_ENTITY
        || (status == StatusCode::BAD_REQUEST && fields.is_some())
    {
        let fields = fields.unwrap_or_default();
        // 422 bodies carry the summary in `message`, not `error`
        let message = field_str(payload, "message")
            .or_else(|| error_message(payload, body))
            .or_else(|| fields.values().flatten().next().cloned())
            .unwrap_or_else(|| "Validation error".to_string());
        return Error::Validation {
            status: Some(code),
            message,
            fields,
        };
    }

    if status == StatusCode::NOT_FOUND {
        return Error::NotFound {
            message: error_message(payload, body)
                .unwrap_or_else(|| "Resource not found".to_string()),
        };
    }

    Error::Api {
        status: code,
        message: error_message(payload, body).unwrap_or_else(|| format!("API error: {}", code)),
        body: payload.cloned(),
    }
}

/// Reads `Retry-After` as delta-seconds or as an HTTP-date.
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();

    if let Ok(secs) = raw.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    if let Ok(secs) = raw.parse::<f64>() {
        // negative, NaN and out-of-range values fall back to the default
        return Duration::try_from_secs_f64(secs).ok();
    }

    let at = chrono::DateTime::parse_from_rfc2822(raw).ok()?;
    let remaining = at.with_timezone(&Utc) - Utc::now();
    Some(remaining.to_std().unwrap_or(Duration::ZERO))
}

fn field_str(payload: Option<&Value>, key: &str) -> Option<String> {
    payload?
        .get(key)?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Server message: `error` (string or `{message}` object), then `message`,
/// then a short plain-text body.
fn error_message(payload: Option<&Value>, body: &[u8]) -> Option<String> {
    if let Some(p) = payload {
        if let Some(msg) = field_str(Some(p), "error") {
            return Some(msg);
        }
        if let Some(nested) = p.get("error").filter(|v| v.is_object()) {
            if let Some(msg) = field_str(Some(nested), "message") {
                return Some(msg);
            }
        }
        return field_str(Some(p), "message");
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(text.chars().take(MAX_TEXT_MESSAGE).collect())
}

fn indicates_insufficient_credits(payload: Option<&Value>) -> bool {
    if let Some(code) = field_str(payload, "code") {
        if code.eq_ignore_ascii_case("insufficient_credits")
            || code.eq_ignore_ascii_case("insufficient_balance")
        {
            return true;
        }
    }
    ["error", "message"]
        .iter()
        .filter_map(|key| field_str(payload, key))
        .any(|msg| {
            let msg = msg.to_ascii_lowercase();
            msg.contains("insufficient credit") || msg.contains("insufficient balance")
        })
}

fn validation_fields(payload: Option<&Value>) -> Option<BTreeMap<String, Vec<String>>> {
    let errors = payload?.get("errors")?.as_object()?;
    Some(
        errors
            .iter()
            .map(|(field, value)| {
                let messages = match value {
                    Value::Array(items) => items
                        .iter()
                        .map(|item| match item {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                        .collect(),
                    Value::String(s) => vec![s.clone()],
                    other => vec![other.to_string()],
                };
                (field.clone(), messages)
            })
            .collect(),
    )
}
