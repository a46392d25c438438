//! Optional request parameters and the local argument checks shared by the
//! client operations.

use crate::core::error::{Error, Result};
use std::ops::RangeInclusive;
use std::time::Duration;

/// Largest number of addresses accepted in one batch submission.
pub const MAX_BATCH_SIZE: usize = 10_000;

/// Bounds of the server-side verification timeout, in seconds.
pub const VERIFY_TIMEOUT_RANGE: RangeInclusive<u64> = 5..=60;

/// Bounds of the `limit` parameter of the finder endpoints.
pub const FINDER_LIMIT_RANGE: RangeInclusive<u32> = 1..=100;

/// Page size used when the caller does not pick one.
pub const DEFAULT_FINDER_LIMIT: u32 = 10;

/// Options for a single verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyOptions {
    /// Run the SMTP mailbox probe on the server (default `true`).
    pub smtp_check: bool,
    /// How long the server may spend on the address. This is unrelated to
    /// the HTTP timeout of the client.
    pub timeout: Option<Duration>,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            smtp_check: true,
            timeout: None,
        }
    }
}

impl VerifyOptions {
    pub fn smtp_check(mut self, enabled: bool) -> Self {
        self.smtp_check = enabled;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Server timeout in whole seconds, checked against
    /// [`VERIFY_TIMEOUT_RANGE`].
    pub(crate) fn timeout_secs(&self) -> Result<Option<u64>> {
        let Some(timeout) = self.timeout else {
            return Ok(None);
        };
        let secs = timeout.as_secs();
        if !VERIFY_TIMEOUT_RANGE.contains(&secs) {
            return Err(Error::invalid_argument(
                "timeout",
                format!(
                    "Verification timeout must be between {} and {} seconds, got {}",
                    VERIFY_TIMEOUT_RANGE.start(),
                    VERIFY_TIMEOUT_RANGE.end(),
                    secs
                ),
            ));
        }
        Ok(Some(secs))
    }
}

/// Options for a batch submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    pub name: Option<String>,
    /// Webhook the server calls once the batch finishes.
    pub callback_url: Option<String>,
    /// Start verifying immediately (default `true`).
    pub auto_start: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            name: None,
            callback_url: None,
            auto_start: true,
        }
    }
}

impl BatchOptions {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = Some(url.into());
        self
    }

    pub fn auto_start(mut self, enabled: bool) -> Self {
        self.auto_start = enabled;
        self
    }
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid_argument(
            field,
            format!("The {} field must not be empty", field),
        ));
    }
    Ok(())
}

pub(crate) fn require_batch_size(count: usize) -> Result<()> {
    if count == 0 {
        return Err(Error::invalid_argument(
            "emails",
            "A batch must contain at least one email address",
        ));
    }
    if count > MAX_BATCH_SIZE {
        return Err(Error::invalid_argument(
            "emails",
            format!(
                "A batch may contain at most {} email addresses, got {}",
                MAX_BATCH_SIZE, count
            ),
        ));
    }
    Ok(())
}

pub(crate) fn require_finder_limit(limit: u32) -> Result<()> {
    if !FINDER_LIMIT_RANGE.contains(&limit) {
        return Err(Error::invalid_argument(
            "limit",
            format!(
                "Limit must be between {} and {}, got {}",
                FINDER_LIMIT_RANGE.start(),
                FINDER_LIMIT_RANGE.end(),
                limit
            ),
        ));
    }
    Ok(())
}
