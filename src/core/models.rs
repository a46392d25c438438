//! Result shapes returned by the client.
//!
//! Every record decodes leniently: unknown fields are ignored, missing or
//! `null` fields take their default, and unknown enumeration values are kept
//! as passthrough strings instead of failing the whole response.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Defines an enum that decodes from a string, keeping unrecognised values.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, default = $default:ident {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
            /// A value this client version does not know about.
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $text,)+
                    Self::Other(raw) => raw,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                match raw.trim().to_ascii_lowercase().as_str() {
                    $($text => Self::$variant,)+
                    _ => Self::Other(raw),
                }
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::from(raw.to_string())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum! {
    /// Deliverability outcome of a verification.
    Verdict, default = Unknown {
        /// The mailbox exists and accepts mail.
        Deliverable => "deliverable",
        /// The address does not exist or rejects mail.
        Undeliverable => "undeliverable",
        /// The address may accept mail but is unsafe (catch-all, disposable, ...).
        Risky => "risky",
        /// The server could not reach a conclusion.
        Unknown => "unknown",
    }
}

string_enum! {
    /// Lifecycle state of a batch job.
    BatchStatus, default = Pending {
        Pending => "pending",
        Processing => "processing",
        Completed => "completed",
        Failed => "failed",
    }
}

impl Verdict {
    pub fn is_deliverable(&self) -> bool {
        matches!(self, Verdict::Deliverable)
    }
}

impl BatchStatus {
    /// `completed` and `failed` are final; everything else may still change.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BatchStatus::Completed | BatchStatus::Failed)
    }
}

/// Outcome of verifying a single address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationResult {
    #[serde(deserialize_with = "nullable")]
    pub email: String,
    #[serde(deserialize_with = "nullable")]
    pub result: Verdict,
    /// Server reason code, e.g. `VALID` or `INVALID`.
    #[serde(deserialize_with = "nullable")]
    pub reason: String,
    #[serde(deserialize_with = "nullable")]
    pub disposable: bool,
    #[serde(deserialize_with = "nullable")]
    pub role: bool,
    #[serde(deserialize_with = "nullable")]
    pub free: bool,
    /// Deliverability score between 0.0 and 1.0.
    #[serde(deserialize_with = "nullable")]
    pub score: f64,
    #[serde(deserialize_with = "nullable")]
    pub smtp_provider: String,
    #[serde(deserialize_with = "nullable")]
    pub mx_records: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub domain: String,
    #[serde(deserialize_with = "nullable")]
    pub spam_trap: bool,
    #[serde(deserialize_with = "nullable")]
    pub mx_found: bool,
}

/// A server-side bulk verification job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Batch {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub status: BatchStatus,
    /// Completion percentage, 0 to 100.
    #[serde(deserialize_with = "percentage")]
    pub progress: u8,
    #[serde(deserialize_with = "nullable")]
    pub name: Option<String>,
    #[serde(deserialize_with = "counter")]
    pub total_emails: u64,
    #[serde(deserialize_with = "counter")]
    pub processed_emails: u64,
    #[serde(deserialize_with = "counter")]
    pub valid_emails: u64,
    #[serde(deserialize_with = "counter")]
    pub invalid_emails: u64,
    #[serde(deserialize_with = "counter")]
    pub unknown_emails: u64,
    /// Original file name for uploads.
    #[serde(deserialize_with = "nullable")]
    pub filename: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub created_at: Option<String>,
}

impl Batch {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }
}

/// Output format for downloaded batch results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResultsFormat {
    #[default]
    Json,
    Csv,
    Txt,
}

impl ResultsFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ResultsFormat::Json => "json",
            ResultsFormat::Csv => "csv",
            ResultsFormat::Txt => "txt",
        }
    }
}

/// Subset of batch results to download.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResultsFilter {
    #[default]
    All,
    Valid,
    Invalid,
    Risky,
    Unknown,
}

impl ResultsFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            ResultsFilter::All => "all",
            ResultsFilter::Valid => "valid",
            ResultsFilter::Invalid => "invalid",
            ResultsFilter::Risky => "risky",
            ResultsFilter::Unknown => "unknown",
        }
    }
}

/// Downloaded results of a completed batch.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchResults {
    /// Decoded records, for [`ResultsFormat::Json`].
    Records(Vec<VerificationResult>),
    /// Raw export text, for [`ResultsFormat::Csv`] and [`ResultsFormat::Txt`].
    Export(String),
}

impl BatchResults {
    pub fn records(&self) -> Option<&[VerificationResult]> {
        match self {
            BatchResults::Records(records) => Some(records),
            BatchResults::Export(_) => None,
        }
    }

    pub fn into_records(self) -> Option<Vec<VerificationResult>> {
        match self {
            BatchResults::Records(records) => Some(records),
            BatchResults::Export(_) => None,
        }
    }

    pub fn export(&self) -> Option<&str> {
        match self {
            BatchResults::Export(text) => Some(text),
            BatchResults::Records(_) => None,
        }
    }
}

/// An address found by the email finder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoundEmail {
    #[serde(deserialize_with = "nullable")]
    pub email: String,
    /// Confidence from 0 to 100.
    #[serde(deserialize_with = "percentage")]
    pub confidence: u8,
    /// Whether the address is known to the server's database.
    #[serde(deserialize_with = "nullable")]
    pub verified: bool,
    /// Pattern used to build the address, e.g. `{first}.{last}`.
    #[serde(deserialize_with = "nullable")]
    pub pattern: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub alternatives: Vec<String>,
}

/// Addresses known for a domain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainSearch {
    #[serde(deserialize_with = "nullable")]
    pub domain: String,
    #[serde(deserialize_with = "nullable")]
    pub emails: Vec<FoundEmail>,
    #[serde(deserialize_with = "nullable")]
    pub patterns: Vec<String>,
    #[serde(deserialize_with = "counter")]
    pub total_found: u64,
}

/// Addresses and candidate domains for a company name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanySearch {
    #[serde(deserialize_with = "nullable")]
    pub company: String,
    #[serde(deserialize_with = "nullable")]
    pub possible_domains: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub emails: Vec<FoundEmail>,
    #[serde(deserialize_with = "counter")]
    pub total_found: u64,
}

/// Current credit balance. Never cached by the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credits {
    #[serde(deserialize_with = "counter")]
    pub balance: u64,
    #[serde(deserialize_with = "counter")]
    pub used_this_month: u64,
    #[serde(deserialize_with = "nullable")]
    pub plan: String,
}

/// API usage statistics. Counters this client does not model are kept in
/// `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Usage {
    #[serde(deserialize_with = "counter")]
    pub total_requests: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Usage {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// A verification list stored on the account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListSummary {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub status: BatchStatus,
    #[serde(deserialize_with = "counter")]
    pub total_emails: u64,
    #[serde(deserialize_with = "counter")]
    pub valid_emails: u64,
    #[serde(deserialize_with = "counter")]
    pub invalid_emails: u64,
    #[serde(deserialize_with = "nullable")]
    pub created_at: Option<String>,
}

impl ListSummary {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }
}

/// Server acknowledgement of a deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteConfirmation {
    #[serde(deserialize_with = "nullable_true")]
    pub success: bool,
    #[serde(deserialize_with = "nullable")]
    pub message: Option<String>,
}

impl Default for DeleteConfirmation {
    fn default() -> Self {
        Self {
            success: true,
            message: None,
        }
    }
}

/// Parses RFC 3339 timestamps, falling back to `YYYY-MM-DD HH:MM:SS` in UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

/// Ids are opaque: numbers and strings are both kept as text.
fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Reads a non-negative number that may arrive as integer, float or string.
fn numeric(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    number.filter(|n: &f64| n.is_finite())
}

fn counter<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(numeric(&value).map_or(0, |n| n.max(0.0) as u64))
}

fn percentage<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(numeric(&value).map_or(0, |n| n.clamp(0.0, 100.0).round() as u8))
}
