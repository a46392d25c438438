//! # emaillistchecker
//!
//! Client library for the EmailListChecker API: single and batch email
//! verification, email discovery by name, domain or company, credit and
//! usage reporting, and list management.
//!
//! All verification and discovery logic runs on the server. The client
//! authenticates requests, decodes responses into typed records and maps
//! every failure to one [`Error`] variant. It never retries on its own,
//! not even after a [`Error::RateLimit`].
//!
//! ## Example
//!
//! ```no_run
//! use emaillistchecker::{Client, Error, Verdict};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     let client = Client::new("your_api_key")?;
//!
//!     match client.verify("test@example.com").await {
//!         Ok(result) if result.result == Verdict::Deliverable => println!("valid"),
//!         Ok(result) => println!("{}: {}", result.result, result.reason),
//!         Err(Error::RateLimit { retry_after }) => println!("retry in {:?}", retry_after),
//!         Err(e) => return Err(e),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Batches
//!
//! Batch verification is asynchronous on the server only. Submit with
//! [`Client::verify_batch`], then poll [`Client::get_batch_status`] (or
//! [`Client::wait_for_batch`], which polls at a fixed interval you choose)
//! and download with [`Client::get_batch_results`].

mod account;
pub mod client;
pub mod core;
mod finder;
mod verification;

pub use crate::client::Client;
pub use crate::core::config::{ClientConfig, ConfigBuilder, ConfigFile};
pub use crate::core::error::{classify, Error, Result};
pub use crate::core::models::{
    Batch, BatchResults, BatchStatus, CompanySearch, Credits, DeleteConfirmation, DomainSearch,
    FoundEmail, ListSummary, ResultsFilter, ResultsFormat, Usage, Verdict, VerificationResult,
};
pub use crate::core::options::{BatchOptions, VerifyOptions, MAX_BATCH_SIZE};
