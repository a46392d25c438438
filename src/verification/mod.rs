//! Email verification operations: single addresses and server-side batches.

mod batch;
mod single;

pub(crate) const BATCH_TARGET: &str = "emaillistchecker::batch";
