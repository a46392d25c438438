//! Configuration, errors and data shapes shared by the client operations.

pub mod config;
pub mod error;
pub mod models;
pub mod options;
