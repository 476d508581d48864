//! Comparison datasets from a remote metrics API
//!
//! Observational series fetched here are for side-by-side comparison with
//! simulated runs only; nothing flows back into the engine.

pub mod client;
pub mod frame;
pub mod query;

use thiserror::Error;

pub use client::MetricClient;
pub use frame::{MetricFrame, MetricRow, PageCollector};
pub use query::{FetchOptions, MetricQuery};

/// Errors that can occur while fetching a dataset
#[derive(Debug, Error)]
pub enum FetchError {
    /// Requested API version is not one this client speaks
    #[error("Unsupported API version: {0:?}")]
    UnsupportedApiVersion(String),
    /// A page lacked the `results` list
    #[error("Unexpected payload shape from {url}: keys={keys:?}")]
    PayloadShape { url: String, keys: Vec<String> },
    /// Network failure or non-success HTTP status
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// A `date` cell could not be parsed
    #[error("Invalid date {value:?} in row {row}")]
    InvalidDate { value: String, row: usize },
    /// Writing the fetched table failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
