//! Error types for the COVID-19 dashboard.
//!
//! Request failures (transport, status, body shape) are surfaced to the caller
//! untouched. A missing page element is never an error: render functions
//! silently skip absent targets.

use thiserror::Error;

/// Custom error type for dashboard operations.
///
/// # Rust Concepts
/// - `#[derive(Error)]` from `thiserror` auto-implements `std::error::Error`
/// - `#[from]` implements `From<T>` so `?` converts the source error
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The request never produced a response (DNS, connect, TLS, reset...).
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The response body did not match the expected JSON shape.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Scheduler error: {0}")]
    Scheduler(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// An environment variable held a value we cannot use.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
