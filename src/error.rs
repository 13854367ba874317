//! Error types for the pagesift crate

use thiserror::Error;

/// Result type for pagesift operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for pagesift operations
///
/// Only the primary page fetch is fatal; per-iframe failures are absorbed
/// into inline placeholders and never surface here.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The primary page returned a non-success status
    #[error("fetch failed with status {status} for {url}")]
    Status {
        /// HTTP status code
        status: u16,
        /// URL that produced the status
        url: String,
    },

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}
