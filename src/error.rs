//! Error types for tinywiki.

use thiserror::Error;

/// Result type alias for tinywiki operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by index loading and article extraction.
///
/// `TitleNotFound` and `ArticleNotFound` are ordinary negative results.
/// Everything else is fatal for the call that produced it, but never for
/// the process: each extraction reports its own failure.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O or decompression failure on the underlying source
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Remote source failure (status, missing headers, exhausted retries)
    #[error("HTTP error: {0}")]
    Http(String),

    /// The markup token stream could not be parsed
    #[error("Malformed markup: {0}")]
    Markup(#[from] quick_xml::Error),

    /// The title is not present in the lookup table
    #[error("Title not found: {0}")]
    TitleNotFound(String),

    /// The segment ended without a page carrying this id
    #[error("Article with id {id} not found in segment")]
    ArticleNotFound {
        /// Internal id that was searched for
        id: String,
    },

    /// The extraction task did not run to completion
    #[error("Extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl Error {
    /// Whether this error is a negative lookup result rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::TitleNotFound(_) | Error::ArticleNotFound { .. })
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Http(e.to_string())
    }
}
