//! Error taxonomy for the fetch/refresh engine.
//!
//! Everything short of `Exhausted` is transient: the pager folds transport
//! failures, upstream GraphQL errors, and malformed pages into the same
//! bounded retry loop. `Exhausted` is what a refresh cycle sees when the
//! bound is hit; the refresh loop logs it and keeps the previous snapshot.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level failure (connect, timeout, body decode).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The upstream answered, but with an error status or GraphQL errors.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// The response arrived but does not have the expected page shape.
    #[error("invalid page: {0}")]
    InvalidPage(String),

    /// The retry budget for a single page was consumed.
    #[error("{query}: failed to fetch page after {attempts} attempts")]
    Exhausted { query: &'static str, attempts: u32 },
}

impl FetchError {
    /// Whether the pager should retry after this error.
    pub fn is_transient(&self) -> bool {
        !matches!(self, FetchError::Exhausted { .. })
    }
}
