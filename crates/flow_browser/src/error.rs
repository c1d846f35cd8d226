//! Errors surfaced by the browser.
//!
//! - [`IncompleteFilter`] is a local condition: no remote call was made.
//! - [`Remote`] covers transport and server failures while fetching.
//! - [`DataIntegrity`] means the backend sent a type code outside the type
//!   table; it is never coerced into a default.
//! - [`Mutation`] is a failed create/update/delete. Nothing was applied
//!   optimistically, so there is nothing to roll back.
//!
//!  [`IncompleteFilter`]: BrowserError::IncompleteFilter
//!  [`Remote`]: BrowserError::Remote
//!  [`DataIntegrity`]: BrowserError::DataIntegrity
//!  [`Mutation`]: BrowserError::Mutation
use thiserror::Error;

/// Failure reported by a remote call.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RemoteFailure {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    /// The server answered with `success = false`.
    #[error("rejected: {0}")]
    Rejected(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("transport error: {0}")]
    Transport(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BrowserError {
    #[error("date range is incomplete")]
    IncompleteFilter,
    #[error("fetch failed: {0}")]
    Remote(RemoteFailure),
    #[error("unknown transaction type code {code} in row {row_id}")]
    DataIntegrity { code: i64, row_id: i64 },
    #[error("mutation failed: {0}")]
    Mutation(RemoteFailure),
    #[error("record {0} is not on the current page")]
    UnknownRecord(i64),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

impl BrowserError {
    /// Whether the operator should see this error.
    ///
    /// Incomplete filters are expected while the date range is being edited.
    #[must_use]
    pub fn is_surfaced(&self) -> bool {
        !matches!(self, Self::IncompleteFilter)
    }
}
