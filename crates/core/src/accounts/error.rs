//! Taxonomy error types.

use thiserror::Error;

/// Errors raised by taxonomy lookups.
///
/// An unknown key means stored data or configuration disagrees with the
/// reference table; it is never the caller's input mistake once data has been
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaxonomyError {
    /// No account type with the given key.
    #[error("Account type not found: {0}")]
    NotFound(String),
}

impl TaxonomyError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "ACCOUNT_TYPE_NOT_FOUND",
        }
    }
}
