//! Shared error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// Errors raised by `rb-core` primitives.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid score graph: {0}")]
    Graph(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `rb-core`.
pub type CoreResult<T> = Result<T, CoreError>;
