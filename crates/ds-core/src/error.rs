//! Shared error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` where a core
//! failure can surface (configuration validation, parsing).

use thiserror::Error;

/// The base error type for `ds-core` and a common building block for
/// sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `ds-core`.
pub type CoreResult<T> = Result<T, CoreError>;
