//! Simulator error type.
//!
//! Sub-crates define their own error enums and wrap `FmsError` as one variant
//! where a parameter or I/O problem can surface through them.

use thiserror::Error;

/// The top-level error type for `fms-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum FmsError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `fms-*` crates.
pub type FmsResult<T> = Result<T, FmsError>;
