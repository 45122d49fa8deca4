//! Workspace base error type.
//!
//! Sub-crates define their own error enums and wrap `WhError` where they need
//! configuration or parse failures from here.

use thiserror::Error;

/// The base error type for `wh-core` and a common building block for sub-crates.
#[derive(Debug, Error)]
pub enum WhError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for all `wh-*` crates.
pub type WhResult<T> = Result<T, WhError>;
