//! Error types for pagehaul-page.

use thiserror::Error;

/// Failure reported by a page or element handle.
///
/// The automation engine behind the handle is opaque here, so failures are
/// carried as strings. Collection treats every variant as non-fatal: the
/// failing category contributes nothing and the rest continue.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("query failed for selector {selector:?}: {reason}")]
    Query { selector: String, reason: String },

    #[error("element access failed: {0}")]
    Element(String),

    #[error("script evaluation failed: {0}")]
    Script(String),
}

pub type Result<T> = std::result::Result<T, PageError>;
