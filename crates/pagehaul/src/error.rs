//! Error types for pagehaul.

use std::io;

use thiserror::Error;

/// Fatal failures of a page visit.
///
/// Per-reference and per-category failures never show up here; they land in
/// the manifest. Only conditions that make the visit itself meaningless (an
/// unusable page URL, no bridged session, an unwritable manifest) abort.
#[derive(Debug, Error)]
pub enum VisitError {
    #[error("invalid page URL {url:?}: {source}")]
    PageUrl {
        url:    String,
        #[source]
        source: url::ParseError,
    },

    #[error("session bridge failed: {0}")]
    Session(#[from] pagehaul_session::SessionError),

    #[error("manifest serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("manifest write failed: {0}")]
    Write(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, VisitError>;
