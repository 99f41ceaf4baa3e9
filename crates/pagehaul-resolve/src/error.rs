//! Error types for pagehaul-resolve.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("malformed data URI: {0}")]
    DataUri(&'static str),

    #[error("invalid base64 payload: {0}")]
    Base64(#[source] base64::DecodeError),

    #[error("invalid base location {base:?}: {source}")]
    BaseLocation {
        base:   String,
        #[source]
        source: url::ParseError,
    },

    #[error("cannot resolve {reference:?} against {base:?}: {source}")]
    Join {
        reference: String,
        base:      String,
        #[source]
        source:    url::ParseError,
    },

    #[error("unsupported scheme {0:?}")]
    UnsupportedScheme(String),
}

pub type Result<T> = std::result::Result<T, ResolveError>;
