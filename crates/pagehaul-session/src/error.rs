//! Error types for pagehaul-session.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, SessionError>;
