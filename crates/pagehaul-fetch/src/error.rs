//! Error types for pagehaul-fetch.

use std::io;

use thiserror::Error;

/// Per-reference acquisition failure.
///
/// None of these abort the batch; each is converted into the error field of
/// the reference's [`AcquisitionRecord`](crate::AcquisitionRecord). Probe
/// failures are softer still: they are logged and the download proceeds with
/// an unknown content type, so they never appear here.
#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("resolution failed: {0}")]
    Resolution(#[from] pagehaul_resolve::ResolveError),

    #[error("download failed: {0}")]
    Download(String),

    #[error("truncated body: expected {expected} bytes, wrote {actual}")]
    Truncated { expected: u64, actual: u64 },

    #[error("write failed: {0}")]
    Write(#[source] io::Error),

    #[error("timed out")]
    Timeout,
}

pub type Result<T> = std::result::Result<T, AcquireError>;
