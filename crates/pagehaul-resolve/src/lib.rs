//! Reference resolution for page assets.
//!
//! A reference is the raw string exactly as it appears in markup or CSS: it
//! may be absolute, relative, protocol-relative, or a `data:` URI. This crate
//! turns a reference plus a base location into something fetchable: either
//! an absolute URL or the decoded bytes of an inline payload.
//!
//! No I/O happens here; everything is pure string/byte transformation.

mod data_uri;
mod error;
mod resolve;

pub use data_uri::InlinePayload;
pub use error::{ResolveError, Result};
pub use resolve::{Resolved, resolve};
