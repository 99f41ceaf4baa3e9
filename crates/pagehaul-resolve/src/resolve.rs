//! Joining raw references against a base location.

use url::Url;

use crate::data_uri::{InlinePayload, decode_data_uri};
use crate::error::{ResolveError, Result};

/// Outcome of resolving one reference: a fetchable absolute location, or the
/// decoded bytes of an inline `data:` payload. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Remote(Url),
    Inline(InlinePayload),
}

impl Resolved {
    pub fn as_remote(&self) -> Option<&Url> {
        match self {
            Resolved::Remote(url) => Some(url),
            Resolved::Inline(_) => None,
        }
    }
}

/// Resolve a raw reference against a base location.
///
/// `data:` references are decoded in place. Everything else goes through
/// standard relative-URL resolution: relative paths, protocol-relative
/// references, and already-absolute locations all normalize to an absolute
/// URL. Fragment identifiers are stripped; they never reach the network.
pub fn resolve(reference: &str, base: &str) -> Result<Resolved> {
    if reference.starts_with("data:") {
        return Ok(Resolved::Inline(decode_data_uri(reference)?));
    }

    let base_url = Url::parse(base).map_err(|source| ResolveError::BaseLocation {
        base: base.to_string(),
        source,
    })?;

    let mut joined = base_url
        .join(reference)
        .map_err(|source| ResolveError::Join {
            reference: reference.to_string(),
            base:      base.to_string(),
            source,
        })?;
    joined.set_fragment(None);

    match joined.scheme() {
        "http" | "https" => Ok(Resolved::Remote(joined)),
        other => Err(ResolveError::UnsupportedScheme(other.to_string())),
    }
}
