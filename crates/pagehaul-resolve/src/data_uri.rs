//! Decoding of `data:` URIs into inline payloads.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use percent_encoding::percent_decode_str;

use crate::error::{ResolveError, Result};

/// A decoded `data:` URI: the payload bytes plus the media-type hint from the
/// URI header, if one was present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlinePayload {
    pub media_type: Option<String>,
    pub bytes:      Vec<u8>,
}

/// Decode a `data:` URI.
///
/// The URI is split at the first comma into header and payload. A `;base64`
/// marker in the header selects base64 decoding; otherwise the payload is
/// percent-decoded text. The media-type hint is the header substring between
/// `data:` and the first `;` or the comma.
pub fn decode_data_uri(reference: &str) -> Result<InlinePayload> {
    let rest = reference
        .strip_prefix("data:")
        .ok_or(ResolveError::DataUri("missing data: prefix"))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or(ResolveError::DataUri("no comma separating header and payload"))?;

    let media_type = match header.split(';').next().unwrap_or("") {
        "" => None,
        mt => Some(mt.to_string()),
    };

    let bytes = if header
        .split(';')
        .any(|part| part.eq_ignore_ascii_case("base64"))
    {
        STANDARD.decode(payload).map_err(ResolveError::Base64)?
    } else {
        percent_decode_str(payload).collect()
    };

    Ok(InlinePayload { media_type, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_payload_decodes() {
        let payload = decode_data_uri("data:text/plain;base64,SGVsbG8=").unwrap();
        assert_eq!(payload.bytes, b"Hello");
        assert_eq!(payload.media_type.as_deref(), Some("text/plain"));
    }

    #[test]
    fn plain_payload_is_percent_decoded() {
        let payload = decode_data_uri("data:,Hello%20World").unwrap();
        assert_eq!(payload.bytes, b"Hello World");
        assert_eq!(payload.media_type, None);
    }

    #[test]
    fn media_type_stops_at_semicolon() {
        let payload = decode_data_uri("data:image/svg+xml;charset=utf-8,<svg/>").unwrap();
        assert_eq!(payload.media_type.as_deref(), Some("image/svg+xml"));
        assert_eq!(payload.bytes, b"<svg/>");
    }

    #[test]
    fn missing_comma_is_rejected() {
        assert!(matches!(
            decode_data_uri("data:text/plain;base64"),
            Err(ResolveError::DataUri(_))
        ));
    }

    #[test]
    fn invalid_base64_is_rejected() {
        assert!(matches!(
            decode_data_uri("data:;base64,not!!valid!!"),
            Err(ResolveError::Base64(_))
        ));
    }
}
