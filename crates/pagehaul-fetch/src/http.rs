//! HTTP client abstraction for asset acquisition.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

/// A boxed stream of response body chunks.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Response metadata from a HEAD-equivalent probe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeInfo {
    pub content_type:   Option<String>,
    pub content_length: Option<u64>,
}

/// An open GET response: the reported body length (when the server sends
/// one) and the body as a chunk stream.
pub struct StreamedBody<E> {
    pub content_length: Option<u64>,
    pub body:           BoxStream<'static, std::result::Result<Bytes, E>>,
}

/// Minimal HTTP surface the acquisition engine needs.
///
/// Implementations handle their own redirect following, timeouts, and
/// cookie state; a non-2xx response status must surface as `Err` from
/// [`HttpClient::stream`].
pub trait HttpClient: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch content metadata without downloading the body.
    fn probe(
        &self,
        url: &str,
    ) -> impl Future<Output = std::result::Result<ProbeInfo, Self::Error>> + Send;

    /// Open a streaming GET to the URL.
    fn stream(
        &self,
        url: &str,
    ) -> impl Future<Output = std::result::Result<StreamedBody<Self::Error>, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use futures_util::StreamExt;

    use super::*;

    /// Production client backed by `reqwest`.
    ///
    /// Built from an already-configured `reqwest::Client` so the session
    /// bridge's cookie jar and user agent carry through unchanged.
    pub struct ReqwestClient {
        client: reqwest::Client,
    }

    impl ReqwestClient {
        pub fn new(client: reqwest::Client) -> Self {
            Self { client }
        }
    }

    fn content_length_of(response: &reqwest::Response) -> Option<u64> {
        response
            .headers()
            .get(reqwest::header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn probe(&self, url: &str) -> std::result::Result<ProbeInfo, Self::Error> {
            let response = self.client.head(url).send().await?.error_for_status()?;
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let content_length = content_length_of(&response);
            Ok(ProbeInfo {
                content_type,
                content_length,
            })
        }

        async fn stream(&self, url: &str) -> std::result::Result<StreamedBody<Self::Error>, Self::Error> {
            let response = self.client.get(url).send().await?.error_for_status()?;
            let content_length = content_length_of(&response);
            let body = response.bytes_stream().boxed();
            Ok(StreamedBody {
                content_length,
                body,
            })
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
