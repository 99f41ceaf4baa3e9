//! Session bridging from the rendering engine to an independent HTTP client.
//!
//! Some assets sit behind auth-walled CDNs and are only fetchable with the
//! same session the page used. The bridge exports the browser's cookies and
//! user agent into a `reqwest` client so the acquisition engine can fetch
//! those assets outside the browser.

mod error;

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;
use tracing::{debug, warn};
use url::Url;

pub use error::{Result, SessionError};

/// One cookie as reported by the rendering engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserCookie {
    pub name:   String,
    pub value:  String,
    pub domain: Option<String>,
    pub path:   Option<String>,
}

/// Session state captured once per page visit and shared read-only by the
/// acquisition engine for the lifetime of the run.
#[derive(Debug, Clone)]
pub struct SessionCredentials {
    pub cookies:    Vec<BrowserCookie>,
    pub user_agent: String,
}

/// The bridged HTTP client plus the names of cookies that could not be
/// carried over.
#[derive(Debug, Clone)]
pub struct BridgedSession {
    pub client:  reqwest::Client,
    /// Cookies skipped because the engine reported no domain, or a domain
    /// that does not parse as a host; an HTTP client cannot safely guess
    /// their scope.
    pub skipped: Vec<String>,
}

/// Build an HTTP client carrying the browser session's cookies and
/// user agent. Cookie domain/path scoping is preserved exactly as reported;
/// a missing path defaults to `/`, a missing or unusable domain skips the
/// cookie with a recorded warning.
pub fn bridge(credentials: &SessionCredentials, request_timeout: Duration) -> Result<BridgedSession> {
    let jar = Jar::default();
    let mut skipped = Vec::new();

    for cookie in &credentials.cookies {
        let Some(domain) = cookie.domain.as_deref().filter(|d| !d.is_empty()) else {
            warn!(cookie = %cookie.name, "cookie has no domain, not bridging it");
            skipped.push(cookie.name.clone());
            continue;
        };
        let host = domain.trim_start_matches('.');
        let scope = match Url::parse(&format!("https://{host}/")) {
            Ok(scope) => scope,
            Err(err) => {
                warn!(cookie = %cookie.name, domain, %err, "cookie domain is unusable, not bridging it");
                skipped.push(cookie.name.clone());
                continue;
            }
        };
        let path = cookie.path.as_deref().unwrap_or("/");
        jar.add_cookie_str(
            &format!(
                "{}={}; Domain={}; Path={}",
                cookie.name, cookie.value, domain, path
            ),
            &scope,
        );
    }
    debug!(
        bridged = credentials.cookies.len() - skipped.len(),
        skipped = skipped.len(),
        "cookie jar populated"
    );

    let client = reqwest::Client::builder()
        .user_agent(&credentials.user_agent)
        .cookie_provider(Arc::new(jar))
        .timeout(request_timeout)
        .build()
        .map_err(SessionError::Client)?;

    Ok(BridgedSession { client, skipped })
}
