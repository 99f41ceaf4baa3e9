//! Secondary scanning of linked stylesheets.

use std::collections::BTreeSet;

use pagehaul_page::css_urls;
use pagehaul_resolve::{Resolved, resolve};
use tracing::{debug, warn};

/// Fetch a stylesheet with the authenticated session and return the asset
/// references embedded in it, resolved against the stylesheet's own location
/// (CSS `url()` values are relative to the CSS file, not the page).
///
/// Stylesheets are assumed small and fetched as whole text. Fetch failure is
/// non-fatal: it logs and yields an empty set.
pub async fn scan_stylesheet(client: &reqwest::Client, css_url: &str) -> BTreeSet<String> {
    match fetch_text(client, css_url).await {
        Ok(text) => resolve_css_references(&text, css_url),
        Err(err) => {
            warn!(css_url, %err, "stylesheet fetch failed, skipping");
            BTreeSet::new()
        }
    }
}

async fn fetch_text(client: &reqwest::Client, url: &str) -> reqwest::Result<String> {
    client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
}

/// Extract `url(...)` references from CSS text, resolved against the
/// stylesheet location. Data URIs pass through raw; unresolvable references
/// are dropped with a log line.
pub fn resolve_css_references(css: &str, css_url: &str) -> BTreeSet<String> {
    css_urls(css)
        .into_iter()
        .filter_map(|raw| {
            if raw.starts_with("data:") {
                return Some(raw);
            }
            match resolve(&raw, css_url) {
                Ok(Resolved::Remote(url)) => Some(url.to_string()),
                Ok(Resolved::Inline(_)) => None,
                Err(err) => {
                    debug!(reference = raw, css_url, %err, "unresolvable CSS reference");
                    None
                }
            }
        })
        .collect()
}
