//! Single page-visit orchestration: collect, scan, bridge, acquire, report.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use pagehaul_fetch::{AcquireOptions, Acquirer, ReqwestClient};
use pagehaul_page::{Page, collect_references};
use pagehaul_session::{SessionCredentials, bridge};
use tracing::{debug, info};
use url::Url;

use crate::content::{collect_links, extract_content};
use crate::error::{Result, VisitError};
use crate::manifest::Manifest;
use crate::stylesheet::scan_stylesheet;

#[derive(Debug, Clone)]
pub struct VisitOptions {
    /// Directory downloaded assets are written into.
    pub media_dir:       PathBuf,
    /// Where the JSON manifest lands.
    pub manifest_path:   PathBuf,
    /// Maximum concurrent downloads.
    pub concurrency:     usize,
    /// Timeout applied to each individual HTTP request.
    pub request_timeout: Duration,
    /// Budget for the whole visit; references still pending when it runs
    /// out are recorded as timed out, and the manifest is written anyway.
    pub overall_timeout: Option<Duration>,
}

impl VisitOptions {
    pub fn new(media_dir: impl Into<PathBuf>, manifest_path: impl Into<PathBuf>) -> Self {
        Self {
            media_dir:       media_dir.into(),
            manifest_path:   manifest_path.into(),
            concurrency:     8,
            request_timeout: Duration::from_secs(30),
            overall_timeout: Some(Duration::from_secs(120)),
        }
    }
}

/// Run the full discovery-and-acquisition pipeline against an
/// already-navigated page and write the manifest.
///
/// Per-reference and per-category failures are absorbed into the manifest;
/// the only fatal conditions are an unusable page URL, a session bridge
/// failure, and a manifest that cannot be written.
pub async fn visit_page<P: Page>(
    page: &P,
    page_url: &str,
    credentials: &SessionCredentials,
    options: &VisitOptions,
) -> Result<Manifest> {
    let started = Instant::now();
    let base = Url::parse(page_url).map_err(|source| VisitError::PageUrl {
        url: page_url.to_string(),
        source,
    })?;
    let domain = base.host_str().unwrap_or_default().to_string();

    let collected = collect_references(page, page_url);
    let content = extract_content(page);
    let links = collect_links(page, page_url);
    info!(
        references = collected.references.len(),
        stylesheets = collected.stylesheets.len(),
        "page discovery complete"
    );

    let session = bridge(credentials, options.request_timeout)?;

    let mut references: BTreeSet<String> = collected.references.into_keys().collect();
    for css_url in &collected.stylesheets {
        let found = scan_stylesheet(&session.client, css_url).await;
        debug!(css_url, found = found.len(), "stylesheet scanned");
        references.extend(found);
    }

    // Whatever the discovery phase spent comes out of the batch budget.
    let remaining = options
        .overall_timeout
        .map(|budget| budget.saturating_sub(started.elapsed()));
    let acquirer = Acquirer::new(ReqwestClient::new(session.client.clone()), &options.media_dir)
        .with_options(AcquireOptions {
            concurrency:     options.concurrency,
            overall_timeout: remaining,
        });
    let records = acquirer.acquire_all(references, page_url).await;
    info!(
        downloaded = records.values().filter(|r| r.is_success()).count(),
        failed = records.values().filter(|r| !r.is_success()).count(),
        "acquisition complete"
    );

    let manifest = Manifest::build(page_url, domain, content, &records, links);
    manifest.write(&options.manifest_path).await?;
    Ok(manifest)
}
