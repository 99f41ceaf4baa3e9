//! The acquisition engine: per-reference resolve/probe/name/stream pipeline
//! over a bounded worker pool.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures_util::TryStreamExt;
use pagehaul_resolve::{Resolved, resolve};
use tokio::io::AsyncWriteExt;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::{Instant, timeout};
use tracing::{debug, warn};
use url::Url;

use crate::error::{AcquireError, Result};
use crate::http::HttpClient;
use crate::name::{NamePlanner, inline_file_name, remote_file_name};

/// Outcome of one reference's acquisition attempt.
///
/// Exactly one of `destination`/`error` is set once processing completes. A
/// failed attempt may leave a truncated file on disk; `destination` is still
/// `None` and the file is never reported as a success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionRecord {
    pub reference:   String,
    pub destination: Option<PathBuf>,
    pub error:       Option<String>,
}

impl AcquisitionRecord {
    fn success(reference: String, destination: PathBuf) -> Self {
        Self {
            reference,
            destination: Some(destination),
            error: None,
        }
    }

    fn failure(reference: String, reason: String) -> Self {
        Self {
            reference,
            destination: None,
            error: Some(reason),
        }
    }

    pub fn is_success(&self) -> bool {
        self.destination.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct AcquireOptions {
    /// Maximum concurrent downloads.
    pub concurrency:     usize,
    /// Deadline for the whole batch. In-flight work past the deadline is
    /// abandoned; not-yet-started references are recorded as timed out.
    pub overall_timeout: Option<Duration>,
}

impl Default for AcquireOptions {
    fn default() -> Self {
        Self {
            concurrency:     8,
            overall_timeout: None,
        }
    }
}

/// Drives acquisition of a reference set into a destination directory.
pub struct Acquirer<C: HttpClient> {
    client:  Arc<C>,
    planner: Arc<NamePlanner>,
    options: AcquireOptions,
}

impl<C: HttpClient + 'static> Acquirer<C> {
    pub fn new(client: C, media_dir: impl Into<PathBuf>) -> Self {
        Self {
            client:  Arc::new(client),
            planner: Arc::new(NamePlanner::new(media_dir)),
            options: AcquireOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AcquireOptions) -> Self {
        self.options = options;
        self
    }

    /// Acquire every reference, resolving against `base`, and return one
    /// record per unique reference. References are deduplicated by exact
    /// string; downloads run independently with no ordering guarantee, and
    /// the map is only returned once every attempt has completed.
    pub async fn acquire_all(
        &self,
        references: impl IntoIterator<Item = String>,
        base: &str,
    ) -> BTreeMap<String, AcquisitionRecord> {
        let references: BTreeSet<String> = references.into_iter().collect();
        if references.is_empty() {
            return BTreeMap::new();
        }

        if let Err(err) = tokio::fs::create_dir_all(self.planner.dir()).await {
            let reason = AcquireError::Write(err).to_string();
            return references
                .into_iter()
                .map(|r| {
                    let record = AcquisitionRecord::failure(r.clone(), reason.clone());
                    (r, record)
                })
                .collect();
        }

        let deadline = self.options.overall_timeout.map(|t| Instant::now() + t);
        let semaphore = Arc::new(Semaphore::new(self.options.concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for reference in &references {
            let client = Arc::clone(&self.client);
            let planner = Arc::clone(&self.planner);
            let semaphore = Arc::clone(&semaphore);
            let reference = reference.clone();
            let base = base.to_string();

            tasks.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return AcquisitionRecord::failure(
                            reference,
                            AcquireError::Timeout.to_string(),
                        );
                    }
                };
                let outcome = run_within_deadline(&*client, &planner, &reference, &base, deadline)
                    .await;
                match outcome {
                    Ok(path) => AcquisitionRecord::success(reference, path),
                    Err(err) => {
                        warn!(reference = %reference, %err, "acquisition failed");
                        AcquisitionRecord::failure(reference, err.to_string())
                    }
                }
            });
        }

        let mut records = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(record) => {
                    records.insert(record.reference.clone(), record);
                }
                Err(err) => warn!(%err, "acquisition worker failed to join"),
            }
        }
        // Every discovered reference gets an entry, even if its worker died.
        for reference in references {
            records.entry(reference.clone()).or_insert_with(|| {
                AcquisitionRecord::failure(reference, "acquisition worker failed".to_string())
            });
        }
        records
    }
}

async fn run_within_deadline<C: HttpClient>(
    client: &C,
    planner: &NamePlanner,
    reference: &str,
    base: &str,
    deadline: Option<Instant>,
) -> Result<PathBuf> {
    match deadline {
        None => acquire_one(client, planner, reference, base).await,
        Some(deadline) => {
            let now = Instant::now();
            if now >= deadline {
                return Err(AcquireError::Timeout);
            }
            match timeout(deadline - now, acquire_one(client, planner, reference, base)).await {
                Ok(result) => result,
                Err(_) => Err(AcquireError::Timeout),
            }
        }
    }
}

async fn acquire_one<C: HttpClient>(
    client: &C,
    planner: &NamePlanner,
    reference: &str,
    base: &str,
) -> Result<PathBuf> {
    match resolve(reference, base)? {
        Resolved::Inline(payload) => {
            let file_name = inline_file_name(reference, payload.media_type.as_deref());
            let path = planner.claim(&file_name);
            tokio::fs::write(&path, &payload.bytes)
                .await
                .map_err(AcquireError::Write)?;
            debug!(path = %path.display(), "inline payload written");
            Ok(path)
        }
        Resolved::Remote(url) => {
            // Probe failure is non-fatal; the download proceeds with an
            // unknown content type.
            let content_type = match client.probe(url.as_str()).await {
                Ok(info) => info.content_type,
                Err(err) => {
                    debug!(url = %url, %err, "probe failed, content type unknown");
                    None
                }
            };
            let file_name = remote_file_name(&url, content_type.as_deref());
            let path = planner.claim(&file_name);
            stream_to_disk(client, &url, &path).await?;
            Ok(path)
        }
    }
}

/// Stream the response body to disk chunk-by-chunk. A mid-stream failure
/// leaves a truncated file behind; the caller records the reference as an
/// error either way.
async fn stream_to_disk<C: HttpClient>(client: &C, url: &Url, path: &Path) -> Result<()> {
    let mut response = client
        .stream(url.as_str())
        .await
        .map_err(|e| AcquireError::Download(e.to_string()))?;

    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(AcquireError::Write)?;
    let mut written = 0u64;
    while let Some(chunk) = response
        .body
        .try_next()
        .await
        .map_err(|e| AcquireError::Download(e.to_string()))?
    {
        file.write_all(&chunk).await.map_err(AcquireError::Write)?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(AcquireError::Write)?;

    if let Some(expected) = response.content_length
        && expected != written
    {
        return Err(AcquireError::Truncated {
            expected,
            actual: written,
        });
    }
    debug!(url = %url, bytes = written, "download complete");
    Ok(())
}
