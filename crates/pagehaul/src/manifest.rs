//! The final page-visit manifest.

use std::collections::BTreeMap;
use std::path::Path;

use pagehaul_fetch::AcquisitionRecord;
use serde::{Deserialize, Serialize};

use crate::content::ContentSection;
use crate::error::{Result, VisitError};

/// Acquisition outcomes keyed by raw reference: a local path for successes,
/// a failure reason for the rest. Every discovered reference appears in
/// exactly one of the two maps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaReport {
    pub downloaded: BTreeMap<String, String>,
    pub errors:     BTreeMap<String, String>,
}

/// Merged discovery and acquisition outcome for one page visit. Built once
/// after every acquisition attempt has completed; never mutated after
/// serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub url:     String,
    pub domain:  String,
    pub content: Vec<ContentSection>,
    pub media:   MediaReport,
    pub links:   Vec<String>,
}

impl Manifest {
    pub fn build(
        url: impl Into<String>,
        domain: impl Into<String>,
        content: Vec<ContentSection>,
        records: &BTreeMap<String, AcquisitionRecord>,
        links: Vec<String>,
    ) -> Self {
        let mut media = MediaReport::default();
        for (reference, record) in records {
            match (&record.destination, &record.error) {
                (Some(path), _) => {
                    media
                        .downloaded
                        .insert(reference.clone(), path.display().to_string());
                }
                (None, Some(reason)) => {
                    media.errors.insert(reference.clone(), reason.clone());
                }
                (None, None) => {
                    media
                        .errors
                        .insert(reference.clone(), "no outcome recorded".to_string());
                }
            }
        }
        Self {
            url: url.into(),
            domain: domain.into(),
            content,
            media,
            links,
        }
    }

    /// Serialize to pretty JSON and write to disk, creating parent
    /// directories as needed.
    pub async fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self)?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(VisitError::Write)?;
        }
        tokio::fs::write(path, json).await.map_err(VisitError::Write)
    }
}
