//! Filename derivation and collision-safe name planning.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use sha2::{Digest, Sha256};
use url::Url;

const FALLBACK_EXTENSION: &str = ".bin";
const HASH_STEM_LEN: usize = 16;

/// Replace every character outside `[A-Za-z0-9._-]` with `_`.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Stable short identifier for a reference: first 16 hex chars of its sha256.
pub fn hash_stem(input: &str) -> String {
    let digest = hex::encode(Sha256::digest(input.as_bytes()));
    digest[..HASH_STEM_LEN].to_string()
}

/// Canonical extension (with leading dot) for a media type, if one maps.
pub fn extension_for(media_type: Option<&str>) -> Option<String> {
    let essence = media_type?.split(';').next()?.trim();
    let candidates = mime_guess::get_mime_extensions_str(essence)?;
    candidates.first().map(|ext| format!(".{ext}"))
}

fn split_extension(name: &str) -> (&str, &str) {
    // A leading dot is a hidden-file marker, not an extension separator.
    match name.rfind('.').filter(|&idx| idx > 0) {
        Some(idx) => name.split_at(idx),
        None => (name, ""),
    }
}

/// Filename for a network location: the last path segment when it carries an
/// extension, otherwise a hash of the absolute location plus the extension
/// inferred from the probed content type.
pub fn remote_file_name(url: &Url, content_type: Option<&str>) -> String {
    let segment = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
        .unwrap_or("");

    if !segment.is_empty() && split_extension(segment).1.len() > 1 {
        return sanitize(segment);
    }

    let ext = extension_for(content_type).unwrap_or_else(|| FALLBACK_EXTENSION.to_string());
    format!("{}{ext}", hash_stem(url.as_str()))
}

/// Filename for an inline payload: hash of the raw reference plus the
/// media-type hint's extension.
pub fn inline_file_name(reference: &str, media_type: Option<&str>) -> String {
    let ext = extension_for(media_type).unwrap_or_else(|| FALLBACK_EXTENSION.to_string());
    format!("{}{ext}", hash_stem(reference))
}

/// Serialized destination-name allocation for one run.
///
/// The "check existence, claim name" sequence runs under one mutex so two
/// concurrent workers can never claim the same path; names claimed earlier
/// in the run count as taken even before their files hit the disk.
#[derive(Debug)]
pub struct NamePlanner {
    dir:     PathBuf,
    claimed: Mutex<HashSet<String>>,
}

impl NamePlanner {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir:     dir.into(),
            claimed: Mutex::new(HashSet::new()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Claim a free destination path for the wanted filename, suffixing
    /// `_1`, `_2`, ... before the extension until one is available.
    pub fn claim(&self, file_name: &str) -> PathBuf {
        let (stem, ext) = split_extension(file_name);
        let mut claimed = match self.claimed.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let mut candidate = file_name.to_string();
        let mut counter = 1u32;
        while claimed.contains(&candidate) || self.dir.join(&candidate).exists() {
            candidate = format!("{stem}_{counter}{ext}");
            counter += 1;
        }
        claimed.insert(candidate.clone());
        self.dir.join(candidate)
    }
}
