//! Structured content and link extraction from the rendered page.

use std::collections::BTreeSet;

use pagehaul_page::{Element, Page, SECTION_SCAN_SCRIPT};
use pagehaul_resolve::{Resolved, resolve};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One header-led section of page text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSection {
    pub header: String,
    pub text:   String,
}

/// Extract the page's header/text hierarchy.
///
/// The primary path evaluates one script pairing each `h1`-`h6` with the
/// text of its following sibling paragraphs. Pages without headers, and
/// engines that cannot evaluate scripts, fall back to a single "Page"
/// section holding all paragraph text. A header whose text cannot be read
/// becomes `Section N`.
pub fn extract_content<P: Page>(page: &P) -> Vec<ContentSection> {
    match page.eval_strings(SECTION_SCAN_SCRIPT) {
        Ok(entries) if !entries.is_empty() => entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let (header, text) = entry.split_once('\u{1f}').unwrap_or((entry.as_str(), ""));
                let header = match header.trim() {
                    "" => format!("Section {}", index + 1),
                    h => h.to_string(),
                };
                ContentSection {
                    header,
                    text: text.trim().to_string(),
                }
            })
            .collect(),
        Ok(_) => paragraph_fallback(page),
        Err(err) => {
            debug!(%err, "section scan script failed, falling back to paragraphs");
            paragraph_fallback(page)
        }
    }
}

fn paragraph_fallback<P: Page>(page: &P) -> Vec<ContentSection> {
    let paragraphs = match page.query_all("p") {
        Ok(elements) => elements,
        Err(err) => {
            debug!(%err, "paragraph query failed");
            Vec::new()
        }
    };
    let text = paragraphs
        .iter()
        .filter_map(|p| p.text().ok())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    vec![ContentSection {
        header: "Page".to_string(),
        text,
    }]
}

/// Absolute locations of every anchor on the page, sorted and deduplicated.
/// Unreadable or unresolvable hrefs are skipped.
pub fn collect_links<P: Page>(page: &P, base: &str) -> Vec<String> {
    let anchors = match page.query_all("a[href]") {
        Ok(elements) => elements,
        Err(err) => {
            debug!(%err, "anchor query failed");
            return Vec::new();
        }
    };
    let links: BTreeSet<String> = anchors
        .iter()
        .filter_map(|a| a.attribute("href").ok().flatten())
        .filter_map(|href| match resolve(&href, base) {
            Ok(Resolved::Remote(url)) => Some(url.to_string()),
            _ => None,
        })
        .collect();
    links.into_iter().collect()
}
