//! Extraction of `url(...)` references from CSS text.

use std::sync::LazyLock;

use regex::Regex;

static CSS_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"url\(([^)]*)\)").expect("CSS_URL_RE: hardcoded regex is valid"));

/// Every `url(...)` occurrence in a chunk of CSS text, with surrounding
/// whitespace and optional quotes stripped. Empty values are dropped.
/// Works on stylesheet bodies, inline `<style>` blocks, and computed
/// `background-image` values alike.
pub fn css_urls(text: &str) -> Vec<String> {
    CSS_URL_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let raw = caps.get(1)?.as_str().trim();
            let unquoted = raw
                .strip_prefix('"')
                .and_then(|s| s.strip_suffix('"'))
                .or_else(|| raw.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
                .unwrap_or(raw);
            (!unquoted.is_empty()).then(|| unquoted.to_string())
        })
        .collect()
}
