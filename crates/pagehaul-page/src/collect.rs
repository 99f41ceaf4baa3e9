//! Reference collection across the page's independent source categories.

use std::collections::BTreeMap;
use std::fmt;

use pagehaul_resolve::{Resolved, resolve};
use tracing::debug;

use crate::css::css_urls;
use crate::error::Result;
use crate::handle::{BACKGROUND_SCAN_SCRIPT, Element, Page};

const MEDIA_SELECTORS: &[&str] = &["video", "audio", "source", "picture", "iframe"];

/// Where a reference was found on the page. A reference seen in several
/// categories keeps the first category that found it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SourceCategory {
    Img,
    Media,
    Icon,
    OgMeta,
    BackgroundStyle,
    Stylesheet,
    InlineStyle,
}

impl fmt::Display for SourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceCategory::Img => "img",
            SourceCategory::Media => "media",
            SourceCategory::Icon => "icon",
            SourceCategory::OgMeta => "og_meta",
            SourceCategory::BackgroundStyle => "background_style",
            SourceCategory::Stylesheet => "stylesheet",
            SourceCategory::InlineStyle => "inline_style",
        };
        f.write_str(name)
    }
}

/// Output of one collection pass: raw references deduplicated by exact
/// string and tagged with their source category, plus the absolute locations
/// of linked stylesheets queued for secondary scanning. The stylesheet files
/// themselves are also candidate assets and appear in `references`.
#[derive(Debug, Default)]
pub struct Collected {
    pub references:  BTreeMap<String, SourceCategory>,
    pub stylesheets: Vec<String>,
}

impl Collected {
    fn add(&mut self, reference: impl Into<String>, category: SourceCategory) {
        let reference = reference.into();
        if !reference.is_empty() {
            self.references.entry(reference).or_insert(category);
        }
    }
}

/// Collect every media/style reference the rendered page exposes.
///
/// Each source category runs independently; a category that fails to query
/// contributes nothing and is logged, never aborting the others.
pub fn collect_references<P: Page>(page: &P, base: &str) -> Collected {
    let mut collected = Collected::default();

    let categories: [(&str, fn(&P, &mut Collected) -> Result<()>); 4] = [
        ("media attributes", collect_media_attributes),
        ("icon/meta", collect_icon_meta),
        ("computed backgrounds", collect_backgrounds),
        ("inline styles", collect_inline_styles),
    ];
    for (category, run) in categories {
        if let Err(err) = run(page, &mut collected) {
            debug!(category, %err, "category extraction failed, skipping");
        }
    }
    if let Err(err) = collect_stylesheet_links(page, base, &mut collected) {
        debug!(category = "stylesheet links", %err, "category extraction failed, skipping");
    }

    collected
}

/// First whitespace-delimited token of each comma-separated srcset entry.
fn srcset_entries(srcset: &str) -> impl Iterator<Item = &str> {
    srcset
        .split(',')
        .filter_map(|entry| entry.split_whitespace().next())
        .filter(|token| !token.is_empty())
}

fn collect_source_attributes<E: Element>(
    element: &E,
    category: SourceCategory,
    out: &mut Collected,
) {
    // A node can detach between query and read; skip it and move on.
    if let Ok(Some(src)) = element.attribute("src") {
        out.add(src, category);
    }
    for attr in ["data-src", "data-srcset"] {
        if let Ok(Some(value)) = element.attribute(attr) {
            out.add(value, category);
        }
    }
    if let Ok(Some(srcset)) = element.attribute("srcset") {
        for token in srcset_entries(&srcset) {
            out.add(token, category);
        }
    }
}

fn collect_media_attributes<P: Page>(page: &P, out: &mut Collected) -> Result<()> {
    for element in page.query_all("img")? {
        collect_source_attributes(&element, SourceCategory::Img, out);
    }
    for selector in MEDIA_SELECTORS {
        for element in page.query_all(selector)? {
            collect_source_attributes(&element, SourceCategory::Media, out);
        }
    }
    Ok(())
}

fn collect_icon_meta<P: Page>(page: &P, out: &mut Collected) -> Result<()> {
    for element in page.query_all("link[rel]")? {
        let Ok(Some(rel)) = element.attribute("rel") else {
            continue;
        };
        let rel = rel.to_ascii_lowercase();
        if (rel.contains("icon") || rel.contains("image"))
            && let Ok(Some(href)) = element.attribute("href")
        {
            out.add(href, SourceCategory::Icon);
        }
    }
    for element in page.query_all("meta[property='og:image'], meta[name='og:image']")? {
        if let Ok(Some(content)) = element.attribute("content") {
            out.add(content, SourceCategory::OgMeta);
        }
    }
    Ok(())
}

fn collect_backgrounds<P: Page>(page: &P, out: &mut Collected) -> Result<()> {
    // One script round-trip covers the whole document. Engines that cannot
    // evaluate scripts fall back to per-element computed-style reads.
    match page.eval_strings(BACKGROUND_SCAN_SCRIPT) {
        Ok(values) => {
            for value in values {
                for url in css_urls(&value) {
                    out.add(url, SourceCategory::BackgroundStyle);
                }
            }
        }
        Err(err) => {
            debug!(%err, "background scan script failed, reading computed styles per element");
            for element in page.query_all("*")? {
                if let Ok(Some(value)) = element.computed_style("background-image") {
                    for url in css_urls(&value) {
                        out.add(url, SourceCategory::BackgroundStyle);
                    }
                }
            }
        }
    }
    Ok(())
}

fn collect_inline_styles<P: Page>(page: &P, out: &mut Collected) -> Result<()> {
    for element in page.query_all("style")? {
        let Ok(text) = element.text() else {
            continue;
        };
        for url in css_urls(&text) {
            out.add(url, SourceCategory::InlineStyle);
        }
    }
    Ok(())
}

fn collect_stylesheet_links<P: Page>(page: &P, base: &str, out: &mut Collected) -> Result<()> {
    for element in page.query_all("link[rel='stylesheet']")? {
        let Ok(Some(href)) = element.attribute("href") else {
            continue;
        };
        // CSS url() values are relative to the stylesheet, so the scanner
        // needs its absolute location up front.
        match resolve(&href, base) {
            Ok(Resolved::Remote(url)) => {
                let absolute = url.to_string();
                if !out.stylesheets.contains(&absolute) {
                    out.stylesheets.push(absolute);
                }
            }
            Ok(Resolved::Inline(_)) => {}
            Err(err) => {
                debug!(href, %err, "unresolvable stylesheet href");
            }
        }
        out.add(href, SourceCategory::Stylesheet);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error::PageError;

    #[derive(Clone)]
    struct FakeElement {
        attributes: HashMap<&'static str, String>,
        text:       String,
    }

    impl FakeElement {
        fn with_attrs(attrs: &[(&'static str, &str)]) -> Self {
            Self {
                attributes: attrs.iter().map(|(k, v)| (*k, v.to_string())).collect(),
                text:       String::new(),
            }
        }

        fn with_text(text: &str) -> Self {
            Self {
                attributes: HashMap::new(),
                text:       text.to_string(),
            }
        }
    }

    impl Element for FakeElement {
        fn attribute(&self, name: &str) -> Result<Option<String>> {
            Ok(self.attributes.get(name).cloned())
        }

        fn computed_style(&self, _property: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn text(&self) -> Result<String> {
            Ok(self.text.clone())
        }
    }

    #[derive(Default)]
    struct FakePage {
        elements:       HashMap<&'static str, Vec<FakeElement>>,
        backgrounds:    Vec<String>,
        fail_selectors: Vec<&'static str>,
    }

    impl Page for FakePage {
        type Element = FakeElement;

        fn query_all(&self, selector: &str) -> Result<Vec<FakeElement>> {
            if self.fail_selectors.contains(&selector) {
                return Err(PageError::Query {
                    selector: selector.to_string(),
                    reason:   "boom".to_string(),
                });
            }
            Ok(self.elements.get(selector).cloned().unwrap_or_default())
        }

        fn eval_strings(&self, _script: &str) -> Result<Vec<String>> {
            Ok(self.backgrounds.clone())
        }
    }

    const BASE: &str = "https://ex.com/blog/post";

    #[test]
    fn merges_all_categories_into_one_set() {
        let mut page = FakePage::default();
        page.elements.insert(
            "img",
            vec![FakeElement::with_attrs(&[
                ("src", "/img/a.png"),
                ("srcset", "/img/a-1x.png 1x, /img/a-2x.png 2x"),
            ])],
        );
        page.elements.insert(
            "link[rel]",
            vec![FakeElement::with_attrs(&[
                ("rel", "Icon"),
                ("href", "/favicon.ico"),
            ])],
        );
        page.elements.insert(
            "meta[property='og:image'], meta[name='og:image']",
            vec![FakeElement::with_attrs(&[("content", "/og.jpg")])],
        );
        page.elements.insert(
            "style",
            vec![FakeElement::with_text(".hero { background: url('/hero.webp'); }")],
        );
        page.backgrounds = vec![r#"url("/bg.png")"#.to_string()];

        let collected = collect_references(&page, BASE);
        let refs: Vec<&str> = collected.references.keys().map(String::as_str).collect();
        assert_eq!(
            refs,
            vec![
                "/bg.png",
                "/favicon.ico",
                "/hero.webp",
                "/img/a-1x.png",
                "/img/a-2x.png",
                "/img/a.png",
                "/og.jpg",
            ]
        );
        assert_eq!(collected.references["/img/a.png"], SourceCategory::Img);
        assert_eq!(collected.references["/favicon.ico"], SourceCategory::Icon);
        assert_eq!(collected.references["/og.jpg"], SourceCategory::OgMeta);
        assert_eq!(
            collected.references["/bg.png"],
            SourceCategory::BackgroundStyle
        );
        assert_eq!(
            collected.references["/hero.webp"],
            SourceCategory::InlineStyle
        );
    }

    #[test]
    fn duplicate_reference_across_categories_collected_once() {
        let mut page = FakePage::default();
        page.elements.insert(
            "img",
            vec![FakeElement::with_attrs(&[("src", "/shared.png")])],
        );
        page.backgrounds = vec!["url(/shared.png)".to_string()];

        let collected = collect_references(&page, BASE);
        assert_eq!(collected.references.len(), 1);
        // First category to find the reference wins.
        assert_eq!(collected.references["/shared.png"], SourceCategory::Img);
    }

    #[test]
    fn stylesheets_are_queued_and_kept_as_assets() {
        let mut page = FakePage::default();
        page.elements.insert(
            "link[rel='stylesheet']",
            vec![FakeElement::with_attrs(&[("href", "/css/main.css")])],
        );

        let collected = collect_references(&page, BASE);
        assert_eq!(collected.stylesheets, vec!["https://ex.com/css/main.css"]);
        assert_eq!(
            collected.references["/css/main.css"],
            SourceCategory::Stylesheet
        );
    }

    #[test]
    fn failing_category_does_not_abort_the_others() {
        let mut page = FakePage::default();
        page.fail_selectors = vec!["img", "link[rel]"];
        page.elements.insert(
            "style",
            vec![FakeElement::with_text("div { background: url(/ok.png); }")],
        );

        let collected = collect_references(&page, BASE);
        assert!(collected.references.contains_key("/ok.png"));
    }

    #[test]
    fn lazy_load_attributes_are_collected() {
        let mut page = FakePage::default();
        page.elements.insert(
            "source",
            vec![FakeElement::with_attrs(&[("data-src", "/lazy.mp4")])],
        );

        let collected = collect_references(&page, BASE);
        assert!(collected.references.contains_key("/lazy.mp4"));
    }
}
