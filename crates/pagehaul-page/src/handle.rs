//! Capability traits over the rendering engine's page and element handles.

use crate::error::Result;

/// Script that enumerates every element's computed `background-image` value.
///
/// Returns one string per element that has a background image set; gradient
/// and multi-layer values come back verbatim and are filtered by the
/// `url(...)` extraction afterwards.
pub const BACKGROUND_SCAN_SCRIPT: &str = r#"() => {
    const out = [];
    for (const el of document.querySelectorAll('*')) {
        try {
            const v = window.getComputedStyle(el).getPropertyValue('background-image');
            if (v && v !== 'none') out.push(v);
        } catch (e) {}
    }
    return out;
}"#;

/// Script pairing each `h1`-`h6` header with the text of its following
/// sibling paragraphs, one `header\x1ftext` entry per section. The unit
/// separator never occurs in rendered text.
pub const SECTION_SCAN_SCRIPT: &str = r#"() => {
    const out = [];
    const headers = document.querySelectorAll('h1, h2, h3, h4, h5, h6');
    for (const h of headers) {
        const parts = [];
        let sib = h.nextElementSibling;
        while (sib) {
            const tag = sib.tagName ? sib.tagName.toLowerCase() : '';
            if (tag.startsWith('h')) break;
            if (tag === 'p') {
                const t = sib.innerText.trim();
                if (t) parts.push(t);
            }
            sib = sib.nextElementSibling;
        }
        out.push((h.innerText || '').trim() + '\x1f' + parts.join(' '));
    }
    return out;
}"#;

/// One element of the rendered page.
pub trait Element {
    /// Read an attribute by name; `None` when the attribute is absent.
    fn attribute(&self, name: &str) -> Result<Option<String>>;

    /// Read a computed style property; `None` when the property resolves to
    /// nothing meaningful (e.g. `background-image: none`).
    fn computed_style(&self, property: &str) -> Result<Option<String>>;

    /// The element's rendered text content.
    fn text(&self) -> Result<String>;
}

/// A fully navigated page.
///
/// Implementations adapt whichever automation engine rendered the page;
/// queries run against the live DOM and may fail per-element when nodes
/// detach mid-scan.
pub trait Page {
    type Element: Element;

    /// All elements matching a CSS-like selector.
    fn query_all(&self, selector: &str) -> Result<Vec<Self::Element>>;

    /// Evaluate a script in the page returning a list of strings.
    fn eval_strings(&self, script: &str) -> Result<Vec<String>>;
}
