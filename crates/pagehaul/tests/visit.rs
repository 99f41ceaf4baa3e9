//! End-to-end visit tests over a fake rendered page.
//!
//! References are data URIs or unresolvable, so no network traffic occurs;
//! the bridged client is built but never used.

use std::collections::HashMap;
use std::time::Duration;

use pagehaul::{
    BrowserCookie, ContentSection, Element, Page, PageError, SessionCredentials, VisitOptions,
    extract_content, visit_page,
};

#[derive(Clone)]
struct FakeElement {
    attributes: HashMap<&'static str, String>,
    text:       String,
}

impl Element for FakeElement {
    fn attribute(&self, name: &str) -> Result<Option<String>, PageError> {
        Ok(self.attributes.get(name).cloned())
    }

    fn computed_style(&self, _property: &str) -> Result<Option<String>, PageError> {
        Ok(None)
    }

    fn text(&self) -> Result<String, PageError> {
        Ok(self.text.clone())
    }
}

#[derive(Default)]
struct FakePage {
    elements: HashMap<&'static str, Vec<FakeElement>>,
    sections: Vec<String>,
    script_fails: bool,
}

impl FakePage {
    fn element(attrs: &[(&'static str, &str)], text: &str) -> FakeElement {
        FakeElement {
            attributes: attrs.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            text:       text.to_string(),
        }
    }
}

impl Page for FakePage {
    type Element = FakeElement;

    fn query_all(&self, selector: &str) -> Result<Vec<FakeElement>, PageError> {
        Ok(self.elements.get(selector).cloned().unwrap_or_default())
    }

    fn eval_strings(&self, _script: &str) -> Result<Vec<String>, PageError> {
        if self.script_fails {
            return Err(PageError::Script("no script engine".to_string()));
        }
        Ok(self.sections.clone())
    }
}

fn credentials() -> SessionCredentials {
    SessionCredentials {
        cookies:    vec![BrowserCookie {
            name:   "sid".to_string(),
            value:  "abc123".to_string(),
            domain: Some("ex.com".to_string()),
            path:   Some("/".to_string()),
        }],
        user_agent: "pagehaul-test/1.0".to_string(),
    }
}

const HELLO_URI: &str = "data:text/plain;base64,SGVsbG8=";

#[tokio::test]
async fn visit_downloads_assets_and_writes_the_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let mut page = FakePage::default();
    page.elements.insert(
        "img",
        vec![FakePage::element(&[("src", HELLO_URI)], "")],
    );
    page.elements.insert(
        "a[href]",
        vec![FakePage::element(&[("href", "/next")], "next")],
    );
    page.sections = vec!["Intro\u{1f}Welcome text.".to_string()];

    let options = VisitOptions::new(dir.path().join("media"), dir.path().join("page.json"));
    let manifest = visit_page(&page, "https://ex.com/blog/post", &credentials(), &options)
        .await
        .unwrap();

    assert_eq!(manifest.domain, "ex.com");
    assert_eq!(manifest.links, vec!["https://ex.com/next"]);
    assert_eq!(manifest.content[0].header, "Intro");

    let saved = &manifest.media.downloaded[HELLO_URI];
    assert_eq!(std::fs::read(saved).unwrap(), b"Hello");
    assert!(manifest.media.errors.is_empty());

    let on_disk: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("page.json")).unwrap())
            .unwrap();
    assert_eq!(on_disk["url"], "https://ex.com/blog/post");
    assert!(on_disk["media"]["downloaded"][HELLO_URI].is_string());
}

#[tokio::test]
async fn failed_references_land_in_manifest_errors() {
    let dir = tempfile::tempdir().unwrap();
    let mut page = FakePage::default();
    page.elements.insert(
        "img",
        vec![
            FakePage::element(&[("src", HELLO_URI)], ""),
            FakePage::element(&[("src", "data:broken")], ""),
        ],
    );

    let options = VisitOptions::new(dir.path().join("media"), dir.path().join("page.json"));
    let manifest = visit_page(&page, "https://ex.com/", &credentials(), &options)
        .await
        .unwrap();

    assert!(manifest.media.downloaded.contains_key(HELLO_URI));
    assert!(manifest.media.errors.contains_key("data:broken"));
}

#[tokio::test]
async fn exhausted_budget_still_produces_a_full_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let mut page = FakePage::default();
    page.elements.insert(
        "img",
        vec![FakePage::element(&[("src", HELLO_URI)], "")],
    );

    let mut options = VisitOptions::new(dir.path().join("media"), dir.path().join("page.json"));
    options.overall_timeout = Some(Duration::ZERO);
    let manifest = visit_page(&page, "https://ex.com/", &credentials(), &options)
        .await
        .unwrap();

    // The reference was never attempted, but it still has an entry.
    assert_eq!(manifest.media.errors[HELLO_URI], "timed out");
    assert!(dir.path().join("page.json").exists());
}

#[test]
fn content_extraction_falls_back_to_paragraphs() {
    let mut page = FakePage::default();
    page.script_fails = true;
    page.elements.insert(
        "p",
        vec![
            FakePage::element(&[], "First paragraph."),
            FakePage::element(&[], "  "),
            FakePage::element(&[], "Second paragraph."),
        ],
    );

    let content = extract_content(&page);
    assert_eq!(content, vec![ContentSection {
        header: "Page".to_string(),
        text:   "First paragraph. Second paragraph.".to_string(),
    }]);
}

#[test]
fn unreadable_header_becomes_numbered_section() {
    let mut page = FakePage::default();
    page.sections = vec!["\u{1f}orphan text".to_string(), "Real\u{1f}body".to_string()];

    let content = extract_content(&page);
    assert_eq!(content[0].header, "Section 1");
    assert_eq!(content[0].text, "orphan text");
    assert_eq!(content[1].header, "Real");
}
