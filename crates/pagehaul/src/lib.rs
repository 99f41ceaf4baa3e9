//! Page media discovery and acquisition.
//!
//! Given a rendered page (behind the [`Page`] capability trait) and the
//! browser's session state, a visit collects every media/style reference the
//! page exposes, scans linked stylesheets for embedded assets, downloads the
//! lot through an HTTP session carrying the browser's cookies, and writes a
//! JSON manifest pairing each reference with its download path or failure
//! reason.
//!
//! Navigation itself belongs to the automation engine; everything downstream
//! of a loaded page lives here and in the member crates:
//!
//! - `pagehaul-resolve`: reference resolution (relative URLs, data URIs)
//! - `pagehaul-page`: capability traits and reference collection
//! - `pagehaul-session`: browser-to-HTTP-client session bridging
//! - `pagehaul-fetch`: streaming acquisition with collision-safe naming

mod content;
mod error;
mod manifest;
mod stylesheet;
mod visit;

pub use content::{ContentSection, collect_links, extract_content};
pub use error::{Result, VisitError};
pub use manifest::{Manifest, MediaReport};
pub use stylesheet::{resolve_css_references, scan_stylesheet};
pub use visit::{VisitOptions, visit_page};

pub use pagehaul_fetch::{AcquireOptions, AcquisitionRecord};
pub use pagehaul_page::{Collected, Element, Page, PageError, SourceCategory, collect_references};
pub use pagehaul_session::{BrowserCookie, SessionCredentials};
