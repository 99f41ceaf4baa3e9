//! Rendered-page access and media reference collection.
//!
//! The browser-automation engine is an external collaborator; this crate only
//! sees it through the narrow [`Page`]/[`Element`] capability traits, so the
//! collection logic is independent of any specific engine's object model.
//!
//! [`collect_references`] walks the independent source categories (tag
//! attributes, srcset lists, computed backgrounds, stylesheet links, inline
//! style blocks) and merges them into one deduplicated reference set. A
//! failure in one category never aborts the others.

mod collect;
mod css;
mod error;
mod handle;

pub use collect::{Collected, SourceCategory, collect_references};
pub use css::css_urls;
pub use error::{PageError, Result};
pub use handle::{BACKGROUND_SCAN_SCRIPT, Element, Page, SECTION_SCAN_SCRIPT};
