//! Frame handles and gate state
//!
//! ```text
//! Open
//!   ↓ placeholder installed (srcdoc set)
//! Gated
//!   ↓ consent granted (srcdoc removed)
//! Open
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::host::Document;

/// Inline-content attribute holding the placeholder document
pub const PLACEHOLDER_ATTRIBUTE: &str = "srcdoc";

/// Handle to an element inside a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FrameId(pub usize);

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameState {
    /// Original embed is displayed
    Open,
    /// Placeholder document is installed
    Gated,
}

impl FrameState {
    pub fn of<D: Document + ?Sized>(document: &D, frame: FrameId) -> Self {
        if document.attribute(frame, PLACEHOLDER_ATTRIBUTE).is_some() {
            FrameState::Gated
        } else {
            FrameState::Open
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FrameState::Open => "open",
            FrameState::Gated => "gated",
        }
    }
}

impl fmt::Display for FrameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Attributes consulted, in order, for a frame's real resource locator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceAttributes(Vec<String>);

impl SourceAttributes {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// First non-empty value wins
    pub fn resolve<D: Document + ?Sized>(&self, document: &D, frame: FrameId) -> Option<String> {
        self.0
            .iter()
            .filter_map(|name| document.attribute(frame, name))
            .find(|value| !value.trim().is_empty())
    }
}

impl Default for SourceAttributes {
    fn default() -> Self {
        Self::new(["src", "data-cookieblock-src", "data-src"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticDocument;

    #[test]
    fn test_source_precedence() {
        let doc = StaticDocument::parse(
            r#"<iframe src="" data-cookieblock-src="https://blocked.example/a" data-src="https://lazy.example/b"></iframe>
               <iframe data-src="https://lazy.example/c"></iframe>
               <iframe></iframe>"#,
        );
        let frames = doc.query_selector_all("iframe").unwrap();
        let sources = SourceAttributes::default();

        assert_eq!(
            sources.resolve(&doc, frames[0]).as_deref(),
            Some("https://blocked.example/a")
        );
        assert_eq!(
            sources.resolve(&doc, frames[1]).as_deref(),
            Some("https://lazy.example/c")
        );
        assert_eq!(sources.resolve(&doc, frames[2]), None);
    }

    #[test]
    fn test_state_follows_placeholder_attribute() {
        let doc = StaticDocument::parse(r#"<iframe src="https://example.com"></iframe>"#);
        let frame = doc.query_selector_all("iframe").unwrap()[0];
        assert_eq!(FrameState::of(&doc, frame), FrameState::Open);

        doc.set_attribute(frame, PLACEHOLDER_ATTRIBUTE, "<p>gated</p>")
            .unwrap();
        assert_eq!(FrameState::of(&doc, frame), FrameState::Gated);

        doc.remove_attribute(frame, PLACEHOLDER_ATTRIBUTE).unwrap();
        assert_eq!(FrameState::of(&doc, frame), FrameState::Open);
    }
}
