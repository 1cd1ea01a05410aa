//! Candidate frame discovery

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::frame::FrameId;
use crate::host::Document;

/// Embeds that always need marketing consent
pub const MARKETING_EMBED_SELECTORS: &[&str] = &[
    "iframe.consent-frame",
    "iframe.cookieconsent-optin-marketing",
    "iframe[data-src*='youtube.com/embed']",
    "[data-src*='youtube-nocookie.com/embed']",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Discovery {
    /// Any iframe carrying the named attribute
    Attribute { name: String },
    /// Any element matching one of the selectors
    Selectors { selectors: Vec<String> },
}

impl Discovery {
    pub fn attribute(name: impl Into<String>) -> Self {
        Discovery::Attribute { name: name.into() }
    }

    pub fn marketing_embeds() -> Self {
        Discovery::Selectors {
            selectors: MARKETING_EMBED_SELECTORS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    fn selectors(&self) -> Vec<String> {
        match self {
            Discovery::Attribute { name } => vec![format!("iframe[{}]", name)],
            Discovery::Selectors { selectors } => selectors.clone(),
        }
    }

    /// Matching frames, de-duplicated, in document order
    ///
    /// A selector the document rejects is logged and skipped.
    pub fn discover<D: Document + ?Sized>(&self, document: &D) -> Vec<FrameId> {
        let mut found = BTreeSet::new();

        for selector in self.selectors() {
            match document.query_selector_all(&selector) {
                Ok(frames) => found.extend(frames),
                Err(e) => {
                    tracing::warn!(selector = %selector, error = %e, "Skipping selector");
                }
            }
        }

        found.into_iter().collect()
    }
}
