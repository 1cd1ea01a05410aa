//! In-memory document
//!
//! Markup is parsed once with `scraper` and fixes the element structure.
//! Attribute and display changes are tracked per element. Selectors see the
//! current attributes: after a mutation the document is re-serialised with
//! them and parsed again for matching.

use parking_lot::{RwLock, RwLockWriteGuard};
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::BTreeMap;

use crate::error::FrameError;
use crate::frame::FrameId;
use crate::host::Document;
use crate::Result;

/// Elements without a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose text is written without escaping
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "iframe", "noscript", "noembed", "noframes", "xmp", "textarea", "title",
];

#[derive(Debug, Clone)]
struct ElementState {
    tag: String,
    attributes: BTreeMap<String, String>,
    display: Option<String>,
}

/// A recorded change to the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    SetAttribute { frame: FrameId, name: String },
    RemoveAttribute { frame: FrameId, name: String },
    SetDisplay { frame: FrameId, display: String },
}

/// Tree that selectors are matched against
enum Matcher {
    /// Markup as parsed is current
    Parsed,
    /// Attributes changed since the last rebuild
    Stale,
    Rebuilt(Html),
}

pub struct StaticDocument {
    html: Html,
    doctype: bool,
    elements: RwLock<Vec<ElementState>>,
    matcher: RwLock<Matcher>,
    mutations: RwLock<Vec<Mutation>>,
}

/// Elements in document order; `FrameId` is the position in this sequence
fn elements_of(html: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    html.root_element().descendants().filter_map(ElementRef::wrap)
}

impl StaticDocument {
    pub fn parse(markup: &str) -> Self {
        let html = Html::parse_document(markup);

        let elements = elements_of(&html)
            .map(|el| ElementState {
                tag: el.value().name().to_string(),
                attributes: el
                    .value()
                    .attrs()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                display: None,
            })
            .collect();

        Self {
            doctype: markup
                .trim_start()
                .to_ascii_lowercase()
                .starts_with("<!doctype"),
            html,
            elements: RwLock::new(elements),
            matcher: RwLock::new(Matcher::Parsed),
            mutations: RwLock::new(Vec::new()),
        }
    }

    pub fn tag_name(&self, frame: FrameId) -> Option<String> {
        self.elements.read().get(frame.0).map(|el| el.tag.clone())
    }

    pub fn display(&self, frame: FrameId) -> Option<String> {
        self.elements
            .read()
            .get(frame.0)
            .and_then(|el| el.display.clone())
    }

    pub fn mutations(&self) -> Vec<Mutation> {
        self.mutations.read().clone()
    }

    /// How many times `name` was removed from `frame`
    pub fn removal_count(&self, frame: FrameId, name: &str) -> usize {
        self.mutations
            .read()
            .iter()
            .filter(|m| {
                matches!(m, Mutation::RemoveAttribute { frame: f, name: n } if *f == frame && n == name)
            })
            .count()
    }

    /// Current markup, with every attribute mutation applied
    pub fn to_html(&self) -> String {
        let elements = self.elements.read();
        let mut out = String::new();
        if self.doctype {
            out.push_str("<!DOCTYPE html>");
        }
        let mut index = 0usize;
        write_element(self.html.root_element(), &elements, &mut index, &mut out);
        out
    }

    fn with_element<T>(
        &self,
        frame: FrameId,
        f: impl FnOnce(&mut ElementState) -> T,
    ) -> Result<T> {
        let mut elements = self.elements.write();
        let element = elements
            .get_mut(frame.0)
            .ok_or(FrameError::UnknownFrame(frame))?;
        Ok(f(element))
    }

}

fn escape_text(input: &str, out: &mut String, attribute: bool) {
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' if attribute => out.push_str("&quot;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

/// Pre-order walk; `index` advances in step with [`elements_of`]
fn write_element(
    el: ElementRef<'_>,
    elements: &[ElementState],
    index: &mut usize,
    out: &mut String,
) {
    let tag = el.value().name();
    let state = elements.get(*index);
    *index += 1;

    out.push('<');
    out.push_str(tag);
    if let Some(state) = state {
        for (name, value) in &state.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            escape_text(value, out, true);
            out.push('"');
        }
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&tag) {
        return;
    }

    let raw = RAW_TEXT_ELEMENTS.contains(&tag);
    for child in el.children() {
        match child.value() {
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    write_element(child, elements, index, out);
                }
            }
            Node::Text(text) => {
                let text: &str = text;
                if raw {
                    out.push_str(text);
                } else {
                    escape_text(text, out, false);
                }
            }
            _ => {}
        }
    }

    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

impl Document for StaticDocument {
    fn query_selector_all(&self, selector: &str) -> Result<Vec<FrameId>> {
        let parsed = Selector::parse(selector)
            .map_err(|_| FrameError::InvalidSelector(selector.to_string()))?;

        let mut matcher = self.matcher.write();
        if matches!(*matcher, Matcher::Stale) {
            *matcher = Matcher::Rebuilt(Html::parse_document(&self.to_html()));
        }
        let matcher = RwLockWriteGuard::downgrade(matcher);
        let html = match &*matcher {
            Matcher::Rebuilt(rebuilt) => rebuilt,
            Matcher::Parsed | Matcher::Stale => &self.html,
        };

        let frames = elements_of(html)
            .enumerate()
            .filter(|(_, el)| parsed.matches(el))
            .map(|(index, _)| FrameId(index))
            .collect();
        Ok(frames)
    }

    fn attribute(&self, frame: FrameId, name: &str) -> Option<String> {
        self.elements
            .read()
            .get(frame.0)
            .and_then(|el| el.attributes.get(name).cloned())
    }

    fn set_attribute(&self, frame: FrameId, name: &str, value: &str) -> Result<()> {
        self.with_element(frame, |el| {
            el.attributes.insert(name.to_string(), value.to_string());
        })?;
        *self.matcher.write() = Matcher::Stale;
        self.mutations.write().push(Mutation::SetAttribute {
            frame,
            name: name.to_string(),
        });
        Ok(())
    }

    fn remove_attribute(&self, frame: FrameId, name: &str) -> Result<()> {
        self.with_element(frame, |el| {
            el.attributes.remove(name);
        })?;
        *self.matcher.write() = Matcher::Stale;
        self.mutations.write().push(Mutation::RemoveAttribute {
            frame,
            name: name.to_string(),
        });
        Ok(())
    }

    fn set_display(&self, frame: FrameId, display: &str) -> Result<()> {
        self.with_element(frame, |el| {
            el.display = Some(display.to_string());
        })?;
        self.mutations.write().push(Mutation::SetDisplay {
            frame,
            display: display.to_string(),
        });
        Ok(())
    }
}
