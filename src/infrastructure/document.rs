//! Live document boundary
//!
//! The head applier only needs a handful of DOM primitives. `HeadDocument` captures them
//! so a browser binding, a server-side DOM or the in-memory document below can be driven
//! by the same service.

use std::fmt;

use thiserror::Error;

use crate::domain::{AttributeMap, TagKind};
use crate::util::html::{encode, open_tag};

/// Failure while mutating a live document.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("document has no head element")]
    MissingHead,

    #[error("cannot create <{kind}> element: {message}")]
    CreateElement { kind: TagKind, message: String },
}

/// Result type for document mutations.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Element living in the document head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadElement {
    pub kind: TagKind,
    pub attributes: AttributeMap,
}

impl HeadElement {
    pub fn new(kind: TagKind, attributes: AttributeMap) -> Self {
        Self { kind, attributes }
    }

    /// Whether the element carries `marker` (any value).
    pub fn is_marked(&self, marker: &str) -> bool {
        self.attributes.get(marker).is_some()
    }
}

impl fmt::Display for HeadElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded: Vec<(&str, String)> = self
            .attributes
            .iter()
            .map(|(name, value)| (name, encode(value)))
            .collect();
        f.write_str(&open_tag(
            self.kind.as_str(),
            encoded.iter().map(|(name, value)| (*name, value.as_str())),
        ))
    }
}

/// Head region of a live document.
pub trait HeadDocument {
    /// Current document title.
    fn title(&self) -> &str;

    /// Replace the document title.
    fn set_title(&mut self, title: &str) -> DocumentResult<()>;

    /// Remove every `kind` element carrying `marker`; returns how many were removed.
    fn remove_marked(&mut self, kind: TagKind, marker: &str) -> DocumentResult<usize>;

    /// Insert `element` as the first child of the head.
    fn insert_first(&mut self, element: HeadElement) -> DocumentResult<()>;
}

/// Document kept entirely in memory.
///
/// Used by the CLI to show what a live page would end up with, and by tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryDocument {
    title: String,
    head: Vec<HeadElement>,
}

impl InMemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Seed the head with elements the page already has (author-written tags).
    pub fn with_elements(mut self, elements: impl IntoIterator<Item = HeadElement>) -> Self {
        self.head.extend(elements);
        self
    }

    /// Head children in document order.
    pub fn elements(&self) -> &[HeadElement] {
        &self.head
    }

    /// Elements of `kind` carrying `marker`, in document order.
    pub fn marked<'a>(
        &'a self,
        kind: TagKind,
        marker: &'a str,
    ) -> impl Iterator<Item = &'a HeadElement> + 'a {
        self.head
            .iter()
            .filter(move |e| e.kind == kind && e.is_marked(marker))
    }

    /// Serialize the head region, one child per line.
    pub fn to_html(&self) -> String {
        let mut lines = vec!["<head>".to_string()];
        if !self.title.is_empty() {
            lines.push(format!("  <title>{}</title>", encode(&self.title)));
        }
        lines.extend(self.head.iter().map(|e| format!("  {e}")));
        lines.push("</head>".to_string());
        lines.join("\n")
    }
}

impl HeadDocument for InMemoryDocument {
    fn title(&self) -> &str {
        &self.title
    }

    fn set_title(&mut self, title: &str) -> DocumentResult<()> {
        self.title = title.to_string();
        Ok(())
    }

    fn remove_marked(&mut self, kind: TagKind, marker: &str) -> DocumentResult<usize> {
        let before = self.head.len();
        self.head
            .retain(|e| !(e.kind == kind && e.is_marked(marker)));
        Ok(before - self.head.len())
    }

    fn insert_first(&mut self, element: HeadElement) -> DocumentResult<()> {
        self.head.insert(0, element);
        Ok(())
    }
}
