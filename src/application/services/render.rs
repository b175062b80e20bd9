//! Static rendering for targets without a live document
//!
//! Two output modes per tag kind: raw markup strings, and structured nodes whose
//! attribute names follow component-framework property spelling. The textual form of the
//! structured output is byte-identical to markup mode for the same input.

use std::fmt;

use itertools::Itertools;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::domain::{AttributeMap, ResolvedState, TagKind};
use crate::util::html::{encode, open_tag};

/// Source attribute names renamed in structured output.
pub const ATTRIBUTE_ALIASES: &[(&str, &str)] = &[("charset", "charSet"), ("http-equiv", "httpEquiv")];

/// Structured-output name for a source attribute name.
pub fn alias_for(name: &str) -> &str {
    ATTRIBUTE_ALIASES
        .iter()
        .find(|(source, _)| *source == name)
        .map(|(_, alias)| *alias)
        .unwrap_or(name)
}

/// Render tags as concatenated `<kind marker="true" a="v">` strings.
///
/// Values are entity-encoded with HTML5 named references where one exists (`&amp;`,
/// `&rarr;`) and hexadecimal references otherwise. A tag with no attributes is written
/// as `<kind marker="true">`, without a space before `>`.
pub fn render_markup(kind: TagKind, tags: &[AttributeMap], marker: &str) -> String {
    render_structured(kind, tags, marker).nodes().iter().join("")
}

/// Render tags as structured nodes.
pub fn render_structured(kind: TagKind, tags: &[AttributeMap], marker: &str) -> StructuredTags {
    let nodes = tags
        .iter()
        .enumerate()
        .map(|(key, tag)| TagNode {
            kind,
            key,
            marker: marker.to_string(),
            attributes: tag
                .iter()
                .map(|(name, value)| NodeAttribute {
                    source: name.to_string(),
                    name: alias_for(name).to_string(),
                    value: encode(value),
                })
                .collect(),
        })
        .collect();
    StructuredTags { kind, nodes }
}

/// Render a full resolved state: encoded title plus structured tags of every kind.
///
/// The title goes through the same encoder as attribute values, so `&` becomes `&amp;`
/// rather than a numeric reference. An empty `base` tag renders as
/// `<base marker="true">` with no trailing space.
pub fn render_static(state: &ResolvedState, marker: &str) -> StaticHead {
    StaticHead {
        title: encode(&state.title),
        base: render_structured(TagKind::Base, &state.base_tag, marker),
        meta: render_structured(TagKind::Meta, &state.meta_tags, marker),
        link: render_structured(TagKind::Link, &state.link_tags, marker),
    }
}

/// Attribute of a structured node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeAttribute {
    /// Attribute name as declared
    pub source: String,
    /// Property name after aliasing
    pub name: String,
    /// Entity-encoded value
    pub value: String,
}

/// Framework-agnostic element description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagNode {
    pub kind: TagKind,
    /// Positional index within its kind
    pub key: usize,
    pub marker: String,
    pub attributes: Vec<NodeAttribute>,
}

impl TagNode {
    /// Markup form: `<kind marker="true" a="v">` with the source attribute names.
    pub fn to_markup(&self) -> String {
        let attributes = std::iter::once((self.marker.as_str(), "true")).chain(
            self.attributes
                .iter()
                .map(|a| (a.source.as_str(), a.value.as_str())),
        );
        open_tag(self.kind.as_str(), attributes)
    }

    /// Component props in assignment order. A later prop with an existing name replaces
    /// the earlier value and keeps its position.
    fn props(&self) -> Vec<(&str, PropValue<'_>)> {
        let mut props: Vec<(&str, PropValue<'_>)> = vec![("key", PropValue::Index(self.key))];
        let assignments = std::iter::once((self.marker.as_str(), PropValue::Flag(true))).chain(
            self.attributes
                .iter()
                .map(|a| (a.name.as_str(), PropValue::Text(a.value.as_str()))),
        );
        for (name, value) in assignments {
            match props.iter_mut().find(|(existing, _)| *existing == name) {
                Some(slot) => slot.1 = value,
                None => props.push((name, value)),
            }
        }
        props
    }
}

impl fmt::Display for TagNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_markup())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
enum PropValue<'a> {
    Index(usize),
    Flag(bool),
    Text(&'a str),
}

struct NodeProps<'a>(&'a TagNode);

impl Serialize for NodeProps<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let props = self.0.props();
        let mut map = serializer.serialize_map(Some(props.len()))?;
        for (name, value) in &props {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for TagNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", &self.kind)?;
        map.serialize_entry("props", &NodeProps(self))?;
        map.end()
    }
}

/// Structured nodes of one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredTags {
    pub kind: TagKind,
    nodes: Vec<TagNode>,
}

impl Serialize for StructuredTags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.nodes)
    }
}

impl StructuredTags {
    pub fn nodes(&self) -> &[TagNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Textual form: identical to `render_markup` for the same tags.
impl fmt::Display for StructuredTags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.nodes.iter().try_for_each(|node| write!(f, "{node}"))
    }
}

/// Complete static head output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticHead {
    /// Entity-encoded title, not wrapped in an element
    pub title: String,
    pub base: StructuredTags,
    pub meta: StructuredTags,
    pub link: StructuredTags,
}

impl StaticHead {
    /// Concatenated markup: title, base, meta, link.
    pub fn to_markup(&self, wrap_title: bool) -> String {
        let title = match (wrap_title, self.title.is_empty()) {
            (true, false) => format!("<title>{}</title>", self.title),
            (true, true) => String::new(),
            (false, _) => self.title.clone(),
        };
        format!("{title}{}{}{}", self.base, self.meta, self.link)
    }
}

/// Renders resolved state for non-interactive targets. Side-effect free.
#[derive(Debug, Clone)]
pub struct StaticRenderer {
    marker: String,
}

impl StaticRenderer {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn markup(&self, kind: TagKind, tags: &[AttributeMap]) -> String {
        render_markup(kind, tags, &self.marker)
    }

    pub fn structured(&self, kind: TagKind, tags: &[AttributeMap]) -> StructuredTags {
        render_structured(kind, tags, &self.marker)
    }

    pub fn render(&self, state: &ResolvedState) -> StaticHead {
        render_static(state, &self.marker)
    }
}
