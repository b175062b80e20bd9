//! Domain entities: core data structures

use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::error::DomainError;

/// Head element kinds managed besides the title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    Base,
    Meta,
    Link,
}

impl TagKind {
    pub const ALL: [TagKind; 3] = [TagKind::Base, TagKind::Meta, TagKind::Link];

    /// Element name as written in markup.
    pub fn as_str(&self) -> &'static str {
        match self {
            TagKind::Base => "base",
            TagKind::Meta => "meta",
            TagKind::Link => "link",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes of a single tag, in declaration order.
///
/// Names keep their original spelling; lookups compare names case-insensitively.
/// Deserializing from a TOML table or JSON object keeps document order, which matters
/// because the reconciler decides on the first attribute of each tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AttributeMap {
    entries: Vec<(String, String)>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an attribute. An exactly equal name replaces the earlier value in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Case-insensitive lookup by attribute name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The first attribute in declaration order.
    pub fn first(&self) -> Option<(&str, &str)> {
        self.entries
            .first()
            .map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

impl<const N: usize> From<[(&str, &str); N]> for AttributeMap {
    fn from(pairs: [(&str, &str); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl fmt::Display for AttributeMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{name}={value:?}")?;
        }
        Ok(())
    }
}

impl Serialize for AttributeMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AttributeMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AttributeMapVisitor;

        impl<'de> Visitor<'de> for AttributeMapVisitor {
            type Value = AttributeMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of attribute names to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = AttributeMap::new();
                while let Some((name, value)) = access.next_entry::<String, String>()? {
                    map.insert(name, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(AttributeMapVisitor)
    }
}

/// One node's contribution of head-tag intent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Declaration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Template with a placeholder token, e.g. `"MySite - %s"`
    #[serde(
        rename = "titleTemplate",
        alias = "title_template",
        skip_serializing_if = "Option::is_none"
    )]
    pub title_template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<AttributeMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Vec<AttributeMap>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Vec<AttributeMap>>,
}

impl Declaration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_title_template(mut self, template: impl Into<String>) -> Self {
        self.title_template = Some(template.into());
        self
    }

    pub fn with_base(mut self, base: impl Into<AttributeMap>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn with_meta<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<AttributeMap>,
    {
        self.meta = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_link<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<AttributeMap>,
    {
        self.link = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Tags declared for `kind`, or `None` when the field is absent.
    ///
    /// A present but empty list is `Some(&[])`: the declaration still takes part
    /// in reconciliation, it just contributes nothing.
    pub fn tags(&self, kind: TagKind) -> Option<&[AttributeMap]> {
        match kind {
            TagKind::Base => self.base.as_ref().map(std::slice::from_ref),
            TagKind::Meta => self.meta.as_deref(),
            TagKind::Link => self.link.as_deref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.title_template.is_none()
            && self.base.is_none()
            && self.meta.is_none()
            && self.link.is_none()
    }
}

/// Deduplicated, final head state ready for application or serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedState {
    pub title: String,
    /// Zero or one entries
    pub base_tag: Vec<AttributeMap>,
    pub meta_tags: Vec<AttributeMap>,
    pub link_tags: Vec<AttributeMap>,
}

impl ResolvedState {
    pub fn tags(&self, kind: TagKind) -> &[AttributeMap] {
        match kind {
            TagKind::Base => &self.base_tag,
            TagKind::Meta => &self.meta_tags,
            TagKind::Link => &self.link_tags,
        }
    }
}

/// Serialization formats for declaration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationFormat {
    Toml,
    Json,
}

impl DeclarationFormat {
    /// Detect the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, DomainError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            _ => Err(DomainError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Declaration file with an optional link to the next-outer file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationFile {
    /// Path to this file
    pub path: PathBuf,
    /// Next-outer declaration file, already resolved against this file's directory
    pub extends: Option<PathBuf>,
    pub declaration: Declaration,
}

#[derive(Deserialize)]
struct RawDeclarationFile {
    #[serde(default)]
    extends: Option<String>,
    #[serde(flatten)]
    declaration: Declaration,
}

impl DeclarationFile {
    /// Parse declaration file content.
    ///
    /// # Arguments
    /// * `content` - File content to parse
    /// * `file_path` - Path to the file (used to resolve a relative `extends`)
    /// * `format` - TOML or JSON
    pub fn parse(
        content: &str,
        file_path: PathBuf,
        format: DeclarationFormat,
    ) -> Result<Self, DomainError> {
        let raw: RawDeclarationFile = match format {
            DeclarationFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            DeclarationFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        }
        .map_err(|message| DomainError::InvalidDeclaration {
            path: file_path.clone(),
            message,
        })?;

        let extends = raw
            .extends
            .map(|entry| entry.trim().to_string())
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let parent = PathBuf::from(expand_env_vars(&entry));
                if parent.is_absolute() {
                    parent
                } else if let Some(dir) = file_path.parent() {
                    dir.join(parent)
                } else {
                    parent
                }
            });

        Ok(Self {
            path: file_path,
            extends,
            declaration: raw.declaration,
        })
    }
}

/// Expand environment variables and `~` in a path string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
