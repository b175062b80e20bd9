//! HTML entity encoding for serialized head output.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use entities::ENTITIES;

/// Preferred named reference (`&name;`) for every non-ASCII character that has one.
fn named_references() -> &'static HashMap<char, &'static str> {
    static NAMES: OnceLock<HashMap<char, &'static str>> = OnceLock::new();
    NAMES.get_or_init(|| {
        // Legacy names are the ones also valid without a trailing semicolon.
        let legacy: HashSet<&'static str> = ENTITIES
            .iter()
            .map(|e| e.entity)
            .filter(|name| !name.ends_with(';'))
            .collect();

        let mut names: HashMap<char, &'static str> = HashMap::new();
        for entity in ENTITIES.iter() {
            let reference: &'static str = entity.entity;
            let mut chars = entity.characters.chars();
            let (Some(ch), None) = (chars.next(), chars.next()) else {
                continue;
            };
            if ch.is_ascii() || !reference.ends_with(';') {
                continue;
            }
            names
                .entry(ch)
                .and_modify(|current| {
                    if preference(reference, &legacy) < preference(current, &legacy) {
                        *current = reference;
                    }
                })
                .or_insert(reference);
        }
        names
    })
}

/// Legacy names first, then the shortest, then the one with fewest capitals.
fn preference<'a>(reference: &'a str, legacy: &HashSet<&str>) -> (bool, usize, usize, &'a str) {
    let bare = reference.trim_end_matches(';');
    (
        !legacy.contains(bare),
        reference.len(),
        reference.chars().filter(char::is_ascii_uppercase).count(),
        reference,
    )
}

/// Encode a string for use inside a double-quoted attribute or as text content.
///
/// `&`, `<`, `>` and `"` become named references, `'` and `` ` `` become hex references,
/// and every non-ASCII character is written as its HTML5 named reference when one exists,
/// otherwise as a hexadecimal one.
pub fn encode(value: &str) -> String {
    let escaped: Cow<'_, str> = html_escape::encode_double_quoted_attribute(value);
    if escaped.is_ascii() && !escaped.contains(['\'', '`']) {
        return escaped.into_owned();
    }

    let mut out = String::with_capacity(escaped.len() + 16);
    for ch in escaped.chars() {
        match ch {
            '\'' => out.push_str("&#x27;"),
            '`' => out.push_str("&#x60;"),
            c if c.is_ascii() => out.push(c),
            c => match named_references().get(&c) {
                Some(reference) => out.push_str(reference),
                None => out.push_str(&format!("&#x{:X};", c as u32)),
            },
        }
    }
    out
}

/// `<name a="v" ...>` for attribute values that are already encoded.
///
/// A tag without attributes is written as `<name>`, with no trailing space.
pub fn open_tag<'a>(
    name: &str,
    attributes: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> String {
    let mut out = format!("<{name}");
    for (attribute, value) in attributes {
        out.push(' ');
        out.push_str(attribute);
        out.push_str("=\"");
        out.push_str(value);
        out.push('"');
    }
    out.push('>');
    out
}
