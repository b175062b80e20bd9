//! Tag reconciliation: collapse per-node declarations into one deduplicated state.
//!
//! Declarations are ordered outermost to innermost. The innermost declaration wins:
//! a `(attribute, value)` pair approved by an inner declaration blocks the same pair in
//! every outer one. Tags of a single declaration never block each other, because the
//! pairs they introduce are only approved once the whole declaration has been processed.
//!
//! Only the first attribute of a tag is examined. It must be whitelisted for the tag kind
//! and its value must not have been approved yet; later attributes are carried along as-is.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::domain::entities::{AttributeMap, Declaration, ResolvedState, TagKind};
use crate::domain::title::resolve_title;
use crate::domain::whitelist::{self, AttributeWhitelist};

/// Per attribute-name set of lowercase values, scoped to one reconciliation pass.
#[derive(Debug, Default)]
struct SeenValueIndex {
    values: HashMap<String, HashSet<String>>,
}

impl SeenValueIndex {
    fn contains(&self, name: &str, value: &str) -> bool {
        self.values
            .get(name)
            .is_some_and(|values| values.contains(value))
    }

    fn insert(&mut self, name: String, value: String) {
        self.values.entry(name).or_default().insert(value);
    }

    fn absorb(&mut self, other: SeenValueIndex) {
        for (name, values) in other.values {
            self.values.entry(name).or_default().extend(values);
        }
    }
}

/// Deduplicate the tags of one kind across all declarations.
///
/// Output order: the innermost declaration's surviving tags first, each declaration's
/// tags in their declared order.
pub fn reconcile(whitelist: &AttributeWhitelist, declarations: &[Declaration]) -> Vec<AttributeMap> {
    let kind = whitelist.kind();
    let mut approved = SeenValueIndex::default();
    let mut accepted = Vec::new();

    for tags in declarations.iter().rev().filter_map(|d| d.tags(kind)) {
        let mut instance_seen = SeenValueIndex::default();
        for tag in tags {
            if admit(whitelist, &approved, &mut instance_seen, tag) {
                accepted.push(tag.clone());
            }
        }
        approved.absorb(instance_seen);
    }

    accepted
}

fn admit(
    whitelist: &AttributeWhitelist,
    approved: &SeenValueIndex,
    instance_seen: &mut SeenValueIndex,
    tag: &AttributeMap,
) -> bool {
    let Some((name, value)) = tag.first() else {
        trace!(kind = %whitelist.kind(), "dropping tag without attributes");
        return false;
    };

    let name = name.to_lowercase();
    if !whitelist.permits(&name) {
        trace!(kind = %whitelist.kind(), attribute = %name, "dropping tag: attribute not whitelisted");
        return false;
    }

    let value = value.to_lowercase();
    if approved.contains(&name, &value) {
        trace!(kind = %whitelist.kind(), attribute = %name, value = %value, "dropping tag: overridden by inner declaration");
        return false;
    }

    instance_seen.insert(name, value);
    true
}

/// Innermost declared base tag, as a zero- or one-element list.
pub fn resolve_base(declarations: &[Declaration]) -> Vec<AttributeMap> {
    declarations
        .iter()
        .rev()
        .find_map(|d| d.base.clone())
        .into_iter()
        .collect()
}

/// Reduce a full declaration list to the resolved head state.
pub fn reduce(declarations: &[Declaration], placeholder: &str) -> ResolvedState {
    let state = ResolvedState {
        title: resolve_title(declarations, placeholder),
        base_tag: resolve_base(declarations),
        meta_tags: reconcile(&whitelist::META, declarations),
        link_tags: reconcile(&whitelist::LINK, declarations),
    };
    trace!(
        declarations = declarations.len(),
        meta = state.meta_tags.len(),
        link = state.link_tags.len(),
        base = state.base_tag.len(),
        "reduced declarations"
    );
    state
}

/// Tags of `kind` in resolved form, for callers that iterate kinds generically.
pub fn reconcile_kind(kind: TagKind, declarations: &[Declaration]) -> Vec<AttributeMap> {
    match AttributeWhitelist::for_kind(kind) {
        Some(whitelist) => reconcile(whitelist, declarations),
        None => resolve_base(declarations),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::title::DEFAULT_PLACEHOLDER;
    use pretty_assertions::assert_eq;

    fn meta(pairs: &[(&str, &str)]) -> AttributeMap {
        pairs.iter().copied().collect()
    }

    #[test]
    fn given_same_name_in_outer_and_inner_when_reconciling_then_inner_wins() {
        let declarations = vec![
            Declaration::new().with_meta([[("name", "d"), ("content", "A")]]),
            Declaration::new().with_meta([[("name", "d"), ("content", "B")]]),
        ];

        let tags = reconcile(&whitelist::META, &declarations);

        assert_eq!(tags, vec![meta(&[("name", "d"), ("content", "B")])]);
    }

    #[test]
    fn given_unknown_leading_attribute_when_reconciling_then_drops_tag() {
        let declarations = vec![
            Declaration::new().with_meta([[("foo", "bar")]]),
            Declaration::new().with_meta([
                meta(&[("name", "a"), ("content", "1")]),
                meta(&[("foo", "bar")]),
            ]),
        ];

        let tags = reconcile(&whitelist::META, &declarations);

        assert_eq!(tags, vec![meta(&[("name", "a"), ("content", "1")])]);
    }

    #[test]
    fn given_duplicates_within_one_declaration_when_reconciling_then_keeps_both() {
        let tag = meta(&[("name", "d"), ("content", "A")]);
        let declarations = vec![Declaration::new().with_meta([tag.clone(), tag.clone()])];

        let tags = reconcile(&whitelist::META, &declarations);

        assert_eq!(tags, vec![tag.clone(), tag]);
    }

    #[test]
    fn given_inner_duplicates_when_reconciling_then_outer_reuse_is_blocked() {
        let declarations = vec![
            Declaration::new().with_meta([[("name", "d"), ("content", "outer")]]),
            Declaration::new().with_meta([
                meta(&[("name", "d"), ("content", "1")]),
                meta(&[("name", "d"), ("content", "2")]),
            ]),
        ];

        let tags = reconcile(&whitelist::META, &declarations);

        assert_eq!(
            tags,
            vec![
                meta(&[("name", "d"), ("content", "1")]),
                meta(&[("name", "d"), ("content", "2")]),
            ]
        );
    }

    #[test]
    fn given_values_differing_in_case_when_reconciling_then_treated_as_equal() {
        let declarations = vec![
            Declaration::new().with_meta([[("NAME", "Description"), ("content", "outer")]]),
            Declaration::new().with_meta([[("name", "description"), ("content", "inner")]]),
        ];

        let tags = reconcile(&whitelist::META, &declarations);

        assert_eq!(
            tags,
            vec![meta(&[("name", "description"), ("content", "inner")])]
        );
    }

    #[test]
    fn given_several_declarations_when_reconciling_then_innermost_tags_come_first() {
        let declarations = vec![
            Declaration::new().with_link([[("rel", "icon"), ("href", "/favicon.ico")]]),
            Declaration::new().with_link([
                meta(&[("rel", "canonical"), ("href", "/a")]),
                meta(&[("href", "/style.css"), ("rel", "stylesheet")]),
            ]),
        ];

        let tags = reconcile(&whitelist::LINK, &declarations);

        assert_eq!(
            tags,
            vec![
                meta(&[("rel", "canonical"), ("href", "/a")]),
                meta(&[("href", "/style.css"), ("rel", "stylesheet")]),
                meta(&[("rel", "icon"), ("href", "/favicon.ico")]),
            ]
        );
    }

    #[test]
    fn given_second_attribute_collides_when_reconciling_then_only_first_attribute_decides() {
        // Both tags lead with a distinct `name`; the shared `charset` is never examined.
        let declarations = vec![
            Declaration::new().with_meta([[("name", "a"), ("charset", "utf-8")]]),
            Declaration::new().with_meta([[("name", "b"), ("charset", "utf-8")]]),
        ];

        let tags = reconcile(&whitelist::META, &declarations);

        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn given_empty_tag_when_reconciling_then_dropped() {
        let declarations = vec![Declaration::new().with_meta([AttributeMap::new()])];
        assert!(reconcile(&whitelist::META, &declarations).is_empty());
    }

    #[test]
    fn given_several_bases_when_resolving_then_innermost_wins() {
        let declarations = vec![
            Declaration::new().with_base([("href", "/outer/")]),
            Declaration::new().with_title("no base here"),
            Declaration::new().with_base([("href", "/inner/"), ("target", "_blank")]),
            Declaration::new(),
        ];

        assert_eq!(
            resolve_base(&declarations),
            vec![meta(&[("href", "/inner/"), ("target", "_blank")])]
        );
        assert_eq!(
            reconcile_kind(TagKind::Base, &declarations),
            resolve_base(&declarations)
        );
    }

    #[test]
    fn given_full_declarations_when_reducing_then_builds_every_field() {
        let declarations = vec![
            Declaration::new()
                .with_title_template("Site - %s")
                .with_meta([[("charset", "utf-8")]]),
            Declaration::new()
                .with_title("Page")
                .with_link([[("rel", "canonical"), ("href", "https://example.com/page")]]),
        ];

        let state = reduce(&declarations, DEFAULT_PLACEHOLDER);

        assert_eq!(state.title, "Site - Page");
        assert!(state.base_tag.is_empty());
        assert_eq!(state.meta_tags, vec![meta(&[("charset", "utf-8")])]);
        assert_eq!(
            state.link_tags,
            vec![meta(&[("rel", "canonical"), ("href", "https://example.com/page")])]
        );
    }
}
