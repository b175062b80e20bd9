//! Tests for head reconciliation across nested declarations

use pretty_assertions::assert_eq;
use rstest::rstest;

use rshead::domain::{reconcile_kind, reduce, resolve_title, AttributeMap, Declaration, TagKind};

fn meta(pairs: &[(&str, &str)]) -> AttributeMap {
    pairs.iter().copied().collect()
}

#[test]
fn given_same_name_in_outer_and_inner_when_reducing_then_inner_wins() {
    // Arrange
    let declarations = vec![
        Declaration::new().with_meta([meta(&[("name", "d"), ("content", "A")])]),
        Declaration::new().with_meta([meta(&[("name", "d"), ("content", "B")])]),
    ];

    // Act
    let state = reduce(&declarations, "%s");

    // Assert
    assert_eq!(state.meta_tags, vec![meta(&[("name", "d"), ("content", "B")])]);
}

#[rstest]
#[case::only_declaration(vec![vec![("foo", "bar")]])]
#[case::outer_position(vec![vec![("foo", "bar")], vec![("charset", "utf-8")]])]
#[case::inner_position(vec![vec![("charset", "utf-8")], vec![("foo", "bar")]])]
fn given_non_whitelisted_first_attribute_when_reducing_then_tag_dropped(
    #[case] layers: Vec<Vec<(&str, &str)>>,
) {
    // Arrange
    let declarations: Vec<Declaration> = layers
        .iter()
        .map(|tag| Declaration::new().with_meta([meta(tag)]))
        .collect();

    // Act
    let state = reduce(&declarations, "%s");

    // Assert
    assert!(state.meta_tags.iter().all(|t| t.get("foo").is_none()));
}

#[test]
fn given_duplicates_in_one_declaration_when_reducing_then_both_retained() {
    let declarations = vec![Declaration::new().with_meta([
        meta(&[("property", "og:image"), ("content", "a.png")]),
        meta(&[("property", "og:image"), ("content", "b.png")]),
    ])];

    let state = reduce(&declarations, "%s");

    assert_eq!(state.meta_tags.len(), 2);
}

#[test]
fn given_three_levels_when_reconciling_then_innermost_tags_lead() {
    // Arrange
    let declarations = vec![
        Declaration::new().with_link([
            meta(&[("rel", "icon"), ("href", "/root.ico")]),
            meta(&[("rel", "stylesheet"), ("href", "/site.css")]),
        ]),
        Declaration::new().with_link([meta(&[("rel", "canonical"), ("href", "/section")])]),
        Declaration::new().with_link([meta(&[("rel", "icon"), ("href", "/page.ico")])]),
    ];

    // Act
    let links = reconcile_kind(TagKind::Link, &declarations);

    // Assert
    let hrefs: Vec<_> = links.iter().filter_map(|t| t.get("href")).collect();
    assert_eq!(hrefs, vec!["/page.ico", "/section", "/site.css"]);
}

#[test]
fn given_base_in_several_declarations_when_reducing_then_innermost_base_only() {
    let declarations = vec![
        Declaration::new().with_base([("href", "/"), ("target", "_blank")]),
        Declaration::new().with_title("no base here"),
        Declaration::new().with_base([("href", "/docs/")]),
    ];

    let state = reduce(&declarations, "%s");

    assert_eq!(state.base_tag, vec![meta(&[("href", "/docs/")])]);
}

#[rstest]
#[case::template_applied(Some("Page"), Some("Site - %s"), "Site - Page")]
#[case::no_template(Some("Page"), None, "Page")]
#[case::no_title(None, Some("Site - %s"), "")]
#[case::nothing(None, None, "")]
fn given_title_and_template_when_resolving_then_substitutes(
    #[case] title: Option<&str>,
    #[case] template: Option<&str>,
    #[case] expected: &str,
) {
    // Arrange: title and template in separate declarations
    let mut inner = Declaration::new();
    if let Some(title) = title {
        inner = inner.with_title(title);
    }
    let mut outer = Declaration::new();
    if let Some(template) = template {
        outer = outer.with_title_template(template);
    }

    // Act
    let resolved = resolve_title(&[outer, inner], "%s");

    // Assert
    assert_eq!(resolved, expected);
}

#[test]
fn given_no_declarations_when_reducing_then_empty_state() {
    let state = reduce(&[], "%s");

    assert_eq!(state.title, "");
    assert!(state.base_tag.is_empty());
    assert!(state.meta_tags.is_empty());
    assert!(state.link_tags.is_empty());
}
