//! Tests for static rendering

use pretty_assertions::assert_eq;
use rstest::rstest;

use rshead::application::services::{render_markup, render_structured, StaticRenderer};
use rshead::domain::{reduce, AttributeMap, Declaration, TagKind};

const MARKER: &str = "data-rshead";

#[rstest]
#[case::meta_charset(TagKind::Meta, vec![vec![("charset", "utf-8")]])]
#[case::meta_http_equiv(TagKind::Meta, vec![vec![("http-equiv", "refresh"), ("content", "5; url=/next")]])]
#[case::link_pair(TagKind::Link, vec![
    vec![("rel", "stylesheet"), ("href", "/a.css?v=1&x=2")],
    vec![("rel", "alternate"), ("hreflang", "d\u{e9}"), ("href", "/de")],
])]
#[case::base_bare(TagKind::Base, vec![vec![]])]
#[case::quotes(TagKind::Meta, vec![vec![("name", "q"), ("content", r#"He said "it's `fine`""#)]])]
fn given_tags_when_rendering_both_modes_then_structured_text_equals_markup(
    #[case] kind: TagKind,
    #[case] tags: Vec<Vec<(&str, &str)>>,
) {
    // Arrange
    let tags: Vec<AttributeMap> = tags
        .into_iter()
        .map(|pairs| pairs.into_iter().collect())
        .collect();

    // Act
    let markup = render_markup(kind, &tags, MARKER);
    let structured = render_structured(kind, &tags, MARKER);

    // Assert
    assert_eq!(structured.to_string(), markup);
    assert_eq!(structured.nodes().len(), tags.len());
}

#[test]
fn given_no_tags_when_rendering_then_empty_output() {
    assert_eq!(render_markup(TagKind::Link, &[], MARKER), "");
    assert!(render_structured(TagKind::Link, &[], MARKER).is_empty());
}

#[test]
fn given_tag_without_attributes_when_rendering_markup_then_marker_only() {
    let html = render_markup(TagKind::Base, &[AttributeMap::new()], MARKER);
    assert_eq!(html, r#"<base data-rshead="true">"#);
}

#[test]
fn given_resolved_state_when_rendering_then_keys_restart_per_kind() {
    // Arrange
    let declarations = vec![Declaration::new()
        .with_title("Caf\u{e9} & Bar")
        .with_meta([
            AttributeMap::from([("charset", "utf-8")]),
            AttributeMap::from([("name", "description"), ("content", "x")]),
        ])
        .with_link([AttributeMap::from([("rel", "icon"), ("href", "/f.ico")])])];
    let state = reduce(&declarations, "%s");

    // Act
    let head = StaticRenderer::new(MARKER).render(&state);

    // Assert
    assert_eq!(head.title, "Caf&eacute; &amp; Bar");
    let meta_keys: Vec<_> = head.meta.nodes().iter().map(|n| n.key).collect();
    let link_keys: Vec<_> = head.link.nodes().iter().map(|n| n.key).collect();
    assert_eq!(meta_keys, vec![0, 1]);
    assert_eq!(link_keys, vec![0]);
    assert_eq!(
        head.to_markup(true),
        concat!(
            "<title>Caf&eacute; &amp; Bar</title>",
            r#"<meta data-rshead="true" charset="utf-8">"#,
            r#"<meta data-rshead="true" name="description" content="x">"#,
            r#"<link data-rshead="true" rel="icon" href="/f.ico">"#,
        )
    );
}

#[test]
fn given_static_head_when_serializing_then_json_groups_by_kind() {
    let state = reduce(
        &[Declaration::new()
            .with_title("T")
            .with_meta([AttributeMap::from([("http-equiv", "refresh"), ("content", "30")])])],
        "%s",
    );

    let json = serde_json::to_value(StaticRenderer::new(MARKER).render(&state)).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "title": "T",
            "base": [],
            "meta": [{"type": "meta", "props": {"key": 0, "data-rshead": true, "httpEquiv": "refresh", "content": "30"}}],
            "link": []
        })
    );
}
