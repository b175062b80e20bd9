//! Attribute names permitted per tag kind.

use crate::domain::entities::TagKind;

pub const NAME: &str = "name";
pub const CHARSET: &str = "charset";
pub const HTTP_EQUIV: &str = "http-equiv";
pub const PROPERTY: &str = "property";
pub const REL: &str = "rel";
pub const HREF: &str = "href";

/// Static set of attribute names a tag of one kind may lead with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeWhitelist {
    kind: TagKind,
    names: &'static [&'static str],
}

pub const META: AttributeWhitelist = AttributeWhitelist {
    kind: TagKind::Meta,
    names: &[NAME, CHARSET, HTTP_EQUIV, PROPERTY],
};

pub const LINK: AttributeWhitelist = AttributeWhitelist {
    kind: TagKind::Link,
    names: &[REL, HREF],
};

impl AttributeWhitelist {
    /// Whitelist for a reconciled kind. `base` is taken as declared and has none.
    pub fn for_kind(kind: TagKind) -> Option<&'static AttributeWhitelist> {
        match kind {
            TagKind::Meta => Some(&META),
            TagKind::Link => Some(&LINK),
            TagKind::Base => None,
        }
    }

    pub fn kind(&self) -> TagKind {
        self.kind
    }

    pub fn names(&self) -> &'static [&'static str] {
        self.names
    }

    /// Case-insensitive membership test.
    pub fn permits(&self, name: &str) -> bool {
        self.names.iter().any(|n| n.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(TagKind::Meta, "name", true)]
    #[case(TagKind::Meta, "HTTP-EQUIV", true)]
    #[case(TagKind::Meta, "property", true)]
    #[case(TagKind::Meta, "content", false)]
    #[case(TagKind::Meta, "rel", false)]
    #[case(TagKind::Link, "Rel", true)]
    #[case(TagKind::Link, "href", true)]
    #[case(TagKind::Link, "name", false)]
    fn given_attribute_name_when_checking_whitelist_then_matches_kind(
        #[case] kind: TagKind,
        #[case] name: &str,
        #[case] expected: bool,
    ) {
        let whitelist = AttributeWhitelist::for_kind(kind).unwrap();
        assert_eq!(whitelist.permits(name), expected);
    }

    #[test]
    fn given_base_kind_when_looking_up_whitelist_then_none() {
        assert!(AttributeWhitelist::for_kind(TagKind::Base).is_none());
    }
}
