//! Title resolution with template substitution.

use crate::domain::entities::Declaration;

/// Placeholder replaced by the base title inside a title template.
pub const DEFAULT_PLACEHOLDER: &str = "%s";

/// Resolve the final title from declarations ordered outermost to innermost.
///
/// The innermost non-empty `title` and the innermost non-empty `title_template` are found
/// independently, so a template declared by an outer node still wraps an inner title.
/// No escaping happens here.
pub fn resolve_title(declarations: &[Declaration], placeholder: &str) -> String {
    let title = innermost(declarations, |d| d.title.as_deref());
    let template = innermost(declarations, |d| d.title_template.as_deref());

    match (title, template) {
        (Some(title), Some(template)) if !placeholder.is_empty() => {
            template.replace(placeholder, title)
        }
        (Some(title), _) => title.to_string(),
        (None, _) => String::new(),
    }
}

fn innermost<'a>(
    declarations: &'a [Declaration],
    pick: impl Fn(&'a Declaration) -> Option<&'a str>,
) -> Option<&'a str> {
    declarations
        .iter()
        .rev()
        .filter_map(pick)
        .find(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_title_and_outer_template_when_resolving_then_substitutes() {
        let declarations = vec![
            Declaration::new().with_title("Page"),
            Declaration::new().with_title_template("Site - %s"),
        ];
        assert_eq!(resolve_title(&declarations, DEFAULT_PLACEHOLDER), "Site - Page");
    }

    #[test]
    fn given_template_with_repeated_placeholder_when_resolving_then_replaces_all() {
        let declarations = vec![Declaration::new()
            .with_title("A")
            .with_title_template("%s | %s")];
        assert_eq!(resolve_title(&declarations, DEFAULT_PLACEHOLDER), "A | A");
    }

    #[test]
    fn given_empty_inner_title_when_resolving_then_outer_title_wins() {
        let declarations = vec![
            Declaration::new().with_title("Outer"),
            Declaration::new().with_title(""),
        ];
        assert_eq!(resolve_title(&declarations, DEFAULT_PLACEHOLDER), "Outer");
    }

    #[test]
    fn given_template_without_title_when_resolving_then_empty() {
        let declarations = vec![Declaration::new().with_title_template("Site - %s")];
        assert_eq!(resolve_title(&declarations, DEFAULT_PLACEHOLDER), "");
    }

    #[test]
    fn given_custom_placeholder_when_resolving_then_uses_it() {
        let declarations = vec![Declaration::new()
            .with_title("Docs")
            .with_title_template("{title} :: Site")];
        assert_eq!(resolve_title(&declarations, "{title}"), "Docs :: Site");
    }

    #[test]
    fn given_no_declarations_when_resolving_then_empty() {
        assert_eq!(resolve_title(&[], DEFAULT_PLACEHOLDER), "");
    }
}
