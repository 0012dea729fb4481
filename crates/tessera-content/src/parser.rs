//! Section parsing.
//!
//! Turns one content file into a [`Section`]: front matter gives the
//! component and props, the body becomes [`SectionContent`], and the
//! file name gives the ordering id.

use crate::error::ParseError;
use crate::frontmatter::{FrontMatter, parse_front_matter, split_front_matter};
use crate::section::{Section, SectionContent};

/// Derive the ordering id from a content file name.
///
/// Strips the `.md` extension and returns the token before the first `-`.
///
/// # Examples
///
/// ```
/// use tessera_content::section_id_from_file_name;
///
/// assert_eq!(section_id_from_file_name("1.1-hero.md"), "1.1");
/// assert_eq!(section_id_from_file_name("3.md"), "3");
/// assert_eq!(section_id_from_file_name("bad-section.md"), "bad");
/// ```
#[must_use]
pub fn section_id_from_file_name(file_name: &str) -> &str {
    let stem = file_name.strip_suffix(".md").unwrap_or(file_name);
    stem.split('-').next().unwrap_or(stem)
}

/// Parse one content source into a [`Section`].
///
/// The id is taken verbatim from the file name; whether it is a valid
/// ordering key is checked by the page collector, which sorts invalid
/// ids last.
///
/// # Errors
///
/// Returns [`ParseError::Metadata`] if the front matter is malformed and
/// [`ParseError::MissingComponent`] if it does not name a component.
pub fn parse_section(file_name: &str, source: &str) -> Result<Section, ParseError> {
    let metadata_error = |message: String| ParseError::Metadata {
        file: file_name.to_owned(),
        message,
    };

    let (yaml, body) = split_front_matter(source).map_err(metadata_error)?;
    let front_matter = match yaml {
        Some(yaml) => parse_front_matter(yaml).map_err(metadata_error)?,
        None => FrontMatter::default(),
    };

    let component = front_matter
        .component
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| ParseError::MissingComponent {
            file: file_name.to_owned(),
        })?;

    Ok(Section {
        id: section_id_from_file_name(file_name).to_owned(),
        component,
        props: front_matter.props.unwrap_or_default(),
        content: SectionContent::new(body),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ast::Node;

    #[test]
    fn test_section_id_from_file_name() {
        assert_eq!(section_id_from_file_name("1-hero.md"), "1");
        assert_eq!(section_id_from_file_name("2.1-list.md"), "2.1");
        assert_eq!(section_id_from_file_name("2.1-feature-grid.md"), "2.1");
        assert_eq!(section_id_from_file_name("4.md"), "4");
        assert_eq!(section_id_from_file_name("notes.md"), "notes");
        assert_eq!(section_id_from_file_name("-hero.md"), "");
    }

    #[test]
    fn test_parse_full_section() {
        let source = "---\ncomponent: Hero\nprops:\n  title: Welcome\n---\n# Hello\n\nIntro text.\n";
        let section = parse_section("1-hero.md", source).unwrap();

        assert_eq!(section.id, "1");
        assert_eq!(section.component, "Hero");
        assert_eq!(section.props["title"], serde_json::json!("Welcome"));
        assert_eq!(section.content.raw, "# Hello\n\nIntro text.\n");
        assert!(matches!(
            section.content.ast.children()[0],
            Node::Heading { depth: 1, .. }
        ));
    }

    #[test]
    fn test_parse_without_props_gives_empty_props() {
        let section = parse_section("2-list.md", "---\ncomponent: List\n---\n- a\n").unwrap();
        assert!(section.props.is_empty());
    }

    #[test]
    fn test_parse_malformed_metadata() {
        let err = parse_section("bad-section.md", "---\ncomponent: [oops\n---\nBody").unwrap_err();
        assert!(matches!(err, ParseError::Metadata { ref file, .. } if file == "bad-section.md"));
    }

    #[test]
    fn test_parse_unterminated_metadata() {
        let err = parse_section("1-x.md", "---\ncomponent: Hero\n").unwrap_err();
        assert!(matches!(err, ParseError::Metadata { .. }));
    }

    #[test]
    fn test_parse_missing_component() {
        let err = parse_section("1-x.md", "---\nprops:\n  a: 1\n---\nBody").unwrap_err();
        assert!(matches!(err, ParseError::MissingComponent { .. }));
    }

    #[test]
    fn test_parse_no_front_matter_is_missing_component() {
        let err = parse_section("1-x.md", "# Only body").unwrap_err();
        assert!(matches!(err, ParseError::MissingComponent { .. }));
    }

    #[test]
    fn test_parse_blank_component() {
        let err = parse_section("1-x.md", "---\ncomponent: \"  \"\n---\n").unwrap_err();
        assert!(matches!(err, ParseError::MissingComponent { .. }));
    }

    #[test]
    fn test_parse_keeps_invalid_id_verbatim() {
        let section = parse_section("intro-text.md", "---\ncomponent: Text\n---\n").unwrap();
        assert_eq!(section.id, "intro");
        assert!(section.section_id().is_none());
    }
}
