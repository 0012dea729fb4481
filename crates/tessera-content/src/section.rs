//! Section data model.
//!
//! A [`Section`] is one ordered unit of page content bound to a target
//! component. Its serialized shape is the build/run boundary:
//!
//! ```json
//! { "id": "1.1", "component": "Hero", "props": {}, "content": { "raw": "...", "ast": {} } }
//! ```

use std::fmt;

use pulldown_cmark::{Parser, html};
use serde::{Deserialize, Serialize};

use crate::ast::{Node, markdown_options};

/// Component parameters from the `props` metadata key.
///
/// Values are passed through opaquely; nested structures are allowed.
pub type Props = serde_json::Map<String, serde_json::Value>;

/// Numeric ordering key parsed from a section id (`major[.minor]`).
///
/// Ordering is by `major`, then `minor`. A missing minor part is `0`,
/// so `"2"` and `"2.0"` compare equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SectionId {
    /// Major position.
    pub major: u64,
    /// Minor position within the major slot.
    pub minor: u64,
}

impl SectionId {
    /// Parse `"1"` or `"1.2"` into an ordering key.
    ///
    /// Returns `None` for anything else (empty parts, signs, letters,
    /// more than two parts).
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_content::SectionId;
    ///
    /// assert_eq!(SectionId::parse("2.1"), Some(SectionId { major: 2, minor: 1 }));
    /// assert_eq!(SectionId::parse("3"), Some(SectionId { major: 3, minor: 0 }));
    /// assert_eq!(SectionId::parse("bad"), None);
    /// ```
    #[must_use]
    pub fn parse(id: &str) -> Option<Self> {
        let (major, minor) = match id.split_once('.') {
            Some((major, minor)) => (major, Some(minor)),
            None => (id, None),
        };

        let major = parse_part(major)?;
        let minor = match minor {
            Some(minor) => parse_part(minor)?,
            None => 0,
        };

        Some(Self { major, minor })
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

fn parse_part(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// One unit of page content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Ordering id as written in the file name (e.g., "1.2").
    pub id: String,
    /// Name of the component that renders this section.
    pub component: String,
    /// Component parameters.
    #[serde(default)]
    pub props: Props,
    /// Markdown body.
    pub content: SectionContent,
}

impl Section {
    /// Parsed ordering key, or `None` if the id is not numeric.
    #[must_use]
    pub fn section_id(&self) -> Option<SectionId> {
        SectionId::parse(&self.id)
    }
}

/// Section body: raw markdown plus its block tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectionContent {
    /// Markdown source (front matter stripped).
    pub raw: String,
    /// Parsed block tree.
    pub ast: Node,
}

impl SectionContent {
    /// Create content from markdown, parsing the block tree eagerly.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let ast = Node::parse(&raw);
        Self { raw, ast }
    }

    /// Start a fresh lazy parse over the raw markdown.
    ///
    /// Each call returns an independent event stream.
    #[must_use]
    pub fn events(&self) -> Parser<'_> {
        Parser::new_ext(&self.raw, markdown_options())
    }

    /// Render the markdown body to HTML.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::with_capacity(self.raw.len() + self.raw.len() / 2);
        html::push_html(&mut out, self.events());
        out
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_major_only() {
        assert_eq!(SectionId::parse("1"), Some(SectionId { major: 1, minor: 0 }));
        assert_eq!(SectionId::parse("10"), Some(SectionId { major: 10, minor: 0 }));
    }

    #[test]
    fn test_parse_major_minor() {
        assert_eq!(SectionId::parse("2.1"), Some(SectionId { major: 2, minor: 1 }));
        assert_eq!(SectionId::parse("0.15"), Some(SectionId { major: 0, minor: 15 }));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        for id in ["", "bad", "1.", ".1", "1.2.3", "-1", "+1", "1a", "1.b", " 1"] {
            assert_eq!(SectionId::parse(id), None, "id {id:?} should not parse");
        }
    }

    #[test]
    fn test_ordering_is_numeric_not_lexicographic() {
        let a = SectionId::parse("2").unwrap();
        let b = SectionId::parse("10").unwrap();
        let c = SectionId::parse("2.10").unwrap();
        let d = SectionId::parse("2.9").unwrap();

        assert!(a < b);
        assert!(d < c);
        assert!(c < b);
        assert_eq!(SectionId::parse("2.0"), SectionId::parse("2"));
    }

    #[test]
    fn test_content_to_html() {
        let content = SectionContent::new("# Title\n\nSome *text*.");
        assert_eq!(
            content.to_html(),
            "<h1>Title</h1>\n<p>Some <em>text</em>.</p>\n"
        );
    }

    #[test]
    fn test_events_restart_from_beginning() {
        let content = SectionContent::new("one\n\ntwo");
        let first = content.events().count();
        let second = content.events().count();
        assert_eq!(first, second);
        assert!(first > 0);
    }

    #[test]
    fn test_section_serialized_shape() {
        let section = Section {
            id: "1.1".to_owned(),
            component: "Hero".to_owned(),
            props: serde_json::json!({"title": "Hi"}).as_object().unwrap().clone(),
            content: SectionContent::new("Hello"),
        };

        let json = serde_json::to_value(&section).unwrap();
        assert_eq!(json["id"], "1.1");
        assert_eq!(json["component"], "Hero");
        assert_eq!(json["props"]["title"], "Hi");
        assert_eq!(json["content"]["raw"], "Hello");
        assert_eq!(json["content"]["ast"]["type"], "root");
    }

    #[test]
    fn test_section_props_default_when_absent() {
        let json = serde_json::json!({
            "id": "1",
            "component": "Hero",
            "content": {"raw": "", "ast": {"type": "root", "children": []}}
        });
        let section: Section = serde_json::from_value(json).unwrap();
        assert!(section.props.is_empty());
    }
}
