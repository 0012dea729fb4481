//! Template-backed components.
//!
//! Templates are HTML with `{{ name }}` placeholders:
//!
//! - `{{ content }}` - section markdown rendered to HTML (not escaped)
//! - `{{ raw }}` - section markdown source, escaped
//! - `{{ a.b.c }}` - prop value at a dotted path, escaped
//!
//! Missing props render as nothing. Objects and arrays render as compact JSON.

use serde_json::Value;
use tessera_content::{Props, SectionContent};

use crate::component::Component;
use crate::error::TemplateError;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Content,
    Raw,
    Prop(Vec<String>),
}

/// Component rendered from an HTML template.
#[derive(Clone, Debug)]
pub struct TemplateComponent {
    segments: Vec<Segment>,
}

impl TemplateComponent {
    /// Parse a template.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] for unclosed or empty placeholders.
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = template;
        let mut offset = 0;

        while let Some(start) = rest.find("{{") {
            if start > 0 {
                segments.push(Segment::Literal(rest[..start].to_owned()));
            }
            let inner = &rest[start + 2..];
            let end = inner
                .find("}}")
                .ok_or(TemplateError::Unclosed(offset + start))?;
            let segment = match inner[..end].trim() {
                "" => return Err(TemplateError::EmptyPlaceholder(offset + start)),
                "content" => Segment::Content,
                "raw" => Segment::Raw,
                path => Segment::Prop(path.split('.').map(str::to_owned).collect()),
            };
            segments.push(segment);

            let consumed = start + 2 + end + 2;
            rest = &rest[consumed..];
            offset += consumed;
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_owned()));
        }

        Ok(Self { segments })
    }
}

impl Component for TemplateComponent {
    fn render(&self, props: &Props, content: &SectionContent) -> String {
        let mut html = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => html.push_str(text),
                Segment::Content => html.push_str(&content.to_html()),
                Segment::Raw => html.push_str(&escape_html(&content.raw)),
                Segment::Prop(path) => {
                    if let Some(value) = lookup(props, path) {
                        html.push_str(&escape_html(&display_value(value)));
                    }
                }
            }
        }
        html
    }
}

fn lookup<'a>(props: &'a Props, path: &[String]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    rest.iter().try_fold(props.get(first)?, |value, key| match value {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn render(template: &str, props: &Value, markdown: &str) -> String {
        let component = TemplateComponent::parse(template).unwrap();
        let props = props.as_object().cloned().unwrap_or_default();
        component.render(&props, &SectionContent::new(markdown))
    }

    #[test]
    fn test_literal_only() {
        assert_eq!(render("<hr>", &json!({}), ""), "<hr>");
        assert_eq!(render("", &json!({}), ""), "");
    }

    #[test]
    fn test_content_is_rendered_markdown() {
        assert_eq!(
            render("<div>{{content}}</div>", &json!({}), "**bold**"),
            "<div><p><strong>bold</strong></p>\n</div>"
        );
    }

    #[test]
    fn test_raw_is_escaped() {
        assert_eq!(render("<pre>{{ raw }}</pre>", &json!({}), "<b>"), "<pre>&lt;b&gt;</pre>");
    }

    #[test]
    fn test_prop_paths() {
        let props = json!({
            "title": "Tom & Jerry",
            "cta": { "label": "Go", "items": ["first", "second"] },
            "count": 3,
            "flag": true,
            "nothing": null
        });

        assert_eq!(render("{{ title }}", &props, ""), "Tom &amp; Jerry");
        assert_eq!(render("{{ cta.label }}", &props, ""), "Go");
        assert_eq!(render("{{ cta.items.1 }}", &props, ""), "second");
        assert_eq!(render("{{ count }}/{{ flag }}", &props, ""), "3/true");
        assert_eq!(render("[{{ nothing }}]", &props, ""), "[]");
        assert_eq!(render("[{{ missing.path }}]", &props, ""), "[]");
        assert_eq!(render("[{{ title.deeper }}]", &props, ""), "[]");
    }

    #[test]
    fn test_non_scalar_prop_renders_as_json() {
        let props = json!({ "items": ["a", "b"] });
        assert_eq!(render("{{ items }}", &props, ""), "[&quot;a&quot;,&quot;b&quot;]");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            TemplateComponent::parse("<p>{{ title</p>").unwrap_err(),
            TemplateError::Unclosed(3)
        );
        assert_eq!(
            TemplateComponent::parse("ab{{ x }}{{  }}").unwrap_err(),
            TemplateError::EmptyPlaceholder(9)
        );
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;");
    }
}
