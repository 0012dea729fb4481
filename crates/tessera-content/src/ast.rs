//! Serializable markdown block tree.
//!
//! Converts the `pulldown-cmark` event stream into an mdast-like tree so
//! that run-time consumers can walk section content without re-parsing.
//! Node names and field names follow mdast (`listItem`, `thematicBreak`,
//! `depth`, `url`) so the artifact stays familiar to frontend tooling.

use pulldown_cmark::{Alignment, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag};
use serde::{Deserialize, Serialize};

/// Parser options shared by the collector and the renderer.
///
/// Enables the GitHub Flavored Markdown extensions: tables,
/// strikethrough, task lists and GFM blockquote alerts.
#[must_use]
pub fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM
}

/// Table column alignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    None,
    Left,
    Center,
    Right,
}

impl From<&Alignment> for Align {
    fn from(alignment: &Alignment) -> Self {
        match alignment {
            Alignment::None => Self::None,
            Alignment::Left => Self::Left,
            Alignment::Center => Self::Center,
            Alignment::Right => Self::Right,
        }
    }
}

/// Markdown tree node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    Root {
        children: Vec<Node>,
    },
    Paragraph {
        children: Vec<Node>,
    },
    Heading {
        depth: u8,
        children: Vec<Node>,
    },
    Blockquote {
        children: Vec<Node>,
    },
    List {
        ordered: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start: Option<u64>,
        children: Vec<Node>,
    },
    ListItem {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        checked: Option<bool>,
        children: Vec<Node>,
    },
    Table {
        align: Vec<Align>,
        children: Vec<Node>,
    },
    TableRow {
        children: Vec<Node>,
    },
    TableCell {
        children: Vec<Node>,
    },
    Code {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lang: Option<String>,
        value: String,
    },
    Html {
        value: String,
    },
    ThematicBreak,
    Text {
        value: String,
    },
    Emphasis {
        children: Vec<Node>,
    },
    Strong {
        children: Vec<Node>,
    },
    Delete {
        children: Vec<Node>,
    },
    InlineCode {
        value: String,
    },
    Break,
    Link {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        children: Vec<Node>,
    },
    Image {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        alt: String,
    },
}

impl Node {
    /// Parse markdown into a `root` node.
    #[must_use]
    pub fn parse(markdown: &str) -> Self {
        let mut builder = TreeBuilder::new();
        for event in Parser::new_ext(markdown, markdown_options()) {
            builder.event(event);
        }
        builder.finish()
    }

    /// Child nodes (empty for leaves).
    #[must_use]
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Root { children }
            | Self::Paragraph { children }
            | Self::Heading { children, .. }
            | Self::Blockquote { children }
            | Self::List { children, .. }
            | Self::ListItem { children, .. }
            | Self::Table { children, .. }
            | Self::TableRow { children }
            | Self::TableCell { children }
            | Self::Emphasis { children }
            | Self::Strong { children }
            | Self::Delete { children }
            | Self::Link { children, .. } => children,
            _ => &[],
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Self::Root { children }
            | Self::Paragraph { children }
            | Self::Heading { children, .. }
            | Self::Blockquote { children }
            | Self::List { children, .. }
            | Self::ListItem { children, .. }
            | Self::Table { children, .. }
            | Self::TableRow { children }
            | Self::TableCell { children }
            | Self::Emphasis { children }
            | Self::Strong { children }
            | Self::Delete { children }
            | Self::Link { children, .. } => Some(children),
            _ => None,
        }
    }

    /// Concatenated text content of this node and its descendants.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text { value } | Self::InlineCode { value } | Self::Code { value, .. } => {
                out.push_str(value);
            }
            Self::Image { alt, .. } => out.push_str(alt),
            Self::Break => out.push('\n'),
            _ => {
                for child in self.children() {
                    child.collect_text(out);
                }
            }
        }
    }
}

/// Open element on the builder stack.
enum Frame {
    Node(Node),
    /// Container without a tree representation (footnotes, definition
    /// lists, super/subscript). Its children are spliced into the parent.
    Transparent(Vec<Node>),
}

struct TreeBuilder {
    stack: Vec<Frame>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Frame::Node(Node::Root {
                children: Vec::new(),
            })],
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(_) => self.close(),
            Event::Text(text) => self.append(Node::Text {
                value: text.into_string(),
            }),
            Event::Code(code) | Event::InlineMath(code) => self.append(Node::InlineCode {
                value: code.into_string(),
            }),
            Event::DisplayMath(math) => self.append(Node::Code {
                lang: Some("math".to_owned()),
                value: math.into_string(),
            }),
            Event::Html(html) | Event::InlineHtml(html) => self.append(Node::Html {
                value: html.into_string(),
            }),
            Event::FootnoteReference(label) => self.append(Node::Text {
                value: format!("[^{label}]"),
            }),
            Event::SoftBreak => self.append(Node::Text {
                value: "\n".to_owned(),
            }),
            Event::HardBreak => self.append(Node::Break),
            Event::Rule => self.append(Node::ThematicBreak),
            Event::TaskListMarker(checked) => self.mark_task(checked),
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        let node = match tag {
            Tag::Paragraph => Node::Paragraph {
                children: Vec::new(),
            },
            Tag::Heading { level, .. } => Node::Heading {
                depth: heading_depth(level),
                children: Vec::new(),
            },
            Tag::BlockQuote(_) => Node::Blockquote {
                children: Vec::new(),
            },
            Tag::CodeBlock(kind) => Node::Code {
                lang: fence_lang(&kind),
                value: String::new(),
            },
            Tag::HtmlBlock => Node::Html {
                value: String::new(),
            },
            Tag::List(start) => Node::List {
                ordered: start.is_some(),
                start,
                children: Vec::new(),
            },
            Tag::Item => Node::ListItem {
                checked: None,
                children: Vec::new(),
            },
            Tag::Table(alignments) => Node::Table {
                align: alignments.iter().map(Align::from).collect(),
                children: Vec::new(),
            },
            Tag::TableHead | Tag::TableRow => Node::TableRow {
                children: Vec::new(),
            },
            Tag::TableCell => Node::TableCell {
                children: Vec::new(),
            },
            Tag::Emphasis => Node::Emphasis {
                children: Vec::new(),
            },
            Tag::Strong => Node::Strong {
                children: Vec::new(),
            },
            Tag::Strikethrough => Node::Delete {
                children: Vec::new(),
            },
            Tag::Link {
                dest_url, title, ..
            } => Node::Link {
                url: dest_url.into_string(),
                title: non_empty(title),
                children: Vec::new(),
            },
            Tag::Image {
                dest_url, title, ..
            } => Node::Image {
                url: dest_url.into_string(),
                title: non_empty(title),
                alt: String::new(),
            },
            _ => {
                self.stack.push(Frame::Transparent(Vec::new()));
                return;
            }
        };
        self.stack.push(Frame::Node(node));
    }

    fn close(&mut self) {
        // Root is only popped by `finish`.
        if self.stack.len() <= 1 {
            return;
        }
        match self.stack.pop() {
            Some(Frame::Node(mut node)) => {
                if let Node::Code { value, .. } = &mut node
                    && value.ends_with('\n')
                {
                    value.pop();
                }
                self.append(node);
            }
            Some(Frame::Transparent(children)) => {
                for child in children {
                    self.append(child);
                }
            }
            None => {}
        }
    }

    /// Append a node to the innermost open element.
    ///
    /// Leaf elements (code, html, image) absorb the text of what is
    /// appended to them; adjacent text nodes are merged.
    fn append(&mut self, node: Node) {
        let Some(top) = self.stack.last_mut() else {
            return;
        };

        let children = match top {
            Frame::Transparent(children) => children,
            Frame::Node(Node::Code { value, .. } | Node::Html { value }) => {
                value.push_str(&node.plain_text_or_html());
                return;
            }
            Frame::Node(Node::Image { alt, .. }) => {
                alt.push_str(&node.plain_text());
                return;
            }
            Frame::Node(parent) => match parent.children_mut() {
                Some(children) => children,
                None => return,
            },
        };

        if let Node::Text { value } = &node
            && let Some(Node::Text { value: last }) = children.last_mut()
        {
            last.push_str(value);
            return;
        }
        children.push(node);
    }

    fn mark_task(&mut self, done: bool) {
        for frame in self.stack.iter_mut().rev() {
            if let Frame::Node(Node::ListItem { checked, .. }) = frame {
                *checked = Some(done);
                return;
            }
        }
    }

    fn finish(mut self) -> Node {
        while self.stack.len() > 1 {
            self.close();
        }
        match self.stack.pop() {
            Some(Frame::Node(root)) => root,
            _ => Node::Root {
                children: Vec::new(),
            },
        }
    }
}

impl Node {
    fn plain_text_or_html(&self) -> String {
        match self {
            Self::Html { value } => value.clone(),
            _ => self.plain_text(),
        }
    }
}

fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn fence_lang(kind: &CodeBlockKind<'_>) -> Option<String> {
    match kind {
        CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_owned),
        CodeBlockKind::Indented => None,
    }
}

fn non_empty(value: CowStr<'_>) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.into_string())
    }
}
