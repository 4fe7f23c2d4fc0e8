//! Styled content tree of a page
//!
//! A page's content is a single container element (the editable page area)
//! holding nested elements and text. The tree is the serialized form the
//! editing surface hands over on sync and the form history snapshots store.

use crate::style::{parse_declarations, StyleProperty, TextStyle};
use serde::{Deserialize, Serialize};

/// Class carried by every page container
pub const PAGE_CONTENT_CLASS: &str = "page-content";

/// A node in the content tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentNode {
    Element(Element),
    Text { text: String },
}

impl ContentNode {
    /// Create a text node
    pub fn text(text: impl Into<String>) -> Self {
        ContentNode::Text { text: text.into() }
    }

    /// Append the text of this subtree to `out`
    fn collect_text(&self, out: &mut String) {
        match self {
            ContentNode::Text { text } => out.push_str(text),
            ContentNode::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
        }
    }
}

impl From<Element> for ContentNode {
    fn from(element: Element) -> Self {
        ContentNode::Element(element)
    }
}

/// A styled element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Tag name (lowercase)
    pub tag: String,
    /// Typed visual text style declared on this element
    #[serde(default)]
    pub style: TextStyle,
    /// Other inline declarations, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_style: Vec<(String, String)>,
    /// Non-style attributes, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<(String, String)>,
    /// Child nodes
    #[serde(default)]
    pub children: Vec<ContentNode>,
}

impl Element {
    /// Create an element with no style or children
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            style: TextStyle::default(),
            extra_style: Vec::new(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set the inline style from a CSS declaration list
    pub fn with_css(mut self, css: &str) -> Self {
        let (style, extra) = parse_declarations(css);
        self.style = style;
        self.extra_style = extra;
        self
    }

    /// Set the typed style
    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    /// Add an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Append a child node
    pub fn with_child(mut self, child: impl Into<ContentNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append a text child
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(ContentNode::text(text));
        self
    }

    /// Get an attribute value
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Full inline CSS of this element (typed properties first)
    pub fn css(&self) -> String {
        let mut parts: Vec<String> = self
            .extra_style
            .iter()
            .map(|(name, value)| format!("{}:{}", name, value))
            .collect();
        let typed = self.style.to_css();
        if !typed.is_empty() {
            parts.insert(0, typed);
        }
        parts.join("; ")
    }

    fn write_markup(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
        let css = self.css();
        if !css.is_empty() {
            out.push_str(" style=\"");
            out.push_str(&escape_attr(&css));
            out.push('"');
        }
        out.push('>');
        for child in &self.children {
            match child {
                ContentNode::Text { text } => out.push_str(&escape_text(text)),
                ContentNode::Element(element) => element.write_markup(out),
            }
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

/// Location of a node as child indexes from the page container
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeafPath(pub Vec<usize>);

impl LeafPath {
    /// Child indexes from the container down to the node
    pub fn indexes(&self) -> &[usize] {
        &self.0
    }
}

/// The content of one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    /// The editable page container
    pub root: Element,
}

impl PageContent {
    /// Wrap children in a fresh page container with the default page style
    pub fn new(children: Vec<ContentNode>) -> Self {
        let mut root = Element::new("div")
            .with_attribute("class", PAGE_CONTENT_CLASS)
            .with_attribute("contenteditable", "true");
        root.style = default_page_style();
        root.children = children;
        Self { root }
    }

    /// Content of the first page of a new document
    pub fn initial() -> Self {
        Self::new(vec![
            Element::new("h1")
                .with_css("margin-top:0")
                .with_text("Untitled document")
                .into(),
            Element::new("p").with_text("Start typing...").into(),
        ])
    }

    /// Content of a page added by the user
    pub fn blank() -> Self {
        Self::new(vec![
            Element::new("h1")
                .with_css("margin-top:0")
                .with_text("New page")
                .into(),
            Element::new("p").into(),
        ])
    }

    /// All text of the page, concatenated in document order
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for child in &self.root.children {
            child.collect_text(&mut out);
        }
        out
    }

    /// Paths and text of every text leaf, in document order
    pub fn text_leaves(&self) -> Vec<(LeafPath, &str)> {
        fn walk<'a>(node: &'a ContentNode, path: &mut Vec<usize>, out: &mut Vec<(LeafPath, &'a str)>) {
            match node {
                ContentNode::Text { text } => out.push((LeafPath(path.clone()), text.as_str())),
                ContentNode::Element(element) => {
                    for (i, child) in element.children.iter().enumerate() {
                        path.push(i);
                        walk(child, path, out);
                        path.pop();
                    }
                }
            }
        }

        let mut out = Vec::new();
        let mut path = Vec::new();
        for (i, child) in self.root.children.iter().enumerate() {
            path.push(i);
            walk(child, &mut path, &mut out);
            path.pop();
        }
        out
    }

    /// Elements from the container down to the parent of the node at `path`.
    /// Returns `None` if the path does not address a node.
    pub fn ancestors(&self, path: &LeafPath) -> Option<Vec<&Element>> {
        let mut chain = vec![&self.root];
        let mut current = &self.root;
        let (last, init) = path.indexes().split_last()?;
        for &index in init {
            match current.children.get(index)? {
                ContentNode::Element(element) => {
                    chain.push(element);
                    current = element;
                }
                ContentNode::Text { .. } => return None,
            }
        }
        current.children.get(*last)?;
        Some(chain)
    }

    /// Set one property on the page container
    pub fn set_container_property(&mut self, property: StyleProperty, value: impl Into<String>) {
        self.root.style.set(property, Some(value.into()));
    }

    /// Serialize to markup
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.root.write_markup(&mut out);
        out
    }
}

impl Default for PageContent {
    fn default() -> Self {
        Self::blank()
    }
}

fn default_page_style() -> TextStyle {
    TextStyle::new()
        .with(StyleProperty::FontSize, "18px")
        .with(StyleProperty::FontFamily, "Inter, sans-serif")
        .with(StyleProperty::LineHeight, "1.25")
}

/// Escape text content for markup
pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape an attribute value for markup
pub fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}
