//! Style flattening
//!
//! Rewrites a page's nested, inherited styling as a flat sequence of spans
//! that each carry their complete effective style. The pass is run on
//! request only; normal editing keeps nested styling.

use crate::{ContentNode, LeafPath, PageContent, StyleProperty, StyleRun, TextStyle};

/// Resolves the effective (inherited + local) style at a text leaf
pub trait StyleResolver {
    /// Computed style of the text leaf at `leaf`. Properties with no value are
    /// left unset.
    fn resolve_effective_style(&self, content: &PageContent, leaf: &LeafPath) -> TextStyle;
}

/// Resolves styles by walking the content tree: the nearest element that
/// declares a property wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct InheritedStyleResolver;

impl StyleResolver for InheritedStyleResolver {
    fn resolve_effective_style(&self, content: &PageContent, leaf: &LeafPath) -> TextStyle {
        content
            .ancestors(leaf)
            .map(|chain| {
                chain
                    .iter()
                    .fold(TextStyle::new(), |acc, element| acc.merge(&element.style))
            })
            .unwrap_or_default()
    }
}

/// Result of flattening one page
#[derive(Debug, Clone, PartialEq)]
pub enum Flattened {
    /// One run per non-blank text leaf
    Runs(Vec<StyleRun>),
    /// The page had no non-blank text; its plain text, unstyled
    PlainText(String),
}

impl Flattened {
    /// The runs produced, empty for the plain-text fallback
    pub fn runs(&self) -> &[StyleRun] {
        match self {
            Flattened::Runs(runs) => runs,
            Flattened::PlainText(_) => &[],
        }
    }
}

/// Compute the flat runs of a page
pub fn flatten(content: &PageContent, resolver: &dyn StyleResolver) -> Flattened {
    let runs: Vec<StyleRun> = content
        .text_leaves()
        .into_iter()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(path, text)| {
            let resolved = resolver.resolve_effective_style(content, &path);
            StyleRun::new(text, retain_properties(&resolved))
        })
        .collect();

    if runs.is_empty() {
        Flattened::PlainText(content.plain_text())
    } else {
        Flattened::Runs(runs)
    }
}

/// Content after flattening: the page container keeps its own attributes
/// and style, its children become one span per run (or the plain text).
pub fn flatten_content(content: &PageContent, resolver: &dyn StyleResolver) -> (PageContent, Flattened) {
    let flattened = flatten(content, resolver);
    let children = match &flattened {
        Flattened::Runs(runs) => runs.iter().map(|run| run.to_element().into()).collect(),
        Flattened::PlainText(text) if text.is_empty() => Vec::new(),
        Flattened::PlainText(text) => vec![ContentNode::text(text.clone())],
    };

    let mut root = content.root.clone();
    root.children = children;
    (PageContent { root }, flattened)
}

// Drops anything outside the fixed property list and blank values.
fn retain_properties(resolved: &TextStyle) -> TextStyle {
    let mut style = TextStyle::new();
    for property in StyleProperty::ALL {
        if let Some(value) = resolved.get(property) {
            style.set(property, Some(value.to_string()));
        }
    }
    style
}
