//! Text style properties carried by content elements and flattened runs
//!
//! Only the visual properties the flattener preserves are modelled as typed
//! fields. Every other inline declaration (margins, borders, ...) is kept as
//! an opaque `(property, value)` pair on the element that declared it.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Style Properties
// =============================================================================

/// The fixed list of properties resolved for every text run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleProperty {
    FontFamily,
    FontSize,
    FontWeight,
    FontStyle,
    Color,
    LetterSpacing,
    LineHeight,
    TextDecoration,
}

impl StyleProperty {
    /// All properties, in the order they are emitted
    pub const ALL: [StyleProperty; 8] = [
        StyleProperty::FontFamily,
        StyleProperty::FontSize,
        StyleProperty::FontWeight,
        StyleProperty::FontStyle,
        StyleProperty::Color,
        StyleProperty::LetterSpacing,
        StyleProperty::LineHeight,
        StyleProperty::TextDecoration,
    ];

    /// CSS property name
    pub fn css_name(&self) -> &'static str {
        match self {
            StyleProperty::FontFamily => "font-family",
            StyleProperty::FontSize => "font-size",
            StyleProperty::FontWeight => "font-weight",
            StyleProperty::FontStyle => "font-style",
            StyleProperty::Color => "color",
            StyleProperty::LetterSpacing => "letter-spacing",
            StyleProperty::LineHeight => "line-height",
            StyleProperty::TextDecoration => "text-decoration",
        }
    }

    /// Look up a property by CSS name (case-insensitive)
    pub fn from_css_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.css_name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for StyleProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_name())
    }
}

// =============================================================================
// Text Style
// =============================================================================

/// Visual text formatting; every property is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<String>,
}

impl TextStyle {
    /// Create an empty style
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, property: StyleProperty, value: impl Into<String>) -> Self {
        self.set(property, Some(value.into()));
        self
    }

    /// Get a property value
    pub fn get(&self, property: StyleProperty) -> Option<&str> {
        let slot = match property {
            StyleProperty::FontFamily => &self.font_family,
            StyleProperty::FontSize => &self.font_size,
            StyleProperty::FontWeight => &self.font_weight,
            StyleProperty::FontStyle => &self.font_style,
            StyleProperty::Color => &self.color,
            StyleProperty::LetterSpacing => &self.letter_spacing,
            StyleProperty::LineHeight => &self.line_height,
            StyleProperty::TextDecoration => &self.text_decoration,
        };
        slot.as_deref()
    }

    /// Set or clear a property. Blank values clear the property.
    pub fn set(&mut self, property: StyleProperty, value: Option<String>) {
        let value = value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        let slot = match property {
            StyleProperty::FontFamily => &mut self.font_family,
            StyleProperty::FontSize => &mut self.font_size,
            StyleProperty::FontWeight => &mut self.font_weight,
            StyleProperty::FontStyle => &mut self.font_style,
            StyleProperty::Color => &mut self.color,
            StyleProperty::LetterSpacing => &mut self.letter_spacing,
            StyleProperty::LineHeight => &mut self.line_height,
            StyleProperty::TextDecoration => &mut self.text_decoration,
        };
        *slot = value;
    }

    /// Merge another style on top of this one.
    /// Properties from `other` override properties from `self` when present.
    pub fn merge(&self, other: &TextStyle) -> TextStyle {
        let mut merged = self.clone();
        for property in StyleProperty::ALL {
            if let Some(value) = other.get(property) {
                merged.set(property, Some(value.to_string()));
            }
        }
        merged
    }

    /// Check if all properties are None
    pub fn is_empty(&self) -> bool {
        StyleProperty::ALL.iter().all(|p| self.get(*p).is_none())
    }

    /// Present properties in emission order
    pub fn declarations(&self) -> impl Iterator<Item = (StyleProperty, &str)> + '_ {
        StyleProperty::ALL
            .into_iter()
            .filter_map(move |p| self.get(p).map(|v| (p, v)))
    }

    /// Render as an inline CSS declaration list (`font-size:18px; color:red`)
    pub fn to_css(&self) -> String {
        self.declarations()
            .map(|(p, v)| format!("{}:{}", p.css_name(), v))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Split an inline declaration list into the typed style and the remaining
/// untyped declarations, preserving the order of the latter.
pub fn parse_declarations(css: &str) -> (TextStyle, Vec<(String, String)>) {
    let mut style = TextStyle::new();
    let mut extra = Vec::new();

    for declaration in css.split(';') {
        let Some((name, value)) = declaration.split_once(':') else {
            continue;
        };
        let (name, value) = (name.trim(), value.trim());
        if name.is_empty() || value.is_empty() {
            continue;
        }
        match StyleProperty::from_css_name(name) {
            Some(property) => style.set(property, Some(value.to_string())),
            None => extra.push((name.to_ascii_lowercase(), value.to_string())),
        }
    }

    (style, extra)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overrides_present_properties() {
        let base = TextStyle::new()
            .with(StyleProperty::FontSize, "18px")
            .with(StyleProperty::Color, "black");
        let local = TextStyle::new().with(StyleProperty::Color, "red");

        let merged = base.merge(&local);
        assert_eq!(merged.get(StyleProperty::FontSize), Some("18px"));
        assert_eq!(merged.get(StyleProperty::Color), Some("red"));
    }

    #[test]
    fn test_blank_values_clear() {
        let mut style = TextStyle::new().with(StyleProperty::Color, "red");
        style.set(StyleProperty::Color, Some("   ".to_string()));
        assert!(style.is_empty());
    }

    #[test]
    fn test_parse_declarations_splits_known_and_extra() {
        let (style, extra) =
            parse_declarations("font-size:18px; Font-Family: Inter, sans-serif; margin-top:0;");

        assert_eq!(style.get(StyleProperty::FontSize), Some("18px"));
        assert_eq!(style.get(StyleProperty::FontFamily), Some("Inter, sans-serif"));
        assert_eq!(extra, vec![("margin-top".to_string(), "0".to_string())]);
    }

    #[test]
    fn test_to_css_uses_fixed_order() {
        let style = TextStyle::new()
            .with(StyleProperty::LineHeight, "1.25")
            .with(StyleProperty::FontFamily, "Inter");
        assert_eq!(style.to_css(), "font-family:Inter; line-height:1.25");
    }
}
