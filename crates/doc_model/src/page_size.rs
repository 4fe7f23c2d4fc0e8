//! Named paper sizes and orientation
//!
//! Dimensions are CSS pixels at 96 dpi. The same table drives page-setup
//! widths and paginated export page sizes, and is looked up by one
//! case-insensitive name match.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named paper size or an explicit custom size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    A4,
    Letter,
    Legal,
    A3,
    A5,
    Custom { width: u32, height: u32 },
}

impl PageSize {
    /// Named presets, in picker order
    pub const PRESETS: [PageSize; 5] = [
        PageSize::A4,
        PageSize::Letter,
        PageSize::Legal,
        PageSize::A3,
        PageSize::A5,
    ];

    /// Resolve a preset by name, ignoring case and surrounding whitespace.
    /// Unknown names fall back to A4.
    pub fn from_name(name: &str) -> Self {
        Self::lookup(name).unwrap_or(PageSize::A4)
    }

    /// Resolve a preset by name, ignoring case and surrounding whitespace
    pub fn lookup(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::PRESETS
            .into_iter()
            .find(|size| size.name().eq_ignore_ascii_case(name))
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            PageSize::A4 => "A4",
            PageSize::Letter => "Letter",
            PageSize::Legal => "Legal",
            PageSize::A3 => "A3",
            PageSize::A5 => "A5",
            PageSize::Custom { .. } => "Custom",
        }
    }

    /// The size actually used. A custom size with a zero side is not a
    /// usable paper and resolves to A4.
    pub fn resolved(&self) -> Self {
        match *self {
            PageSize::Custom { width, height } if width == 0 || height == 0 => PageSize::A4,
            other => other,
        }
    }

    /// Portrait dimensions (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        match self.resolved() {
            PageSize::A4 => (794, 1123),
            PageSize::Letter => (816, 1056),
            PageSize::Legal => (816, 1344),
            PageSize::A3 => (1123, 1587),
            PageSize::A5 => (420, 595),
            PageSize::Custom { width, height } => (width, height),
        }
    }

    /// Dimensions in the given orientation
    pub fn oriented(&self, orientation: Orientation) -> (u32, u32) {
        let (w, h) = self.dimensions();
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }

    /// Page width used when the size is applied from page setup
    pub fn width(&self) -> u32 {
        self.dimensions().0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::A4
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSize::Custom { width, height } => write!(f, "Custom ({}x{})", width, height),
            other => f.write_str(other.name()),
        }
    }
}

/// Page orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    /// Parse an orientation name, ignoring case. Anything else is portrait.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("landscape") {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(PageSize::from_name("a4"), PageSize::A4);
        assert_eq!(PageSize::from_name("LETTER"), PageSize::Letter);
        assert_eq!(PageSize::from_name(" legal "), PageSize::Legal);
        assert_eq!(PageSize::from_name("a5"), PageSize::A5);
    }

    #[test]
    fn test_unknown_name_falls_back_to_a4() {
        assert_eq!(PageSize::from_name("tabloid"), PageSize::A4);
        assert_eq!(PageSize::lookup("tabloid"), None);
    }

    #[test]
    fn test_landscape_swaps() {
        assert_eq!(PageSize::A4.oriented(Orientation::Landscape), (1123, 794));
        assert_eq!(PageSize::A3.oriented(Orientation::Portrait), (1123, 1587));
    }

    #[test]
    fn test_custom_dimensions() {
        let size = PageSize::Custom { width: 600, height: 900 };
        assert_eq!(size.dimensions(), (600, 900));
        assert_eq!(size.width(), 600);
    }

    #[test]
    fn test_zero_sided_custom_resolves_to_a4() {
        for size in [
            PageSize::Custom { width: 0, height: 0 },
            PageSize::Custom { width: 600, height: 0 },
            PageSize::Custom { width: 0, height: 900 },
        ] {
            assert_eq!(size.resolved(), PageSize::A4);
            assert_eq!(size.dimensions(), (794, 1123));
            assert_eq!(size.oriented(Orientation::Landscape), (1123, 794));
        }
        assert_eq!(PageSize::Letter.resolved(), PageSize::Letter);
    }
}
