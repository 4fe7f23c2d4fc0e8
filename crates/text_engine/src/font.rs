//! Font assets and web font decoding

use crate::{Result, TextError};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Fallback families appended to every registered font
pub const FALLBACK_FAMILIES: &str = "Inter, sans-serif";

/// Web font container format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFormat {
    Woff,
    Woff2,
}

impl FontFormat {
    /// File extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            FontFormat::Woff => "woff",
            FontFormat::Woff2 => "woff2",
        }
    }

    /// Detect the format from a file name's extension (case-insensitive)
    pub fn from_file_name(name: &str) -> Option<Self> {
        let captures = font_file_pattern()?.captures(name)?;
        let ext = captures.get(1)?.as_str();
        if ext.eq_ignore_ascii_case("woff2") {
            Some(FontFormat::Woff2)
        } else {
            Some(FontFormat::Woff)
        }
    }

    fn header_len(&self) -> usize {
        match self {
            FontFormat::Woff => 44,
            FontFormat::Woff2 => 48,
        }
    }
}

impl fmt::Display for FontFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FontFormat::Woff => "WOFF",
            FontFormat::Woff2 => "WOFF2",
        })
    }
}

fn font_file_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)\.(woff2?)$").ok())
        .as_ref()
}

/// Whether a file name names a loadable web font
pub fn is_font_file(name: &str) -> bool {
    FontFormat::from_file_name(name).is_some()
}

/// File name without its web font extension
pub fn font_stem(name: &str) -> &str {
    match font_file_pattern().and_then(|re| re.find(name)) {
        Some(m) => &name[..m.start()],
        None => name,
    }
}

/// Validate a web font header and return its format.
///
/// Checks the signature, that the header fits, that the declared total
/// length matches the data, and that at least one table is present.
pub fn decode_font(data: &[u8]) -> Result<FontFormat> {
    let format = match data.get(0..4) {
        Some(b"wOFF") => FontFormat::Woff,
        Some(b"wOF2") => FontFormat::Woff2,
        Some(_) => return Err(TextError::InvalidFontData("unrecognized signature".to_string())),
        None => return Err(TextError::InvalidFontData("data too short".to_string())),
    };

    if data.len() < format.header_len() {
        return Err(TextError::InvalidFontData(format!(
            "{} header truncated ({} bytes)",
            format,
            data.len()
        )));
    }

    let declared = u32::from_be_bytes([data[8], data[9], data[10], data[11]]) as usize;
    if declared != data.len() {
        return Err(TextError::InvalidFontData(format!(
            "{} declares {} bytes, got {}",
            format,
            declared,
            data.len()
        )));
    }

    let num_tables = u16::from_be_bytes([data[12], data[13]]);
    if num_tables == 0 {
        return Err(TextError::InvalidFontData(format!("{} has no tables", format)));
    }

    Ok(format)
}

/// A loaded font, immutable once registered
#[derive(Debug, Clone, PartialEq)]
pub struct FontAsset {
    /// Family name the font is registered under
    pub name: String,
    /// Where the bytes came from
    pub source_location: String,
    pub format: FontFormat,
    /// Raw font bytes
    pub data: Arc<[u8]>,
}

impl FontAsset {
    /// CSS family stack for this font
    pub fn family_stack(&self) -> String {
        family_stack(&self.name)
    }

    /// Human-readable name for pickers
    pub fn friendly_name(&self) -> String {
        friendly_name(&self.name)
    }
}

/// CSS family stack for a registered font name: `'Name', Inter, sans-serif`
pub fn family_stack(name: &str) -> String {
    format!("'{}', {}", name.replace('\'', "\\'"), FALLBACK_FAMILIES)
}

/// Turn a file stem into a display name: separators become spaces and every
/// word is capitalized (`my_font-bold` becomes `My Font Bold`).
pub fn friendly_name(stem: &str) -> String {
    stem.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
