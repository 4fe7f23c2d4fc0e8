//! Error types for text engine

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextError {
    #[error("Failed to fetch {location}: {reason}")]
    FetchFailed { location: String, reason: String },

    #[error("Invalid font data: {0}")]
    InvalidFontData(String),

    #[error("Font discovery failed: {0}")]
    DiscoveryFailed(String),
}

impl From<reqwest::Error> for TextError {
    fn from(e: reqwest::Error) -> Self {
        TextError::FetchFailed {
            location: e.url().map(|u| u.to_string()).unwrap_or_default(),
            reason: e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TextError>;
