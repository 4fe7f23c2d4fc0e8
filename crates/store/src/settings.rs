//! Editor settings management
//!
//! This module provides settings persistence, loading, and updating for the
//! editor: history depth, export parameters, page setup, and the font
//! source.

use crate::Result;
use doc_model::{Orientation, PageSize};
use edit_engine::{HistoryManager, DEFAULT_HISTORY_CAPACITY};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use text_engine::{GithubFontConfig, GithubFontSource};

use crate::docx::RichDocumentOptions;
use crate::export::PaperOptions;

/// Main settings container
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorSettings {
    pub history: HistorySettings,
    pub export: ExportSettings,
    pub page: PageSettings,
    pub fonts: FontSettings,
}

/// Undo/redo settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HistorySettings {
    /// Maximum number of undo entries
    pub capacity: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl HistorySettings {
    /// A history manager with this capacity
    pub fn manager(&self) -> HistoryManager {
        HistoryManager::with_capacity(self.capacity)
    }
}

/// Rasterization and output settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportSettings {
    /// Device pixels per CSS pixel for exports
    pub scale: f32,
    /// Device pixels per CSS pixel for page-strip thumbnails
    pub thumbnail_scale: f32,
    /// Padding around page content, in CSS pixels
    pub padding: u32,
    pub background: String,
    /// JPEG quality, 1-100
    pub jpeg_quality: u8,
    /// Prefix of every exported file name
    pub file_stem: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            scale: 2.0,
            thumbnail_scale: 0.18,
            padding: 28,
            background: "#fff".to_string(),
            jpeg_quality: 95,
            file_stem: "document".to_string(),
        }
    }
}

/// Default page setup for paginated and rich-document exports
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PageSettings {
    pub paper: PageSize,
    pub orientation: Orientation,
}

impl PageSettings {
    pub fn paper_options(&self) -> PaperOptions {
        PaperOptions {
            size: self.paper,
            orientation: self.orientation,
        }
    }

    pub fn rich_document_options(&self) -> RichDocumentOptions {
        RichDocumentOptions {
            page_size: self.paper,
            orientation: self.orientation,
        }
    }
}

/// Where fonts are loaded from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FontSettings {
    #[serde(flatten)]
    pub source: GithubFontConfig,
    /// Load every font from the source at startup
    pub auto_load: bool,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            source: GithubFontConfig::default(),
            auto_load: true,
        }
    }
}

impl FontSettings {
    pub fn font_source(&self) -> GithubFontSource {
        GithubFontSource::new(self.source.clone())
    }
}

/// Settings manager for loading, saving, and updating settings
pub struct SettingsManager {
    /// Path to the settings file
    settings_path: PathBuf,
    /// Current settings (cached)
    current: EditorSettings,
}

impl SettingsManager {
    /// Create a new settings manager with the given data directory
    pub fn new(data_dir: PathBuf) -> Self {
        let settings_path = data_dir.join("settings.json");
        Self {
            settings_path,
            current: EditorSettings::default(),
        }
    }

    /// Get the path to the settings file
    pub fn settings_path(&self) -> &PathBuf {
        &self.settings_path
    }

    /// Load settings from disk, or return defaults if the file doesn't exist
    pub async fn load(&mut self) -> Result<&EditorSettings> {
        self.current = if tokio::fs::try_exists(&self.settings_path).await? {
            let content = tokio::fs::read_to_string(&self.settings_path).await?;
            match serde_json::from_str::<EditorSettings>(&content) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!("Failed to parse settings file, using defaults: {}", e);
                    EditorSettings::default()
                }
            }
        } else {
            EditorSettings::default()
        };
        Ok(&self.current)
    }

    /// Save current settings to disk
    pub async fn save(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(&self.current)?;
        tokio::fs::write(&self.settings_path, content).await?;
        Ok(())
    }

    /// Get current settings
    pub fn get(&self) -> &EditorSettings {
        &self.current
    }

    /// Update settings and save to disk
    pub async fn update(&mut self, settings: EditorSettings) -> Result<()> {
        self.current = settings;
        self.save().await
    }

    /// Reset settings to defaults and save
    pub async fn reset(&mut self) -> Result<&EditorSettings> {
        self.current = EditorSettings::default();
        self.save().await?;
        Ok(&self.current)
    }
}
