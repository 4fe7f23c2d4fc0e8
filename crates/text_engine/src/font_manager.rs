//! Font Registry
//!
//! Loads web fonts from a [`FontSource`] and keeps them by family name, in
//! load order. The registry is the only writer of its name map; assets are
//! shared out immutably.

use crate::font::{decode_font, family_stack, font_stem, FontAsset};
use crate::source::{font_entries, FontSource};
use crate::Result;
use std::sync::Arc;

/// Registered fonts, in load order
#[derive(Debug, Default)]
pub struct FontRegistry {
    fonts: Vec<FontAsset>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch and decode the font at `location`, registering it as `name`.
    ///
    /// Re-registering a name replaces the asset but keeps its load position.
    /// On failure nothing is added.
    pub async fn register(
        &mut self,
        source: &dyn FontSource,
        name: &str,
        location: &str,
    ) -> Result<&FontAsset> {
        let data = source.fetch(location).await?;
        let format = decode_font(&data)?;

        let asset = FontAsset {
            name: name.to_string(),
            source_location: location.to_string(),
            format,
            data: Arc::from(data),
        };
        tracing::debug!(name, %format, bytes = asset.data.len(), "font registered");
        Ok(self.insert(asset))
    }

    fn insert(&mut self, asset: FontAsset) -> &FontAsset {
        let index = match self.fonts.iter().position(|f| f.name == asset.name) {
            Some(index) => {
                self.fonts[index] = asset;
                index
            }
            None => {
                self.fonts.push(asset);
                self.fonts.len() - 1
            }
        };
        &self.fonts[index]
    }

    /// Register every web font the source lists. Fonts that fail to load are
    /// logged and skipped. Returns the names registered, in order.
    pub async fn load_from_source(&mut self, source: &dyn FontSource) -> Result<Vec<String>> {
        let entries = font_entries(source.list_directory().await?);
        let mut loaded = Vec::with_capacity(entries.len());

        for entry in entries {
            let name = font_stem(&entry.file_name).to_string();
            match self.register(source, &name, &entry.location).await {
                Ok(_) => loaded.push(name),
                Err(e) => tracing::warn!("Failed to load font {}: {}", entry.file_name, e),
            }
        }

        tracing::info!(count = loaded.len(), "fonts loaded from source");
        Ok(loaded)
    }

    /// Names of registered fonts, in load order
    pub fn list_loaded(&self) -> Vec<&str> {
        self.fonts.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&FontAsset> {
        self.fonts.iter().find(|f| f.name == name)
    }

    /// The first font loaded, applied by default after a bulk load
    pub fn first(&self) -> Option<&FontAsset> {
        self.fonts.first()
    }

    /// CSS family stack for a registered font
    pub fn family_stack(&self, name: &str) -> Option<String> {
        self.get(name).map(|f| family_stack(&f.name))
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::tests::woff_bytes;
    use crate::source::SourceEntry;
    use crate::{FontFormat, TextError};
    use async_trait::async_trait;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeSource {
        files: Vec<(String, Option<Vec<u8>>)>,
        listing_fails: bool,
    }

    impl FakeSource {
        fn with(mut self, name: &str, data: Option<Vec<u8>>) -> Self {
            self.files.push((name.to_string(), data));
            self
        }

        fn contents(&self) -> HashMap<String, Option<Vec<u8>>> {
            self.files
                .iter()
                .map(|(name, data)| (format!("mem://{}", name), data.clone()))
                .collect()
        }
    }

    #[async_trait]
    impl FontSource for FakeSource {
        async fn list_directory(&self) -> Result<Vec<SourceEntry>> {
            if self.listing_fails {
                return Err(TextError::DiscoveryFailed("HTTP 403".to_string()));
            }
            Ok(self
                .files
                .iter()
                .map(|(name, _)| SourceEntry {
                    file_name: name.clone(),
                    location: format!("mem://{}", name),
                })
                .collect())
        }

        async fn fetch(&self, location: &str) -> Result<Vec<u8>> {
            match self.contents().remove(location).flatten() {
                Some(data) => Ok(data),
                None => Err(TextError::FetchFailed {
                    location: location.to_string(),
                    reason: "HTTP 404".to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_register_records_asset() {
        let source = FakeSource::default().with("Knyaw.woff2", Some(woff_bytes(b"wOF2", 80)));
        let mut registry = FontRegistry::new();

        let asset = registry.register(&source, "Knyaw", "mem://Knyaw.woff2").await.unwrap();
        assert_eq!(asset.format, FontFormat::Woff2);
        assert_eq!(asset.data.len(), 80);
        assert_eq!(registry.list_loaded(), vec!["Knyaw"]);
        assert_eq!(registry.family_stack("Knyaw").as_deref(), Some("'Knyaw', Inter, sans-serif"));
    }

    #[tokio::test]
    async fn test_register_failure_adds_nothing() {
        let source = FakeSource::default()
            .with("Broken.woff", Some(b"not a font at all".to_vec()))
            .with("Missing.woff", None);
        let mut registry = FontRegistry::new();

        let err = registry.register(&source, "Broken", "mem://Broken.woff").await.unwrap_err();
        assert!(matches!(err, TextError::InvalidFontData(_)));
        let err = registry.register(&source, "Missing", "mem://Missing.woff").await.unwrap_err();
        assert!(matches!(err, TextError::FetchFailed { .. }));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_reregister_keeps_position() {
        let source = FakeSource::default()
            .with("A.woff", Some(woff_bytes(b"wOFF", 60)))
            .with("B.woff", Some(woff_bytes(b"wOFF", 60)))
            .with("A2.woff2", Some(woff_bytes(b"wOF2", 90)));
        let mut registry = FontRegistry::new();
        registry.register(&source, "A", "mem://A.woff").await.unwrap();
        registry.register(&source, "B", "mem://B.woff").await.unwrap();
        registry.register(&source, "A", "mem://A2.woff2").await.unwrap();

        assert_eq!(registry.list_loaded(), vec!["A", "B"]);
        assert_eq!(registry.get("A").unwrap().format, FontFormat::Woff2);
        assert_eq!(registry.first().unwrap().source_location, "mem://A2.woff2");
    }

    #[tokio::test]
    async fn test_load_from_source_skips_failures() {
        let source = FakeSource::default()
            .with("Knyaw-Regular.woff", Some(woff_bytes(b"wOFF", 64)))
            .with("notes.txt", Some(b"hello".to_vec()))
            .with("Broken.woff2", Some(vec![0; 10]))
            .with("Knyaw-Bold.WOFF2", Some(woff_bytes(b"wOF2", 64)));
        let mut registry = FontRegistry::new();

        let loaded = registry.load_from_source(&source).await.unwrap();
        assert_eq!(loaded, vec!["Knyaw-Regular", "Knyaw-Bold"]);
        assert_eq!(registry.list_loaded(), loaded);
        assert_eq!(registry.first().unwrap().friendly_name(), "Knyaw Regular");
    }

    #[tokio::test]
    async fn test_load_from_source_reports_listing_failure() {
        let source = FakeSource {
            listing_fails: true,
            ..Default::default()
        };
        let mut registry = FontRegistry::new();
        assert!(matches!(
            registry.load_from_source(&source).await,
            Err(TextError::DiscoveryFailed(_))
        ));
    }
}
