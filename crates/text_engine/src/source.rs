//! Remote font sources
//!
//! A source lists a directory of font files and fetches their bytes. The
//! default source reads a GitHub repository directory: the contents API for
//! the listing and raw file URLs for the bytes.

use crate::font::is_font_file;
use crate::{Result, TextError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const GITHUB_API: &str = "https://api.github.com";
const GITHUB_RAW: &str = "https://raw.githubusercontent.com";
const USER_AGENT: &str = concat!("folio-text-engine/", env!("CARGO_PKG_VERSION"));

/// A file listed by a font source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// File name, including extension
    pub file_name: String,
    /// Location to pass to [`FontSource::fetch`]
    pub location: String,
}

/// Where fonts are listed and fetched from
#[async_trait]
pub trait FontSource: Send + Sync {
    /// List the files of the font directory
    async fn list_directory(&self) -> Result<Vec<SourceEntry>>;

    /// Fetch the bytes at `location`
    async fn fetch(&self, location: &str) -> Result<Vec<u8>>;
}

/// Repository coordinates of a GitHub-hosted font directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubFontConfig {
    pub owner: String,
    pub repo: String,
    /// Directory inside the repository, empty for the root
    pub path: String,
    pub branch: String,
}

impl Default for GithubFontConfig {
    fn default() -> Self {
        Self {
            owner: "karenliteracy".to_string(),
            repo: "Knyawfonts".to_string(),
            path: String::new(),
            branch: "main".to_string(),
        }
    }
}

impl GithubFontConfig {
    fn path_segment(&self) -> String {
        let path = self.path.trim_matches('/');
        if path.is_empty() {
            String::new()
        } else {
            format!("/{}", path)
        }
    }

    /// Contents API URL of the directory
    pub fn api_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/contents{}",
            GITHUB_API,
            self.owner,
            self.repo,
            self.path_segment()
        )
    }

    /// Raw download URL of a file in the directory
    pub fn raw_url(&self, file_name: &str) -> String {
        format!(
            "{}/{}/{}/{}{}/{}",
            GITHUB_RAW,
            self.owner,
            self.repo,
            self.branch,
            self.path_segment(),
            urlencoding::encode(file_name)
        )
    }
}

/// One entry of a contents API listing
#[derive(Debug, Deserialize)]
struct ContentsEntry {
    name: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Font source backed by a GitHub repository directory
#[derive(Debug, Clone)]
pub struct GithubFontSource {
    config: GithubFontConfig,
    client: reqwest::Client,
}

impl GithubFontSource {
    pub fn new(config: GithubFontConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    /// Use a preconfigured HTTP client
    pub fn with_client(config: GithubFontConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &GithubFontConfig {
        &self.config
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TextError::FetchFailed {
                location: url.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl FontSource for GithubFontSource {
    async fn list_directory(&self) -> Result<Vec<SourceEntry>> {
        let url = self.config.api_url();
        let entries: Vec<ContentsEntry> = self
            .get(&url)
            .await
            .map_err(|e| TextError::DiscoveryFailed(e.to_string()))?
            .json()
            .await
            .map_err(|e| TextError::DiscoveryFailed(format!("unexpected listing from {}: {}", url, e)))?;

        Ok(entries
            .into_iter()
            .filter(|entry| entry.kind == "file")
            .map(|entry| SourceEntry {
                location: self.config.raw_url(&entry.name),
                file_name: entry.name,
            })
            .collect())
    }

    async fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        let bytes = self.get(location).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}

/// Keep only the entries that name web fonts
pub fn font_entries(entries: Vec<SourceEntry>) -> Vec<SourceEntry> {
    entries
        .into_iter()
        .filter(|entry| is_font_file(&entry.file_name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_for_repository_root() {
        let config = GithubFontConfig::default();
        assert_eq!(
            config.api_url(),
            "https://api.github.com/repos/karenliteracy/Knyawfonts/contents"
        );
        assert_eq!(
            config.raw_url("Knyaw Bold.woff2"),
            "https://raw.githubusercontent.com/karenliteracy/Knyawfonts/main/Knyaw%20Bold.woff2"
        );
    }

    #[test]
    fn test_urls_for_subdirectory() {
        let config = GithubFontConfig {
            path: "/fonts/web/".to_string(),
            ..Default::default()
        };
        assert!(config.api_url().ends_with("/contents/fonts/web"));
        assert!(config.raw_url("a.woff").ends_with("/main/fonts/web/a.woff"));
    }

    #[test]
    fn test_font_entries_filters_extensions() {
        let entries = ["a.woff", "b.WOFF2", "c.ttf", "README.md"]
            .into_iter()
            .map(|name| SourceEntry {
                file_name: name.to_string(),
                location: name.to_string(),
            })
            .collect();
        let names: Vec<_> = font_entries(entries).into_iter().map(|e| e.file_name).collect();
        assert_eq!(names, vec!["a.woff", "b.WOFF2"]);
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: GithubFontConfig = serde_json::from_str(r#"{"owner":"someone"}"#).unwrap();
        assert_eq!(config.owner, "someone");
        assert_eq!(config.repo, "Knyawfonts");
        assert_eq!(config.branch, "main");
    }
}
