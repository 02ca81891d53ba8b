use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::{error::FolioError, markdown::DEFAULT_EXCERPT_LENGTH};

use super::Entity;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    /// The absolute url of this site, every feed link is built on it.
    pub url: String,
    pub title: String,
    pub description: Option<String>,
}

impl Entity for Site {
    fn parse(&mut self, _source: &Path) -> Result<()> {
        let url = self.url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(FolioError::InvalidSiteUrl(self.url.clone()).into());
        }
        // Links are joined with a leading slash.
        self.url = url.trim_end_matches('/').to_owned();
        Ok(())
    }
}

/// Directories of the two content collections, relative to the site root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentDirs {
    #[serde(default = "ContentDirs::default_blog")]
    pub blog: String,
    #[serde(default = "ContentDirs::default_showcase")]
    pub showcase: String,
}

impl Default for ContentDirs {
    fn default() -> Self {
        Self {
            blog: Self::default_blog(),
            showcase: Self::default_showcase(),
        }
    }
}

impl ContentDirs {
    fn default_blog() -> String {
        "content/blog".into()
    }

    fn default_showcase() -> String {
        "content/showcase".into()
    }
}

/// The `[feed]` table of `folio.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Output file, relative to the destination directory.
    #[serde(default = "FeedConfig::default_output")]
    pub output: String,
    /// Channel title. Fallback to the site title if missing.
    pub title: Option<String>,
    /// Keep only the latest `limit` items.
    pub limit: Option<usize>,
    #[serde(default = "FeedConfig::default_excerpt_length")]
    pub excerpt_length: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            output: Self::default_output(),
            title: None,
            limit: None,
            excerpt_length: Self::default_excerpt_length(),
        }
    }
}

impl FeedConfig {
    fn default_output() -> String {
        "rss.xml".into()
    }

    fn default_excerpt_length() -> usize {
        DEFAULT_EXCERPT_LENGTH
    }
}
