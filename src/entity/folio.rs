use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context as _, Result};
use rayon::prelude::*;
use serde::Deserialize;
use walkdir::WalkDir;

use crate::{
    error::{FolioError, RecordError},
    feed::{build_feed, Feed},
    FOLIO_FILE,
};

use super::{
    article::ARTICLE_EXTENSIONS, ArticleRecord, ContentDirs, Entity, FeedConfig, ShowcaseRecord,
    Site,
};

/// The root folio entity config.
///
/// It parsed from the root directory's `folio.toml`.
#[derive(Deserialize)]
pub struct Folio {
    pub site: Site,
    #[serde(default)]
    pub content: ContentDirs,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(skip)]
    pub articles: Vec<ArticleRecord>,
    #[serde(skip)]
    pub showcase: Vec<ShowcaseRecord>,
    /// Content files or entries which failed to load.
    #[serde(skip)]
    pub unreadable: Vec<RecordError>,
}

impl std::fmt::Debug for Folio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Folio")
            .field("site", &self.site)
            .field("content", &self.content)
            .field("feed", &self.feed)
            .field("articles", &self.articles.len())
            .field("showcase", &self.showcase.len())
            .finish()
    }
}

impl Folio {
    /// Parse the `folio.toml` in `dir`.
    pub fn parse_from_toml<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = dir.as_ref().join(FOLIO_FILE);
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read `{}`", path.display()))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Folio>(content)
            .map_err(|err| FolioError::InvalidRootTomlFile(err).into())
    }

    /// Aggregate the loaded content into the feed.
    ///
    /// Content files which failed to load are reported as skipped
    /// records ahead of the projection failures.
    pub fn feed(&self) -> Feed {
        let mut feed = build_feed(&self.articles, &self.showcase, &self.site.url);
        let mut skipped = self.unreadable.clone();
        skipped.append(&mut feed.skipped);
        feed.skipped = skipped;
        if let Some(limit) = self.feed.limit {
            feed.truncate(limit);
        }
        feed
    }

    /// The channel title of the feed.
    pub fn feed_title(&self) -> &str {
        self.feed.title.as_deref().unwrap_or(&self.site.title)
    }

    fn load_articles(&mut self, source: &Path) {
        let blog_dir = source.join(&self.content.blog);
        let excerpt_length = self.feed.excerpt_length;
        let results = content_files(&blog_dir, &ARTICLE_EXTENSIONS)
            .par_iter()
            .map(|path| ArticleRecord::load(path, &blog_dir, excerpt_length))
            .collect::<Vec<_>>();

        self.articles.clear();
        for result in results {
            match result {
                Ok(article) => self.articles.push(article),
                Err(err) => self.unreadable.push(err),
            }
        }
    }

    fn load_showcase(&mut self, source: &Path) {
        let showcase_dir = source.join(&self.content.showcase);
        let results = content_files(&showcase_dir, &["json"])
            .par_iter()
            .flat_map_iter(|path| ShowcaseRecord::load(path))
            .collect::<Vec<_>>();

        self.showcase.clear();
        for result in results {
            match result {
                Ok(record) => self.showcase.push(record),
                Err(err) => self.unreadable.push(err),
            }
        }
    }
}

// Files below `dir` with one of `extensions`, sorted by path.
fn content_files(dir: &Path, extensions: &[&str]) -> Vec<PathBuf> {
    if !dir.exists() {
        tracing::warn!("Content directory `{}` doesn't exist", dir.display());
        return vec![];
    }

    let mut files = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!("Failed to walk `{}`: {err}", dir.display());
                None
            }
        })
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| extensions.contains(&ext))
                    .unwrap_or_default()
        })
        .collect::<Vec<_>>();
    files.sort();
    files
}

impl Entity for Folio {
    fn parse(&mut self, source: &Path) -> Result<()> {
        self.site.parse(source)?;

        self.unreadable.clear();
        self.load_articles(source);
        self.load_showcase(source);
        tracing::debug!(
            articles = self.articles.len(),
            showcase = self.showcase.len(),
            unreadable = self.unreadable.len(),
            "Content loaded"
        );
        Ok(())
    }
}
