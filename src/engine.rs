use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context as _, Result};
use minijinja::{context, Environment};
use time::{format_description::well_known::Rfc2822, OffsetDateTime};

use crate::{
    entity::{Entity, Folio},
    feed::{Feed, RssEntry},
};

// The `.xml` name turns on minijinja's auto-escaping for the template.
fn init_jinja() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.add_template("rss.xml", include_str!("../templates/rss.xml"))?;
    Ok(env)
}

#[derive(Debug)]
pub struct FolioEngine {
    pub source: PathBuf,
    pub dest: PathBuf,
    folio: Folio,
    /// Overrides `site.url`, e.g. for a preview deployment.
    base_url: Option<String>,
}

impl FolioEngine {
    pub fn new(source: impl AsRef<Path>, dest: impl AsRef<Path>, folio: Folio) -> Result<Self> {
        let dest = dest.as_ref().to_path_buf();
        if !dest.exists() {
            fs::create_dir_all(&dest)?;
        }
        Ok(FolioEngine {
            source: source.as_ref().to_path_buf(),
            dest,
            folio,
            base_url: None,
        })
    }

    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url;
        self
    }

    /// Parse the site content and aggregate it into the feed.
    ///
    /// Re-read the root `folio.toml` first if `reload` is true.
    pub fn feed(&mut self, reload: bool) -> Result<Feed> {
        if reload {
            self.folio = Folio::parse_from_toml(&self.source)?;
        }
        if let Some(base_url) = &self.base_url {
            self.folio.site.url = base_url.clone();
        }
        self.folio.parse(&self.source)?;

        let feed = self.folio.feed();
        for err in &feed.skipped {
            tracing::warn!("Skip feed record: {err}");
        }
        Ok(feed)
    }

    /// Build the feed and write it into the destination directory.
    pub fn build(&mut self, reload: bool) -> Result<PathBuf> {
        let instant = std::time::Instant::now();
        let feed = self.feed(reload)?;

        let dest = self.dest.join(&self.folio.feed.output);
        render_rss_feed(&self.folio, &feed, &dest)?;
        tracing::info!(
            items = feed.items.len(),
            skipped = feed.skipped.len(),
            "Wrote `{}` in {}ms",
            dest.display(),
            instant.elapsed().as_millis()
        );
        Ok(dest)
    }
}

// Render RSS 2.0 feed
fn render_rss_feed(folio: &Folio, feed: &Feed, dest: &Path) -> Result<()> {
    let env = init_jinja()?;
    let site = &folio.site;
    let entries = feed
        .items
        .iter()
        .map(RssEntry::new)
        .collect::<Result<Vec<_>, _>>()?;
    let feed_url = format!("{}/{}", site.url, folio.feed.output.trim_start_matches('/'));

    let xml = env.get_template("rss.xml")?.render(context! {
        title => folio.feed_title(),
        description => site.description.as_deref().unwrap_or(&site.title),
        site_url => &site.url,
        feed_url => feed_url,
        last_build_date => OffsetDateTime::now_utc().format(&Rfc2822)?,
        generator_version => env!("CARGO_PKG_VERSION"),
        entries => entries,
    })?;

    if let Some(parent_dir) = dest.parent() {
        if !parent_dir.exists() {
            fs::create_dir_all(parent_dir)?;
        }
    }
    fs::write(dest, xml).with_context(|| format!("Failed to write `{}`", dest.display()))?;
    Ok(())
}
