use anyhow::Result;
use std::path::Path;

mod article;
mod folio;
mod showcase;
mod site;

pub use self::folio::Folio;
pub use article::{slug_from_path, ArticleFields, ArticleFrontmatter, ArticleRecord};
pub use showcase::ShowcaseRecord;
pub use site::{ContentDirs, FeedConfig, Site};

/// A trait represents an entity of the folio config file.
///
/// The **parse** stage validates the entity and loads whatever it
/// references from the `source` directory.
pub trait Entity {
    fn parse(&mut self, source: &Path) -> Result<()>;
}
