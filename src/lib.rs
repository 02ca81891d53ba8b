pub mod build;
mod engine;
pub mod entity;
mod error;
pub mod feed;
mod helpers;
pub mod markdown;

pub use engine::FolioEngine;
pub use entity::{ArticleRecord, Folio, ShowcaseRecord, Site};
pub use error::{FolioError, RecordError};
pub use feed::{build_feed, Feed, FeedItem, FeedSource};

/// The root config file of a folio site.
pub static FOLIO_FILE: &str = "folio.toml";
