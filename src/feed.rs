use rayon::prelude::*;
use serde::Serialize;
use time::{format_description::well_known::Rfc2822, OffsetDateTime};

use crate::{error::RecordError, helpers};

/// One entry of the syndication feed.
///
/// The field names are the keys the feed writer expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedItem {
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub description: String,
    pub url: String,
    pub guid: String,
}

/// A content record which can be projected into a [`FeedItem`].
pub trait FeedSource {
    /// Build the feed item of this record on top of `base_url`,
    /// which never ends with a slash.
    fn to_feed_item(&self, base_url: &str) -> Result<FeedItem, RecordError>;
}

/// The aggregated feed: ordered items plus the records left out.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Feed {
    pub items: Vec<FeedItem>,
    pub skipped: Vec<RecordError>,
}

impl Feed {
    /// Keep only the latest `limit` items.
    pub fn truncate(&mut self, limit: usize) {
        self.items.truncate(limit);
    }
}

/// Merge articles and showcase entries into one feed, newest first.
///
/// Every record is projected on its own, a broken record only removes
/// itself. The sort is stable: items with the same date keep articles
/// before showcase entries, each in source order.
pub fn build_feed<A, S>(articles: &[A], showcase_entries: &[S], base_url: &str) -> Feed
where
    A: FeedSource + Sync,
    S: FeedSource + Sync,
{
    let base_url = base_url.trim_end_matches('/');
    let mut feed = Feed::default();
    for result in project(articles, base_url)
        .into_iter()
        .chain(project(showcase_entries, base_url))
    {
        match result {
            Ok(item) => feed.items.push(item),
            Err(err) => feed.skipped.push(err),
        }
    }

    // Sort by date in descending order.
    feed.items.sort_by(|a, b| b.date.cmp(&a.date));
    feed
}

fn project<T: FeedSource + Sync>(
    records: &[T],
    base_url: &str,
) -> Vec<Result<FeedItem, RecordError>> {
    records
        .par_iter()
        .map(|record| record.to_feed_item(base_url))
        .collect()
}

/// Get a required text field, blank values count as missing.
pub(crate) fn required<'a>(
    value: Option<&'a String>,
    origin: &str,
    field: &'static str,
) -> Result<&'a str, RecordError> {
    match value.map(|value| value.trim()) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(RecordError::MissingField {
            origin: origin.to_owned(),
            field,
        }),
    }
}

/// Get the required `date` field as an instant.
///
/// Dates RFC 2822 can't express, such as years before 1900, are
/// invalid since the feed couldn't carry them.
pub(crate) fn required_date(
    value: Option<&String>,
    origin: &str,
) -> Result<OffsetDateTime, RecordError> {
    let value = required(value, origin, "date")?;
    helpers::parse_date(value)
        .filter(|instant| instant.format(&Rfc2822).is_ok())
        .ok_or_else(|| RecordError::InvalidDate {
            origin: origin.to_owned(),
            value: value.to_owned(),
        })
}

/// The RSS view of a [`FeedItem`].
#[derive(Serialize)]
pub struct RssEntry<'a> {
    pub title: &'a String,
    pub description: &'a String,
    pub url: &'a String,
    pub guid: &'a String,
    /// RFC 2822 date, as RSS requires.
    pub pub_date: String,
}

impl<'a> RssEntry<'a> {
    pub fn new(item: &'a FeedItem) -> Result<Self, time::error::Format> {
        Ok(RssEntry {
            title: &item.title,
            description: &item.description,
            url: &item.url,
            guid: &item.guid,
            pub_date: item.date.format(&Rfc2822)?,
        })
    }
}
