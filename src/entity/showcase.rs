use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::RecordError,
    feed::{self, FeedItem, FeedSource},
};

/// A showcase entry, one object of a showcase JSON file.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ShowcaseRecord {
    pub slug: Option<String>,
    pub description: Option<String>,
    /// An ISO-like date string.
    pub date: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub title: Option<String>,
    #[serde(skip)]
    pub origin: String,
}

impl ShowcaseRecord {
    /// Load every entry of the showcase JSON file at `path`.
    ///
    /// A malformed file yields a single error, otherwise each entry
    /// loads on its own and a broken entry only removes itself.
    pub fn load(path: &Path) -> Vec<Result<Self, RecordError>> {
        let origin = path.display().to_string();
        let entries = match fs::read_to_string(path)
            .map_err(|err| err.to_string())
            .and_then(|json| {
                Self::from_json(&json).map_err(|err| format!("bad showcase json: {err}"))
            }) {
            Ok(entries) => entries,
            Err(reason) => return vec![Err(RecordError::Unreadable { origin, reason })],
        };

        let multiple = entries.len() > 1;
        entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let origin = if multiple {
                    format!("{origin}[{index}]")
                } else {
                    origin.clone()
                };
                match entry {
                    Ok(mut record) => {
                        record.origin = origin;
                        Ok(record)
                    }
                    Err(err) => Err(RecordError::Unreadable {
                        origin,
                        reason: format!("bad showcase entry: {err}"),
                    }),
                }
            })
            .collect()
    }

    /// Parse a showcase JSON document holding a single entry or a list
    /// of entries. Each entry is deserialized on its own.
    pub fn from_json(json: &str) -> serde_json::Result<Vec<serde_json::Result<Self>>> {
        Ok(match serde_json::from_str::<Value>(json)? {
            Value::Array(entries) => entries.into_iter().map(serde_json::from_value).collect(),
            entry => vec![serde_json::from_value(entry)],
        })
    }

    fn origin(&self) -> &str {
        if self.origin.is_empty() {
            self.title.as_deref().unwrap_or("<untitled showcase>")
        } else {
            &self.origin
        }
    }
}

impl FeedSource for ShowcaseRecord {
    fn to_feed_item(&self, base_url: &str) -> Result<FeedItem, RecordError> {
        let origin = self.origin();
        let title = feed::required(self.title.as_ref(), origin, "title")?;
        let date = feed::required_date(self.date.as_ref(), origin)?;
        let slug = feed::required(self.slug.as_ref(), origin, "slug")?;

        let url = format!("{base_url}/showcase/{}", slug.trim_start_matches('/'));
        Ok(FeedItem {
            title: title.to_owned(),
            date,
            description: self.description.clone().unwrap_or_default(),
            guid: url.clone(),
            url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_list() {
        let json = r#"[
            {"slug": "one", "title": "One", "date": "2022-01-01", "tags": ["rust", "cli"]},
            {"slug": "two", "title": "Two", "date": "2022-02-01", "description": "Second"}
        ]"#;
        let records = ShowcaseRecord::from_json(json)
            .unwrap()
            .into_iter()
            .collect::<serde_json::Result<Vec<_>>>()
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].tags, vec!["rust", "cli"]);
        assert_eq!(records[1].description.as_deref(), Some("Second"));
    }

    #[test]
    fn test_from_json_single() {
        let json = r#"{"slug": "one", "title": "One", "date": "2022-01-01"}"#;
        let records = ShowcaseRecord::from_json(json).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].as_ref().unwrap().tags.is_empty());
    }

    #[test]
    fn test_from_json_bad_entry_keeps_siblings() {
        let json = r#"[
            {"slug": "good", "title": "Good", "date": "2023-01-01"},
            {"slug": "bad", "title": "Bad", "date": "2023-01-02", "tags": "oops"},
            {"slug": "late", "title": "Late", "date": 20230101}
        ]"#;
        let entries = ShowcaseRecord::from_json(json).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].as_ref().unwrap().title.as_deref(), Some("Good"));
        assert!(entries[1].is_err());
        assert!(entries[2].is_err());
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(ShowcaseRecord::from_json("not json").is_err());
        let entries = ShowcaseRecord::from_json(r#"{"title": 42}"#).unwrap();
        assert!(entries[0].is_err());
    }

    #[test]
    fn test_load_origins() {
        let dir = std::env::temp_dir().join(format!("folio-showcase-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("projects.json");
        fs::write(
            &path,
            r#"[{"slug": "a"}, {"slug": "b", "tags": "oops"}, {"slug": "c"}]"#,
        )
        .unwrap();

        let entries = ShowcaseRecord::load(&path);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].as_ref().unwrap().origin, format!("{}[0]", path.display()));
        assert!(matches!(
            &entries[1],
            Err(RecordError::Unreadable { origin, .. }) if *origin == format!("{}[1]", path.display())
        ));
        assert_eq!(entries[2].as_ref().unwrap().slug.as_deref(), Some("c"));

        let broken = dir.join("broken.json");
        fs::write(&broken, "{").unwrap();
        let entries = ShowcaseRecord::load(&broken);
        assert_eq!(entries.len(), 1);
        assert!(matches!(&entries[0], Err(RecordError::Unreadable { .. })));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_to_feed_item() {
        let record = ShowcaseRecord {
            slug: Some("/cool-project".into()),
            title: Some("Cool".into()),
            date: Some("2023-06-01".into()),
            ..Default::default()
        };
        let item = record.to_feed_item("https://example.com").unwrap();
        assert_eq!(item.url, "https://example.com/showcase/cool-project");
        assert_eq!(item.description, "");
    }

    #[test]
    fn test_invalid_date() {
        let record = ShowcaseRecord {
            slug: Some("x".into()),
            title: Some("X".into()),
            date: Some("June".into()),
            ..Default::default()
        };
        assert_eq!(
            record.to_feed_item("https://example.com"),
            Err(RecordError::InvalidDate {
                origin: "X".into(),
                value: "June".into(),
            })
        );
    }
}
