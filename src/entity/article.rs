use std::{
    fs,
    path::{Component, Path},
};

use serde::{Deserialize, Serialize};

use crate::{
    error::RecordError,
    feed::{self, FeedItem, FeedSource},
    markdown,
};

/// File extensions of blog articles.
pub const ARTICLE_EXTENSIONS: [&str; 2] = ["md", "mdx"];

/// The front matter of an article.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ArticleFrontmatter {
    pub title: Option<String>,
    /// The publish date, an ISO-like date string.
    pub date: Option<String>,
}

/// Fields derived from the article file itself.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ArticleFields {
    /// The url path of this article under `/blog`, like `/my-post/`.
    pub slug: Option<String>,
}

/// A blog article, loaded from a markdown or MDX file.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub frontmatter: ArticleFrontmatter,
    pub fields: ArticleFields,
    /// Plain text excerpt of the article body.
    pub excerpt: String,
    /// Path of the source file, used in diagnostics.
    #[serde(skip)]
    pub origin: String,
}

impl ArticleRecord {
    /// Load the article at `path`, its slug is derived from the
    /// path relative to `blog_dir`.
    pub fn load(path: &Path, blog_dir: &Path, excerpt_length: usize) -> Result<Self, RecordError> {
        let origin = path.display().to_string();
        let unreadable = |reason: String| RecordError::Unreadable {
            origin: origin.clone(),
            reason,
        };

        let content = fs::read_to_string(path).map_err(|err| unreadable(err.to_string()))?;
        let relative = path
            .strip_prefix(blog_dir)
            .map_err(|err| unreadable(err.to_string()))?;
        let mut article =
            Self::from_markdown(&content, excerpt_length).map_err(unreadable)?;
        article.fields.slug = Some(slug_from_path(relative));
        article.origin = origin;
        Ok(article)
    }

    /// Parse the front matter and excerpt of a markdown document.
    pub fn from_markdown(content: &str, excerpt_length: usize) -> Result<Self, String> {
        let (frontmatter, body) = split_frontmatter(content);
        let frontmatter = if frontmatter.trim().is_empty() {
            ArticleFrontmatter::default()
        } else {
            serde_yaml_ng::from_str::<ArticleFrontmatter>(frontmatter)
                .map_err(|err| format!("bad front matter: {err}"))?
        };

        Ok(ArticleRecord {
            frontmatter,
            fields: ArticleFields::default(),
            excerpt: markdown::extract_excerpt(body, excerpt_length),
            origin: String::new(),
        })
    }

    fn origin(&self) -> &str {
        if self.origin.is_empty() {
            self.frontmatter.title.as_deref().unwrap_or("<untitled article>")
        } else {
            &self.origin
        }
    }
}

impl FeedSource for ArticleRecord {
    fn to_feed_item(&self, base_url: &str) -> Result<FeedItem, RecordError> {
        let origin = self.origin();
        let title = feed::required(self.frontmatter.title.as_ref(), origin, "title")?;
        let date = feed::required_date(self.frontmatter.date.as_ref(), origin)?;
        let slug = feed::required(self.fields.slug.as_ref(), origin, "slug")?;

        let url = if slug.starts_with('/') {
            format!("{base_url}/blog{slug}")
        } else {
            format!("{base_url}/blog/{slug}")
        };
        Ok(FeedItem {
            title: title.to_owned(),
            date,
            description: self.excerpt.clone(),
            guid: url.clone(),
            url,
        })
    }
}

/// Split the YAML front matter fenced by `---` from the body.
///
/// Both fences must be lines holding exactly `---`.
fn split_frontmatter(content: &str) -> (&str, &str) {
    let trimmed = content.trim_start_matches('\u{feff}').trim_start();
    let Some((fence, rest)) = trimmed.split_once('\n') else {
        return ("", content);
    };
    if fence.trim_end() != "---" {
        return ("", content);
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return (&rest[..offset], &rest[offset + line.len()..]);
        }
        offset += line.len();
    }
    ("", content)
}

/// Derive the url slug from a path relative to the blog directory.
///
/// `hello.md` becomes `/hello/`, `2023/my-post/index.mdx` becomes
/// `/2023/my-post/`.
pub fn slug_from_path(relative: &Path) -> String {
    let mut segments = relative
        .with_extension("")
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>();
    if segments.last().map(String::as_str) == Some("index") {
        segments.pop();
    }

    if segments.is_empty() {
        "/".to_owned()
    } else {
        format!("/{}/", segments.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use test_case::test_case;

    use super::*;
    use crate::markdown::DEFAULT_EXCERPT_LENGTH;

    #[test_case("hello.md", "/hello/"; "flat file")]
    #[test_case("my-post/index.mdx", "/my-post/"; "index file")]
    #[test_case("2023/my-post/index.md", "/2023/my-post/"; "nested dir")]
    #[test_case("2023/notes.mdx", "/2023/notes/"; "nested file")]
    #[test_case("index.md", "/"; "root index")]
    fn test_slug_from_path(path: &str, expected: &str) {
        assert_eq!(slug_from_path(Path::new(path)), expected);
    }

    #[test]
    fn test_from_markdown() {
        let content = r#"---
title: "Hello: world"
date: 2023-01-01
tags: [rust]
---

# Intro

Some **text** here.
"#;
        let article = ArticleRecord::from_markdown(content, DEFAULT_EXCERPT_LENGTH).unwrap();
        assert_eq!(article.frontmatter.title.as_deref(), Some("Hello: world"));
        assert_eq!(article.frontmatter.date.as_deref(), Some("2023-01-01"));
        assert_eq!(article.excerpt, "Intro Some text here.");
    }

    #[test]
    fn test_from_markdown_without_frontmatter() {
        let article = ArticleRecord::from_markdown("Just text.", DEFAULT_EXCERPT_LENGTH).unwrap();
        assert!(article.frontmatter.title.is_none());
        assert_eq!(article.excerpt, "Just text.");
    }

    #[test]
    fn test_from_markdown_bad_frontmatter() {
        let content = "---\ntitle: [unclosed\n---\nbody";
        assert!(ArticleRecord::from_markdown(content, DEFAULT_EXCERPT_LENGTH).is_err());
    }

    #[test]
    fn test_split_frontmatter() {
        let (frontmatter, body) = split_frontmatter("---\ntitle: Hi\n---\n\n# Body");
        assert_eq!(frontmatter.trim(), "title: Hi");
        assert_eq!(body, "\n# Body");

        let (frontmatter, body) = split_frontmatter("# Just markdown");
        assert!(frontmatter.is_empty());
        assert_eq!(body, "# Just markdown");
    }

    #[test_case("---\ntitle: Hi\n---", "title: Hi\n", ""; "closing fence at end")]
    #[test_case("---  \r\ntitle: Hi\r\n---\r\nBody", "title: Hi\r\n", "Body"; "crlf and trailing spaces")]
    #[test_case("---\ntitle: Hi\n----\nsummary: ---x\n---\nBody", "title: Hi\n----\nsummary: ---x\n", "Body"; "dash lines inside block")]
    #[test_case("---\ntitle: Hi\n---more\nBody", "", "---\ntitle: Hi\n---more\nBody"; "unclosed block")]
    #[test_case("---yaml\ntitle: Hi\n---\nBody", "", "---yaml\ntitle: Hi\n---\nBody"; "opening fence with suffix")]
    #[test_case("----\ntitle: Hi\n----\nBody", "", "----\ntitle: Hi\n----\nBody"; "four dashes")]
    fn test_split_frontmatter_fences(content: &str, frontmatter: &str, body: &str) {
        assert_eq!(split_frontmatter(content), (frontmatter, body));
    }

    #[test]
    fn test_load() {
        let dir = std::env::temp_dir().join(format!("folio-article-{}", std::process::id()));
        let post_dir = dir.join("my-post");
        fs::create_dir_all(&post_dir).unwrap();
        let path = post_dir.join("index.mdx");
        fs::write(&path, "---\ntitle: Post\ndate: 2022-05-05\n---\nHi there.").unwrap();

        let article = ArticleRecord::load(&path, &dir, DEFAULT_EXCERPT_LENGTH).unwrap();
        assert_eq!(article.fields.slug.as_deref(), Some("/my-post/"));
        assert_eq!(article.origin, path.display().to_string());

        let missing = ArticleRecord::load(&PathBuf::from("/nonexistent/x.md"), &dir, 140);
        assert!(matches!(missing, Err(RecordError::Unreadable { .. })));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_to_feed_item() {
        let mut article = ArticleRecord::from_markdown(
            "---\ntitle: Post\ndate: 2022-05-05\n---\nHi there.",
            DEFAULT_EXCERPT_LENGTH,
        )
        .unwrap();
        article.fields.slug = Some("my-post/".into());

        let item = article.to_feed_item("https://example.com").unwrap();
        assert_eq!(item.title, "Post");
        assert_eq!(item.description, "Hi there.");
        assert_eq!(item.url, "https://example.com/blog/my-post/");
        assert_eq!(item.guid, item.url);
    }

    #[test]
    fn test_missing_date() {
        let article = ArticleRecord::from_markdown("---\ntitle: Post\n---\nbody", 140).unwrap();
        assert_eq!(
            article.to_feed_item("https://example.com"),
            Err(RecordError::MissingField {
                origin: "Post".into(),
                field: "date",
            })
        );
    }
}
