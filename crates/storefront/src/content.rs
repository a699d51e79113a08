//! Markdown marketing content (static pages and the blog).
//!
//! Content is read from disk once at startup, frontmatter is parsed, and
//! markdown is rendered to HTML up front. The store is immutable after
//! load; a deploy ships new content.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use comrak::{Options, markdown_to_html};
use gray_matter::{Matter, engine::YAML};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors loading or parsing content files.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content io error: {0}")]
    Io(String),
    #[error("content parse error: {0}")]
    Parse(String),
}

/// Metadata for static pages (FAQ, careers, terms, etc.)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub updated_at: Option<NaiveDate>,
}

/// Metadata for blog posts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMeta {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    pub published_at: NaiveDate,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub draft: bool,
}

/// A rendered page with metadata and HTML content
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub slug: String,
    #[serde(flatten)]
    pub meta: PageMeta,
    pub content_html: String,
}

/// A rendered blog post with metadata and HTML content
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub slug: String,
    #[serde(flatten)]
    pub meta: PostMeta,
    pub content_html: String,
    pub reading_time_minutes: u32,
}

/// Content store that holds all loaded content in memory
#[derive(Debug, Clone)]
pub struct ContentStore {
    pages: Arc<HashMap<String, Page>>,
    posts: Arc<Vec<Post>>,
}

impl ContentStore {
    /// Load all content under `content_dir` (`pages/` and `blog/`).
    ///
    /// Missing directories load as empty; a file that fails to parse is
    /// logged and skipped rather than failing startup.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing content directory cannot be read.
    pub fn load(content_dir: &Path) -> Result<Self, ContentError> {
        let mut pages = HashMap::new();
        for path in markdown_files(&content_dir.join("pages"))? {
            match load_page(&path) {
                Ok(page) => {
                    pages.insert(page.slug.clone(), page);
                }
                Err(e) => tracing::error!(?path, error = %e, "skipping unparseable page"),
            }
        }

        let mut posts = Vec::new();
        for path in markdown_files(&content_dir.join("blog"))? {
            match load_post(&path) {
                Ok(post) => posts.push(post),
                Err(e) => tracing::error!(?path, error = %e, "skipping unparseable post"),
            }
        }
        // Newest first.
        posts.sort_by(|a, b| b.meta.published_at.cmp(&a.meta.published_at));

        tracing::info!(
            pages = pages.len(),
            posts = posts.len(),
            "content loaded"
        );

        Ok(Self {
            pages: Arc::new(pages),
            posts: Arc::new(posts),
        })
    }

    /// Get a page by slug
    #[must_use]
    pub fn get_page(&self, slug: &str) -> Option<&Page> {
        self.pages.get(slug)
    }

    /// Get a blog post by slug
    #[must_use]
    pub fn get_post(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    /// Get all published blog posts (excludes drafts)
    pub fn get_published_posts(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter().filter(|p| !p.meta.draft)
    }

    /// Get posts by tag
    pub fn get_posts_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Post> {
        let tag_lower = tag.to_lowercase();
        self.posts.iter().filter(move |p| {
            !p.meta.draft && p.meta.tags.iter().any(|t| t.to_lowercase() == tag_lower)
        })
    }
}

/// All `.md` files directly under `dir`. A missing directory is empty.
fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>, ContentError> {
    if !dir.exists() {
        tracing::debug!(?dir, "content directory absent, loading nothing");
        return Ok(Vec::new());
    }
    let entries = std::fs::read_dir(dir).map_err(|e| ContentError::Io(e.to_string()))?;
    Ok(entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "md"))
        .collect())
}

/// Split a markdown file into typed frontmatter and rendered HTML.
fn parse_document<M: DeserializeOwned>(path: &Path) -> Result<(M, String, usize), ContentError> {
    let raw = std::fs::read_to_string(path).map_err(|e| ContentError::Io(e.to_string()))?;

    let parsed = Matter::<YAML>::new()
        .parse::<M>(&raw)
        .map_err(|e| ContentError::Parse(format!("bad frontmatter: {e}")))?;
    let meta = parsed
        .data
        .ok_or_else(|| ContentError::Parse("missing frontmatter".to_string()))?;

    let words = parsed.content.split_whitespace().count();
    Ok((meta, render_markdown(&parsed.content), words))
}

fn file_slug(path: &Path) -> Result<&str, ContentError> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ContentError::Parse("non-utf8 filename".to_string()))
}

fn load_page(path: &Path) -> Result<Page, ContentError> {
    let (meta, content_html, _) = parse_document::<PageMeta>(path)?;
    Ok(Page {
        slug: file_slug(path)?.to_string(),
        meta,
        content_html,
    })
}

fn load_post(path: &Path) -> Result<Post, ContentError> {
    let (meta, content_html, words) = parse_document::<PostMeta>(path)?;

    // "2026-01-15-launch.md" publishes under the slug "launch".
    let stem = file_slug(path)?;
    let slug = strip_date_prefix(stem).to_string();

    Ok(Post {
        slug,
        meta,
        content_html,
        reading_time_minutes: reading_time(words),
    })
}

/// Drop a leading `YYYY-MM-DD-` from a filename stem, if present.
fn strip_date_prefix(stem: &str) -> &str {
    let Some((prefix, rest)) = stem.split_at_checked(11) else {
        return stem;
    };
    let date_like = prefix.ends_with('-')
        && prefix[..10]
            .chars()
            .enumerate()
            .all(|(i, c)| if i == 4 || i == 7 { c == '-' } else { c.is_ascii_digit() });
    if date_like && !rest.is_empty() { rest } else { stem }
}

/// Reading time at roughly 200 words per minute, never below one minute.
fn reading_time(words: usize) -> u32 {
    u32::try_from(words.div_ceil(200)).unwrap_or(u32::MAX).max(1)
}

/// Render markdown to HTML with GitHub Flavored Markdown support.
fn render_markdown(content: &str) -> String {
    let mut options = Options::default();

    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.header_ids = Some(String::new());
    options.extension.footnotes = true;

    markdown_to_html(content, &options)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_render_markdown_gfm() {
        let html = render_markdown("# Hello\n\n~~struck~~ | a | b |");
        assert!(html.contains("<h1"));
        assert!(html.contains("<del>struck</del>"));
    }

    #[test]
    fn test_strip_date_prefix() {
        assert_eq!(strip_date_prefix("2026-01-15-launch"), "launch");
        assert_eq!(strip_date_prefix("launch"), "launch");
        assert_eq!(strip_date_prefix("2026-01-15-"), "2026-01-15-");
        assert_eq!(strip_date_prefix("not-a-date-launch"), "not-a-date-launch");
    }

    #[test]
    fn test_reading_time_floors_at_one_minute() {
        assert_eq!(reading_time(0), 1);
        assert_eq!(reading_time(150), 1);
        assert_eq!(reading_time(450), 3);
    }

    #[test]
    fn test_load_page_and_post() {
        let dir = tempfile::tempdir().unwrap();
        let pages = dir.path().join("pages");
        let blog = dir.path().join("blog");
        std::fs::create_dir_all(&pages).unwrap();
        std::fs::create_dir_all(&blog).unwrap();

        let mut page = std::fs::File::create(pages.join("faq.md")).unwrap();
        writeln!(page, "---\ntitle: FAQ\n---\n\n# Questions").unwrap();

        let mut post = std::fs::File::create(blog.join("2026-01-15-launch.md")).unwrap();
        writeln!(
            post,
            "---\ntitle: Launch\npublished_at: 2026-01-15\ntags: [news]\n---\n\nWe are live."
        )
        .unwrap();

        let store = ContentStore::load(dir.path()).unwrap();

        let page = store.get_page("faq").unwrap();
        assert_eq!(page.meta.title, "FAQ");
        assert!(page.content_html.contains("<h1"));

        // Date prefix is stripped from the slug.
        let post = store.get_post("launch").unwrap();
        assert_eq!(post.meta.title, "Launch");
        assert!(post.reading_time_minutes >= 1);
        assert_eq!(store.get_posts_by_tag("News").count(), 1);
    }

    #[test]
    fn test_missing_directories_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContentStore::load(dir.path()).unwrap();
        assert!(store.get_page("anything").is_none());
        assert_eq!(store.get_published_posts().count(), 0);
    }

    #[test]
    fn test_draft_posts_excluded() {
        let dir = tempfile::tempdir().unwrap();
        let blog = dir.path().join("blog");
        std::fs::create_dir_all(&blog).unwrap();

        let mut post = std::fs::File::create(blog.join("wip.md")).unwrap();
        writeln!(
            post,
            "---\ntitle: WIP\npublished_at: 2026-02-01\ndraft: true\n---\n\nSoon."
        )
        .unwrap();

        let store = ContentStore::load(dir.path()).unwrap();
        assert_eq!(store.get_published_posts().count(), 0);
        // Still addressable directly by slug.
        assert!(store.get_post("wip").is_some());
    }
}
