use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

#[cfg(feature = "ssr")]
use gray_matter::{engine::YAML, Matter};
#[cfg(feature = "ssr")]
use pulldown_cmark::{Options, Parser};

pub static GLOBAL_POST_CACHE: LazyLock<DashMap<String, Option<Post>>> = LazyLock::new(DashMap::new);
pub static GLOBAL_META_CACHE: LazyLock<DashMap<(), Vec<PostMeta>>> = LazyLock::new(DashMap::new);

#[derive(Embed)]
#[folder = "blog"]
#[cfg_attr(feature = "hydrate", metadata_only = true)]
pub struct Posts;

#[cfg(feature = "ssr")]
#[derive(Deserialize, Debug, Default)]
struct FrontMatter {
    title: String,
    excerpt: String,
    author: String,
    date: DateTime<Utc>,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostMeta {
    pub name: String,
    pub title: String,
    pub excerpt: String,
    pub author: String,
    pub date: DateTime<Utc>,
    pub tags: Vec<String>,
}

impl PostMeta {
    pub fn href(&self) -> String {
        format!("/blog/{}", self.name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlogError {
    #[error("Blog post not found")]
    NotFound,
    #[error("Couldn't parse blog post {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub meta: PostMeta,
    pub content: String,
}

/// Slugs of every embedded post, from file names.
pub fn post_names() -> Vec<String> {
    Posts::iter()
        .filter_map(|f| f.strip_suffix(".md").map(str::to_string))
        .collect()
}

#[cfg(feature = "ssr")]
fn read_post(file: &str) -> Result<String, BlogError> {
    let content = Posts::get(file).ok_or(BlogError::NotFound)?;
    String::from_utf8(content.data.into()).map_err(|_| BlogError::Parse(file.to_string()))
}

#[cfg(feature = "ssr")]
pub fn parse_post(name: &str, raw: &str) -> Result<Post, BlogError> {
    let matter = Matter::<YAML>::new();
    let parsed = matter
        .parse_with_struct::<FrontMatter>(raw)
        .ok_or_else(|| BlogError::Parse(name.to_string()))?;
    let fm = parsed.data;

    let parser = Parser::new_ext(&parsed.content, Options::all());
    let mut html_output = String::new();
    pulldown_cmark::html::push_html(&mut html_output, parser);

    Ok(Post {
        meta: PostMeta {
            name: name.to_string(),
            title: fm.title,
            excerpt: fm.excerpt,
            author: fm.author,
            date: fm.date,
            tags: fm.tags,
        },
        content: html_output,
    })
}

/// All post metadata, newest first.
#[cfg(feature = "ssr")]
pub async fn get_meta() -> Result<Vec<PostMeta>, BlogError> {
    let cache = &*GLOBAL_META_CACHE;
    if let Some(r) = cache.get(&()) {
        return Ok(r.clone());
    }
    let mut posts = post_names()
        .into_iter()
        .map(|name| get_post_uncached(&name).map(|p| p.meta))
        .collect::<Result<Vec<_>, _>>()?;
    posts.sort_by(|a, b| b.date.cmp(&a.date));
    cache.insert((), posts.clone());
    Ok(posts)
}

#[cfg(feature = "ssr")]
fn get_post_uncached(name: &str) -> Result<Post, BlogError> {
    let raw = read_post(&format!("{name}.md"))?;
    parse_post(name, &raw)
}

#[cfg(feature = "ssr")]
pub async fn get_post(name: String) -> Result<Post, BlogError> {
    // only embedded posts ever reach the cache
    Posts::get(&format!("{name}.md")).ok_or(BlogError::NotFound)?;
    let cache = &*GLOBAL_POST_CACHE;
    if let Some(cached) = cache.get(&name) {
        return cached.clone().ok_or(BlogError::NotFound);
    }
    match get_post_uncached(&name) {
        Ok(post) => {
            cache.insert(name, Some(post.clone()));
            Ok(post)
        }
        Err(e) => {
            log::error!("{e}");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_names_strip_extension() {
        let names = post_names();
        assert!(names.contains(&"designing-for-accessibility".to_string()));
        assert!(names.iter().all(|n| !n.ends_with(".md")));
    }

    #[cfg(feature = "ssr")]
    #[test]
    fn test_parse_post_front_matter_and_markdown() {
        let raw = "---\ntitle: \"Hello\"\nexcerpt: \"Short\"\nauthor: \"Honey\"\ndate: 2025-01-02T00:00:00Z\n---\n\n# Heading\n\nBody text.\n";
        let post = parse_post("hello", raw).unwrap();
        assert_eq!(post.meta.title, "Hello");
        assert_eq!(post.meta.href(), "/blog/hello");
        assert!(post.meta.tags.is_empty());
        assert!(post.content.contains("<h1>Heading</h1>"));
        assert!(!post.content.contains("excerpt"));
    }

    #[cfg(feature = "ssr")]
    #[test]
    fn test_meta_is_sorted_newest_first() {
        let meta = futures::executor::block_on(get_meta()).unwrap();
        assert_eq!(meta.len(), post_names().len());
        assert!(meta.windows(2).all(|w| w[0].date >= w[1].date));
    }

    #[cfg(feature = "ssr")]
    #[test]
    fn test_missing_post_is_not_found() {
        let res = futures::executor::block_on(get_post("nope".to_string()));
        assert_eq!(res, Err(BlogError::NotFound));
    }

    #[cfg(feature = "ssr")]
    #[test]
    fn test_missing_posts_are_not_cached() {
        let slugs = (0..200).map(|i| format!("missing-{i}")).collect::<Vec<_>>();
        for slug in &slugs {
            let res = futures::executor::block_on(get_post(slug.clone()));
            assert_eq!(res, Err(BlogError::NotFound));
        }
        assert!(slugs.iter().all(|s| !GLOBAL_POST_CACHE.contains_key(s)));

        let found = futures::executor::block_on(get_post("designing-for-accessibility".to_string()));
        assert!(found.is_ok());
        assert!(GLOBAL_POST_CACHE.contains_key("designing-for-accessibility"));
    }
}
