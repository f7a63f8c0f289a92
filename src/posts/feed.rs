// src/posts/feed.rs
//! Search and browse queries over an already filtered post list.

use super::post::Post;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Newest first, as assembled.
    #[default]
    Desc,
    Asc,
}

/// Narrowing applied to the feed: free-text search, tag, category and order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedQuery {
    pub q: Option<String>,
    pub tag: Option<String>,
    pub category: Option<String>,
    pub order: SortOrder,
}

impl FeedQuery {
    pub fn is_empty(&self) -> bool {
        self.q.is_none() && self.tag.is_none() && self.category.is_none() && self.order == SortOrder::Desc
    }

    /// Returns the posts matching every set criterion.
    pub fn apply(&self, posts: &[Post]) -> Vec<Post> {
        let needle = self.q.as_deref().map(str::to_lowercase);
        let mut matched: Vec<Post> = posts
            .iter()
            .filter(|post| match &needle {
                Some(needle) => search_text(post).contains(needle.as_str()),
                None => true,
            })
            .filter(|post| match &self.tag {
                Some(tag) => post.tags().iter().any(|t| t == tag),
                None => true,
            })
            .filter(|post| match &self.category {
                Some(category) => post.category().iter().any(|c| c == category),
                None => true,
            })
            .cloned()
            .collect();

        if self.order == SortOrder::Asc {
            matched.reverse();
        }
        matched
    }
}

/// Lowercased `title summary tags` haystack for free-text search.
fn search_text(post: &Post) -> String {
    format!(
        "{} {} {}",
        post.title().unwrap_or_default(),
        post.summary().unwrap_or_default(),
        post.tags().join(" ")
    )
    .to_lowercase()
}

/// The post whose slug is exactly `slug`.
pub fn find_by_slug<'a>(posts: &'a [Post], slug: &str) -> Option<&'a Post> {
    posts.iter().find(|post| post.slug() == Some(slug))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posts::post::PropertyValue;
    use chrono::DateTime;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    fn post(id: &str, title: &str, summary: Option<&str>, tags: &[&str], category: &str) -> Post {
        let mut properties = IndexMap::new();
        properties.insert("title".to_string(), PropertyValue::Text(title.to_string()));
        properties.insert("slug".to_string(), PropertyValue::Text(format!("{id}-slug")));
        if let Some(summary) = summary {
            properties.insert("summary".to_string(), PropertyValue::Text(summary.to_string()));
        }
        properties.insert(
            "tags".to_string(),
            PropertyValue::MultiSelect(tags.iter().map(|t| t.to_string()).collect()),
        );
        properties.insert(
            "category".to_string(),
            PropertyValue::Select(vec![category.to_string()]),
        );
        Post {
            id: id.to_string(),
            created_time: DateTime::default(),
            full_width: false,
            properties,
        }
    }

    fn posts() -> Vec<Post> {
        vec![
            post("a", "Async Rust", Some("Futures explained"), &["rust"], "dev"),
            post("b", "Gardening", None, &["life"], "life"),
            post("c", "Notion as CMS", Some("Headless blogging"), &["notion", "rust"], "dev"),
        ]
    }

    fn ids(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn empty_query_keeps_everything() {
        let query = FeedQuery::default();
        assert!(query.is_empty());
        assert_eq!(ids(&query.apply(&posts())), vec!["a", "b", "c"]);
    }

    #[test]
    fn search_is_case_insensitive_over_title_summary_and_tags() {
        let by_summary = FeedQuery {
            q: Some("HEADLESS".to_string()),
            ..FeedQuery::default()
        };
        assert_eq!(ids(&by_summary.apply(&posts())), vec!["c"]);

        let by_tag_text = FeedQuery {
            q: Some("rust".to_string()),
            ..FeedQuery::default()
        };
        assert_eq!(ids(&by_tag_text.apply(&posts())), vec!["a", "c"]);
    }

    #[test]
    fn tag_and_category_narrow_results() {
        let query = FeedQuery {
            tag: Some("rust".to_string()),
            category: Some("dev".to_string()),
            ..FeedQuery::default()
        };
        assert_eq!(ids(&query.apply(&posts())), vec!["a", "c"]);

        let none = FeedQuery {
            tag: Some("life".to_string()),
            category: Some("dev".to_string()),
            ..FeedQuery::default()
        };
        assert!(none.apply(&posts()).is_empty());
    }

    #[test]
    fn ascending_order_reverses() {
        let query = FeedQuery {
            order: SortOrder::Asc,
            ..FeedQuery::default()
        };
        assert_eq!(ids(&query.apply(&posts())), vec!["c", "b", "a"]);
    }

    #[test]
    fn finds_post_by_exact_slug() {
        let posts = posts();
        assert_eq!(find_by_slug(&posts, "b-slug").map(|p| p.id.as_str()), Some("b"));
        assert!(find_by_slug(&posts, "b").is_none());
    }
}
