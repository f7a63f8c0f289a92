// src/posts/select_items.rs
use super::post::Post;
use indexmap::IndexMap;
use std::fmt;

/// A select column whose options are tallied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectKey {
    Tags,
    Category,
}

impl SelectKey {
    fn options<'a>(&self, post: &'a Post) -> &'a [String] {
        match self {
            Self::Tags => post.tags(),
            Self::Category => post.category(),
        }
    }
}

impl fmt::Display for SelectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tags => write!(f, "tags"),
            Self::Category => write!(f, "category"),
        }
    }
}

/// Counts how often each option of `key` occurs across `posts`.
///
/// Options keep first-seen order; empty option names are skipped.
pub fn select_item_counts(key: SelectKey, posts: &[Post]) -> IndexMap<String, usize> {
    let mut counts = IndexMap::new();
    for item in posts.iter().flat_map(|post| key.options(post)) {
        if item.is_empty() {
            continue;
        }
        *counts.entry(item.clone()).or_insert(0) += 1;
    }
    counts
}
