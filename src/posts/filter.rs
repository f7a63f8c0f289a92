// src/posts/filter.rs
//! Decides which posts are publishable.

use super::post::{Post, PostStatus, PostType};
use chrono::{DateTime, Duration, Local, NaiveTime, TimeZone};

/// Status and type values a post must carry to be kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOptions {
    pub accept_status: Vec<PostStatus>,
    pub accept_type: Vec<PostType>,
}

impl Default for FilterOptions {
    /// Public posts only, as shown in the feed.
    fn default() -> Self {
        Self {
            accept_status: vec![PostStatus::Public],
            accept_type: vec![PostType::Post],
        }
    }
}

impl FilterOptions {
    /// Everything reachable by URL, for detail page lookups.
    pub fn detail() -> Self {
        Self {
            accept_status: vec![PostStatus::Public, PostStatus::PublicOnDetail],
            accept_type: vec![PostType::Paper, PostType::Post, PostType::Page],
        }
    }

    fn accepts(&self, post: &Post) -> bool {
        let status = post.status().and_then(|s| s.parse::<PostStatus>().ok());
        let post_type = post.post_type().and_then(|t| t.parse::<PostType>().ok());
        match (status, post_type) {
            (Some(status), Some(post_type)) => {
                self.accept_status.contains(&status) && self.accept_type.contains(&post_type)
            }
            _ => false,
        }
    }
}

/// Start of the day after `now`, in `now`'s time zone.
pub fn publication_cutoff<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    let tomorrow = now.date_naive() + Duration::days(1);
    now.timezone()
        .from_local_datetime(&tomorrow.and_time(NaiveTime::MIN))
        .earliest()
        .unwrap_or_else(|| now.clone() + Duration::days(1))
}

/// Keeps titled, slugged posts created before tomorrow whose status and type
/// are accepted. Order is preserved.
pub fn filter_posts<Tz: TimeZone>(
    posts: &[Post],
    options: &FilterOptions,
    now: &DateTime<Tz>,
) -> Vec<Post> {
    let cutoff = publication_cutoff(now);
    posts
        .iter()
        .filter(|post| post.title().is_some() && post.slug().is_some())
        .filter(|post| post.created_time <= cutoff)
        .filter(|post| options.accepts(post))
        .cloned()
        .collect()
}

/// [`filter_posts`] against the local clock.
pub fn filter_posts_now(posts: &[Post], options: &FilterOptions) -> Vec<Post> {
    filter_posts(posts, options, &Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posts::post::PropertyValue;
    use chrono::{FixedOffset, Utc};
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    fn post(id: &str, created: &str, status: Option<&str>, kind: Option<&str>) -> Post {
        let mut properties = IndexMap::new();
        properties.insert("title".to_string(), PropertyValue::Text(format!("Title {id}")));
        properties.insert("slug".to_string(), PropertyValue::Text(id.to_string()));
        if let Some(status) = status {
            properties.insert(
                "status".to_string(),
                PropertyValue::Select(vec![status.to_string()]),
            );
        }
        if let Some(kind) = kind {
            properties.insert("type".to_string(), PropertyValue::Select(vec![kind.to_string()]));
        }
        Post {
            id: id.to_string(),
            created_time: created.parse::<DateTime<Utc>>().unwrap(),
            full_width: false,
            properties,
        }
    }

    fn now() -> DateTime<Utc> {
        "2024-05-10T15:00:00Z".parse().unwrap()
    }

    fn ids(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn cutoff_is_next_midnight() {
        assert_eq!(
            publication_cutoff(&now()),
            "2024-05-11T00:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }

    #[test]
    fn cutoff_follows_time_zone() {
        let seoul = FixedOffset::east_opt(9 * 3600).unwrap();
        let local_now = now().with_timezone(&seoul);
        // 2024-05-11 00:00 in Seoul is 2024-05-10 15:00 UTC; tomorrow is the 12th.
        assert_eq!(
            publication_cutoff(&local_now).with_timezone(&Utc),
            "2024-05-11T15:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }

    #[test]
    fn default_keeps_public_posts_only() {
        let posts = vec![
            post("a", "2024-05-01T00:00:00Z", Some("Public"), Some("Post")),
            post("b", "2024-05-01T00:00:00Z", Some("Private"), Some("Post")),
            post("c", "2024-05-01T00:00:00Z", Some("PublicOnDetail"), Some("Post")),
            post("d", "2024-05-01T00:00:00Z", Some("Public"), Some("Page")),
            post("e", "2024-05-01T00:00:00Z", None, Some("Post")),
            post("f", "2024-05-01T00:00:00Z", Some("Public"), None),
        ];
        let kept = filter_posts(&posts, &FilterOptions::default(), &now());
        assert_eq!(ids(&kept), vec!["a"]);
    }

    #[test]
    fn detail_preset_widens_status_and_type() {
        let posts = vec![
            post("a", "2024-05-01T00:00:00Z", Some("Public"), Some("Post")),
            post("b", "2024-05-01T00:00:00Z", Some("Private"), Some("Post")),
            post("c", "2024-05-01T00:00:00Z", Some("PublicOnDetail"), Some("Paper")),
            post("d", "2024-05-01T00:00:00Z", Some("Public"), Some("Page")),
        ];
        let kept = filter_posts(&posts, &FilterOptions::detail(), &now());
        assert_eq!(ids(&kept), vec!["a", "c", "d"]);
    }

    #[test]
    fn future_posts_are_held_back() {
        let posts = vec![
            post("today", "2024-05-10T23:59:59Z", Some("Public"), Some("Post")),
            post("midnight", "2024-05-11T00:00:00Z", Some("Public"), Some("Post")),
            post("later", "2024-05-11T00:00:01Z", Some("Public"), Some("Post")),
        ];
        let kept = filter_posts(&posts, &FilterOptions::default(), &now());
        assert_eq!(ids(&kept), vec!["today", "midnight"]);
    }

    #[test]
    fn untitled_or_unslugged_posts_are_dropped() {
        let mut untitled = post("a", "2024-05-01T00:00:00Z", Some("Public"), Some("Post"));
        untitled.properties.shift_remove("title");
        let mut unslugged = post("b", "2024-05-01T00:00:00Z", Some("Public"), Some("Post"));
        unslugged.properties.shift_remove("slug");
        let kept = filter_posts(&[untitled, unslugged], &FilterOptions::default(), &now());
        assert!(kept.is_empty());
    }

    #[test]
    fn only_first_status_counts() {
        let mut p = post("a", "2024-05-01T00:00:00Z", None, Some("Post"));
        p.properties.insert(
            "status".to_string(),
            PropertyValue::Select(vec!["Private".to_string(), "Public".to_string()]),
        );
        assert!(filter_posts(&[p], &FilterOptions::default(), &now()).is_empty());
    }
}
