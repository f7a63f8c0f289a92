// src/posts/post.rs
//! The normalized post record and its property values.

use crate::types::ValidationError;
use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Display names of the columns a blog database is expected to have.
pub mod fields {
    pub const TITLE: &str = "title";
    pub const SLUG: &str = "slug";
    pub const STATUS: &str = "status";
    pub const TYPE: &str = "type";
    pub const TAGS: &str = "tags";
    pub const CATEGORY: &str = "category";
    pub const SUMMARY: &str = "summary";
    pub const THUMBNAIL: &str = "thumbnail";
    pub const DATE: &str = "date";
    pub const AUTHOR: &str = "author";

    /// Keys the post itself owns; schema columns with these names are ignored.
    pub const RESERVED: [&str; 3] = ["id", "createdTime", "fullWidth"];
}

/// A date or date range as stored in a `d` decoration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder: Option<Value>,
}

/// A user referenced by a person column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostAuthor {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub profile_photo: Option<String>,
}

/// A decoded property value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Text(String),
    /// A proxied image URL.
    File(String),
    Date(DateRange),
    Select(Vec<String>),
    MultiSelect(Vec<String>),
    Person(Vec<PostAuthor>),
}

impl PropertyValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) | Self::File(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn as_options(&self) -> Option<&[String]> {
        match self {
            Self::Select(options) | Self::MultiSelect(options) => Some(options.as_slice()),
            _ => None,
        }
    }
}

/// One database row, flattened.
///
/// Serializes as a single JSON object: `id`, `createdTime`, `fullWidth`, then
/// one key per decoded column under its display name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub created_time: DateTime<Utc>,
    pub full_width: bool,
    #[serde(flatten)]
    pub properties: IndexMap<String, PropertyValue>,
}

impl Post {
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(PropertyValue::as_text)
    }

    fn options(&self, name: &str) -> &[String] {
        self.get(name)
            .and_then(PropertyValue::as_options)
            .unwrap_or_default()
    }

    pub fn title(&self) -> Option<&str> {
        self.text(fields::TITLE)
    }

    pub fn slug(&self) -> Option<&str> {
        self.text(fields::SLUG)
    }

    pub fn summary(&self) -> Option<&str> {
        self.text(fields::SUMMARY)
    }

    pub fn thumbnail(&self) -> Option<&str> {
        self.text(fields::THUMBNAIL)
    }

    /// The authoritative (first) status option, as written in Notion.
    pub fn status(&self) -> Option<&str> {
        self.options(fields::STATUS).first().map(String::as_str)
    }

    /// The authoritative (first) type option, as written in Notion.
    pub fn post_type(&self) -> Option<&str> {
        self.options(fields::TYPE).first().map(String::as_str)
    }

    pub fn tags(&self) -> &[String] {
        self.options(fields::TAGS)
    }

    pub fn category(&self) -> &[String] {
        self.options(fields::CATEGORY)
    }

    pub fn date(&self) -> Option<&DateRange> {
        match self.get(fields::DATE) {
            Some(PropertyValue::Date(range)) => Some(range),
            _ => None,
        }
    }

    pub fn authors(&self) -> &[PostAuthor] {
        match self.get(fields::AUTHOR) {
            Some(PropertyValue::Person(people)) => people.as_slice(),
            _ => &[],
        }
    }
}

/// Publication status of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostStatus {
    Private,
    Public,
    /// Reachable by URL but hidden from the feed.
    PublicOnDetail,
}

impl FromStr for PostStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Private" => Ok(Self::Private),
            "Public" => Ok(Self::Public),
            "PublicOnDetail" => Ok(Self::PublicOnDetail),
            other => Err(ValidationError::UnknownStatus(other.to_string())),
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Private => "Private",
            Self::Public => "Public",
            Self::PublicOnDetail => "PublicOnDetail",
        };
        write!(f, "{}", name)
    }
}

/// Kind of content a row represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostType {
    Post,
    Paper,
    Page,
}

impl FromStr for PostType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Post" => Ok(Self::Post),
            "Paper" => Ok(Self::Paper),
            "Page" => Ok(Self::Page),
            other => Err(ValidationError::UnknownType(other.to_string())),
        }
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Post => "Post",
            Self::Paper => "Paper",
            Self::Page => "Page",
        };
        write!(f, "{}", name)
    }
}
