// src/posts/mod.rs
//! Blog posts sourced from a Notion database.
//!
//! The pipeline runs fetch, page id resolution, per-row property
//! extraction, assembly and sort, then filtering. Feed queries and option
//! counts work on the filtered list.

mod feed;
mod fetch;
mod filter;
pub mod image_url;
mod metadata;
mod page_ids;
mod post;
mod properties;
mod select_items;

pub use feed::{find_by_slug, FeedQuery, SortOrder};
pub use fetch::{assemble_posts, get_posts, get_record_map};
pub use filter::{filter_posts, filter_posts_now, publication_cutoff, FilterOptions};
pub use image_url::map_image_url;
pub use metadata::PageMetadata;
pub use page_ids::all_page_ids;
pub use post::{fields, DateRange, Post, PostAuthor, PostStatus, PostType, PropertyValue};
pub use properties::{decode_property, extract_page_properties, resolve_user, Decoded, PageProperties};
pub use select_items::{select_item_counts, SelectKey};
