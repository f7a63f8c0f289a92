// src/lib.rs
//! notion2blog library — reads a Notion database page as a blog.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling** — `AppError`, `ValidationError`, `DecodeError`, `ImageUrlError`
//! - **Configuration** — `CommandLineInput`, `SiteConfig`
//! - **Record model** — `RecordMap`, `Block`, `Collection`, `Schema`
//! - **API** — `RecordSource`, `Transport`, `NotionWebApi`, `NotionHttpClient`, `CachedTransport`
//! - **Posts** — `get_posts`, `filter_posts`, `FeedQuery`, `select_item_counts`, `map_image_url`
//! - **Pipeline** — `PostCatalog`, `NotionCatalog`, `render_document`

pub mod api;
mod config;
pub mod constants;
mod error;
pub mod model;
pub mod output;
mod pipeline;
pub mod posts;
mod types;

// --- Error Handling ---
pub use crate::error::{AppError, DecodeError, ImageUrlError, NotionErrorCode};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{default_concurrency, CommandLineInput, OrderArg, SiteConfig};

// --- Domain Types ---
pub use crate::types::{id_to_uuid, NotionId, SessionToken};

// --- Record Model ---
pub use crate::model::{
    Block, BlockMap, Collection, CollectionQueryResult, NotionUser, PropertyKind, Record,
    RecordMap, Schema, SchemaProperty,
};

// --- API ---
pub use crate::api::{
    cache::DiskCache, client::ApiResponse, CachedTransport, NotionHttpClient, NotionWebApi,
    RecordSource, Transport,
};

// --- Posts ---
pub use crate::posts::{
    all_page_ids, assemble_posts, extract_page_properties, filter_posts, filter_posts_now,
    find_by_slug, get_posts, get_record_map, map_image_url, publication_cutoff,
    select_item_counts, FeedQuery, FilterOptions, PageMetadata, PageProperties, Post, PostAuthor,
    PostStatus, PostType, PropertyValue, SelectKey, SortOrder,
};

// --- Pipeline ---
pub use crate::pipeline::{
    render_document, Delivery, Emit, NotionCatalog, PostCatalog, RenderRequest,
};
