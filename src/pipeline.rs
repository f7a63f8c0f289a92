// src/pipeline.rs
//! Pipeline capability traits and the render stage built on them.
//!
//! A run loads posts from a [`PostCatalog`], narrows them to what the
//! request asks for and hands a JSON document to a [`Delivery`].

use crate::api::RecordSource;
use crate::error::AppError;
use crate::model::RecordMap;
use crate::output::OutputReport;
use crate::posts::{
    filter_posts, find_by_slug, get_posts, get_record_map, select_item_counts, FeedQuery,
    FilterOptions, PageMetadata, Post, SelectKey,
};
use crate::types::NotionId;
use chrono::{DateTime, TimeZone};
use clap::ValueEnum;
use serde_json::{json, Value};

/// Supplies assembled posts and page record maps.
#[async_trait::async_trait]
pub trait PostCatalog: Send + Sync {
    /// Every post of the blog database, newest first, unfiltered.
    async fn posts(&self) -> Result<Vec<Post>, AppError>;

    async fn record_map(&self, id: &NotionId) -> Result<RecordMap, AppError>;
}

/// Delivers a rendered document to its destinations.
pub trait Delivery {
    fn deliver(&self, document: &Value) -> Result<OutputReport, AppError>;
}

/// A blog database read through a [`RecordSource`].
pub struct NotionCatalog<S> {
    source: S,
    root: NotionId,
    concurrency: usize,
}

impl<S: RecordSource> NotionCatalog<S> {
    pub fn new(source: S, root: NotionId, concurrency: usize) -> Self {
        Self {
            source,
            root,
            concurrency,
        }
    }
}

#[async_trait::async_trait]
impl<S: RecordSource> PostCatalog for NotionCatalog<S> {
    async fn posts(&self) -> Result<Vec<Post>, AppError> {
        get_posts(&self.source, &self.root, self.concurrency).await
    }

    async fn record_map(&self, id: &NotionId) -> Result<RecordMap, AppError> {
        get_record_map(&self.source, id).await
    }
}

/// What a run renders.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Emit {
    /// The filtered post list
    #[default]
    Posts,
    /// Tag name to post count
    Tags,
    /// Category name to post count
    Categories,
}

/// The document a run asks for.
#[derive(Debug, Clone, Default)]
pub struct RenderRequest {
    /// `None` keeps every assembled post.
    pub filter: Option<FilterOptions>,
    pub feed: FeedQuery,
    /// Renders a single post with its record map instead of a list.
    pub slug: Option<String>,
    pub emit: Emit,
}

/// Loads posts and renders the requested JSON document.
///
/// Publication cutoffs are computed from `now`.
pub async fn render_document<C, Tz>(
    catalog: &C,
    request: &RenderRequest,
    now: &DateTime<Tz>,
) -> Result<Value, AppError>
where
    C: PostCatalog + ?Sized,
    Tz: TimeZone,
{
    let posts = catalog.posts().await?;
    let total = posts.len();
    let posts = match &request.filter {
        Some(options) => filter_posts(&posts, options, now),
        None => posts,
    };
    log::info!("{} of {} posts pass the filter", posts.len(), total);

    if let Some(slug) = &request.slug {
        let post = find_by_slug(&posts, slug).ok_or_else(|| AppError::PostNotFound(slug.clone()))?;
        let page_id = NotionId::parse(&post.id)?;
        let record_map = catalog.record_map(&page_id).await?;
        let metadata = record_map
            .block(&page_id.to_uuid())
            .map(PageMetadata::from_block);
        return Ok(json!({ "post": post, "metadata": metadata, "recordMap": record_map }));
    }

    // Counts cover the whole published list; the feed query only narrows posts.
    let document = match request.emit {
        Emit::Posts => serde_json::to_value(request.feed.apply(&posts))?,
        Emit::Tags => serde_json::to_value(select_item_counts(SelectKey::Tags, &posts))?,
        Emit::Categories => serde_json::to_value(select_item_counts(SelectKey::Category, &posts))?,
    };
    Ok(document)
}
