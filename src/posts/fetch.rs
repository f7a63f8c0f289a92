// src/posts/fetch.rs
//! Fetches a blog database and assembles its rows into posts.

use super::page_ids::all_page_ids;
use super::post::Post;
use super::properties::extract_page_properties;
use crate::api::RecordSource;
use crate::error::AppError;
use crate::model::{BlockMap, RecordMap, Schema};
use crate::types::NotionId;
use chrono::{DateTime, Utc};
use futures::{StreamExt, TryStreamExt};
use tokio::sync::Semaphore;

/// Loads every post of the database at `root`, newest first.
///
/// A root page that is not a database yields no posts.
pub async fn get_posts(
    source: &dyn RecordSource,
    root: &NotionId,
    concurrency: usize,
) -> Result<Vec<Post>, AppError> {
    log::info!("Loading root page {}", root.to_uuid());
    let record_map = source.get_page(root).await?;

    let root_block = record_map
        .block(&root.to_uuid())
        .or_else(|| record_map.block(root.as_str()))
        .ok_or_else(|| AppError::RootPageMissing(root.to_uuid()))?;

    if !root_block.is_database() {
        log::info!(
            "Root page {} is a '{}' block, not a database; no posts",
            root.to_uuid(),
            root_block.block_type
        );
        return Ok(Vec::new());
    }

    let schema = match record_map.first_collection() {
        Some(collection) => collection.schema.clone(),
        None => {
            log::warn!("Database {} came without a collection schema", root.to_uuid());
            Schema::default()
        }
    };

    let page_ids = all_page_ids(&record_map, None);
    log::debug!("Resolved {} row ids", page_ids.len());
    if page_ids.is_empty() {
        return Ok(Vec::new());
    }

    let blocks = source.get_blocks(&page_ids).await?.block;
    assemble_posts(source, &page_ids, &blocks, &schema, concurrency).await
}

/// Builds posts for `page_ids` and sorts them by creation time, newest first.
///
/// Ids missing from `blocks` are skipped. Extraction runs with at most
/// `concurrency` pages in flight, and the user lookups of all those pages
/// share one budget of `concurrency` requests. The first failure aborts the
/// whole call.
pub async fn assemble_posts(
    source: &dyn RecordSource,
    page_ids: &[String],
    blocks: &BlockMap,
    schema: &Schema,
    concurrency: usize,
) -> Result<Vec<Post>, AppError> {
    let width = concurrency.max(1);
    let lookups = Semaphore::new(width);

    let pending: Vec<_> = page_ids
        .iter()
        .filter(|id| {
            let found = blocks.get(id.as_str()).is_some_and(|r| r.value.is_some());
            if !found {
                log::debug!("Row {} missing from block map; skipped", id);
            }
            found
        })
        .map(|id| assemble_post(source, id, blocks, schema, &lookups))
        .collect();

    let mut posts: Vec<Post> = futures::stream::iter(pending)
        .buffered(width)
        .try_collect()
        .await?;

    posts.sort_by(|a, b| b.created_time.cmp(&a.created_time));
    log::info!("Assembled {} posts", posts.len());
    Ok(posts)
}

async fn assemble_post(
    source: &dyn RecordSource,
    id: &str,
    blocks: &BlockMap,
    schema: &Schema,
    lookups: &Semaphore,
) -> Result<Post, AppError> {
    let properties = extract_page_properties(source, id, blocks, schema, lookups).await?;
    let block = blocks.get(id).and_then(|r| r.value.as_ref());

    let created_time: DateTime<Utc> = block
        .and_then(|b| b.created_time)
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or_default();
    let full_width = block
        .and_then(|b| b.format.as_ref())
        .and_then(|f| f.page_full_width)
        .unwrap_or(false);

    Ok(Post {
        id: properties.id,
        created_time,
        full_width,
        properties: properties.values,
    })
}

/// Loads the full record map of one page, for rendering its body.
pub async fn get_record_map(source: &dyn RecordSource, id: &NotionId) -> Result<RecordMap, AppError> {
    source.get_page(id).await
}
