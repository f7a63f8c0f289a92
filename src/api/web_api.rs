// src/api/web_api.rs
//! [`RecordSource`] over Notion's web API.
//!
//! `get_page` loads the page chunk by chunk and then queries every
//! collection view it contains, storing each view's result under
//! `collection_query[collection_id][view_id]`.

use super::parser::parse_api_response;
use super::requests::{
    self, Cursor, LoadPageChunkResponse, QueryCollectionResponse, SyncRecordValuesResponse,
};
use super::{RecordSource, Transport};
use crate::constants::{
    COLLECTION_QUERY_LIMIT, DEFAULT_USER_TIME_ZONE, MAX_PAGE_CHUNKS, PAGE_CHUNK_LIMIT,
};
use crate::error::AppError;
use crate::model::RecordMap;
use crate::types::NotionId;

pub struct NotionWebApi<T> {
    transport: T,
    user_time_zone: String,
}

impl<T: Transport> NotionWebApi<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            user_time_zone: DEFAULT_USER_TIME_ZONE.to_string(),
        }
    }

    /// Sets the time zone collection queries are evaluated in.
    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.user_time_zone = time_zone.into();
        self
    }

    async fn load_chunks(&self, page_id: &str) -> Result<RecordMap, AppError> {
        let mut record_map = RecordMap::default();
        let mut cursor = Cursor::default();

        for chunk_number in 0..MAX_PAGE_CHUNKS {
            let body = requests::load_page_chunk(page_id, chunk_number, PAGE_CHUNK_LIMIT, &cursor);
            let response = self.transport.post(requests::LOAD_PAGE_CHUNK, &body).await?;
            let chunk: LoadPageChunkResponse = parse_api_response(response)?;
            record_map.merge(chunk.record_map);

            match chunk.cursor {
                Some(next) if !next.stack.is_empty() => cursor = next,
                _ => return Ok(record_map),
            }
        }

        log::warn!(
            "Page {} still had content after {} chunks; remaining chunks skipped",
            page_id,
            MAX_PAGE_CHUNKS
        );
        Ok(record_map)
    }

    async fn query_view(
        &self,
        record_map: &mut RecordMap,
        collection_id: &str,
        view_id: &str,
    ) -> Result<(), AppError> {
        let body = requests::query_collection(
            collection_id,
            view_id,
            COLLECTION_QUERY_LIMIT,
            &self.user_time_zone,
        );
        let response = self.transport.post(requests::QUERY_COLLECTION, &body).await?;
        let query: QueryCollectionResponse = parse_api_response(response)?;

        record_map.merge(query.record_map);
        record_map
            .collection_query
            .entry(collection_id.to_string())
            .or_default()
            .insert(view_id.to_string(), query.result.into_view_result());
        Ok(())
    }

    async fn sync_records(&self, table: &str, ids: &[String]) -> Result<RecordMap, AppError> {
        if ids.is_empty() {
            return Ok(RecordMap::default());
        }
        let body = requests::sync_record_values(table, ids);
        let response = self.transport.post(requests::SYNC_RECORD_VALUES, &body).await?;
        let synced: SyncRecordValuesResponse = parse_api_response(response)?;
        Ok(synced.record_map)
    }
}

#[async_trait::async_trait]
impl<T: Transport> RecordSource for NotionWebApi<T> {
    async fn get_page(&self, id: &NotionId) -> Result<RecordMap, AppError> {
        let page_id = id.to_uuid();
        log::info!("Loading page {}", page_id);
        let mut record_map = self.load_chunks(&page_id).await?;

        for (collection_id, view_ids) in record_map.database_views() {
            for view_id in view_ids {
                // A view that fails to load leaves the rest of the page usable.
                if let Err(e) = self.query_view(&mut record_map, &collection_id, &view_id).await {
                    log::warn!(
                        "Collection query failed for {} (view {}): {}",
                        collection_id,
                        view_id,
                        e
                    );
                }
            }
        }

        log::debug!(
            "Page {} loaded: {} blocks, {} collections",
            page_id,
            record_map.block.len(),
            record_map.collection.len()
        );
        Ok(record_map)
    }

    async fn get_blocks(&self, ids: &[String]) -> Result<RecordMap, AppError> {
        log::debug!("Syncing {} blocks", ids.len());
        self.sync_records("block", ids).await
    }

    async fn get_users(&self, ids: &[String]) -> Result<RecordMap, AppError> {
        self.sync_records("notion_user", ids).await
    }
}
