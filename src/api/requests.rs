// src/api/requests.rs
//! Request bodies and response envelopes of the web API methods we call.

use crate::model::{CollectionQueryResult, RecordMap};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const LOAD_PAGE_CHUNK: &str = "loadPageChunk";
pub const QUERY_COLLECTION: &str = "queryCollection";
pub const SYNC_RECORD_VALUES: &str = "syncRecordValues";

/// Position in a chunked page load; an empty stack means done.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cursor {
    #[serde(default)]
    pub stack: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct LoadPageChunkResponse {
    #[serde(rename = "recordMap", default)]
    pub record_map: RecordMap,
    #[serde(default)]
    pub cursor: Option<Cursor>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct QueryResult {
    #[serde(rename = "reducerResults")]
    pub reducer_results: Option<CollectionQueryResult>,
    #[serde(rename = "blockIds")]
    pub block_ids: Option<Vec<String>>,
}

impl QueryResult {
    /// Normalizes reducer and legacy result layouts into one view entry.
    pub fn into_view_result(self) -> CollectionQueryResult {
        match self.reducer_results {
            Some(mut reducer) => {
                if reducer.block_ids.is_none() {
                    reducer.block_ids = self.block_ids;
                }
                reducer
            }
            None => CollectionQueryResult {
                block_ids: self.block_ids,
                collection_group_results: None,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct QueryCollectionResponse {
    #[serde(default)]
    pub result: QueryResult,
    #[serde(rename = "recordMap", default)]
    pub record_map: RecordMap,
}

#[derive(Debug, Deserialize)]
pub struct SyncRecordValuesResponse {
    #[serde(rename = "recordMap", default)]
    pub record_map: RecordMap,
}

pub fn load_page_chunk(page_id: &str, chunk_number: u32, limit: usize, cursor: &Cursor) -> Value {
    json!({
        "pageId": page_id,
        "limit": limit,
        "cursor": cursor,
        "chunkNumber": chunk_number,
        "verticalColumns": false,
    })
}

pub fn query_collection(
    collection_id: &str,
    view_id: &str,
    limit: usize,
    user_time_zone: &str,
) -> Value {
    json!({
        "collection": { "id": collection_id },
        "collectionView": { "id": view_id },
        "loader": {
            "type": "reducer",
            "reducers": {
                "collection_group_results": { "type": "results", "limit": limit }
            },
            "sort": [],
            "searchQuery": "",
            "userTimeZone": user_time_zone,
        },
    })
}

/// `syncRecordValues` body for the given table.
pub fn sync_record_values(table: &str, ids: &[String]) -> Value {
    let requests: Vec<Value> = ids
        .iter()
        .map(|id| json!({ "pointer": { "table": table, "id": id }, "version": -1 }))
        .collect();
    json!({ "requests": requests })
}
