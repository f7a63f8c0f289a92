// src/api/mod.rs
//! Notion web API interaction — the ability to load record maps.
//!
//! Two seams keep HTTP out of the post pipeline: [`Transport`] moves raw
//! JSON bodies, and [`RecordSource`] turns them into record maps.

pub mod cache;
pub mod client;
pub mod parser;
mod requests;
mod web_api;

use crate::error::AppError;
use crate::model::RecordMap;
use crate::types::NotionId;
use client::ApiResponse;
use serde_json::Value;

/// The ability to load record maps from a Notion workspace.
///
/// Business logic depends on this trait, never on HTTP details.
#[async_trait::async_trait]
pub trait RecordSource: Send + Sync {
    /// Loads a page with its blocks, collections and collection query results.
    async fn get_page(&self, id: &NotionId) -> Result<RecordMap, AppError>;

    /// Loads the given blocks in one request.
    async fn get_blocks(&self, ids: &[String]) -> Result<RecordMap, AppError>;

    /// Loads `notion_user` records.
    async fn get_users(&self, ids: &[String]) -> Result<RecordMap, AppError>;
}

/// Moves a JSON request body to an API endpoint and returns the raw reply.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, endpoint: &str, body: &Value) -> Result<ApiResponse<String>, AppError>;
}

#[async_trait::async_trait]
impl<T: Transport + ?Sized> Transport for &T {
    async fn post(&self, endpoint: &str, body: &Value) -> Result<ApiResponse<String>, AppError> {
        (**self).post(endpoint, body).await
    }
}

pub use cache::CachedTransport;
pub use client::NotionHttpClient;
pub use web_api::NotionWebApi;
