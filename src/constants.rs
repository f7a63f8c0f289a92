// src/constants.rs
//! Domain constants that define the operational boundaries of the system.

// ---------------------------------------------------------------------------
// Notion web API boundaries
// ---------------------------------------------------------------------------

/// Blocks requested per `loadPageChunk` call.
pub const PAGE_CHUNK_LIMIT: usize = 100;

/// Upper bound on `loadPageChunk` round-trips for one page.
///
/// A database page's first chunk already carries the collection and its
/// views; further chunks only add body content.
pub const MAX_PAGE_CHUNKS: u32 = 10;

/// Rows requested per collection view query.
pub const COLLECTION_QUERY_LIMIT: usize = 999;

/// Time zone sent with collection queries when none is configured.
pub const DEFAULT_USER_TIME_ZONE: &str = "UTC";

// ---------------------------------------------------------------------------
// Image proxy
// ---------------------------------------------------------------------------

/// Canonical Notion web origin that serves `/image/...` proxy URLs.
pub const NOTION_ORIGIN: &str = "https://www.notion.so";

/// Cache generation appended to every proxied image URL.
pub const IMAGE_CACHE_VERSION: &str = "v2";

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

/// Floor and ceiling for in-flight page/user lookups when not configured.
pub const DEFAULT_MIN_CONCURRENCY: usize = 4;
pub const DEFAULT_MAX_CONCURRENCY: usize = 16;

/// Hard ceiling for a configured concurrency.
pub const MAX_CONCURRENCY: usize = 32;

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
