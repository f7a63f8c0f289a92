// src/api/cache.rs
//! Disk-based response cache for web API calls.
//!
//! Caches raw JSON responses keyed by endpoint and request body, with
//! TTL-based expiry. On cache hit the cached JSON is handed back to the same
//! parsers used for live responses; the record map is never serialized.

use super::client::ApiResponse;
use super::Transport;
use crate::error::AppError;
use serde_json::Value;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

// ---------------------------------------------------------------------------
// Disk cache
// ---------------------------------------------------------------------------

/// TTL-based file cache for raw API response strings.
///
/// Cache operations are best-effort: read/write failures are silently
/// ignored so a broken cache never prevents fresh API calls.
pub struct DiskCache {
    cache_dir: PathBuf,
    ttl_secs: u64,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct CacheEntry {
    data: String,
    cached_at: u64,
}

impl DiskCache {
    /// Creates a new cache in `$XDG_CACHE_HOME/notion2blog` (or `~/.cache/notion2blog`).
    pub async fn new(ttl_secs: u64) -> Result<Self, std::io::Error> {
        Self::in_dir(Self::default_cache_dir(), ttl_secs).await
    }

    /// Creates a cache rooted at `cache_dir`.
    ///
    /// On creation, expired entries are purged to prevent unbounded disk growth.
    pub async fn in_dir(cache_dir: PathBuf, ttl_secs: u64) -> Result<Self, std::io::Error> {
        tokio::fs::create_dir_all(&cache_dir).await?;
        let cache = Self {
            cache_dir,
            ttl_secs,
        };
        cache.purge_expired().await;
        Ok(cache)
    }

    fn default_cache_dir() -> PathBuf {
        std::env::var("XDG_CACHE_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
                PathBuf::from(home).join(".cache")
            })
            .join("notion2blog")
    }

    /// Returns cached data if the entry exists and has not expired.
    pub async fn get(&self, key: &str) -> Option<String> {
        let path = self.key_to_path(key);
        let content = tokio::fs::read_to_string(&path).await.ok()?;
        let entry: CacheEntry = serde_json::from_str(&content).ok()?;
        let now = SystemTime::now().duration_since(UNIX_EPOCH).ok()?.as_secs();
        if now.saturating_sub(entry.cached_at) > self.ttl_secs {
            let _ = tokio::fs::remove_file(&path).await;
            return None;
        }
        Some(entry.data)
    }

    /// Stores data in the cache. Errors are silently ignored (cache is best-effort).
    pub async fn set(&self, key: &str, data: &str) {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let entry = CacheEntry {
            data: data.to_string(),
            cached_at: now,
        };
        if let Ok(json) = serde_json::to_string(&entry) {
            let _ = tokio::fs::write(self.key_to_path(key), json).await;
        }
    }

    /// Removes all expired cache entries from disk.
    async fn purge_expired(&self) {
        let now = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_secs(),
            Err(_) => return,
        };

        let mut dir = match tokio::fs::read_dir(&self.cache_dir).await {
            Ok(d) => d,
            Err(_) => return,
        };

        while let Ok(Some(entry)) = dir.next_entry().await {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Ok(content) = tokio::fs::read_to_string(&path).await {
                if let Ok(cached) = serde_json::from_str::<CacheEntry>(&content) {
                    if now.saturating_sub(cached.cached_at) > self.ttl_secs {
                        let _ = tokio::fs::remove_file(&path).await;
                    }
                }
            }
        }
    }

    fn key_to_path(&self, key: &str) -> PathBuf {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        self.cache_dir.join(format!("{:016x}.json", hasher.finish()))
    }
}

// ---------------------------------------------------------------------------
// Cached transport
// ---------------------------------------------------------------------------

/// A [`Transport`] that serves repeated requests from a [`DiskCache`].
///
/// Only successful responses are stored. Without a usable cache directory
/// every request goes straight to the inner transport.
pub struct CachedTransport<T> {
    inner: T,
    cache: Option<DiskCache>,
}

impl<T: Transport> CachedTransport<T> {
    /// Wraps a transport with the default on-disk cache.
    pub async fn new(inner: T, ttl_secs: u64) -> Self {
        Self::in_dir(inner, DiskCache::default_cache_dir(), ttl_secs).await
    }

    /// Wraps a transport with a cache rooted at `cache_dir`.
    pub async fn in_dir(inner: T, cache_dir: PathBuf, ttl_secs: u64) -> Self {
        let cache = match DiskCache::in_dir(cache_dir.clone(), ttl_secs).await {
            Ok(cache) => Some(cache),
            Err(e) => {
                log::warn!(
                    "Disk cache at {} unavailable, continuing uncached: {}",
                    cache_dir.display(),
                    e
                );
                None
            }
        };
        Self { inner, cache }
    }

    pub fn with_cache(inner: T, cache: DiskCache) -> Self {
        Self {
            inner,
            cache: Some(cache),
        }
    }

    /// Whether responses are being cached.
    pub fn is_caching(&self) -> bool {
        self.cache.is_some()
    }

    fn cache_key(endpoint: &str, body: &Value) -> String {
        format!("{}:{}", endpoint, body)
    }
}

#[async_trait::async_trait]
impl<T: Transport> Transport for CachedTransport<T> {
    async fn post(&self, endpoint: &str, body: &Value) -> Result<ApiResponse<String>, AppError> {
        let Some(cache) = &self.cache else {
            return self.inner.post(endpoint, body).await;
        };
        let cache_key = Self::cache_key(endpoint, body);

        if let Some(cached) = cache.get(&cache_key).await {
            log::debug!("Cache hit: {}", endpoint);
            return Ok(ApiResponse {
                data: cached,
                status: reqwest::StatusCode::OK,
                url: format!("cache://{}", endpoint),
            });
        }

        log::debug!("Cache miss: {}", endpoint);
        let response = self.inner.post(endpoint, body).await?;
        if response.status.is_success() {
            cache.set(&cache_key, &response.data).await;
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingTransport {
        calls: AtomicUsize,
        status: reqwest::StatusCode,
    }

    #[async_trait::async_trait]
    impl Transport for CountingTransport {
        async fn post(&self, endpoint: &str, _body: &Value) -> Result<ApiResponse<String>, AppError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ApiResponse {
                data: format!("{{\"call\": {}}}", n),
                status: self.status,
                url: endpoint.to_string(),
            })
        }
    }

    #[tokio::test]
    async fn disk_cache_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::in_dir(dir.path().to_path_buf(), 60).await.unwrap();
        assert!(cache.get("k").await.is_none());
        cache.set("k", "v").await;
        assert_eq!(cache.get("k").await.as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn expired_entries_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::in_dir(dir.path().to_path_buf(), 60).await.unwrap();
        let stale = CacheEntry {
            data: "old".to_string(),
            cached_at: 0,
        };
        std::fs::write(cache.key_to_path("k"), serde_json::to_string(&stale).unwrap()).unwrap();
        assert!(cache.get("k").await.is_none());
        assert!(!cache.key_to_path("k").exists());
    }

    #[tokio::test]
    async fn repeated_request_hits_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::in_dir(dir.path().to_path_buf(), 60).await.unwrap();
        let transport = CachedTransport::with_cache(
            CountingTransport {
                calls: AtomicUsize::new(0),
                status: reqwest::StatusCode::OK,
            },
            cache,
        );
        let body = json!({ "pageId": "p" });

        let first = transport.post("loadPageChunk", &body).await.unwrap();
        let second = transport.post("loadPageChunk", &body).await.unwrap();
        assert_eq!(first.data, second.data);
        assert!(second.url.starts_with("cache://"));
        assert_eq!(transport.inner.calls.load(Ordering::SeqCst), 1);

        transport
            .post("loadPageChunk", &json!({ "pageId": "q" }))
            .await
            .unwrap();
        assert_eq!(transport.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unusable_cache_dir_falls_back_to_live_requests() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "file").unwrap();

        let transport = CachedTransport::in_dir(
            CountingTransport {
                calls: AtomicUsize::new(0),
                status: reqwest::StatusCode::OK,
            },
            blocker.join("notion2blog"),
            60,
        )
        .await;
        assert!(!transport.is_caching());

        let body = json!({ "pageId": "p" });
        let first = transport.post("loadPageChunk", &body).await.unwrap();
        let second = transport.post("loadPageChunk", &body).await.unwrap();
        assert_eq!(first.data, "{\"call\": 0}");
        assert_eq!(second.data, "{\"call\": 1}");
        assert_eq!(transport.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::in_dir(dir.path().to_path_buf(), 60).await.unwrap();
        let transport = CachedTransport::with_cache(
            CountingTransport {
                calls: AtomicUsize::new(0),
                status: reqwest::StatusCode::BAD_GATEWAY,
            },
            cache,
        );
        let body = json!({});
        transport.post("syncRecordValues", &body).await.unwrap();
        transport.post("syncRecordValues", &body).await.unwrap();
        assert_eq!(transport.inner.calls.load(Ordering::SeqCst), 2);
    }
}
