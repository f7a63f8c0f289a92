// src/api/client.rs
//! Pure HTTP client wrapper for Notion's web API.
//!
//! This module provides a thin wrapper around reqwest for posting JSON to
//! `https://www.notion.so/api/v3`. It handles the optional session cookie
//! and basic request/response operations without parsing or business logic.

use crate::error::AppError;
use crate::types::SessionToken;
use reqwest::{header, Client, Response};
use serde_json::Value;

pub const API_BASE_URL: &str = "https://www.notion.so/api/v3";

/// A thin wrapper around reqwest Client for Notion web API requests.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: String,
}

impl NotionHttpClient {
    /// Creates a new HTTP client, authenticated when a token is given.
    pub fn new(token: Option<&SessionToken>) -> Result<Self, AppError> {
        Self::with_base_url(token, API_BASE_URL)
    }

    /// Creates a client against another API origin (proxies, test servers).
    pub fn with_base_url(
        token: Option<&SessionToken>,
        base_url: impl Into<String>,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(token)?)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Creates the default headers for web API requests.
    fn create_headers(token: Option<&SessionToken>) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        if let Some(token) = token {
            let cookie = format!("token_v2={}", token.as_str());
            headers.insert(
                header::COOKIE,
                header::HeaderValue::from_str(&cookie).map_err(|e| {
                    AppError::MissingConfiguration(format!("Invalid session token format: {}", e))
                })?,
            );
        }

        Ok(headers)
    }

    /// Makes a POST request with a JSON body to the specified endpoint.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - The API method name (without base URL), e.g. `loadPageChunk`
    /// * `body` - The request body
    pub async fn post_json(&self, endpoint: &str, body: &Value) -> Result<Response, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("POST {}", url);

        let response = self.client.post(url).json(body).send().await?;

        if !response.status().is_success() {
            log::warn!("{} responded with status {}", endpoint, response.status());
        }

        Ok(response)
    }
}

#[async_trait::async_trait]
impl super::Transport for NotionHttpClient {
    async fn post(&self, endpoint: &str, body: &Value) -> Result<ApiResponse<String>, AppError> {
        let response = self.post_json(endpoint, body).await?;
        extract_response_text(response).await
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

/// Extracts the response body as text with metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_carry_session_cookie() {
        let token = SessionToken::new("v02%3Auser_token_or_cookies%3Aabcdef").unwrap();
        let headers = NotionHttpClient::create_headers(Some(&token)).unwrap();
        assert_eq!(
            headers.get(header::COOKIE).unwrap(),
            "token_v2=v02%3Auser_token_or_cookies%3Aabcdef"
        );
    }

    #[test]
    fn anonymous_headers_have_no_cookie() {
        let headers = NotionHttpClient::create_headers(None).unwrap();
        assert!(headers.get(header::COOKIE).is_none());
        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn base_url_is_trimmed() {
        let client = NotionHttpClient::with_base_url(None, "http://localhost:8080/api/v3/").unwrap();
        assert_eq!(client.base_url, "http://localhost:8080/api/v3");
    }
}
