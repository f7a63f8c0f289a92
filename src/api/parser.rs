// src/api/parser.rs
//! Response parsing for Notion's web API.
//!
//! Successful bodies are deserialized into the requested type; error bodies
//! (`{"errorId", "name", "message"}`) become [`AppError::NotionService`].

use super::client::ApiResponse;
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::{AppError, NotionErrorCode};
use reqwest::StatusCode;
use serde::Deserialize;

/// Error body returned by the web API.
#[derive(Debug, Deserialize)]
struct NotionApiError {
    #[serde(rename = "errorId")]
    error_id: Option<String>,
    name: String,
    #[serde(default)]
    message: String,
}

/// Parse any web API response into `T`.
pub fn parse_api_response<T>(result: ApiResponse<String>) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    if result.status.is_success() {
        parse_body(&result.data, &result.url)
    } else {
        Err(parse_error(&result.data, result.status, &result.url))
    }
}

fn parse_body<T>(body: &str, url: &str) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(body).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", url, e);
        AppError::MalformedResponse {
            endpoint: url.to_string(),
            message: format!("{} (body: {})", e, preview(body)),
        }
    })
}

fn parse_error(body: &str, status: StatusCode, url: &str) -> AppError {
    if let Ok(api_error) = serde_json::from_str::<NotionApiError>(body) {
        let code = NotionErrorCode::from_api_response(&api_error.name);
        if code.is_retryable() {
            log::warn!("Transient Notion error from {}: {}", url, api_error.name);
        }
        log::debug!(
            "Notion error id {} from {}",
            api_error.error_id.as_deref().unwrap_or("-"),
            url
        );
        return AppError::NotionService {
            code,
            message: api_error.message,
            status,
        };
    }

    AppError::NotionService {
        code: NotionErrorCode::from_http_status(status.as_u16()),
        message: format!("HTTP {} from {}: {}", status, url, preview(body)),
        status,
    }
}

fn preview(body: &str) -> String {
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let head: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", head)
    } else {
        body.to_string()
    }
}
