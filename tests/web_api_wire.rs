// tests/web_api_wire.rs
//! Drives the post pipeline through `NotionWebApi` with canned wire responses.

use notion2blog::{
    get_posts, AppError, ApiResponse, NotionErrorCode, NotionId, NotionWebApi, PostAuthor,
    Transport,
};
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Mutex;

const ROOT: &str = "https://www.notion.so/acme/Blog-0123456789abcdef0123456789abcdef";
const ROOT_KEY: &str = "01234567-89ab-cdef-0123-456789abcdef";

/// Answers each endpoint from a fixture and remembers what was asked.
struct FixtureTransport {
    unauthorized: bool,
    calls: Mutex<Vec<String>>,
}

impl FixtureTransport {
    fn new() -> Self {
        Self {
            unauthorized: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn reply(&self, endpoint: &str, body: &Value) -> (StatusCode, String) {
        if self.unauthorized {
            return (StatusCode::UNAUTHORIZED, "<html>login</html>".to_string());
        }
        let value = match endpoint {
            "loadPageChunk" => load_page_chunk(),
            "queryCollection" => query_collection(),
            "syncRecordValues" => match body["requests"][0]["pointer"]["table"].as_str() {
                Some("notion_user") => users(),
                _ => rows(),
            },
            other => return (StatusCode::NOT_FOUND, format!("unknown endpoint {other}")),
        };
        (StatusCode::OK, value.to_string())
    }
}

#[async_trait::async_trait]
impl Transport for FixtureTransport {
    async fn post(&self, endpoint: &str, body: &Value) -> Result<ApiResponse<String>, AppError> {
        self.calls.lock().unwrap().push(endpoint.to_string());
        let (status, data) = self.reply(endpoint, body);
        Ok(ApiResponse {
            data,
            status,
            url: format!("https://www.notion.so/api/v3/{endpoint}"),
        })
    }
}

/// Newer responses nest each record as `{ value: { role, value } }`.
fn nested(value: Value) -> Value {
    json!({ "spaceId": "s1", "value": { "role": "reader", "value": value } })
}

fn load_page_chunk() -> Value {
    json!({
        "recordMap": {
            "block": {
                ROOT_KEY: nested(json!({
                    "id": ROOT_KEY,
                    "type": "collection_view_page",
                    "collection_id": "c1",
                    "view_ids": ["v1", "v2"]
                }))
            },
            "collection": {
                "c1": nested(json!({
                    "id": "c1",
                    "schema": {
                        "title": { "name": "title", "type": "title" },
                        "sl": { "name": "slug", "type": "text" },
                        "au": { "name": "author", "type": "person" },
                        "cr": { "name": "createdTime", "type": "text" }
                    }
                }))
            }
        },
        "cursor": { "stack": [] }
    })
}

fn query_collection() -> Value {
    json!({
        "result": {
            "type": "reducer",
            "reducerResults": {
                "collection_group_results": { "type": "results", "blockIds": ["p-old", "p-new"] }
            }
        },
        "recordMap": {}
    })
}

fn rows() -> Value {
    json!({
        "recordMap": {
            "block": {
                "p-old": nested(json!({
                    "id": "p-old",
                    "type": "page",
                    "created_time": 1_600_000_000_000_i64,
                    "properties": {
                        "title": [["Older"]],
                        "sl": [["older"]],
                        "cr": [["shadowed"]]
                    }
                })),
                "p-new": nested(json!({
                    "id": "p-new",
                    "type": "page",
                    "created_time": 1_700_000_000_000_i64,
                    "format": { "page_full_width": true },
                    "properties": {
                        "title": [["Newer"]],
                        "sl": [["newer"]],
                        "au": [["‣", [["u", "u-kim"]]]]
                    }
                }))
            }
        }
    })
}

fn users() -> Value {
    json!({
        "recordMap": {
            "notion_user": {
                "u-kim": nested(json!({
                    "id": "u-kim",
                    "family_name": "Kim",
                    "given_name": "Minji"
                }))
            }
        }
    })
}

#[tokio::test]
async fn posts_come_through_the_wire_format() {
    let api = NotionWebApi::new(FixtureTransport::new());
    let root = NotionId::parse(ROOT).unwrap();

    let posts = get_posts(&api, &root, 4).await.unwrap();

    let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p-new", "p-old"]);

    let newer = &posts[0];
    assert!(newer.full_width);
    assert_eq!(newer.slug(), Some("newer"));
    assert_eq!(
        newer.authors(),
        [PostAuthor {
            id: "u-kim".to_string(),
            name: Some("KimMinji".to_string()),
            profile_photo: None,
        }]
    );

    // A column named like a post field never overrides it.
    let older = serde_json::to_value(&posts[1]).unwrap();
    assert_eq!(older["createdTime"], "2020-09-13T12:26:40Z");
}

#[tokio::test]
async fn every_view_is_queried_once() {
    let transport = FixtureTransport::new();
    let api = NotionWebApi::new(&transport);
    let root = NotionId::parse(ROOT).unwrap();

    get_posts(&api, &root, 1).await.unwrap();

    let calls = transport.calls.lock().unwrap();
    assert_eq!(calls[0], "loadPageChunk");
    assert_eq!(calls.iter().filter(|c| *c == "queryCollection").count(), 2);
    // One block sync for the rows, one user sync for the single author.
    assert_eq!(calls.iter().filter(|c| *c == "syncRecordValues").count(), 2);
}

#[tokio::test]
async fn unauthorized_html_reply_maps_to_status() {
    let transport = FixtureTransport {
        unauthorized: true,
        calls: Mutex::new(Vec::new()),
    };
    let api = NotionWebApi::new(transport);
    let root = NotionId::parse(ROOT).unwrap();

    let err = get_posts(&api, &root, 4).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::NotionService {
            code: NotionErrorCode::Unauthorized,
            ..
        }
    ));
}
