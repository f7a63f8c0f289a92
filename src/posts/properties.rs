// src/posts/properties.rs
//! Decodes a page's raw properties against its collection schema.
//!
//! Decoding is split in two: a pure step that turns each raw decoration
//! array into a typed value (or a list of users still to resolve), and an
//! async step that looks those users up. Only `file` decode failures are
//! recovered locally; every other failure aborts extraction for the page.

use super::image_url::map_image_url;
use super::post::{fields, DateRange, PostAuthor, PropertyValue};
use crate::api::RecordSource;
use crate::error::{AppError, DecodeError};
use crate::model::decoration::{date_decoration, first_file_url, text_content, user_references};
use crate::model::{Block, BlockMap, PropertyKind, Schema};
use indexmap::IndexMap;
use serde_json::Value;
use tokio::sync::Semaphore;

/// Decoded properties of one page, keyed by display name.
#[derive(Debug, Clone, PartialEq)]
pub struct PageProperties {
    pub id: String,
    pub values: IndexMap<String, PropertyValue>,
}

/// Outcome of decoding one raw property without I/O.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Value(PropertyValue),
    /// Empty select text; the property stays unset.
    Unset,
    /// User ids still to be looked up.
    People(Vec<String>),
}

/// Decodes one raw property value of type `kind` on `block`.
pub fn decode_property(
    kind: &PropertyKind,
    raw: &Value,
    block: &Block,
) -> Result<Decoded, DecodeError> {
    match kind {
        PropertyKind::File => {
            let url = first_file_url(raw).ok_or(DecodeError::UnexpectedShape {
                expected: "file url string",
                path: "[0][1][0][1]",
            })?;
            Ok(Decoded::Value(PropertyValue::File(map_image_url(url, block)?)))
        }
        PropertyKind::Date => {
            let decoration = date_decoration(raw).ok_or(DecodeError::MissingDate)?;
            let range: DateRange = serde_json::from_value(decoration.clone())
                .map_err(|e| DecodeError::MalformedDate(e.to_string()))?;
            Ok(Decoded::Value(PropertyValue::Date(range)))
        }
        PropertyKind::Select | PropertyKind::MultiSelect => {
            let text = text_content(raw);
            if text.is_empty() {
                return Ok(Decoded::Unset);
            }
            let options = text.split(',').map(str::to_string).collect();
            Ok(Decoded::Value(match kind {
                PropertyKind::Select => PropertyValue::Select(options),
                _ => PropertyValue::MultiSelect(options),
            }))
        }
        PropertyKind::Person => Ok(Decoded::People(user_references(raw))),
        _ => Ok(Decoded::Value(PropertyValue::Text(text_content(raw)))),
    }
}

/// Looks up one user and builds its author entry.
///
/// A user missing from the response keeps only its id.
pub async fn resolve_user(source: &dyn RecordSource, user_id: &str) -> Result<PostAuthor, AppError> {
    let record_map = source
        .get_users(&[user_id.to_string()])
        .await
        .map_err(|e| AppError::UserLookup {
            user_id: user_id.to_string(),
            source: Box::new(e),
        })?;

    let Some(user) = record_map.user(user_id) else {
        log::debug!("User {} not returned by lookup", user_id);
        return Ok(PostAuthor {
            id: user_id.to_string(),
            name: None,
            profile_photo: None,
        });
    };

    let name = user.name.clone().filter(|n| !n.is_empty()).or_else(|| {
        let joined = format!(
            "{}{}",
            user.family_name.as_deref().unwrap_or_default(),
            user.given_name.as_deref().unwrap_or_default()
        );
        (!joined.is_empty()).then_some(joined)
    });

    Ok(PostAuthor {
        id: if user.id.is_empty() {
            user_id.to_string()
        } else {
            user.id.clone()
        },
        name,
        profile_photo: user.profile_photo.clone().filter(|p| !p.is_empty()),
    })
}

/// Resolves `user_id` once a permit of `lookups` is free.
async fn resolve_user_within(
    source: &dyn RecordSource,
    user_id: &str,
    lookups: &Semaphore,
) -> Result<PostAuthor, AppError> {
    let _permit = lookups.acquire().await.map_err(|e| AppError::InternalError {
        message: format!("User lookup budget closed: {}", e),
    })?;
    resolve_user(source, user_id).await
}

/// Extracts the typed properties of page `id`.
///
/// Raw keys absent from the schema are skipped. Person columns resolve their
/// users in reference order; each lookup holds a permit of `lookups`, which
/// callers share across pages to cap the requests in flight.
pub async fn extract_page_properties(
    source: &dyn RecordSource,
    id: &str,
    blocks: &BlockMap,
    schema: &Schema,
    lookups: &Semaphore,
) -> Result<PageProperties, AppError> {
    let mut values = IndexMap::new();
    let Some(block) = blocks.get(id).and_then(|r| r.value.as_ref()) else {
        return Ok(PageProperties {
            id: id.to_string(),
            values,
        });
    };

    let raw_properties = block.properties.iter().flatten();
    for (key, raw) in raw_properties {
        let Some(column) = schema.get(key) else {
            continue;
        };
        if fields::RESERVED.contains(&column.name.as_str()) {
            log::debug!("Column '{}' shadows a post field; skipped", column.name);
            continue;
        }

        let decoded = match decode_property(&column.kind, raw, block) {
            Ok(decoded) => decoded,
            Err(e) if column.kind == PropertyKind::File => {
                log::warn!(
                    "Ignoring file property '{}' of page {}: {}",
                    column.name,
                    id,
                    e
                );
                continue;
            }
            Err(e) => return Err(AppError::property_decode(id, &column.name, e)),
        };

        match decoded {
            Decoded::Value(value) => {
                values.insert(column.name.clone(), value);
            }
            Decoded::Unset => {}
            Decoded::People(user_ids) => {
                let pending: Vec<_> = user_ids
                    .iter()
                    .map(|user_id| resolve_user_within(source, user_id, lookups))
                    .collect();
                let people = futures::future::try_join_all(pending).await?;
                values.insert(column.name.clone(), PropertyValue::Person(people));
            }
        }
    }

    Ok(PageProperties {
        id: id.to_string(),
        values,
    })
}
