// src/model/record_map.rs
//! The record map returned by Notion's web API.
//!
//! Tables are keyed by hyphenated id. Only the fields the post pipeline reads
//! are modelled; everything else on a block is kept in `extra` so a record
//! map can be written back out for detail pages.

use super::schema::Schema;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;

/// Block types that render a database.
pub const DATABASE_BLOCK_TYPES: [&str; 2] = ["collection_view_page", "collection_view"];

/// A single record with the reader's role.
///
/// Accepts both the flat `{ "role", "value": {..} }` shape and the nested
/// `{ "value": { "role", "value": {..} } }` shape newer responses use.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<T> {
    pub role: Option<String>,
    pub value: Option<T>,
}

impl<T> Record<T> {
    pub fn new(value: T) -> Self {
        Self {
            role: Some("reader".to_string()),
            value: Some(value),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Record<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut raw = Value::deserialize(deserializer)?;
        let mut role = raw
            .get("role")
            .and_then(Value::as_str)
            .map(str::to_string);
        let mut value = raw.get_mut("value").map(Value::take).unwrap_or(Value::Null);

        let nested = value.get("role").is_some() && value.get("value").is_some_and(Value::is_object);
        if nested {
            role = value.get("role").and_then(Value::as_str).map(str::to_string);
            value = value.get_mut("value").map(Value::take).unwrap_or(Value::Null);
        }

        let value = match value {
            Value::Null => None,
            other => Some(serde_json::from_value(other).map_err(serde::de::Error::custom)?),
        };
        Ok(Record { role, value })
    }
}

impl<T: Serialize> Serialize for Record<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("Record", 2)?;
        state.serialize_field("role", &self.role)?;
        state.serialize_field("value", &self.value)?;
        state.end()
    }
}

/// Display settings stored on a page block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockFormat {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_full_width: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_small_text: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_pointer: Option<CollectionPointer>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionPointer {
    pub id: String,
    #[serde(default, rename = "spaceId", skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
}

/// A block record: a page, a database view, or a content node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Block {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: String,
    /// Raw property key → decoration array.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<BlockFormat>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<String>,
    /// Milliseconds since the Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_edited_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_table: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub view_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Block {
    pub fn is_database(&self) -> bool {
        DATABASE_BLOCK_TYPES.contains(&self.block_type.as_str())
    }

    /// The collection a database block points at, old or new layout.
    pub fn collection_id(&self) -> Option<&str> {
        self.collection_id.as_deref().or_else(|| {
            self.format
                .as_ref()
                .and_then(|f| f.collection_pointer.as_ref())
                .map(|p| p.id.as_str())
        })
    }
}

/// A database: its name and column schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Collection {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    pub schema: Schema,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionView {
    pub id: String,
    #[serde(rename = "type")]
    pub view_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Block ids under a reducer result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupResults {
    #[serde(rename = "blockIds")]
    pub block_ids: Vec<String>,
    #[serde(rename = "hasMore", skip_serializing_if = "Option::is_none")]
    pub has_more: Option<bool>,
}

/// One view's query results, in either the legacy or the reducer layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionQueryResult {
    #[serde(rename = "blockIds", skip_serializing_if = "Option::is_none")]
    pub block_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_group_results: Option<GroupResults>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotionUser {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
}

pub type BlockMap = HashMap<String, Record<Block>>;

/// The vendor's graph-shaped container for a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordMap {
    pub block: BlockMap,
    pub collection: IndexMap<String, Record<Collection>>,
    pub collection_view: HashMap<String, Record<CollectionView>>,
    /// collection id → view id → results.
    pub collection_query: IndexMap<String, IndexMap<String, CollectionQueryResult>>,
    pub notion_user: HashMap<String, Record<NotionUser>>,
}

impl RecordMap {
    /// Folds another record map into this one; later records win.
    pub fn merge(&mut self, other: RecordMap) {
        self.block.extend(other.block);
        self.collection.extend(other.collection);
        self.collection_view.extend(other.collection_view);
        for (collection_id, views) in other.collection_query {
            self.collection_query
                .entry(collection_id)
                .or_default()
                .extend(views);
        }
        self.notion_user.extend(other.notion_user);
    }

    pub fn block(&self, id: &str) -> Option<&Block> {
        self.block.get(id).and_then(|r| r.value.as_ref())
    }

    pub fn user(&self, id: &str) -> Option<&NotionUser> {
        self.notion_user.get(id).and_then(|r| r.value.as_ref())
    }

    /// The first collection in response order.
    pub fn first_collection(&self) -> Option<&Collection> {
        self.collection.values().next().and_then(|r| r.value.as_ref())
    }

    /// Database blocks in the map with their collection and view ids.
    pub fn database_views(&self) -> Vec<(String, Vec<String>)> {
        let mut views: Vec<(String, Vec<String>)> = Vec::new();
        for block in self.block.values().filter_map(|r| r.value.as_ref()) {
            if !block.is_database() {
                continue;
            }
            if let Some(collection_id) = block.collection_id() {
                views.push((collection_id.to_string(), block.view_ids.clone()));
            }
        }
        views.sort();
        views
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_accepts_flat_and_nested_shapes() {
        let flat: Record<Block> = serde_json::from_value(json!({
            "role": "reader",
            "value": { "id": "b1", "type": "page" }
        }))
        .unwrap();
        assert_eq!(flat.value.unwrap().id, "b1");

        let nested: Record<Block> = serde_json::from_value(json!({
            "spaceId": "s1",
            "value": { "role": "editor", "value": { "id": "b2", "type": "page" } }
        }))
        .unwrap();
        assert_eq!(nested.role.as_deref(), Some("editor"));
        assert_eq!(nested.value.unwrap().id, "b2");
    }

    #[test]
    fn record_without_value_is_none() {
        let record: Record<Block> = serde_json::from_value(json!({ "role": "none" })).unwrap();
        assert!(record.value.is_none());
    }

    #[test]
    fn block_keeps_unknown_fields() {
        let block: Block = serde_json::from_value(json!({
            "id": "b1",
            "type": "page",
            "version": 42,
            "alive": true
        }))
        .unwrap();
        assert_eq!(block.extra.get("version"), Some(&json!(42)));
        let back = serde_json::to_value(&block).unwrap();
        assert_eq!(back["alive"], json!(true));
    }

    #[test]
    fn collection_id_from_pointer() {
        let block: Block = serde_json::from_value(json!({
            "id": "b1",
            "type": "collection_view",
            "format": { "collection_pointer": { "id": "c1", "spaceId": "s1" } }
        }))
        .unwrap();
        assert!(block.is_database());
        assert_eq!(block.collection_id(), Some("c1"));
    }

    #[test]
    fn merge_combines_query_views() {
        let mut left: RecordMap = serde_json::from_value(json!({
            "collection_query": { "c1": { "v1": { "blockIds": ["a"] } } }
        }))
        .unwrap();
        let right: RecordMap = serde_json::from_value(json!({
            "collection_query": { "c1": { "v2": { "blockIds": ["b"] } } },
            "block": { "a": { "value": { "id": "a", "type": "page" } } }
        }))
        .unwrap();
        left.merge(right);
        assert_eq!(left.collection_query["c1"].len(), 2);
        assert!(left.block("a").is_some());
    }
}
