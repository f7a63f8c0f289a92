// src/model/schema.rs
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Column types of a collection schema.
///
/// Only the types the post pipeline treats specially get their own meaning;
/// everything else is read as plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Title,
    Text,
    Number,
    Checkbox,
    Url,
    Email,
    PhoneNumber,
    File,
    Date,
    Select,
    MultiSelect,
    Person,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaProperty {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PropertyKind,
}

/// Raw property key → column definition.
pub type Schema = IndexMap<String, SchemaProperty>;
