//! Notion's record map as seen by the post pipeline.
//!
//! The wire shape is loosely typed; these types pin down the parts the
//! pipeline reads and keep the rest as raw JSON.

pub mod decoration;
mod record_map;
mod schema;

pub use record_map::{
    Block, BlockFormat, BlockMap, Collection, CollectionPointer, CollectionQueryResult,
    CollectionView, GroupResults, NotionUser, Record, RecordMap, DATABASE_BLOCK_TYPES,
};
pub use schema::{PropertyKind, Schema, SchemaProperty};
