// src/posts/metadata.rs
use crate::model::Block;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Page-level settings and timestamps of a block.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageMetadata {
    pub locked: Option<bool>,
    pub page_full_width: Option<bool>,
    pub page_font: Option<String>,
    pub page_small_text: Option<bool>,
    pub created_time: Option<DateTime<Utc>>,
    pub last_edited_time: Option<DateTime<Utc>>,
}

impl PageMetadata {
    pub fn from_block(block: &Block) -> Self {
        let format = block.format.as_ref();
        Self {
            locked: format.and_then(|f| f.block_locked),
            page_full_width: format.and_then(|f| f.page_full_width),
            page_font: format.and_then(|f| f.page_font.clone()),
            page_small_text: format.and_then(|f| f.page_small_text),
            created_time: block.created_time.and_then(DateTime::from_timestamp_millis),
            last_edited_time: block
                .last_edited_time
                .and_then(DateTime::from_timestamp_millis),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_format_and_timestamps() {
        let block: Block = serde_json::from_value(json!({
            "id": "b1",
            "type": "page",
            "created_time": 1_700_000_000_000_i64,
            "format": { "page_full_width": true, "page_font": "serif", "block_locked": false }
        }))
        .unwrap();
        let meta = PageMetadata::from_block(&block);
        assert_eq!(meta.page_full_width, Some(true));
        assert_eq!(meta.page_font.as_deref(), Some("serif"));
        assert_eq!(meta.locked, Some(false));
        assert_eq!(meta.page_small_text, None);
        assert_eq!(meta.created_time.unwrap().timestamp(), 1_700_000_000);
        assert!(meta.last_edited_time.is_none());
    }
}
