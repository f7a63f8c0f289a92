// src/posts/page_ids.rs
use crate::model::RecordMap;
use crate::types::id_to_uuid;
use indexmap::IndexSet;

/// Collects the row ids of the first collection in `record_map`.
///
/// With `view_id` only that view's rows are returned; otherwise the grouped
/// results of every view are merged, deduplicated in first-seen order.
/// Missing views or collections yield an empty list.
pub fn all_page_ids(record_map: &RecordMap, view_id: Option<&str>) -> Vec<String> {
    let Some(views) = record_map.collection_query.values().next() else {
        return Vec::new();
    };

    if let Some(view_id) = view_id {
        let Some(view) = views.get(&id_to_uuid(view_id)).or_else(|| views.get(view_id)) else {
            return Vec::new();
        };
        return view
            .block_ids
            .clone()
            .or_else(|| {
                view.collection_group_results
                    .as_ref()
                    .map(|group| group.block_ids.clone())
            })
            .unwrap_or_default();
    }

    let mut page_ids = IndexSet::new();
    for view in views.values() {
        if let Some(group) = &view.collection_group_results {
            page_ids.extend(group.block_ids.iter().cloned());
        }
    }
    page_ids.into_iter().collect()
}
