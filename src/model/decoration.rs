// src/model/decoration.rs
//! Readers for Notion's decoration arrays.
//!
//! A property value is a list of `[text, [[format, data], ...]]` runs, for
//! example `[["Hello "], ["world", [["b"]]]]` or, for a date,
//! `[["‣", [["d", {"type": "date", "start_date": "2024-01-02"}]]]]`.

use serde_json::Value;

/// Placeholder text Notion uses for mention-like runs (dates, users, pages).
pub const MENTION_PLACEHOLDER: &str = "‣";

/// Concatenates the text of every run. Non-array input yields "".
pub fn text_content(value: &Value) -> String {
    let Some(runs) = value.as_array() else {
        return String::new();
    };
    runs.iter()
        .filter_map(|run| run.get(0).and_then(Value::as_str))
        .collect()
}

/// Finds the first `d` (date) decoration payload anywhere in the value.
pub fn date_decoration(value: &Value) -> Option<&Value> {
    let items = value.as_array()?;
    if items.first().and_then(Value::as_str) == Some(MENTION_PLACEHOLDER) {
        let formats = items.get(1)?.as_array()?;
        return formats.iter().find_map(|format| {
            let format = format.as_array()?;
            match format.first().and_then(Value::as_str) {
                Some("d") => format.get(1),
                _ => None,
            }
        });
    }
    items.iter().find_map(date_decoration)
}

/// User ids referenced by a person property, in order.
///
/// The value is flattened one level and every `[["u", user_id], ...]`
/// entry contributes its id; text runs such as separators are skipped.
pub fn user_references(value: &Value) -> Vec<String> {
    let Some(runs) = value.as_array() else {
        return Vec::new();
    };
    runs.iter()
        .flat_map(|run| match run.as_array() {
            Some(items) => items.iter().collect::<Vec<_>>(),
            None => vec![run],
        })
        .filter_map(|item| {
            let reference = item.as_array()?.first()?.as_array()?;
            match reference.get(1)? {
                Value::String(id) if !id.is_empty() => Some(id.clone()),
                _ => None,
            }
        })
        .collect()
}

/// The first nested URL token of a file property, `value[0][1][0][1]`.
pub fn first_file_url(value: &Value) -> Option<&str> {
    value.get(0)?.get(1)?.get(0)?.get(1)?.as_str()
}
