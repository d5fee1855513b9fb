//! Alias resolution from loosely-shaped upload items to [`FileEntry`].
//!
//! Uploaded catalogs come from different producers that spell the same field
//! differently. Each canonical field is resolved once, here, from the first
//! alias that carries a usable value; nothing downstream looks at raw keys.

use serde_json::{Map, Number, Value};

use crate::models::{FileEntry, Stamp};

const NAME_KEYS: &[&str] = &["name", "file_name", "path"];
const PATH_KEYS: &[&str] = &["path", "fullpath", "name"];
const EXT_KEYS: &[&str] = &["ext", "extension"];
const LAST_OPENED_KEYS: &[&str] = &["last_opened", "last_accessed"];
const LAST_MODIFIED_KEYS: &[&str] = &["last_modified"];
const APP_HINT_KEYS: &[&str] = &["app_hint"];

/// Normalize every item, silently dropping the ones that are neither a
/// string nor an object, or that resolve to no name and no path.
pub fn normalize(items: &[Value]) -> Vec<FileEntry> {
    items.iter().filter_map(normalize_item).collect()
}

fn normalize_item(item: &Value) -> Option<FileEntry> {
    match item {
        Value::String(s) if !s.is_empty() => Some(FileEntry::from_path(s)),
        Value::Object(record) => normalize_record(record),
        _ => None,
    }
}

fn normalize_record(record: &Map<String, Value>) -> Option<FileEntry> {
    let name = first_text(record, NAME_KEYS);
    let path = first_text(record, PATH_KEYS);
    if name.is_none() && path.is_none() {
        return None;
    }

    Some(FileEntry {
        name: name.unwrap_or_default(),
        path: path.unwrap_or_default(),
        ext: first_text(record, EXT_KEYS),
        last_opened: first_stamp(record, LAST_OPENED_KEYS),
        last_modified: first_stamp(record, LAST_MODIFIED_KEYS),
        app_hint: first_text(record, APP_HINT_KEYS),
    })
}

/// First alias holding a non-empty string or a non-zero number, as text.
fn first_text(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match record.get(*k)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if !is_zero(n) => Some(n.to_string()),
        _ => None,
    })
}

fn first_stamp(record: &Map<String, Value>, keys: &[&str]) -> Option<Stamp> {
    keys.iter().find_map(|k| match record.get(*k)? {
        Value::String(s) if !s.is_empty() => Some(Stamp::Text(s.clone())),
        Value::Number(n) if !is_zero(n) => Some(Stamp::Epoch(n.clone())),
        _ => None,
    })
}

/// Producers write `0` for "never"; it carries no value.
fn is_zero(n: &Number) -> bool {
    n.as_f64() == Some(0.0)
}
