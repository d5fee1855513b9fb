//! Working-set narrowing: spreadsheet preference and bounded truncation.

use std::cmp::Reverse;

use crate::models::FileEntry;

/// Extensions treated as the spreadsheet family, lowercase with leading dot.
pub const SPREADSHEET_EXTS: &[&str] = &[".xlsx", ".xls", ".xlsm", ".xlsb", ".xltx", ".xltm", ".csv"];

pub fn is_spreadsheet(entry: &FileEntry) -> bool {
    let name = entry.name.to_lowercase();
    let path = entry.path.to_lowercase();
    if SPREADSHEET_EXTS
        .iter()
        .any(|ext| name.ends_with(*ext) || path.ends_with(*ext))
    {
        return true;
    }

    entry.ext.as_deref().is_some_and(|ext| {
        let ext = ext.trim().to_lowercase();
        let bare = ext.trim_start_matches('.');
        SPREADSHEET_EXTS.iter().any(|known| &known[1..] == bare)
    })
}

/// Keep only spreadsheet entries when at least one exists; otherwise return
/// the input unchanged.
pub fn prefer_spreadsheets(entries: Vec<FileEntry>) -> Vec<FileEntry> {
    if !entries.iter().any(is_spreadsheet) {
        return entries;
    }
    entries.into_iter().filter(is_spreadsheet).collect()
}

/// Cap the working set at `limit`, preferring entries that carry a recency
/// field, then entries with a path. The sort is stable, so equal-priority
/// entries keep their upload order.
pub fn truncate_for_prompt(mut entries: Vec<FileEntry>, limit: usize) -> Vec<FileEntry> {
    if entries.len() <= limit {
        return entries;
    }
    entries.sort_by_key(|e| Reverse((e.has_recency(), e.has_path())));
    entries.truncate(limit);
    entries
}
