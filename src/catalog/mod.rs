//! Candidate preparation: raw upload items in, a bounded prompt-ready list out.
//!
//! The steps always run in this order:
//! 1. [`normalize`] resolves field aliases and drops malformed items
//! 2. [`select::prefer_spreadsheets`] narrows to spreadsheet-family files when any exist
//! 3. [`select::truncate_for_prompt`] caps the list, preferring recency-tagged entries

pub mod normalize;
pub mod select;

use serde_json::Value;

use crate::models::FileEntry;

pub use normalize::normalize;

/// Run the full preparation pipeline. Never fails; the result may be empty.
pub fn prepare_candidates(items: &[Value], limit: usize) -> Vec<FileEntry> {
    let entries = normalize(items);
    let entries = select::prefer_spreadsheets(entries);
    select::truncate_for_prompt(entries, limit)
}
