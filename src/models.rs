use std::fmt;

use serde::{Deserialize, Serialize};

/// A catalog entry after alias resolution. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub path: String,
    pub ext: Option<String>,
    pub last_opened: Option<Stamp>,
    pub last_modified: Option<Stamp>,
    pub app_hint: Option<String>,
}

impl FileEntry {
    /// Entry for a bare string item: the string is both name and path.
    pub fn from_path(path: &str) -> Self {
        Self {
            name: path.to_string(),
            path: path.to_string(),
            ext: None,
            last_opened: None,
            last_modified: None,
            app_hint: None,
        }
    }

    pub fn has_recency(&self) -> bool {
        self.last_opened.is_some() || self.last_modified.is_some()
    }

    pub fn has_path(&self) -> bool {
        !self.path.is_empty()
    }
}

/// A recency value as uploaded: either an epoch number or free text
/// (typically an ISO-8601 local time). Rendered verbatim into prompts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Stamp {
    Epoch(serde_json::Number),
    Text(String),
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stamp::Epoch(n) => write!(f, "{n}"),
            Stamp::Text(s) => f.write_str(s),
        }
    }
}

/// The query plus the prepared, ordered candidates sent to the backend.
#[derive(Debug, Clone)]
pub struct SelectionRequest {
    query: String,
    candidates: Vec<FileEntry>,
}

impl SelectionRequest {
    pub fn new(query: &str, candidates: Vec<FileEntry>) -> Self {
        Self {
            query: query.trim().to_string(),
            candidates,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn candidates(&self) -> &[FileEntry] {
        &self.candidates
    }
}

/// Chat message sent to the completion backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamp_renders_number_and_text_verbatim() {
        let epoch: Stamp = serde_json::from_value(serde_json::json!(1717000000)).unwrap();
        assert_eq!(epoch.to_string(), "1717000000");

        let text: Stamp = serde_json::from_value(serde_json::json!("2024-05-29T10:00:00")).unwrap();
        assert_eq!(text.to_string(), "2024-05-29T10:00:00");
    }

    #[test]
    fn test_selection_request_trims_query() {
        let req = SelectionRequest::new("  where is the budget?\n", vec![]);
        assert_eq!(req.query(), "where is the budget?");
        assert!(req.candidates().is_empty());
    }

    #[test]
    fn test_bare_entry_has_path_but_no_recency() {
        let e = FileEntry::from_path("C:/docs/a.csv");
        assert_eq!(e.name, "C:/docs/a.csv");
        assert!(e.has_path());
        assert!(!e.has_recency());
    }
}
