use crate::models::{ChatMessage, FileEntry, SelectionRequest};

/// Fixed instructions for the selector role.
pub const SYSTEM_PROMPT: &str = "You are a precise file selector.\n\
     Given a user query and a set of candidate files (each with name, path, and possible metadata),\n\
     choose the SINGLE best-matching file for the user's intent.\n\
     Prioritize: (1) recency fields such as last_opened/last_modified if available,\n\
     (2) exact app/type match, and (3) name/path keyword match.\n\
     If no clear single best, return the best 3, one per line, most likely first.\n\
     Output ONLY the file path(s) (no extra words).";

const CATALOG_HEADER: &str = "Candidates (index|name|path|ext|last_opened|last_modified|app_hint):";
const CLOSING_INSTRUCTION: &str = "Return ONLY the winning file path(s). If multiple, one per line.";

/// One pipe-delimited line per candidate, tagged with its zero-based index.
/// Missing fields render as empty strings.
pub fn render_catalog(candidates: &[FileEntry]) -> String {
    candidates
        .iter()
        .enumerate()
        .map(|(i, e)| render_line(i, e))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_line(index: usize, e: &FileEntry) -> String {
    format!(
        "{index}|name={}|path={}|ext={}|last_opened={}|last_modified={}|app_hint={}",
        e.name,
        e.path,
        e.ext.as_deref().unwrap_or_default(),
        e.last_opened.as_ref().map(|s| s.to_string()).unwrap_or_default(),
        e.last_modified.as_ref().map(|s| s.to_string()).unwrap_or_default(),
        e.app_hint.as_deref().unwrap_or_default(),
    )
}

pub fn build_user_message(request: &SelectionRequest) -> String {
    format!(
        "User query: {}\n\n{CATALOG_HEADER}\n{}\n\n{CLOSING_INSTRUCTION}",
        request.query(),
        render_catalog(request.candidates()),
    )
}

pub fn build_messages(request: &SelectionRequest) -> Vec<ChatMessage> {
    vec![
        ChatMessage {
            role: "system".to_string(),
            content: SYSTEM_PROMPT.to_string(),
        },
        ChatMessage {
            role: "user".to_string(),
            content: build_user_message(request),
        },
    ]
}
