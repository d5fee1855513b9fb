//! # file-selector
//!
//! An HTTP service that takes a natural-language query plus an uploaded
//! catalog of file metadata, and answers with the path(s) an LLM judges to
//! be the best match.
//!
//! ## Request pipeline
//!
//! ```text
//!        POST /search-file (multipart: json_file + prompt)
//!                          │
//!                          ▼
//!              ┌───────────────────────┐
//!              │ Client identity       │  cf-connecting-ip → true-client-ip
//!              │                       │  → x-forwarded-for[0] → peer
//!              └───────────┬───────────┘
//!                          ▼
//!              ┌───────────────────────┐
//!              │ Sliding-window limit  │  reject → 429
//!              └───────────┬───────────┘
//!                          ▼
//!              ┌───────────────────────┐
//!              │ Upload + JSON decode  │  too big → 413, bad shape → 400
//!              └───────────┬───────────┘
//!                          ▼
//!              ┌───────────────────────┐
//!              │ Normalize aliases     │  malformed items dropped
//!              │ Prefer spreadsheets   │
//!              │ Truncate to limit     │  recency-tagged entries first
//!              └───────────┬───────────┘
//!                          ▼
//!              ┌───────────────────────┐
//!              │ Prompt + LLM call     │  temperature 0, timeout → 500
//!              └───────────┬───────────┘
//!                          ▼
//!                 trimmed text answer
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for server, limits, and LLM settings
//! - [`models`] - `FileEntry`, `Stamp`, `SelectionRequest`, chat message types
//! - [`rate_limit`] - Sharded in-memory sliding-window limiter
//! - [`catalog`] - Alias normalization, spreadsheet prefilter, bounded truncation
//! - [`llm::prompt`] - Deterministic catalog rendering and instructions
//! - [`llm::select_file`] - Completion call against OpenAI-compatible or Ollama backends
//! - [`api`] - Axum router, `/search-file` handler, client identity, error mapping
//! - [`state`] - Shared application state

pub mod api;
pub mod catalog;
pub mod config;
pub mod llm;
pub mod models;
pub mod rate_limit;
pub mod state;
