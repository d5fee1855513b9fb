use std::net::SocketAddr;

use axum::extract::multipart::Field;
use axum::extract::{ConnectInfo, FromRequest, Multipart, Request, State};
use serde_json::Value;

use crate::api::client_ip::resolve_client_ip;
use crate::api::error::ApiError;
use crate::llm::select_file;
use crate::state::AppState;

pub const JSON_FILE_FIELD: &str = "json_file";
pub const PROMPT_FIELD: &str = "prompt";

/// Cap on the `prompt` field, independent of the catalog upload cap.
pub const MAX_PROMPT_BYTES: usize = 16 * 1024;

/// POST /search-file - pick the catalog entry that best matches the prompt:
///   1. Resolve client identity and apply the sliding-window limit
///   2. Read the multipart upload, rejecting oversize fields early
///   3. Decode the catalog (bare list or `{"files": [...]}`)
///   4. Prepare candidates and ask the completion backend
///
/// The response body is the backend's trimmed answer as plain text.
pub async fn search_file(
    State(state): State<AppState>,
    request: Request,
) -> Result<String, ApiError> {
    // Absent when the router is served without connect info.
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let client_ip = resolve_client_ip(request.headers(), peer);

    if !state.limiter.allow(&client_ip) {
        tracing::warn!(%client_ip, "Rate limit exceeded");
        return Err(ApiError::RateLimited {
            max_requests: state.limiter.max_requests(),
            window_secs: state.limiter.window().as_secs(),
        });
    }

    let multipart = Multipart::from_request(request, &state)
        .await
        .inspect_err(|e| tracing::warn!(%client_ip, "Rejected request: {}", e.body_text()))?;

    let upload = read_upload(multipart, state.config.max_upload_bytes)
        .await
        .inspect_err(|e| tracing::warn!(%client_ip, "Rejected upload: {e}"))?;

    let items = decode_catalog(&upload.json_file)
        .inspect_err(|e| tracing::warn!(%client_ip, "Rejected catalog: {e}"))?;

    let answer = select_file(
        &state.http_client,
        &state.config.llm,
        &upload.prompt,
        &items,
        state.config.max_candidates,
    )
    .await
    .map_err(|e| {
        tracing::error!(%client_ip, "LLM selection failed: {e:#}");
        ApiError::Selection(e)
    })?;

    tracing::info!(
        %client_ip,
        catalog_items = items.len(),
        answer_lines = answer.lines().count(),
        "File selected"
    );

    Ok(answer)
}

struct Upload {
    json_file: Vec<u8>,
    prompt: String,
}

async fn read_upload(mut multipart: Multipart, max_bytes: usize) -> Result<Upload, ApiError> {
    let mut json_file = None;
    let mut prompt = None;

    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(JSON_FILE_FIELD) => {
                let bytes = read_limited(&mut field, max_bytes)
                    .await?
                    .ok_or(ApiError::PayloadTooLarge { max_bytes })?;
                json_file = Some(bytes);
            }
            Some(PROMPT_FIELD) => {
                let bytes = read_limited(&mut field, MAX_PROMPT_BYTES)
                    .await?
                    .ok_or(ApiError::PromptTooLarge {
                        max_bytes: MAX_PROMPT_BYTES,
                    })?;
                prompt = Some(String::from_utf8(bytes).map_err(|_| ApiError::InvalidPrompt)?);
            }
            _ => {}
        }
    }

    Ok(Upload {
        json_file: json_file.ok_or(ApiError::MissingField(JSON_FILE_FIELD))?,
        prompt: prompt.ok_or(ApiError::MissingField(PROMPT_FIELD))?,
    })
}

/// Buffer a field, stopping as soon as it grows past `max_bytes`.
/// Returns `None` when the cap was exceeded.
async fn read_limited(field: &mut Field<'_>, max_bytes: usize) -> Result<Option<Vec<u8>>, ApiError> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.chunk().await? {
        if buf.len() + chunk.len() > max_bytes {
            return Ok(None);
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(Some(buf))
}

/// Parse the uploaded catalog into its list of raw items.
///
/// Accepts a bare JSON array or an object whose `files` key holds one.
/// Anything else is a shape error; individual items are not checked here.
pub fn decode_catalog(bytes: &[u8]) -> Result<Vec<Value>, ApiError> {
    let payload: Value = serde_json::from_slice(bytes)?;

    let items = match payload {
        Value::Object(mut map) => map.remove("files").ok_or(ApiError::InvalidShape)?,
        other => other,
    };

    match items {
        Value::Array(items) => Ok(items),
        _ => Err(ApiError::InvalidShape),
    }
}
