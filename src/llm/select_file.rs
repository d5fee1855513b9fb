use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::prepare_candidates;
use crate::config::LlmConfig;
use crate::llm::prompt::build_messages;
use crate::models::{ChatMessage, SelectionRequest};

/// Longest slice of a backend body quoted back in an error message.
const MAX_ERROR_BODY_CHARS: usize = 2000;

/// Prepare the candidates from `raw_items`, ask the backend to pick the best
/// match for `prompt`, and return its trimmed answer verbatim.
///
/// The answer is best-effort text: one path, or up to three, one per line.
/// It is not checked against the candidate list. Failures are not retried.
pub async fn select_file(
    client: &reqwest::Client,
    config: &LlmConfig,
    prompt: &str,
    raw_items: &[Value],
    max_candidates: usize,
) -> Result<String> {
    let candidates = prepare_candidates(raw_items, max_candidates);
    tracing::debug!(
        raw = raw_items.len(),
        prepared = candidates.len(),
        "Prepared selection candidates"
    );

    let request = SelectionRequest::new(prompt, candidates);
    dispatch(client, config, &request).await
}

/// Send a built request to the configured provider.
pub async fn dispatch(
    client: &reqwest::Client,
    config: &LlmConfig,
    request: &SelectionRequest,
) -> Result<String> {
    let messages = build_messages(request);

    let answer = match config.provider.as_str() {
        "openai" => call_openai(client, config, messages).await?,
        "ollama" => call_ollama(client, config, messages).await?,
        other => anyhow::bail!("Unknown LLM provider: {other}"),
    };

    Ok(answer.trim().to_string())
}

/// Turn a transport error into a message that names timeouts explicitly.
fn transport_error(e: reqwest::Error, config: &LlmConfig, what: &str) -> anyhow::Error {
    if e.is_timeout() {
        anyhow::anyhow!("{what} timed out after {}s", config.timeout_secs)
    } else {
        anyhow::Error::new(e).context(format!("Failed to call {what}"))
    }
}

fn truncate_to_char_boundary(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// ─── OpenAI-compatible ───────────────────────────────────

#[derive(Serialize)]
struct OpenAiChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Deserialize)]
struct OpenAiResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

async fn call_openai(
    client: &reqwest::Client,
    config: &LlmConfig,
    messages: Vec<ChatMessage>,
) -> Result<String> {
    let url = format!("{}/v1/chat/completions", config.base_url.trim_end_matches('/'));
    let api_key = config.api_key.as_deref().unwrap_or_default();

    let req = OpenAiChatRequest {
        model: config.chat_model.clone(),
        messages,
        temperature: 0.0,
        max_tokens: config.max_tokens,
    };

    let resp = client
        .post(&url)
        .timeout(config.timeout())
        .header("Authorization", format!("Bearer {api_key}"))
        .json(&req)
        .send()
        .await
        .map_err(|e| transport_error(e, config, "OpenAI chat API"))?;

    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| transport_error(e, config, "OpenAI chat API"))?;

    if !status.is_success() {
        anyhow::bail!(
            "OpenAI chat API returned {status}: {}",
            truncate_to_char_boundary(&body, MAX_ERROR_BODY_CHARS)
        );
    }

    parse_openai_answer(&body)
}

fn parse_openai_answer(body: &str) -> Result<String> {
    let parsed: OpenAiChatResponse = serde_json::from_str(body).with_context(|| {
        format!(
            "Unexpected OpenAI response schema; body={}",
            truncate_to_char_boundary(body, MAX_ERROR_BODY_CHARS)
        )
    })?;

    let choice = parsed.choices.into_iter().next().with_context(|| {
        format!(
            "OpenAI response contained no choices; body={}",
            truncate_to_char_boundary(body, MAX_ERROR_BODY_CHARS)
        )
    })?;

    Ok(choice.message.content.unwrap_or_default())
}

// ─── Ollama ──────────────────────────────────────────────

#[derive(Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: ChatMessage,
}

async fn call_ollama(
    client: &reqwest::Client,
    config: &LlmConfig,
    messages: Vec<ChatMessage>,
) -> Result<String> {
    let url = format!("{}/api/chat", config.base_url.trim_end_matches('/'));

    let req = OllamaChatRequest {
        model: config.chat_model.clone(),
        messages,
        stream: false,
        options: OllamaOptions {
            temperature: 0.0,
            num_predict: config.max_tokens,
        },
    };

    let resp = client
        .post(&url)
        .timeout(config.timeout())
        .json(&req)
        .send()
        .await
        .map_err(|e| transport_error(e, config, "Ollama chat API"))?;

    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| transport_error(e, config, "Ollama chat API"))?;

    if !status.is_success() {
        anyhow::bail!(
            "Ollama chat API returned {status}: {}",
            truncate_to_char_boundary(&body, MAX_ERROR_BODY_CHARS)
        );
    }

    parse_ollama_answer(&body)
}

fn parse_ollama_answer(body: &str) -> Result<String> {
    let parsed: OllamaChatResponse = serde_json::from_str(body).with_context(|| {
        format!(
            "Unexpected Ollama response schema; body={}",
            truncate_to_char_boundary(body, MAX_ERROR_BODY_CHARS)
        )
    })?;
    Ok(parsed.message.content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_answer_extracted() {
        let body = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"D:/fin/budget.xlsx\n"}}]}"#;
        assert_eq!(parse_openai_answer(body).unwrap(), "D:/fin/budget.xlsx\n");
    }

    #[test]
    fn test_openai_null_content_is_empty() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        assert_eq!(parse_openai_answer(body).unwrap(), "");
    }

    #[test]
    fn test_openai_no_choices_is_error() {
        let err = parse_openai_answer(r#"{"choices":[]}"#).unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }

    #[test]
    fn test_openai_missing_choices_key_is_error() {
        let err = parse_openai_answer(r#"{"error":{"message":"bad key"}}"#).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("Unexpected OpenAI response schema"));
        assert!(msg.contains("bad key"));
    }

    #[test]
    fn test_openai_non_json_is_error() {
        assert!(parse_openai_answer("<html>502</html>").is_err());
    }

    #[test]
    fn test_ollama_answer_extracted() {
        let body = r#"{"model":"llama3.2","message":{"role":"assistant","content":"/a.csv"},"done":true}"#;
        assert_eq!(parse_ollama_answer(body).unwrap(), "/a.csv");
    }

    #[test]
    fn test_ollama_missing_message_is_error() {
        assert!(parse_ollama_answer(r#"{"done":true}"#).is_err());
    }

    #[test]
    fn test_truncate_to_char_boundary_is_unicode_safe() {
        let s = "ファイル選択";
        assert_eq!(truncate_to_char_boundary(s, 3), "ファイ");
        assert_eq!(truncate_to_char_boundary(s, 100), s);
    }

    #[test]
    fn test_openai_request_is_deterministic() {
        let req = OpenAiChatRequest {
            model: "gpt-4o-mini".into(),
            messages: vec![],
            temperature: 0.0,
            max_tokens: 200,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["temperature"], 0.0);
        assert_eq!(json["max_tokens"], 200);
    }

    #[tokio::test]
    async fn test_unknown_provider_fails_before_network() {
        let client = reqwest::Client::new();
        let config = LlmConfig {
            provider: "bard".into(),
            ..LlmConfig::default()
        };
        let req = SelectionRequest::new("q", vec![]);
        let err = dispatch(&client, &config, &req).await.unwrap_err();
        assert_eq!(err.to_string(), "Unknown LLM provider: bard");
    }
}
