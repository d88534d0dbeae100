//! Gemini `generateContent` binding over HTTPS.
//!
//! The transcript is sent as `contents` records with `user`/`model` roles;
//! every candidate and every part of the reply is preserved so the caller
//! can apply its own first-candidate policy.

use serde_json::{json, Value};

use async_trait::async_trait;

use vesper_core::types::Turn;

use crate::{Candidate, LlmError, LlmReply, LlmTransport};

/// Connection settings for the Gemini transport.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Base URL, e.g. `https://generativelanguage.googleapis.com/v1beta`.
    pub base_url: String,
    /// Model identifier, e.g. `gemini-1.5-flash`.
    pub model: String,
    /// API key passed as a query parameter.
    pub api_key: String,
    /// Optional per-request deadline. `None` means no deadline.
    pub request_timeout: Option<std::time::Duration>,
}

/// LLM transport backed by the Gemini REST API.
pub struct GeminiTransport {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiTransport {
    pub fn new(config: GeminiConfig) -> Result<Self, LlmError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| LlmError::Network(e.to_string()))?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl LlmTransport for GeminiTransport {
    async fn generate(&self, history: &[Turn]) -> Result<LlmReply, LlmError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.config.api_key
        );

        let payload = build_request_body(history);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_status(status.as_u16(), text));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| LlmError::ParseError(e.to_string()))?;

        parse_reply(&data)
    }
}

/// Build the `generateContent` request body from a transcript.
fn build_request_body(history: &[Turn]) -> Value {
    let contents: Vec<Value> = history
        .iter()
        .map(|turn| {
            let parts: Vec<Value> = turn
                .parts
                .iter()
                .map(|text| json!({ "text": text }))
                .collect();
            json!({ "role": turn.role.to_string(), "parts": parts })
        })
        .collect();
    json!({ "contents": contents })
}

/// Map an HTTP status code to a transport error.
fn classify_status(code: u16, body: String) -> LlmError {
    match code {
        400 | 404 => LlmError::InvalidRequest(body),
        401 | 403 => LlmError::AuthenticationFailed(body),
        429 => LlmError::RateLimitExceeded,
        _ => LlmError::ProviderUnavailable(format!("Gemini API error ({}): {}", code, body)),
    }
}

/// Decode a `generateContent` response body into a reply.
///
/// A response with no candidates decodes to an empty reply; deciding what to
/// do about missing content is the session's job.
fn parse_reply(data: &Value) -> Result<LlmReply, LlmError> {
    let Some(raw_candidates) = data.get("candidates").and_then(|c| c.as_array()) else {
        return Ok(LlmReply::default());
    };

    let mut candidates = Vec::with_capacity(raw_candidates.len());
    for raw in raw_candidates {
        let parts = raw
            .get("content")
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.as_array())
            .ok_or_else(|| LlmError::ParseError("No parts in candidate content".to_string()))?;

        let texts: Vec<String> = parts
            .iter()
            .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
            .map(str::to_string)
            .collect();

        candidates.push(Candidate { parts: texts });
    }

    Ok(LlmReply { candidates })
}
