//! Gemini generateContent API client
//!
//! Implements the GenClient trait against Google's Generative Language REST
//! API. Each request renders the system prompt for its kind, posts a single
//! generateContent call, and parses the returned text as JSON where possible.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::LlmConfig;
use crate::prompts;

use super::{GenClient, GenError, GenerateRequest};

/// Maximum number of retries for transient errors
const MAX_RETRIES: u32 = 3;

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
}

/// Gemini API client
pub struct GeminiClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
}

impl GeminiClient {
    /// Create a new client from configuration.
    ///
    /// Reads the API key from the environment variable named in the config.
    pub fn from_config(config: &LlmConfig) -> Result<Self, GenError> {
        let api_key = config
            .get_api_key()
            .map_err(|e| GenError::InvalidResponse(e.to_string()))?;

        let timeout = Duration::from_millis(config.timeout_ms);
        let http = Client::builder().timeout(timeout).build().map_err(GenError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.clone(),
            http,
        })
    }

    /// Build the generateContent request body.
    fn build_request_body(&self, request: &GenerateRequest) -> serde_json::Value {
        let system = prompts::system_prompt(request.kind);
        serde_json::json!({
            "contents": [{
                "parts": [
                    { "text": system },
                    { "text": format!("User input: {}", request.prompt) },
                ],
            }],
        })
    }

    async fn post_once(&self, body: &serde_json::Value) -> Result<String, GenError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(GenError::Network)?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenError::ApiError { status, message });
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(GenError::Network)?;
        parsed
            .first_text()
            .ok_or_else(|| GenError::InvalidResponse("no candidate text in response".to_string()))
    }
}

#[async_trait]
impl GenClient for GeminiClient {
    async fn generate(&self, request: GenerateRequest) -> Result<serde_json::Value, GenError> {
        debug!(kind = request.kind.as_str(), "GeminiClient::generate: called");
        let body = self.build_request_body(&request);

        let mut backoff = Duration::from_millis(INITIAL_BACKOFF_MS);
        let mut attempt = 0;
        let text = loop {
            match self.post_once(&body).await {
                Ok(text) => break text,
                Err(err) => {
                    let transient = match &err {
                        GenError::ApiError { status, .. } => is_retryable_status(*status),
                        GenError::Network(_) => true,
                        _ => false,
                    };
                    if !transient || attempt >= MAX_RETRIES {
                        return Err(err);
                    }
                    attempt += 1;
                    warn!(%err, attempt, "GeminiClient::generate: transient error, retrying");
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
            }
        };

        // The model answers JSON for plan requests and prose for chat; parse
        // when possible, wrap otherwise.
        Ok(parse_reply_text(&text))
    }
}

/// Parse the model's text reply: JSON object when it is one (with optional
/// markdown code fences), otherwise wrapped as `{"response": text}`.
pub(super) fn parse_reply_text(text: &str) -> serde_json::Value {
    let stripped = strip_code_fence(text);
    match serde_json::from_str(stripped) {
        Ok(value) => value,
        Err(_) => serde_json::json!({ "response": text.trim() }),
    }
}

/// Remove a surrounding markdown code fence, if any.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// The first text part of the first candidate, if present.
    fn first_text(&self) -> Option<String> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .find_map(|p| p.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_text_walks_candidates() {
        let raw = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "hello" }] },
            }],
        });
        let parsed: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.first_text().as_deref(), Some("hello"));

        let empty: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.first_text(), None);
    }

    #[test]
    fn test_parse_reply_text_json() {
        let value = parse_reply_text(r#"{"projectIdea": "x"}"#);
        assert_eq!(value["projectIdea"], "x");
    }

    #[test]
    fn test_parse_reply_text_fenced_json() {
        let value = parse_reply_text("```json\n{\"a\": 1}\n```");
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_parse_reply_text_prose_wraps() {
        let value = parse_reply_text("  Just use a queue.  ");
        assert_eq!(value["response"], "Just use a queue.");
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable_status(429));
        assert!(is_retryable_status(503));
        assert!(!is_retryable_status(400));
        assert!(!is_retryable_status(404));
    }
}
