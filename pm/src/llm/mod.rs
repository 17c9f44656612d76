//! Generation collaborator for planmap
//!
//! Everything the core knows about text generation lives behind the
//! [`GenClient`] trait: one opaque request/response call. The helpers here
//! apply the recovery rules on top: malformed plan payloads are default-
//! filled, a missing chat string gets a fixed fallback line, and outright
//! failure is reported to the caller so it can substitute the demo plan.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod gemini;
mod types;

pub use client::GenClient;
pub use error::GenError;
pub use gemini::GeminiClient;
pub use types::{GenerateRequest, RequestKind};

use crate::config::LlmConfig;
use crate::domain::ProjectPlan;
use crate::prompts;

/// Create a generation client for the provider named in the config.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn GenClient>, GenError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "gemini" => Ok(Arc::new(GeminiClient::from_config(config)?)),
        other => Err(GenError::InvalidResponse(format!(
            "Unknown generation provider: '{}'. Supported: gemini",
            other
        ))),
    }
}

/// Request a full project plan for `prompt`.
///
/// A successful response is default-filled into a valid plan regardless of
/// which fields the model produced. Transport or provider failure is
/// returned so the caller can fall back to [`ProjectPlan::demo`] and show a
/// transient notice.
pub async fn request_plan(client: &Arc<dyn GenClient>, prompt: &str) -> Result<ProjectPlan, GenError> {
    let request = GenerateRequest::new(RequestKind::ProjectIdea, prompt)?;
    let value = client.generate(request).await?;
    Ok(ProjectPlan::from_generated(prompt, &value))
}

/// Request a conversational reply for the sidebar chat.
///
/// Never fails: a response without a usable string gets the fixed
/// acknowledgement line, and an error gets the fixed apology line.
pub async fn request_chat(client: &Arc<dyn GenClient>, input: &str) -> String {
    let prompt = prompts::chat_prompt(input);
    let request = match GenerateRequest::new(RequestKind::Chat, prompt) {
        Ok(request) => request,
        Err(_) => return chat_error_line(),
    };
    match client.generate(request).await {
        Ok(value) => value
            .get("response")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| chat_ack_line(input)),
        Err(err) => {
            debug!(%err, "request_chat: generation failed");
            chat_error_line()
        }
    }
}

fn chat_ack_line(input: &str) -> String {
    format!(
        "Got it! \"{input}\" sounds interesting. Enter your idea in the prompt \
         box so I can create a complete project analysis with a mind map and \
         roadmap for you!"
    )
}

fn chat_error_line() -> String {
    "Sorry, there was an error. Please try again!".to_string()
}

#[cfg(test)]
mod tests {
    use super::client::mock::MockGenClient;
    use super::*;
    use serde_json::json;

    fn arc(mock: MockGenClient) -> Arc<dyn GenClient> {
        Arc::new(mock)
    }

    #[tokio::test]
    async fn test_request_plan_default_fills_sparse_payload() {
        let client = arc(MockGenClient::new(vec![Ok(json!({}))]));
        let plan = request_plan(&client, "a chess site").await.unwrap();
        assert_eq!(plan.mind_map.center, "a chess site");
        assert_eq!(plan.mind_map.branches.len(), 2);
        assert_eq!(plan.roadmap.len(), 1);
    }

    #[tokio::test]
    async fn test_request_plan_propagates_failure() {
        let client = arc(MockGenClient::failing());
        assert!(request_plan(&client, "anything").await.is_err());
    }

    #[tokio::test]
    async fn test_request_plan_rejects_empty_prompt() {
        let client = arc(MockGenClient::new(vec![Ok(json!({}))]));
        assert!(matches!(
            request_plan(&client, "  ").await,
            Err(GenError::EmptyPrompt)
        ));
        // The collaborator is never called for an invalid request
        // (the mock would have consumed a response otherwise)
    }

    #[tokio::test]
    async fn test_request_chat_uses_response_string() {
        let client = arc(MockGenClient::new(vec![Ok(json!({"response": "Use sqlite."}))]));
        assert_eq!(request_chat(&client, "what db?").await, "Use sqlite.");
    }

    #[tokio::test]
    async fn test_request_chat_falls_back_without_string() {
        let client = arc(MockGenClient::new(vec![Ok(json!({"unexpected": 1}))]));
        let reply = request_chat(&client, "what db?").await;
        assert!(reply.contains("what db?"));
    }

    #[tokio::test]
    async fn test_request_chat_falls_back_on_error() {
        let client = arc(MockGenClient::failing());
        let reply = request_chat(&client, "hello").await;
        assert_eq!(reply, "Sorry, there was an error. Please try again!");
    }
}
