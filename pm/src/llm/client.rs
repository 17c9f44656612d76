//! GenClient trait definition

use async_trait::async_trait;

use super::{GenError, GenerateRequest};

/// Stateless generation client: each call is an independent request/response
/// exchange.
///
/// This is the only abstraction the core sees of the generation collaborator.
/// No conversation state is kept between calls; a plan request and a chat
/// request are each self-contained.
#[async_trait]
pub trait GenClient: Send + Sync {
    /// Send one generation request and return the parsed JSON payload.
    ///
    /// Implementations return the provider's text parsed as JSON when
    /// possible, or `{"response": "<text>"}` for free-text replies.
    async fn generate(&self, request: GenerateRequest) -> Result<serde_json::Value, GenError>;
}
