//! Generation request types
//!
//! The wire contract with the generation collaborator: one request carries a
//! non-empty prompt and a request kind; the response is loosely-typed JSON
//! that downstream code default-fills rather than rejects.

use serde::{Deserialize, Serialize};

use super::GenError;

/// What kind of content a request asks for. Selects the system prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestKind {
    /// Full plan: idea, mind map, roadmap, tech stack
    ProjectIdea,
    /// Roadmap refinement for an existing project
    Roadmap,
    /// Task list for one phase
    Tasks,
    /// Free-text conversational reply
    Chat,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::ProjectIdea => "project-idea",
            RequestKind::Roadmap => "roadmap",
            RequestKind::Tasks => "tasks",
            RequestKind::Chat => "chat",
        }
    }
}

/// A single generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    #[serde(rename = "type")]
    pub kind: RequestKind,
}

impl GenerateRequest {
    /// Build a request; the prompt is required and must be non-empty.
    pub fn new(kind: RequestKind, prompt: impl Into<String>) -> Result<Self, GenError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(GenError::EmptyPrompt);
        }
        Ok(Self { prompt, kind })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&RequestKind::ProjectIdea).unwrap(),
            "\"project-idea\""
        );
        assert_eq!(serde_json::to_string(&RequestKind::Chat).unwrap(), "\"chat\"");
        let kind: RequestKind = serde_json::from_str("\"roadmap\"").unwrap();
        assert_eq!(kind, RequestKind::Roadmap);
    }

    #[test]
    fn test_request_requires_prompt() {
        assert!(matches!(
            GenerateRequest::new(RequestKind::Chat, "   "),
            Err(GenError::EmptyPrompt)
        ));
        let req = GenerateRequest::new(RequestKind::ProjectIdea, "a book shop").unwrap();
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["type"], "project-idea");
        assert_eq!(value["prompt"], "a book shop");
    }
}
