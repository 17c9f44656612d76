//! Prompt templates for the generation collaborator
//!
//! System prompts are compiled into the binary from .pmt files; the chat
//! wrapper is a Handlebars template rendered with the user's message.

use handlebars::Handlebars;
use serde_json::json;
use tracing::debug;

use crate::llm::RequestKind;

/// Full-plan system prompt (JSON response contract)
pub const PROJECT_IDEA: &str = include_str!("../../prompts/project_idea.pmt");

/// Roadmap refinement system prompt
pub const ROADMAP: &str = include_str!("../../prompts/roadmap.pmt");

/// Phase task-list system prompt
pub const TASKS: &str = include_str!("../../prompts/tasks.pmt");

/// Chat wrapper template, rendered with `{{input}}`
pub const CHAT: &str = include_str!("../../prompts/chat.pmt");

/// System prompt sent ahead of the user input for a request kind.
pub fn system_prompt(kind: RequestKind) -> &'static str {
    match kind {
        RequestKind::ProjectIdea => PROJECT_IDEA,
        RequestKind::Roadmap => ROADMAP,
        RequestKind::Tasks => TASKS,
        // Chat replies carry their instructions in the wrapped prompt itself
        RequestKind::Chat => "",
    }
}

/// Render the chat wrapper around a user message.
pub fn chat_prompt(input: &str) -> String {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    match handlebars.render_template(CHAT, &json!({ "input": input })) {
        Ok(rendered) => rendered.trim().to_string(),
        Err(err) => {
            // Template is embedded and valid; degrade to the raw input anyway
            debug!(%err, "chat_prompt: template render failed");
            input.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_idea_prompt_names_the_contract() {
        assert!(PROJECT_IDEA.contains("fullstack developer assistant"));
        assert!(PROJECT_IDEA.contains("projectIdea"));
        assert!(PROJECT_IDEA.contains("mindMap"));
        assert!(PROJECT_IDEA.contains("roadmap"));
        assert!(PROJECT_IDEA.contains("techStack"));
        assert!(PROJECT_IDEA.contains("estimatedTime"));
    }

    #[test]
    fn test_system_prompt_lookup() {
        assert_eq!(system_prompt(RequestKind::ProjectIdea), PROJECT_IDEA);
        assert_eq!(system_prompt(RequestKind::Roadmap), ROADMAP);
        assert_eq!(system_prompt(RequestKind::Tasks), TASKS);
        assert_eq!(system_prompt(RequestKind::Chat), "");
    }

    #[test]
    fn test_chat_prompt_embeds_the_input_verbatim() {
        let rendered = chat_prompt("how do I cache \"sessions\" & cookies?");
        assert!(rendered.contains("how do I cache \"sessions\" & cookies?"));
        assert!(rendered.contains("under 100 words"));
    }
}
