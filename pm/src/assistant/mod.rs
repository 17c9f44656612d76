//! Scripted per-task guidance generator
//!
//! The assistant panel's reply source. Replies are canned templates routed by
//! keywords in the user's message; the general reply is chosen at random
//! among two variants, which is deliberate. Task text, phase number, and
//! plan title parameterize every template.

use chrono::{DateTime, Utc};
use rand::seq::IndexedRandom;
use tracing::debug;
use uuid::Uuid;

/// Who authored a message in an assistant history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

/// Rendering category of a bot reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplyKind {
    #[default]
    Text,
    Code,
    Checklist,
    Resource,
}

/// One message in a per-task assistant history.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantMessage {
    pub id: Uuid,
    pub sender: Sender,
    pub kind: ReplyKind,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl AssistantMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            sender: Sender::User,
            kind: ReplyKind::Text,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn bot(kind: ReplyKind, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            sender: Sender::Bot,
            kind,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A one-keypress prompt shortcut shown in the assistant panel.
#[derive(Debug, Clone, PartialEq)]
pub struct QuickAction {
    pub id: &'static str,
    pub title: &'static str,
    pub prompt: String,
}

/// Display name of a roadmap phase.
pub fn phase_name(phase: u32) -> &'static str {
    match phase {
        1 => "Planning",
        2 => "Development",
        3 => "Testing",
        4 => "Deployment",
        _ => "Development",
    }
}

/// Quick actions for one task: four base actions plus one per-phase extra.
pub fn quick_actions(phase: u32, task: &str) -> Vec<QuickAction> {
    let mut actions = vec![
        QuickAction {
            id: "explain",
            title: "Explain task",
            prompt: format!("Explain this task step by step: \"{task}\""),
        },
        QuickAction {
            id: "code",
            title: "Code examples",
            prompt: format!("Show me code examples for: \"{task}\""),
        },
        QuickAction {
            id: "checklist",
            title: "Checklist",
            prompt: format!("Create a detailed checklist for: \"{task}\""),
        },
        QuickAction {
            id: "resources",
            title: "Resources",
            prompt: format!("What tools and resources do I need for: \"{task}\"?"),
        },
    ];
    let extra = match phase {
        1 => Some(QuickAction {
            id: "requirements",
            title: "Requirements",
            prompt: format!("Help me define requirements for \"{task}\""),
        }),
        2 => Some(QuickAction {
            id: "setup",
            title: "Setup guide",
            prompt: format!("How do I set up the development environment for \"{task}\"?"),
        }),
        3 => Some(QuickAction {
            id: "testing",
            title: "Testing",
            prompt: format!("How do I test \"{task}\" properly?"),
        }),
        4 => Some(QuickAction {
            id: "deployment",
            title: "Deployment",
            prompt: format!("How do I deploy \"{task}\" to production?"),
        }),
        _ => None,
    };
    actions.extend(extra);
    actions
}

/// The seed message a freshly-opened assistant history starts with.
pub fn welcome(task: &str, phase: u32, project: &str) -> String {
    debug!(phase, "assistant::welcome: called");
    let keywords = task.to_lowercase();
    let tips = if keywords.contains("api") || keywords.contains("backend") {
        "\nAPI tips:\n\
         - Define clear endpoints and HTTP methods\n\
         - Implement error handling and validation\n\
         - Document with OpenAPI/Swagger\n\
         - Exercise every endpoint with an HTTP client"
    } else if keywords.contains("ui") || keywords.contains("frontend") || keywords.contains("design") {
        "\nUI tips:\n\
         - Build from small reusable components\n\
         - Implement responsive design\n\
         - Keep accessibility in mind\n\
         - Check different screen sizes"
    } else if keywords.contains("database") {
        "\nDatabase tips:\n\
         - Plan the schema up front\n\
         - Use migrations for schema changes\n\
         - Add indexes for hot queries\n\
         - Validate and constrain data at the boundary"
    } else if keywords.contains("auth") || keywords.contains("login") {
        "\nAuthentication tips:\n\
         - Hash passwords with a vetted algorithm\n\
         - Use JWT or session-based auth\n\
         - Follow OWASP guidelines\n\
         - Test the failure paths (wrong credentials, expiry)"
    } else {
        ""
    };

    format!(
        "Assistant for \"{task}\"\n\
         Phase: {} ({phase}/4)\n\
         Project: {project}\n\
         \n\
         I can walk you through this task step by step, show code examples,\n\
         suggest tools, and help you break the work down.{tips}\n\
         \n\
         Pick a quick action or ask about this task directly.",
        phase_name(phase)
    )
}

/// Produce a scripted reply to a user message about one task.
///
/// Keyword routing picks the reply kind; the general reply is a random choice
/// between two templates.
pub fn reply(message: &str, task: &str, phase: u32, project: &str) -> (ReplyKind, String) {
    let lower = message.to_lowercase();
    debug!(phase, "assistant::reply: called");

    if lower.contains("code") || lower.contains("example") || lower.contains("snippet") {
        return (ReplyKind::Code, code_reply(task, phase));
    }
    if lower.contains("checklist") || lower.contains("steps") || lower.contains("plan") {
        return (ReplyKind::Checklist, checklist_reply(task, phase));
    }
    if lower.contains("resource") || lower.contains("tool") || lower.contains("link") {
        return (ReplyKind::Resource, resource_reply(task));
    }

    let variants = [general_reply_a(task, phase), general_reply_b(task, phase, project)];
    let mut rng = rand::rng();
    let chosen = variants.choose(&mut rng).cloned().unwrap_or_else(|| variants[0].clone());
    (ReplyKind::Text, chosen)
}

fn phase_focus(phase: u32) -> &'static str {
    match phase {
        1 => "detailed planning and requirements definition",
        2 => "clean implementation and code quality",
        3 => "comprehensive testing and bug fixing",
        _ => "stable deployment and monitoring",
    }
}

fn code_reply(task: &str, phase: u32) -> String {
    let note = match phase {
        1 => "// Define requirements and data structures",
        2 => "// Implement the core functionality",
        3 => "// Write tests and validate",
        _ => "// Prepare for production deployment",
    };
    format!(
        "Code sketch for \"{task}\":\n\
         \n\
         ```\n\
         async fn run_task() -> Result<Outcome, TaskError> {{\n\
             {note}\n\
             todo!(\"{task}\")\n\
         }}\n\
         ```\n\
         \n\
         Next steps:\n\
         1. Adapt the sketch to your requirements\n\
         2. Add error handling\n\
         3. Exercise the functionality\n\
         4. Document the result"
    )
}

fn checklist_reply(task: &str, phase: u32) -> String {
    let estimate = match phase {
        1 => "2-4 hours",
        2 => "4-8 hours",
        3 => "2-3 hours",
        _ => "1-2 hours",
    };
    let finish = if phase == 4 { "production" } else { "the next phase" };
    format!(
        "Checklist for \"{task}\":\n\
         \n\
         Preparation\n\
         [ ] Understand the exact requirements\n\
         [ ] Gather the necessary assets and data\n\
         [ ] Define acceptance criteria\n\
         \n\
         Implementation\n\
         [ ] Create the basic structure\n\
         [ ] Implement the core functionality\n\
         [ ] Add error handling\n\
         \n\
         Quality\n\
         [ ] Write unit tests\n\
         [ ] Cover the edge cases\n\
         [ ] Get a review\n\
         \n\
         Finish\n\
         [ ] Integrate and verify\n\
         [ ] Update documentation\n\
         [ ] Ready for {finish}\n\
         \n\
         Estimated time: {estimate}"
    )
}

fn resource_reply(task: &str) -> String {
    format!(
        "Resources for \"{task}\":\n\
         \n\
         Tools\n\
         - Editor extensions for your stack\n\
         - An HTTP client for API testing\n\
         - The browser devtools for UI work\n\
         \n\
         Documentation\n\
         - MDN Web Docs for web standards\n\
         - Your framework's official docs\n\
         - Community guides and articles\n\
         \n\
         Practices\n\
         - Clean code principles\n\
         - Test-driven development where it pays off"
    )
}

fn general_reply_a(task: &str, phase: u32) -> String {
    let (start, core, finish) = match phase {
        1 => (
            "Analyze the existing requirements",
            "Create detailed specifications",
            "Get review and approval",
        ),
        2 => (
            "Set up the development environment",
            "Implement step by step",
            "Code review and refactoring",
        ),
        3 => ("Define the test cases", "Run all tests", "Fix bugs and optimize"),
        _ => (
            "Prepare the production environment",
            "Deploy and monitor",
            "Document the deployment",
        ),
    };
    format!(
        "For \"{task}\" in phase {phase} I recommend:\n\
         \n\
         Main focus: {}\n\
         \n\
         Concrete steps:\n\
         1. Start: {start}\n\
         2. Core: {core}\n\
         3. Finish: {finish}\n\
         \n\
         Need help with a specific part?",
        phase_focus(phase)
    )
}

fn general_reply_b(task: &str, phase: u32, project: &str) -> String {
    let emphasis = match phase {
        1 => "well planned",
        2 => "cleanly implemented",
        3 => "thoroughly tested",
        _ => "stably deployed",
    };
    format!(
        "A quick guide for \"{task}\":\n\
         \n\
         - Understand: what exactly needs to be achieved?\n\
         - Plan: which steps are necessary?\n\
         - Implement: proceed incrementally\n\
         - Verify: check functionality and edge cases\n\
         \n\
         For {project} it matters most that this task is {emphasis}.\n\
         \n\
         Any particular aspect you want to dig into?"
    )
}
