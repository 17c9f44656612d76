//! TUI application state
//!
//! Pure data structures for the TUI. No rendering logic here; the runner
//! mutates this state on events and the views module draws from it.

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{ProjectPlan, TaskId};
use crate::layout::reveal::RevealStage;
use crate::roadmap::PlanSession;

/// Prompt length limit shown in the input counter
pub const PROMPT_CHAR_LIMIT: usize = 500;

/// Top-level panes for Tab cycling (in order): Prompt, MindMap, Roadmap, Chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pane {
    #[default]
    Prompt,
    MindMap,
    Roadmap,
    Chat,
}

impl Pane {
    /// Get the next pane in the cycle
    pub fn next(self) -> Self {
        match self {
            Self::Prompt => Self::MindMap,
            Self::MindMap => Self::Roadmap,
            Self::Roadmap => Self::Chat,
            Self::Chat => Self::Prompt,
        }
    }

    /// Get the previous pane in the cycle
    pub fn prev(self) -> Self {
        match self {
            Self::Prompt => Self::Chat,
            Self::MindMap => Self::Prompt,
            Self::Roadmap => Self::MindMap,
            Self::Chat => Self::Roadmap,
        }
    }
}

/// Sidebar chat message author
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatSender {
    User,
    Bot,
}

/// Sidebar chat message
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: Uuid,
    pub sender: ChatSender,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            sender: ChatSender::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            sender: ChatSender::Bot,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// One selectable row of the flattened roadmap list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoadmapRow {
    /// Phase header; `position` is the index into the plan's roadmap array
    Phase { position: usize, phase_number: u32 },
    /// Task line of an expanded phase
    Task(TaskId),
}

/// Main TUI application state
#[derive(Debug)]
pub struct AppState {
    /// Currently focused pane
    pub focus: Pane,
    /// Should the app quit
    pub should_quit: bool,
    /// Transient, non-blocking notice line
    pub notice: Option<String>,

    // === Prompt input ===
    pub prompt_input: String,
    /// A generation request is outstanding; submits are disabled until the
    /// pending request resolves
    pub generating: bool,
    /// Prompt queued for the runner to launch
    pub pending_prompt: Option<String>,

    // === Sidebar chat ===
    pub chat_input: String,
    pub chat_history: Vec<ChatMessage>,
    pub chat_waiting: bool,
    pub pending_chat: Option<String>,

    // === Plan session ===
    pub session: Option<PlanSession>,
    /// Current reveal stage of the mind-map diagram
    pub reveal_stage: RevealStage,
    /// Cursor into the flattened roadmap rows
    pub roadmap_cursor: usize,
    /// Input buffer of the open assistant panel
    pub assistant_input: String,
    /// Branch circle radius the mind map is laid out with
    pub branch_radius: f64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            focus: Pane::default(),
            should_quit: false,
            notice: None,
            prompt_input: String::new(),
            generating: false,
            pending_prompt: None,
            chat_input: String::new(),
            chat_history: vec![ChatMessage::bot(
                "Hello! I'm your fullstack development assistant. Tell me about \
                 your project idea and I'll build a mind map, a roadmap, and \
                 detailed tasks for it!",
            )],
            chat_waiting: false,
            pending_chat: None,
            session: None,
            reveal_stage: RevealStage::default(),
            roadmap_cursor: 0,
            assistant_input: String::new(),
            branch_radius: crate::layout::BRANCH_RADIUS,
        }
    }
}

impl AppState {
    /// Fresh state with the greeting in the chat sidebar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the prompt for generation. Rejected while a request is already
    /// outstanding or when the prompt is empty.
    pub fn submit_prompt(&mut self) -> bool {
        if self.generating {
            debug!("AppState::submit_prompt: rejected, generation in flight");
            return false;
        }
        let prompt = self.prompt_input.trim();
        if prompt.is_empty() {
            return false;
        }
        self.pending_prompt = Some(prompt.to_string());
        true
    }

    /// Install a freshly generated plan, resetting all per-plan state.
    pub fn apply_plan(&mut self, prompt: &str, plan: ProjectPlan) {
        debug!(center = %plan.mind_map.center, "AppState::apply_plan: called");
        self.session = Some(PlanSession::new(plan));
        self.generating = false;
        self.reveal_stage = RevealStage::Hidden;
        self.roadmap_cursor = 0;
        self.assistant_input.clear();
        self.notice = None;
        self.chat_history.push(ChatMessage::bot(format!(
            "Perfect! I've created a complete project analysis for \"{prompt}\". \
             Check out the mind map and roadmap below!"
        )));
    }

    /// Fall back to the demo plan after a failed generation. The failure is
    /// a transient notice, never a hard failure of the session.
    pub fn apply_generation_failure(&mut self, prompt: &str, error: &str) {
        debug!(%error, "AppState::apply_generation_failure: called");
        self.session = Some(PlanSession::new(ProjectPlan::demo()));
        self.generating = false;
        self.reveal_stage = RevealStage::Hidden;
        self.roadmap_cursor = 0;
        self.assistant_input.clear();
        self.notice = Some(format!("Generation failed ({error}); showing the demo plan instead"));
        self.chat_history.push(ChatMessage::bot(format!(
            "I couldn't reach the generator for \"{prompt}\", so here is the demo \
             plan to explore in the meantime."
        )));
    }

    /// Queue a sidebar chat message. Rejected while a reply is pending.
    pub fn submit_chat(&mut self) -> bool {
        if self.chat_waiting {
            return false;
        }
        let input = self.chat_input.trim();
        if input.is_empty() {
            return false;
        }
        let input = input.to_string();
        self.chat_history.push(ChatMessage::user(input.clone()));
        self.pending_chat = Some(input);
        self.chat_input.clear();
        true
    }

    pub fn apply_chat_reply(&mut self, reply: String) {
        self.chat_history.push(ChatMessage::bot(reply));
        self.chat_waiting = false;
    }

    /// Advance the reveal stage. Stages are monotonic; a stale lower stage
    /// is ignored.
    pub fn set_reveal_stage(&mut self, stage: RevealStage) {
        if stage > self.reveal_stage {
            self.reveal_stage = stage;
        }
    }

    /// Flattened roadmap rows: every phase header plus the tasks of expanded
    /// phases, in display order.
    pub fn roadmap_rows(&self) -> Vec<RoadmapRow> {
        let Some(session) = &self.session else {
            return Vec::new();
        };
        let mut rows = Vec::new();
        for (position, phase) in session.plan().roadmap.iter().enumerate() {
            rows.push(RoadmapRow::Phase {
                position,
                phase_number: phase.phase_number,
            });
            if session.selection().is_phase_open(phase.phase_number) {
                for index in 0..phase.tasks.len() {
                    rows.push(RoadmapRow::Task(TaskId::new(phase.phase_number, index)));
                }
            }
        }
        rows
    }

    /// The row under the cursor, if any.
    pub fn selected_row(&self) -> Option<RoadmapRow> {
        self.roadmap_rows().get(self.roadmap_cursor).copied()
    }

    pub fn roadmap_select_next(&mut self) {
        let len = self.roadmap_rows().len();
        if len > 0 && self.roadmap_cursor < len - 1 {
            self.roadmap_cursor += 1;
        }
    }

    pub fn roadmap_select_prev(&mut self) {
        self.roadmap_cursor = self.roadmap_cursor.saturating_sub(1);
    }

    /// Keep the cursor within the current row list.
    pub fn clamp_roadmap_cursor(&mut self) {
        let len = self.roadmap_rows().len();
        if len == 0 {
            self.roadmap_cursor = 0;
        } else if self.roadmap_cursor >= len {
            self.roadmap_cursor = len - 1;
        }
    }

    /// Activate the selected row: expand/collapse a phase or toggle a task.
    pub fn activate_selected_row(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        let Some(session) = &mut self.session else {
            return;
        };
        match row {
            RoadmapRow::Phase { phase_number, .. } => {
                session.toggle_phase(phase_number);
                self.clamp_roadmap_cursor();
            }
            RoadmapRow::Task(id) => {
                if let Err(err) = session.toggle_task(id) {
                    self.notice = Some(err.to_string());
                }
            }
        }
    }

    /// Toggle the assistant panel for the selected task row.
    pub fn toggle_selected_assistant(&mut self) {
        let Some(RoadmapRow::Task(id)) = self.selected_row() else {
            return;
        };
        let Some(session) = &mut self.session else {
            return;
        };
        match session.toggle_assistant(id) {
            Ok(_) => self.assistant_input.clear(),
            Err(err) => self.notice = Some(err.to_string()),
        }
    }

    /// The task whose assistant panel is open, if any.
    pub fn active_assistant(&self) -> Option<TaskId> {
        self.session.as_ref().and_then(|s| s.selection().active_assistant())
    }

    /// Close the open assistant panel regardless of cursor position.
    pub fn close_assistant_panel(&mut self) {
        if let Some(session) = &mut self.session {
            session.close_assistant();
        }
        self.assistant_input.clear();
    }

    /// Submit the assistant input to the open panel.
    pub fn submit_assistant_input(&mut self) {
        let Some(id) = self.active_assistant() else {
            return;
        };
        let message = self.assistant_input.trim().to_string();
        if message.is_empty() {
            return;
        }
        if let Some(session) = &mut self.session {
            if let Err(err) = session.ask_assistant(id, &message) {
                self.notice = Some(err.to_string());
            }
        }
        self.assistant_input.clear();
    }

    /// Fire quick action `n` (1-based) of the open assistant panel.
    pub fn fire_quick_action(&mut self, n: usize) {
        let Some(id) = self.active_assistant() else {
            return;
        };
        let Some(session) = &mut self.session else {
            return;
        };
        let Some(task_text) = session.plan().task_text(id).map(str::to_string) else {
            return;
        };
        let actions = crate::assistant::quick_actions(id.phase, &task_text);
        if let Some(action) = actions.get(n.saturating_sub(1)) {
            let prompt = action.prompt.clone();
            if let Err(err) = session.ask_assistant(id, &prompt) {
                self.notice = Some(err.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_demo() -> AppState {
        let mut state = AppState::new();
        state.apply_plan("demo prompt", ProjectPlan::demo());
        state
    }

    #[test]
    fn test_pane_cycling() {
        assert_eq!(Pane::Prompt.next(), Pane::MindMap);
        assert_eq!(Pane::MindMap.next(), Pane::Roadmap);
        assert_eq!(Pane::Roadmap.next(), Pane::Chat);
        assert_eq!(Pane::Chat.next(), Pane::Prompt);

        assert_eq!(Pane::Prompt.prev(), Pane::Chat);
        assert_eq!(Pane::Chat.prev(), Pane::Roadmap);
    }

    #[test]
    fn test_submit_prompt_guards() {
        let mut state = AppState::new();
        assert!(!state.submit_prompt());

        state.prompt_input = "  a book shop  ".to_string();
        assert!(state.submit_prompt());
        assert_eq!(state.pending_prompt.as_deref(), Some("a book shop"));

        // Reentrant submit while a request is outstanding is rejected
        state.pending_prompt = None;
        state.generating = true;
        assert!(!state.submit_prompt());
        assert!(state.pending_prompt.is_none());
    }

    #[test]
    fn test_apply_plan_resets_per_plan_state() {
        let mut state = state_with_demo();
        let session = state.session.as_mut().unwrap();
        session.toggle_task(TaskId::new(1, 0)).unwrap();
        state.roadmap_cursor = 5;
        state.reveal_stage = RevealStage::LeavesShown;

        state.apply_plan("again", ProjectPlan::demo());
        assert_eq!(state.session.as_ref().unwrap().progress().completed_count(), 0);
        assert_eq!(state.roadmap_cursor, 0);
        assert_eq!(state.reveal_stage, RevealStage::Hidden);
        assert!(!state.generating);
    }

    #[test]
    fn test_generation_failure_is_nonfatal() {
        let mut state = AppState::new();
        state.generating = true;
        state.apply_generation_failure("a shop", "timeout");

        let session = state.session.as_ref().unwrap();
        assert_eq!(session.plan().mind_map.center, "AT Crawler");
        assert!(state.notice.as_ref().unwrap().contains("timeout"));
        assert!(!state.generating);
    }

    #[test]
    fn test_reveal_stage_is_monotonic() {
        let mut state = AppState::new();
        state.set_reveal_stage(RevealStage::EdgesDrawn);
        // A stale earlier stage cannot rewind the sequence
        state.set_reveal_stage(RevealStage::Appearing);
        assert_eq!(state.reveal_stage, RevealStage::EdgesDrawn);
        state.set_reveal_stage(RevealStage::LeavesShown);
        assert_eq!(state.reveal_stage, RevealStage::LeavesShown);
    }

    #[test]
    fn test_roadmap_rows_follow_open_phases() {
        let mut state = state_with_demo();
        // Demo plan: 4 phases of 5 tasks; phase 1 open by default
        assert_eq!(state.roadmap_rows().len(), 4 + 5);

        state.roadmap_cursor = 0;
        state.activate_selected_row(); // collapse phase 1
        assert_eq!(state.roadmap_rows().len(), 4);

        state.activate_selected_row(); // expand again
        assert_eq!(state.roadmap_rows().len(), 9);
    }

    #[test]
    fn test_activate_task_row_toggles_completion() {
        let mut state = state_with_demo();
        state.roadmap_cursor = 1; // first task of phase 1
        state.activate_selected_row();

        let session = state.session.as_ref().unwrap();
        assert!(session.progress().is_complete(TaskId::new(1, 0)));
        assert_eq!(session.progress().completed_count(), 1);
    }

    #[test]
    fn test_cursor_clamps_when_phase_collapses() {
        let mut state = state_with_demo();
        state.roadmap_cursor = 5; // last task of phase 1
        state.roadmap_select_next();
        assert_eq!(state.roadmap_cursor, 6);

        // Collapsing phase 1 shrinks the list; cursor stays in bounds
        state.roadmap_cursor = 0;
        state.activate_selected_row();
        state.roadmap_cursor = 100;
        state.clamp_roadmap_cursor();
        assert_eq!(state.roadmap_cursor, 3);
    }

    #[test]
    fn test_assistant_flow_through_state() {
        let mut state = state_with_demo();
        state.roadmap_cursor = 1;
        state.toggle_selected_assistant();
        let id = TaskId::new(1, 0);
        assert_eq!(state.active_assistant(), Some(id));

        state.assistant_input = "show me code".to_string();
        state.submit_assistant_input();
        assert_eq!(state.session.as_ref().unwrap().history(id).len(), 3);
        assert!(state.assistant_input.is_empty());

        // Quick action 3 is the checklist
        state.fire_quick_action(3);
        assert_eq!(state.session.as_ref().unwrap().history(id).len(), 5);

        // Toggling again closes the panel
        state.toggle_selected_assistant();
        assert_eq!(state.active_assistant(), None);
    }

    #[test]
    fn test_chat_submit_guards_and_reply() {
        let mut state = AppState::new();
        assert_eq!(state.chat_history.len(), 1); // greeting

        state.chat_input = "what db should I use?".to_string();
        assert!(state.submit_chat());
        assert_eq!(state.chat_history.len(), 2);
        assert_eq!(state.pending_chat.as_deref(), Some("what db should I use?"));

        state.chat_waiting = true;
        state.chat_input = "another".to_string();
        assert!(!state.submit_chat());

        state.apply_chat_reply("Use postgres.".to_string());
        assert_eq!(state.chat_history.len(), 3);
        assert!(!state.chat_waiting);
    }
}
