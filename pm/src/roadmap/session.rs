//! Per-plan session state
//!
//! One `PlanSession` bundles a plan with everything the surface tracks about
//! it: completion, open phases, the active assistant panel, and the per-task
//! assistant histories. Replacing the plan means constructing a fresh
//! session; nothing carries over, which is what makes reused TaskId values
//! across plans safe.

use std::collections::HashMap;

use tracing::debug;

use crate::assistant::{self, AssistantMessage, ReplyKind};
use crate::domain::{ProjectPlan, TaskId};

use super::{ProgressTracker, RoadmapError, SelectionController};

/// Session-scoped state for one project plan.
#[derive(Debug, Clone)]
pub struct PlanSession {
    plan: ProjectPlan,
    progress: ProgressTracker,
    selection: SelectionController,
    /// Assistant histories, retained while the plan lives even when the
    /// panel is closed
    histories: HashMap<TaskId, Vec<AssistantMessage>>,
}

impl PlanSession {
    /// Start a fresh session around `plan`.
    pub fn new(plan: ProjectPlan) -> Self {
        debug!(center = %plan.mind_map.center, "PlanSession::new: called");
        let progress = ProgressTracker::new(&plan);
        Self {
            plan,
            progress,
            selection: SelectionController::new(),
            histories: HashMap::new(),
        }
    }

    pub fn plan(&self) -> &ProjectPlan {
        &self.plan
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    /// Flip completion of one task.
    pub fn toggle_task(&mut self, id: TaskId) -> Result<bool, RoadmapError> {
        self.progress.toggle_task(id)
    }

    /// Flip one phase between expanded and collapsed.
    pub fn toggle_phase(&mut self, phase_number: u32) -> bool {
        self.selection.toggle_phase_open(phase_number)
    }

    /// Toggle the assistant panel for one task.
    ///
    /// The first time a task's panel opens, its history is seeded with one
    /// generated guidance message built from the task text, phase number,
    /// and plan title. Returns the now-active task, if any.
    pub fn toggle_assistant(&mut self, id: TaskId) -> Result<Option<TaskId>, RoadmapError> {
        let Some(task_text) = self.plan.task_text(id).map(str::to_string) else {
            debug!(task_id = %id, "PlanSession::toggle_assistant: rejected invalid id");
            return Err(RoadmapError::InvalidTaskId { task_id: id });
        };

        let active = self.selection.toggle_assistant(id);
        if active == Some(id) {
            self.histories.entry(id).or_insert_with(|| {
                debug!(task_id = %id, "PlanSession::toggle_assistant: seeding history");
                vec![AssistantMessage::bot(
                    ReplyKind::Text,
                    assistant::welcome(&task_text, id.phase, &self.plan.mind_map.center),
                )]
            });
        }
        Ok(active)
    }

    /// Close the assistant panel if one is open. History is retained.
    pub fn close_assistant(&mut self) {
        self.selection.close_assistant();
    }

    /// The assistant history for one task, empty if never opened.
    pub fn history(&self, id: TaskId) -> &[AssistantMessage] {
        self.histories.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Send a user message to one task's assistant and record the scripted
    /// reply. The panel must address a task that exists in the plan.
    pub fn ask_assistant(&mut self, id: TaskId, message: &str) -> Result<(), RoadmapError> {
        let Some(task_text) = self.plan.task_text(id).map(str::to_string) else {
            return Err(RoadmapError::InvalidTaskId { task_id: id });
        };
        let (kind, text) = assistant::reply(message, &task_text, id.phase, &self.plan.mind_map.center);
        let history = self.histories.entry(id).or_default();
        history.push(AssistantMessage::user(message));
        history.push(AssistantMessage::bot(kind, text));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::Sender;

    fn session() -> PlanSession {
        PlanSession::new(ProjectPlan::demo())
    }

    #[test]
    fn test_new_session_starts_clean() {
        let s = session();
        assert_eq!(s.progress().completed_count(), 0);
        assert!(s.selection().is_phase_open(1));
        assert_eq!(s.selection().active_assistant(), None);
    }

    #[test]
    fn test_assistant_history_seeded_once() {
        let mut s = session();
        let id = TaskId::new(1, 0);

        assert_eq!(s.toggle_assistant(id).unwrap(), Some(id));
        let seeded = s.history(id).to_vec();
        assert_eq!(seeded.len(), 1);
        assert_eq!(seeded[0].sender, Sender::Bot);
        assert!(seeded[0].content.contains("Create project repository"));
        assert!(seeded[0].content.contains("AT Crawler"));

        // Close and reopen: history is retained, not reseeded
        assert_eq!(s.toggle_assistant(id).unwrap(), None);
        assert_eq!(s.toggle_assistant(id).unwrap(), Some(id));
        assert_eq!(s.history(id), seeded.as_slice());
    }

    #[test]
    fn test_assistant_rejects_unknown_task() {
        let mut s = session();
        let bad = TaskId::new(42, 0);
        assert_eq!(
            s.toggle_assistant(bad),
            Err(RoadmapError::InvalidTaskId { task_id: bad })
        );
        assert_eq!(s.selection().active_assistant(), None);
        assert!(s.history(bad).is_empty());
    }

    #[test]
    fn test_ask_assistant_appends_user_and_reply() {
        let mut s = session();
        let id = TaskId::new(2, 1);
        s.toggle_assistant(id).unwrap();

        s.ask_assistant(id, "give me a checklist").unwrap();
        let history = s.history(id);
        assert_eq!(history.len(), 3);
        assert_eq!(history[1].sender, Sender::User);
        assert_eq!(history[2].sender, Sender::Bot);
        assert_eq!(history[2].kind, ReplyKind::Checklist);
    }

    #[test]
    fn test_history_survives_switching_panels() {
        let mut s = session();
        let a = TaskId::new(1, 0);
        let b = TaskId::new(1, 1);

        s.toggle_assistant(a).unwrap();
        s.ask_assistant(a, "code example please").unwrap();
        // Switching to b closes a but keeps its history
        assert_eq!(s.toggle_assistant(b).unwrap(), Some(b));
        assert_eq!(s.history(a).len(), 3);
        assert_eq!(s.history(b).len(), 1);
    }

    #[test]
    fn test_plan_replacement_resets_everything() {
        let mut s = session();
        s.toggle_task(TaskId::new(1, 0)).unwrap();
        s.toggle_assistant(TaskId::new(1, 0)).unwrap();

        // A new plan means a new session; reused ids start from scratch
        let s = PlanSession::new(ProjectPlan::demo());
        assert_eq!(s.progress().completed_count(), 0);
        assert_eq!(s.selection().active_assistant(), None);
        assert!(s.history(TaskId::new(1, 0)).is_empty());
    }
}
