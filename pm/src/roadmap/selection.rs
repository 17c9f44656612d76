//! Phase expansion and assistant panel selection

use std::collections::HashSet;

use tracing::debug;

use crate::domain::TaskId;

/// Owns which phases are expanded and which single task's assistant panel is
/// open.
///
/// Phases toggle independently; any number may be open at once. The assistant
/// is mutually exclusive: opening it for one task closes any other in the
/// same step.
#[derive(Debug, Clone)]
pub struct SelectionController {
    open_phases: HashSet<u32>,
    active_assistant: Option<TaskId>,
}

impl SelectionController {
    /// Fresh selection state: phase 1 open, no assistant.
    pub fn new() -> Self {
        Self {
            open_phases: HashSet::from([1]),
            active_assistant: None,
        }
    }

    /// Flip one phase between expanded and collapsed. Returns whether it is
    /// now open.
    pub fn toggle_phase_open(&mut self, phase_number: u32) -> bool {
        let now_open = if self.open_phases.remove(&phase_number) {
            false
        } else {
            self.open_phases.insert(phase_number);
            true
        };
        debug!(phase_number, now_open, "SelectionController::toggle_phase_open");
        now_open
    }

    pub fn is_phase_open(&self, phase_number: u32) -> bool {
        self.open_phases.contains(&phase_number)
    }

    /// Toggle the assistant panel for one task.
    ///
    /// Toggling the already-active task closes the panel; toggling any other
    /// task switches to it, closing the previous panel in the same step.
    /// Returns the now-active task, if any.
    pub fn toggle_assistant(&mut self, task_id: TaskId) -> Option<TaskId> {
        self.active_assistant = if self.active_assistant == Some(task_id) {
            None
        } else {
            Some(task_id)
        };
        debug!(?self.active_assistant, "SelectionController::toggle_assistant");
        self.active_assistant
    }

    pub fn active_assistant(&self) -> Option<TaskId> {
        self.active_assistant
    }

    /// Close the assistant panel if one is open.
    pub fn close_assistant(&mut self) {
        self.active_assistant = None;
    }
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_one_open_by_default() {
        let selection = SelectionController::new();
        assert!(selection.is_phase_open(1));
        assert!(!selection.is_phase_open(2));
    }

    #[test]
    fn test_phases_toggle_independently() {
        let mut selection = SelectionController::new();
        assert!(selection.toggle_phase_open(2));
        assert!(selection.toggle_phase_open(3));
        // 1, 2 and 3 open at the same time
        assert!(selection.is_phase_open(1));
        assert!(selection.is_phase_open(2));
        assert!(selection.is_phase_open(3));

        assert!(!selection.toggle_phase_open(1));
        assert!(!selection.is_phase_open(1));
        assert!(selection.is_phase_open(2));
    }

    #[test]
    fn test_assistant_is_mutually_exclusive() {
        let mut selection = SelectionController::new();
        let a = TaskId::new(1, 0);
        let b = TaskId::new(2, 1);

        assert_eq!(selection.toggle_assistant(a), Some(a));
        // Switching to b closes a in the same step
        assert_eq!(selection.toggle_assistant(b), Some(b));
        assert_eq!(selection.active_assistant(), Some(b));

        // Toggling the active task closes the panel
        assert_eq!(selection.toggle_assistant(b), None);
        assert_eq!(selection.active_assistant(), None);
    }

    #[test]
    fn test_close_assistant_is_idempotent() {
        let mut selection = SelectionController::new();
        selection.toggle_assistant(TaskId::new(1, 0));
        selection.close_assistant();
        selection.close_assistant();
        assert_eq!(selection.active_assistant(), None);
    }
}
