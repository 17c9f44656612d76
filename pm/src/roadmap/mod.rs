//! Roadmap progress and selection state
//!
//! Session-scoped state for one project plan: the completion set with its
//! derived percentages, the open-phase set, the single active assistant
//! panel, and the per-task assistant histories. All updates are synchronous
//! and atomic; the presentation layer re-renders from the result.

mod progress;
mod selection;
mod session;

pub use progress::ProgressTracker;
pub use selection::SelectionController;
pub use session::PlanSession;

use thiserror::Error;

use crate::domain::TaskId;

/// Errors from roadmap state transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoadmapError {
    /// The id names a phase/index absent from the current plan. The toggle
    /// is rejected and state is left unchanged.
    #[error("task {task_id} does not exist in the current plan")]
    InvalidTaskId { task_id: TaskId },
}
