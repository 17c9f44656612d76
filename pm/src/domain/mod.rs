//! Domain types for planmap
//!
//! Core domain types: ProjectPlan, MindMapTree, Branch, RoadmapPhase, TaskId.
//! A plan is immutable once constructed; a new generation request replaces it
//! wholesale, never patches it in place.

mod plan;
mod task;

pub use plan::{Branch, MindMapTree, ProjectPlan, RoadmapPhase};
pub use task::TaskId;
