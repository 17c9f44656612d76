//! Task completion tracking
//!
//! The completion set is the single source of truth; every percentage is
//! derived from it on demand and never stored.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::domain::{ProjectPlan, TaskId};

use super::RoadmapError;

/// Owns the set of completed task ids for one plan and derives per-phase and
/// overall completion percentages.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    completed: HashSet<TaskId>,
    /// Task count per phase number, frozen from the plan at construction
    phase_tasks: BTreeMap<u32, usize>,
}

impl ProgressTracker {
    /// Build a tracker for `plan` with nothing completed.
    pub fn new(plan: &ProjectPlan) -> Self {
        let phase_tasks = plan
            .roadmap
            .iter()
            .map(|p| (p.phase_number, p.tasks.len()))
            .collect();
        Self {
            completed: HashSet::new(),
            phase_tasks,
        }
    }

    /// Flip completion of one task. Returns whether the task is now complete.
    ///
    /// Toggling the same id twice restores the prior state. An id that names
    /// no phase/index in the plan is rejected with state unchanged.
    pub fn toggle_task(&mut self, id: TaskId) -> Result<bool, RoadmapError> {
        if !self.is_valid(id) {
            debug!(task_id = %id, "ProgressTracker::toggle_task: rejected invalid id");
            return Err(RoadmapError::InvalidTaskId { task_id: id });
        }
        let now_complete = if self.completed.remove(&id) {
            false
        } else {
            self.completed.insert(id);
            true
        };
        debug!(task_id = %id, now_complete, "ProgressTracker::toggle_task: toggled");
        Ok(now_complete)
    }

    /// Whether one task is currently complete.
    pub fn is_complete(&self, id: TaskId) -> bool {
        self.completed.contains(&id)
    }

    /// Completed task count within one phase.
    pub fn completed_in_phase(&self, phase_number: u32) -> usize {
        self.completed.iter().filter(|id| id.phase == phase_number).count()
    }

    /// Completion percentage of one phase; 0 for a phase with no tasks.
    pub fn phase_progress(&self, phase_number: u32) -> f64 {
        let total = self.phase_tasks.get(&phase_number).copied().unwrap_or(0);
        if total == 0 {
            return 0.0;
        }
        self.completed_in_phase(phase_number) as f64 / total as f64 * 100.0
    }

    /// Overall completion percentage; 0 when the plan has no tasks.
    pub fn overall_progress(&self) -> f64 {
        let total = self.total_tasks();
        if total == 0 {
            return 0.0;
        }
        self.completed.len() as f64 / total as f64 * 100.0
    }

    /// Whether every task of one phase is complete.
    pub fn is_phase_complete(&self, phase_number: u32) -> bool {
        self.phase_progress(phase_number) == 100.0
    }

    /// Total completed count across all phases.
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Total task count across all phases.
    pub fn total_tasks(&self) -> usize {
        self.phase_tasks.values().sum()
    }

    fn is_valid(&self, id: TaskId) -> bool {
        self.phase_tasks
            .get(&id.phase)
            .is_some_and(|&total| id.index < total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MindMapTree, RoadmapPhase};

    fn plan(phases: &[(u32, usize)]) -> ProjectPlan {
        ProjectPlan {
            summary: String::new(),
            mind_map: MindMapTree {
                center: "Test".to_string(),
                branches: vec![],
            },
            roadmap: phases
                .iter()
                .map(|&(n, tasks)| RoadmapPhase {
                    phase_number: n,
                    title: format!("Phase {n}"),
                    percentage_range: String::new(),
                    tasks: (0..tasks).map(|i| format!("task {i}")).collect(),
                    duration: String::new(),
                })
                .collect(),
            tech_stack: vec![],
            estimated_duration: String::new(),
        }
    }

    #[test]
    fn test_toggle_is_involutive() {
        let mut tracker = ProgressTracker::new(&plan(&[(1, 3)]));
        let id = TaskId::new(1, 1);

        assert_eq!(tracker.toggle_task(id), Ok(true));
        assert!(tracker.is_complete(id));
        assert_eq!(tracker.toggle_task(id), Ok(false));
        assert!(!tracker.is_complete(id));
        assert_eq!(tracker.completed_count(), 0);
    }

    #[test]
    fn test_invalid_id_rejected_without_mutation() {
        let mut tracker = ProgressTracker::new(&plan(&[(1, 2)]));

        let bad_phase = TaskId::new(7, 0);
        let bad_index = TaskId::new(1, 2);
        assert_eq!(
            tracker.toggle_task(bad_phase),
            Err(RoadmapError::InvalidTaskId { task_id: bad_phase })
        );
        assert_eq!(
            tracker.toggle_task(bad_index),
            Err(RoadmapError::InvalidTaskId { task_id: bad_index })
        );
        assert_eq!(tracker.completed_count(), 0);
        assert_eq!(tracker.overall_progress(), 0.0);
    }

    #[test]
    fn test_two_phase_scenario_percentages() {
        // Phases of 3 and 2 tasks; complete 2 of phase 1 and 1 of phase 2
        let mut tracker = ProgressTracker::new(&plan(&[(1, 3), (2, 2)]));
        tracker.toggle_task(TaskId::new(1, 0)).unwrap();
        tracker.toggle_task(TaskId::new(1, 2)).unwrap();
        tracker.toggle_task(TaskId::new(2, 1)).unwrap();

        assert!((tracker.phase_progress(1) - 200.0 / 3.0).abs() < 1e-9);
        assert!((tracker.phase_progress(2) - 50.0).abs() < 1e-9);
        assert!((tracker.overall_progress() - 60.0).abs() < 1e-9);
        assert!(!tracker.is_phase_complete(1));
        assert!(!tracker.is_phase_complete(2));
    }

    #[test]
    fn test_zero_task_phase_progress_is_zero() {
        let tracker = ProgressTracker::new(&plan(&[(1, 0)]));
        let p = tracker.phase_progress(1);
        assert_eq!(p, 0.0);
        assert!(!p.is_nan());
        assert_eq!(tracker.overall_progress(), 0.0);
        // Unknown phase behaves the same
        assert_eq!(tracker.phase_progress(99), 0.0);
    }

    #[test]
    fn test_overall_progress_reaches_100_only_when_everything_done() {
        let source = plan(&[(1, 2), (2, 1)]);
        let mut tracker = ProgressTracker::new(&source);

        for id in source.task_ids() {
            assert!(tracker.overall_progress() < 100.0);
            tracker.toggle_task(id).unwrap();
        }
        assert_eq!(tracker.overall_progress(), 100.0);
        assert!(tracker.is_phase_complete(1));
        assert!(tracker.is_phase_complete(2));

        tracker.toggle_task(TaskId::new(2, 0)).unwrap();
        assert!(tracker.overall_progress() < 100.0);
        assert!(!tracker.is_phase_complete(2));
    }

    #[test]
    fn test_progress_stays_in_bounds() {
        let source = plan(&[(1, 4)]);
        let mut tracker = ProgressTracker::new(&source);
        for id in source.task_ids() {
            tracker.toggle_task(id).unwrap();
            let overall = tracker.overall_progress();
            assert!((0.0..=100.0).contains(&overall));
        }
    }
}
