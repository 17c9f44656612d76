//! Integration tests for planmap
//!
//! End-to-end behavior across the domain, layout, and roadmap components,
//! plus a CLI smoke test against the built binary.

use std::time::Duration;

use planmap::domain::{ProjectPlan, TaskId};
use planmap::layout::reveal::{RevealScheduler, RevealStage};
use planmap::layout::{MindMapLayout, Point};
use planmap::roadmap::{PlanSession, RoadmapError};
use tokio::sync::mpsc;

// =============================================================================
// Plan -> layout -> session flow
// =============================================================================

#[test]
fn test_sparse_generation_payload_yields_renderable_surface() {
    // A `{}` response must still produce a layout and a roadmap
    let plan = ProjectPlan::from_generated("my idea", &serde_json::json!({}));

    let layout = MindMapLayout::compute(&plan.mind_map, 280.0);
    assert_eq!(layout.branches.len(), 2);

    // Two branches: index 0 at the top, index 1 at the bottom, equidistant
    let top = layout.branches[0].position;
    let bottom = layout.branches[1].position;
    assert!((top.y + 280.0).abs() < 1e-9);
    assert!((bottom.y - 280.0).abs() < 1e-9);
    assert!((top.distance(Point::default()) - bottom.distance(Point::default())).abs() < 1e-9);

    let session = PlanSession::new(plan);
    assert_eq!(session.progress().total_tasks(), 3);
    assert!(session.selection().is_phase_open(1));
}

#[test]
fn test_full_session_walkthrough() {
    let mut session = PlanSession::new(ProjectPlan::demo());

    // Work through phase 1 (5 tasks)
    for index in 0..5 {
        session.toggle_task(TaskId::new(1, index)).unwrap();
    }
    assert!(session.progress().is_phase_complete(1));
    assert!((session.progress().overall_progress() - 25.0).abs() < 1e-9);

    // Untoggle one task: the phase drops back below complete
    session.toggle_task(TaskId::new(1, 4)).unwrap();
    assert!(!session.progress().is_phase_complete(1));

    // An id from a stale plan shape is rejected without corrupting state
    let before = session.progress().completed_count();
    assert!(matches!(
        session.toggle_task(TaskId::new(8, 0)),
        Err(RoadmapError::InvalidTaskId { .. })
    ));
    assert_eq!(session.progress().completed_count(), before);

    // Assistant: open on one task, ask, switch to another
    let first = TaskId::new(2, 0);
    let second = TaskId::new(2, 1);
    session.toggle_assistant(first).unwrap();
    session.ask_assistant(first, "what steps should I take?").unwrap();
    session.toggle_assistant(second).unwrap();
    assert_eq!(session.selection().active_assistant(), Some(second));
    // First panel's history survives the switch
    assert_eq!(session.history(first).len(), 3);
}

// =============================================================================
// Reveal scheduler teardown
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_reveal_full_sequence_then_replacement() {
    let (tx, mut rx) = mpsc::channel(4);
    let scheduler = RevealScheduler::start(tx);

    assert_eq!(rx.recv().await, Some(RevealStage::Appearing));
    assert_eq!(rx.recv().await, Some(RevealStage::EdgesDrawn));
    assert_eq!(rx.recv().await, Some(RevealStage::LeavesShown));

    // A new plan replaces the scheduler; the old one is simply dropped
    drop(scheduler);
    let (tx2, mut rx2) = mpsc::channel(4);
    let _second = RevealScheduler::start(tx2);
    assert_eq!(rx2.recv().await, Some(RevealStage::Appearing));
}

#[tokio::test(start_paused = true)]
async fn test_reveal_teardown_midway_fires_nothing_more() {
    let (tx, mut rx) = mpsc::channel(4);
    let scheduler = RevealScheduler::start(tx);

    // Stage 1 at 300ms
    assert_eq!(rx.recv().await, Some(RevealStage::Appearing));

    // Tear down at ~500ms, before stage 2 at 800ms
    tokio::time::sleep(Duration::from_millis(200)).await;
    drop(scheduler);

    // However long we wait, stages 2 and 3 never arrive
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(rx.recv().await, None);
}

// =============================================================================
// CLI smoke tests
// =============================================================================

mod cli {
    use assert_cmd::Command;
    use predicates::prelude::*;

    #[test]
    fn test_help_runs() {
        Command::cargo_bin("pm")
            .unwrap()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("generate"));
    }

    #[test]
    fn test_generate_offline_prints_demo_plan() {
        Command::cargo_bin("pm")
            .unwrap()
            .args(["generate", "anything", "--offline"])
            .assert()
            .success()
            .stdout(predicate::str::contains("AT Crawler"))
            .stdout(predicate::str::contains("\"roadmap\""));
    }
}
