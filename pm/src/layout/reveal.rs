//! Timed reveal sequencing for the mind-map diagram
//!
//! One sequence per diagram instance, three ordered stages at fixed offsets:
//! the center and branches fade in, the connectors settle from dashed to
//! solid, the subtopic leaves appear. The sequence is monotonic; it restarts
//! only when the diagram itself is recreated for a new plan.
//!
//! The scheduler owns its timers through a tokio task that is aborted on
//! drop, so a diagram torn down between stages can never receive a late
//! stage callback. Teardown safety is structural, not cleanup discipline.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Offset of the appear stage from sequence start.
pub const APPEAR_AT: Duration = Duration::from_millis(300);

/// Offset of the edges-drawn stage.
pub const EDGES_AT: Duration = Duration::from_millis(800);

/// Offset of the leaves-shown stage.
pub const LEAVES_AT: Duration = Duration::from_millis(1500);

/// Visibility stage of the diagram, in firing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum RevealStage {
    /// Nothing drawn yet
    #[default]
    Hidden,
    /// Center and branch nodes visible
    Appearing,
    /// Connectors drawn solid
    EdgesDrawn,
    /// Subtopic leaves visible
    LeavesShown,
}

/// The stage a sequence has reached `elapsed` after its start.
///
/// Pure companion to [`RevealScheduler`]; the scheduler fires the same
/// transitions in real time.
pub fn stage_at(elapsed: Duration) -> RevealStage {
    if elapsed >= LEAVES_AT {
        RevealStage::LeavesShown
    } else if elapsed >= EDGES_AT {
        RevealStage::EdgesDrawn
    } else if elapsed >= APPEAR_AT {
        RevealStage::Appearing
    } else {
        RevealStage::Hidden
    }
}

/// Cancellable driver for one reveal sequence.
///
/// Sends each stage over the channel as its offset elapses. Dropping the
/// scheduler aborts the timer task; stages that have not fired never will.
#[derive(Debug)]
pub struct RevealScheduler {
    task: JoinHandle<()>,
}

impl RevealScheduler {
    /// Start a new sequence, delivering stages to `tx`.
    pub fn start(tx: mpsc::Sender<RevealStage>) -> Self {
        debug!("RevealScheduler::start: called");
        let task = tokio::spawn(async move {
            let started = tokio::time::Instant::now();
            let stages = [
                (APPEAR_AT, RevealStage::Appearing),
                (EDGES_AT, RevealStage::EdgesDrawn),
                (LEAVES_AT, RevealStage::LeavesShown),
            ];
            for (offset, stage) in stages {
                tokio::time::sleep_until(started + offset).await;
                debug!(?stage, "RevealScheduler: stage fired");
                if tx.send(stage).await.is_err() {
                    debug!("RevealScheduler: receiver gone, stopping");
                    break;
                }
            }
        });
        Self { task }
    }

    /// Cancel the sequence explicitly. Equivalent to dropping the scheduler.
    pub fn cancel(self) {
        debug!("RevealScheduler::cancel: called");
        // Drop impl aborts the task
    }
}

impl Drop for RevealScheduler {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_at_boundaries() {
        assert_eq!(stage_at(Duration::ZERO), RevealStage::Hidden);
        assert_eq!(stage_at(Duration::from_millis(299)), RevealStage::Hidden);
        assert_eq!(stage_at(APPEAR_AT), RevealStage::Appearing);
        assert_eq!(stage_at(Duration::from_millis(799)), RevealStage::Appearing);
        assert_eq!(stage_at(EDGES_AT), RevealStage::EdgesDrawn);
        assert_eq!(stage_at(LEAVES_AT), RevealStage::LeavesShown);
        assert_eq!(stage_at(Duration::from_secs(60)), RevealStage::LeavesShown);
    }

    #[test]
    fn test_stages_are_ordered() {
        assert!(RevealStage::Hidden < RevealStage::Appearing);
        assert!(RevealStage::Appearing < RevealStage::EdgesDrawn);
        assert!(RevealStage::EdgesDrawn < RevealStage::LeavesShown);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduler_fires_all_stages_in_order() {
        let (tx, mut rx) = mpsc::channel(4);
        let _scheduler = RevealScheduler::start(tx);

        assert_eq!(rx.recv().await, Some(RevealStage::Appearing));
        assert_eq!(rx.recv().await, Some(RevealStage::EdgesDrawn));
        assert_eq!(rx.recv().await, Some(RevealStage::LeavesShown));
        // Channel closes once the task finishes
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_between_stages_suppresses_the_rest() {
        let (tx, mut rx) = mpsc::channel(4);
        let scheduler = RevealScheduler::start(tx);

        // Let stage 1 fire, then tear down at ~500ms
        assert_eq!(rx.recv().await, Some(RevealStage::Appearing));
        tokio::time::sleep(Duration::from_millis(200)).await;
        scheduler.cancel();

        // Stages 2 and 3 must never arrive; the sender side is gone
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_like_explicit_cancel() {
        let (tx, mut rx) = mpsc::channel(4);
        {
            let _scheduler = RevealScheduler::start(tx);
            // Torn down before the first offset elapses
        }
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(rx.recv().await, None);
    }
}
