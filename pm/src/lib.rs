//! planmap - terminal planning surface for project ideas
//!
//! planmap turns a free-text project description into a visual plan: a
//! radial mind map drawn on a braille canvas with a timed three-stage
//! reveal, and a phased roadmap with per-task completion tracking and a
//! per-task guidance panel.
//!
//! # Core Concepts
//!
//! - **Pure geometry**: branch and subtopic positions and connector curves
//!   are referentially transparent functions of the plan
//! - **Session-scoped state**: completion, open phases, and assistant
//!   histories live in a [`roadmap::PlanSession`] that is replaced wholesale
//!   with its plan
//! - **Structural teardown**: the reveal scheduler's timers are owned by a
//!   handle that aborts them on drop
//! - **Recover, don't reject**: malformed generation payloads are
//!   default-filled and outright failure falls back to a fixed demo plan
//!
//! # Modules
//!
//! - [`domain`] - plan data model and default-filling
//! - [`layout`] - mind-map geometry and the reveal scheduler
//! - [`roadmap`] - progress tracker, selection controller, plan session
//! - [`llm`] - generation collaborator client (trait + Gemini impl)
//! - [`assistant`] - scripted per-task guidance generator
//! - [`tui`] - ratatui presentation layer
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod assistant;
pub mod cli;
pub mod config;
pub mod domain;
pub mod layout;
pub mod llm;
pub mod prompts;
pub mod roadmap;
pub mod tui;

// Re-export commonly used types
pub use config::{Config, LayoutConfig, LlmConfig};
pub use domain::{Branch, MindMapTree, ProjectPlan, RoadmapPhase, TaskId};
pub use layout::reveal::{RevealScheduler, RevealStage, stage_at};
pub use layout::{
    BranchLayout, CubicBezier, MindMapLayout, Point, SubtopicLayout, branch_position, connector_curve,
    subtopic_position,
};
pub use llm::{GenClient, GenError, GeminiClient, GenerateRequest, RequestKind, create_client};
pub use roadmap::{PlanSession, ProgressTracker, RoadmapError, SelectionController};
