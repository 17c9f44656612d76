//! Project plan record
//!
//! The plan is produced by the generation collaborator as loosely-typed JSON.
//! [`ProjectPlan::from_generated`] fills in any missing or wrong-typed field
//! with a sensible skeleton instead of rejecting the payload, so the surface
//! always has a valid structure to render. [`ProjectPlan::demo`] is the fixed
//! fallback plan substituted when generation fails outright.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::TaskId;

/// A complete generated project plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPlan {
    /// Generated project description
    #[serde(rename = "projectIdea")]
    pub summary: String,
    pub mind_map: MindMapTree,
    pub roadmap: Vec<RoadmapPhase>,
    pub tech_stack: Vec<String>,
    #[serde(rename = "estimatedTime")]
    pub estimated_duration: String,
}

/// The radial concept diagram: a center label plus ordered branches.
///
/// Branch order is meaningful: it determines angular position, index 0 at the
/// top of the circle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindMapTree {
    pub center: String,
    pub branches: Vec<Branch>,
}

/// A top-level category under the mind-map center.
///
/// Only the first three subtopics are geometrically placed; extra subtopics
/// are valid data that the layout intentionally truncates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub title: String,
    pub subtopics: Vec<String>,
}

/// One ordered segment of the roadmap.
///
/// `phase_number` is the ordering key for task identity and need not be
/// contiguous; display order follows array order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapPhase {
    #[serde(rename = "phase")]
    pub phase_number: u32,
    pub title: String,
    #[serde(rename = "percentage")]
    pub percentage_range: String,
    pub tasks: Vec<String>,
    pub duration: String,
}

impl ProjectPlan {
    /// Assemble a plan from a generated JSON payload, filling defaults for
    /// every missing or wrong-typed field.
    ///
    /// `prompt` is the original user prompt, woven into the fallback strings.
    pub fn from_generated(prompt: &str, value: &Value) -> Self {
        debug!(prompt_len = prompt.len(), "ProjectPlan::from_generated: called");

        let summary = value
            .get("projectIdea")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Project analysis for: {prompt}"));

        let center = value
            .pointer("/mindMap/center")
            .and_then(Value::as_str)
            .unwrap_or(prompt)
            .to_string();

        let branches = match value.pointer("/mindMap/branches").and_then(Value::as_array) {
            Some(items) => items.iter().map(Branch::from_value).collect(),
            None => {
                debug!("ProjectPlan::from_generated: branches missing, using skeleton");
                default_branches()
            }
        };

        let roadmap = match value.get("roadmap").and_then(Value::as_array) {
            Some(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| RoadmapPhase::from_value(i, item))
                .collect(),
            None => {
                debug!("ProjectPlan::from_generated: roadmap missing, using skeleton");
                default_roadmap()
            }
        };

        let tech_stack = match value.get("techStack").and_then(Value::as_array) {
            Some(items) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            None => default_tech_stack(),
        };

        let estimated_duration = value
            .get("estimatedTime")
            .and_then(Value::as_str)
            .unwrap_or("4-6 weeks")
            .to_string();

        Self {
            summary,
            mind_map: MindMapTree { center, branches },
            roadmap,
            tech_stack,
            estimated_duration,
        }
    }

    /// The fixed demo plan substituted when generation fails.
    ///
    /// Always the same plan, never regenerated per call, so the layout and
    /// roadmap have a fully-specified structure to fall back on.
    pub fn demo() -> Self {
        Self {
            summary: "Austrian Market Webcrawler\n\nAn intelligent system for local businesses \
                      to automatically find competitor events and actions within a 15km radius."
                .to_string(),
            mind_map: MindMapTree {
                center: "AT Crawler".to_string(),
                branches: vec![
                    Branch {
                        title: "Crawling".to_string(),
                        subtopics: strings(&["Web Scraping", "API", "Automation"]),
                    },
                    Branch {
                        title: "Targeting".to_string(),
                        subtopics: strings(&["Bakery", "Butchery", "Local", "Events"]),
                    },
                    Branch {
                        title: "Location".to_string(),
                        subtopics: strings(&["15km Radius", "GPS", "Maps"]),
                    },
                    Branch {
                        title: "Results".to_string(),
                        subtopics: strings(&["Actions", "News", "Events", "Competition"]),
                    },
                ],
            },
            roadmap: vec![
                RoadmapPhase {
                    phase_number: 1,
                    title: "Setup & Planning".to_string(),
                    percentage_range: "0-25%".to_string(),
                    tasks: strings(&[
                        "Create project repository",
                        "Initialize web app",
                        "Configure build tooling",
                        "Set up styling",
                        "Plan project structure",
                    ]),
                    duration: "1-2 weeks".to_string(),
                },
                RoadmapPhase {
                    phase_number: 2,
                    title: "Frontend Development".to_string(),
                    percentage_range: "25-60%".to_string(),
                    tasks: strings(&[
                        "Develop UI components",
                        "Implement routing",
                        "Set up state management",
                        "API integration",
                        "Responsive design",
                    ]),
                    duration: "3-4 weeks".to_string(),
                },
                RoadmapPhase {
                    phase_number: 3,
                    title: "Backend Development".to_string(),
                    percentage_range: "60-85%".to_string(),
                    tasks: strings(&[
                        "Set up HTTP server",
                        "Create database schema",
                        "Develop API endpoints",
                        "Implement authentication",
                        "Testing & validation",
                    ]),
                    duration: "2-3 weeks".to_string(),
                },
                RoadmapPhase {
                    phase_number: 4,
                    title: "Deployment & Launch".to_string(),
                    percentage_range: "85-100%".to_string(),
                    tasks: strings(&[
                        "Production build",
                        "Database migration",
                        "Environment configuration",
                        "Domain & SSL setup",
                        "Monitoring & analytics",
                    ]),
                    duration: "1 week".to_string(),
                },
            ],
            tech_stack: strings(&["React", "Next.js", "TypeScript", "Node.js", "PostgreSQL"]),
            estimated_duration: "7-10 weeks".to_string(),
        }
    }

    /// Look up a phase by its phase number.
    pub fn phase(&self, phase_number: u32) -> Option<&RoadmapPhase> {
        self.roadmap.iter().find(|p| p.phase_number == phase_number)
    }

    /// The task text a TaskId refers to, if it exists in this plan.
    pub fn task_text(&self, id: TaskId) -> Option<&str> {
        self.phase(id.phase)?.tasks.get(id.index).map(String::as_str)
    }

    /// Whether a TaskId names an existing phase/index in this plan.
    pub fn contains_task(&self, id: TaskId) -> bool {
        self.task_text(id).is_some()
    }

    /// Total task count across all phases.
    pub fn total_tasks(&self) -> usize {
        self.roadmap.iter().map(|p| p.tasks.len()).sum()
    }

    /// All valid TaskIds for this plan, in display order.
    pub fn task_ids(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.roadmap
            .iter()
            .flat_map(|p| (0..p.tasks.len()).map(|i| TaskId::new(p.phase_number, i)))
    }
}

impl Branch {
    /// Tolerant read of a single branch entry.
    fn from_value(value: &Value) -> Self {
        Self {
            title: value
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or("Topic")
                .to_string(),
            subtopics: value
                .get("subtopics")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

impl RoadmapPhase {
    /// Tolerant read of a single roadmap phase; `position` numbers phases
    /// that arrive without one.
    fn from_value(position: usize, value: &Value) -> Self {
        let phase_number = value
            .get("phase")
            .and_then(Value::as_u64)
            .map(|n| n as u32)
            .unwrap_or(position as u32 + 1);
        Self {
            phase_number,
            title: value
                .get("title")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Phase {phase_number}")),
            percentage_range: value
                .get("percentage")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string(),
            tasks: value
                .get("tasks")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            duration: value
                .get("duration")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string(),
        }
    }
}

fn default_branches() -> Vec<Branch> {
    vec![
        Branch {
            title: "Frontend".to_string(),
            subtopics: strings(&["React", "TypeScript", "Design"]),
        },
        Branch {
            title: "Backend".to_string(),
            subtopics: strings(&["API", "Database", "Server"]),
        },
    ]
}

fn default_roadmap() -> Vec<RoadmapPhase> {
    vec![RoadmapPhase {
        phase_number: 1,
        title: "Planning".to_string(),
        percentage_range: "0-25%".to_string(),
        tasks: strings(&["Setup", "Design", "Architecture"]),
        duration: "1-2 weeks".to_string(),
    }]
}

fn default_tech_stack() -> Vec<String> {
    strings(&["React", "Next.js", "TypeScript"])
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
