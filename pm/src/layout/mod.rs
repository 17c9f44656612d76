//! Mind-map geometry engine
//!
//! Pure functions mapping the mind-map tree to a coordinate/path table:
//! branches are spaced evenly around a circle (index 0 at the top, clockwise),
//! the first three subtopics of each branch fan out around the parent's ray,
//! and every edge is a cubic bezier bowed away from the straight line.
//!
//! Everything here is referentially transparent; identical inputs always
//! yield identical tables, so layouts snapshot-test cleanly. Decorative
//! randomness lives in the presentation layer, never here.

pub mod reveal;

use crate::domain::MindMapTree;

/// Distance from the center to each branch node.
pub const BRANCH_RADIUS: f64 = 280.0;

/// Subtopics sit this much further out than their parent branch.
pub const SUBTOPIC_RADIUS_OFFSET: f64 = 120.0;

/// Angular step between adjacent subtopics of one branch, in degrees.
pub const SUBTOPIC_FAN_STEP_DEG: f64 = 15.0;

/// Only the first three subtopics of a branch are placed.
pub const PLACED_SUBTOPICS: usize = 3;

/// Curvature of center-to-branch connectors.
pub const BRANCH_CURVATURE: f64 = 0.4;

/// Curvature of branch-to-subtopic connectors (shallower).
pub const SUBTOPIC_CURVATURE: f64 = 0.3;

/// A point relative to the diagram center.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Angle of branch `index` out of `total`, in degrees.
///
/// Index 0 points straight up (-90°); successive indices proceed clockwise.
pub fn branch_angle_deg(index: usize, total: usize) -> f64 {
    debug_assert!(total > 0, "branch_angle_deg requires at least one branch");
    (360.0 / total as f64) * index as f64 - 90.0
}

/// Position of branch `index` out of `total` at the given radius.
///
/// Requires `total > 0`; a tree with no branches skips layout entirely
/// (see [`MindMapLayout::compute`]).
pub fn branch_position(index: usize, total: usize, radius: f64) -> Point {
    let angle = branch_angle_deg(index, total).to_radians();
    Point::new(radius * angle.cos(), radius * angle.sin())
}

/// Position of subtopic `sub_index` (0..=2) of a branch at `branch_angle_deg`.
///
/// The three children straddle the parent's ray at offsets of -15°, 0°, +15°,
/// evaluated at the subtopic radius.
pub fn subtopic_position(branch_angle_deg: f64, sub_index: usize, sub_radius: f64) -> Point {
    let angle = (branch_angle_deg + (sub_index as f64 - 1.0) * SUBTOPIC_FAN_STEP_DEG).to_radians();
    Point::new(sub_radius * angle.cos(), sub_radius * angle.sin())
}

/// A cubic bezier connector between two nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub start: Point,
    pub ctrl1: Point,
    pub ctrl2: Point,
    pub end: Point,
}

impl CubicBezier {
    /// Evaluate the curve at `t` in `[0, 1]`.
    pub fn point_at(&self, t: f64) -> Point {
        let u = 1.0 - t;
        let b0 = u * u * u;
        let b1 = 3.0 * u * u * t;
        let b2 = 3.0 * u * t * t;
        let b3 = t * t * t;
        Point::new(
            b0 * self.start.x + b1 * self.ctrl1.x + b2 * self.ctrl2.x + b3 * self.end.x,
            b0 * self.start.y + b1 * self.ctrl1.y + b2 * self.ctrl2.y + b3 * self.end.y,
        )
    }

    /// Sample the curve into `segments + 1` evenly-parameterized points.
    pub fn sample(&self, segments: usize) -> Vec<Point> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.point_at(i as f64 / segments as f64))
            .collect()
    }
}

/// Build the S-curve connector between two endpoints.
///
/// Control points are pushed `curvature` of the way along the line direction
/// and a fixed 0.1 fraction perpendicular to it, which bows the connector
/// into a gentle S rather than a straight segment.
pub fn connector_curve(start: Point, end: Point, curvature: f64) -> CubicBezier {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    CubicBezier {
        start,
        ctrl1: Point::new(start.x + dx * curvature + dy * 0.1, start.y + dy * curvature - dx * 0.1),
        ctrl2: Point::new(end.x - dx * curvature + dy * 0.1, end.y - dy * curvature - dx * 0.1),
        end,
    }
}

/// One placed subtopic with its connector back to the parent branch.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtopicLayout {
    pub label: String,
    pub position: Point,
    pub edge: CubicBezier,
}

/// One placed branch with its connector back to the center.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchLayout {
    pub index: usize,
    pub title: String,
    pub angle_deg: f64,
    pub position: Point,
    pub edge: CubicBezier,
    pub subtopics: Vec<SubtopicLayout>,
}

/// The full coordinate/path table for one mind-map tree.
#[derive(Debug, Clone, PartialEq)]
pub struct MindMapLayout {
    pub center_label: String,
    pub branch_radius: f64,
    pub branches: Vec<BranchLayout>,
}

impl MindMapLayout {
    /// Compute the table for `tree` with branches at `radius`.
    ///
    /// An empty branch list produces an empty table (layout is skipped, never
    /// a division by zero).
    pub fn compute(tree: &MindMapTree, radius: f64) -> Self {
        let center = Point::default();
        let total = tree.branches.len();
        let branches = tree
            .branches
            .iter()
            .enumerate()
            .map(|(index, branch)| {
                let angle_deg = branch_angle_deg(index, total);
                let position = branch_position(index, total, radius);
                let sub_radius = radius + SUBTOPIC_RADIUS_OFFSET;
                let subtopics = branch
                    .subtopics
                    .iter()
                    .take(PLACED_SUBTOPICS)
                    .enumerate()
                    .map(|(sub_index, label)| {
                        let sub_position = subtopic_position(angle_deg, sub_index, sub_radius);
                        SubtopicLayout {
                            label: label.clone(),
                            position: sub_position,
                            edge: connector_curve(position, sub_position, SUBTOPIC_CURVATURE),
                        }
                    })
                    .collect();
                BranchLayout {
                    index,
                    title: branch.title.clone(),
                    angle_deg,
                    position,
                    edge: connector_curve(center, position, BRANCH_CURVATURE),
                    subtopics,
                }
            })
            .collect();
        Self {
            center_label: tree.center.clone(),
            branch_radius: radius,
            branches,
        }
    }

    /// Half-extent of the drawn area, center included.
    pub fn bound(&self) -> f64 {
        self.branch_radius + SUBTOPIC_RADIUS_OFFSET
    }
}
