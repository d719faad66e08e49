use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A position on the field, in metres.
///
/// `x` is lateral (across the field width, `0` on the long axis) and `y` runs
/// along the field length from our goal line (`y = 0`) to the opponent goal
/// line (`y = length`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Reflect across the field's long axis (`x → -x`).
    pub fn mirrored_x(self) -> Self {
        Self::new(-self.x, self.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// A line segment between two field points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// The point at parameter `t` along the segment: `t = 0` is `start`,
    /// `t = 1` is `end`.
    pub fn point_at(&self, t: f64) -> Point {
        Point::new(
            self.start.x + (self.end.x - self.start.x) * t,
            self.start.y + (self.end.y - self.start.y) * t,
        )
    }

    /// The midpoint of the segment.
    pub fn center(&self) -> Point {
        self.point_at(0.5)
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(self.end)
    }

    /// Shortest distance from `p` to any point on the segment.
    pub fn distance_to(&self, p: Point) -> f64 {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        let len_sq = dx * dx + dy * dy;
        if len_sq <= f64::EPSILON {
            return self.start.distance_to(p);
        }
        let t = (((p.x - self.start.x) * dx + (p.y - self.start.y) * dy) / len_sq).clamp(0.0, 1.0);
        self.point_at(t).distance_to(p)
    }

    /// Reflect both endpoints across the field's long axis.
    pub fn mirrored_x(&self) -> Self {
        Self::new(self.start.mirrored_x(), self.end.mirrored_x())
    }
}

/// Identity of a physical robot (its shell number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RobotId(pub u32);

impl fmt::Display for RobotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Field dimensions, in metres.
///
/// Construct through [`FieldGeometry::new`] to get dimension validation;
/// deserialized values should be re-checked with [`FieldGeometry::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldGeometry {
    pub width: f64,
    pub length: f64,
    pub goal_width: f64,
}

impl FieldGeometry {
    pub fn new(width: f64, length: f64, goal_width: f64) -> Result<Self, PlayError> {
        let field = Self {
            width,
            length,
            goal_width,
        };
        field.validate()?;
        Ok(field)
    }

    /// Reject zero, negative, or non-finite dimensions.
    pub fn validate(&self) -> Result<(), PlayError> {
        for (name, value) in [
            ("width", self.width),
            ("length", self.length),
            ("goal_width", self.goal_width),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PlayError::Configuration(format!(
                    "field {name} must be a positive finite number, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// The opponent goal mouth, on the far goal line.
    pub fn their_goal_segment(&self) -> Segment {
        let half = self.goal_width / 2.0;
        Segment::new(
            Point::new(-half, self.length),
            Point::new(half, self.length),
        )
    }
}

impl Default for FieldGeometry {
    /// The 9 m × 6 m reference field with a 1 m goal.
    fn default() -> Self {
        Self {
            width: 6.0,
            length: 9.0,
            goal_width: 1.0,
        }
    }
}

/// Error type shared by the play, its collaborators, and the harness.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayError {
    /// Degenerate configuration or geometry; the play must not run.
    #[error("Configuration Error: {0}")]
    Configuration(String),

    #[error("Configuration Error: candidate set is empty")]
    EmptyCandidateSet,

    /// A sub-task could not be built or attached this tick.
    #[error("Transient Task Failure: {0}")]
    TransientTask(String),

    #[error("Binding Lost on robot {robot}: {reason}")]
    BindingLoss { robot: RobotId, reason: String },

    #[error("Play is not active")]
    Inactive,
}

impl PlayError {
    /// `true` for errors that must stop the play from activating.
    pub fn is_configuration(&self) -> bool {
        matches!(self, PlayError::Configuration(_) | PlayError::EmptyCandidateSet)
    }
}
