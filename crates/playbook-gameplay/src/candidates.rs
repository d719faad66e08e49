//! Candidate target lines.
//!
//! Each candidate is a field segment the ball may be played to, ranked by a
//! tactical priority (0 = most preferred).  Geometry is stored as
//! [`LineTemplate`] fractions of the field so the same play works on any
//! field size, and the whole set is mirrored to the far side when the ball
//! sits on the negative-`x` half.
//!
//! # Example
//!
//! ```rust
//! use playbook_gameplay::candidates::{build_candidates, reference_lines};
//! use playbook_types::{FieldGeometry, Point};
//!
//! let field = FieldGeometry::default();
//! let right = build_candidates(Point::new(2.5, 8.8), &field, &reference_lines());
//! let left = build_candidates(Point::new(-2.5, 8.8), &field, &reference_lines());
//!
//! assert_eq!(right.len(), 3);
//! assert_eq!(left[0].segment.start.x, -right[0].segment.start.x);
//! ```

use playbook_types::{FieldGeometry, Point, Segment};
use serde::{Deserialize, Serialize};

/// Reference field length the built-in depths were measured on.
const REFERENCE_LENGTH: f64 = 9.0;

/// A field-relative endpoint: `lateral` in half-widths, `depth` in lengths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldFraction {
    pub lateral: f64,
    pub depth: f64,
}

impl FieldFraction {
    pub const fn new(lateral: f64, depth: f64) -> Self {
        Self { lateral, depth }
    }

    pub fn resolve(&self, field: &FieldGeometry) -> Point {
        Point::new(self.lateral * field.width / 2.0, self.depth * field.length)
    }

    pub fn is_finite(&self) -> bool {
        self.lateral.is_finite() && self.depth.is_finite()
    }
}

/// Field-relative definition of one candidate line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineTemplate {
    pub start: FieldFraction,
    pub end: FieldFraction,
    pub priority: u32,
}

/// A candidate line resolved for the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CandidateLine {
    pub segment: Segment,
    pub priority: u32,
}

/// The three cross/center lines: far-post cross, central cut-back, near-side
/// short option, in that priority order.
pub fn reference_lines() -> Vec<LineTemplate> {
    vec![
        LineTemplate {
            start: FieldFraction::new(-0.633, 7.45 / REFERENCE_LENGTH),
            end: FieldFraction::new(-0.633, 8.5 / REFERENCE_LENGTH),
            priority: 0,
        },
        LineTemplate {
            start: FieldFraction::new(-0.187, 7.11 / REFERENCE_LENGTH),
            end: FieldFraction::new(0.147, 6.2 / REFERENCE_LENGTH),
            priority: 1,
        },
        LineTemplate {
            start: FieldFraction::new(0.8, 5.85 / REFERENCE_LENGTH),
            end: FieldFraction::new(0.633, 5.85 / REFERENCE_LENGTH),
            priority: 2,
        },
    ]
}

/// Resolve `templates` against `field`, mirrored when `ball.x < 0`.
///
/// Output order follows `templates`.
pub fn build_candidates(
    ball: Point,
    field: &FieldGeometry,
    templates: &[LineTemplate],
) -> Vec<CandidateLine> {
    let mirror = ball.x < 0.0;
    templates
        .iter()
        .map(|t| {
            let segment = Segment::new(t.start.resolve(field), t.end.resolve(field));
            CandidateLine {
                segment: if mirror { segment.mirrored_x() } else { segment },
                priority: t.priority,
            }
        })
        .collect()
}
