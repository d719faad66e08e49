//! [`ScoreOracle`] – the pass-quality estimator seam.
//!
//! The play never computes pass quality itself.  It asks an oracle for an
//! opaque desirability score for passing from a source to a target and only
//! compares those scores.  Any `Fn(Point, Point) -> f64` closure is an oracle.

use playbook_types::Point;

/// Scores a pass from `source` to `target`.  Higher is better.
pub trait ScoreOracle {
    fn score(&self, source: Point, target: Point) -> f64;
}

impl<F> ScoreOracle for F
where
    F: Fn(Point, Point) -> f64,
{
    fn score(&self, source: Point, target: Point) -> f64 {
        self(source, target)
    }
}
