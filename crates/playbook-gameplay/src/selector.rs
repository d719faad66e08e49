//! Priority-weighted target selection.
//!
//! Selection runs in two passes:
//!
//! 1. **Per line** – [`best_point_on_line`] scores the two endpoints and the
//!    midpoint of a [`CandidateLine`] and keeps the best.
//! 2. **Across lines** – [`select`] subtracts a linear priority penalty from
//!    each line's best score and picks the maximum.  A lower-priority line
//!    can still win, but only if its raw pass quality beats the preferred
//!    line by more than the penalty gap.
//!
//! The penalty step is `minimum_multiplier / (n - 1)` for `n` candidates, so
//! the lowest-priority line of an evenly ranked set pays exactly
//! `minimum_multiplier`.
//!
//! # Tie-breaking
//!
//! Within a line, a later point replaces the current best only when it
//! scores strictly higher (order: endpoint 0, endpoint 1, midpoint).  Across
//! lines, equal effective scores go to the lowest priority value and then to
//! the earliest candidate.  Scores that are NaN are treated as `-∞`.

use playbook_types::{PlayError, Point};
use serde::Serialize;
use tracing::debug;

use crate::candidates::CandidateLine;
use crate::oracle::ScoreOracle;

/// A point together with the oracle's score for passing to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredPoint {
    pub point: Point,
    pub score: f64,
}

/// Linear priority decay shared by every candidate of one selection.
///
/// Two views of the same ranking: [`penalty`][Self::penalty] is what
/// [`select`] subtracts from a line's score, and
/// [`multiplier`][Self::multiplier] runs from `1.0` at priority 0 down to
/// `minimum_multiplier` at the lowest rank.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorityDecay {
    increment: f64,
    multiplier_step: f64,
}

impl PriorityDecay {
    /// Decay for `candidate_count` candidates, lowest priority paying
    /// `minimum_multiplier`.
    pub fn new(minimum_multiplier: f64, candidate_count: usize) -> Self {
        Self {
            increment: multiplier_increment(minimum_multiplier, candidate_count),
            multiplier_step: multiplier_increment(1.0 - minimum_multiplier, candidate_count),
        }
    }

    pub fn increment(&self) -> f64 {
        self.increment
    }

    /// Score subtracted from a candidate of rank `priority`.
    pub fn penalty(&self, priority: u32) -> f64 {
        self.increment * f64::from(priority)
    }

    /// `1.0` at priority 0, `minimum_multiplier` at priority `n - 1`.
    pub fn multiplier(&self, priority: u32) -> f64 {
        1.0 - self.multiplier_step * f64::from(priority)
    }
}

/// The outcome of one selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Selection {
    pub point: Point,
    pub priority: u32,
    pub raw_score: f64,
    pub effective_score: f64,
    /// Index of the winning line in the candidate list.
    pub candidate_index: usize,
}

/// Penalty step between adjacent priorities.  Zero when there is at most one
/// candidate.
pub fn multiplier_increment(minimum_multiplier: f64, candidate_count: usize) -> f64 {
    if candidate_count > 1 {
        minimum_multiplier / (candidate_count - 1) as f64
    } else {
        0.0
    }
}

fn sanitize(score: f64) -> f64 {
    if score.is_nan() { f64::NEG_INFINITY } else { score }
}

/// Best of endpoint 0, endpoint 1, and midpoint of `line`, scored from `ball`.
pub fn best_point_on_line(
    ball: Point,
    line: &CandidateLine,
    oracle: &dyn ScoreOracle,
) -> ScoredPoint {
    let probes = [line.segment.start, line.segment.end, line.segment.center()];
    let mut best = ScoredPoint {
        point: probes[0],
        score: sanitize(oracle.score(ball, probes[0])),
    };
    for &point in &probes[1..] {
        let score = sanitize(oracle.score(ball, point));
        if score > best.score {
            best = ScoredPoint { point, score };
        }
    }
    best
}

/// Choose the target point among `candidates`.
///
/// # Errors
///
/// Returns [`PlayError::EmptyCandidateSet`] when `candidates` is empty.
pub fn select(
    ball: Point,
    candidates: &[CandidateLine],
    oracle: &dyn ScoreOracle,
    minimum_multiplier: f64,
) -> Result<Selection, PlayError> {
    if candidates.is_empty() {
        return Err(PlayError::EmptyCandidateSet);
    }
    let decay = PriorityDecay::new(minimum_multiplier, candidates.len());

    let mut winner: Option<Selection> = None;
    for (index, line) in candidates.iter().enumerate() {
        let best = best_point_on_line(ball, line, oracle);
        let effective = best.score - decay.penalty(line.priority);
        debug!(
            index,
            priority = line.priority,
            x = best.point.x,
            y = best.point.y,
            raw = best.score,
            effective,
            "scored candidate line"
        );

        let better = match &winner {
            None => true,
            Some(w) => {
                effective > w.effective_score
                    || (effective == w.effective_score && line.priority < w.priority)
            }
        };
        if better {
            winner = Some(Selection {
                point: best.point,
                priority: line.priority,
                raw_score: best.score,
                effective_score: effective,
                candidate_index: index,
            });
        }
    }
    winner.ok_or(PlayError::EmptyCandidateSet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use playbook_types::Segment;

    fn line(start: Point, end: Point, priority: u32) -> CandidateLine {
        CandidateLine {
            segment: Segment::new(start, end),
            priority,
        }
    }

    /// Oracle returning fixed scores for known points and `0.0` elsewhere.
    fn table(entries: Vec<(Point, f64)>) -> impl Fn(Point, Point) -> f64 {
        move |_, target| {
            entries
                .iter()
                .find(|(p, _)| *p == target)
                .map(|(_, s)| *s)
                .unwrap_or(0.0)
        }
    }

    #[test]
    fn increment_divides_by_n_minus_one() {
        assert!((multiplier_increment(0.5, 2) - 0.5).abs() < 1e-12);
        assert!((multiplier_increment(0.5, 3) - 0.25).abs() < 1e-12);
        assert!((multiplier_increment(0.5, 6) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn single_candidate_has_no_penalty() {
        assert_eq!(multiplier_increment(0.5, 1), 0.0);
        assert_eq!(multiplier_increment(0.5, 0), 0.0);

        let only = line(Point::new(0.0, 1.0), Point::new(0.0, 3.0), 4);
        let oracle = |_: Point, t: Point| t.y;
        let sel = select(Point::default(), &[only], &oracle, 0.5).unwrap();
        assert_eq!(sel.effective_score, sel.raw_score);
        assert_eq!(sel.point, Point::new(0.0, 3.0));
    }

    #[test]
    fn decay_multiplier_is_non_increasing() {
        let decay = PriorityDecay::new(0.5, 3);
        assert_eq!(decay.multiplier(0), 1.0);
        assert!((decay.multiplier(2) - 0.5).abs() < 1e-12);
        for p in 0..5 {
            assert!(decay.multiplier(p + 1) <= decay.multiplier(p));
        }
    }

    #[test]
    fn decay_multiplier_bottoms_out_at_minimum() {
        let decay = PriorityDecay::new(0.3, 3);
        assert_eq!(decay.multiplier(0), 1.0);
        assert!((decay.multiplier(1) - 0.65).abs() < 1e-12);
        assert!((decay.multiplier(2) - 0.3).abs() < 1e-12);
        assert!((decay.penalty(2) - 0.3).abs() < 1e-12);

        let steep = PriorityDecay::new(0.8, 2);
        assert!((steep.multiplier(1) - 0.8).abs() < 1e-12);

        let single = PriorityDecay::new(0.3, 1);
        assert_eq!(single.multiplier(0), 1.0);
        assert_eq!(single.penalty(0), 0.0);
    }

    #[test]
    fn best_point_picks_highest_of_three() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(2.0, 0.0);
        let mid = Point::new(1.0, 0.0);
        let oracle = table(vec![(a, 5.0), (b, 9.0), (mid, 3.0)]);
        let best = best_point_on_line(Point::default(), &line(a, b, 0), &oracle);
        assert_eq!(best.point, b);
        assert_eq!(best.score, 9.0);
    }

    #[test]
    fn best_point_ties_keep_first_evaluated() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(2.0, 0.0);
        let oracle = |_: Point, _: Point| 1.0;
        let best = best_point_on_line(Point::default(), &line(a, b, 0), &oracle);
        assert_eq!(best.point, a);

        let mid = Point::new(1.0, 0.0);
        let oracle = table(vec![(a, 1.0), (b, 4.0), (mid, 4.0)]);
        assert_eq!(best_point_on_line(Point::default(), &line(a, b, 0), &oracle).point, b);
    }

    #[test]
    fn nan_scores_never_win() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(2.0, 0.0);
        let mid = Point::new(1.0, 0.0);
        let oracle = table(vec![(a, f64::NAN), (b, -3.0), (mid, f64::NAN)]);
        let best = best_point_on_line(Point::default(), &line(a, b, 0), &oracle);
        assert_eq!(best.point, b);
    }

    #[test]
    fn equal_raw_scores_differ_by_one_increment() {
        let oracle = |_: Point, _: Point| 7.0;
        let first = line(Point::new(0.0, 0.0), Point::new(1.0, 0.0), 0);
        let second = line(Point::new(0.0, 5.0), Point::new(1.0, 5.0), 1);
        let decay = PriorityDecay::new(0.5, 2);

        let e0 = best_point_on_line(Point::default(), &first, &oracle).score - decay.penalty(0);
        let e1 = best_point_on_line(Point::default(), &second, &oracle).score - decay.penalty(1);
        assert!(e0 > e1);
        assert!((e0 - e1 - decay.increment()).abs() < 1e-12);

        let sel = select(Point::default(), &[first, second], &oracle, 0.5).unwrap();
        assert_eq!(sel.priority, 0);
    }

    #[test]
    fn priority_gap_outweighs_small_raw_advantage() {
        // Line A best 10.0 at priority 0, line B best 10.4 at priority 1.
        // increment = 0.5 / (2 - 1) = 0.5 → A: 10.0, B: 9.9.
        let a = line(Point::new(-1.0, 7.0), Point::new(-1.0, 8.0), 0);
        let b = line(Point::new(1.0, 6.0), Point::new(2.0, 6.0), 1);
        let oracle = table(vec![
            (Point::new(-1.0, 7.0), 10.0),
            (Point::new(-1.0, 8.0), 2.0),
            (Point::new(-1.0, 7.5), 1.0),
            (Point::new(1.0, 6.0), 10.4),
            (Point::new(2.0, 6.0), 3.0),
            (Point::new(1.5, 6.0), 4.0),
        ]);

        let sel = select(Point::default(), &[a, b], &oracle, 0.5).unwrap();
        assert_eq!(sel.candidate_index, 0);
        assert_eq!(sel.point, Point::new(-1.0, 7.0));
        assert!((sel.effective_score - 10.0).abs() < 1e-12);
    }

    #[test]
    fn large_raw_advantage_beats_priority() {
        let a = line(Point::new(0.0, 1.0), Point::new(0.0, 2.0), 0);
        let b = line(Point::new(3.0, 1.0), Point::new(3.0, 2.0), 1);
        let oracle = |_: Point, t: Point| if t.x > 1.0 { 11.0 } else { 10.0 };
        let sel = select(Point::default(), &[a, b], &oracle, 0.5).unwrap();
        assert_eq!(sel.priority, 1);
        assert!((sel.effective_score - 10.5).abs() < 1e-12);
    }

    #[test]
    fn effective_ties_go_to_lowest_priority() {
        // Listed out of priority order; both end at effective 9.0.
        let low = line(Point::new(5.0, 0.0), Point::new(6.0, 0.0), 1);
        let high = line(Point::new(0.0, 0.0), Point::new(1.0, 0.0), 0);
        let oracle = |_: Point, t: Point| if t.x >= 5.0 { 9.5 } else { 9.0 };
        let sel = select(Point::default(), &[low, high], &oracle, 0.5).unwrap();
        assert_eq!(sel.priority, 0);
        assert_eq!(sel.candidate_index, 1);
    }

    #[test]
    fn effective_ties_at_same_priority_go_to_earliest() {
        let first = line(Point::new(0.0, 0.0), Point::new(1.0, 0.0), 0);
        let second = line(Point::new(4.0, 0.0), Point::new(5.0, 0.0), 0);
        let oracle = |_: Point, _: Point| 2.0;
        let sel = select(Point::default(), &[first, second], &oracle, 0.5).unwrap();
        assert_eq!(sel.candidate_index, 0);
    }

    #[test]
    fn empty_candidates_fail_fast() {
        let oracle = |_: Point, _: Point| 1.0;
        let err = select(Point::default(), &[], &oracle, 0.5).unwrap_err();
        assert_eq!(err, PlayError::EmptyCandidateSet);
    }
}
