//! Running counters for a play.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::selector::Selection;

/// Counters accumulated across every cycle since the play was built.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayMetrics {
    /// Tasks attached (one per successful selection).
    pub cycles_started: u64,
    /// Tasks torn down after reporting completion.
    pub cycles_completed: u64,
    pub task_restarts: u64,
    /// Ticks on which the task factory refused to build a task.
    pub task_failures: u64,
    pub robots_bound: u64,
    pub binding_losses: u64,
    pub last_cycle_completed_at: Option<DateTime<Utc>>,
    pub last_selection: Option<Selection>,
}

impl PlayMetrics {
    pub fn record_selection(&mut self, selection: Selection) {
        self.cycles_started += 1;
        self.last_selection = Some(selection);
    }

    pub fn record_completion(&mut self) {
        self.cycles_completed += 1;
        self.last_cycle_completed_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playbook_types::Point;

    #[test]
    fn completion_stamps_time() {
        let mut m = PlayMetrics::default();
        assert!(m.last_cycle_completed_at.is_none());
        m.record_completion();
        assert_eq!(m.cycles_completed, 1);
        assert!(m.last_cycle_completed_at.is_some());
    }

    #[test]
    fn selection_counts_cycle_start() {
        let mut m = PlayMetrics::default();
        let sel = Selection {
            point: Point::new(1.0, 7.0),
            priority: 1,
            raw_score: 0.8,
            effective_score: 0.55,
            candidate_index: 1,
        };
        m.record_selection(sel);
        assert_eq!(m.cycles_started, 1);
        assert_eq!(m.last_selection, Some(sel));

        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["cycles_started"], 1);
        assert_eq!(json["last_selection"]["priority"], 1);
    }
}
