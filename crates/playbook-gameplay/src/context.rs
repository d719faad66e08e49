//! Per-tick world snapshot handed to every component.

use playbook_types::{FieldGeometry, Point, RobotId};

use crate::oracle::ScoreOracle;

/// Read-only inputs for one decision cycle.
///
/// Built once by the scheduler at the start of a tick and passed by
/// reference; nothing in the play reaches for world state any other way.
pub struct TickContext<'a> {
    /// Monotonic tick counter, used only for logging.
    pub tick: u64,
    pub ball: Point,
    pub field: &'a FieldGeometry,
    pub oracle: &'a dyn ScoreOracle,
    /// Our robots currently visible and controllable.
    pub available_robots: &'a [RobotId],
}

impl<'a> TickContext<'a> {
    pub fn new(
        tick: u64,
        ball: Point,
        field: &'a FieldGeometry,
        oracle: &'a dyn ScoreOracle,
        available_robots: &'a [RobotId],
    ) -> Self {
        Self {
            tick,
            ball,
            field,
            oracle,
            available_robots,
        }
    }

    pub fn is_available(&self, robot: RobotId) -> bool {
        self.available_robots.contains(&robot)
    }
}
