//! Sub-task seam: [`ActiveTask`] and [`TaskFactory`].
//!
//! The play owns at most one task at a time.  Concrete tasks (a coordinated
//! pass, a pivot kick) live outside this crate; the play only needs to know
//! whether the task is finished and which robot, if any, is executing it.

use playbook_types::{PlayError, Point, RobotId};

use crate::context::TickContext;
use crate::requirements::{RequirementTree, RoleRequirement};

/// The single sub-task a play currently delegates to one robot.
pub trait ActiveTask {
    /// Short name used in logs and requirement trees.
    fn name(&self) -> &str;

    /// The point this task was constructed for.
    fn target(&self) -> Point;

    /// Advance the task by one tick.  Called by the owning play before the
    /// lifecycle is evaluated.
    fn tick(&mut self, _ctx: &TickContext<'_>) {}

    /// `true` once the task has completed (successfully or not).
    fn is_done(&self) -> bool;

    /// The robot currently executing this task, if one has been assigned.
    fn bound_robot(&self) -> Option<RobotId>;

    /// Reset the task so it runs again toward the same target.
    fn restart(&mut self);

    /// Robot slots this task needs.  Defaults to a single kicker slot at the
    /// task's target.
    fn role_requirements(&self) -> RequirementTree {
        RequirementTree::leaf(
            RoleRequirement::new(self.name())
                .with_destination(self.target())
                .with_kicker(),
        )
    }
}

/// Builds a task aimed at a chosen target.
///
/// Failure is expected to be transient ([`PlayError::TransientTask`]); the
/// play retries on the next tick.
pub trait TaskFactory {
    fn create(&mut self, target: Point) -> Result<Box<dyn ActiveTask>, PlayError>;
}

impl<F> TaskFactory for F
where
    F: FnMut(Point) -> Result<Box<dyn ActiveTask>, PlayError>,
{
    fn create(&mut self, target: Point) -> Result<Box<dyn ActiveTask>, PlayError> {
        self(target)
    }
}
