//! [`RobotBinder`] – keeps a sub-task on the robot that started it.
//!
//! Once the role solver hands the active task a robot, the binder remembers
//! that robot and pins every leaf of subsequent requirement trees to it, so
//! the solver cannot swap robots halfway through a pass.
//!
//! The pin is released when:
//!
//! - the task is detached (completion, restart, deactivation);
//! - the bound robot is no longer on the field (otherwise the pinned slot
//!   could never be filled again);
//! - the task reports a different robot, or none, for itself.
//!
//! # Example
//!
//! ```rust
//! use playbook_gameplay::binder::RobotBinder;
//! use playbook_gameplay::requirements::{RequirementTree, RoleRequirement};
//! use playbook_types::RobotId;
//!
//! let mut binder = RobotBinder::new();
//! binder.capture(RobotId(7));
//!
//! let mut tree = RequirementTree::leaf(RoleRequirement::new("passer"));
//! binder.pin(&mut tree);
//! assert_eq!(tree.leaves()[0].required_robot, Some(RobotId(7)));
//! ```

use std::fmt;

use playbook_types::RobotId;
use tracing::{info, warn};

use crate::requirements::RequirementTree;
use crate::task::ActiveTask;

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

/// Why a binding was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseReason {
    /// The task was torn down.
    TaskDetached,
    /// The robot left the set of available robots.
    RobotUnavailable,
    /// The task stopped reporting the bound robot as its executor.
    TaskReassigned,
}

impl fmt::Display for ReleaseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseReason::TaskDetached => write!(f, "task detached"),
            ReleaseReason::RobotUnavailable => write!(f, "robot unavailable"),
            ReleaseReason::TaskReassigned => write!(f, "task reassigned"),
        }
    }
}

/// What changed during one [`RobotBinder::observe`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingEvent {
    Unchanged,
    Bound(RobotId),
    Released {
        robot: RobotId,
        reason: ReleaseReason,
    },
    /// Released one robot and captured another in the same tick.
    Rebound {
        from: RobotId,
        to: RobotId,
        reason: ReleaseReason,
    },
}

impl BindingEvent {
    /// The robot whose binding was lost, if any.
    pub fn lost(&self) -> Option<(RobotId, ReleaseReason)> {
        match *self {
            BindingEvent::Released { robot, reason } => Some((robot, reason)),
            BindingEvent::Rebound { from, reason, .. } => Some((from, reason)),
            _ => None,
        }
    }

    /// The robot that was newly captured, if any.
    pub fn captured(&self) -> Option<RobotId> {
        match *self {
            BindingEvent::Bound(robot) | BindingEvent::Rebound { to: robot, .. } => Some(robot),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// RobotBinder
// ─────────────────────────────────────────────────────────────────────────────

/// Sole owner of the bound robot identity.
#[derive(Debug, Default)]
pub struct RobotBinder {
    bound: Option<RobotId>,
}

impl RobotBinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bound(&self) -> Option<RobotId> {
        self.bound
    }

    /// Bind `robot` unconditionally.
    pub fn capture(&mut self, robot: RobotId) {
        self.bound = Some(robot);
    }

    /// Drop the binding, returning the robot that was bound.
    pub fn clear(&mut self) -> Option<RobotId> {
        self.bound.take()
    }

    /// Reconcile the binding with the attached task and the robots on the
    /// field.  Call once per tick, after the lifecycle has run.
    pub fn observe(
        &mut self,
        task: Option<&dyn ActiveTask>,
        available_robots: &[RobotId],
    ) -> BindingEvent {
        let Some(task) = task else {
            return match self.clear() {
                Some(robot) => BindingEvent::Released {
                    robot,
                    reason: ReleaseReason::TaskDetached,
                },
                None => BindingEvent::Unchanged,
            };
        };

        let executor = task.bound_robot();
        let mut released = None;

        if let Some(robot) = self.bound {
            let reason = if !available_robots.contains(&robot) {
                Some(ReleaseReason::RobotUnavailable)
            } else if executor != Some(robot) {
                Some(ReleaseReason::TaskReassigned)
            } else {
                None
            };
            match reason {
                Some(reason) => {
                    warn!(robot = robot.0, task = task.name(), %reason, "releasing robot binding");
                    self.bound = None;
                    released = Some((robot, reason));
                }
                None => return BindingEvent::Unchanged,
            }
        }

        let captured = match executor {
            Some(robot) if available_robots.contains(&robot) => {
                info!(robot = robot.0, task = task.name(), "bound robot to task");
                self.bound = Some(robot);
                Some(robot)
            }
            _ => None,
        };

        match (released, captured) {
            (Some((from, reason)), Some(to)) => BindingEvent::Rebound { from, to, reason },
            (Some((robot, reason)), None) => BindingEvent::Released { robot, reason },
            (None, Some(robot)) => BindingEvent::Bound(robot),
            (None, None) => BindingEvent::Unchanged,
        }
    }

    /// Force every leaf's required robot to the bound robot.  No-op while
    /// unbound.
    pub fn pin(&self, tree: &mut RequirementTree) {
        if let Some(robot) = self.bound {
            tree.for_each_leaf_mut(|req| req.required_robot = Some(robot));
        }
    }
}
