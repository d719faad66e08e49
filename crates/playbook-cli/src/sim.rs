//! Tick-driven stand-in for the match scheduler.
//!
//! Drives a [`CrossOrCenter`] against a [`HeuristicOracle`] and
//! [`SimulatedPass`] tasks, playing the part of the role solver between
//! ticks so the robot binding has something to bind to.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

use playbook_gameplay::{
    ActiveTask, CrossOrCenter, PlayMetrics, RequirementTree, ScoreOracle, TaskFactory,
    TickContext, TickReport,
};
use playbook_types::{FieldGeometry, PlayError, Point, RobotId, Segment};
use tracing::{debug, info};

use crate::config::Config;

/// Distance under which an opponent is treated as able to intercept.
const INTERCEPT_RADIUS: f64 = 0.3;

type ExecutorSlot = Rc<Cell<Option<RobotId>>>;

// ─────────────────────────────────────────────────────────────────────────────
// Oracle
// ─────────────────────────────────────────────────────────────────────────────

/// Rough pass estimator: short passes to targets near the opponent goal
/// mouth score best, and every opponent near the pass lane halves the score.
#[derive(Debug, Clone)]
pub struct HeuristicOracle {
    field: FieldGeometry,
    opponents: Vec<Point>,
}

impl HeuristicOracle {
    pub fn new(field: FieldGeometry, opponents: Vec<Point>) -> Self {
        Self { field, opponents }
    }
}

impl ScoreOracle for HeuristicOracle {
    fn score(&self, source: Point, target: Point) -> f64 {
        let to_goal = self.field.their_goal_segment().distance_to(target);
        let base = 10.0 / ((1.0 + source.distance_to(target)) * (1.0 + to_goal));
        let lane = Segment::new(source, target);
        let blockers = self
            .opponents
            .iter()
            .filter(|o| lane.distance_to(**o) < INTERCEPT_RADIUS)
            .count();
        base * 0.5_f64.powi(blockers as i32)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tasks
// ─────────────────────────────────────────────────────────────────────────────

/// A pass that finishes after a fixed number of ticks with a robot on it.
///
/// Progress stalls on ticks where the executing robot is missing from the
/// field.
#[derive(Debug)]
pub struct SimulatedPass {
    target: Point,
    duration: u32,
    remaining: u32,
    executor: ExecutorSlot,
}

impl ActiveTask for SimulatedPass {
    fn name(&self) -> &str {
        "simulated_pass"
    }

    fn target(&self) -> Point {
        self.target
    }

    fn tick(&mut self, ctx: &TickContext<'_>) {
        if let Some(robot) = self.executor.get()
            && ctx.is_available(robot)
            && self.remaining > 0
        {
            self.remaining -= 1;
        }
    }

    fn is_done(&self) -> bool {
        self.remaining == 0
    }

    fn bound_robot(&self) -> Option<RobotId> {
        self.executor.get()
    }

    fn restart(&mut self) {
        self.remaining = self.duration;
    }
}

/// Builds [`SimulatedPass`] tasks that all report the robot in one shared
/// slot, which the harness fills from [`solve_roles`].
#[derive(Debug)]
pub struct SimTaskFactory {
    duration: u32,
    slot: ExecutorSlot,
}

impl SimTaskFactory {
    pub fn new(duration: u32) -> Self {
        Self {
            duration,
            slot: Rc::new(Cell::new(None)),
        }
    }

    /// Handle to the executor slot shared with every task this factory builds.
    pub fn slot(&self) -> ExecutorSlot {
        Rc::clone(&self.slot)
    }
}

impl TaskFactory for SimTaskFactory {
    fn create(&mut self, target: Point) -> Result<Box<dyn ActiveTask>, PlayError> {
        if !target.is_finite() {
            return Err(PlayError::TransientTask(format!(
                "cannot plan a pass to {target}"
            )));
        }
        // A fresh task starts unassigned.
        self.slot.set(None);
        Ok(Box::new(SimulatedPass {
            target,
            duration: self.duration,
            remaining: self.duration,
            executor: Rc::clone(&self.slot),
        }))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Role solver
// ─────────────────────────────────────────────────────────────────────────────

/// One filled (or unfilled) slot from [`solve_roles`].
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub role: String,
    pub robot: Option<RobotId>,
}

/// Fill every leaf of `tree` from `roster`, in leaf order.
///
/// A pinned leaf gets its pinned robot when that robot is on the roster and
/// still free; any other leaf takes the first free robot.
pub fn solve_roles(tree: &RequirementTree, roster: &[RobotId]) -> Vec<Assignment> {
    let mut taken: Vec<RobotId> = Vec::new();
    tree.leaves()
        .into_iter()
        .map(|leaf| {
            let pinned = leaf
                .required_robot
                .filter(|r| roster.contains(r) && !taken.contains(r));
            let robot = pinned.or_else(|| roster.iter().copied().find(|r| !taken.contains(r)));
            if let Some(r) = robot {
                taken.push(r);
            }
            Assignment {
                role: leaf.name.clone(),
                robot,
            }
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Driver
// ─────────────────────────────────────────────────────────────────────────────

/// Run the play for `cfg.ticks` ticks or until `shutdown` is set.
///
/// `observer` sees every tick report.  The play is always deactivated before
/// returning, and the final metrics are returned.
///
/// # Errors
///
/// Configuration errors from building, activating, or ticking the play.
pub fn run(
    cfg: &Config,
    shutdown: &AtomicBool,
    mut observer: impl FnMut(u64, &TickReport),
) -> Result<PlayMetrics, PlayError> {
    let factory = SimTaskFactory::new(cfg.task_duration_ticks);
    let slot = factory.slot();
    let mut play = CrossOrCenter::new(cfg.play.clone(), factory)?;
    let oracle = HeuristicOracle::new(cfg.field, cfg.opponents.clone());

    play.activate(&cfg.field)?;
    let outcome = drive(&mut play, cfg, &oracle, &slot, shutdown, &mut observer);
    play.deactivate();
    outcome?;

    Ok(play.metrics().clone())
}

fn drive<F: TaskFactory>(
    play: &mut CrossOrCenter<F>,
    cfg: &Config,
    oracle: &HeuristicOracle,
    slot: &ExecutorSlot,
    shutdown: &AtomicBool,
    observer: &mut impl FnMut(u64, &TickReport),
) -> Result<(), PlayError> {
    let mut roster = cfg.robots.clone();

    for tick in 0..cfg.ticks {
        if shutdown.load(Ordering::SeqCst) {
            info!(tick, "shutdown requested; stopping simulation");
            break;
        }
        if let Some(leaving) = cfg.drop_robot
            && leaving.at_tick == tick
        {
            roster.retain(|r| *r != leaving.robot);
            info!(tick, robot = leaving.robot.0, "robot left the field");
        }

        let ctx = TickContext::new(tick, cfg.ball, &cfg.field, oracle, &roster);
        let report = play.tick(&ctx)?;
        observer(tick, &report);

        let assignments = solve_roles(&play.role_requirements(), &roster);
        let executor = match assignments.first() {
            Some(a) => {
                debug!(tick, role = %a.role, robot = ?a.robot, "roles solved");
                a.robot
            }
            None => None,
        };
        slot.set(executor);
    }
    Ok(())
}
