//! [`CrossOrCenter`] – the continuous offensive-kick play.
//!
//! The play owns one [`ActiveTask`] at a time.  On entering `Start` it builds
//! the candidate lines for the current ball position, selects a target, and
//! asks its [`TaskFactory`] for a task aimed there.  When that task reports
//! completion the play tears it down, releases the robot, and goes straight
//! back to `Start`, so a fresh target is chosen within the same tick.  The
//! play never finishes on its own; an external controller stops it with
//! [`CrossOrCenter::deactivate`].
//!
//! # Lifecycle
//!
//! | From | Guard | To | Effect |
//! |------|-------|----|--------|
//! | `Start` | always | `Running` | select target, attach task |
//! | `Running` | task done, [`CyclePolicy::Reselect`] | `Start` | tear down task |
//! | `Running` | task done, [`CyclePolicy::RestartInPlace`] | `Running` | restart task |
//! | `Running` | no task attached | `Start` | tear down task |
//!
//! If the factory fails the machine stays in `Start` and the selection is
//! retried on the next tick.
//!
//! # Tick order
//!
//! 1. the attached task is advanced;
//! 2. lifecycle transitions fire (at most [`MAX_TRANSITIONS_PER_TICK`], and
//!    no more once a task has been attached, so a fresh task always
//!    survives into the next tick);
//! 3. the [`RobotBinder`] reconciles the bound robot.
//!
//! [`CrossOrCenter::role_requirements`] reads the binder directly, so a tree
//! built after `tick` always reflects the current binding.

use std::fmt;

use playbook_types::{FieldGeometry, PlayError, RobotId};
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use crate::binder::{BindingEvent, ReleaseReason, RobotBinder};
use crate::candidates::build_candidates;
use crate::config::{CyclePolicy, PlayConfig};
use crate::context::TickContext;
use crate::metrics::PlayMetrics;
use crate::requirements::RequirementTree;
use crate::selector::{Selection, select};
use crate::state_machine::{StateMachine, Transition};
use crate::task::{ActiveTask, TaskFactory};

/// Name used for the play's requirement group and in logs.
pub const PLAY_NAME: &str = "cross_or_center";

/// Upper bound on transitions fired in a single tick.
pub const MAX_TRANSITIONS_PER_TICK: usize = 8;

// ─────────────────────────────────────────────────────────────────────────────
// Lifecycle table
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Start,
    Running,
}

impl fmt::Display for PlayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayState::Start => write!(f, "start"),
            PlayState::Running => write!(f, "running"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    SelectAndAttach,
    Teardown,
    RestartTask,
}

/// Snapshot the lifecycle guards are evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct LifecycleGuards {
    pub task_attached: bool,
    pub task_done: bool,
    pub policy: CyclePolicy,
}

type PlayTransition = Transition<PlayState, LifecycleGuards, Effect>;

fn lifecycle_table() -> Vec<PlayTransition> {
    vec![
        Transition::new(
            PlayState::Start,
            |_: &LifecycleGuards| true,
            PlayState::Running,
            Effect::SelectAndAttach,
            "immediately",
        ),
        Transition::new(
            PlayState::Running,
            |g: &LifecycleGuards| g.task_done && g.policy == CyclePolicy::Reselect,
            PlayState::Start,
            Effect::Teardown,
            "task completed",
        ),
        Transition::new(
            PlayState::Running,
            |g: &LifecycleGuards| g.task_done && g.policy == CyclePolicy::RestartInPlace,
            PlayState::Running,
            Effect::RestartTask,
            "task completed, restart in place",
        ),
        Transition::new(
            PlayState::Running,
            |g: &LifecycleGuards| !g.task_attached,
            PlayState::Start,
            Effect::Teardown,
            "task missing",
        ),
    ]
}

// ─────────────────────────────────────────────────────────────────────────────
// TickReport
// ─────────────────────────────────────────────────────────────────────────────

/// What happened during one [`CrossOrCenter::tick`].
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub state: PlayState,
    /// Labels of the transitions fired, in order.
    pub fired: Vec<&'static str>,
    /// Set when a new task was attached this tick.
    pub selection: Option<Selection>,
    /// Set when a finished task was torn down this tick.
    pub completed: bool,
    pub binding: BindingEvent,
    /// Set when the factory refused to build a task this tick.
    pub task_failure: Option<PlayError>,
}

// ─────────────────────────────────────────────────────────────────────────────
// CrossOrCenter
// ─────────────────────────────────────────────────────────────────────────────

/// Selects a cross/center target and keeps one task running toward it.
pub struct CrossOrCenter<F> {
    config: PlayConfig,
    factory: F,
    machine: StateMachine<PlayState, LifecycleGuards, Effect>,
    task: Option<Box<dyn ActiveTask>>,
    binder: RobotBinder,
    metrics: PlayMetrics,
    activation: Option<Uuid>,
}

impl<F: TaskFactory> CrossOrCenter<F> {
    /// Build an inactive play.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `config` fails
    /// [`PlayConfig::validate`].
    pub fn new(config: PlayConfig, factory: F) -> Result<Self, PlayError> {
        config.validate()?;
        Ok(Self {
            config,
            factory,
            machine: StateMachine::new(PlayState::Start, lifecycle_table()),
            task: None,
            binder: RobotBinder::new(),
            metrics: PlayMetrics::default(),
            activation: None,
        })
    }

    /// Arm the play for the given field.  Re-activating an active play
    /// discards its current task first.
    ///
    /// # Errors
    ///
    /// Returns [`PlayError::Configuration`] for degenerate field geometry.
    pub fn activate(&mut self, field: &FieldGeometry) -> Result<Uuid, PlayError> {
        field.validate()?;
        if self.activation.is_some() {
            self.deactivate();
        }
        let id = Uuid::new_v4();
        self.activation = Some(id);
        self.machine.reset();
        info!(play = PLAY_NAME, activation = %id, lines = self.config.lines.len(), "play activated");
        Ok(id)
    }

    /// Stop the play: detach the task and release the robot immediately.
    pub fn deactivate(&mut self) {
        let Some(id) = self.activation.take() else {
            return;
        };
        self.detach();
        self.machine.reset();
        info!(play = PLAY_NAME, activation = %id, "play deactivated");
    }

    pub fn is_active(&self) -> bool {
        self.activation.is_some()
    }

    pub fn activation_id(&self) -> Option<Uuid> {
        self.activation
    }

    pub fn state(&self) -> PlayState {
        self.machine.state()
    }

    pub fn active_task(&self) -> Option<&dyn ActiveTask> {
        self.task.as_deref()
    }

    pub fn bound_robot(&self) -> Option<RobotId> {
        self.binder.bound()
    }

    pub fn metrics(&self) -> &PlayMetrics {
        &self.metrics
    }

    pub fn config(&self) -> &PlayConfig {
        &self.config
    }

    /// Advance the play by one decision cycle.
    ///
    /// # Errors
    ///
    /// - [`PlayError::Inactive`] if the play has not been activated.
    /// - A configuration error if the tick's field snapshot is degenerate.
    ///
    /// Task construction failures are not errors here; they are reported in
    /// [`TickReport::task_failure`] and retried on the next tick.
    pub fn tick(&mut self, ctx: &TickContext<'_>) -> Result<TickReport, PlayError> {
        let Some(activation) = self.activation else {
            return Err(PlayError::Inactive);
        };
        ctx.field.validate()?;
        let _span = info_span!("play_tick", play = PLAY_NAME, tick = ctx.tick, activation = %activation)
            .entered();

        if let Some(task) = self.task.as_mut() {
            task.tick(ctx);
        }

        let mut report = TickReport {
            state: self.machine.state(),
            fired: Vec::new(),
            selection: None,
            completed: false,
            binding: BindingEvent::Unchanged,
            task_failure: None,
        };

        for _ in 0..MAX_TRANSITIONS_PER_TICK {
            let guards = self.guards();
            let Some(&transition) = self.machine.next_transition(&guards) else {
                break;
            };
            debug!(
                from = %transition.from,
                to = %transition.to,
                reason = transition.label,
                "firing transition"
            );
            match self.apply(transition.effect, ctx, &mut report) {
                Ok(()) => {
                    self.machine.enter(transition.to);
                    report.fired.push(transition.label);
                }
                Err(err) if err.is_configuration() => return Err(err),
                Err(err) => {
                    warn!(error = %err, "task could not be attached; retrying next tick");
                    self.metrics.task_failures += 1;
                    report.task_failure = Some(err);
                    break;
                }
            }
            // A new task gets at least one tick before it can be torn down.
            if transition.from == transition.to || transition.effect == Effect::SelectAndAttach {
                break;
            }
        }

        let event = self.binder.observe(self.task.as_deref(), ctx.available_robots);
        if event.captured().is_some() {
            self.metrics.robots_bound += 1;
        }
        if let Some((robot, reason)) = event.lost()
            && reason != ReleaseReason::TaskDetached
        {
            let loss = PlayError::BindingLoss {
                robot,
                reason: reason.to_string(),
            };
            warn!(error = %loss, "binding lost; role assignment reopened");
            self.metrics.binding_losses += 1;
        }
        report.binding = event;
        report.state = self.machine.state();
        Ok(report)
    }

    /// The robot slots this play needs this tick, pinned to the bound robot
    /// when there is one.
    pub fn role_requirements(&self) -> RequirementTree {
        let children = self.task.iter().map(|t| t.role_requirements()).collect();
        let mut tree = RequirementTree::group(PLAY_NAME, children);
        self.binder.pin(&mut tree);
        tree
    }

    fn guards(&self) -> LifecycleGuards {
        LifecycleGuards {
            task_attached: self.task.is_some(),
            task_done: self.task.as_ref().is_some_and(|t| t.is_done()),
            policy: self.config.cycle_policy,
        }
    }

    fn apply(
        &mut self,
        effect: Effect,
        ctx: &TickContext<'_>,
        report: &mut TickReport,
    ) -> Result<(), PlayError> {
        match effect {
            Effect::SelectAndAttach => {
                let candidates = build_candidates(ctx.ball, ctx.field, &self.config.lines);
                let selection = select(
                    ctx.ball,
                    &candidates,
                    ctx.oracle,
                    self.config.minimum_multiplier,
                )?;
                let task = self.factory.create(selection.point)?;
                info!(
                    task = task.name(),
                    x = selection.point.x,
                    y = selection.point.y,
                    priority = selection.priority,
                    raw = selection.raw_score,
                    effective = selection.effective_score,
                    "target selected, task attached"
                );
                self.task = Some(task);
                self.metrics.record_selection(selection);
                report.selection = Some(selection);
            }
            Effect::Teardown => {
                if let Some(task) = self.detach() {
                    self.metrics.record_completion();
                    report.completed = true;
                    info!(
                        task = task.name(),
                        cycles_completed = self.metrics.cycles_completed,
                        "task finished, cycle recorded"
                    );
                }
            }
            Effect::RestartTask => {
                if let Some(task) = self.task.as_mut() {
                    task.restart();
                    self.metrics.task_restarts += 1;
                    debug!(task = task.name(), "task restarted in place");
                }
            }
        }
        Ok(())
    }

    /// Remove the task and release its robot.
    fn detach(&mut self) -> Option<Box<dyn ActiveTask>> {
        let task = self.task.take()?;
        if let Some(robot) = self.binder.clear() {
            debug!(robot = robot.0, task = task.name(), "released robot on detach");
        }
        Some(task)
    }
}

impl<F> fmt::Debug for CrossOrCenter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrossOrCenter")
            .field("state", &self.machine.state())
            .field("task", &self.task.as_ref().map(|t| t.name().to_string()))
            .field("bound_robot", &self.binder.bound())
            .field("activation", &self.activation)
            .finish()
    }
}
