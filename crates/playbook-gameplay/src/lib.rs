//! `playbook-gameplay` – target selection and play lifecycle
//!
//! The decision layer for an offensive kick: pick the best cross or
//! cut-back target among a few ranked candidate lines, keep exactly one
//! sub-task running toward it, and keep that sub-task on the same robot.
//!
//! # Modules
//!
//! - [`candidates`] – [`build_candidates`][candidates::build_candidates]:
//!   resolves field-relative [`LineTemplate`]s into [`CandidateLine`]s for
//!   the current tick, mirrored to the ball's side of the field.
//! - [`selector`] – [`select`][selector::select]: scores three probe points
//!   per line through a [`ScoreOracle`] and picks the best line after a
//!   linear priority penalty.
//! - [`state_machine`] – [`StateMachine`]: a table of guarded transitions
//!   whose effects are applied by the owner.
//! - [`play`] – [`CrossOrCenter`]: the continuous play that ties selection,
//!   task lifecycle, and robot binding together, one [`TickContext`] at a
//!   time.
//! - [`binder`] – [`RobotBinder`]: captures the robot executing the active
//!   task and pins it into every [`RequirementTree`] leaf until the task
//!   ends or the robot disappears.
//! - [`requirements`] – [`RequirementTree`]: robot slots handed to the
//!   external role solver.
//! - [`task`] / [`oracle`] – the [`ActiveTask`], [`TaskFactory`], and
//!   [`ScoreOracle`] seams to the skills layer and the pass estimator.
//! - [`config`] / [`metrics`] – [`PlayConfig`] tunables and [`PlayMetrics`]
//!   counters.
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]: subscriber
//!   setup with optional OTLP export.

pub mod binder;
pub mod candidates;
pub mod config;
pub mod context;
pub mod metrics;
pub mod oracle;
pub mod play;
pub mod requirements;
pub mod selector;
pub mod state_machine;
pub mod task;
pub mod telemetry;

pub use binder::{BindingEvent, ReleaseReason, RobotBinder};
pub use candidates::{CandidateLine, FieldFraction, LineTemplate};
pub use config::{CyclePolicy, PlayConfig};
pub use context::TickContext;
pub use metrics::PlayMetrics;
pub use oracle::ScoreOracle;
pub use play::{CrossOrCenter, PlayState, TickReport};
pub use requirements::{RequirementTree, RoleRequirement};
pub use selector::{PriorityDecay, ScoredPoint, Selection};
pub use state_machine::{StateMachine, Transition};
pub use task::{ActiveTask, TaskFactory};
pub use telemetry::{TracerProviderGuard, init_tracing};
