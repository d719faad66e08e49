//! Simulation config – reads/writes `~/.playbook/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use playbook_gameplay::PlayConfig;
use playbook_types::{FieldGeometry, Point, RobotId};
use serde::{Deserialize, Serialize};

/// Remove a robot from the field at a given tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropRobot {
    pub robot: RobotId,
    pub at_tick: u64,
}

/// Persisted harness configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub field: FieldGeometry,

    /// Ball position for the whole run (the restart spot).
    #[serde(default = "default_ball")]
    pub ball: Point,

    #[serde(default = "default_ticks")]
    pub ticks: u64,

    /// Ticks a pass needs once a robot is executing it.
    #[serde(default = "default_task_duration")]
    pub task_duration_ticks: u32,

    #[serde(default = "default_robots")]
    pub robots: Vec<RobotId>,

    /// Absent from the file means no robot leaves the field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drop_robot: Option<DropRobot>,

    /// Opponent positions; passes that run close to one score lower.
    #[serde(default)]
    pub opponents: Vec<Point>,

    #[serde(default)]
    pub play: PlayConfig,
}

fn default_ball() -> Point {
    Point::new(2.9, 8.9)
}
fn default_ticks() -> u64 {
    40
}
fn default_task_duration() -> u32 {
    8
}
fn default_robots() -> Vec<RobotId> {
    vec![RobotId(2), RobotId(5), RobotId(7)]
}
fn default_drop_robot() -> Option<DropRobot> {
    Some(DropRobot {
        robot: RobotId(2),
        at_tick: 12,
    })
}

impl Default for Config {
    fn default() -> Self {
        Self {
            field: FieldGeometry::default(),
            ball: default_ball(),
            ticks: default_ticks(),
            task_duration_ticks: default_task_duration(),
            robots: default_robots(),
            drop_robot: default_drop_robot(),
            opponents: Vec::new(),
            play: PlayConfig::default(),
        }
    }
}

impl Config {
    /// Reject settings the harness cannot simulate.
    pub fn validate(&self) -> Result<(), String> {
        if self.task_duration_ticks == 0 {
            return Err("task_duration_ticks must be at least 1".to_string());
        }
        if self.robots.is_empty() {
            return Err("robots must list at least one robot".to_string());
        }
        Ok(())
    }
}

/// Return the path to `~/.playbook/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".playbook").join("config.toml")
}

/// Load the config from a specific path, with `PLAYBOOK_*` overrides
/// applied.  Returns `None` if the file does not exist.
pub fn load_from(path: &Path) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let mut cfg: Config =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    apply_env_overrides(&mut cfg);
    cfg.validate()
        .map_err(|e| format!("Invalid config at {}: {}", path.display(), e))?;
    Ok(Some(cfg))
}

/// Apply `PLAYBOOK_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `PLAYBOOK_TICKS` | `ticks` |
/// | `PLAYBOOK_BALL_X` | `ball.x` |
/// | `PLAYBOOK_BALL_Y` | `ball.y` |
/// | `PLAYBOOK_MIN_MULTIPLIER` | `play.minimum_multiplier` |
///
/// Values that fail to parse are ignored.
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("PLAYBOOK_TICKS")
        && let Ok(ticks) = v.parse::<u64>()
    {
        cfg.ticks = ticks;
    }
    if let Ok(v) = std::env::var("PLAYBOOK_BALL_X")
        && let Ok(x) = v.parse::<f64>()
    {
        cfg.ball.x = x;
    }
    if let Ok(v) = std::env::var("PLAYBOOK_BALL_Y")
        && let Ok(y) = v.parse::<f64>()
    {
        cfg.ball.y = y;
    }
    if let Ok(v) = std::env::var("PLAYBOOK_MIN_MULTIPLIER")
        && let Ok(m) = v.parse::<f64>()
    {
        cfg.play.minimum_multiplier = m;
    }
}

/// Save the config to a specific path, creating parent directories.
pub fn save_to(cfg: &Config, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let raw =
        toml::to_string_pretty(cfg).map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(path, raw).map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))
}
