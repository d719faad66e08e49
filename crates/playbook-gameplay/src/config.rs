//! [`PlayConfig`] – tunables for the cross-or-center play.

use playbook_types::PlayError;
use serde::{Deserialize, Serialize};

use crate::candidates::{LineTemplate, reference_lines};

/// What the play does when its task reports completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CyclePolicy {
    /// Tear the task down, release the robot, and select a fresh target.
    #[default]
    Reselect,
    /// Restart the same task toward the same target, keeping its robot.
    RestartInPlace,
}

/// Play configuration.  Every field has a default so partial TOML works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayConfig {
    /// Score penalty paid by the lowest-priority line, in `[0, 1]`.  Line
    /// priorities are ranks `0..lines.len()`, one line per rank.
    pub minimum_multiplier: f64,
    pub lines: Vec<LineTemplate>,
    pub cycle_policy: CyclePolicy,
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            minimum_multiplier: 0.5,
            lines: reference_lines(),
            cycle_policy: CyclePolicy::default(),
        }
    }
}

impl PlayConfig {
    /// Reject configurations the play cannot run with.
    pub fn validate(&self) -> Result<(), PlayError> {
        if self.lines.is_empty() {
            return Err(PlayError::EmptyCandidateSet);
        }
        if !self.minimum_multiplier.is_finite() || !(0.0..=1.0).contains(&self.minimum_multiplier) {
            return Err(PlayError::Configuration(format!(
                "minimum_multiplier must be within [0, 1], got {}",
                self.minimum_multiplier
            )));
        }
        if let Some(i) = self
            .lines
            .iter()
            .position(|l| !l.start.is_finite() || !l.end.is_finite())
        {
            return Err(PlayError::Configuration(format!(
                "line {i} has non-finite field fractions"
            )));
        }
        let n = self.lines.len();
        let mut seen = vec![false; n];
        for (i, line) in self.lines.iter().enumerate() {
            match seen.get_mut(line.priority as usize) {
                Some(slot) if !*slot => *slot = true,
                _ => {
                    return Err(PlayError::Configuration(format!(
                        "line {i} has priority {}; priorities must use each of 0..{n} once",
                        line.priority
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = PlayConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.lines.len(), 3);
        assert_eq!(cfg.minimum_multiplier, 0.5);
        assert_eq!(cfg.cycle_policy, CyclePolicy::Reselect);
    }

    #[test]
    fn empty_lines_rejected() {
        let cfg = PlayConfig {
            lines: vec![],
            ..PlayConfig::default()
        };
        assert_eq!(cfg.validate(), Err(PlayError::EmptyCandidateSet));
    }

    #[test]
    fn out_of_range_multiplier_rejected() {
        for bad in [-0.1, 1.5, f64::NAN, f64::INFINITY] {
            let cfg = PlayConfig {
                minimum_multiplier: bad,
                ..PlayConfig::default()
            };
            assert!(cfg.validate().unwrap_err().is_configuration());
        }
    }

    #[test]
    fn non_finite_line_rejected() {
        let mut cfg = PlayConfig::default();
        cfg.lines[2].end.depth = f64::NAN;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn priorities_must_be_dense_ranks() {
        let mut cfg = PlayConfig::default();
        cfg.lines[1].priority = 2;
        cfg.lines[2].priority = 1;
        assert!(cfg.validate().is_ok());

        cfg.lines[1].priority = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("line 1"));

        let mut sparse = PlayConfig::default();
        sparse.lines[2].priority = 5;
        assert!(sparse.validate().unwrap_err().to_string().contains("line 2"));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: PlayConfig = toml::from_str("cycle_policy = \"restart_in_place\"").unwrap();
        assert_eq!(cfg.cycle_policy, CyclePolicy::RestartInPlace);
        assert_eq!(cfg.minimum_multiplier, 0.5);
        assert_eq!(cfg.lines, reference_lines());
    }

    #[test]
    fn lines_parse_from_toml() {
        let raw = r#"
            minimum_multiplier = 0.3

            [[lines]]
            priority = 0
            start = { lateral = -0.5, depth = 0.8 }
            end = { lateral = -0.5, depth = 0.9 }
        "#;
        let cfg: PlayConfig = toml::from_str(raw).unwrap();
        assert_eq!(cfg.lines.len(), 1);
        assert_eq!(cfg.lines[0].end.depth, 0.9);
        assert!(cfg.validate().is_ok());
    }
}
