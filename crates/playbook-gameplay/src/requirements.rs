//! Role requirement trees.
//!
//! A play describes the robot slots it needs as a [`RequirementTree`]; an
//! external role-assignment solver reads the tree and maps each leaf to a
//! physical robot.  Trees are rebuilt every tick.
//!
//! # Example
//!
//! ```rust
//! use playbook_gameplay::requirements::{RequirementTree, RoleRequirement};
//! use playbook_types::RobotId;
//!
//! let mut tree = RequirementTree::group("pass", vec![
//!     RequirementTree::leaf(RoleRequirement::new("passer")),
//!     RequirementTree::leaf(RoleRequirement::new("receiver")),
//! ]);
//! tree.for_each_leaf_mut(|req| req.required_robot = Some(RobotId(7)));
//!
//! assert!(tree.leaves().iter().all(|req| req.required_robot == Some(RobotId(7))));
//! ```

use playbook_types::{Point, RobotId};
use serde::Serialize;

/// A single robot slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleRequirement {
    pub name: String,
    /// The robot that must fill this slot, or `None` for no preference.
    pub required_robot: Option<RobotId>,
    /// Where the robot is expected to go, if the slot has a location.
    pub destination: Option<Point>,
    /// Whether the slot needs a robot with a working kicker.
    pub require_kicker: bool,
}

impl RoleRequirement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required_robot: None,
            destination: None,
            require_kicker: false,
        }
    }

    pub fn with_destination(mut self, destination: Point) -> Self {
        self.destination = Some(destination);
        self
    }

    pub fn with_kicker(mut self) -> Self {
        self.require_kicker = true;
        self
    }
}

/// Nested description of the robot slots a play needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RequirementTree {
    Leaf(RoleRequirement),
    Group {
        name: String,
        children: Vec<RequirementTree>,
    },
}

impl RequirementTree {
    pub fn leaf(requirement: RoleRequirement) -> Self {
        RequirementTree::Leaf(requirement)
    }

    pub fn group(name: impl Into<String>, children: Vec<RequirementTree>) -> Self {
        RequirementTree::Group {
            name: name.into(),
            children,
        }
    }

    /// Visit every leaf depth-first, left to right.
    pub fn for_each_leaf_mut(&mut self, mut f: impl FnMut(&mut RoleRequirement)) {
        self.visit_mut(&mut f);
    }

    fn visit_mut(&mut self, f: &mut impl FnMut(&mut RoleRequirement)) {
        match self {
            RequirementTree::Leaf(req) => f(req),
            RequirementTree::Group { children, .. } => {
                for child in children {
                    child.visit_mut(f);
                }
            }
        }
    }

    /// All leaves, depth-first, left to right.
    pub fn leaves(&self) -> Vec<&RoleRequirement> {
        let mut out = Vec::new();
        self.collect(&mut out);
        out
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a RoleRequirement>) {
        match self {
            RequirementTree::Leaf(req) => out.push(req),
            RequirementTree::Group { children, .. } => {
                for child in children {
                    child.collect(out);
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.leaves().is_empty()
    }
}
