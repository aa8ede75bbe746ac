//! Bodies, joints, islands and the Sequential Impulses constraint solver
//! (spec §3 "Body"/"Joint"/"Island", §4.6, §4.7, §4.8).

mod ccd;
mod integration_parameters;
pub mod island;
pub mod joint;
mod rigid_body;
pub mod solver;

pub use ccd::{CcdQuery, CcdSolver, ToiEvent};
pub use integration_parameters::{CcdMode, Settings};
pub use island::{build_islands, Island};
pub use joint::{Joint, JointInstance, JointSet};
pub use rigid_body::{MassType, RigidBody, RigidBodyBuilder};
pub use solver::{ANGULAR_SLOP, LINEAR_SLOP};

use crate::data::Index;

/// Storage for rigid bodies, keyed by stable [`Index`] (spec §9: "bodies
/// live in a vector indexed by `BodyId`").
pub type RigidBodySet = crate::data::Arena<RigidBody>;

/// An unordered pair of body ids, the key a contact or joint is filed
/// under for island traversal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BodyPair(pub Index, pub Index);

impl BodyPair {
    pub fn new(a: Index, b: Index) -> Self {
        Self(a, b)
    }
}
