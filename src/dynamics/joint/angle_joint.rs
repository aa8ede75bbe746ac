//! An angle joint: locks relative orientation only, leaving both bodies
//! free to translate independently (spec §3 joint type "angle").

use crate::dynamics::joint::generic_joint::{GenericJoint, GenericJointBuilder, JointAxesMask};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AngleJoint {
    pub(crate) data: GenericJoint,
}

impl Default for AngleJoint {
    fn default() -> Self {
        Self::new()
    }
}

impl AngleJoint {
    pub fn new() -> Self {
        Self {
            data: GenericJointBuilder::new(JointAxesMask::LOCKED_ANGLE_ONLY).build(),
        }
    }
}

impl From<AngleJoint> for GenericJoint {
    fn from(joint: AngleJoint) -> Self {
        joint.data
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct AngleJointBuilder(AngleJoint);

impl AngleJointBuilder {
    pub fn new() -> Self {
        Self(AngleJoint::new())
    }

    pub fn collide_connected(mut self, collide: bool) -> Self {
        self.0.data.collide_connected = collide;
        self
    }

    pub fn build(self) -> AngleJoint {
        self.0
    }
}
