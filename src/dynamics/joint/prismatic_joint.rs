//! A prismatic (slider) joint: locks relative rotation and the axis
//! perpendicular to travel, leaves translation along the local x axis of
//! `local_frame1` free, with an optional motor and limit (spec §3 joint
//! type "prismatic").

use crate::dynamics::joint::generic_joint::{
    GenericJoint, GenericJointBuilder, JointAxesMask, JointLimit, JointMotor,
};
use crate::math::Point;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PrismaticJoint {
    pub(crate) data: GenericJoint,
    pub motor: JointMotor,
    pub limit: JointLimit,
}

impl Default for PrismaticJoint {
    fn default() -> Self {
        Self::new()
    }
}

impl PrismaticJoint {
    pub fn new() -> Self {
        Self {
            data: GenericJointBuilder::new(JointAxesMask::LOCKED_Y | JointAxesMask::LOCKED_ANGLE)
                .build(),
            motor: JointMotor::default(),
            limit: JointLimit::default(),
        }
    }

    pub fn local_anchor1(&self) -> Point {
        self.data.local_anchor1()
    }

    pub fn set_local_anchor1(&mut self, anchor1: Point) -> &mut Self {
        self.data.set_local_anchor1(anchor1);
        self
    }

    pub fn local_anchor2(&self) -> Point {
        self.data.local_anchor2()
    }

    pub fn set_local_anchor2(&mut self, anchor2: Point) -> &mut Self {
        self.data.set_local_anchor2(anchor2);
        self
    }

    pub fn set_motor(&mut self, target_velocity: crate::math::Real, max_impulse: crate::math::Real) -> &mut Self {
        self.motor = JointMotor {
            target_velocity,
            max_impulse,
            enabled: true,
        };
        self
    }

    pub fn set_limit(&mut self, min: crate::math::Real, max: crate::math::Real) -> &mut Self {
        self.limit = JointLimit {
            min,
            max,
            enabled: true,
        };
        self
    }
}

impl From<PrismaticJoint> for GenericJoint {
    fn from(joint: PrismaticJoint) -> Self {
        joint.data
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct PrismaticJointBuilder(PrismaticJoint);

impl PrismaticJointBuilder {
    pub fn new() -> Self {
        Self(PrismaticJoint::new())
    }

    pub fn local_anchor1(mut self, anchor1: Point) -> Self {
        self.0.set_local_anchor1(anchor1);
        self
    }

    pub fn local_anchor2(mut self, anchor2: Point) -> Self {
        self.0.set_local_anchor2(anchor2);
        self
    }

    pub fn limit(mut self, min: crate::math::Real, max: crate::math::Real) -> Self {
        self.0.set_limit(min, max);
        self
    }

    pub fn build(self) -> PrismaticJoint {
        self.0
    }
}
