//! A friction joint: no position constraint at all, just a velocity-only
//! drag toward zero relative linear and angular velocity, clamped to
//! maximum force/torque (spec §3 joint type "friction"; Box2D's
//! `b2FrictionJoint` is the standard shape for this).

use crate::math::{Point, Real};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrictionJoint {
    pub local_anchor1: Point,
    pub local_anchor2: Point,
    pub max_force: Real,
    pub max_torque: Real,
}

impl FrictionJoint {
    pub fn new(max_force: Real, max_torque: Real) -> Self {
        Self {
            local_anchor1: Point::origin(),
            local_anchor2: Point::origin(),
            max_force,
            max_torque,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrictionJointBuilder(FrictionJoint);

impl FrictionJointBuilder {
    pub fn new(max_force: Real, max_torque: Real) -> Self {
        Self(FrictionJoint::new(max_force, max_torque))
    }

    pub fn local_anchor1(mut self, anchor1: Point) -> Self {
        self.0.local_anchor1 = anchor1;
        self
    }

    pub fn local_anchor2(mut self, anchor2: Point) -> Self {
        self.0.local_anchor2 = anchor2;
        self
    }

    pub fn build(self) -> FrictionJoint {
        self.0
    }
}
