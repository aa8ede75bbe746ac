//! A wheel joint: a prismatic slider (suspension travel along a local
//! axis) plus a free rotation at the anchor, with an optional suspension
//! spring and a drive motor on the rotation (spec §3 joint type "wheel";
//! Box2D's `b2WheelJoint` is the shape this follows).

use crate::dynamics::joint::generic_joint::JointMotor;
use crate::math::{Point, Real, Vector};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WheelJoint {
    pub local_anchor1: Point,
    pub local_anchor2: Point,
    /// Suspension travel axis, in body 1's local space.
    pub local_axis1: Vector,
    pub suspension_stiffness: Real,
    pub suspension_damping: Real,
    pub motor: JointMotor,
}

impl WheelJoint {
    pub fn new(local_axis1: Vector) -> Self {
        Self {
            local_anchor1: Point::origin(),
            local_anchor2: Point::origin(),
            local_axis1,
            suspension_stiffness: 0.0,
            suspension_damping: 0.0,
            motor: JointMotor::default(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WheelJointBuilder(WheelJoint);

impl WheelJointBuilder {
    pub fn new(local_axis1: Vector) -> Self {
        Self(WheelJoint::new(local_axis1))
    }

    pub fn local_anchor1(mut self, anchor1: Point) -> Self {
        self.0.local_anchor1 = anchor1;
        self
    }

    pub fn local_anchor2(mut self, anchor2: Point) -> Self {
        self.0.local_anchor2 = anchor2;
        self
    }

    pub fn suspension(mut self, stiffness: Real, damping: Real) -> Self {
        self.0.suspension_stiffness = stiffness;
        self.0.suspension_damping = damping;
        self
    }

    pub fn motor(mut self, target_velocity: Real, max_impulse: Real) -> Self {
        self.0.motor = JointMotor {
            target_velocity,
            max_impulse,
            enabled: true,
        };
        self
    }

    pub fn build(self) -> WheelJoint {
        self.0
    }
}
