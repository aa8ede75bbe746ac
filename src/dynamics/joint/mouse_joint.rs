//! A mouse joint: a soft spring-damped point constraint from an anchor on
//! one body to a world-space target, used for interactive dragging (spec
//! §3 joint type "mouse"; Box2D's `b2MouseJoint` is the shape this
//! follows).

use crate::math::{Point, Real};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MouseJoint {
    pub local_anchor1: Point,
    pub target: Point,
    pub max_force: Real,
    pub stiffness: Real,
    pub damping: Real,
}

impl MouseJoint {
    pub fn new(target: Point, max_force: Real) -> Self {
        Self {
            local_anchor1: Point::origin(),
            target,
            max_force,
            stiffness: 50.0,
            damping: 0.7,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MouseJointBuilder(MouseJoint);

impl MouseJointBuilder {
    pub fn new(target: Point, max_force: Real) -> Self {
        Self(MouseJoint::new(target, max_force))
    }

    pub fn local_anchor1(mut self, anchor1: Point) -> Self {
        self.0.local_anchor1 = anchor1;
        self
    }

    pub fn stiffness(mut self, stiffness: Real, damping: Real) -> Self {
        self.0.stiffness = stiffness;
        self.0.damping = damping;
        self
    }

    pub fn build(self) -> MouseJoint {
        self.0
    }
}
