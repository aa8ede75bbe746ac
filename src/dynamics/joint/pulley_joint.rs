//! A pulley joint: couples two bodies through fixed ground anchors so that
//! the sum `length1 + ratio * length2` stays constant (spec §3 joint type
//! "pulley"; Box2D's `b2PulleyJoint` is the shape this follows).

use crate::math::{Point, Real};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PulleyJoint {
    pub ground_anchor1: Point,
    pub ground_anchor2: Point,
    pub local_anchor1: Point,
    pub local_anchor2: Point,
    pub ratio: Real,
    /// `length1 + ratio * length2` at the moment the joint was created,
    /// held constant thereafter.
    pub constant: Real,
}

impl PulleyJoint {
    pub fn new(
        ground_anchor1: Point,
        ground_anchor2: Point,
        local_anchor1: Point,
        local_anchor2: Point,
        ratio: Real,
        length1: Real,
        length2: Real,
    ) -> Self {
        Self {
            ground_anchor1,
            ground_anchor2,
            local_anchor1,
            local_anchor2,
            ratio,
            constant: length1 + ratio * length2,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PulleyJointBuilder(PulleyJoint);

impl PulleyJointBuilder {
    pub fn new(
        ground_anchor1: Point,
        ground_anchor2: Point,
        local_anchor1: Point,
        local_anchor2: Point,
        ratio: Real,
        length1: Real,
        length2: Real,
    ) -> Self {
        Self(PulleyJoint::new(
            ground_anchor1,
            ground_anchor2,
            local_anchor1,
            local_anchor2,
            ratio,
            length1,
            length2,
        ))
    }

    pub fn build(self) -> PulleyJoint {
        self.0
    }
}
