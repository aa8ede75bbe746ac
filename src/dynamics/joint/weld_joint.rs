//! A weld joint: locks all relative motion between two bodies (spec §3
//! joint type "weld"). Directly mirrors the teacher's `FixedJoint`.

use crate::dynamics::joint::generic_joint::{GenericJoint, GenericJointBuilder, JointAxesMask};
use crate::math::{Isometry, Point};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WeldJoint {
    pub(crate) data: GenericJoint,
}

impl Default for WeldJoint {
    fn default() -> Self {
        Self::new()
    }
}

impl WeldJoint {
    pub fn new() -> Self {
        Self {
            data: GenericJointBuilder::new(JointAxesMask::LOCKED_FIXED_AXES).build(),
        }
    }

    pub fn local_frame1(&self) -> &Isometry {
        &self.data.local_frame1
    }

    pub fn set_local_frame1(&mut self, frame: Isometry) -> &mut Self {
        self.data.set_local_frame1(frame);
        self
    }

    pub fn local_frame2(&self) -> &Isometry {
        &self.data.local_frame2
    }

    pub fn set_local_frame2(&mut self, frame: Isometry) -> &mut Self {
        self.data.set_local_frame2(frame);
        self
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
}

impl From<WeldJoint> for GenericJoint {
    fn from(joint: WeldJoint) -> Self {
        joint.data
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct WeldJointBuilder(WeldJoint);

impl WeldJointBuilder {
    pub fn new() -> Self {
        Self(WeldJoint::new())
    }

    pub fn local_anchor1(mut self, anchor1: Point) -> Self {
        self.0.set_local_anchor1(anchor1);
        self
    }

    pub fn local_anchor2(mut self, anchor2: Point) -> Self {
        self.0.set_local_anchor2(anchor2);
        self
    }

    pub fn build(self) -> WeldJoint {
        self.0
    }
}
