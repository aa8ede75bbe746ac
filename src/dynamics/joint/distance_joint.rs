//! Distance and rope joints (spec §3 joint types "distance", "rope"): both
//! constrain the distance between two anchor points, but distance is a
//! rigid equality (optionally spring-damped) while rope is a one-sided
//! "no farther than" inequality — the slack-rope idiom Box2D's
//! `b2RopeJoint` and rapier's `RopeJoint` both use.

use crate::math::{Point, Real};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DistanceJoint {
    pub local_anchor1: Point,
    pub local_anchor2: Point,
    pub rest_length: Real,
    /// When `Some`, the constraint is a soft spring (stiffness, damping)
    /// instead of a rigid equality.
    pub spring: Option<(Real, Real)>,
}

impl DistanceJoint {
    pub fn new(rest_length: Real) -> Self {
        Self {
            local_anchor1: Point::origin(),
            local_anchor2: Point::origin(),
            rest_length,
            spring: None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DistanceJointBuilder(DistanceJoint);

impl DistanceJointBuilder {
    pub fn new(rest_length: Real) -> Self {
        Self(DistanceJoint::new(rest_length))
    }

    pub fn local_anchor1(mut self, anchor1: Point) -> Self {
        self.0.local_anchor1 = anchor1;
        self
    }

    pub fn local_anchor2(mut self, anchor2: Point) -> Self {
        self.0.local_anchor2 = anchor2;
        self
    }

    pub fn spring(mut self, stiffness: Real, damping: Real) -> Self {
        self.0.spring = Some((stiffness, damping));
        self
    }

    pub fn build(self) -> DistanceJoint {
        self.0
    }
}

/// A distance joint with only a maximum length: bodies may approach freely
/// but never separate past `max_length` (spec: "rope").
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RopeJoint {
    pub local_anchor1: Point,
    pub local_anchor2: Point,
    pub max_length: Real,
}

impl RopeJoint {
    pub fn new(max_length: Real) -> Self {
        Self {
            local_anchor1: Point::origin(),
            local_anchor2: Point::origin(),
            max_length,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RopeJointBuilder(RopeJoint);

impl RopeJointBuilder {
    pub fn new(max_length: Real) -> Self {
        Self(RopeJoint::new(max_length))
    }

    pub fn local_anchor1(mut self, anchor1: Point) -> Self {
        self.0.local_anchor1 = anchor1;
        self
    }

    pub fn local_anchor2(mut self, anchor2: Point) -> Self {
        self.0.local_anchor2 = anchor2;
        self
    }

    pub fn build(self) -> RopeJoint {
        self.0
    }
}
