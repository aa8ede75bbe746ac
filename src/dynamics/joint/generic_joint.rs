//! The axis-lock joint engine (spec §3 "Joint"), generalizing the teacher's
//! `FixedJoint`/`FixedJointBuilder` pattern: a joint frame on each body plus
//! a bitmask of which of the 3 relative-pose axes (x, y, angle) are locked.
//! `Weld`, `Revolute`, `Prismatic`, `Angle` and `Friction` joints are thin
//! wrappers configuring this engine rather than bespoke solvers.

use bitflags::bitflags;

use crate::math::{Isometry, Point, Real};

bitflags! {
    /// Which relative-pose axes between the two bodies a joint constrains.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct JointAxesMask: u8 {
        const LOCKED_X     = 1 << 0;
        const LOCKED_Y     = 1 << 1;
        const LOCKED_ANGLE = 1 << 2;

        /// Weld: every relative axis locked.
        const LOCKED_FIXED_AXES = Self::LOCKED_X.bits() | Self::LOCKED_Y.bits() | Self::LOCKED_ANGLE.bits();
        /// Revolute: linear axes locked, free to rotate.
        const LOCKED_REVOLUTE_AXES = Self::LOCKED_X.bits() | Self::LOCKED_Y.bits();
        /// Angle: only relative orientation locked.
        const LOCKED_ANGLE_ONLY = Self::LOCKED_ANGLE.bits();
    }
}

/// An optional motor driving a free (unlocked) axis toward a target
/// velocity, clamped to a maximum torque/force (used by `Motor`, `Wheel`).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct JointMotor {
    pub target_velocity: Real,
    pub max_impulse: Real,
    pub enabled: bool,
}

impl Default for JointMotor {
    fn default() -> Self {
        Self {
            target_velocity: 0.0,
            max_impulse: 0.0,
            enabled: false,
        }
    }
}

/// An optional one-sided limit on a free axis (used by `Prismatic`,
/// `Revolute`, `Wheel`).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct JointLimit {
    pub min: Real,
    pub max: Real,
    pub enabled: bool,
}

impl Default for JointLimit {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 0.0,
            enabled: false,
        }
    }
}

/// The shared joint data every axis-lock joint wraps.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct GenericJoint {
    pub locked_axes: JointAxesMask,
    pub local_frame1: Isometry,
    pub local_frame2: Isometry,
    pub collide_connected: bool,
}

impl GenericJoint {
    pub fn new(locked_axes: JointAxesMask) -> Self {
        Self {
            locked_axes,
            local_frame1: Isometry::identity(),
            local_frame2: Isometry::identity(),
            collide_connected: false,
        }
    }

    pub fn local_anchor1(&self) -> Point {
        self.local_frame1 * Point::origin()
    }

    pub fn set_local_anchor1(&mut self, anchor1: Point) {
        self.local_frame1.translation.vector = anchor1.coords;
    }

    pub fn local_anchor2(&self) -> Point {
        self.local_frame2 * Point::origin()
    }

    pub fn set_local_anchor2(&mut self, anchor2: Point) {
        self.local_frame2.translation.vector = anchor2.coords;
    }

    pub fn set_local_frame1(&mut self, frame: Isometry) {
        self.local_frame1 = frame;
    }

    pub fn set_local_frame2(&mut self, frame: Isometry) {
        self.local_frame2 = frame;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct GenericJointBuilder(GenericJoint);

impl GenericJointBuilder {
    pub fn new(locked_axes: JointAxesMask) -> Self {
        Self(GenericJoint::new(locked_axes))
    }

    pub fn local_anchor1(mut self, anchor1: Point) -> Self {
        self.0.set_local_anchor1(anchor1);
        self
    }

    pub fn local_anchor2(mut self, anchor2: Point) -> Self {
        self.0.set_local_anchor2(anchor2);
        self
    }

    pub fn collide_connected(mut self, collide: bool) -> Self {
        self.0.collide_connected = collide;
        self
    }

    pub fn build(self) -> GenericJoint {
        self.0
    }
}

impl Default for GenericJoint {
    fn default() -> Self {
        Self::new(JointAxesMask::empty())
    }
}
