//! Joints (spec §3 "Joint"): a closed set of joint kinds, each a thin
//! configuration wrapper over either the shared axis-lock engine
//! ([`generic_joint`]) or a bespoke velocity-only solve, dispatched through
//! [`JointInstance`]'s three solver hooks (spec §9 Design Notes).

mod angle_joint;
mod distance_joint;
mod friction_joint;
mod generic_joint;
mod motor_joint;
mod mouse_joint;
mod prismatic_joint;
mod pulley_joint;
mod revolute_joint;
mod weld_joint;
mod wheel_joint;

mod joint_set;

pub use angle_joint::{AngleJoint, AngleJointBuilder};
pub use distance_joint::{DistanceJoint, DistanceJointBuilder, RopeJoint, RopeJointBuilder};
pub use friction_joint::{FrictionJoint, FrictionJointBuilder};
pub use generic_joint::{GenericJoint, GenericJointBuilder, JointAxesMask, JointLimit, JointMotor};
pub use joint_set::{Joint, JointInstance, JointSet};
pub use motor_joint::{MotorJoint, MotorJointBuilder};
pub use mouse_joint::{MouseJoint, MouseJointBuilder};
pub use prismatic_joint::{PrismaticJoint, PrismaticJointBuilder};
pub use pulley_joint::{PulleyJoint, PulleyJointBuilder};
pub use revolute_joint::{RevoluteJoint, RevoluteJointBuilder};
pub use weld_joint::{WeldJoint, WeldJointBuilder};
pub use wheel_joint::{WheelJoint, WheelJointBuilder};
