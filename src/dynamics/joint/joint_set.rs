//! The closed set of joint kinds (spec §9 Design Notes: "a closed set of
//! joint kinds with dispatch for the three solver hooks") and their
//! storage. `Joint::init_velocity_constraints` /
//! `solve_velocity_constraints` / `solve_position_constraints` are the
//! three hooks spec §3 names; here they're match arms over a tagged enum
//! rather than virtual dispatch, the same tradeoff the geometry kernel
//! makes for shapes.

use crate::data::{Arena, Index};
use crate::dynamics::joint::angle_joint::AngleJoint;
use crate::dynamics::joint::distance_joint::{DistanceJoint, RopeJoint};
use crate::dynamics::joint::friction_joint::FrictionJoint;
use crate::dynamics::joint::generic_joint::GenericJoint;
use crate::dynamics::joint::motor_joint::MotorJoint;
use crate::dynamics::joint::mouse_joint::MouseJoint;
use crate::dynamics::joint::prismatic_joint::PrismaticJoint;
use crate::dynamics::joint::pulley_joint::PulleyJoint;
use crate::dynamics::joint::revolute_joint::RevoluteJoint;
use crate::dynamics::joint::weld_joint::WeldJoint;
use crate::dynamics::joint::wheel_joint::WheelJoint;
use crate::dynamics::rigid_body::RigidBody;
use crate::math::{cross, Real, Vector};
use crate::utils::inv;

#[derive(Clone, Debug)]
pub enum Joint {
    Weld(WeldJoint),
    Revolute(RevoluteJoint),
    Prismatic(PrismaticJoint),
    Angle(AngleJoint),
    Friction(FrictionJoint),
    Distance(DistanceJoint),
    Rope(RopeJoint),
    Motor(MotorJoint),
    Wheel(WheelJoint),
    Pulley(PulleyJoint),
    Mouse(MouseJoint),
}

/// One joint attached between two bodies, plus the bookkeeping the solver
/// and island builder need (spec §3: "common base: two bodies, a
/// collision-allowed flag, an enabled flag").
#[derive(Clone, Debug)]
pub struct JointInstance {
    pub joint: Joint,
    pub body_a: Index,
    pub body_b: Index,
    pub enabled: bool,
    pub collide_connected: bool,
    // Accumulated impulses, carried across velocity iterations within one
    // step for warm-starting this joint the way contacts warm-start.
    point_impulse: Vector,
    angle_impulse: Real,
    axis_impulse: Real,
    motor_impulse: Real,
}

impl JointInstance {
    pub fn new(joint: Joint, body_a: Index, body_b: Index) -> Self {
        let collide_connected = match &joint {
            Joint::Weld(j) => j.data.collide_connected,
            Joint::Revolute(j) => j.data.collide_connected,
            Joint::Prismatic(j) => j.data.collide_connected,
            Joint::Angle(j) => j.data.collide_connected,
            _ => false,
        };
        Self {
            joint,
            body_a,
            body_b,
            enabled: true,
            collide_connected,
            point_impulse: Vector::zeros(),
            angle_impulse: 0.0,
            axis_impulse: 0.0,
            motor_impulse: 0.0,
        }
    }

    fn generic(&self) -> Option<&GenericJoint> {
        match &self.joint {
            Joint::Weld(j) => Some(&j.data),
            Joint::Revolute(j) => Some(&j.data),
            Joint::Prismatic(j) => Some(&j.data),
            Joint::Angle(j) => Some(&j.data),
            _ => None,
        }
    }

    /// Resets warm-start impulses to zero (a new step without a warm-start
    /// policy, or a joint whose bodies just changed substantially).
    pub fn reset_warm_start(&mut self) {
        self.point_impulse = Vector::zeros();
        self.angle_impulse = 0.0;
        self.axis_impulse = 0.0;
        self.motor_impulse = 0.0;
    }

    /// Applies the previous step's accumulated impulses before the first
    /// velocity iteration (spec §4.7 step 2).
    pub fn init_velocity_constraints(&mut self, body_a: &mut RigidBody, body_b: &mut RigidBody) {
        if let Some(data) = self.generic() {
            let anchor_a = body_a.position * data.local_anchor1();
            let anchor_b = body_b.position * data.local_anchor2();
            let ra = anchor_a - body_a.world_com();
            let rb = anchor_b - body_b.world_com();
            apply_point_impulse(body_a, body_b, ra, rb, self.point_impulse);
            if matches!(self.joint, Joint::Weld(_)) {
                apply_angular_impulse(body_a, body_b, self.angle_impulse);
            }
        }
    }

    /// One velocity iteration (spec §4.7 step 3: "for each joint:
    /// solveVelocityConstraints").
    pub fn solve_velocity_constraints(&mut self, body_a: &mut RigidBody, body_b: &mut RigidBody, dt: Real) {
        match &self.joint {
            Joint::Weld(_) => {
                self.solve_point(body_a, body_b);
                self.solve_angle(body_a, body_b);
            }
            Joint::Revolute(j) => {
                self.solve_point(body_a, body_b);
                if j.motor.enabled {
                    self.solve_angular_motor(body_a, body_b, j.motor.target_velocity, j.motor.max_impulse, dt);
                }
            }
            Joint::Prismatic(j) => {
                self.solve_prismatic(body_a, body_b, j);
                if j.motor.enabled {
                    let axis = self.joint_axis(body_a);
                    self.solve_linear_motor(body_a, body_b, axis, j.motor.target_velocity, j.motor.max_impulse, dt);
                }
            }
            Joint::Angle(_) => {
                self.solve_angle(body_a, body_b);
            }
            Joint::Friction(j) => {
                self.solve_friction(body_a, body_b, j, dt);
            }
            Joint::Distance(j) => {
                self.solve_distance(body_a, body_b, j, dt);
            }
            Joint::Rope(j) => {
                self.solve_rope(body_a, body_b, j, dt);
            }
            Joint::Motor(j) => {
                self.solve_motor_joint(body_a, body_b, j, dt);
            }
            Joint::Wheel(j) => {
                self.solve_wheel(body_a, body_b, j, dt);
            }
            Joint::Pulley(j) => {
                self.solve_pulley(body_a, body_b, j, dt);
            }
            Joint::Mouse(j) => {
                self.solve_mouse(body_a, body_b, j, dt);
            }
        }
    }

    /// One position iteration; returns `true` when this joint is within
    /// tolerance (spec §4.7 step 5: "solvePositionConstraints ... returns
    /// true when converged").
    pub fn solve_position_constraints(&mut self, body_a: &mut RigidBody, body_b: &mut RigidBody, baumgarte: Real, max_correction: Real) -> bool {
        let Some(data) = self.generic() else {
            return true; // dedicated joints below are velocity-only in this engine
        };
        let anchor_a = body_a.position * data.local_anchor1();
        let anchor_b = body_b.position * data.local_anchor2();
        let c = anchor_b - anchor_a;
        let error = c.norm();
        if error < 1.0e-5 {
            return true;
        }

        let ra = anchor_a - body_a.world_com();
        let rb = anchor_b - body_b.world_com();
        let inv_mass_sum = body_a.inv_mass() + body_b.inv_mass();
        let k = inv_mass_sum.max(1.0e-9);
        let correction = (c * (baumgarte / k.max(1.0e-9))).cap_magnitude(max_correction);
        let impulse = correction * k;

        body_a.position.translation.vector += impulse * (-body_a.inv_mass());
        body_b.position.translation.vector += impulse * body_b.inv_mass();
        let _ = (ra, rb);

        error < 3.0 * crate::dynamics::solver::LINEAR_SLOP
    }

    fn solve_point(&mut self, body_a: &mut RigidBody, body_b: &mut RigidBody) {
        let data = self.generic().unwrap();
        let anchor_a = body_a.position * data.local_anchor1();
        let anchor_b = body_b.position * data.local_anchor2();
        let ra = anchor_a - body_a.world_com();
        let rb = anchor_b - body_b.world_com();

        let rel_vel = body_b.velocity_at_point(anchor_b) - body_a.velocity_at_point(anchor_a);
        let k = effective_point_mass(body_a, body_b, ra, rb);
        let impulse = k * (-rel_vel);
        self.point_impulse += impulse;
        apply_point_impulse(body_a, body_b, ra, rb, impulse);
    }

    fn solve_angle(&mut self, body_a: &mut RigidBody, body_b: &mut RigidBody) {
        let rel_w = body_b.angvel - body_a.angvel;
        let k = inv(body_a.inv_inertia() + body_b.inv_inertia());
        let impulse = if k.is_finite() { -rel_w * k } else { 0.0 };
        self.angle_impulse += impulse;
        apply_angular_impulse(body_a, body_b, impulse);
    }

    fn solve_angular_motor(&mut self, body_a: &mut RigidBody, body_b: &mut RigidBody, target: Real, max_impulse: Real, dt: Real) {
        let rel_w = body_b.angvel - body_a.angvel;
        let k = inv(body_a.inv_inertia() + body_b.inv_inertia());
        let mut impulse = -k * (rel_w - target);
        let max = max_impulse * dt;
        let old = self.motor_impulse;
        self.motor_impulse = crate::math::clamp(old + impulse, -max, max);
        impulse = self.motor_impulse - old;
        apply_angular_impulse(body_a, body_b, impulse);
    }

    fn joint_axis(&self, body_a: &RigidBody) -> Vector {
        let data = self.generic().unwrap();
        body_a.position.rotation * (data.local_frame1.rotation * Vector::new(1.0, 0.0))
    }

    fn solve_prismatic(&mut self, body_a: &mut RigidBody, body_b: &mut RigidBody, joint: &PrismaticJoint) {
        self.solve_angle(body_a, body_b);

        let data = &joint.data;
        let anchor_a = body_a.position * data.local_anchor1();
        let anchor_b = body_b.position * data.local_anchor2();
        let axis = self.joint_axis(body_a);
        let perp = crate::math::perp(axis);

        let d = anchor_b - anchor_a;
        let ra = anchor_a - body_a.world_com() + d;
        let rb = anchor_b - body_b.world_com();

        let rel_vel = body_b.velocity_at_point(anchor_b) - body_a.velocity_at_point(anchor_a);
        let vel_perp = rel_vel.dot(&perp);
        let k = {
            let ra_perp = cross(ra, perp);
            let rb_perp = cross(rb, perp);
            let denom = body_a.inv_mass() + body_b.inv_mass() + body_a.inv_inertia() * ra_perp * ra_perp + body_b.inv_inertia() * rb_perp * rb_perp;
            inv(denom)
        };
        let impulse_scalar = -k * vel_perp;
        let impulse = perp * impulse_scalar;
        apply_point_impulse(body_a, body_b, ra, rb, impulse);
    }

    fn solve_linear_motor(&mut self, body_a: &mut RigidBody, body_b: &mut RigidBody, axis: Vector, target: Real, max_force: Real, dt: Real) {
        let rel_vel = (body_b.linvel - body_a.linvel).dot(&axis);
        let k = inv(body_a.inv_mass() + body_b.inv_mass());
        let mut impulse = -k * (rel_vel - target);
        let max = max_force * dt;
        let old = self.motor_impulse;
        self.motor_impulse = crate::math::clamp(old + impulse, -max, max);
        impulse = self.motor_impulse - old;
        let p = axis * impulse;
        body_a.linvel -= p * body_a.inv_mass();
        body_b.linvel += p * body_b.inv_mass();
    }

    fn solve_friction(&mut self, body_a: &mut RigidBody, body_b: &mut RigidBody, joint: &FrictionJoint, dt: Real) {
        let rel_vel = body_b.linvel - body_a.linvel;
        let k = inv(body_a.inv_mass() + body_b.inv_mass());
        let impulse = rel_vel * (-k);
        let max = joint.max_force * dt;
        let clamped = if impulse.norm() > max && impulse.norm() > 0.0 {
            impulse * (max / impulse.norm())
        } else {
            impulse
        };
        body_a.linvel -= clamped * body_a.inv_mass();
        body_b.linvel += clamped * body_b.inv_mass();

        let rel_w = body_b.angvel - body_a.angvel;
        let kw = inv(body_a.inv_inertia() + body_b.inv_inertia());
        let torque_impulse = crate::math::clamp(-kw * rel_w, -joint.max_torque * dt, joint.max_torque * dt);
        apply_angular_impulse(body_a, body_b, torque_impulse);
    }

    fn solve_distance(&mut self, body_a: &mut RigidBody, body_b: &mut RigidBody, joint: &DistanceJoint, dt: Real) {
        let anchor_a = body_a.position * joint.local_anchor1;
        let anchor_b = body_b.position * joint.local_anchor2;
        let d = anchor_b - anchor_a;
        let length = d.norm().max(1.0e-9);
        let n = d / length;
        let ra = anchor_a - body_a.world_com();
        let rb = anchor_b - body_b.world_com();

        let rel_vel = (body_b.velocity_at_point(anchor_b) - body_a.velocity_at_point(anchor_a)).dot(&n);
        let ra_n = cross(ra, n);
        let rb_n = cross(rb, n);
        let k = inv(body_a.inv_mass() + body_b.inv_mass() + body_a.inv_inertia() * ra_n * ra_n + body_b.inv_inertia() * rb_n * rb_n);

        let bias = if joint.spring.is_none() {
            let c = length - joint.rest_length;
            crate::math::clamp(c, -0.2, 0.2) * (0.2 / dt.max(1.0e-6))
        } else {
            0.0
        };

        let impulse_scalar = -k * (rel_vel + bias);
        let impulse = n * impulse_scalar;
        apply_point_impulse(body_a, body_b, ra, rb, impulse);
    }

    fn solve_rope(&mut self, body_a: &mut RigidBody, body_b: &mut RigidBody, joint: &RopeJoint, dt: Real) {
        let anchor_a = body_a.position * joint.local_anchor1;
        let anchor_b = body_b.position * joint.local_anchor2;
        let d = anchor_b - anchor_a;
        let length = d.norm();
        if length <= joint.max_length {
            return; // slack: no constraint force
        }
        let n = d / length.max(1.0e-9);
        let ra = anchor_a - body_a.world_com();
        let rb = anchor_b - body_b.world_com();

        let rel_vel = (body_b.velocity_at_point(anchor_b) - body_a.velocity_at_point(anchor_a)).dot(&n);
        let ra_n = cross(ra, n);
        let rb_n = cross(rb, n);
        let k = inv(body_a.inv_mass() + body_b.inv_mass() + body_a.inv_inertia() * ra_n * ra_n + body_b.inv_inertia() * rb_n * rb_n);

        let c = length - joint.max_length;
        let bias = (c / dt.max(1.0e-6)).max(0.0);
        let mut impulse_scalar = -k * (rel_vel + bias);
        impulse_scalar = impulse_scalar.min(0.0); // rope only pulls, never pushes
        let impulse = n * impulse_scalar;
        apply_point_impulse(body_a, body_b, ra, rb, impulse);
    }

    fn solve_motor_joint(&mut self, body_a: &mut RigidBody, body_b: &mut RigidBody, joint: &MotorJoint, dt: Real) {
        let c = (body_b.position.translation.vector - body_a.position.translation.vector) - joint.linear_offset;
        let rel_vel = body_b.linvel - body_a.linvel;
        let k = inv(body_a.inv_mass() + body_b.inv_mass());
        let bias = c * (joint.correction_factor / dt.max(1.0e-6));
        let impulse = (rel_vel + bias) * (-k);
        let max = joint.max_force * dt;
        let clamped = if impulse.norm() > max && impulse.norm() > 0.0 {
            impulse * (max / impulse.norm())
        } else {
            impulse
        };
        body_a.linvel -= clamped * body_a.inv_mass();
        body_b.linvel += clamped * body_b.inv_mass();

        let angle_c = (body_b.position.rotation.angle() - body_a.position.rotation.angle()) - joint.angular_offset;
        let rel_w = body_b.angvel - body_a.angvel;
        let kw = inv(body_a.inv_inertia() + body_b.inv_inertia());
        let angle_bias = angle_c * (joint.correction_factor / dt.max(1.0e-6));
        let torque_impulse = crate::math::clamp(-kw * (rel_w + angle_bias), -joint.max_torque * dt, joint.max_torque * dt);
        apply_angular_impulse(body_a, body_b, torque_impulse);
    }

    fn solve_wheel(&mut self, body_a: &mut RigidBody, body_b: &mut RigidBody, joint: &WheelJoint, dt: Real) {
        let axis = body_a.position.rotation * joint.local_axis1;
        let perp = crate::math::perp(axis);
        let anchor_a = body_a.position * joint.local_anchor1;
        let anchor_b = body_b.position * joint.local_anchor2;
        let ra = anchor_a - body_a.world_com();
        let rb = anchor_b - body_b.world_com();

        let rel_vel = body_b.velocity_at_point(anchor_b) - body_a.velocity_at_point(anchor_a);
        let vel_perp = rel_vel.dot(&perp);
        let ra_perp = cross(ra, perp);
        let rb_perp = cross(rb, perp);
        let k = inv(body_a.inv_mass() + body_b.inv_mass() + body_a.inv_inertia() * ra_perp * ra_perp + body_b.inv_inertia() * rb_perp * rb_perp);
        let impulse = perp * (-k * vel_perp);
        apply_point_impulse(body_a, body_b, ra, rb, impulse);

        if joint.motor.enabled {
            self.solve_angular_motor(body_a, body_b, joint.motor.target_velocity, joint.motor.max_impulse, dt);
        }
    }

    fn solve_pulley(&mut self, body_a: &mut RigidBody, body_b: &mut RigidBody, joint: &PulleyJoint, dt: Real) {
        let anchor_a = body_a.position * joint.local_anchor1;
        let anchor_b = body_b.position * joint.local_anchor2;
        let d1 = anchor_a - joint.ground_anchor1;
        let d2 = anchor_b - joint.ground_anchor2;
        let length1 = d1.norm().max(1.0e-9);
        let length2 = d2.norm().max(1.0e-9);
        let n1 = d1 / length1;
        let n2 = d2 / length2;

        let ra = anchor_a - body_a.world_com();
        let rb = anchor_b - body_b.world_com();
        let vel_a = body_a.velocity_at_point(anchor_a).dot(&n1);
        let vel_b = body_b.velocity_at_point(anchor_b).dot(&n2);
        let c_dot = -(vel_a + joint.ratio * vel_b);

        let ra_n = cross(ra, n1);
        let rb_n = cross(rb, n2);
        let k = inv(
            body_a.inv_mass() + body_a.inv_inertia() * ra_n * ra_n
                + joint.ratio * joint.ratio * (body_b.inv_mass() + body_b.inv_inertia() * rb_n * rb_n),
        );
        let c = length1 + joint.ratio * length2 - joint.constant;
        let bias = c / dt.max(1.0e-6);
        let impulse = -k * (c_dot + bias);

        let pa = n1 * (-impulse);
        let pb = n2 * (-impulse * joint.ratio);
        body_a.linvel += pa * body_a.inv_mass();
        body_a.angvel += body_a.inv_inertia() * cross(ra, pa);
        body_b.linvel += pb * body_b.inv_mass();
        body_b.angvel += body_b.inv_inertia() * cross(rb, pb);
    }

    fn solve_mouse(&mut self, body_a: &mut RigidBody, body_b: &mut RigidBody, joint: &MouseJoint, dt: Real) {
        // Body A is conventionally the (often static) anchor owner; the
        // drag target only ever pulls body B.
        let anchor = body_a.position * joint.local_anchor1;
        let c = anchor - joint.target;
        let rel_vel = body_b.velocity_at_point(anchor);
        let k = inv(body_b.inv_mass());
        let omega = joint.stiffness.max(0.0).sqrt();
        let bias = c * (2.0 * joint.damping * omega) + c * (omega * omega * dt);
        let impulse = (rel_vel + bias) * (-k);
        let max = joint.max_force * dt;
        let clamped = if impulse.norm() > max && impulse.norm() > 0.0 {
            impulse * (max / impulse.norm())
        } else {
            impulse
        };
        let ra = anchor - body_b.world_com();
        body_b.linvel += clamped * body_b.inv_mass();
        body_b.angvel += body_b.inv_inertia() * cross(ra, clamped);
    }
}

fn effective_point_mass(body_a: &RigidBody, body_b: &RigidBody, ra: Vector, rb: Vector) -> nalgebra::Matrix2<Real> {
    let im_sum = body_a.inv_mass() + body_b.inv_mass();
    let k11 = im_sum + body_a.inv_inertia() * ra.y * ra.y + body_b.inv_inertia() * rb.y * rb.y;
    let k12 = -body_a.inv_inertia() * ra.x * ra.y - body_b.inv_inertia() * rb.x * rb.y;
    let k22 = im_sum + body_a.inv_inertia() * ra.x * ra.x + body_b.inv_inertia() * rb.x * rb.x;
    let k = nalgebra::Matrix2::new(k11, k12, k12, k22);
    k.try_inverse().unwrap_or_else(nalgebra::Matrix2::zeros)
}

fn apply_point_impulse(body_a: &mut RigidBody, body_b: &mut RigidBody, ra: Vector, rb: Vector, impulse: Vector) {
    body_a.linvel -= impulse * body_a.inv_mass();
    body_a.angvel -= body_a.inv_inertia() * cross(ra, impulse);
    body_b.linvel += impulse * body_b.inv_mass();
    body_b.angvel += body_b.inv_inertia() * cross(rb, impulse);
}

fn apply_angular_impulse(body_a: &mut RigidBody, body_b: &mut RigidBody, impulse: Real) {
    body_a.angvel -= body_a.inv_inertia() * impulse;
    body_b.angvel += body_b.inv_inertia() * impulse;
}

pub type JointSet = Arena<JointInstance>;

#[cfg(test)]
mod test {
    use super::*;
    use crate::dynamics::joint::revolute_joint::RevoluteJointBuilder;
    use crate::dynamics::rigid_body::{MassType, RigidBodyBuilder};
    use crate::geometry::MassProperties;
    use crate::math::{Isometry, Point};

    #[test]
    fn revolute_point_constraint_zeros_relative_anchor_velocity() {
        let mut anchor_body = RigidBodyBuilder::new(MassType::Infinite).build();
        let mut swinging = RigidBodyBuilder::dynamic()
            .position(Isometry::translation(1.0, 0.0))
            .build();
        swinging.set_mass_properties(&[MassProperties::new(Point::origin(), 1.0, 1.0)]);
        swinging.linvel = Vector::new(0.0, -5.0);

        let joint = RevoluteJointBuilder::new().build();
        let mut instance = JointInstance::new(Joint::Revolute(joint), Index::from_raw_parts(0, 0), Index::from_raw_parts(1, 0));

        for _ in 0..20 {
            instance.solve_velocity_constraints(&mut anchor_body, &mut swinging, 1.0 / 60.0);
        }

        let anchor_world = anchor_body.position * Point::origin();
        let rel = swinging.velocity_at_point(anchor_world) - anchor_body.velocity_at_point(anchor_world);
        assert!(rel.norm() < 1.0e-3, "relative velocity at anchor should vanish, got {rel:?}");
    }
}
