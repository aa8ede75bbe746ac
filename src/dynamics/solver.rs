//! Sequential Impulses constraint solver (spec §4.7): integrate velocities,
//! warm-start, iterate velocity constraints, integrate positions, iterate
//! position constraints, update the sleep timer. One [`solve_island`] call
//! handles one island for one step.

use crate::data::Index;
use crate::dynamics::island::Island;
use crate::dynamics::joint::JointSet;
use crate::dynamics::rigid_body::RigidBody;
use crate::dynamics::{RigidBodySet, Settings};
use crate::geometry::NarrowPhase;
use crate::math::{cross, Point, Real, Vector};
use crate::utils::inv;

/// Linear slop (spec §4.7 step 5, Box2D's `b2_linearSlop`): the amount of
/// allowed penetration before position correction kicks in, to keep
/// resting contacts from jittering.
pub const LINEAR_SLOP: Real = 0.005;

/// Angular counterpart of [`LINEAR_SLOP`], used by joints' position pass.
pub const ANGULAR_SLOP: Real = (2.0 / 180.0) * std::f64::consts::PI as Real;

struct PointConstraint {
    ra: Vector,
    rb: Vector,
    normal_mass: Real,
    tangent_mass: Real,
    velocity_bias: Real,
    local_anchor_a: Point,
    local_anchor_b: Point,
}

struct ContactConstraint {
    fixture_a: Index,
    fixture_b: Index,
    body_a: Index,
    body_b: Index,
    normal: Vector,
    local_normal: Vector,
    friction: Real,
    points: Vec<PointConstraint>,
}

/// Runs one full step (spec §4.7 steps 1-6) for a single island.
///
/// Returns `true` if every body in the island was slow enough this step to
/// advance the island's shared sleep timer (the caller tracks the timer
/// itself and decides when to actually put bodies to sleep, since that also
/// depends on whether the island gained a newly-awake member).
pub fn solve_island(
    island: &Island,
    bodies: &mut RigidBodySet,
    narrow_phase: &mut NarrowPhase,
    joints: &mut JointSet,
    settings: &Settings,
    gravity: Vector,
    dt: Real,
) -> bool {
    if dt <= 0.0 {
        return true;
    }

    // 1. Integrate velocities.
    for &id in &island.bodies {
        let Some(body) = bodies.get_mut(id) else { continue };
        integrate_velocity(body, gravity, settings, dt);
    }

    // 2. Init constraints: build per-point effective masses and warm-start.
    let mut constraints = Vec::with_capacity(island.contacts.len());
    for &(fixture_a, fixture_b) in &island.contacts {
        let Some(pair) = narrow_phase.get(fixture_a, fixture_b) else { continue };
        if pair.is_sensor || !pair.enabled || !pair.manifold.is_touching() {
            continue;
        }
        let body_a = pair.body_a;
        let body_b = pair.body_b;
        let (Some(a), Some(b)) = bodies.get2_mut(body_a, body_b) else { continue };

        let normal = pair.manifold.normal;
        let tangent = crate::math::perp(normal);
        let local_normal = a.position.rotation.inverse() * normal;

        let mut points = Vec::with_capacity(pair.manifold.points.len());
        for point in &pair.manifold.points {
            let ra = point.point - a.world_com();
            let rb = point.point - b.world_com();
            let normal_mass = effective_mass(a, b, ra, rb, normal);
            let tangent_mass = effective_mass(a, b, ra, rb, tangent);

            let rel_vel_n = (b.velocity_at_point(point.point) - a.velocity_at_point(point.point)).dot(&normal);
            let velocity_bias = if rel_vel_n < -settings.restitution_velocity_threshold {
                -pair.restitution * rel_vel_n
            } else {
                0.0
            };

            let impulse = normal * point.normal_impulse + tangent * point.tangent_impulse;
            a.linvel -= impulse * a.inv_mass();
            a.angvel -= a.inv_inertia() * cross(ra, impulse);
            b.linvel += impulse * b.inv_mass();
            b.angvel += b.inv_inertia() * cross(rb, impulse);

            points.push(PointConstraint {
                ra,
                rb,
                normal_mass,
                tangent_mass,
                velocity_bias,
                local_anchor_a: a.position.inverse_transform_point(&point.point),
                local_anchor_b: b.position.inverse_transform_point(&point.point),
            });
        }

        constraints.push(ContactConstraint {
            fixture_a,
            fixture_b,
            body_a,
            body_b,
            normal,
            local_normal,
            friction: pair.friction,
            points,
        });
    }

    for &joint_id in &island.joints {
        let Some(instance) = joints.get_mut(joint_id) else { continue };
        let (Some(a), Some(b)) = bodies.get2_mut(instance.body_a, instance.body_b) else { continue };
        instance.init_velocity_constraints(a, b);
    }

    // 3. Velocity iterations.
    for _ in 0..settings.velocity_iterations {
        for &joint_id in &island.joints {
            let Some(instance) = joints.get_mut(joint_id) else { continue };
            let (Some(a), Some(b)) = bodies.get2_mut(instance.body_a, instance.body_b) else { continue };
            instance.solve_velocity_constraints(a, b, dt);
        }

        for constraint in &constraints {
            let (Some(a), Some(b)) = bodies.get2_mut(constraint.body_a, constraint.body_b) else { continue };
            let Some(pair) = narrow_phase.get_mut(constraint.fixture_a, constraint.fixture_b) else { continue };
            let tangent = crate::math::perp(constraint.normal);

            for (point_constraint, point) in constraint.points.iter().zip(pair.manifold.points.iter_mut()) {
                // Tangent (friction) first, clamped to the current normal impulse.
                let rel_vel = b.velocity_at_point(point.point) - a.velocity_at_point(point.point);
                let vt = rel_vel.dot(&tangent);
                let mut lambda = -point_constraint.tangent_mass * vt;
                let max_friction = constraint.friction * point.normal_impulse;
                let old_tangent = point.tangent_impulse;
                point.tangent_impulse = crate::math::clamp(old_tangent + lambda, -max_friction, max_friction);
                lambda = point.tangent_impulse - old_tangent;
                let p = tangent * lambda;
                a.linvel -= p * a.inv_mass();
                a.angvel -= a.inv_inertia() * cross(point_constraint.ra, p);
                b.linvel += p * b.inv_mass();
                b.angvel += b.inv_inertia() * cross(point_constraint.rb, p);

                // Then normal, clamped to [0, inf).
                let rel_vel = b.velocity_at_point(point.point) - a.velocity_at_point(point.point);
                let vn = rel_vel.dot(&constraint.normal);
                let mut lambda = -point_constraint.normal_mass * (vn - point_constraint.velocity_bias);
                let old_normal = point.normal_impulse;
                point.normal_impulse = (old_normal + lambda).max(0.0);
                lambda = point.normal_impulse - old_normal;
                let p = constraint.normal * lambda;
                a.linvel -= p * a.inv_mass();
                a.angvel -= a.inv_inertia() * cross(point_constraint.ra, p);
                b.linvel += p * b.inv_mass();
                b.angvel += b.inv_inertia() * cross(point_constraint.rb, p);
            }
        }
    }

    // 4. Integrate positions.
    for &id in &island.bodies {
        let Some(body) = bodies.get_mut(id) else { continue };
        if body.mass_type.is_kinematic() || body.mass_type.is_dynamic() {
            body.nudge(body.linvel * dt, body.angvel * dt);
        }
    }

    // 5. Position iterations.
    for _ in 0..settings.position_iterations {
        let mut min_separation = Real::MAX;

        for constraint in &constraints {
            let (Some(a), Some(b)) = bodies.get2_mut(constraint.body_a, constraint.body_b) else { continue };
            let world_normal = a.position.rotation * constraint.local_normal;

            for point_constraint in &constraint.points {
                let world_a = a.position * point_constraint.local_anchor_a;
                let world_b = b.position * point_constraint.local_anchor_b;
                let separation = (world_b - world_a).dot(&world_normal);
                min_separation = min_separation.min(separation);

                let ra = world_a - a.world_com();
                let rb = world_b - b.world_com();
                let k = effective_mass(a, b, ra, rb, world_normal);
                if k <= 0.0 {
                    continue;
                }

                let c = crate::math::clamp(
                    settings.baumgarte * (separation + LINEAR_SLOP),
                    -settings.maximum_linear_correction,
                    0.0,
                );
                let impulse_scalar = -k * c;
                let p = world_normal * impulse_scalar;

                a.nudge(p * (-a.inv_mass()), -a.inv_inertia() * cross(ra, p));
                b.nudge(p * b.inv_mass(), b.inv_inertia() * cross(rb, p));
            }
        }

        let mut joints_converged = true;
        for &joint_id in &island.joints {
            let Some(instance) = joints.get_mut(joint_id) else { continue };
            let (Some(a), Some(b)) = bodies.get2_mut(instance.body_a, instance.body_b) else { continue };
            let converged = instance.solve_position_constraints(a, b, settings.baumgarte, settings.maximum_linear_correction);
            joints_converged &= converged;
        }

        if min_separation >= -3.0 * LINEAR_SLOP && joints_converged {
            break;
        }
    }

    // 6. Sleep update.
    update_sleep_timers(island, bodies, settings, dt)
}

fn integrate_velocity(body: &mut RigidBody, gravity: Vector, settings: &Settings, dt: Real) {
    if !body.mass_type.is_dynamic() {
        // Kinematic/fixed bodies are driven by their set velocity, not forces.
        body.clear_accumulators();
        return;
    }

    let linear_accel = (body.force) * body.inv_mass() + gravity * body.gravity_scale;
    body.linvel += linear_accel * dt;
    body.angvel += body.inv_inertia() * body.torque * dt;
    body.clear_accumulators();

    body.linvel *= 1.0 / (1.0 + dt * body.linear_damping);
    body.angvel *= 1.0 / (1.0 + dt * body.angular_damping);

    let speed = body.linvel.norm();
    let max_speed = settings.maximum_translation / dt;
    if speed > max_speed && speed > 0.0 {
        body.linvel *= max_speed / speed;
    }
    let max_angular_speed = settings.maximum_rotation / dt;
    if body.angvel.abs() > max_angular_speed {
        body.angvel = body.angvel.signum() * max_angular_speed;
    }
}

fn effective_mass(a: &RigidBody, b: &RigidBody, ra: Vector, rb: Vector, axis: Vector) -> Real {
    let ra_axis = cross(ra, axis);
    let rb_axis = cross(rb, axis);
    let denom = a.inv_mass() + b.inv_mass() + a.inv_inertia() * ra_axis * ra_axis + b.inv_inertia() * rb_axis * rb_axis;
    inv(denom)
}

/// Accumulates each body's individual sleep timer, then (spec §4.6 /
/// §4.7 step 6) puts the whole island to sleep once its slowest-settling
/// member has been under threshold for `sleepTime`. Returns whether every
/// body in the island is currently under the velocity thresholds.
fn update_sleep_timers(island: &Island, bodies: &mut RigidBodySet, settings: &Settings, dt: Real) -> bool {
    let mut all_slow = true;
    let mut min_sleep_time = Real::MAX;

    for &id in &island.bodies {
        let Some(body) = bodies.get_mut(id) else { continue };
        if !body.auto_sleep {
            all_slow = false;
            min_sleep_time = 0.0;
            continue;
        }
        let slow = body.linvel.norm_squared() < settings.sleep_linear_velocity * settings.sleep_linear_velocity
            && body.angvel.abs() < settings.sleep_angular_velocity;
        if slow {
            body.sleep_time += dt;
        } else {
            body.sleep_time = 0.0;
            all_slow = false;
        }
        min_sleep_time = min_sleep_time.min(body.sleep_time);
    }

    if all_slow && min_sleep_time >= settings.sleep_time {
        for &id in &island.bodies {
            if let Some(body) = bodies.get_mut(id) {
                body.sleep();
            }
        }
    }

    all_slow
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dynamics::island::build_islands;
    use crate::dynamics::rigid_body::RigidBodyBuilder;
    use crate::geometry::{ContactId, ContactManifold, ManifoldPoint, MassProperties};
    use crate::math::Isometry;

    #[test]
    fn free_falling_body_matches_closed_form_after_one_second() {
        let mut bodies = RigidBodySet::new();
        let mut body = RigidBodyBuilder::dynamic().position(Isometry::translation(0.0, 10.0)).build();
        body.set_mass_properties(&[MassProperties::new(Point::origin(), 1.0, 1.0)]);
        let id = bodies.insert(body);

        let settings = Settings::default();
        let gravity = Vector::new(0.0, -10.0);
        let island = Island {
            bodies: vec![id],
            contacts: Vec::new(),
            joints: Vec::new(),
        };
        let mut narrow_phase = NarrowPhase::new();
        let mut joints = JointSet::new();

        for _ in 0..60 {
            solve_island(&island, &mut bodies, &mut narrow_phase, &mut joints, &settings, gravity, settings.dt());
        }

        let body = bodies.get(id).unwrap();
        assert!((body.position.translation.vector.y - 5.0).abs() < 0.05, "y={}", body.position.translation.vector.y);
        assert!((body.linvel.y - (-10.0)).abs() < 0.1, "vy={}", body.linvel.y);
    }

    #[test]
    fn resting_contact_converges_to_near_zero_separation() {
        let mut bodies = RigidBodySet::new();
        let floor = bodies.insert(RigidBodyBuilder::fixed().build());
        let mut ball = RigidBodyBuilder::dynamic().position(Isometry::translation(0.0, 1.001)).build();
        ball.set_mass_properties(&[MassProperties::new(Point::origin(), 1.0, 1.0)]);
        let ball = bodies.insert(ball);

        let settings = Settings::default();
        let fixture_a = Index::from_raw_parts(0, 0);
        let fixture_b = Index::from_raw_parts(1, 0);
        let mut narrow_phase = NarrowPhase::new();
        let mut manifold = ContactManifold::new(Vector::new(0.0, 1.0));
        manifold.points.push(ManifoldPoint::new(Point::new(0.0, 1.0), 0.001, ContactId::Circle));
        narrow_phase.test_insert(fixture_a, fixture_b, floor, ball, manifold, false, 0.3, 0.0);

        let mut joints = JointSet::new();
        let islands = build_islands(&bodies, &narrow_phase, &joints);
        assert_eq!(islands.len(), 1);

        for _ in 0..5 {
            solve_island(&islands[0], &mut bodies, &mut narrow_phase, &mut joints, &settings, Vector::zeros(), settings.dt());
        }

        let ball_body = bodies.get(ball).unwrap();
        assert!(ball_body.linvel.y.abs() < 1.0, "vy={}", ball_body.linvel.y);
    }
}
