//! Continuous collision detection (spec §4.8): time-of-impact by
//! conservative advancement for bullet bodies, or every dynamic body under
//! `CcdMode::All`, so a fast mover can't tunnel through thin geometry in a
//! single discrete step.

use crate::data::Index;
use crate::geometry::gjk::{gjk, GjkResult};
use crate::geometry::{InteractionGroups, Shape};
use crate::math::{Isometry, Real, Vector};

const MAX_ITERATIONS: usize = 20;

/// What the continuous solver needs from whatever owns fixtures (the
/// world), kept independent of storage the same way [`crate::geometry::FixtureQuery`] is.
pub trait CcdQuery {
    fn shape(&self, fixture: Index) -> &Shape;
    fn body_of(&self, fixture: Index) -> Index;
    fn filter(&self, fixture: Index) -> InteractionGroups;
    fn is_sensor(&self, fixture: Index) -> bool;
}

/// A confirmed earliest impact for one bullet body this step.
#[derive(Copy, Clone, Debug)]
pub struct ToiEvent {
    pub body: Index,
    pub fixture: Index,
    pub other_body: Index,
    pub other_fixture: Index,
    /// Fraction of this step's sweep (`[0, 1]`) at which the bodies first
    /// come within `target` of touching.
    pub toi: Real,
}

fn angle_delta(from: Real, to: Real) -> Real {
    let mut delta = to - from;
    let two_pi = 2.0 * std::f64::consts::PI as Real;
    while delta > std::f64::consts::PI as Real {
        delta -= two_pi;
    }
    while delta < -std::f64::consts::PI as Real {
        delta += two_pi;
    }
    delta
}

fn interpolate(start: Isometry, end: Isometry, t: Real) -> Isometry {
    let translation = start.translation.vector + (end.translation.vector - start.translation.vector) * t;
    let angle = start.rotation.angle() + angle_delta(start.rotation.angle(), end.rotation.angle()) * t;
    Isometry::new(translation, angle)
}

fn bounding_radius(shape: &Shape) -> Real {
    shape.compute_aabb(&Isometry::identity()).half_extents().norm()
}

/// Conservative advancement (spec §4.8): at each sub-interval start, get the
/// GJK separation, and if it's still further than `target` advance `t` by a
/// distance-over-speed-bound step; repeat until within `target +
/// linear_tolerance` or the sweep is exhausted. Returns `None` (not a
/// best-effort estimate) on non-convergence, per spec §7's geometric
/// recoverability rule — logging a warning the same way EPA does.
#[allow(clippy::too_many_arguments)]
pub fn time_of_impact(
    shape_a: &Shape,
    start_a: Isometry,
    end_a: Isometry,
    moving_a: bool,
    shape_b: &Shape,
    start_b: Isometry,
    end_b: Isometry,
    moving_b: bool,
    target: Real,
    linear_tolerance: Real,
) -> Option<Real> {
    let radius_a = bounding_radius(shape_a);
    let radius_b = bounding_radius(shape_b);
    let lin_a = if moving_a { end_a.translation.vector - start_a.translation.vector } else { Vector::zeros() };
    let lin_b = if moving_b { end_b.translation.vector - start_b.translation.vector } else { Vector::zeros() };
    let ang_a = if moving_a { angle_delta(start_a.rotation.angle(), end_a.rotation.angle()).abs() } else { 0.0 };
    let ang_b = if moving_b { angle_delta(start_b.rotation.angle(), end_b.rotation.angle()).abs() } else { 0.0 };

    // A conservative (not necessarily tight) bound on how fast the two
    // shapes can close the gap, per unit of the sweep parameter `t`.
    let speed_bound = (lin_b - lin_a).norm() + radius_a * ang_a + radius_b * ang_b;
    if speed_bound <= 1.0e-9 {
        return None;
    }

    let mut t: Real = 0.0;
    for _ in 0..MAX_ITERATIONS {
        let pose_a = if moving_a { interpolate(start_a, end_a, t) } else { end_a };
        let pose_b = if moving_b { interpolate(start_b, end_b, t) } else { end_b };

        match gjk(shape_a, &pose_a, shape_b, &pose_b) {
            GjkResult::Intersecting { .. } => return Some(t),
            GjkResult::Separated { distance, .. } => {
                if distance <= target + linear_tolerance {
                    return Some(t);
                }
                let step = (distance - target) / speed_bound;
                t += step;
                if t >= 1.0 {
                    return None; // the sweep ends before the shapes meet
                }
            }
        }
    }

    log::warn!("time_of_impact did not converge within {MAX_ITERATIONS} iterations; treating as no impact");
    None
}

/// Runs the conservative-advancement query for one swept body against a set
/// of candidate fixtures (typically a broadphase swept-AABB query result),
/// keeping the earliest hit.
pub struct CcdSolver {
    pub linear_tolerance: Real,
}

impl Default for CcdSolver {
    fn default() -> Self {
        Self { linear_tolerance: 0.005 }
    }
}

impl CcdSolver {
    pub fn new(linear_tolerance: Real) -> Self {
        Self { linear_tolerance }
    }

    /// `candidates` are `(fixture, body, start_pose, end_pose, moving)` —
    /// `moving` is `false` for static/kinematic bodies, which act as
    /// immovable during the TOI pass (spec §4.8).
    #[allow(clippy::too_many_arguments)]
    pub fn earliest_toi(
        &self,
        query: &dyn CcdQuery,
        bullet_body: Index,
        bullet_fixtures: &[Index],
        start_pose: Isometry,
        end_pose: Isometry,
        candidates: &[(Index, Index, Isometry, Isometry, bool)],
    ) -> Option<ToiEvent> {
        let mut best: Option<ToiEvent> = None;

        for &bullet_fixture in bullet_fixtures {
            if query.is_sensor(bullet_fixture) {
                continue;
            }
            let shape_a = query.shape(bullet_fixture);
            let filter_a = query.filter(bullet_fixture);

            for &(other_fixture, other_body, other_start, other_end, moving) in candidates {
                if other_body == bullet_body || query.is_sensor(other_fixture) {
                    continue;
                }
                if !filter_a.test(&query.filter(other_fixture)) {
                    continue;
                }
                let shape_b = query.shape(other_fixture);

                let Some(t) = time_of_impact(
                    shape_a,
                    start_pose,
                    end_pose,
                    true,
                    shape_b,
                    other_start,
                    other_end,
                    moving,
                    0.0,
                    self.linear_tolerance,
                ) else {
                    continue;
                };

                if best.map(|b| t < b.toi).unwrap_or(true) {
                    best = Some(ToiEvent {
                        body: bullet_body,
                        fixture: bullet_fixture,
                        other_body,
                        other_fixture,
                        toi: t,
                    });
                }
            }
        }

        best
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::shape::Circle;

    #[test]
    fn fast_disk_finds_toi_against_static_wall() {
        let disk = Shape::Circle(Circle::new(0.1).unwrap());
        let wall = Shape::Circle(Circle::new(0.05).unwrap());

        let start = Isometry::translation(-1.0, 0.0);
        let end = Isometry::translation(2.0, 0.0); // a 3 m step, would tunnel without CCD
        let wall_pose = Isometry::translation(0.0, 0.0);

        let toi = time_of_impact(&disk, start, end, true, &wall, wall_pose, wall_pose, false, 0.0, 0.005);
        assert!(toi.is_some());
        let t = toi.unwrap();
        assert!(t > 0.0 && t < 1.0, "toi={t}");
    }

    #[test]
    fn shapes_moving_apart_report_no_impact() {
        let a = Shape::Circle(Circle::new(0.5).unwrap());
        let b = Shape::Circle(Circle::new(0.5).unwrap());
        let start = Isometry::translation(0.0, 0.0);
        let end = Isometry::translation(-5.0, 0.0);
        let other = Isometry::translation(5.0, 0.0);

        let toi = time_of_impact(&a, start, end, true, &b, other, other, false, 0.0, 0.005);
        assert!(toi.is_none());
    }
}
