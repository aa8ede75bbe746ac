//! The Gilbert-Johnson-Keerthi algorithm on the Minkowski difference of two
//! convex shapes (spec §4.3): distance mode when the shapes are separated,
//! or a terminal simplex enclosing the origin handed off to EPA for
//! penetration mode.

use crate::math::{Isometry, Point, Real, Vector};
use crate::geometry::shape::Shape;

pub const DISTANCE_EPSILON: Real = 1.0e-6;
const MAX_ITERATIONS: usize = 64;

/// A Minkowski-difference vertex, carrying its witnesses on A and B so a
/// terminal result (distance or enclosing simplex) can recover real-world
/// contact points.
#[derive(Copy, Clone, Debug)]
pub struct SupportPoint {
    /// `support_a(d) - support_b(-d)`, in world space.
    pub w: Point,
    pub on_a: Point,
    pub on_b: Point,
}

pub enum GjkResult {
    /// The shapes are (at least) `distance` apart; `on_a`/`on_b` are the
    /// closest witness points.
    Separated {
        distance: Real,
        on_a: Point,
        on_b: Point,
        normal: Vector,
    },
    /// GJK found a simplex enclosing the origin: the shapes overlap.
    /// `simplex` has 2 or 3 Minkowski points, ready for EPA.
    Intersecting { simplex: Vec<SupportPoint> },
}

fn support_world(shape: &Shape, transform: &Isometry, dir: Vector) -> Point {
    let local_dir = transform.inverse_transform_vector(&dir);
    transform * shape.support(local_dir)
}

fn minkowski_support(
    shape_a: &Shape,
    transform_a: &Isometry,
    shape_b: &Shape,
    transform_b: &Isometry,
    dir: Vector,
) -> SupportPoint {
    let on_a = support_world(shape_a, transform_a, dir);
    let on_b = support_world(shape_b, transform_b, -dir);
    SupportPoint {
        w: on_a - on_b.coords,
        on_a,
        on_b,
    }
}

/// Runs GJK on the Minkowski difference of `shape_a` and `shape_b`. Curved
/// shapes (circle, capsule) are handled exactly because their `support`
/// already accounts for their rounding radius — no separate core-shape
/// bookkeeping is needed.
pub fn gjk(
    shape_a: &Shape,
    transform_a: &Isometry,
    shape_b: &Shape,
    transform_b: &Isometry,
) -> GjkResult {
    let mut dir = {
        let d = (transform_b * Point::origin()) - (transform_a * Point::origin());
        if d.norm_squared() > 1.0e-12 {
            d
        } else {
            Vector::new(1.0, 0.0)
        }
    };

    let mut simplex = vec![minkowski_support(shape_a, transform_a, shape_b, transform_b, -dir)];
    dir = -simplex[0].w.coords;

    for _ in 0..MAX_ITERATIONS {
        if dir.norm_squared() < 1.0e-14 {
            // The origin coincides with a vertex: touching/enclosing.
            return GjkResult::Intersecting { simplex };
        }
        let new_pt = minkowski_support(shape_a, transform_a, shape_b, transform_b, dir);

        let progress = new_pt.w.coords.dot(&dir);
        let best_so_far = simplex
            .iter()
            .map(|p| p.w.coords.dot(&dir))
            .fold(Real::NEG_INFINITY, Real::max);

        if progress - best_so_far < DISTANCE_EPSILON && !simplex.is_empty() {
            // No further improvement possible along this direction: separated.
            return separated_result(&simplex);
        }

        simplex.push(new_pt);

        match reduce_simplex(&mut simplex, &mut dir) {
            SimplexState::Contains => return GjkResult::Intersecting { simplex },
            SimplexState::Continue => {}
        }
    }

    separated_result(&simplex)
}

enum SimplexState {
    Contains,
    Continue,
}

/// Reduces `simplex` to the feature (vertex/edge/triangle) closest to the
/// origin, discarding points that don't contribute, and sets `dir` to point
/// from that feature toward the origin. Returns `Contains` if the origin is
/// enclosed (2D only needs a triangle for this).
fn reduce_simplex(simplex: &mut Vec<SupportPoint>, dir: &mut Vector) -> SimplexState {
    match simplex.len() {
        2 => {
            let a = simplex[1]; // most recently added
            let b = simplex[0];
            let ab = b.w.coords - a.w.coords;
            let ao = -a.w.coords;
            if ab.dot(&ao) > 0.0 {
                *dir = triple_product(ab, ao, ab);
                if dir.norm_squared() < 1.0e-14 {
                    *dir = crate::math::perp(ab);
                }
            } else {
                *simplex = vec![a];
                *dir = ao;
            }
            SimplexState::Continue
        }
        3 => {
            let c = simplex[2]; // most recently added
            let b = simplex[1];
            let a = simplex[0];
            let ab = b.w.coords - a.w.coords;
            let ac = c.w.coords - a.w.coords;
            let ao = -a.w.coords;

            let ab_perp = triple_product(ac, ab, ab);
            let ac_perp = triple_product(ab, ac, ac);

            if ab_perp.dot(&ao) > 0.0 {
                *simplex = vec![a, b];
                *dir = ab_perp;
                SimplexState::Continue
            } else if ac_perp.dot(&ao) > 0.0 {
                *simplex = vec![a, c];
                *dir = ac_perp;
                SimplexState::Continue
            } else {
                SimplexState::Contains
            }
        }
        _ => SimplexState::Continue,
    }
}

fn default_normal(w: Vector) -> Vector {
    if w.norm_squared() > 1.0e-14 {
        w.normalize()
    } else {
        Vector::new(1.0, 0.0)
    }
}

/// `(a x b) x c`, a standard GJK helper producing a vector in the plane of
/// `a`,`b`,`c` perpendicular to `a`, pointing toward `c`.
fn triple_product(a: Vector, b: Vector, c: Vector) -> Vector {
    let z = crate::math::cross(a, b);
    Vector::new(-z * c.y, z * c.x)
}

fn separated_result(simplex: &[SupportPoint]) -> GjkResult {
    match simplex.len() {
        1 => {
            let p = simplex[0];
            GjkResult::Separated {
                distance: p.w.coords.norm(),
                on_a: p.on_a,
                on_b: p.on_b,
                normal: default_normal(p.w.coords),
            }
        }
        _ => {
            // Project the origin onto the closest edge among all pairs.
            let mut best_dist = Real::INFINITY;
            let mut best = (simplex[0], simplex[0], 0.0);
            for i in 0..simplex.len() {
                for j in (i + 1)..simplex.len() {
                    let a = simplex[i];
                    let b = simplex[j];
                    let ab = b.w.coords - a.w.coords;
                    let denom = ab.norm_squared();
                    let t = if denom > 1.0e-12 {
                        crate::math::clamp((-a.w.coords).dot(&ab) / denom, 0.0, 1.0)
                    } else {
                        0.0
                    };
                    let closest = a.w.coords + ab * t;
                    let dist = closest.norm();
                    if dist < best_dist {
                        best_dist = dist;
                        best = (a, b, t);
                    }
                }
            }
            let (a, b, t) = best;
            let on_a = Point::from(a.on_a.coords + (b.on_a.coords - a.on_a.coords) * t);
            let on_b = Point::from(a.on_b.coords + (b.on_b.coords - a.on_b.coords) * t);
            let w = a.w.coords + (b.w.coords - a.w.coords) * t;
            let normal = default_normal(w);
            GjkResult::Separated {
                distance: best_dist,
                on_a,
                on_b,
                normal,
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::shape::{Circle, Shape};
    use approx::assert_relative_eq;

    #[test]
    fn separated_circles_report_correct_distance() {
        let a = Shape::Circle(Circle::new(1.0).unwrap());
        let b = Shape::Circle(Circle::new(1.0).unwrap());
        let ta = Isometry::translation(0.0, 0.0);
        let tb = Isometry::translation(5.0, 0.0);
        match gjk(&a, &ta, &b, &tb) {
            GjkResult::Separated { distance, .. } => {
                assert_relative_eq!(distance, 3.0, epsilon = 1e-3);
            }
            GjkResult::Intersecting { .. } => panic!("expected separation"),
        }
    }

    #[test]
    fn overlapping_circles_are_intersecting() {
        let a = Shape::Circle(Circle::new(1.0).unwrap());
        let b = Shape::Circle(Circle::new(1.0).unwrap());
        let ta = Isometry::translation(0.0, 0.0);
        let tb = Isometry::translation(0.5, 0.0);
        match gjk(&a, &ta, &b, &tb) {
            GjkResult::Intersecting { .. } => {}
            GjkResult::Separated { distance, .. } => panic!("expected overlap, got {distance}"),
        }
    }
}
