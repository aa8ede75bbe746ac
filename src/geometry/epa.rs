//! The Expanding Polytope Algorithm (spec §4.3): given a GJK simplex
//! enclosing the origin, expands a polytope toward the origin until the
//! closest edge's outward support no longer improves by more than
//! `epa_epsilon`, or `max_iterations` is reached.

use crate::geometry::gjk::SupportPoint;
use crate::geometry::shape::Shape;
use crate::math::{Isometry, Point, Real, Vector};

pub const EPA_EPSILON: Real = 1.0e-4;
pub const MAX_ITERATIONS: usize = 64;

pub struct Penetration {
    /// Unit normal, pointing from A to B.
    pub normal: Vector,
    pub depth: Real,
    pub on_a: Point,
    pub on_b: Point,
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

struct ClosestEdge {
    index: usize,
    distance: Real,
    normal: Vector,
}

/// Finds the polytope edge `(i, i+1)` closest to the origin, assuming CCW
/// winding (so the outward normal points away from the enclosed origin).
fn find_closest_edge(polytope: &[SupportPoint]) -> ClosestEdge {
    let n = polytope.len();
    let mut best = ClosestEdge {
        index: 0,
        distance: Real::INFINITY,
        normal: Vector::new(0.0, 0.0),
    };

    for i in 0..n {
        let a = polytope[i].w.coords;
        let b = polytope[(i + 1) % n].w.coords;
        let edge = b - a;
        let mut normal = Vector::new(edge.y, -edge.x);
        let len = normal.norm();
        if len > 1.0e-12 {
            normal /= len;
        }
        if normal.dot(&a) < 0.0 {
            normal = -normal;
        }
        let distance = normal.dot(&a);
        if distance < best.distance {
            best = ClosestEdge {
                index: i,
                distance,
                normal,
            };
        }
    }

    best
}

/// Sorts an initial point cloud by polar angle around the origin to
/// establish a valid CCW winding, used to bootstrap degenerate (2-point)
/// GJK terminal simplices into a proper enclosing polygon.
fn bootstrap_polytope(
    shape_a: &Shape,
    transform_a: &Isometry,
    shape_b: &Shape,
    transform_b: &Isometry,
    mut points: Vec<SupportPoint>,
) -> Vec<SupportPoint> {
    if points.len() == 1 {
        // The origin coincided exactly with the first support point: probe
        // three arbitrary spread-out directions to bootstrap a triangle.
        for dir in [Vector::new(1.0, 0.0), Vector::new(-0.5, 0.866), Vector::new(-0.5, -0.866)] {
            points.push(minkowski_support(shape_a, transform_a, shape_b, transform_b, dir));
        }
    } else if points.len() == 2 {
        let edge = points[1].w.coords - points[0].w.coords;
        let perp = crate::math::perp(edge).normalize();
        points.push(minkowski_support(shape_a, transform_a, shape_b, transform_b, perp));
        points.push(minkowski_support(
            shape_a,
            transform_a,
            shape_b,
            transform_b,
            -perp,
        ));
    }
    points.sort_by(|p, q| {
        let ap = p.w.coords.y.atan2(p.w.coords.x);
        let aq = q.w.coords.y.atan2(q.w.coords.x);
        ap.partial_cmp(&aq).unwrap_or(std::cmp::Ordering::Equal)
    });
    points.dedup_by(|a, b| (a.w.coords - b.w.coords).norm_squared() < 1.0e-10);
    points
}

/// Expands `simplex` (a GJK terminal simplex already known to enclose the
/// origin) into a penetration result. Never fails to converge outright: if
/// `max_iterations` is hit, the best edge found so far is returned as the
/// "last best estimate" per spec §7, with a logged warning.
pub fn epa(
    shape_a: &Shape,
    transform_a: &Isometry,
    shape_b: &Shape,
    transform_b: &Isometry,
    simplex: Vec<SupportPoint>,
) -> Penetration {
    let mut polytope = bootstrap_polytope(shape_a, transform_a, shape_b, transform_b, simplex);

    let mut iterations = 0;
    loop {
        let edge = find_closest_edge(&polytope);
        let candidate =
            minkowski_support(shape_a, transform_a, shape_b, transform_b, edge.normal);
        let new_distance = candidate.w.coords.dot(&edge.normal);

        iterations += 1;
        if new_distance - edge.distance < EPA_EPSILON || iterations >= MAX_ITERATIONS {
            if iterations >= MAX_ITERATIONS {
                log::warn!(
                    "EPA reached max_iterations ({MAX_ITERATIONS}) without full convergence; \
                     returning last best estimate (depth={})",
                    edge.distance.max(0.0)
                );
            }
            let on_a = polytope[edge.index].on_a;
            let on_b = polytope[edge.index].on_b;
            return Penetration {
                normal: edge.normal,
                depth: edge.distance.max(0.0),
                on_a,
                on_b,
            };
        }

        polytope.insert(edge.index + 1, candidate);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::gjk::{gjk, GjkResult};
    use crate::geometry::shape::{Circle, Shape};
    use approx::assert_relative_eq;

    #[test]
    fn overlapping_circles_penetration_depth() {
        let a = Shape::Circle(Circle::new(1.0).unwrap());
        let b = Shape::Circle(Circle::new(1.0).unwrap());
        let ta = Isometry::translation(0.0, 0.0);
        let tb = Isometry::translation(1.5, 0.0);
        match gjk(&a, &ta, &b, &tb) {
            GjkResult::Intersecting { simplex } => {
                let pen = epa(&a, &ta, &b, &tb, simplex);
                // Circles of radius 1 each, centers 1.5 apart => depth 0.5.
                assert_relative_eq!(pen.depth, 0.5, epsilon = 1e-2);
                assert_relative_eq!(pen.normal.x, 1.0, epsilon = 1e-2);
            }
            GjkResult::Separated { .. } => panic!("expected overlap"),
        }
    }
}
