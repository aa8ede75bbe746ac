//! Contact manifold construction (spec §4.4): reference/incident feature
//! clipping for edge-like features, falling back to a single witness point
//! for circle participants and other point-like features (curved sector,
//! capsule cap, half-ellipse crown).

use crate::geometry::contact::{ContactId, ContactManifold, ManifoldPoint};
use crate::geometry::epa;
use crate::geometry::gjk::{self, GjkResult};
use crate::geometry::shape::{Feature, Shape};
use crate::math::{Isometry, Point, Real, Vector};
use crate::utils::min_x_then_y;

/// Shapes farther apart than this are never given a manifold; this is the
/// speculative margin within which a manifold is still built for an
/// about-to-touch pair (spec §4.2's fattened-AABB rationale extended to
/// narrowphase).
pub const SPECULATIVE_MARGIN: Real = 0.01;

struct Edge {
    p1: Point,
    p2: Point,
    radius: Real,
    index: u32,
}

/// Returns the world-space edge (plus rounding radius) for an `Edge`
/// feature, or `None` if `feature` is point-like (meaning this participant
/// should fall back to the single-witness-point path).
fn edge_for_feature(shape: &Shape, transform: &Isometry, feature: Feature) -> Option<Edge> {
    match (shape, feature) {
        (Shape::Polygon(p), Feature::Edge(i, j)) => Some(Edge {
            p1: transform * p.vertices[i],
            p2: transform * p.vertices[j],
            radius: 0.0,
            index: i as u32,
        }),
        (Shape::Segment(s), Feature::Edge(_, _)) => Some(Edge {
            p1: transform * s.a,
            p2: transform * s.b,
            radius: 0.0,
            index: 0,
        }),
        (Shape::Capsule(c), Feature::Edge(_, _)) => Some(Edge {
            p1: transform * Point::new(-c.half_length, 0.0),
            p2: transform * Point::new(c.half_length, 0.0),
            radius: c.radius,
            index: 0,
        }),
        (Shape::HalfEllipse(he), Feature::Edge(_, _)) => Some(Edge {
            p1: transform * Point::new(-he.width, 0.0),
            p2: transform * Point::new(he.width, 0.0),
            radius: 0.0,
            index: 0,
        }),
        _ => None,
    }
}

/// Clips `incident` against the side planes of `reference`, keeping at most
/// 2 points, then drops any point whose separation along `normal` exceeds
/// zero (Box2D-style `b2ClipSegmentToLine` + separation test).
fn clip(reference: &Edge, incident: &Edge, normal: Vector) -> Vec<(Point, Real, u32)> {
    let tangent = (reference.p2 - reference.p1).normalize();

    let mut points = vec![(incident.p1, 0u32), (incident.p2, 1u32)];

    // Clip against the reference edge's two side planes.
    for (plane_normal, offset) in [
        (-tangent, -tangent.dot(&reference.p1.coords)),
        (tangent, tangent.dot(&reference.p2.coords)),
    ] {
        if points.len() < 2 {
            break;
        }
        let mut clipped = Vec::with_capacity(2);
        let (pa, ia) = points[0];
        let (pb, ib) = points[1];
        let da = plane_normal.dot(&pa.coords) - offset;
        let db = plane_normal.dot(&pb.coords) - offset;

        if da <= 0.0 {
            clipped.push((pa, ia));
        }
        if db <= 0.0 {
            clipped.push((pb, ib));
        }
        if da * db < 0.0 {
            let t = da / (da - db);
            let p = pa + (pb - pa) * t;
            clipped.push((p, ib));
        }
        points = clipped;
    }

    let total_radius = reference.radius + incident.radius;
    points
        .into_iter()
        .filter_map(|(p, incident_vertex)| {
            let separation = normal.dot(&(p - reference.p1)) - total_radius;
            if separation <= 0.0 {
                Some((p, -separation, incident_vertex))
            } else {
                None
            }
        })
        .collect()
}

fn single_point_manifold(normal: Vector, on_a: Point, on_b: Point, depth: Real) -> ContactManifold {
    let mut manifold = ContactManifold::new(normal);
    let mid = Point::from((on_a.coords + on_b.coords) * 0.5);
    manifold
        .points
        .push(ManifoldPoint::new(mid, depth, ContactId::Circle));
    manifold
}

/// Builds a contact manifold for `shape_a`/`shape_b` at the given poses, or
/// `None` if they're farther apart than [`SPECULATIVE_MARGIN`] (spec §4.4:
/// "a pair outside the speculative margin produces no manifold").
pub fn collide(
    shape_a: &Shape,
    transform_a: &Isometry,
    shape_b: &Shape,
    transform_b: &Isometry,
) -> Option<ContactManifold> {
    let (normal, depth, on_a, on_b) = match gjk::gjk(shape_a, transform_a, shape_b, transform_b) {
        GjkResult::Separated {
            distance,
            on_a,
            on_b,
            normal,
        } => {
            if distance > SPECULATIVE_MARGIN {
                return None;
            }
            (normal, -distance, on_a, on_b)
        }
        GjkResult::Intersecting { simplex } => {
            let pen = epa::epa(shape_a, transform_a, shape_b, transform_b, simplex);
            (pen.normal, pen.depth, pen.on_a, pen.on_b)
        }
    };

    // Circle participants (and any shape degenerating to a point-like
    // feature for this normal) always reduce to a single witness point.
    if matches!(shape_a, Shape::Circle(_)) || matches!(shape_b, Shape::Circle(_)) {
        return Some(single_point_manifold(normal, on_a, on_b, depth));
    }

    let local_normal_a = transform_a.inverse_transform_vector(&normal);
    let local_normal_b = transform_b.inverse_transform_vector(&-normal);
    let feature_a = shape_a.farthest_feature(local_normal_a);
    let feature_b = shape_b.farthest_feature(local_normal_b);

    let edge_a = edge_for_feature(shape_a, transform_a, feature_a);
    let edge_b = edge_for_feature(shape_b, transform_b, feature_b);

    let (reference, incident, flipped) = match (edge_a, edge_b) {
        (Some(ea), Some(eb)) => {
            // The edge most perpendicular to the contact normal is the
            // reference face (standard Box2D heuristic).
            if normal.dot(&(ea.p2 - ea.p1)).abs() <= normal.dot(&(eb.p2 - eb.p1)).abs() {
                (ea, eb, false)
            } else {
                (eb, ea, true)
            }
        }
        _ => return Some(single_point_manifold(normal, on_a, on_b, depth)),
    };

    let clipped = clip(&reference, &incident, normal);
    if clipped.is_empty() {
        return Some(single_point_manifold(normal, on_a, on_b, depth));
    }

    let mut manifold = ContactManifold::new(normal);
    for (point, point_depth, incident_vertex) in clipped {
        let id = ContactId::Indexed(reference.index, incident.index, incident_vertex, flipped);
        manifold
            .points
            .push(ManifoldPoint::new(point, point_depth, id));
    }
    // Canonicalize point order so it depends only on geometry, not on the
    // clip routine's internal traversal order, keeping solve order (and
    // so a step's output) reproducible across runs of identical inputs
    // (spec §5, §8; §9's `MinXPointComparator` Open Question).
    manifold.points.sort_by(|a, b| min_x_then_y(a.point, b.point));
    Some(manifold)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::shape::Polygon;
    use approx::assert_relative_eq;

    fn box_poly(hx: Real, hy: Real) -> Shape {
        Shape::Polygon(
            Polygon::new(vec![
                Point::new(-hx, -hy),
                Point::new(hx, -hy),
                Point::new(hx, hy),
                Point::new(-hx, hy),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn stacked_boxes_produce_two_point_manifold() {
        let a = box_poly(1.0, 1.0);
        let b = box_poly(1.0, 1.0);
        let ta = Isometry::translation(0.0, 0.0);
        let tb = Isometry::translation(0.0, 1.98);

        let manifold = collide(&a, &ta, &b, &tb).expect("boxes within speculative margin");
        assert_eq!(manifold.points.len(), 2);
        assert_relative_eq!(manifold.normal.y, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn far_apart_boxes_produce_no_manifold() {
        let a = box_poly(1.0, 1.0);
        let b = box_poly(1.0, 1.0);
        let ta = Isometry::translation(0.0, 0.0);
        let tb = Isometry::translation(0.0, 10.0);
        assert!(collide(&a, &ta, &b, &tb).is_none());
    }
}
