//! Convex shapes (spec §3, §4.1): a closed tagged-variant set with a
//! dispatch table for `support`, `compute_aabb`, `create_mass`, `contains`
//! and `raycast`, per the Design Notes in spec §9 ("Polymorphism over
//! shapes / joints ... becomes a closed set of shape kinds with a dispatch
//! table").

use crate::errors::{PhysicsError, PhysicsResult};
use crate::geometry::mass_properties::MassProperties;
use crate::geometry::ray::{Ray, RayIntersection};
use crate::geometry::Aabb;
use crate::math::{Isometry, Point, Real, Vector};

/// A farthest-feature result: either a single vertex or an edge between two
/// consecutive vertices. Used by the manifold builder to pick reference and
/// incident features (spec §4.4).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Feature {
    Vertex(usize),
    Edge(usize, usize),
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Circle {
    pub radius: Real,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Point>,
    pub normals: Vec<Vector>,
    pub centroid: Point,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Capsule {
    /// Half the distance between the two round-cap centers.
    pub half_length: Real,
    pub radius: Real,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    pub a: Point,
    pub b: Point,
}

/// A circular sector ("pac-man" shape): apex at the local origin, bisector
/// along the local +x axis, half-angle `angle` (total aperture `2*angle`).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Slice {
    pub radius: Real,
    pub angle: Real,
}

/// The upper half of an ellipse: flat diameter along the local x-axis from
/// `(-width, 0)` to `(width, 0)`, curved boundary bulging toward `+y`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HalfEllipse {
    pub width: Real,
    pub height: Real,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Circle(Circle),
    Polygon(Polygon),
    Capsule(Capsule),
    Segment(Segment),
    Slice(Slice),
    HalfEllipse(HalfEllipse),
}

impl Circle {
    pub fn new(radius: Real) -> PhysicsResult<Self> {
        if radius <= 0.0 || !radius.is_finite() {
            return Err(PhysicsError::InvalidShape(format!(
                "circle radius must be positive and finite, got {radius}"
            )));
        }
        Ok(Self { radius })
    }
}

impl Polygon {
    /// Builds a polygon from a convex, counter-clockwise vertex list (as
    /// produced by the convex-hull constructor in spec §4.1, or supplied
    /// directly by the caller).
    pub fn new(vertices: Vec<Point>) -> PhysicsResult<Self> {
        if vertices.len() < 3 {
            return Err(PhysicsError::InvalidShape(
                "polygon needs at least 3 vertices".to_string(),
            ));
        }
        for v in &vertices {
            if !v.x.is_finite() || !v.y.is_finite() {
                return Err(PhysicsError::InvalidShape(
                    "polygon vertex is not finite".to_string(),
                ));
            }
        }

        let n = vertices.len();
        let mut normals = Vec::with_capacity(n);
        for i in 0..n {
            let a = vertices[i];
            let b = vertices[(i + 1) % n];
            let edge = b - a;
            // Outward normal for a CCW polygon: rotate the edge by -90deg.
            let normal = Vector::new(edge.y, -edge.x);
            let len = normal.norm();
            if len <= 1.0e-9 {
                return Err(PhysicsError::InvalidShape(
                    "polygon has a degenerate (zero-length) edge".to_string(),
                ));
            }
            normals.push(normal / len);
        }

        let centroid = polygon_centroid(&vertices);

        Ok(Self {
            vertices,
            normals,
            centroid,
        })
    }

    fn support_index(&self, dir: Vector) -> usize {
        let mut best = 0;
        let mut best_dot = self.vertices[0].coords.dot(&dir);
        for (i, v) in self.vertices.iter().enumerate().skip(1) {
            let d = v.coords.dot(&dir);
            // Ties broken by lowest vertex index (spec §4.1 support contract).
            if d > best_dot {
                best_dot = d;
                best = i;
            }
        }
        best
    }
}

impl Capsule {
    pub fn new(half_length: Real, radius: Real) -> PhysicsResult<Self> {
        if radius <= 0.0 || half_length < 0.0 || !radius.is_finite() || !half_length.is_finite() {
            return Err(PhysicsError::InvalidShape(format!(
                "capsule needs a positive radius and non-negative half-length, got radius={radius}, half_length={half_length}"
            )));
        }
        Ok(Self {
            half_length,
            radius,
        })
    }

    fn core_vertices(&self) -> [Point; 2] {
        [
            Point::new(-self.half_length, 0.0),
            Point::new(self.half_length, 0.0),
        ]
    }
}

impl Segment {
    pub fn new(a: Point, b: Point) -> PhysicsResult<Self> {
        if (a - b).norm_squared() <= 1.0e-12 {
            return Err(PhysicsError::InvalidShape(
                "segment endpoints must be distinct".to_string(),
            ));
        }
        Ok(Self { a, b })
    }
}

impl Slice {
    pub fn new(radius: Real, angle: Real) -> PhysicsResult<Self> {
        if radius <= 0.0 || angle <= 0.0 || angle >= std::f64::consts::PI as Real {
            return Err(PhysicsError::InvalidShape(format!(
                "slice needs radius > 0 and a half-angle in (0, pi), got radius={radius}, angle={angle}"
            )));
        }
        Ok(Self { radius, angle })
    }

    fn arc_endpoints(&self) -> [Point; 2] {
        [
            Point::new(self.radius * self.angle.cos(), self.radius * self.angle.sin()),
            Point::new(self.radius * self.angle.cos(), -self.radius * self.angle.sin()),
        ]
    }
}

impl HalfEllipse {
    pub fn new(width: Real, height: Real) -> PhysicsResult<Self> {
        if width <= 0.0 || height <= 0.0 || !width.is_finite() || !height.is_finite() {
            return Err(PhysicsError::InvalidShape(format!(
                "half-ellipse needs positive, finite width/height, got width={width}, height={height}"
            )));
        }
        Ok(Self { width, height })
    }
}

fn polygon_centroid(vertices: &[Point]) -> Point {
    let n = vertices.len();
    let origin = vertices[0];
    let mut area = 0.0;
    let mut center = Vector::zeros();
    for i in 0..n {
        let e1 = vertices[i] - origin;
        let e2 = vertices[(i + 1) % n] - origin;
        let cross = crate::math::cross(e1, e2);
        let tri_area = 0.5 * cross;
        area += tri_area;
        center += tri_area * (e1 + e2) / 3.0;
    }
    if area.abs() > 1.0e-12 {
        center /= area;
    }
    origin + center
}

impl Shape {
    /// For any convex shape and non-zero direction `d` in local space,
    /// returns a point realizing `max over p in shape of dot(p, d)`, the
    /// Minkowski-support contract of spec §4.1.
    pub fn support(&self, dir: Vector) -> Point {
        match self {
            Shape::Circle(_) => {
                let n = safe_normalize(dir);
                Point::from(n * self.rounding_radius())
            }
            Shape::Polygon(p) => p.vertices[p.support_index(dir)],
            Shape::Capsule(c) => {
                let verts = c.core_vertices();
                let core = if verts[0].coords.dot(&dir) >= verts[1].coords.dot(&dir) {
                    verts[0]
                } else {
                    verts[1]
                };
                core + safe_normalize(dir) * self.rounding_radius()
            }
            Shape::Segment(s) => {
                if s.a.coords.dot(&dir) >= s.b.coords.dot(&dir) {
                    s.a
                } else {
                    s.b
                }
            }
            Shape::Slice(sl) => {
                let angle_of_dir = dir.y.atan2(dir.x);
                if dir.norm_squared() > 0.0 && angle_of_dir.abs() <= sl.angle {
                    Point::from(safe_normalize(dir) * sl.radius)
                } else {
                    let mut candidates = sl.arc_endpoints().to_vec();
                    candidates.push(Point::origin());
                    candidates
                        .into_iter()
                        .max_by(|a, b| {
                            a.coords
                                .dot(&dir)
                                .partial_cmp(&b.coords.dot(&dir))
                                .unwrap_or(std::cmp::Ordering::Equal)
                        })
                        .unwrap()
                }
            }
            Shape::HalfEllipse(he) => {
                if dir.y <= 0.0 {
                    let x = if dir.x >= 0.0 { he.width } else { -he.width };
                    Point::new(x, 0.0)
                } else {
                    let ex = he.width * he.width * dir.x;
                    let ey = he.height * he.height * dir.y;
                    let norm = (ex * ex + ey * ey).sqrt();
                    if norm <= 1.0e-12 {
                        Point::new(0.0, he.height)
                    } else {
                        Point::new(ex / norm, ey / norm)
                    }
                }
            }
        }
    }

    /// The local radius of the shape's "core" rounding: `support` offsets
    /// a flat-shape core support point by this much along the query
    /// direction for curved shapes (0 for flat shapes).
    pub fn rounding_radius(&self) -> Real {
        match self {
            Shape::Circle(c) => c.radius,
            Shape::Capsule(c) => c.radius,
            _ => 0.0,
        }
    }

    /// The feature (vertex or edge) most aligned with `dir`, used to pick
    /// reference/incident features for manifold clipping (spec §4.4).
    pub fn farthest_feature(&self, dir: Vector) -> Feature {
        match self {
            Shape::Circle(_) => Feature::Vertex(0),
            Shape::Polygon(p) => {
                let mut best_edge = 0;
                let mut best_dot = Real::NEG_INFINITY;
                for (i, n) in p.normals.iter().enumerate() {
                    let d = n.dot(&dir);
                    if d > best_dot {
                        best_dot = d;
                        best_edge = i;
                    }
                }
                Feature::Edge(best_edge, (best_edge + 1) % p.vertices.len())
            }
            Shape::Capsule(c) => {
                let axis = Vector::new(1.0, 0.0);
                // Near-perpendicular directions pick the long edge; otherwise
                // the nearer cap behaves like a vertex feature.
                if dir.dot(&axis).abs() < dir.norm() * 0.15 {
                    Feature::Edge(0, 1)
                } else if dir.x >= 0.0 {
                    Feature::Vertex(1)
                } else {
                    Feature::Vertex(0)
                }
            }
            Shape::Segment(_) => Feature::Edge(0, 1),
            Shape::Slice(sl) => {
                let angle_of_dir = dir.y.atan2(dir.x);
                if angle_of_dir.abs() <= sl.angle {
                    Feature::Vertex(0) // the curved support point, treated as a single contact like a circle.
                } else if angle_of_dir > 0.0 {
                    Feature::Vertex(1)
                } else {
                    Feature::Vertex(2)
                }
            }
            Shape::HalfEllipse(_) => {
                if dir.y <= 0.0 {
                    Feature::Edge(0, 1)
                } else {
                    Feature::Vertex(0)
                }
            }
        }
    }

    pub fn compute_aabb(&self, transform: &Isometry) -> Aabb {
        match self {
            Shape::Circle(c) => {
                let center = transform * Point::origin();
                let r = Vector::new(c.radius, c.radius);
                Aabb::new(center - r, center + r)
            }
            Shape::Polygon(p) => {
                let pts: Vec<Point> = p.vertices.iter().map(|v| transform * v).collect();
                Aabb::from_points(&pts)
            }
            Shape::Capsule(c) => {
                let verts = c.core_vertices();
                let pts: Vec<Point> = verts.iter().map(|v| transform * v).collect();
                Aabb::from_points(&pts).expand(c.radius)
            }
            Shape::Segment(s) => {
                let pts = [transform * s.a, transform * s.b];
                Aabb::from_points(&pts)
            }
            Shape::Slice(sl) => {
                let mut pts = sl.arc_endpoints().to_vec();
                pts.push(Point::origin());
                // The arc can bulge past the chord connecting the two
                // endpoints; including the farthest point along each axis
                // keeps this a tight conservative bound.
                pts.push(Point::new(sl.radius, 0.0));
                let pts: Vec<Point> = pts.iter().map(|v| transform * v).collect();
                Aabb::from_points(&pts)
            }
            Shape::HalfEllipse(he) => {
                let pts = [
                    Point::new(-he.width, 0.0),
                    Point::new(he.width, 0.0),
                    Point::new(0.0, he.height),
                ];
                let pts: Vec<Point> = pts.iter().map(|v| transform * v).collect();
                Aabb::from_points(&pts)
            }
        }
    }

    pub fn create_mass(&self, density: Real) -> PhysicsResult<MassProperties> {
        if density <= 0.0 || !density.is_finite() {
            return Err(PhysicsError::InvalidDensity(density));
        }
        Ok(match self {
            Shape::Circle(c) => {
                let mass = density * std::f64::consts::PI as Real * c.radius * c.radius;
                let inertia = 0.5 * mass * c.radius * c.radius;
                MassProperties::new(Point::origin(), mass, inertia)
            }
            Shape::Polygon(p) => polygon_mass(p, density),
            Shape::Capsule(c) => capsule_mass(c, density),
            Shape::Segment(_) => MassProperties::zero(),
            Shape::Slice(sl) => slice_mass(sl, density),
            Shape::HalfEllipse(he) => half_ellipse_mass(he, density),
        })
    }

    pub fn contains(&self, point: Point, transform: &Isometry) -> bool {
        let local = transform.inverse_transform_point(&point);
        match self {
            Shape::Circle(c) => local.coords.norm_squared() <= c.radius * c.radius,
            Shape::Polygon(p) => p
                .normals
                .iter()
                .zip(p.vertices.iter())
                .all(|(n, v)| n.dot(&(local - v)) <= 1.0e-7),
            Shape::Capsule(c) => {
                let verts = c.core_vertices();
                let d = closest_point_on_segment(local, verts[0], verts[1]);
                (local - d).norm_squared() <= c.radius * c.radius
            }
            Shape::Segment(_) => false, // zero-thickness: never "contains" a point.
            Shape::Slice(sl) => {
                let r2 = local.coords.norm_squared();
                if r2 > sl.radius * sl.radius {
                    return false;
                }
                local.y.atan2(local.x).abs() <= sl.angle
            }
            Shape::HalfEllipse(he) => {
                if local.y < 0.0 {
                    return false;
                }
                let nx = local.x / he.width;
                let ny = local.y / he.height;
                nx * nx + ny * ny <= 1.0
            }
        }
    }

    pub fn raycast(
        &self,
        ray: &Ray,
        max_toi: Real,
        transform: &Isometry,
    ) -> PhysicsResult<Option<RayIntersection>> {
        let inv = transform.inverse();
        let local_origin = inv * ray.origin;
        let local_dir = inv * ray.dir;
        let local_ray = Ray {
            origin: local_origin,
            dir: local_dir,
        };

        let hit = match self {
            Shape::Circle(c) => raycast_circle(&local_ray, max_toi, Point::origin(), c.radius),
            Shape::Polygon(p) => raycast_polygon(&local_ray, max_toi, p),
            Shape::Capsule(c) => raycast_capsule(&local_ray, max_toi, c),
            Shape::Segment(s) => raycast_segment(&local_ray, max_toi, s),
            Shape::Slice(sl) => raycast_slice(&local_ray, max_toi, sl),
            Shape::HalfEllipse(he) => raycast_half_ellipse(&local_ray, max_toi, he),
        };

        Ok(hit.map(|hit| RayIntersection {
            toi: hit.toi,
            normal: transform * hit.normal,
        }))
    }
}

fn safe_normalize(v: Vector) -> Vector {
    let n = v.norm();
    if n <= 1.0e-12 {
        Vector::new(1.0, 0.0)
    } else {
        v / n
    }
}

fn closest_point_on_segment(p: Point, a: Point, b: Point) -> Point {
    let ab = b - a;
    let denom = ab.norm_squared();
    if denom <= 1.0e-12 {
        return a;
    }
    let t = crate::math::clamp((p - a).dot(&ab) / denom, 0.0, 1.0);
    a + ab * t
}

fn polygon_mass(p: &Polygon, density: Real) -> MassProperties {
    let n = p.vertices.len();
    let origin = p.vertices[0];
    let mut area = 0.0;
    let mut center = Vector::zeros();
    let mut i_about_origin = 0.0;
    let k_inv3 = 1.0 / 3.0;

    for i in 0..n {
        let e1 = p.vertices[i] - origin;
        let e2 = p.vertices[(i + 1) % n] - origin;
        let d = crate::math::cross(e1, e2);
        let tri_area = 0.5 * d;
        area += tri_area;
        center += tri_area * k_inv3 * (e1 + e2);

        let intx2 = e1.x * e1.x + e1.x * e2.x + e2.x * e2.x;
        let inty2 = e1.y * e1.y + e1.y * e2.y + e2.y * e2.y;
        i_about_origin += (0.25 * k_inv3 * d) * (intx2 + inty2);
    }

    if area.abs() > 1.0e-12 {
        center /= area;
    }
    let mass = density * area;
    let com_local = origin + center; // centroid relative to the shape's own local frame.
    let inertia_about_origin = density * i_about_origin;
    // Shift from the (vertices[0]-relative) reference to the true centroid.
    let inertia = inertia_about_origin - mass * center.norm_squared();

    MassProperties::new(com_local, mass, inertia)
}

fn capsule_mass(c: &Capsule, density: Real) -> MassProperties {
    let r = c.radius;
    let hl = c.half_length;
    let rect_mass = density * (2.0 * hl) * (2.0 * r);
    let rect_inertia = rect_mass * ((2.0 * hl).powi(2) + (2.0 * r).powi(2)) / 12.0;

    let half_disk_mass = density * std::f64::consts::PI as Real * r * r * 0.5;
    let cap_offset = 4.0 * r / (3.0 * std::f64::consts::PI as Real);
    // Moment of a half-disk about the point where its flat edge meets the
    // capsule's central axis equals that of a full disk of the same radius.
    let i_about_flat_center = 0.5 * half_disk_mass * r * r;
    let i_cap_centroid = i_about_flat_center - half_disk_mass * cap_offset * cap_offset;
    let cap_distance = hl + cap_offset;
    let i_cap_about_center =
        i_cap_centroid + half_disk_mass * cap_distance * cap_distance;

    let mass = rect_mass + 2.0 * half_disk_mass;
    let inertia = rect_inertia + 2.0 * i_cap_about_center;

    MassProperties::new(Point::origin(), mass, inertia)
}

fn slice_mass(sl: &Slice, density: Real) -> MassProperties {
    let area = sl.angle * sl.radius * sl.radius;
    let mass = density * area;
    let centroid_dist = (2.0 * sl.radius * sl.angle.sin()) / (3.0 * sl.angle);
    let i_about_apex = 0.5 * mass * sl.radius * sl.radius;
    let inertia = i_about_apex - mass * centroid_dist * centroid_dist;
    MassProperties::new(Point::new(centroid_dist, 0.0), mass, inertia)
}

fn half_ellipse_mass(he: &HalfEllipse, density: Real) -> MassProperties {
    let area = 0.5 * std::f64::consts::PI as Real * he.width * he.height;
    let mass = density * area;
    let centroid_dist = 4.0 * he.height / (3.0 * std::f64::consts::PI as Real);
    let i_about_flat_center = mass * (he.width * he.width + he.height * he.height) / 4.0;
    let inertia = i_about_flat_center - mass * centroid_dist * centroid_dist;
    MassProperties::new(Point::new(0.0, centroid_dist), mass, inertia)
}

struct LocalHit {
    toi: Real,
    normal: Vector,
}

fn raycast_circle(ray: &Ray, max_toi: Real, center: Point, radius: Real) -> Option<LocalHit> {
    let m = ray.origin - center;
    let b = m.dot(&ray.dir);
    let c = m.norm_squared() - radius * radius;
    if c > 0.0 && b > 0.0 {
        return None;
    }
    let a = ray.dir.norm_squared();
    let discr = b * b - a * c;
    if discr < 0.0 {
        return None;
    }
    let t = (-b - discr.sqrt()) / a;
    if t < 0.0 || t > max_toi {
        return None;
    }
    let hit_point = ray.point_at(t);
    let normal = safe_normalize(hit_point - center);
    Some(LocalHit { toi: t, normal })
}

fn raycast_segment_2(ray: &Ray, max_toi: Real, a: Point, b: Point) -> Option<LocalHit> {
    let edge = b - a;
    let normal_candidates = [Vector::new(edge.y, -edge.x), Vector::new(-edge.y, edge.x)];
    let denom = crate::math::cross(ray.dir, edge);
    if denom.abs() <= 1.0e-12 {
        return None;
    }
    let ao = a - ray.origin;
    let t = crate::math::cross(ao, edge) / denom;
    let s = crate::math::cross(ao, ray.dir) / denom;
    if t < 0.0 || t > max_toi || s < 0.0 || s > 1.0 {
        return None;
    }
    let normal = normal_candidates
        .into_iter()
        .find(|n| n.dot(&ray.dir) < 0.0)
        .map(safe_normalize)
        .unwrap_or_else(|| safe_normalize(normal_candidates[0]));
    Some(LocalHit { toi: t, normal })
}

fn raycast_segment(ray: &Ray, max_toi: Real, s: &Segment) -> Option<LocalHit> {
    raycast_segment_2(ray, max_toi, s.a, s.b)
}

fn raycast_polygon(ray: &Ray, max_toi: Real, p: &Polygon) -> Option<LocalHit> {
    let n = p.vertices.len();
    let mut best: Option<LocalHit> = None;
    for i in 0..n {
        let a = p.vertices[i];
        let b = p.vertices[(i + 1) % n];
        if let Some(hit) = raycast_segment_2(ray, max_toi, a, b) {
            if hit.normal.dot(&ray.dir) < 0.0
                && best.as_ref().map_or(true, |h| hit.toi < h.toi)
            {
                best = Some(hit);
            }
        }
    }
    best
}

fn raycast_capsule(ray: &Ray, max_toi: Real, c: &Capsule) -> Option<LocalHit> {
    let verts = c.core_vertices();
    let mut best: Option<LocalHit> = None;
    for center in verts {
        if let Some(hit) = raycast_circle(ray, max_toi, center, c.radius) {
            if best.as_ref().map_or(true, |h| hit.toi < h.toi) {
                best = Some(hit);
            }
        }
    }
    // Two side segments offset by the radius, perpendicular to the capsule axis.
    let offset = Vector::new(0.0, c.radius);
    for (a, b) in [
        (verts[0] + offset, verts[1] + offset),
        (verts[0] - offset, verts[1] - offset),
    ] {
        if let Some(hit) = raycast_segment_2(ray, max_toi, a, b) {
            if hit.normal.dot(&ray.dir) < 0.0 && best.as_ref().map_or(true, |h| hit.toi < h.toi) {
                best = Some(hit);
            }
        }
    }
    best
}

fn raycast_slice(ray: &Ray, max_toi: Real, sl: &Slice) -> Option<LocalHit> {
    let mut best: Option<LocalHit> = None;
    if let Some(hit) = raycast_circle(ray, max_toi, Point::origin(), sl.radius) {
        let angle = hit.normal.y.atan2(hit.normal.x);
        if angle.abs() <= sl.angle {
            best = Some(hit);
        }
    }
    for p in sl.arc_endpoints() {
        if let Some(hit) = raycast_segment_2(ray, max_toi, Point::origin(), p) {
            if best.as_ref().map_or(true, |h| hit.toi < h.toi) {
                best = Some(hit);
            }
        }
    }
    best
}

fn raycast_half_ellipse(ray: &Ray, max_toi: Real, he: &HalfEllipse) -> Option<LocalHit> {
    // Scale the ray into a unit-circle space, raycast the circle, then scale
    // the hit back (a standard affine trick for ellipse intersection).
    let scale = Vector::new(1.0 / he.width, 1.0 / he.height);
    let scaled_origin = Point::new(ray.origin.x * scale.x, ray.origin.y * scale.y);
    let scaled_dir = Vector::new(ray.dir.x * scale.x, ray.dir.y * scale.y);
    let scaled_ray = Ray {
        origin: scaled_origin,
        dir: scaled_dir,
    };
    let mut best = raycast_circle(&scaled_ray, max_toi, Point::origin(), 1.0).and_then(|hit| {
        let p = scaled_ray.point_at(hit.toi);
        let world_p = Point::new(p.x * he.width, p.y * he.height);
        if world_p.y < -1.0e-6 {
            return None;
        }
        let normal = safe_normalize(Vector::new(
            hit.normal.x / he.width,
            hit.normal.y / he.height,
        ));
        Some(LocalHit { toi: hit.toi, normal })
    });
    let flat = raycast_segment_2(
        ray,
        max_toi,
        Point::new(-he.width, 0.0),
        Point::new(he.width, 0.0),
    );
    if let Some(flat_hit) = flat {
        if best.as_ref().map_or(true, |h| flat_hit.toi < h.toi) {
            best = Some(flat_hit);
        }
    }
    best
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn circle_support_points_toward_direction() {
        let c = Shape::Circle(Circle::new(2.0).unwrap());
        let p = c.support(Vector::new(1.0, 0.0));
        assert_relative_eq!(p.x, 2.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn box_polygon_mass_matches_analytic_rectangle() {
        let hw = 1.0;
        let hh = 0.5;
        let verts = vec![
            Point::new(-hw, -hh),
            Point::new(hw, -hh),
            Point::new(hw, hh),
            Point::new(-hw, hh),
        ];
        let poly = Polygon::new(verts).unwrap();
        let mp = polygon_mass(&poly, 1.0);
        let expected_mass = (2.0 * hw) * (2.0 * hh);
        assert_relative_eq!(mp.mass, expected_mass, epsilon = 1e-6);
        let expected_inertia = expected_mass * ((2.0 * hw).powi(2) + (2.0 * hh).powi(2)) / 12.0;
        assert_relative_eq!(mp.inertia, expected_inertia, epsilon = 1e-6);
    }

    #[test]
    fn disk_mass_matches_analytic() {
        let c = Circle::new(2.0).unwrap();
        let shape = Shape::Circle(c);
        let mp = shape.create_mass(3.0).unwrap();
        let expected_mass = 3.0 * std::f64::consts::PI as Real * 4.0;
        assert_relative_eq!(mp.mass, expected_mass, epsilon = 1e-5);
    }

    #[test]
    fn polygon_support_ties_break_on_lowest_index() {
        let verts = vec![
            Point::new(-1.0, -1.0),
            Point::new(1.0, -1.0),
            Point::new(1.0, 1.0),
            Point::new(-1.0, 1.0),
        ];
        let poly = Polygon::new(verts).unwrap();
        // Direction (1,0) ties between vertex 1 and vertex 2.
        assert_eq!(poly.support_index(Vector::new(1.0, 0.0)), 1);
    }

    #[test]
    fn segment_raycast_hits_midpoint() {
        let s = Segment::new(Point::new(-1.0, 0.0), Point::new(1.0, 0.0)).unwrap();
        let shape = Shape::Segment(s);
        let ray = Ray::new(Point::new(0.0, 5.0), Vector::new(0.0, -1.0)).unwrap();
        let hit = shape
            .raycast(&ray, 100.0, &Isometry::identity())
            .unwrap()
            .unwrap();
        assert_relative_eq!(hit.toi, 5.0, epsilon = 1e-4);
    }
}
