//! Contact manifolds and stable per-point identities (spec §3, §4.4).

use crate::math::{Point, Real, Vector};

/// A stable, feature-based identity for one manifold point, used to key
/// warm-start lookups across steps (spec §4.4, §4.5).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ContactId {
    /// `(reference_edge, incident_edge, incident_vertex, flipped)`.
    Indexed(u32, u32, u32, bool),
    /// Sentinel identity for circle-participant contacts, which always
    /// reduce to exactly one point (spec §4.4).
    Circle,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ManifoldPoint {
    /// World-space contact point.
    pub point: Point,
    pub depth: Real,
    pub id: ContactId,
    /// Accumulated impulse along the manifold normal, carried across steps
    /// for warm-starting (spec §4.5).
    pub normal_impulse: Real,
    /// Accumulated impulse along the contact tangent.
    pub tangent_impulse: Real,
}

impl ManifoldPoint {
    pub fn new(point: Point, depth: Real, id: ContactId) -> Self {
        Self {
            point,
            depth,
            id,
            normal_impulse: 0.0,
            tangent_impulse: 0.0,
        }
    }
}

/// A reduced set of 1-2 contact points sharing one normal (spec §3, §4.4).
#[derive(Clone, Debug, Default)]
pub struct ContactManifold {
    pub normal: Vector,
    pub points: Vec<ManifoldPoint>,
}

impl ContactManifold {
    pub fn new(normal: Vector) -> Self {
        Self {
            normal,
            points: Vec::new(),
        }
    }

    /// Whether this manifold represents an actual touching contact:
    /// non-empty and with at least one point of positive depth (spec §3
    /// invariant: "a contact is touching iff depth > 0").
    pub fn is_touching(&self) -> bool {
        self.points.iter().any(|p| p.depth > 0.0)
    }

    /// Matches this manifold's points against a previous step's points by
    /// [`ContactId`] and copies over accumulated impulses for warm-starting
    /// (spec §4.5 step 2). Points with no match start at zero impulse.
    pub fn warm_start_from(&mut self, previous: &ContactManifold) {
        for point in &mut self.points {
            if let Some(old) = previous.points.iter().find(|p| p.id == point.id) {
                point.normal_impulse = old.normal_impulse;
                point.tangent_impulse = old.tangent_impulse;
            }
        }
    }

    pub fn find_deepest_contact(&self) -> Option<&ManifoldPoint> {
        self.points
            .iter()
            .max_by(|a, b| a.depth.partial_cmp(&b.depth).unwrap_or(std::cmp::Ordering::Equal))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn warm_start_copies_matching_ids() {
        let mut old = ContactManifold::new(Vector::new(0.0, 1.0));
        old.points.push(ManifoldPoint {
            normal_impulse: 5.0,
            tangent_impulse: 1.0,
            ..ManifoldPoint::new(Point::origin(), 0.1, ContactId::Indexed(0, 1, 0, false))
        });

        let mut new = ContactManifold::new(Vector::new(0.0, 1.0));
        new.points
            .push(ManifoldPoint::new(Point::origin(), 0.05, ContactId::Indexed(0, 1, 0, false)));
        new.points
            .push(ManifoldPoint::new(Point::origin(), 0.02, ContactId::Indexed(0, 1, 1, false)));

        new.warm_start_from(&old);
        assert_eq!(new.points[0].normal_impulse, 5.0);
        assert_eq!(new.points[1].normal_impulse, 0.0);
    }
}
