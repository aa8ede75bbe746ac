//! Axis-aligned bounding boxes (spec §3).

use crate::math::{Point, Real, Vector};

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    pub mins: Point,
    pub maxs: Point,
}

impl Aabb {
    pub fn new(mins: Point, maxs: Point) -> Self {
        Self { mins, maxs }
    }

    pub fn from_points(points: &[Point]) -> Self {
        let mut mins = points[0];
        let mut maxs = points[0];
        for p in &points[1..] {
            mins = mins.inf(p);
            maxs = maxs.sup(p);
        }
        Self { mins, maxs }
    }

    pub fn center(&self) -> Point {
        nalgebra::center(&self.mins, &self.maxs)
    }

    pub fn half_extents(&self) -> Vector {
        (self.maxs - self.mins) * 0.5
    }

    pub fn extents(&self) -> Vector {
        self.maxs - self.mins
    }

    /// Sum of the edge lengths, used as the dynamic tree's surface-area
    /// heuristic proxy in 2D (a true "surface area" in 2D is a perimeter).
    pub fn perimeter(&self) -> Real {
        let e = self.extents();
        2.0 * (e.x + e.y)
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            mins: self.mins.inf(&other.mins),
            maxs: self.maxs.sup(&other.maxs),
        }
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.mins.x <= other.maxs.x
            && self.maxs.x >= other.mins.x
            && self.mins.y <= other.maxs.y
            && self.maxs.y >= other.mins.y
    }

    /// Whether `other` is fully contained within `self`.
    pub fn contains(&self, other: &Aabb) -> bool {
        self.mins.x <= other.mins.x
            && self.mins.y <= other.mins.y
            && self.maxs.x >= other.maxs.x
            && self.maxs.y >= other.maxs.y
    }

    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.mins.x && p.x <= self.maxs.x && p.y >= self.mins.y && p.y <= self.maxs.y
    }

    /// Returns a new AABB expanded by `margin` on every side (the
    /// broadphase's "fattening" operation, §4.2).
    pub fn expand(&self, margin: Real) -> Aabb {
        let m = Vector::new(margin, margin);
        Aabb {
            mins: self.mins - m,
            maxs: self.maxs + m,
        }
    }

    /// Extends the AABB along a displacement vector, growing only in the
    /// direction of travel. Used when re-fattening a moved AABB (§4.2).
    pub fn extend_by_displacement(&self, displacement: Vector) -> Aabb {
        let mut mins = self.mins;
        let mut maxs = self.maxs;
        if displacement.x < 0.0 {
            mins.x += displacement.x;
        } else {
            maxs.x += displacement.x;
        }
        if displacement.y < 0.0 {
            mins.y += displacement.y;
        } else {
            maxs.y += displacement.y;
        }
        Aabb { mins, maxs }
    }

    pub fn volume(&self) -> Real {
        let e = self.extents();
        e.x * e.y
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn union_contains_both() {
        let a = Aabb::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        let b = Aabb::new(Point::new(2.0, -1.0), Point::new(3.0, 0.5));
        let u = a.union(&b);
        assert!(u.contains(&a));
        assert!(u.contains(&b));
    }

    #[test]
    fn expand_is_symmetric() {
        let a = Aabb::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        let fat = a.expand(0.2);
        assert!(fat.contains(&a));
        assert_eq!(fat.mins, Point::new(-0.2, -0.2));
        assert_eq!(fat.maxs, Point::new(1.2, 1.2));
    }
}
