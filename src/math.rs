//! 2D math primitives built on `nalgebra`.
//!
//! The engine never hand-rolls vector/matrix algebra: everything here is a
//! thin set of type aliases and small helpers layered on top of `nalgebra`,
//! the same foundation the wider `rapier2d` family is built on.

use nalgebra::{Isometry2, Point2, Rotation2, UnitComplex, Vector2};

/// The scalar type used throughout the engine.
///
/// Switching the `f64` feature flips this to double precision, mirroring the
/// way the teacher workspace ships parallel `rapier2d` / `rapier2d-f64`
/// crates instead of making precision a runtime choice.
#[cfg(not(feature = "f64"))]
pub type Real = f32;
#[cfg(feature = "f64")]
pub type Real = f64;

pub type Vector = Vector2<Real>;
pub type Point = Point2<Real>;
pub type Rotation = UnitComplex<Real>;
pub type Isometry = Isometry2<Real>;

/// 2D "cross product": returns the scalar z-component of `a × b`.
#[inline]
pub fn cross(a: Vector, b: Vector) -> Real {
    a.x * b.y - a.y * b.x
}

/// The perpendicular of `v`, rotated +90 degrees (i.e. `cross(z, v)` for `z=1`).
#[inline]
pub fn perp(v: Vector) -> Vector {
    Vector::new(-v.y, v.x)
}

/// `ω × r` for a scalar angular velocity `ω` and a 2D lever arm `r`.
#[inline]
pub fn cross_scalar_vector(w: Real, r: Vector) -> Vector {
    Vector::new(-w * r.y, w * r.x)
}

/// Clamp `x` into `[lo, hi]`. Named after the interval helper referenced in
/// the geometry-kernel contract (`Interval.clamp`).
#[inline]
pub fn clamp(x: Real, lo: Real, hi: Real) -> Real {
    if x < lo {
        lo
    } else if x > hi {
        hi
    } else {
        x
    }
}
