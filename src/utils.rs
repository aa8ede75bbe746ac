//! Small free-standing helpers shared across modules.

use crate::math::Real;

/// `1 / x`, returning `0` instead of `inf`/`NaN` for a zero or
/// non-finite denominator. Used pervasively when building effective-mass
/// matrices, where a zero inverse-mass/inertia must propagate as "infinitely
/// heavy" rather than blow up the solver.
#[inline]
pub fn inv(x: Real) -> Real {
    if x == 0.0 {
        0.0
    } else {
        1.0 / x
    }
}

/// Stable three-way compare on raw floats, breaking ties on `y`.
///
/// Addresses the Open Question in spec §9 about `MinXPointComparator`'s use
/// of `Math.signum((int) ...)`, which loses ordering for very close x
/// coordinates: this compares the full-precision values directly and falls
/// back to `y` only on an exact tie.
pub fn min_x_then_y(a: crate::math::Point, b: crate::math::Point) -> std::cmp::Ordering {
    a.x.partial_cmp(&b.x)
        .unwrap_or(std::cmp::Ordering::Equal)
        .then_with(|| a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal))
}
