//! Typed precondition failures (spec §7).
//!
//! Every fallible World-mutating entry point returns `Result<_, PhysicsError>`
//! rather than panicking or silently coercing its input. Geometric
//! non-convergence (GJK/EPA/TOI) is deliberately *not* represented here: per
//! §7 it is a recoverable condition the step resolves on its own (falling
//! back to "no collision", "last best estimate" or "no TOI this substep")
//! and is logged via `log::warn!` instead (see `crate::utils`).

use crate::data::Index;
use thiserror::Error;

/// A templated diagnostic describing a single out-of-range value, in the
/// style requested by spec §7: `"{name} was {value} for {op}: {name} must
/// {comparator} {bound}"`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueError {
    pub name: &'static str,
    pub value: String,
    pub op: &'static str,
    pub comparator: &'static str,
    pub bound: String,
}

impl ValueError {
    pub fn new(
        name: &'static str,
        value: impl ToString,
        op: &'static str,
        comparator: &'static str,
        bound: impl ToString,
    ) -> Self {
        Self {
            name,
            value: value.to_string(),
            op,
            comparator,
            bound: bound.to_string(),
        }
    }
}

impl std::fmt::Display for ValueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} was {} for {}: {} must {} {}",
            self.name, self.value, self.op, self.name, self.comparator, self.bound
        )
    }
}

/// All synchronously-reported precondition/invariant failures the public API
/// can raise. The world is left unchanged whenever one of these is returned.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("{0}")]
    InvalidValue(ValueError),

    #[error("unknown body handle {0:?}")]
    UnknownBody(Index),

    #[error("unknown fixture handle {0:?}")]
    UnknownFixture(Index),

    #[error("unknown joint handle {0:?}")]
    UnknownJoint(Index),

    #[error("body {0:?} is already attached to this world")]
    DuplicateBody(Index),

    #[error("cannot join a body to itself ({0:?})")]
    SelfJoint(Index),

    #[error("shape has non-positive or NaN dimensions: {0}")]
    InvalidShape(String),

    #[error("cannot compute mass from a shape with zero or negative density ({0})")]
    InvalidDensity(crate::math::Real),

    #[error("ray direction must be non-zero")]
    ZeroLengthRay,

    #[error("input contains NaN or infinite values ({0})")]
    NonFinite(&'static str),
}

pub type PhysicsResult<T> = Result<T, PhysicsError>;

/// Validates that `value` satisfies `pred`, producing a templated
/// [`PhysicsError::InvalidValue`] otherwise. Mirrors the "templated factory"
/// message contract described in spec §7.
pub fn require(
    value: crate::math::Real,
    pred: impl Fn(crate::math::Real) -> bool,
    name: &'static str,
    op: &'static str,
    comparator: &'static str,
    bound: crate::math::Real,
) -> PhysicsResult<()> {
    if pred(value) {
        Ok(())
    } else {
        Err(PhysicsError::InvalidValue(ValueError::new(
            name, value, op, comparator, bound,
        )))
    }
}

pub fn require_finite(value: crate::math::Real, name: &'static str) -> PhysicsResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PhysicsError::NonFinite(name))
    }
}
