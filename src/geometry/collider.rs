//! Fixtures (spec §3): a shape glued to a body with material properties,
//! a collision filter and a stable identity while attached.

use crate::data::Index;
use crate::errors::{PhysicsError, PhysicsResult};
use crate::geometry::aabb::Aabb;
use crate::geometry::interaction_groups::InteractionGroups;
use crate::geometry::mass_properties::MassProperties;
use crate::geometry::shape::Shape;
use crate::math::{Isometry, Real};

/// A fixture: the shape a body actually collides with, plus the material
/// and filtering data that shape alone doesn't carry.
#[derive(Clone, Debug)]
pub struct Collider {
    pub shape: Shape,
    pub density: Real,
    pub friction: Real,
    pub restitution: Real,
    pub filter: InteractionGroups,
    /// Sensors report overlap (spec §4.5 begin/end events) but never
    /// produce contact impulses and never connect islands ([[open
    /// question b]] in the design ledger).
    pub is_sensor: bool,
    /// The body this fixture is attached to, set once on attach.
    pub(crate) body: Option<Index>,
    /// World-space pose cached from the owning body, refreshed once per
    /// step after integration (mirrors the teacher's
    /// `RigidBody::update_colliders_positions`). Narrowphase and the
    /// broadphase read this instead of reaching into `RigidBodySet`, so
    /// [`crate::geometry::FixtureQuery`] never has to alias it.
    pub position: Isometry,
}

pub struct ColliderBuilder {
    shape: Shape,
    density: Real,
    friction: Real,
    restitution: Real,
    filter: InteractionGroups,
    is_sensor: bool,
}

impl ColliderBuilder {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            density: 1.0,
            friction: 0.3,
            restitution: 0.0,
            filter: InteractionGroups::all(),
            is_sensor: false,
        }
    }

    pub fn density(mut self, density: Real) -> Self {
        self.density = density;
        self
    }

    pub fn friction(mut self, friction: Real) -> Self {
        self.friction = friction;
        self
    }

    pub fn restitution(mut self, restitution: Real) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn collision_groups(mut self, filter: InteractionGroups) -> Self {
        self.filter = filter;
        self
    }

    pub fn sensor(mut self, is_sensor: bool) -> Self {
        self.is_sensor = is_sensor;
        self
    }

    pub fn build(self) -> PhysicsResult<Collider> {
        if self.density <= 0.0 || !self.density.is_finite() {
            return Err(PhysicsError::InvalidDensity(self.density));
        }
        Ok(Collider {
            shape: self.shape,
            density: self.density,
            friction: self.friction,
            restitution: self.restitution,
            filter: self.filter,
            is_sensor: self.is_sensor,
            body: None,
            position: Isometry::identity(),
        })
    }
}

impl Collider {
    pub fn compute_aabb(&self, transform: &Isometry) -> Aabb {
        self.shape.compute_aabb(transform)
    }

    pub fn create_mass(&self) -> PhysicsResult<MassProperties> {
        self.shape.create_mass(self.density)
    }

    pub fn body(&self) -> Option<Index> {
        self.body
    }
}
