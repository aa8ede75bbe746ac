//! Bodies (spec §3): pose, velocities, mass data and fixture ownership.

use crate::data::Index;
use crate::geometry::MassProperties;
use crate::math::{Isometry, Point, Real, Vector};

/// The body's mass classification (spec §3: `Mass(type ∈ {NORMAL, INFINITE,
/// FIXED_LINEAR_VELOCITY, FIXED_ANGULAR_VELOCITY,
/// FIXED_LINEAR_AND_ANGULAR_VELOCITY}, ...)`).
///
/// Only `Normal` is fully dynamic. Every other variant is a flavor of
/// *kinematic*: the solver never applies an impulse to a fixed axis, but a
/// kinematic body's pose is still advanced by whatever velocity it
/// currently carries (spec §9 Open Question b — "treat them as movable
/// kinematic collidables that do not receive impulses but whose pose is
/// advanced").
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum MassType {
    #[default]
    Normal,
    Infinite,
    FixedLinearVelocity,
    FixedAngularVelocity,
    FixedLinearAndAngularVelocity,
}

impl MassType {
    pub fn is_dynamic(self) -> bool {
        matches!(self, MassType::Normal)
    }

    pub fn linear_fixed(self) -> bool {
        matches!(
            self,
            MassType::Infinite
                | MassType::FixedLinearVelocity
                | MassType::FixedLinearAndAngularVelocity
        )
    }

    pub fn angular_fixed(self) -> bool {
        matches!(
            self,
            MassType::Infinite
                | MassType::FixedAngularVelocity
                | MassType::FixedLinearAndAngularVelocity
        )
    }

    pub fn is_kinematic(self) -> bool {
        !self.is_dynamic() && self != MassType::Infinite
    }
}

#[derive(Clone, Debug)]
pub struct RigidBody {
    pub position: Isometry,
    pub linvel: Vector,
    pub angvel: Real,

    pub(crate) force: Vector,
    pub(crate) torque: Real,

    pub linear_damping: Real,
    pub angular_damping: Real,
    pub gravity_scale: Real,

    pub mass_type: MassType,
    mass: Real,
    inv_mass: Real,
    inertia: Real,
    inv_inertia: Real,
    /// Center of mass in body-local space.
    pub local_com: Point,

    pub fixtures: Vec<Index>,

    pub awake: bool,
    pub active: bool,
    pub auto_sleep: bool,
    pub bullet: bool,
    pub(crate) sleep_time: Real,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new(Isometry::identity())
    }
}

impl RigidBody {
    pub fn new(position: Isometry) -> Self {
        Self {
            position,
            linvel: Vector::zeros(),
            angvel: 0.0,
            force: Vector::zeros(),
            torque: 0.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            gravity_scale: 1.0,
            mass_type: MassType::Normal,
            mass: 0.0,
            inv_mass: 0.0,
            inertia: 0.0,
            inv_inertia: 0.0,
            local_com: Point::origin(),
            fixtures: Vec::new(),
            awake: true,
            active: true,
            auto_sleep: true,
            bullet: false,
            sleep_time: 0.0,
        }
    }

    pub fn mass(&self) -> Real {
        self.mass
    }

    pub fn inertia(&self) -> Real {
        self.inertia
    }

    /// Zero exactly when `mass_type` fixes the linear axis (spec §3
    /// invariant).
    pub fn inv_mass(&self) -> Real {
        if self.mass_type.linear_fixed() {
            0.0
        } else {
            self.inv_mass
        }
    }

    /// Zero exactly when `mass_type` fixes the angular axis.
    pub fn inv_inertia(&self) -> Real {
        if self.mass_type.angular_fixed() {
            0.0
        } else {
            self.inv_inertia
        }
    }

    pub fn world_com(&self) -> Point {
        self.position * self.local_com
    }

    /// Recomputes mass/inertia/COM from the given per-fixture contributions
    /// (spec §4.1: "mass composition sums fixture masses ... and applies
    /// parallel-axis theorem"). A `Normal` body with no fixtures, or any
    /// non-`Normal` body, is given infinite mass (inverse mass/inertia 0).
    pub fn set_mass_properties(&mut self, contributions: &[MassProperties]) {
        if !contributions.is_empty() {
            let composed = MassProperties::compose(contributions);
            self.local_com = composed.local_com;
            self.mass = composed.mass;
            self.inertia = composed.inertia;
            self.inv_mass = crate::utils::inv(composed.mass);
            self.inv_inertia = crate::utils::inv(composed.inertia);
        } else {
            self.local_com = Point::origin();
            self.mass = 0.0;
            self.inertia = 0.0;
            self.inv_mass = 0.0;
            self.inv_inertia = 0.0;
        }
    }

    pub fn apply_force(&mut self, force: Vector) {
        self.force += force;
    }

    pub fn apply_torque(&mut self, torque: Real) {
        self.torque += torque;
    }

    /// Applies an impulse (not a force) at the body's center of mass,
    /// immediately changing velocity.
    pub fn apply_linear_impulse(&mut self, impulse: Vector) {
        self.linvel += impulse * self.inv_mass();
    }

    pub fn apply_impulse_at_point(&mut self, impulse: Vector, point: Point) {
        self.linvel += impulse * self.inv_mass();
        let r = point - self.world_com();
        self.angvel += self.inv_inertia() * crate::math::cross(r, impulse);
    }

    pub fn clear_accumulators(&mut self) {
        self.force = Vector::zeros();
        self.torque = 0.0;
    }

    pub fn wake_up(&mut self) {
        self.awake = true;
        self.sleep_time = 0.0;
    }

    pub fn sleep(&mut self) {
        self.awake = false;
        self.linvel = Vector::zeros();
        self.angvel = 0.0;
        self.sleep_time = 0.0;
    }

    /// Velocity at a world-space point, accounting for rotation.
    pub fn velocity_at_point(&self, point: Point) -> Vector {
        let r = point - self.world_com();
        self.linvel + crate::math::cross_scalar_vector(self.angvel, r)
    }

    /// Applies a position-only correction (spec §4.7 step 5): moves the
    /// world center of mass by `d_com` and rotates the body by `d_angle`
    /// about it, then reconstructs `position` so `local_com` still maps to
    /// the same body-local point.
    pub fn nudge(&mut self, d_com: Vector, d_angle: Real) {
        let new_com = self.world_com() + d_com;
        self.position.rotation = crate::math::Rotation::new(self.position.rotation.angle() + d_angle);
        self.position.translation.vector = new_com.coords - (self.position.rotation * self.local_com.coords);
    }
}

pub struct RigidBodyBuilder {
    body: RigidBody,
}

impl RigidBodyBuilder {
    pub fn new(mass_type: MassType) -> Self {
        let mut body = RigidBody::default();
        body.mass_type = mass_type;
        Self { body }
    }

    pub fn dynamic() -> Self {
        Self::new(MassType::Normal)
    }

    pub fn fixed() -> Self {
        Self::new(MassType::Infinite)
    }

    pub fn position(mut self, position: Isometry) -> Self {
        self.body.position = position;
        self
    }

    pub fn translation(mut self, translation: Vector) -> Self {
        self.body.position.translation.vector = translation;
        self
    }

    pub fn linvel(mut self, linvel: Vector) -> Self {
        self.body.linvel = linvel;
        self
    }

    pub fn angvel(mut self, angvel: Real) -> Self {
        self.body.angvel = angvel;
        self
    }

    pub fn linear_damping(mut self, damping: Real) -> Self {
        self.body.linear_damping = damping;
        self
    }

    pub fn angular_damping(mut self, damping: Real) -> Self {
        self.body.angular_damping = damping;
        self
    }

    pub fn gravity_scale(mut self, scale: Real) -> Self {
        self.body.gravity_scale = scale;
        self
    }

    pub fn bullet(mut self, bullet: bool) -> Self {
        self.body.bullet = bullet;
        self
    }

    pub fn can_sleep(mut self, auto_sleep: bool) -> Self {
        self.body.auto_sleep = auto_sleep;
        self
    }

    pub fn build(self) -> RigidBody {
        self.body
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn infinite_body_has_zero_inverse_mass() {
        let body = RigidBodyBuilder::fixed().build();
        assert_eq!(body.inv_mass(), 0.0);
        assert_eq!(body.inv_inertia(), 0.0);
    }

    #[test]
    fn fixed_linear_velocity_zeroes_only_inv_mass() {
        let mut body = RigidBodyBuilder::new(MassType::FixedLinearVelocity).build();
        body.set_mass_properties(&[MassProperties::new(Point::origin(), 2.0, 0.5)]);
        assert_eq!(body.inv_mass(), 0.0);
    }
}
