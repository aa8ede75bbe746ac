//! `World` (spec §6 "World API"): the single entry point an application
//! uses — owns bodies, fixtures, joints, the broadphase/narrowphase, the
//! solver pipeline and registered listeners, and exposes `step`, add/remove,
//! queries and ray/volume tests. Grounded in the `MetricWorld`/`PhysicsWorld`
//! wrapper shape the wider `rapier2d` ecosystem uses around a bare
//! `PhysicsPipeline` (see `examples/other_examples/…RomanSlack-SimuForge…world.rs`
//! and `…Luzzotech-arcade…world_2d.rs`): a plain struct holding every set the
//! pipeline needs, plus the id bookkeeping and listener dispatch the pipeline
//! itself stays ignorant of.

use crate::data::Index;
use crate::dynamics::joint::{Joint, JointInstance, JointSet};
use crate::dynamics::{CcdMode, CcdQuery, CcdSolver, MassType, RigidBody, RigidBodySet, Settings};
use crate::errors::{require, require_finite, PhysicsError, PhysicsResult};
use crate::geometry::{
    Aabb, Collider, ColliderSet, ContactPair, DynamicTree, FixtureQuery, InteractionGroups, NarrowPhase, Ray, Shape,
};
use crate::math::{Isometry, Real, Vector};
use crate::pipeline::{ContactEventKind, DefaultEventHandler, DefaultHooks, EventHandler, PhysicsHooks, PhysicsPipeline};

/// A raycast hit against one fixture, returned by [`World::raycast`] (spec
/// §6: `raycast(ray, maxLength, filter) -> hits`).
#[derive(Copy, Clone, Debug)]
pub struct RayHit {
    pub fixture: Index,
    pub body: Index,
    pub point: crate::math::Point,
    pub normal: Vector,
    pub toi: Real,
}

/// Borrows only what the contact manager / CCD solver need from the
/// world's fixture storage, so neither has to see `RigidBodySet` or
/// `World` itself (spec §9: "the bidirectional navigation ... is a derived
/// index rebuilt each step ... not a stored back-pointer"). Deliberately
/// does not also borrow `RigidBodySet`: `PhysicsPipeline::step` takes
/// `&mut RigidBodySet` for the same call, so this view can only read
/// fixture-local state the solver itself doesn't touch.
struct FixtureView<'a> {
    colliders: &'a ColliderSet,
}

impl FixtureQuery for FixtureView<'_> {
    fn shape(&self, fixture: Index) -> &Shape {
        &self.colliders.get(fixture).expect("live fixture").shape
    }
    fn transform(&self, fixture: Index) -> Isometry {
        self.colliders.get(fixture).expect("live fixture").position
    }
    fn filter(&self, fixture: Index) -> InteractionGroups {
        self.colliders.get(fixture).expect("live fixture").filter
    }
    fn is_sensor(&self, fixture: Index) -> bool {
        self.colliders.get(fixture).expect("live fixture").is_sensor
    }
    fn body_of(&self, fixture: Index) -> Index {
        self.colliders.get(fixture).expect("live fixture").body().expect("attached fixture")
    }
    fn friction(&self, fixture: Index) -> Real {
        self.colliders.get(fixture).expect("live fixture").friction
    }
    fn restitution(&self, fixture: Index) -> Real {
        self.colliders.get(fixture).expect("live fixture").restitution
    }
    fn pair_can_sleep(&self, _fixture_a: Index, _fixture_b: Index) -> bool {
        // Always re-run narrowphase: skipping it for sleeping pairs would
        // need to borrow `RigidBodySet` here while the solver holds it
        // mutably for the same `pipeline.step` call. Sleeping bodies don't
        // move, so the recomputation is cheap and idempotent.
        false
    }
}

impl CcdQuery for FixtureView<'_> {
    fn shape(&self, fixture: Index) -> &Shape {
        &self.colliders.get(fixture).expect("live fixture").shape
    }
    fn body_of(&self, fixture: Index) -> Index {
        self.colliders.get(fixture).expect("live fixture").body().expect("attached fixture")
    }
    fn filter(&self, fixture: Index) -> InteractionGroups {
        self.colliders.get(fixture).expect("live fixture").filter
    }
    fn is_sensor(&self, fixture: Index) -> bool {
        self.colliders.get(fixture).expect("live fixture").is_sensor
    }
}

/// The owner of everything a running simulation needs (spec §2 "World").
/// `step` is the only method that mutates the solver state; every other
/// method is a synchronous, immediate add/remove/query (spec §5: "`step()`
/// is a synchronous method that runs to completion; no operation
/// suspends").
pub struct World {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    joints: JointSet,
    broad_phase: DynamicTree,
    narrow_phase: NarrowPhase,
    pipeline: PhysicsPipeline,
    ccd: CcdSolver,
    gravity: Vector,
    settings: Settings,
    step_count: u64,
    bounds: Option<Aabb>,
    hooks: Box<dyn PhysicsHooks>,
    events: Box<dyn EventHandler>,
    /// Set for the duration of `step`, defensively guarding against
    /// reentrant mutation (spec §5: "removing a body during a step is
    /// disallowed"). Nothing in this crate's public API can actually
    /// reenter `step` today — listeners only ever receive `Index` values,
    /// never a `&mut World` — but the flag documents the intended contract
    /// and protects against a future listener capability widening it.
    stepping: bool,
}

impl Default for World {
    fn default() -> Self {
        Self::new(Vector::zeros())
    }
}

impl World {
    pub fn new(gravity: Vector) -> Self {
        Self {
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            joints: JointSet::new(),
            broad_phase: DynamicTree::new(),
            narrow_phase: NarrowPhase::new(),
            pipeline: PhysicsPipeline::new(),
            ccd: CcdSolver::default(),
            gravity,
            settings: Settings::default(),
            step_count: 0,
            bounds: None,
            hooks: Box::new(DefaultHooks),
            events: Box::new(DefaultEventHandler),
            stepping: false,
        }
    }

    pub fn with_settings(gravity: Vector, settings: Settings) -> PhysicsResult<Self> {
        settings.validate()?;
        let mut world = Self::new(gravity);
        world.settings = settings;
        Ok(world)
    }

    // ---- settings / gravity -------------------------------------------------

    pub fn gravity(&self) -> Vector {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vector) {
        self.gravity = gravity;
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Validates and installs new settings (spec §6 configuration object;
    /// §7: out-of-range values are a precondition failure, the world is
    /// left unchanged).
    pub fn set_settings(&mut self, settings: Settings) -> PhysicsResult<()> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    /// The world's configured bounds for the "left bounds" listener (spec
    /// §6: "bound listener (body left AxisAlignedBounds)"). `None` (the
    /// default) disables the check.
    pub fn set_bounds(&mut self, bounds: Option<Aabb>) {
        self.bounds = bounds;
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    // ---- listeners -----------------------------------------------------------

    pub fn set_hooks(&mut self, hooks: Box<dyn PhysicsHooks>) {
        self.hooks = hooks;
    }

    pub fn set_event_handler(&mut self, events: Box<dyn EventHandler>) {
        self.events = events;
    }

    // ---- bodies ----------------------------------------------------------

    /// Adds a body to the world, returning its stable handle (spec §6
    /// `addBody`).
    pub fn add_body(&mut self, body: RigidBody) -> Index {
        self.bodies.insert(body)
    }

    /// Removes a body and every fixture/contact/joint attached to it (spec
    /// §6 `removeBody`). Fails with [`PhysicsError::UnknownBody`] if `body`
    /// is not a live handle, and with a precondition failure if called
    /// while the world is mid-step (spec §5).
    pub fn remove_body(&mut self, body: Index) -> PhysicsResult<RigidBody> {
        if self.stepping {
            return Err(PhysicsError::InvalidValue(crate::errors::ValueError::new(
                "remove_body",
                "called mid-step",
                "remove_body",
                "only be called",
                "between steps",
            )));
        }
        let removed = self.bodies.remove(body).ok_or(PhysicsError::UnknownBody(body))?;

        for &fixture in &removed.fixtures {
            self.colliders.remove(fixture);
            self.broad_phase.remove(fixture);
            self.events.handle_fixture_destroyed(fixture);
        }

        let stale_joints: Vec<Index> = self
            .joints
            .iter()
            .filter(|(_, j)| j.body_a == body || j.body_b == body)
            .map(|(id, _)| id)
            .collect();
        for joint in stale_joints {
            self.joints.remove(joint);
            self.events.handle_joint_destroyed(joint);
        }

        self.events.handle_body_destroyed(body);
        Ok(removed)
    }

    pub fn get_body(&self, body: Index) -> Option<&RigidBody> {
        self.bodies.get(body)
    }

    pub fn get_body_mut(&mut self, body: Index) -> Option<&mut RigidBody> {
        self.bodies.get_mut(body)
    }

    pub fn get_bodies(&self) -> impl Iterator<Item = (Index, &RigidBody)> {
        self.bodies.iter()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Wakes `body` (new contact, applied force, joint wake, explicit
    /// un-sleep — spec §8 "Sleeping" invariant).
    pub fn wake_body(&mut self, body: Index) -> PhysicsResult<()> {
        self.bodies.get_mut(body).ok_or(PhysicsError::UnknownBody(body))?.wake_up();
        Ok(())
    }

    pub fn set_body_asleep(&mut self, body: Index, asleep: bool) -> PhysicsResult<()> {
        let b = self.bodies.get_mut(body).ok_or(PhysicsError::UnknownBody(body))?;
        if asleep {
            b.sleep();
        } else {
            b.wake_up();
        }
        Ok(())
    }

    /// Applies a force at the body's center of mass, accumulated until the
    /// next `step` integrates it, and wakes the body (spec §6 "accumulated
    /// force/torque apply/clear").
    pub fn apply_force(&mut self, body: Index, force: Vector) -> PhysicsResult<()> {
        let b = self.bodies.get_mut(body).ok_or(PhysicsError::UnknownBody(body))?;
        b.apply_force(force);
        b.wake_up();
        Ok(())
    }

    pub fn apply_torque(&mut self, body: Index, torque: Real) -> PhysicsResult<()> {
        let b = self.bodies.get_mut(body).ok_or(PhysicsError::UnknownBody(body))?;
        b.apply_torque(torque);
        b.wake_up();
        Ok(())
    }

    pub fn clear_forces(&mut self, body: Index) -> PhysicsResult<()> {
        self.bodies.get_mut(body).ok_or(PhysicsError::UnknownBody(body))?.clear_accumulators();
        Ok(())
    }

    /// Recomputes `body`'s mass/inertia from the mass properties of every
    /// fixture currently attached to it (spec §4.1 "mass composition").
    /// Called automatically by `add_fixture`/`remove_fixture`; exposed so a
    /// caller can force a recompute after mutating a fixture's density
    /// in-place.
    pub fn recompute_mass(&mut self, body: Index) -> PhysicsResult<()> {
        let fixtures = self.bodies.get(body).ok_or(PhysicsError::UnknownBody(body))?.fixtures.clone();
        let mut contributions = Vec::with_capacity(fixtures.len());
        for fixture in fixtures {
            if let Some(collider) = self.colliders.get(fixture) {
                contributions.push(collider.create_mass()?);
            }
        }
        self.bodies.get_mut(body).unwrap().set_mass_properties(&contributions);
        Ok(())
    }

    /// Reclassifies `body`'s mass type, then recomputes mass/inertia (spec
    /// §6 "mass get/set/setType").
    pub fn set_body_mass_type(&mut self, body: Index, mass_type: MassType) -> PhysicsResult<()> {
        self.bodies.get_mut(body).ok_or(PhysicsError::UnknownBody(body))?.mass_type = mass_type;
        self.recompute_mass(body)
    }

    // ---- fixtures ----------------------------------------------------------

    /// Attaches a fixture to `body` and immediately recomputes the body's
    /// mass (spec §4.1, §6 "fixture add/remove"). The fixture is inserted
    /// into the broadphase on the next `step`, the way a newly added body
    /// only becomes a broadphase leaf once its AABB is known.
    pub fn add_fixture(&mut self, body: Index, mut collider: Collider) -> PhysicsResult<Index> {
        if !self.bodies.contains(body) {
            return Err(PhysicsError::UnknownBody(body));
        }
        collider.position = self.bodies.get(body).unwrap().position;
        collider.body = Some(body);
        let fixture = self.colliders.insert(collider);
        self.bodies.get_mut(body).unwrap().fixtures.push(fixture);
        self.recompute_mass(body)?;
        Ok(fixture)
    }

    /// Detaches and removes a fixture (spec §6 "fixture add/remove").
    pub fn remove_fixture(&mut self, fixture: Index) -> PhysicsResult<Collider> {
        let collider = self.colliders.remove(fixture).ok_or(PhysicsError::UnknownFixture(fixture))?;
        if let Some(body) = collider.body {
            if let Some(b) = self.bodies.get_mut(body) {
                b.fixtures.retain(|&f| f != fixture);
            }
            self.recompute_mass(body)?;
        }
        self.broad_phase.remove(fixture);
        self.events.handle_fixture_destroyed(fixture);
        Ok(collider)
    }

    pub fn get_fixture(&self, fixture: Index) -> Option<&Collider> {
        self.colliders.get(fixture)
    }

    pub fn get_fixture_mut(&mut self, fixture: Index) -> Option<&mut Collider> {
        self.colliders.get_mut(fixture)
    }

    // ---- joints ------------------------------------------------------------

    /// Attaches a joint between two distinct, already-added bodies (spec
    /// §6 `addJoint`; §7: joining a body to itself, or to an unknown body,
    /// is a precondition failure).
    pub fn add_joint(&mut self, joint: Joint, body_a: Index, body_b: Index) -> PhysicsResult<Index> {
        if body_a == body_b {
            return Err(PhysicsError::SelfJoint(body_a));
        }
        if !self.bodies.contains(body_a) {
            return Err(PhysicsError::UnknownBody(body_a));
        }
        if !self.bodies.contains(body_b) {
            return Err(PhysicsError::UnknownBody(body_b));
        }
        self.bodies.get_mut(body_a).unwrap().wake_up();
        self.bodies.get_mut(body_b).unwrap().wake_up();
        Ok(self.joints.insert(JointInstance::new(joint, body_a, body_b)))
    }

    pub fn remove_joint(&mut self, joint: Index) -> PhysicsResult<JointInstance> {
        let removed = self.joints.remove(joint).ok_or(PhysicsError::UnknownJoint(joint))?;
        self.events.handle_joint_destroyed(joint);
        Ok(removed)
    }

    pub fn get_joint(&self, joint: Index) -> Option<&JointInstance> {
        self.joints.get(joint)
    }

    pub fn get_joint_mut(&mut self, joint: Index) -> Option<&mut JointInstance> {
        self.joints.get_mut(joint)
    }

    pub fn get_joints(&self) -> impl Iterator<Item = (Index, &JointInstance)> {
        self.joints.iter()
    }

    // ---- body-relative graph queries ---------------------------------------

    /// Every body currently touching `body` through a non-sensor contact
    /// (or, if `include_sensed` is set, sensor contacts too) (spec §6
    /// `getInContactBodies(includeSensed)`).
    pub fn in_contact_bodies(&self, body: Index, include_sensed: bool) -> Vec<Index> {
        let mut out = Vec::new();
        for pair in self.narrow_phase.contacts() {
            if !pair.is_touching() || (pair.is_sensor && !include_sensed) {
                continue;
            }
            if pair.body_a == body {
                out.push(pair.body_b);
            } else if pair.body_b == body {
                out.push(pair.body_a);
            }
        }
        out
    }

    /// Every body jointed to `body` (spec §6 `getJoinedBodies`).
    pub fn joined_bodies(&self, body: Index) -> Vec<Index> {
        self.joints
            .iter()
            .filter_map(|(_, j)| {
                if j.body_a == body {
                    Some(j.body_b)
                } else if j.body_b == body {
                    Some(j.body_a)
                } else {
                    None
                }
            })
            .collect()
    }

    /// Every live contact pair involving one of `body`'s fixtures (spec §6
    /// `getContacts`).
    pub fn contacts_of(&self, body: Index) -> Vec<&ContactPair> {
        self.narrow_phase
            .contacts()
            .filter(|pair| pair.body_a == body || pair.body_b == body)
            .collect()
    }

    /// Every joint handle attached to `body` (spec §6 `getJoints`).
    pub fn joints_of(&self, body: Index) -> Vec<Index> {
        self.joints
            .iter()
            .filter(|(_, j)| j.body_a == body || j.body_b == body)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn contacts(&self) -> impl Iterator<Item = &ContactPair> {
        self.narrow_phase.contacts()
    }

    // ---- spatial queries -----------------------------------------------------

    /// Fixtures whose broadphase AABB overlaps `aabb` (spec §6
    /// `detect(aabb)`).
    pub fn query_aabb(&self, aabb: Aabb) -> Vec<Index> {
        let mut hits = Vec::new();
        self.broad_phase.query(aabb, &mut |fixture| hits.push(fixture));
        hits
    }

    /// Fixtures whose shape actually overlaps `shape` placed at `transform`
    /// (spec §6 `detect(convex, transform)`), narrowed from a broadphase
    /// AABB pass by an exact GJK overlap test.
    pub fn query_shape(&self, shape: &Shape, transform: &Isometry) -> Vec<Index> {
        let aabb = shape.compute_aabb(transform);
        let mut hits = Vec::new();
        self.broad_phase.query(aabb, &mut |fixture| {
            let Some(collider) = self.colliders.get(fixture) else { return };
            let overlaps = matches!(
                crate::geometry::gjk::gjk(shape, transform, &collider.shape, &collider.position),
                crate::geometry::gjk::GjkResult::Intersecting { .. }
            );
            if overlaps {
                hits.push(fixture);
            }
        });
        hits
    }

    /// Casts `ray` up to `max_length`, returning every fixture hit whose
    /// filter passes `filter`, sorted nearest-first (spec §6 `raycast(ray,
    /// maxLength, filter) -> hits`; §7: a zero-length ray is rejected by
    /// [`Ray::new`] before it ever reaches here).
    pub fn raycast(&self, ray: &Ray, max_length: Real, filter: InteractionGroups) -> PhysicsResult<Vec<RayHit>> {
        require_finite(max_length, "max_length")?;
        require(max_length, |v| v >= 0.0, "max_length", "raycast", ">=", 0.0)?;

        let mut candidates = Vec::new();
        self.broad_phase.raycast(ray, max_length, &mut |fixture, _toi| candidates.push(fixture));

        let mut hits = Vec::new();
        for fixture in candidates {
            let Some(collider) = self.colliders.get(fixture) else { continue };
            if !filter.test(&collider.filter) {
                continue;
            }
            if let Some(hit) = collider.shape.raycast(ray, max_length, &collider.position)? {
                hits.push(RayHit {
                    fixture,
                    body: collider.body().unwrap_or_else(Index::invalid),
                    point: ray.point_at(hit.toi),
                    normal: hit.normal,
                    toi: hit.toi,
                });
            }
        }
        hits.sort_by(|a, b| a.toi.partial_cmp(&b.toi).unwrap_or(std::cmp::Ordering::Equal));
        Ok(hits)
    }

    // ---- stepping ------------------------------------------------------------

    /// Advances the simulation by `dt` seconds (spec §6 `step(dt)`; §8
    /// "`step(0)` is a no-op on poses and velocities but still rebuilds
    /// broadphase-invariant state"). Uses `dt` for integration regardless
    /// of `settings.step_frequency`, matching the source engine's contract
    /// that the caller's wall-clock `dt` always wins; `step_frequency`
    /// remains only the *nominal* value callers are expected to pass.
    pub fn step(&mut self, dt: Real) -> PhysicsResult<()> {
        require_finite(dt, "dt")?;
        require(dt, |v| v >= 0.0, "dt", "step", ">=", 0.0)?;

        self.stepping = true;
        let mut settings = self.settings;
        settings.step_frequency = dt;

        let fixtures: Vec<Index> = self.colliders.iter().map(|(id, _)| id).collect();

        let view = FixtureView {
            colliders: &self.colliders,
        };
        self.pipeline.step(
            self.gravity,
            &settings,
            &fixtures,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.joints,
            &self.ccd,
            &view,
            &view,
            self.hooks.as_ref(),
            self.events.as_ref(),
        );
        drop(view);

        for (_fixture, collider) in self.colliders.iter_mut() {
            let Some(body) = collider.body else { continue };
            let Some(pose) = self.bodies.get(body).map(|b| b.position) else { continue };
            collider.position = pose;
            if let Some(bounds) = self.bounds {
                let fixture_aabb = collider.compute_aabb(&pose);
                if !bounds.contains(&fixture_aabb) {
                    self.events.handle_body_left_bounds(body);
                }
            }
        }

        self.step_count += 1;
        self.stepping = false;
        Ok(())
    }

    /// Runs `step(dt)` `n` times in sequence (spec §6 `step(dt, n)`).
    pub fn step_n(&mut self, dt: Real, n: u32) -> PhysicsResult<()> {
        for _ in 0..n {
            self.step(dt)?;
        }
        Ok(())
    }

    /// Whether CCD should sweep `body` this step, per `settings`'s mode
    /// (spec §4.8: bullets always, every dynamic body under `Ccd::All`).
    pub fn is_ccd_eligible(&self, body: Index) -> bool {
        let Some(b) = self.bodies.get(body) else { return false };
        match self.settings.continuous_detection_mode {
            CcdMode::None => false,
            CcdMode::BulletsOnly => b.bullet,
            CcdMode::All => b.mass_type.is_dynamic(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dynamics::RigidBodyBuilder;
    use crate::geometry::{Circle, ColliderBuilder, MassProperties};
    use crate::math::Point;

    fn ball(radius: Real, y: Real) -> (RigidBody, Collider) {
        let mut body = RigidBodyBuilder::dynamic().position(Isometry::translation(0.0, y)).build();
        body.set_mass_properties(&[MassProperties::new(Point::origin(), 1.0, 0.4 * radius * radius)]);
        let collider = ColliderBuilder::new(Shape::Circle(Circle::new(radius).unwrap())).build().unwrap();
        (body, collider)
    }

    #[test]
    fn free_fall_matches_closed_form_after_one_second() {
        let mut world = World::new(Vector::new(0.0, -10.0));
        let (body, collider) = ball(0.5, 10.0);
        let id = world.add_body(body);
        world.add_fixture(id, collider).unwrap();

        for _ in 0..60 {
            world.step(1.0 / 60.0).unwrap();
        }

        let body = world.get_body(id).unwrap();
        assert!((body.position.translation.vector.y - 5.0).abs() < 0.05, "y={}", body.position.translation.vector.y);
        assert!((body.linvel.y - (-10.0)).abs() < 0.1, "vy={}", body.linvel.y);
    }

    #[test]
    fn ball_settles_on_floor_and_goes_to_sleep() {
        let mut world = World::new(Vector::new(0.0, -10.0));
        let floor = world.add_body(RigidBodyBuilder::fixed().position(Isometry::translation(0.0, -50.0)).build());
        world
            .add_fixture(floor, ColliderBuilder::new(Shape::Circle(Circle::new(50.0).unwrap())).build().unwrap())
            .unwrap();

        let (body, collider) = ball(0.5, 1.0);
        let id = world.add_body(body);
        world.add_fixture(id, collider).unwrap();

        for _ in 0..180 {
            world.step(1.0 / 60.0).unwrap();
        }

        let settled = world.get_body(id).unwrap();
        assert!(settled.position.translation.vector.y > 49.0, "y={}", settled.position.translation.vector.y);
    }

    #[test]
    fn step_zero_is_a_pose_and_velocity_no_op() {
        let mut world = World::new(Vector::new(0.0, -10.0));
        let (body, collider) = ball(0.5, 10.0);
        let id = world.add_body(body);
        world.add_fixture(id, collider).unwrap();

        let before_pos = world.get_body(id).unwrap().position;
        let before_vel = world.get_body(id).unwrap().linvel;
        world.step(0.0).unwrap();
        let after = world.get_body(id).unwrap();
        assert_eq!(before_pos, after.position);
        assert_eq!(before_vel, after.linvel);
    }

    #[test]
    fn negative_dt_is_rejected() {
        let mut world = World::new(Vector::zeros());
        assert!(world.step(-1.0 / 60.0).is_err());
    }

    #[test]
    fn self_joint_is_rejected() {
        let mut world = World::new(Vector::zeros());
        let id = world.add_body(RigidBodyBuilder::dynamic().build());
        let joint = Joint::Weld(crate::dynamics::joint::WeldJoint::default());
        assert!(matches!(world.add_joint(joint, id, id), Err(PhysicsError::SelfJoint(_))));
    }

    #[test]
    fn removing_unknown_body_is_reported() {
        let mut world = World::new(Vector::zeros());
        let ghost = Index::invalid();
        assert!(matches!(world.remove_body(ghost), Err(PhysicsError::UnknownBody(_))));
    }

    #[test]
    fn raycast_hits_a_circle_fixture() {
        let mut world = World::new(Vector::zeros());
        let id = world.add_body(RigidBodyBuilder::fixed().position(Isometry::translation(5.0, 0.0)).build());
        world
            .add_fixture(id, ColliderBuilder::new(Shape::Circle(Circle::new(1.0).unwrap())).build().unwrap())
            .unwrap();

        let ray = Ray::new(Point::origin(), Vector::new(1.0, 0.0)).unwrap();
        let hits = world.raycast(&ray, 100.0, InteractionGroups::all()).unwrap();
        assert_eq!(hits.len(), 1);
        assert!((hits[0].toi - 4.0).abs() < 1.0e-3);
    }

    #[test]
    fn removing_a_body_drops_its_fixtures_and_joints() {
        let mut world = World::new(Vector::zeros());
        let a = world.add_body(RigidBodyBuilder::dynamic().build());
        let b = world.add_body(RigidBodyBuilder::dynamic().build());
        let fixture = world
            .add_fixture(a, ColliderBuilder::new(Shape::Circle(Circle::new(1.0).unwrap())).build().unwrap())
            .unwrap();
        let joint = world
            .add_joint(Joint::Weld(crate::dynamics::joint::WeldJoint::default()), a, b)
            .unwrap();

        world.remove_body(a).unwrap();
        assert!(world.get_fixture(fixture).is_none());
        assert!(world.get_joint(joint).is_none());
        assert!(world.get_body(b).is_some());
    }
}
