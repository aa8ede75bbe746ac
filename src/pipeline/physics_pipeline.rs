//! Orchestrates one `World::step` (spec §4): broadphase, narrowphase,
//! island construction, the constraint solver and a continuous-collision
//! pass, run in the stage order the teacher's `PhysicsPipeline::step`
//! uses (`detect_collisions_after_user_modifications` /
//! `build_islands_and_solve_constraints` / CCD motion clamping /
//! `detect_collisions_after_integration`), flattened to this crate's
//! single generational-arena storage model. `counters` times each stage
//! the same way `PhysicsPipeline::counters` does in the teacher.

use crate::counters::Counters;
use crate::data::Index;
use crate::dynamics::{build_islands, solver, CcdMode, CcdQuery, CcdSolver, JointSet, RigidBodySet, Settings};
use crate::geometry::{Aabb, ContactEvent, DynamicTree, FixtureQuery, NarrowPhase};
use crate::math::{Isometry, Vector};
use crate::pipeline::events::{ContactEventKind, EventHandler, PointImpulse};
use crate::pipeline::hooks::PhysicsHooks;

pub struct PhysicsPipeline {
    pub counters: Counters,
}

impl Default for PhysicsPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsPipeline {
    pub fn new() -> Self {
        Self {
            counters: Counters::new(false),
        }
    }

    /// Runs one discrete step of length `settings.dt()` against the full
    /// fixture set `fixtures` (spec §4: broadphase → narrowphase → island
    /// build → solve → continuous collision).
    #[allow(clippy::too_many_arguments)]
    pub fn step(
        &mut self,
        gravity: Vector,
        settings: &Settings,
        fixtures: &[Index],
        broad_phase: &mut DynamicTree,
        narrow_phase: &mut NarrowPhase,
        bodies: &mut RigidBodySet,
        joints: &mut JointSet,
        ccd: &CcdSolver,
        fixture_query: &dyn FixtureQuery,
        ccd_query: &dyn CcdQuery,
        hooks: &dyn PhysicsHooks,
        events: &dyn EventHandler,
    ) {
        let dt = settings.dt();
        self.counters.reset();
        self.counters.step_started();
        events.handle_step(dt);

        self.counters.stages.collision_detection_time.resume();
        self.sync_broad_phase(fixtures, broad_phase, fixture_query);
        self.update_narrow_phase(broad_phase, narrow_phase, fixture_query, hooks, events);
        self.counters.stages.collision_detection_time.pause();

        self.counters.stages.island_construction_time.resume();
        let islands = build_islands(bodies, narrow_phase, joints);
        self.counters.stages.island_construction_time.pause();

        let start_poses = self.capture_ccd_start_poses(settings, bodies);

        self.counters.stages.solver_time.resume();
        for island in &islands {
            solver::solve_island(island, bodies, narrow_phase, joints, settings, gravity, dt);
        }
        self.counters.stages.solver_time.pause();

        self.emit_postsolve(narrow_phase, events);

        self.counters.stages.ccd_time.resume();
        self.run_continuous_collision(bodies, broad_phase, ccd_query, ccd, &start_poses);
        self.counters.stages.ccd_time.pause();

        self.counters.step_completed();
        // The caller must refresh each fixture's cached `Collider::position`
        // from its body's new pose before the next `step` call — this
        // pipeline only ever reads that cache (see `FixtureQuery::transform`
        // in whatever implements it), never a live `RigidBodySet`, so it has
        // no way to do that sync itself without aliasing the `bodies`
        // reference the solver just finished mutating.
    }

    fn sync_broad_phase(&mut self, fixtures: &[Index], broad_phase: &mut DynamicTree, fixture_query: &dyn FixtureQuery) {
        self.counters.cd.broad_phase_time.resume();
        for &fixture in fixtures {
            let transform = fixture_query.transform(fixture);
            let aabb = fixture_query.shape(fixture).compute_aabb(&transform);
            if broad_phase.fat_aabb(fixture).is_some() {
                broad_phase.update(fixture, aabb, Vector::zeros());
            } else {
                broad_phase.insert(fixture, aabb);
            }
        }
        self.counters.cd.broad_phase_time.pause();
    }

    fn update_narrow_phase(
        &mut self,
        broad_phase: &DynamicTree,
        narrow_phase: &mut NarrowPhase,
        fixture_query: &dyn FixtureQuery,
        hooks: &dyn PhysicsHooks,
        events: &dyn EventHandler,
    ) {
        self.counters.cd.narrow_phase_time.resume();
        let candidates: Vec<(Index, Index)> = broad_phase
            .detect()
            .into_iter()
            .filter(|&(a, b)| hooks.filter_contact_pair(a, b))
            .collect();

        for contact_event in narrow_phase.update(&candidates, fixture_query) {
            let (kind, a, b) = match contact_event {
                ContactEvent::Began(a, b) => (ContactEventKind::Began, a, b),
                ContactEvent::Persisted(a, b) => (ContactEventKind::Persisted, a, b),
                ContactEvent::Ended(a, b) => (ContactEventKind::Ended, a, b),
            };
            events.handle_contact_event(kind, a, b);
        }
        self.counters.cd.narrow_phase_time.pause();
    }

    fn emit_postsolve(&self, narrow_phase: &NarrowPhase, events: &dyn EventHandler) {
        for pair in narrow_phase.contacts() {
            if pair.is_sensor || !pair.enabled || !pair.is_touching() {
                continue;
            }
            let impulses: Vec<PointImpulse> = pair
                .manifold
                .points
                .iter()
                .map(|p| PointImpulse {
                    normal_impulse: p.normal_impulse,
                    tangent_impulse: p.tangent_impulse,
                })
                .collect();
            events.handle_postsolve(pair.fixture_a, pair.fixture_b, &impulses);
        }
    }

    /// Records the pose of every body the continuous solver must sweep
    /// this step: bullets always, every dynamic body under `CcdMode::All`
    /// (spec §4.8: "each bullet body (or each dynamic body when CCD is
    /// ALL)").
    fn capture_ccd_start_poses(&self, settings: &Settings, bodies: &RigidBodySet) -> Vec<(Index, Isometry)> {
        if matches!(settings.continuous_detection_mode, CcdMode::None) {
            return Vec::new();
        }
        let sweep_all = matches!(settings.continuous_detection_mode, CcdMode::All);
        bodies
            .iter()
            .filter(|(_, b)| b.mass_type.is_dynamic() && (b.bullet || sweep_all) && !b.fixtures.is_empty())
            .map(|(id, b)| (id, b.position))
            .collect()
    }

    /// For each swept body, finds the earliest impact against nearby
    /// fixtures (via a broadphase query over the union of its start/end
    /// AABBs) and clamps its position to that time of impact, leaving
    /// velocity untouched so the next step's discrete solver resolves the
    /// contact (spec §4.8's "conservative advancement"; the clamp-only,
    /// no-velocity-change behavior mirrors the teacher's
    /// `CCDSolver::clamp_motions`). Other candidates are treated as
    /// stationary at their current pose during this sweep — a
    /// simplification of full two-body CCD, recorded in the design
    /// ledger.
    fn run_continuous_collision(
        &mut self,
        bodies: &mut RigidBodySet,
        broad_phase: &DynamicTree,
        ccd_query: &dyn CcdQuery,
        ccd: &CcdSolver,
        start_poses: &[(Index, Isometry)],
    ) {
        for &(body_id, start_pose) in start_poses {
            let Some(end_pose) = bodies.get(body_id).map(|b| b.position) else {
                continue;
            };
            let bullet_fixtures = match bodies.get(body_id) {
                Some(b) if !b.fixtures.is_empty() => b.fixtures.clone(),
                _ => continue,
            };

            let mut swept_aabb: Option<Aabb> = None;
            for &fixture in &bullet_fixtures {
                let shape = ccd_query.shape(fixture);
                let both = shape.compute_aabb(&start_pose).union(&shape.compute_aabb(&end_pose));
                swept_aabb = Some(match swept_aabb {
                    Some(acc) => acc.union(&both),
                    None => both,
                });
            }
            let Some(swept_aabb) = swept_aabb else { continue };

            let mut candidates = Vec::new();
            broad_phase.query(swept_aabb, &mut |candidate_fixture| {
                if ccd_query.body_of(candidate_fixture) == body_id {
                    return;
                }
                candidates.push(candidate_fixture);
            });
            let candidates: Vec<_> = candidates
                .into_iter()
                .map(|fixture| {
                    let pose = bodies
                        .get(ccd_query.body_of(fixture))
                        .map(|b| b.position)
                        .unwrap_or(end_pose);
                    (fixture, ccd_query.body_of(fixture), pose, pose, false)
                })
                .collect();

            if let Some(event) = ccd.earliest_toi(ccd_query, body_id, &bullet_fixtures, start_pose, end_pose, &candidates) {
                if let Some(body) = bodies.get_mut(body_id) {
                    let t = event.toi;
                    let translation =
                        start_pose.translation.vector + (end_pose.translation.vector - start_pose.translation.vector) * t;
                    let start_angle = start_pose.rotation.angle();
                    let mut delta = end_pose.rotation.angle() - start_angle;
                    let two_pi = 2.0 * std::f64::consts::PI as crate::math::Real;
                    while delta > std::f64::consts::PI as crate::math::Real {
                        delta -= two_pi;
                    }
                    while delta < -std::f64::consts::PI as crate::math::Real {
                        delta += two_pi;
                    }
                    let angle = start_angle + delta * t;
                    body.position = Isometry::new(translation, angle);
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data::Arena;
    use crate::dynamics::{RigidBodyBuilder, Settings};
    use crate::geometry::{Circle, Collider, ColliderBuilder, InteractionGroups, MassProperties, Shape};
    use crate::math::{Point, Real};
    use crate::pipeline::{DefaultEventHandler, DefaultHooks};

    type ColliderSet = Arena<Collider>;

    /// Borrows only the collider set; fixture position comes from the
    /// cached `Collider::position` field (see its doc comment), so this
    /// never needs to alias the `RigidBodySet` the solver mutates.
    struct FixtureView<'a>(&'a ColliderSet);

    impl FixtureQuery for FixtureView<'_> {
        fn shape(&self, fixture: Index) -> &Shape {
            &self.0.get(fixture).unwrap().shape
        }
        fn transform(&self, fixture: Index) -> Isometry {
            self.0.get(fixture).unwrap().position
        }
        fn filter(&self, fixture: Index) -> InteractionGroups {
            self.0.get(fixture).unwrap().filter
        }
        fn is_sensor(&self, fixture: Index) -> bool {
            self.0.get(fixture).unwrap().is_sensor
        }
        fn body_of(&self, fixture: Index) -> Index {
            self.0.get(fixture).unwrap().body().unwrap()
        }
        fn friction(&self, fixture: Index) -> Real {
            self.0.get(fixture).unwrap().friction
        }
        fn restitution(&self, fixture: Index) -> Real {
            self.0.get(fixture).unwrap().restitution
        }
        fn pair_can_sleep(&self, _fixture_a: Index, _fixture_b: Index) -> bool {
            false
        }
    }

    impl CcdQuery for FixtureView<'_> {
        fn shape(&self, fixture: Index) -> &Shape {
            &self.0.get(fixture).unwrap().shape
        }
        fn body_of(&self, fixture: Index) -> Index {
            self.0.get(fixture).unwrap().body().unwrap()
        }
        fn filter(&self, fixture: Index) -> InteractionGroups {
            self.0.get(fixture).unwrap().filter
        }
        fn is_sensor(&self, fixture: Index) -> bool {
            self.0.get(fixture).unwrap().is_sensor
        }
    }

    fn attach(bodies: &mut RigidBodySet, colliders: &mut ColliderSet, body_id: Index, mut collider: Collider) -> Index {
        collider.body = Some(body_id);
        collider.position = bodies.get(body_id).unwrap().position;
        let fixture = colliders.insert(collider);
        bodies.get_mut(body_id).unwrap().fixtures.push(fixture);
        fixture
    }

    /// Copies each body's current pose into its attached fixtures, the way
    /// the teacher's `update_colliders_positions` keeps colliders in sync
    /// after the solver moves a body.
    fn sync_collider_positions(bodies: &RigidBodySet, colliders: &mut ColliderSet, fixtures: &[Index]) {
        for &fixture in fixtures {
            let body = colliders.get(fixture).unwrap().body().unwrap();
            let position = bodies.get(body).unwrap().position;
            colliders.get_mut(fixture).unwrap().position = position;
        }
    }

    #[test]
    fn ball_falling_onto_floor_comes_to_rest_over_several_steps() {
        let mut bodies = RigidBodySet::new();
        let mut colliders: ColliderSet = Arena::new();

        let floor_id = bodies.insert(RigidBodyBuilder::fixed().position(Isometry::translation(0.0, -50.0)).build());
        let floor_collider = ColliderBuilder::new(Shape::Circle(Circle::new(50.0).unwrap())).build().unwrap();
        let floor_fixture = attach(&mut bodies, &mut colliders, floor_id, floor_collider);

        let mut ball_body = RigidBodyBuilder::dynamic().position(Isometry::translation(0.0, 2.0)).build();
        ball_body.set_mass_properties(&[MassProperties::new(Point::origin(), 1.0, 0.1)]);
        let ball_id = bodies.insert(ball_body);
        let ball_collider = ColliderBuilder::new(Shape::Circle(Circle::new(0.5).unwrap())).build().unwrap();
        let ball_fixture = attach(&mut bodies, &mut colliders, ball_id, ball_collider);

        let mut broad_phase = DynamicTree::new();
        let mut narrow_phase = NarrowPhase::new();
        let mut joints = JointSet::new();
        let settings = Settings::default();
        let ccd = CcdSolver::default();
        let fixtures = vec![floor_fixture, ball_fixture];
        let mut pipeline = PhysicsPipeline::new();

        for _ in 0..120 {
            let query = FixtureView(&colliders);
            pipeline.step(
                Vector::new(0.0, -10.0),
                &settings,
                &fixtures,
                &mut broad_phase,
                &mut narrow_phase,
                &mut bodies,
                &mut joints,
                &ccd,
                &query,
                &query,
                &DefaultHooks,
                &DefaultEventHandler,
            );
            sync_collider_positions(&bodies, &mut colliders, &fixtures);
        }

        let ball = bodies.get(ball_id).unwrap();
        assert!(
            ball.position.translation.vector.y > 0.3,
            "ball sank through the floor: y={}",
            ball.position.translation.vector.y
        );
        assert!(ball.linvel.y.abs() < 1.0, "ball should have settled, vy={}", ball.linvel.y);
    }
}
