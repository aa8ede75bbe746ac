//! Listener registration and event dispatch (spec §6: "step listener,
//! contact listener (begin/persist/end/presolve/postsolve), destruction
//! listener, bound listener"). Per spec §6 "Listener callbacks": contact
//! events reach listeners through a typed event-kind variant to a single
//! dispatch function rather than per-callback virtual dispatch across hot
//! loops — the same shape the teacher's `EventHandler` trait takes in
//! `physics_pipeline.rs`.

use crate::data::Index;
use crate::math::Real;

/// What happened to a contact pair this step (spec §4.5 step 3: "begin
/// (new touching), persist (still touching), end").
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ContactEventKind {
    Began,
    Persisted,
    Ended,
}

/// One contact point's resolved impulse, reported post-solve (spec §4.5
/// step 3 post-solve: "after solver, report impulses").
#[derive(Copy, Clone, Debug, Default)]
pub struct PointImpulse {
    pub normal_impulse: Real,
    pub tangent_impulse: Real,
}

/// The single dispatch surface for every event a registered listener can
/// observe (spec §6's four listener kinds, folded into one capability
/// object with independently-overridable methods). `World::step` drains
/// events at phase boundaries and calls these in order; listener
/// exceptions are a non-goal here since Rust has no catchable listener
/// panics to contain mid-step — a panicking handler unwinds like any
/// other Rust code.
pub trait EventHandler {
    fn handle_contact_event(&self, kind: ContactEventKind, fixture_a: Index, fixture_b: Index) {
        let _ = (kind, fixture_a, fixture_b);
    }

    fn handle_postsolve(&self, fixture_a: Index, fixture_b: Index, impulses: &[PointImpulse]) {
        let _ = (fixture_a, fixture_b, impulses);
    }

    fn handle_step(&self, dt: Real) {
        let _ = dt;
    }

    fn handle_body_destroyed(&self, body: Index) {
        let _ = body;
    }

    fn handle_joint_destroyed(&self, joint: Index) {
        let _ = joint;
    }

    fn handle_fixture_destroyed(&self, fixture: Index) {
        let _ = fixture;
    }

    /// A body's AABB left the world's configured bounds (spec §6: "bound
    /// listener (body left AxisAlignedBounds)").
    fn handle_body_left_bounds(&self, body: Index) {
        let _ = body;
    }
}

/// Accepts every event and does nothing; the default when no handler is
/// registered.
pub struct DefaultEventHandler;

impl EventHandler for DefaultEventHandler {}
