//! Pair-level hooks (spec §4.5 step 1 filter: "...or an event listener
//! vetoes the pair"), invoked by the contact manager before narrowphase
//! runs and again before the solver commits a pair's impulses this step.
//! Grounded in the teacher's `PhysicsHooks` trait, used by
//! `physics_pipeline.rs` and `voxel_fracture_hooks.rs`.

use crate::data::Index;

/// Per-pair filtering and solver overrides. A default no-op implementation
/// accepts every pair, matching the teacher's `()` / default `PhysicsHooks`
/// impl.
pub trait PhysicsHooks {
    /// Called once per candidate pair before narrowphase runs. Returning
    /// `false` vetoes the pair outright for this step.
    fn filter_contact_pair(&self, fixture_a: Index, fixture_b: Index) -> bool {
        let _ = (fixture_a, fixture_b);
        true
    }

    /// Called once per touching pair immediately before the solver builds
    /// its constraints (spec §4.5 step 3 pre-solve: "allow listener to
    /// disable this step"). Returning `false` disables the pair for this
    /// step only; its warm-start state is kept.
    fn modify_solver_contact(&self, fixture_a: Index, fixture_b: Index) -> bool {
        let _ = (fixture_a, fixture_b);
        true
    }
}

/// Accepts every pair; the default when no hooks are registered.
pub struct DefaultHooks;

impl PhysicsHooks for DefaultHooks {}
