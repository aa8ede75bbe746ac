//! One-step orchestration (spec §4): broadphase, narrowphase, island
//! construction, the constraint solver and continuous collision, wired
//! together the way the teacher's `PhysicsPipeline::step` wires its own
//! stages.

mod events;
mod hooks;
mod physics_pipeline;

pub use events::{ContactEventKind, DefaultEventHandler, EventHandler, PointImpulse};
pub use hooks::{DefaultHooks, PhysicsHooks};
pub use physics_pipeline::PhysicsPipeline;
