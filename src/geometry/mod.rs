//! Geometry: shapes, mass properties, broad/narrow-phase collision
//! detection and manifold construction (spec §3-§4.5).

mod aabb;
mod broad_phase;
mod collider;
mod contact;
pub mod epa;
pub mod gjk;
mod interaction_groups;
mod manifold;
mod mass_properties;
mod narrow_phase;
mod ray;
mod shape;

pub use aabb::Aabb;
pub use broad_phase::{DynamicTree, AABB_MARGIN};
pub use collider::{Collider, ColliderBuilder};
pub use contact::{ContactId, ContactManifold, ManifoldPoint};
pub use interaction_groups::InteractionGroups;
pub use manifold::{collide, SPECULATIVE_MARGIN};
pub use mass_properties::MassProperties;
pub use narrow_phase::{ContactEvent, ContactPair, FixtureQuery, NarrowPhase};
pub use ray::{Ray, RayIntersection};
pub use shape::{Capsule, Circle, Feature, HalfEllipse, Polygon, Segment, Shape, Slice};

/// Storage for fixtures, keyed by stable [`crate::data::Index`] (spec §9:
/// "fixtures similarly" live in a vector indexed by id).
pub type ColliderSet = crate::data::Arena<Collider>;
