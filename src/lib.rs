//! A 2D rigid-body physics engine core.
//!
//! Broadphase (a dynamic AABB tree) feeds candidate fixture pairs to
//! narrowphase (GJK/EPA manifold construction with warm-started, stable
//! contact-point identities), which the island builder groups into
//! independent connected components for a Sequential Impulses velocity/
//! position solver. Fast movers get an optional conservative-advancement
//! continuous collision pass. [`World`] ties all of this together behind a
//! single synchronous `step` call.
//!
//! ```
//! use impulse2d::{World, RigidBodyBuilder, ColliderBuilder, Shape, Circle, Vector};
//!
//! let mut world = World::new(Vector::new(0.0, -9.81));
//! let ball = world.add_body(RigidBodyBuilder::dynamic().translation(Vector::new(0.0, 10.0)).build());
//! world
//!     .add_fixture(ball, ColliderBuilder::new(Shape::Circle(Circle::new(0.5).unwrap())).build().unwrap())
//!     .unwrap();
//! world.step(1.0 / 60.0).unwrap();
//! ```

pub mod counters;
pub mod data;
pub mod dynamics;
pub mod errors;
pub mod geometry;
pub mod math;
pub mod pipeline;
pub mod utils;
mod world;

pub use counters::{CollisionDetectionCounters, Counters, SolverCounters, StageCounters, Timer};
pub use data::{Arena, Index};
pub use dynamics::{
    joint::{
        AngleJoint, AngleJointBuilder, DistanceJoint, DistanceJointBuilder, FrictionJoint, FrictionJointBuilder,
        GenericJoint, GenericJointBuilder, Joint, JointAxesMask, JointInstance, JointLimit, JointMotor, JointSet,
        MotorJoint, MotorJointBuilder, MouseJoint, MouseJointBuilder, PrismaticJoint, PrismaticJointBuilder,
        PulleyJoint, PulleyJointBuilder, RevoluteJoint, RevoluteJointBuilder, RopeJoint, RopeJointBuilder, WeldJoint,
        WeldJointBuilder, WheelJoint, WheelJointBuilder,
    },
    CcdMode, CcdQuery, CcdSolver, MassType, RigidBody, RigidBodyBuilder, RigidBodySet, Settings, ToiEvent,
};
pub use errors::{PhysicsError, PhysicsResult, ValueError};
pub use geometry::{
    Aabb, Capsule, Circle, Collider, ColliderBuilder, ColliderSet, ContactEvent, ContactId, ContactManifold,
    ContactPair, Feature, HalfEllipse, InteractionGroups, ManifoldPoint, MassProperties, Polygon, Ray,
    RayIntersection, Segment, Shape, Slice,
};
pub use math::{Isometry, Point, Real, Rotation, Vector};
pub use pipeline::{ContactEventKind, DefaultEventHandler, DefaultHooks, EventHandler, PhysicsHooks, PointImpulse};
pub use world::{RayHit, World};
