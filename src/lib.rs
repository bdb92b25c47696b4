//! A small real-time 2D rigid-body physics kernel.
//!
//! Circles and axis-aligned boxes are advanced with semi-implicit Euler in
//! fixed steps. Each step rebuilds a quadtree broad-phase, runs an iterative
//! position solve over contacts and distance/pin constraints, then applies a
//! restitution pass.
//!
//! ```
//! use rigid2d::{PhysicsWorld, Vec2, WorldConfig};
//!
//! let mut world = PhysicsWorld::new(WorldConfig::default().with_ground(0.0)).unwrap();
//! let ball = world.create_body(Vec2::new(0.0, 5.0), 1.0).unwrap();
//! world.update(1.0).unwrap();
//! assert!(world.body(ball).unwrap().position.y < 5.0);
//! ```

pub mod collision;
pub mod common;
pub mod constraints;
pub mod error;
pub mod integration;
pub mod math;
pub mod objects;
pub mod shapes;
pub mod world;

// Re-export key types for easier use
pub use collision::{Aabb, CollisionInfo, GroundContact, QuadTree};
pub use common::Material;
pub use constraints::{Constraint, DistanceConstraint, PinConstraint};
pub use error::{PhysicsError, PhysicsResult};
pub use math::vec2::Vec2;
pub use objects::{BodyId, BodySet, RigidBody};
pub use shapes::{Circle, Rect, Shape};
pub use world::{PhysicsWorld, StepReport, WorldConfig};
