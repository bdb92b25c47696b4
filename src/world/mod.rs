pub mod config;
pub mod physics_world;

pub use config::WorldConfig;
pub use physics_world::{PhysicsWorld, StepReport};
