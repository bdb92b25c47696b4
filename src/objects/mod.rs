pub mod body_set;
pub mod rigid_body;

pub use body_set::BodySet;
pub use rigid_body::{BodyId, RigidBody};
