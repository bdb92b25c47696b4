pub mod integrator;

pub use integrator::{integrate, wrap_angle};
