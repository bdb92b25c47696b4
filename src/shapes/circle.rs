use crate::error::{PhysicsError, PhysicsResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub radius: f64,
}

impl Circle {
    pub fn new(radius: f64) -> PhysicsResult<Self> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(PhysicsError::invalid_shape(format!(
                "circle radius must be finite and non-negative, got {radius}"
            )));
        }
        Ok(Self { radius })
    }

    /// Moment of inertia of a solid disk about its center.
    pub fn inertia(&self, mass: f64) -> f64 {
        0.5 * mass * self.radius * self.radius
    }
}
