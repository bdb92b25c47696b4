use super::check_stiffness;
use crate::error::{PhysicsError, PhysicsResult};
use crate::math::vec2::DIVISION_EPSILON;
use crate::objects::body_set::BodySet;
use crate::objects::rigid_body::BodyId;

/// Keeps the centers of two bodies at a fixed distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceConstraint {
    /// Handle of the first rigid body.
    pub body_a: BodyId,
    /// Handle of the second rigid body.
    pub body_b: BodyId,
    /// The target distance, captured when the constraint is built.
    pub rest_length: f64,
    /// Fraction of the error corrected per solve, in `(0, 1]`.
    pub stiffness: f64,
}

impl DistanceConstraint {
    /// Links `body_a` and `body_b` at their current separation.
    pub fn new(
        bodies: &BodySet,
        body_a: BodyId,
        body_b: BodyId,
        stiffness: f64,
    ) -> PhysicsResult<Self> {
        if body_a == body_b {
            return Err(PhysicsError::SelfConstraint(body_a));
        }
        let a = bodies.get(body_a).ok_or(PhysicsError::BodyNotFound(body_a))?;
        let b = bodies.get(body_b).ok_or(PhysicsError::BodyNotFound(body_b))?;

        Ok(Self {
            body_a,
            body_b,
            rest_length: a.position.distance(b.position),
            stiffness: check_stiffness(stiffness)?,
        })
    }

    /// Overrides the captured rest length.
    pub fn with_rest_length(mut self, rest_length: f64) -> PhysicsResult<Self> {
        if !rest_length.is_finite() || rest_length < 0.0 {
            return Err(PhysicsError::invalid_config(format!(
                "rest length must be finite and non-negative, got {rest_length}"
            )));
        }
        self.rest_length = rest_length;
        Ok(self)
    }

    pub fn is_valid(&self, bodies: &BodySet) -> bool {
        bodies.contains(self.body_a) && bodies.contains(self.body_b)
    }

    /// Solves the constraint by directly adjusting body positions (PBD style).
    ///
    /// The correction is split in proportion to inverse mass, so a static
    /// body never moves and two static bodies are left alone. Coincident
    /// centers with a non-zero rest length have no separation axis and report
    /// [`PhysicsError::DivisionByZero`].
    pub fn solve(&self, bodies: &mut BodySet) -> PhysicsResult<()> {
        let Some((body_a, body_b)) = bodies.pair_mut_by_id(self.body_a, self.body_b) else {
            return Ok(());
        };

        let delta = body_b.position - body_a.position;
        let current_length = delta.magnitude();
        let error = current_length - self.rest_length;

        if error.abs() < DIVISION_EPSILON {
            return Ok(());
        }

        let inv_mass_a = body_a.inverse_mass();
        let inv_mass_b = body_b.inverse_mass();
        let total_inv_mass = inv_mass_a + inv_mass_b;
        if total_inv_mass < DIVISION_EPSILON {
            return Ok(());
        }

        let direction = delta.try_div(current_length)?;

        // Positive error: too far apart, pull A forward and B back.
        let correction = direction * (error * self.stiffness / total_inv_mass);
        body_a.position += correction * inv_mass_a;
        body_b.position -= correction * inv_mass_b;

        Ok(())
    }
}
