use super::check_stiffness;
use crate::error::{PhysicsError, PhysicsResult};
use crate::math::vec2::{Vec2, DIVISION_EPSILON};
use crate::objects::body_set::BodySet;
use crate::objects::rigid_body::BodyId;

/// Keeps a body at a fixed distance from a point in world space.
///
/// Only the body is corrected, scaled by its inverse mass and the
/// stiffness, so heavier bodies yield less and a static body never moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinConstraint {
    pub body: BodyId,
    /// Fixed world-space point.
    pub pin: Vec2,
    /// Distance from the pin, captured when the constraint is built.
    pub rest_length: f64,
    pub stiffness: f64,
}

impl PinConstraint {
    pub fn new(bodies: &BodySet, body: BodyId, pin: Vec2, stiffness: f64) -> PhysicsResult<Self> {
        let pinned = bodies.get(body).ok_or(PhysicsError::BodyNotFound(body))?;
        Ok(Self {
            body,
            pin,
            rest_length: pinned.position.distance(pin),
            stiffness: check_stiffness(stiffness)?,
        })
    }

    pub fn is_valid(&self, bodies: &BodySet) -> bool {
        bodies.contains(self.body)
    }

    /// Pulls the body along the line to the pin until it sits at the rest
    /// length. A body sitting exactly on the pin has no direction to move in
    /// and is left alone.
    pub fn solve(&self, bodies: &mut BodySet) -> PhysicsResult<()> {
        let Some(body) = bodies.get_mut(self.body) else {
            return Ok(());
        };

        let inv_mass = body.inverse_mass();
        if inv_mass < DIVISION_EPSILON {
            return Ok(());
        }

        let delta = self.pin - body.position;
        let current_length = delta.magnitude();
        let error = current_length - self.rest_length;

        if error.abs() < DIVISION_EPSILON || current_length < DIVISION_EPSILON {
            return Ok(());
        }

        let direction = delta.try_div(current_length)?;
        body.position += direction * (error * self.stiffness * inv_mass);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::rigid_body::RigidBody;
    use approx::assert_abs_diff_eq;
    const EPSILON: f64 = 1e-9;

    fn pinned_body(mass: f64) -> (BodySet, BodyId) {
        let mut bodies = BodySet::new();
        let id = bodies.insert(RigidBody::new(Vec2::new(0.0, -2.0), mass));
        (bodies, id)
    }

    #[test]
    fn test_pin_constraint_new() {
        let (bodies, id) = pinned_body(1.0);
        let pin = PinConstraint::new(&bodies, id, Vec2::ZERO, 1.0).unwrap();
        assert_eq!(pin.body, id);
        assert_eq!(pin.pin, Vec2::ZERO);
        assert_eq!(pin.rest_length, 2.0);
        assert!(pin.is_valid(&bodies));

        assert_eq!(
            PinConstraint::new(&bodies, BodyId::new(9), Vec2::ZERO, 1.0),
            Err(PhysicsError::BodyNotFound(BodyId::new(9)))
        );
        assert!(PinConstraint::new(&bodies, id, Vec2::ZERO, -0.5).is_err());
    }

    #[test]
    fn test_solve_pulls_back_to_rest_length() {
        let (mut bodies, id) = pinned_body(1.0);
        let pin = PinConstraint::new(&bodies, id, Vec2::ZERO, 1.0).unwrap();
        bodies.get_mut(id).unwrap().position = Vec2::new(0.0, -3.0);

        pin.solve(&mut bodies).unwrap();

        let position = bodies.get(id).unwrap().position;
        assert_abs_diff_eq!(position.x, 0.0, epsilon = EPSILON);
        assert_abs_diff_eq!(position.y, -2.0, epsilon = EPSILON);
    }

    #[test]
    fn test_solve_pushes_out_when_too_close() {
        let (mut bodies, id) = pinned_body(5.0);
        let pin = PinConstraint::new(&bodies, id, Vec2::ZERO, 0.5).unwrap();
        bodies.get_mut(id).unwrap().position = Vec2::new(1.0, 0.0);

        pin.solve(&mut bodies).unwrap();

        // Error -1, scaled by stiffness 0.5 and inverse mass 0.2.
        assert_abs_diff_eq!(bodies.get(id).unwrap().position.x, 1.1, epsilon = EPSILON);
    }

    #[test]
    fn test_solve_scales_by_inverse_mass() {
        for (mass, expected_y) in [(5.0, -2.8), (0.5, -1.0)] {
            let (mut bodies, id) = pinned_body(mass);
            let pin = PinConstraint::new(&bodies, id, Vec2::ZERO, 1.0).unwrap();
            bodies.get_mut(id).unwrap().position = Vec2::new(0.0, -3.0);

            pin.solve(&mut bodies).unwrap();

            // Error 1 toward the pin: mass 5 moves 0.2, mass 0.5 moves 2.
            let position = bodies.get(id).unwrap().position;
            assert_abs_diff_eq!(position.x, 0.0, epsilon = EPSILON);
            assert_abs_diff_eq!(position.y, expected_y, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_solve_static_body_stays() {
        let (mut bodies, id) = pinned_body(0.0);
        let pin = PinConstraint::new(&bodies, id, Vec2::new(0.0, 4.0), 1.0).unwrap();
        bodies.get_mut(id).unwrap().position = Vec2::new(0.0, -10.0);

        pin.solve(&mut bodies).unwrap();

        assert_eq!(bodies.get(id).unwrap().position, Vec2::new(0.0, -10.0));
    }

    #[test]
    fn test_solve_body_on_pin_is_left_alone() {
        let (mut bodies, id) = pinned_body(1.0);
        let pin = PinConstraint::new(&bodies, id, Vec2::ZERO, 1.0).unwrap();
        bodies.get_mut(id).unwrap().position = Vec2::ZERO;

        assert_eq!(pin.solve(&mut bodies), Ok(()));
        assert_eq!(bodies.get(id).unwrap().position, Vec2::ZERO);
    }

    #[test]
    fn test_solve_removed_body_is_noop() {
        let (mut bodies, id) = pinned_body(1.0);
        let pin = PinConstraint::new(&bodies, id, Vec2::ZERO, 1.0).unwrap();
        bodies.remove(id);

        assert!(!pin.is_valid(&bodies));
        assert_eq!(pin.solve(&mut bodies), Ok(()));
    }
}
