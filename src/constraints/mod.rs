use crate::error::PhysicsResult;
use crate::math::vec2::Vec2;
use crate::objects::body_set::BodySet;
use crate::objects::rigid_body::BodyId;

pub mod distance_constraint;
pub mod pin_constraint;

// Re-export the constraint types for easier access
pub use distance_constraint::DistanceConstraint;
pub use pin_constraint::PinConstraint;

/// A position constraint owned by the world and solved once per solver
/// iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    Distance(DistanceConstraint),
    Pin(PinConstraint),
}

impl Constraint {
    /// Moves the referenced bodies towards satisfying the constraint.
    ///
    /// A constraint whose bodies are gone is a no-op and returns `Ok`.
    /// Numeric failures are returned so the caller can skip the constraint
    /// for this iteration.
    pub fn solve(&self, bodies: &mut BodySet) -> PhysicsResult<()> {
        match self {
            Constraint::Distance(c) => c.solve(bodies),
            Constraint::Pin(c) => c.solve(bodies),
        }
    }

    /// Whether every referenced body still exists in `bodies`.
    pub fn is_valid(&self, bodies: &BodySet) -> bool {
        match self {
            Constraint::Distance(c) => c.is_valid(bodies),
            Constraint::Pin(c) => c.is_valid(bodies),
        }
    }

    pub fn body_a(&self) -> BodyId {
        match self {
            Constraint::Distance(c) => c.body_a,
            Constraint::Pin(c) => c.body,
        }
    }

    /// The second body, `None` for a pin.
    pub fn body_b(&self) -> Option<BodyId> {
        match self {
            Constraint::Distance(c) => Some(c.body_b),
            Constraint::Pin(_) => None,
        }
    }

    /// The fixed world point, `None` for a distance constraint.
    pub fn pin_point(&self) -> Option<Vec2> {
        match self {
            Constraint::Distance(_) => None,
            Constraint::Pin(c) => Some(c.pin),
        }
    }

    pub fn rest_length(&self) -> f64 {
        match self {
            Constraint::Distance(c) => c.rest_length,
            Constraint::Pin(c) => c.rest_length,
        }
    }

    pub fn stiffness(&self) -> f64 {
        match self {
            Constraint::Distance(c) => c.stiffness,
            Constraint::Pin(c) => c.stiffness,
        }
    }

    /// Current world-space endpoints, for drawing.
    /// `None` if a referenced body is gone.
    pub fn endpoints(&self, bodies: &BodySet) -> Option<(Vec2, Vec2)> {
        match self {
            Constraint::Distance(c) => {
                Some((bodies.get(c.body_a)?.position, bodies.get(c.body_b)?.position))
            }
            Constraint::Pin(c) => Some((bodies.get(c.body)?.position, c.pin)),
        }
    }
}

impl From<DistanceConstraint> for Constraint {
    fn from(constraint: DistanceConstraint) -> Self {
        Constraint::Distance(constraint)
    }
}

impl From<PinConstraint> for Constraint {
    fn from(constraint: PinConstraint) -> Self {
        Constraint::Pin(constraint)
    }
}

/// Rejects stiffness outside `(0, 1]`.
pub(crate) fn check_stiffness(stiffness: f64) -> PhysicsResult<f64> {
    if stiffness > 0.0 && stiffness <= 1.0 {
        Ok(stiffness)
    } else {
        Err(crate::error::PhysicsError::InvalidStiffness(stiffness))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PhysicsError;
    use crate::objects::rigid_body::RigidBody;

    #[test]
    fn test_accessors_by_kind() {
        let mut bodies = BodySet::new();
        let a = bodies.insert(RigidBody::new(Vec2::ZERO, 1.0));
        let b = bodies.insert(RigidBody::new(Vec2::new(3.0, 4.0), 1.0));

        let distance: Constraint = DistanceConstraint::new(&bodies, a, b, 0.5).unwrap().into();
        assert_eq!(distance.body_a(), a);
        assert_eq!(distance.body_b(), Some(b));
        assert_eq!(distance.pin_point(), None);
        assert_eq!(distance.rest_length(), 5.0);
        assert_eq!(distance.stiffness(), 0.5);
        assert_eq!(
            distance.endpoints(&bodies),
            Some((Vec2::ZERO, Vec2::new(3.0, 4.0)))
        );

        let pin: Constraint = PinConstraint::new(&bodies, b, Vec2::new(3.0, 0.0), 1.0)
            .unwrap()
            .into();
        assert_eq!(pin.body_a(), b);
        assert_eq!(pin.body_b(), None);
        assert_eq!(pin.pin_point(), Some(Vec2::new(3.0, 0.0)));
        assert_eq!(pin.rest_length(), 4.0);
    }

    #[test]
    fn test_missing_body_is_noop() {
        let mut bodies = BodySet::new();
        let a = bodies.insert(RigidBody::new(Vec2::ZERO, 1.0));
        let b = bodies.insert(RigidBody::new(Vec2::new(5.0, 0.0), 1.0));
        let constraint: Constraint = DistanceConstraint::new(&bodies, a, b, 1.0).unwrap().into();
        assert!(constraint.is_valid(&bodies));

        bodies.remove(b);
        bodies.get_mut(a).unwrap().position = Vec2::new(-2.0, 0.0);

        assert!(!constraint.is_valid(&bodies));
        assert_eq!(constraint.solve(&mut bodies), Ok(()));
        assert_eq!(bodies.get(a).unwrap().position, Vec2::new(-2.0, 0.0));
        assert_eq!(constraint.endpoints(&bodies), None);
    }

    #[test]
    fn test_check_stiffness() {
        assert_eq!(check_stiffness(1.0), Ok(1.0));
        assert_eq!(check_stiffness(0.3), Ok(0.3));
        assert_eq!(check_stiffness(0.0), Err(PhysicsError::InvalidStiffness(0.0)));
        assert_eq!(check_stiffness(1.5), Err(PhysicsError::InvalidStiffness(1.5)));
        assert!(check_stiffness(f64::NAN).is_err());
    }
}
