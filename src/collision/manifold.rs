use crate::math::vec2::Vec2;
use crate::objects::rigid_body::BodyId;

/// Stores information about a collision between two bodies.
///
/// Only produced for overlapping pairs; recomputed every step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInfo {
    /// The first body involved in the collision.
    pub body_a: BodyId,
    /// The second body involved in the collision.
    pub body_b: BodyId,
    /// Unit collision normal, pointing from body A towards body B.
    pub normal: Vec2,
    /// The amount of overlap along `normal`, never negative.
    pub penetration: f64,
}

impl CollisionInfo {
    /// The same contact seen from body B.
    pub fn flipped(self) -> Self {
        Self {
            body_a: self.body_b,
            body_b: self.body_a,
            normal: -self.normal,
            penetration: self.penetration,
        }
    }
}

/// Contact between a body and the horizontal ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundContact {
    pub body: BodyId,
    /// Always points up, out of the ground.
    pub normal: Vec2,
    pub penetration: f64,
}
