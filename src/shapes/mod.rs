pub mod circle;
pub mod rect;

pub use circle::Circle;
pub use rect::Rect;

use crate::math::vec2::Vec2;

/// Enum representing the geometric shape of a rigid body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle(Circle),
    /// Axis-aligned box.
    Rect(Rect),
}

impl Shape {
    /// Half-extents of the shape's bounding box.
    pub fn half_extents(&self) -> Vec2 {
        match self {
            Shape::Circle(circle) => Vec2::new(circle.radius, circle.radius),
            Shape::Rect(rect) => Vec2::new(rect.half_width(), rect.half_height()),
        }
    }

    /// Moment of inertia for the given mass.
    pub fn inertia(&self, mass: f64) -> f64 {
        match self {
            Shape::Circle(circle) => circle.inertia(mass),
            Shape::Rect(rect) => rect.inertia(mass),
        }
    }
}

impl Default for Shape {
    fn default() -> Self {
        Shape::Circle(Circle { radius: 1.0 })
    }
}
