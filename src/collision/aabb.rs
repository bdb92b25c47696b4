// Defines an Axis-Aligned Bounding Box

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::math::vec2::Vec2;

/// An Axis-Aligned Bounding Box defined by its center and half-extents.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    pub center: Vec2,
    pub half_width: f64,
    pub half_height: f64,
}

impl Aabb {
    /// Creates a new AABB. Negative half-extents are folded to their absolute value.
    pub fn new(center: Vec2, half_width: f64, half_height: f64) -> Self {
        Aabb {
            center,
            half_width: half_width.abs(),
            half_height: half_height.abs(),
        }
    }

    /// Creates an AABB spanning two corner points, in any order.
    ///
    /// Halves before combining, so corners near `f64::MAX` stay finite.
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        let center = min * 0.5 + max * 0.5;
        Aabb::new(
            center,
            max.x * 0.5 - min.x * 0.5,
            max.y * 0.5 - min.y * 0.5,
        )
    }

    pub fn min_x(&self) -> f64 {
        self.center.x - self.half_width
    }

    pub fn max_x(&self) -> f64 {
        self.center.x + self.half_width
    }

    pub fn min_y(&self) -> f64 {
        self.center.y - self.half_height
    }

    pub fn max_y(&self) -> f64 {
        self.center.y + self.half_height
    }

    /// Checks whether `point` lies inside the box, edges included.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min_x()
            && point.x <= self.max_x()
            && point.y >= self.min_y()
            && point.y <= self.max_y()
    }

    /// Checks if this AABB overlaps with another AABB.
    /// Boxes that only touch along an edge do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        let x_overlap = (self.max_x() - other.min_x()).min(other.max_x() - self.min_x());
        let y_overlap = (self.max_y() - other.min_y()).min(other.max_y() - self.min_y());
        x_overlap > 0.0 && y_overlap > 0.0
    }

    /// Like [`Aabb::intersects`], but boxes sharing an edge or corner count.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min_x() <= other.max_x()
            && other.min_x() <= self.max_x()
            && self.min_y() <= other.max_y()
            && other.min_y() <= self.max_y()
    }

    /// Returns a copy grown by `margin` on every side.
    pub fn expanded(&self, margin: f64) -> Self {
        Aabb::new(self.center, self.half_width + margin, self.half_height + margin)
    }

    /// Returns the smallest AABB containing both boxes.
    pub fn merged(&self, other: &Aabb) -> Self {
        let min = Vec2::new(self.min_x().min(other.min_x()), self.min_y().min(other.min_y()));
        let max = Vec2::new(self.max_x().max(other.max_x()), self.max_y().max(other.max_y()));
        Aabb::from_min_max(min, max)
    }

    /// Clamps `point` into the box.
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.min_x(), self.max_x()),
            point.y.clamp(self.min_y(), self.max_y()),
        )
    }
}
