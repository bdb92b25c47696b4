use crate::error::{PhysicsError, PhysicsResult};

/// An axis-aligned box centered on the body position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(width: f64, height: f64) -> PhysicsResult<Self> {
        for (name, value) in [("width", width), ("height", height)] {
            if !value.is_finite() || value < 0.0 {
                return Err(PhysicsError::invalid_shape(format!(
                    "box {name} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(Self { width, height })
    }

    pub fn half_width(&self) -> f64 {
        self.width * 0.5
    }

    pub fn half_height(&self) -> f64 {
        self.height * 0.5
    }

    /// Moment of inertia of a solid rectangle about its center.
    pub fn inertia(&self, mass: f64) -> f64 {
        mass / 12.0 * (self.width * self.width + self.height * self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_new() {
        let r = Rect::new(2.0, 4.0).unwrap();
        assert_eq!(r.half_width(), 1.0);
        assert_eq!(r.half_height(), 2.0);
        // 12 / 12 * (4 + 16)
        assert_eq!(r.inertia(12.0), 20.0);
    }

    #[test]
    fn test_rect_rejects_bad_extents() {
        assert!(Rect::new(-1.0, 1.0).is_err());
        assert!(Rect::new(1.0, f64::INFINITY).is_err());
    }
}
