use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, PhysicsResult};

/// Denominators below this magnitude are treated as zero.
pub const DIVISION_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const ONE: Vec2 = Vec2 { x: 1.0, y: 1.0 };
    pub const UP: Vec2 = Vec2 { x: 0.0, y: 1.0 };
    pub const DOWN: Vec2 = Vec2 { x: 0.0, y: -1.0 };
    pub const RIGHT: Vec2 = Vec2 { x: 1.0, y: 0.0 };
    pub const LEFT: Vec2 = Vec2 { x: -1.0, y: 0.0 };

    /// Creates a new Vec2.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculates the dot product of two vectors.
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Calculates the squared magnitude (length) of the vector.
    /// Useful for comparisons as it avoids a square root.
    pub fn magnitude_squared(self) -> f64 {
        self.dot(self)
    }

    /// Calculates the magnitude (length) of the vector.
    pub fn magnitude(self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Returns the unit vector pointing the same way.
    ///
    /// Fails with [`PhysicsError::DivisionByZero`] when the length is below
    /// [`DIVISION_EPSILON`].
    pub fn normalize(self) -> PhysicsResult<Self> {
        self.try_div(self.magnitude())
    }

    /// Returns the unit vector, or `fallback` when the vector is degenerate.
    pub fn normalize_or(self, fallback: Self) -> Self {
        self.normalize().unwrap_or(fallback)
    }

    /// In-place [`Vec2::normalize`]. Leaves `self` untouched on failure.
    pub fn normalize_mut(&mut self) -> PhysicsResult<()> {
        *self = self.normalize()?;
        Ok(())
    }

    /// Divides both components by `scalar`.
    pub fn try_div(self, scalar: f64) -> PhysicsResult<Self> {
        if !(scalar.abs() >= DIVISION_EPSILON) {
            return Err(PhysicsError::DivisionByZero { denominator: scalar });
        }
        Ok(Self::new(self.x / scalar, self.y / scalar))
    }

    /// In-place [`Vec2::try_div`].
    pub fn try_div_assign(&mut self, scalar: f64) -> PhysicsResult<()> {
        *self = self.try_div(scalar)?;
        Ok(())
    }

    /// Component-wise product.
    pub fn mul_elementwise(self, other: Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y)
    }

    /// Component-wise quotient. Fails if either component of `other` is near zero.
    pub fn try_div_elementwise(self, other: Self) -> PhysicsResult<Self> {
        for denominator in [other.x, other.y] {
            if !(denominator.abs() >= DIVISION_EPSILON) {
                return Err(PhysicsError::DivisionByZero { denominator });
            }
        }
        Ok(Self::new(self.x / other.x, self.y / other.y))
    }

    /// Calculates the squared distance between two vector points.
    pub fn distance_squared(self, other: Self) -> f64 {
        (self - other).magnitude_squared()
    }

    /// Calculates the distance between two vector points.
    pub fn distance(self, other: Self) -> f64 {
        (self - other).magnitude()
    }

    /// Returns a vector perpendicular to this vector (90-degree counter-clockwise rotation).
    pub fn perpendicular(self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// Rotates the vector by a given angle (in radians).
    pub fn rotate(self, angle: f64) -> Self {
        let (sin_a, cos_a) = angle.sin_cos();
        Self::new(
            self.x * cos_a - self.y * sin_a,
            self.x * sin_a + self.y * cos_a,
        )
    }

    /// In-place [`Vec2::rotate`].
    pub fn rotate_mut(&mut self, angle: f64) {
        *self = self.rotate(angle);
    }

    /// Computes the 2D cross product (scalar). Equivalent to z-component of 3D cross product.
    pub fn cross(&self, other: Vec2) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Linear interpolation, `t = 0` gives `a` and `t = 1` gives `b`.
    pub fn lerp(a: Self, b: Self, t: f64) -> Self {
        a + (b - a) * t
    }

    /// Component by index: 0 is `x`, 1 is `y`.
    pub fn component(&self, index: usize) -> PhysicsResult<f64> {
        match index {
            0 => Ok(self.x),
            1 => Ok(self.y),
            _ => Err(PhysicsError::IndexOutOfRange { index }),
        }
    }

    /// Mutable component by index.
    pub fn component_mut(&mut self, index: usize) -> PhysicsResult<&mut f64> {
        match index {
            0 => Ok(&mut self.x),
            1 => Ok(&mut self.y),
            _ => Err(PhysicsError::IndexOutOfRange { index }),
        }
    }

    /// True when both components are finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

// Vec2 * f64
impl Mul<f64> for Vec2 {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

// f64 * Vec2
impl Mul<Vec2> for f64 {
    type Output = Vec2;

    fn mul(self, vec: Vec2) -> Vec2 {
        vec * self
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl MulAssign<f64> for Vec2 {
    fn mul_assign(&mut self, rhs: f64) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

// No `Div` impl: division goes through `try_div` so a zero denominator
// surfaces as an error instead of an infinity.

impl Neg for Vec2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}
