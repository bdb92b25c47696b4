use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::collision::Aabb;
use crate::common::Material;
use crate::error::{PhysicsError, PhysicsResult};
use crate::integration::integrator;
use crate::math::vec2::Vec2;
use crate::shapes::{Circle, Rect, Shape};

/// Stable identifier of a body inside a [`PhysicsWorld`](crate::world::PhysicsWorld).
///
/// Ids are handed out in increasing order and never reused within a world's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyId(pub u64);

impl BodyId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Body({})", self.0)
    }
}

/// Mass given to a body that is switched from static back to dynamic
/// without ever having had a positive mass.
const DEFAULT_DYNAMIC_MASS: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    id: BodyId,

    // Geometry
    shape: Shape,
    pub material: Material,

    // Linear state
    pub position: Vec2,
    pub velocity: Vec2,
    /// Acceleration computed by the last integration.
    pub acceleration: Vec2,

    // Angular state
    pub angle: f64, // Radians
    pub angular_velocity: f64,
    pub angular_acceleration: f64,

    // Mass properties. `mass == 0 <=> is_static <=> inv_mass == 0`.
    mass: f64,
    inv_mass: f64,
    inertia: f64,
    inv_inertia: f64,
    last_dynamic_mass: f64,

    // Flags
    is_static: bool,
    is_active: bool,
    is_sleeping: bool,

    // Accumulators for forces/torques applied during a time step
    force: Vec2,
    torque: f64,
}

impl RigidBody {
    /// Creates a unit circle at `position`.
    /// A mass that is not strictly positive (or not finite) yields a static body.
    pub fn new(position: Vec2, mass: f64) -> Self {
        let mut body = Self {
            id: BodyId::default(),
            shape: Shape::default(),
            material: Material::default(),
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            angle: 0.0,
            angular_velocity: 0.0,
            angular_acceleration: 0.0,
            mass: 0.0,
            inv_mass: 0.0,
            inertia: 0.0,
            inv_inertia: 0.0,
            last_dynamic_mass: DEFAULT_DYNAMIC_MASS,
            is_static: false,
            is_active: true,
            is_sleeping: false,
            force: Vec2::ZERO,
            torque: 0.0,
        };
        if mass.is_finite() && mass > 0.0 {
            body.make_dynamic(mass);
        } else {
            body.make_static();
        }
        body
    }

    /// Creates a static (immovable) unit circle at `position`.
    pub fn new_static(position: Vec2) -> Self {
        Self::new(position, 0.0)
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: BodyId) {
        self.id = id;
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Radius when the body is a circle.
    pub fn radius(&self) -> Option<f64> {
        match self.shape {
            Shape::Circle(circle) => Some(circle.radius),
            Shape::Rect(_) => None,
        }
    }

    /// `(width, height)` when the body is a box.
    pub fn box_extents(&self) -> Option<(f64, f64)> {
        match self.shape {
            Shape::Rect(rect) => Some((rect.width, rect.height)),
            Shape::Circle(_) => None,
        }
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn inverse_mass(&self) -> f64 {
        self.inv_mass
    }

    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    pub fn inverse_inertia(&self) -> f64 {
        self.inv_inertia
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_sleeping(&self) -> bool {
        self.is_sleeping
    }

    /// Force accumulated since the last [`RigidBody::clear_forces`].
    pub fn force(&self) -> Vec2 {
        self.force
    }

    /// Torque accumulated since the last [`RigidBody::clear_forces`].
    pub fn torque(&self) -> f64 {
        self.torque
    }

    /// Sets the mass. A mass `<= 0` turns the body static.
    pub fn set_mass(&mut self, mass: f64) -> PhysicsResult<()> {
        if !mass.is_finite() {
            return Err(PhysicsError::InvalidMass(mass));
        }
        if mass <= 0.0 {
            self.make_static();
        } else {
            self.make_dynamic(mass);
        }
        Ok(())
    }

    /// Turns the body into a circle of the given radius.
    pub fn set_radius(&mut self, radius: f64) -> PhysicsResult<()> {
        self.shape = Shape::Circle(Circle::new(radius)?);
        self.update_inertia();
        Ok(())
    }

    /// Turns the body into an axis-aligned box of the given size.
    pub fn set_box_extents(&mut self, width: f64, height: f64) -> PhysicsResult<()> {
        self.shape = Shape::Rect(Rect::new(width, height)?);
        self.update_inertia();
        Ok(())
    }

    /// Overrides the shape-derived inertia. Ignored on static bodies.
    /// The next mass or shape change recomputes it from the shape again.
    pub fn set_inertia(&mut self, inertia: f64) {
        if self.is_static || !(inertia > 0.0) || !inertia.is_finite() {
            self.inertia = 0.0;
            self.inv_inertia = 0.0;
        } else {
            self.inertia = inertia;
            self.inv_inertia = 1.0 / inertia;
        }
    }

    /// Marks the body static (immovable) or dynamic again.
    ///
    /// Turning a body static zeroes its mass and velocities. Turning it back
    /// restores the last positive mass it had.
    pub fn set_static(&mut self, is_static: bool) {
        if is_static {
            self.make_static();
        } else if self.is_static {
            self.make_dynamic(self.last_dynamic_mass);
        }
    }

    pub fn set_active(&mut self, is_active: bool) {
        self.is_active = is_active;
    }

    /// A sleeping body is exempt from gravity until a force wakes it.
    pub fn set_sleeping(&mut self, is_sleeping: bool) {
        self.is_sleeping = is_sleeping;
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        if !self.is_static {
            self.velocity = velocity;
        }
    }

    pub fn set_angular_velocity(&mut self, angular_velocity: f64) {
        if !self.is_static {
            self.angular_velocity = angular_velocity;
        }
    }

    /// Applies a force at the center of mass.
    pub fn apply_force(&mut self, force: Vec2) {
        if self.is_static {
            return;
        }
        self.is_sleeping = false;
        self.force += force;
    }

    /// Applies a force at a specific point (in world coordinates).
    /// This generates both linear force and torque.
    pub fn apply_force_at_point(&mut self, force: Vec2, point_world: Vec2) {
        if self.is_static {
            return;
        }
        self.apply_force(force);
        self.torque += (point_world - self.position).cross(force);
    }

    pub fn apply_torque(&mut self, torque: f64) {
        if self.is_static {
            return;
        }
        self.is_sleeping = false;
        self.torque += torque;
    }

    /// Applies an instantaneous change of momentum at the center of mass.
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        if self.is_static {
            return;
        }
        self.is_sleeping = false;
        self.velocity += impulse * self.inv_mass;
    }

    /// Applies an impulse at a world point, changing linear and angular velocity.
    pub fn apply_impulse_at_point(&mut self, impulse: Vec2, point_world: Vec2) {
        if self.is_static {
            return;
        }
        self.apply_impulse(impulse);
        self.angular_velocity += (point_world - self.position).cross(impulse) * self.inv_inertia;
    }

    /// Velocity of a world-space point rigidly attached to the body.
    pub fn point_velocity(&self, point_world: Vec2) -> Vec2 {
        let r = point_world - self.position;
        self.velocity + r.perpendicular() * self.angular_velocity
    }

    /// Advances the body by `dt`. Static and inactive bodies are left untouched.
    pub fn integrate(&mut self, dt: f64) {
        integrator::integrate(self, dt);
    }

    /// Resets the force and torque accumulators.
    pub fn clear_forces(&mut self) {
        self.force = Vec2::ZERO;
        self.torque = 0.0;
    }

    /// World-space bounding box derived from the shape.
    pub fn aabb(&self) -> Aabb {
        let half = self.shape.half_extents();
        Aabb::new(self.position, half.x, half.y)
    }

    /// Point-in-shape test, edges included.
    pub fn contains_point(&self, point: Vec2) -> bool {
        match self.shape {
            Shape::Circle(circle) => {
                self.position.distance_squared(point) <= circle.radius * circle.radius
            }
            Shape::Rect(_) => self.aabb().contains(point),
        }
    }

    fn make_static(&mut self) {
        self.is_static = true;
        self.mass = 0.0;
        self.inv_mass = 0.0;
        self.velocity = Vec2::ZERO;
        self.angular_velocity = 0.0;
        self.update_inertia();
    }

    fn make_dynamic(&mut self, mass: f64) {
        self.is_static = false;
        self.mass = mass;
        self.inv_mass = 1.0 / mass;
        self.last_dynamic_mass = mass;
        self.update_inertia();
    }

    fn update_inertia(&mut self) {
        let inertia = if self.is_static {
            0.0
        } else {
            self.shape.inertia(self.mass)
        };
        self.set_inertia(inertia);
    }
}
