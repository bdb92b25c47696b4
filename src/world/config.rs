//! Tunable parameters of a [`PhysicsWorld`](super::PhysicsWorld).
//!
//! # Example
//!
//! ```
//! use rigid2d::{Vec2, WorldConfig};
//!
//! let config = WorldConfig::default()
//!     .with_gravity(Vec2::new(0.0, -20.0))
//!     .with_solver_iterations(8)
//!     .with_ground(0.0);
//! assert!(config.validate().is_ok());
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::collision::aabb::Aabb;
use crate::error::{PhysicsError, PhysicsResult};
use crate::math::vec2::Vec2;

/// Configuration for a simulation world.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldConfig {
    /// Acceleration applied to every dynamic body.
    pub gravity: Vec2,

    /// Length of one simulation step in seconds.
    pub fixed_timestep: f64,

    /// Collision/constraint solver passes per step.
    pub solver_iterations: usize,

    /// Initial root region of the broad-phase. It is grown every step to
    /// enclose all active bodies.
    pub world_bounds: Aabb,

    /// Bodies a broad-phase leaf holds before it subdivides.
    pub quadtree_capacity: usize,

    /// Depth at which broad-phase leaves stop subdividing.
    pub quadtree_max_depth: usize,

    /// Extra padding around each body's broad-phase query region.
    pub query_margin: f64,

    /// Fraction of the penetration resolved per solver iteration.
    pub correction_percent: f64,

    /// Penetration tolerated without correction.
    pub correction_slop: f64,

    /// Most fixed steps a single `update` call may run. Time beyond that is
    /// dropped.
    pub max_substeps: usize,

    /// Height of an optional horizontal ground plane.
    pub ground_y: Option<f64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.8),
            fixed_timestep: 1.0 / 60.0,
            solver_iterations: 5,
            world_bounds: Aabb::new(Vec2::ZERO, 1000.0, 1000.0),
            quadtree_capacity: 4,
            quadtree_max_depth: 8,
            query_margin: 0.1,
            correction_percent: 0.8,
            correction_slop: 0.01,
            max_substeps: 240,
            ground_y: None,
        }
    }
}

impl WorldConfig {
    /// Zero gravity, otherwise default.
    #[must_use]
    pub fn zero_gravity() -> Self {
        Self::default().with_gravity(Vec2::ZERO)
    }

    #[must_use]
    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    #[must_use]
    pub fn with_fixed_timestep(mut self, fixed_timestep: f64) -> Self {
        self.fixed_timestep = fixed_timestep;
        self
    }

    #[must_use]
    pub fn with_solver_iterations(mut self, solver_iterations: usize) -> Self {
        self.solver_iterations = solver_iterations;
        self
    }

    #[must_use]
    pub fn with_world_bounds(mut self, world_bounds: Aabb) -> Self {
        self.world_bounds = world_bounds;
        self
    }

    #[must_use]
    pub fn with_quadtree(mut self, capacity: usize, max_depth: usize) -> Self {
        self.quadtree_capacity = capacity;
        self.quadtree_max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_query_margin(mut self, query_margin: f64) -> Self {
        self.query_margin = query_margin;
        self
    }

    #[must_use]
    pub fn with_correction(mut self, percent: f64, slop: f64) -> Self {
        self.correction_percent = percent;
        self.correction_slop = slop;
        self
    }

    #[must_use]
    pub fn with_max_substeps(mut self, max_substeps: usize) -> Self {
        self.max_substeps = max_substeps;
        self
    }

    #[must_use]
    pub fn with_ground(mut self, ground_y: f64) -> Self {
        self.ground_y = Some(ground_y);
        self
    }

    /// Checks every field, reporting the first one that is out of range.
    pub fn validate(&self) -> PhysicsResult<()> {
        if !self.gravity.is_finite() {
            return Err(PhysicsError::invalid_config("gravity must be finite"));
        }
        check_timestep(self.fixed_timestep)?;
        if self.solver_iterations == 0 {
            return Err(PhysicsError::invalid_config(
                "solver_iterations must be at least 1",
            ));
        }
        let bounds = &self.world_bounds;
        if !bounds.center.is_finite()
            || !(bounds.half_width > 0.0 && bounds.half_width.is_finite())
            || !(bounds.half_height > 0.0 && bounds.half_height.is_finite())
        {
            return Err(PhysicsError::invalid_config(
                "world_bounds must be finite with positive extents",
            ));
        }
        if self.quadtree_capacity == 0 {
            return Err(PhysicsError::invalid_config(
                "quadtree_capacity must be at least 1",
            ));
        }
        if !(self.query_margin >= 0.0 && self.query_margin.is_finite()) {
            return Err(PhysicsError::invalid_config(
                "query_margin must be finite and non-negative",
            ));
        }
        if !(self.correction_percent > 0.0 && self.correction_percent <= 1.0) {
            return Err(PhysicsError::invalid_config(
                "correction_percent must be in (0, 1]",
            ));
        }
        if !(self.correction_slop >= 0.0 && self.correction_slop.is_finite()) {
            return Err(PhysicsError::invalid_config(
                "correction_slop must be finite and non-negative",
            ));
        }
        if self.max_substeps == 0 {
            return Err(PhysicsError::invalid_config("max_substeps must be at least 1"));
        }
        if let Some(ground_y) = self.ground_y {
            if !ground_y.is_finite() {
                return Err(PhysicsError::invalid_config("ground_y must be finite"));
            }
        }
        Ok(())
    }
}

/// A fixed timestep must be finite and strictly positive.
pub(crate) fn check_timestep(dt: f64) -> PhysicsResult<f64> {
    if dt.is_finite() && dt > 0.0 {
        Ok(dt)
    } else {
        Err(PhysicsError::InvalidTimestep(dt))
    }
}
