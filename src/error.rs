//! Error types for simulation operations.

use thiserror::Error;

use crate::objects::rigid_body::BodyId;

/// Errors that can occur while building or stepping a world.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PhysicsError {
    /// A division or normalization hit a near-zero denominator.
    #[error("division by zero (denominator {denominator})")]
    DivisionByZero {
        /// The offending denominator.
        denominator: f64,
    },

    /// Component access on a `Vec2` outside `0..=1`.
    #[error("vector component index {index} is out of range")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
    },

    /// Timestep or frame delta was negative, zero (where not allowed) or not finite.
    #[error("invalid timestep: {0}")]
    InvalidTimestep(f64),

    /// Mass was not a finite number.
    #[error("invalid mass: {0}")]
    InvalidMass(f64),

    /// Shape extents were negative or not finite.
    #[error("invalid shape: {reason}")]
    InvalidShape {
        /// Why the shape was rejected.
        reason: String,
    },

    /// Constraint stiffness outside `(0, 1]`.
    #[error("invalid stiffness: {0} (must be in (0, 1])")]
    InvalidStiffness(f64),

    /// A constraint was asked to connect a body to itself.
    #[error("constraint connects {0} to itself")]
    SelfConstraint(BodyId),

    /// A body handle that is not (or no longer) in the world.
    #[error("body not found: {0}")]
    BodyNotFound(BodyId),

    /// A world configuration value was rejected.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error.
        reason: String,
    },
}

impl PhysicsError {
    /// Create an invalid shape error.
    pub fn invalid_shape(reason: impl Into<String>) -> Self {
        Self::InvalidShape {
            reason: reason.into(),
        }
    }

    /// Create an invalid config error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

/// Result type alias for physics operations.
pub type PhysicsResult<T> = Result<T, PhysicsError>;
