use crate::objects::rigid_body::RigidBody;

/// Integrates the rigid body's state forward in time using Semi-Implicit Euler.
///
/// Consumes but does not clear the force/torque accumulators; the world clears
/// them once per step after every phase that reads them has run.
pub fn integrate(body: &mut RigidBody, dt: f64) {
    if body.is_static() || !body.is_active() {
        return;
    }

    // a = F * inv_m, v += a*dt, p += v*dt
    body.acceleration = body.force() * body.inverse_mass();
    body.velocity += body.acceleration * dt;
    body.position += body.velocity * dt;

    // alpha = T * inv_I, omega += alpha*dt, theta += omega*dt
    body.angular_acceleration = body.torque() * body.inverse_inertia();
    body.angular_velocity += body.angular_acceleration * dt;
    body.angle = wrap_angle(body.angle + body.angular_velocity * dt);
}

/// Wraps an angle in radians to the range [-PI, PI].
pub fn wrap_angle(angle: f64) -> f64 {
    angle.sin().atan2(angle.cos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec2::Vec2;
    use std::f64::consts::PI;
    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_integrate_linear_motion_no_force() {
        let mut rb = RigidBody::new(Vec2::ZERO, 1.0);
        rb.velocity = Vec2::new(10.0, -5.0);

        integrate(&mut rb, 0.1);

        assert!((rb.position.x - 1.0).abs() < EPSILON);
        assert!((rb.position.y - -0.5).abs() < EPSILON);
        assert_eq!(rb.velocity, Vec2::new(10.0, -5.0));
    }

    #[test]
    fn test_integrate_linear_motion_constant_force() {
        let mut rb = RigidBody::new(Vec2::ZERO, 2.0);
        rb.apply_force(Vec2::new(10.0, 0.0)); // a = (5, 0)

        integrate(&mut rb, 0.1);

        // v = (5,0)*0.1, p = v*0.1
        assert!((rb.velocity.x - 0.5).abs() < EPSILON);
        assert!((rb.position.x - 0.05).abs() < EPSILON);
        assert_eq!(rb.acceleration, Vec2::new(5.0, 0.0));
        // The accumulator is left for the caller to clear.
        assert_eq!(rb.force(), Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_integrate_angular_motion_constant_torque() {
        let mut rb = RigidBody::new(Vec2::ZERO, 1.0);
        rb.apply_torque(5.0);
        let expected_alpha = 5.0 / rb.inertia();
        let dt = 0.1;

        integrate(&mut rb, dt);

        assert!((rb.angular_velocity - expected_alpha * dt).abs() < EPSILON);
        assert!((rb.angle - expected_alpha * dt * dt).abs() < EPSILON);
    }

    #[test]
    fn test_integrate_static_object() {
        let mut rb = RigidBody::new_static(Vec2::new(1.0, 1.0));
        rb.angle = 1.0;
        let initial_state = rb.clone();

        integrate(&mut rb, 0.1);

        assert_eq!(rb, initial_state);
    }

    #[test]
    fn test_integrate_inactive_object() {
        let mut rb = RigidBody::new(Vec2::ZERO, 1.0);
        rb.velocity = Vec2::new(1.0, 0.0);
        rb.set_active(false);

        integrate(&mut rb, 0.1);

        assert_eq!(rb.position, Vec2::ZERO);
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(0.0) - 0.0).abs() < EPSILON);
        assert!((wrap_angle(PI) - PI).abs() < EPSILON);
        assert!((wrap_angle(-PI) - -PI).abs() < EPSILON);
        assert!((wrap_angle(PI + 0.1) - (-PI + 0.1)).abs() < EPSILON);
        assert!((wrap_angle(-PI - 0.1) - (PI - 0.1)).abs() < EPSILON);
        assert!((wrap_angle(2.0 * PI) - 0.0).abs() < EPSILON);
    }
}
