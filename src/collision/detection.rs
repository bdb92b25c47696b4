use super::manifold::{CollisionInfo, GroundContact};
use crate::math::vec2::Vec2;
use crate::objects::rigid_body::RigidBody;
use crate::shapes::Shape;

/// Circles overlapping by less than this are treated as resting, not colliding.
pub const CONTACT_EPSILON: f64 = 1e-3;

/// Checks for collision between two circles.
/// Returns `None` if either body is not a circle or they do not overlap.
pub fn circle_vs_circle(body_a: &RigidBody, body_b: &RigidBody) -> Option<CollisionInfo> {
    let (Shape::Circle(circle_a), Shape::Circle(circle_b)) = (body_a.shape(), body_b.shape())
    else {
        return None;
    };

    let delta = body_b.position - body_a.position;
    let distance = delta.magnitude();
    let radii_sum = circle_a.radius + circle_b.radius;

    if distance >= radii_sum - CONTACT_EPSILON {
        return None;
    }

    Some(CollisionInfo {
        body_a: body_a.id(),
        body_b: body_b.id(),
        // Concentric circles: any direction separates them, pick up.
        normal: delta.normalize_or(Vec2::UP),
        penetration: radii_sum - distance,
    })
}

/// Checks for collision between two axis-aligned boxes.
///
/// Resolves along the axis of smaller overlap; the normal follows the sign of
/// the center-to-center offset on that axis.
pub fn rect_vs_rect(body_a: &RigidBody, body_b: &RigidBody) -> Option<CollisionInfo> {
    let (Shape::Rect(_), Shape::Rect(_)) = (body_a.shape(), body_b.shape()) else {
        return None;
    };

    let a = body_a.aabb();
    let b = body_b.aabb();
    let overlap_x = (a.max_x() - b.min_x()).min(b.max_x() - a.min_x());
    let overlap_y = (a.max_y() - b.min_y()).min(b.max_y() - a.min_y());

    if overlap_x <= 0.0 || overlap_y <= 0.0 {
        return None;
    }

    let delta = body_b.position - body_a.position;
    let (normal, penetration) = if overlap_x < overlap_y {
        (Vec2::new(axis_sign(delta.x), 0.0), overlap_x)
    } else {
        (Vec2::new(0.0, axis_sign(delta.y)), overlap_y)
    };

    Some(CollisionInfo {
        body_a: body_a.id(),
        body_b: body_b.id(),
        normal,
        penetration,
    })
}

/// Checks for collision between a circle (body A) and a box (body B).
///
/// The normal points from the circle towards the box.
pub fn circle_vs_rect(circle_body: &RigidBody, rect_body: &RigidBody) -> Option<CollisionInfo> {
    let (Shape::Circle(circle), Shape::Rect(_)) = (circle_body.shape(), rect_body.shape()) else {
        return None;
    };

    let bounds = rect_body.aabb();
    let closest = bounds.closest_point(circle_body.position);
    let outward = circle_body.position - closest;
    let distance_sq = outward.magnitude_squared();

    if distance_sq > circle.radius * circle.radius {
        return None;
    }

    let (normal, penetration) = match outward.normalize() {
        Ok(direction) => (-direction, circle.radius - distance_sq.sqrt()),
        Err(_) => {
            // Center on or inside the box: push out through the nearest face.
            let offset = circle_body.position - bounds.center;
            let face_x = bounds.half_width - offset.x.abs();
            let face_y = bounds.half_height - offset.y.abs();
            if face_x < face_y {
                (Vec2::new(-axis_sign(offset.x), 0.0), circle.radius + face_x)
            } else {
                (Vec2::new(0.0, -axis_sign(offset.y)), circle.radius + face_y)
            }
        }
    };

    Some(CollisionInfo {
        body_a: circle_body.id(),
        body_b: rect_body.id(),
        normal,
        penetration,
    })
}

/// Checks a circle against the horizontal line `y = ground_y`.
pub fn circle_vs_ground(body: &RigidBody, ground_y: f64) -> Option<GroundContact> {
    let Shape::Circle(circle) = body.shape() else {
        return None;
    };
    ground_contact_below(body, circle.radius, ground_y)
}

/// Checks a box against the horizontal line `y = ground_y`.
pub fn rect_vs_ground(body: &RigidBody, ground_y: f64) -> Option<GroundContact> {
    let Shape::Rect(rect) = body.shape() else {
        return None;
    };
    ground_contact_below(body, rect.half_height(), ground_y)
}

/// Selects the ground test by shape.
pub fn check_ground(body: &RigidBody, ground_y: f64) -> Option<GroundContact> {
    match body.shape() {
        Shape::Circle(_) => circle_vs_ground(body, ground_y),
        Shape::Rect(_) => rect_vs_ground(body, ground_y),
    }
}

fn ground_contact_below(body: &RigidBody, half_height: f64, ground_y: f64) -> Option<GroundContact> {
    let bottom = body.position.y - half_height;
    if bottom > ground_y {
        return None;
    }
    Some(GroundContact {
        body: body.id(),
        normal: Vec2::UP,
        penetration: ground_y - bottom,
    })
}

/// Selects the narrow-phase test by the pair's shapes.
///
/// Mixed pairs always run [`circle_vs_rect`] with the circle first; the result
/// is flipped back so the normal points from `body_a` to `body_b`.
pub fn check_collision(body_a: &RigidBody, body_b: &RigidBody) -> Option<CollisionInfo> {
    match (body_a.shape(), body_b.shape()) {
        (Shape::Circle(_), Shape::Circle(_)) => circle_vs_circle(body_a, body_b),
        (Shape::Circle(_), Shape::Rect(_)) => circle_vs_rect(body_a, body_b),
        (Shape::Rect(_), Shape::Circle(_)) => {
            circle_vs_rect(body_b, body_a).map(CollisionInfo::flipped)
        }
        (Shape::Rect(_), Shape::Rect(_)) => rect_vs_rect(body_a, body_b),
    }
}

fn axis_sign(value: f64) -> f64 {
    if value < 0.0 {
        -1.0
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::rigid_body::BodyId;
    use approx::assert_abs_diff_eq;
    const EPSILON: f64 = 1e-9;

    fn circle(id: u64, position: Vec2, radius: f64) -> RigidBody {
        let mut body = RigidBody::new(position, 1.0);
        body.set_id(BodyId::new(id));
        body.set_radius(radius).unwrap();
        body
    }

    fn rect(id: u64, position: Vec2, width: f64, height: f64) -> RigidBody {
        let mut body = RigidBody::new(position, 1.0);
        body.set_id(BodyId::new(id));
        body.set_box_extents(width, height).unwrap();
        body
    }

    #[test]
    fn test_circle_circle_no_collision() {
        let a = circle(0, Vec2::ZERO, 1.0);
        let b = circle(1, Vec2::new(3.0, 0.0), 1.0);
        assert!(circle_vs_circle(&a, &b).is_none());
    }

    #[test]
    fn test_circle_circle_touching() {
        let a = circle(0, Vec2::ZERO, 1.0);
        let b = circle(1, Vec2::new(2.0, 0.0), 1.0);
        assert!(circle_vs_circle(&a, &b).is_none());
        // Micro-overlap below the contact epsilon is ignored as well.
        let c = circle(2, Vec2::new(1.9995, 0.0), 1.0);
        assert!(circle_vs_circle(&a, &c).is_none());
    }

    #[test]
    fn test_circle_circle_colliding() {
        let a = circle(0, Vec2::new(9.0, 0.0), 1.5);
        let b = circle(1, Vec2::new(11.0, 0.0), 1.5);

        let info = circle_vs_circle(&a, &b).unwrap();
        assert_eq!(info.body_a, BodyId::new(0));
        assert_eq!(info.body_b, BodyId::new(1));
        assert_abs_diff_eq!(info.normal.x, 1.0, epsilon = EPSILON);
        assert_abs_diff_eq!(info.normal.y, 0.0, epsilon = EPSILON);
        assert_abs_diff_eq!(info.penetration, 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_circle_circle_symmetric() {
        let a = circle(0, Vec2::new(0.0, 0.0), 1.0);
        let b = circle(1, Vec2::new(0.9, 1.1), 0.8);

        let ab = circle_vs_circle(&a, &b).unwrap();
        let ba = circle_vs_circle(&b, &a).unwrap();
        assert_abs_diff_eq!(ab.penetration, ba.penetration, epsilon = EPSILON);
        assert_abs_diff_eq!(ab.normal.dot(ba.normal), -1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_circle_circle_concentric() {
        let a = circle(0, Vec2::ZERO, 2.0);
        let b = circle(1, Vec2::ZERO, 1.0);

        let info = circle_vs_circle(&a, &b).unwrap();
        assert_abs_diff_eq!(info.penetration, 3.0, epsilon = EPSILON);
        assert_eq!(info.normal, Vec2::UP);
    }

    #[test]
    fn test_rect_rect_minimum_overlap_axis() {
        let a = rect(0, Vec2::ZERO, 1.0, 1.0);
        let b = rect(1, Vec2::new(0.8, 0.5), 1.0, 1.0);

        let info = rect_vs_rect(&a, &b).unwrap();
        assert_eq!(info.normal, Vec2::new(1.0, 0.0));
        assert_abs_diff_eq!(info.penetration, 0.2, epsilon = EPSILON);

        let info = rect_vs_rect(&b, &a).unwrap();
        assert_eq!(info.normal, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_rect_rect_vertical() {
        let a = rect(0, Vec2::ZERO, 4.0, 1.0);
        let b = rect(1, Vec2::new(0.5, -0.9), 1.0, 1.0);

        let info = rect_vs_rect(&a, &b).unwrap();
        assert_eq!(info.normal, Vec2::new(0.0, -1.0));
        assert_abs_diff_eq!(info.penetration, 0.1, epsilon = EPSILON);
    }

    #[test]
    fn test_rect_rect_separated_or_touching() {
        let a = rect(0, Vec2::ZERO, 1.0, 1.0);
        let touching = rect(1, Vec2::new(1.0, 0.0), 1.0, 1.0);
        let far = rect(2, Vec2::new(0.0, 3.0), 1.0, 1.0);
        assert!(rect_vs_rect(&a, &touching).is_none());
        assert!(rect_vs_rect(&a, &far).is_none());
    }

    #[test]
    fn test_circle_rect_edge_contact() {
        // Circle to the right of a unit box, overlapping its right face by 0.2.
        let c = circle(0, Vec2::new(0.8, 0.0), 0.5);
        let r = rect(1, Vec2::ZERO, 1.0, 1.0);

        let info = circle_vs_rect(&c, &r).unwrap();
        assert_eq!(info.body_a, BodyId::new(0));
        assert_abs_diff_eq!(info.normal.x, -1.0, epsilon = EPSILON);
        assert_abs_diff_eq!(info.normal.y, 0.0, epsilon = EPSILON);
        assert_abs_diff_eq!(info.penetration, 0.2, epsilon = EPSILON);
    }

    #[test]
    fn test_circle_rect_corner_contact() {
        let c = circle(0, Vec2::new(0.8, 0.8), 0.5);
        let r = rect(1, Vec2::ZERO, 1.0, 1.0);

        let info = circle_vs_rect(&c, &r).unwrap();
        let expected = -Vec2::new(0.3, 0.3).normalize().unwrap();
        assert_abs_diff_eq!(info.normal.x, expected.x, epsilon = EPSILON);
        assert_abs_diff_eq!(info.normal.y, expected.y, epsilon = EPSILON);
        assert_abs_diff_eq!(info.penetration, 0.5 - 0.18f64.sqrt(), epsilon = EPSILON);
    }

    #[test]
    fn test_circle_rect_no_collision() {
        let c = circle(0, Vec2::new(2.0, 0.0), 0.5);
        let r = rect(1, Vec2::ZERO, 1.0, 1.0);
        assert!(circle_vs_rect(&c, &r).is_none());
    }

    #[test]
    fn test_circle_rect_center_inside() {
        // Center inside the box, nearest to the top face.
        let c = circle(0, Vec2::new(0.1, 0.4), 0.25);
        let r = rect(1, Vec2::ZERO, 2.0, 1.0);

        let info = circle_vs_rect(&c, &r).unwrap();
        assert!(info.normal.is_finite());
        assert_eq!(info.normal, Vec2::new(0.0, -1.0));
        assert_abs_diff_eq!(info.penetration, 0.25 + 0.1, epsilon = EPSILON);
    }

    #[test]
    fn test_dispatch_orients_mixed_pairs() {
        let r = rect(0, Vec2::ZERO, 1.0, 1.0);
        let c = circle(1, Vec2::new(0.8, 0.0), 0.5);

        let info = check_collision(&r, &c).unwrap();
        assert_eq!(info.body_a, BodyId::new(0));
        assert_eq!(info.body_b, BodyId::new(1));
        // From the box towards the circle.
        assert_abs_diff_eq!(info.normal.x, 1.0, epsilon = EPSILON);
        assert_abs_diff_eq!(info.penetration, 0.2, epsilon = EPSILON);

        let info = check_collision(&c, &r).unwrap();
        assert_eq!(info.body_a, BodyId::new(1));
        assert_abs_diff_eq!(info.normal.x, -1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_dispatch_same_shapes() {
        let a = circle(0, Vec2::ZERO, 1.0);
        let b = circle(1, Vec2::new(1.0, 0.0), 1.0);
        assert!(check_collision(&a, &b).is_some());

        let c = rect(2, Vec2::ZERO, 1.0, 1.0);
        let d = rect(3, Vec2::new(0.5, 0.0), 1.0, 1.0);
        assert!(check_collision(&c, &d).is_some());
    }

    #[test]
    fn test_ground_contacts() {
        let c = circle(0, Vec2::new(0.0, 0.8), 1.0);
        let contact = circle_vs_ground(&c, 0.0).unwrap();
        assert_eq!(contact.normal, Vec2::UP);
        assert_abs_diff_eq!(contact.penetration, 0.2, epsilon = EPSILON);
        assert!(circle_vs_ground(&circle(1, Vec2::new(0.0, 2.0), 1.0), 0.0).is_none());

        let r = rect(2, Vec2::new(0.0, 0.4), 2.0, 1.0);
        let contact = check_ground(&r, 0.0).unwrap();
        assert_abs_diff_eq!(contact.penetration, 0.1, epsilon = EPSILON);
        assert!(circle_vs_ground(&r, 0.0).is_none());
    }
}
