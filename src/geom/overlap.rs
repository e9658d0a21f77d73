use glam::Vec2;

use super::{Aabb, Shape};

/// True iff the two shapes overlap. Symmetric in its arguments.
///
/// Every pair of shape kinds is matched explicitly, so adding a new kind
/// fails to compile here until its predicates exist.
pub fn overlaps(a: &Shape, b: &Shape) -> bool {
    match (*a, *b) {
        (
            Shape::Circle {
                center: ca,
                radius: ra,
            },
            Shape::Circle {
                center: cb,
                radius: rb,
            },
        ) => circle_circle(ca, ra, cb, rb),
        (Shape::Circle { center, radius }, Shape::Rect { .. }) => {
            circle_rect(center, radius, &b.bounds())
        }
        (Shape::Rect { .. }, Shape::Circle { center, radius }) => {
            circle_rect(center, radius, &a.bounds())
        }
        (Shape::Rect { .. }, Shape::Rect { .. }) => rect_rect(&a.bounds(), &b.bounds()),
    }
}

/// Boundary inclusive: touching circles overlap.
pub fn circle_circle(ca: Vec2, ra: f32, cb: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    ca.distance_squared(cb) <= reach * reach
}

/// Clamp the centre onto the box, then compare against the radius.
/// Boundary inclusive.
pub fn circle_rect(center: Vec2, radius: f32, rect: &Aabb) -> bool {
    let nearest = rect.clamp_point(center);
    center.distance_squared(nearest) <= radius * radius
}

/// Strict on every axis: boxes that only share an edge do not overlap.
pub fn rect_rect(a: &Aabb, b: &Aabb) -> bool {
    a.overlaps(b)
}
