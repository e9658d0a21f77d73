pub mod overlap;

use glam::Vec2;

pub use overlap::overlaps;

/// World-space shape, ready for overlap tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle { center: Vec2, radius: f32 },
    Rect { center: Vec2, width: f32, height: f32 },
}

impl Shape {
    pub fn circle(center: Vec2, radius: f32) -> Self {
        Shape::Circle { center, radius }
    }

    pub fn rect(center: Vec2, width: f32, height: f32) -> Self {
        Shape::Rect {
            center,
            width,
            height,
        }
    }

    pub fn center(&self) -> Vec2 {
        match *self {
            Shape::Circle { center, .. } | Shape::Rect { center, .. } => center,
        }
    }

    /// Conservative extent used to size grid queries. Exact for circles,
    /// half diagonal for rectangles. Never smaller than the true extent.
    pub fn approximate_radius(&self) -> f32 {
        match *self {
            Shape::Circle { radius, .. } => radius.max(0.0),
            Shape::Rect { width, height, .. } => half_diagonal(width, height),
        }
    }

    /// Axis-aligned bounding box. A circle gets its enclosing square.
    pub fn bounds(&self) -> Aabb {
        match *self {
            Shape::Circle { center, radius } => {
                let r = Vec2::splat(radius.max(0.0));
                Aabb::new(center - r, center + r)
            }
            Shape::Rect {
                center,
                width,
                height,
            } => {
                let half = Vec2::new(width.max(0.0), height.max(0.0)) * 0.5;
                Aabb::new(center - half, center + half)
            }
        }
    }
}

fn half_diagonal(width: f32, height: f32) -> f32 {
    Vec2::new(width.max(0.0), height.max(0.0)).length() * 0.5
}

/// Axis-aligned box. `min.y` is the top edge (screen coordinates, y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn left(&self) -> f32 {
        self.min.x
    }

    pub fn right(&self) -> f32 {
        self.max.x
    }

    pub fn top(&self) -> f32 {
        self.min.y
    }

    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    /// Nearest point inside the box to `p`.
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Strict separating-axis test: touching edges do not count.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Shape of a collider relative to its owner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    Circle { radius: f32 },
    Rect { width: f32, height: f32 },
}

/// A shape bound to an owner. Holds no position of its own: the world
/// shape is derived from the owner's position at query time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    /// Local offset from the owner position (e.g. a boss segment).
    pub offset: Vec2,
    pub shape: ColliderShape,
}

impl Collider {
    pub fn circle(radius: f32) -> Self {
        Self {
            offset: Vec2::ZERO,
            shape: ColliderShape::Circle { radius },
        }
    }

    pub fn rect(width: f32, height: f32) -> Self {
        Self {
            offset: Vec2::ZERO,
            shape: ColliderShape::Rect { width, height },
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn center_at(&self, owner: Vec2) -> Vec2 {
        owner + self.offset
    }

    pub fn shape_at(&self, owner: Vec2) -> Shape {
        let center = self.center_at(owner);
        match self.shape {
            ColliderShape::Circle { radius } => Shape::circle(center, radius),
            ColliderShape::Rect { width, height } => Shape::rect(center, width, height),
        }
    }

    pub fn approximate_radius(&self) -> f32 {
        match self.shape {
            ColliderShape::Circle { radius } => radius.max(0.0),
            ColliderShape::Rect { width, height } => half_diagonal(width, height),
        }
    }

    /// Extent measured from the owner position rather than the collider centre.
    pub fn reach(&self) -> f32 {
        self.offset.length() + self.approximate_radius()
    }
}

/// Radius used for separation spacing: the reach of the primary (first)
/// collider. Trailing segments of a multi-collider body do not widen it;
/// a worm's tail only extends one way. Zero for a body with no colliders.
pub fn separation_radius(colliders: &[Collider]) -> f32 {
    colliders.first().map_or(0.0, Collider::reach)
}

/// Anything that exposes a fixed list of colliders bound to its position.
pub trait HasColliders {
    fn position(&self) -> Vec2;
    fn colliders(&self) -> &[Collider];
}

/// Index-addressed view over a set of bodies. Grid entries store the index.
pub trait Population {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn position(&self, index: usize) -> Vec2;
    fn colliders(&self, index: usize) -> &[Collider];
}

impl<S: HasColliders> Population for [S] {
    fn len(&self) -> usize {
        <[S]>::len(self)
    }

    fn position(&self, index: usize) -> Vec2 {
        self[index].position()
    }

    fn colliders(&self, index: usize) -> &[Collider] {
        self[index].colliders()
    }
}

impl<S: HasColliders> Population for Vec<S> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn position(&self, index: usize) -> Vec2 {
        self[index].position()
    }

    fn colliders(&self, index: usize) -> &[Collider] {
        self[index].colliders()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal body used across the crate's unit tests.
    #[derive(Debug, Clone)]
    pub struct TestBody {
        pub pos: Vec2,
        pub colliders: Vec<Collider>,
    }

    impl TestBody {
        pub fn circle(pos: Vec2, radius: f32) -> Self {
            Self {
                pos,
                colliders: vec![Collider::circle(radius)],
            }
        }

        pub fn rect(pos: Vec2, width: f32, height: f32) -> Self {
            Self {
                pos,
                colliders: vec![Collider::rect(width, height)],
            }
        }
    }

    impl HasColliders for TestBody {
        fn position(&self) -> Vec2 {
            self.pos
        }

        fn colliders(&self) -> &[Collider] {
            &self.colliders
        }
    }

    #[test]
    fn rect_bounds_from_center_and_extents() {
        let b = Shape::rect(Vec2::ZERO, 100.0, 60.0).bounds();
        assert_eq!(b.left(), -50.0);
        assert_eq!(b.right(), 50.0);
        assert_eq!(b.top(), -30.0);
        assert_eq!(b.bottom(), 30.0);
    }

    #[test]
    fn approximate_radius_never_underestimates() {
        let rect = Shape::rect(Vec2::ZERO, 30.0, 40.0);
        assert!((rect.approximate_radius() - 25.0).abs() < 1e-5);
        let b = rect.bounds();
        for corner in [b.min, b.max, Vec2::new(b.left(), b.bottom())] {
            assert!(corner.length() <= rect.approximate_radius() + 1e-4);
        }
        assert_eq!(Shape::circle(Vec2::ONE, 7.0).approximate_radius(), 7.0);
    }

    #[test]
    fn collider_follows_owner() {
        let segment = Collider::circle(8.0).with_offset(Vec2::new(20.0, 0.0));
        assert_eq!(
            segment.shape_at(Vec2::new(5.0, 5.0)),
            Shape::circle(Vec2::new(25.0, 5.0), 8.0)
        );
        assert_eq!(segment.reach(), 28.0);
    }

    #[test]
    fn separation_radius_ignores_trailing_segments() {
        let worm = [
            Collider::circle(16.0),
            Collider::circle(12.0).with_offset(Vec2::new(0.0, 40.0)),
        ];
        assert_eq!(separation_radius(&worm), 16.0);
        assert_eq!(separation_radius(&[]), 0.0);
    }
}
