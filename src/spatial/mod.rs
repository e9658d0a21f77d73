pub mod bounds_hash;
mod buckets;
pub mod index_set;
pub mod overlap_query;
pub mod point_hash;

use glam::Vec2;

pub use bounds_hash::BoundsHash;
pub use index_set::{Category, IndexSet};
pub use overlap_query::{OverlapPair, OverlapQuery};
pub use point_hash::PointHash;

/// Integer grid coordinates of the cell containing `pos`.
#[inline]
pub fn cell_coords(pos: Vec2, inv_cell_size: f32) -> (i32, i32) {
    let cx = (pos.x * inv_cell_size).floor() as i32;
    let cy = (pos.y * inv_cell_size).floor() as i32;
    (cx, cy)
}

/// Pack a cell coordinate pair into one map key. Each half goes through
/// `u32` first so a negative `cy` cannot sign-extend over `cx`.
#[inline]
pub fn cell_key(cx: i32, cy: i32) -> u64 {
    ((cx as u32 as u64) << 32) | (cy as u32 as u64)
}

/// Cells to scan around a query so that anything within `reach` world
/// units is visited: `ceil(reach / cell_size) + 1`.
#[inline]
pub fn cell_radius(reach: f32, cell_size: f32) -> i32 {
    (reach.max(0.0) / cell_size).ceil() as i32 + 1
}

/// Visit the keys of the `(2r+1)^2` block centred on `(cx, cy)`.
#[inline]
pub(crate) fn for_each_cell_key(cx: i32, cy: i32, r: i32, mut f: impl FnMut(u64)) {
    let r = r.max(0);
    for dy in -r..=r {
        for dx in -r..=r {
            f(cell_key(cx.wrapping_add(dx), cy.wrapping_add(dy)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_cells_do_not_collide() {
        assert_ne!(cell_key(0, -1), cell_key(-1, -1));
        assert_ne!(cell_key(1, -1), cell_key(0, -1));
        assert_ne!(cell_key(-1, 0), cell_key(0, -1));
    }

    #[test]
    fn coords_floor_toward_negative_infinity() {
        assert_eq!(cell_coords(Vec2::new(-0.5, 49.9), 1.0 / 50.0), (-1, 0));
        assert_eq!(cell_coords(Vec2::new(50.0, -50.0), 1.0 / 50.0), (1, -1));
    }

    #[test]
    fn cell_radius_pads_by_one() {
        assert_eq!(cell_radius(16.0, 50.0), 2);
        assert_eq!(cell_radius(0.0, 50.0), 1);
        assert_eq!(cell_radius(100.0, 50.0), 3);
    }
}
