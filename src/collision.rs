//! Overlap tests shared by all three games.

use crate::entities::{Entity, Rect};

/// Strict AABB overlap.  Rectangles that only share an edge do not collide.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

pub fn collides(a: &Entity, b: &Entity) -> bool {
    overlaps(&a.rect(), &b.rect())
}

/// Exact position equality.  Only meaningful for grid-aligned entities of the
/// same size, where it is equivalent to `collides`.
pub fn same_cell(a: &Entity, b: &Entity) -> bool {
    a.position == b.position
}
