//! Integer axis-aligned rectangles.
//!
//! All collision in the game is AABB-vs-AABB over whole pixels. Integer
//! coordinates are deliberate: snapping a player's edge to a tile's edge is an
//! exact assignment, so resolved contacts never accumulate floating-point
//! drift across ticks. The coordinate system is screen-style: x grows right,
//! y grows down, rows of the tile grid map top-to-bottom.

/// Top-left anchored rectangle in world pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of size `w`x`h` whose center sits at `(cx, cy)`.
    pub const fn from_center(cx: i32, cy: i32, w: i32, h: i32) -> Self {
        Self {
            x: cx - w / 2,
            y: cy - h / 2,
            w,
            h,
        }
    }

    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Strict overlap test: rectangles that merely share an edge do not
    /// overlap. Collision resolution relies on this so that a box resting
    /// exactly on a surface is not re-reported as colliding.
    pub const fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub const fn contains_point(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// The same rectangle displaced by `(dx, dy)` — the "swept box" used to
    /// test a proposed per-axis move before committing it.
    pub const fn translated(&self, dx: i32, dy: i32) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            w: self.w,
            h: self.h,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_requires_shared_area() {
        let a = Rect::new(0, 0, 50, 50);
        let b = Rect::new(25, 25, 50, 50);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let floor = Rect::new(0, 100, 50, 50);
        let standing = Rect::new(0, 20, 40, 80);
        assert_eq!(standing.bottom(), floor.y);
        assert!(!standing.overlaps(&floor));
        // One pixel of penetration flips the result.
        assert!(standing.translated(0, 1).overlaps(&floor));
    }

    #[test]
    fn translated_leaves_original_untouched() {
        let r = Rect::new(10, 10, 5, 5);
        let moved = r.translated(-3, 7);
        assert_eq!(moved, Rect::new(7, 17, 5, 5));
        assert_eq!(r, Rect::new(10, 10, 5, 5));
    }

    #[test]
    fn from_center_uses_integer_halving() {
        let r = Rect::from_center(25, 25, 25, 25);
        assert_eq!(r, Rect::new(13, 13, 25, 25));
    }

    #[test]
    fn contains_point_is_half_open() {
        let r = Rect::new(0, 0, 10, 10);
        assert!(r.contains_point(0, 0));
        assert!(r.contains_point(9, 9));
        assert!(!r.contains_point(10, 0));
        assert!(!r.contains_point(0, 10));
    }
}
