use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Sub};

/// An integer pixel coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const ZERO: Size = Size { width: 0, height: 0 };

    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// An inclusive axis-aligned bounding box with cached corner and center
/// points. Always derived via [`Bounds::new`], never hand-constructed, so the
/// invariants `right == left + width - 1` and `bottom == top + height - 1`
/// hold for every non-empty box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub width: i32,
    pub height: i32,
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
    pub center: Point,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::empty()
    }
}

impl Bounds {
    pub fn new(position: Point, size: Size) -> Self {
        let Point { x, y } = position;
        let Size { width, height } = size;
        let left = x;
        let top = y;
        let right = left + width - 1;
        let bottom = top + height - 1;

        Self {
            x,
            y,
            left,
            top,
            right,
            bottom,
            width,
            height,
            top_left: Point::new(left, top),
            top_right: Point::new(right, top),
            bottom_left: Point::new(left, bottom),
            bottom_right: Point::new(right, bottom),
            center: Point::new(left + width / 2, top + height / 2),
        }
    }

    /// The sentinel for "no geometry". Zero-sized, never NaN or infinite.
    pub fn empty() -> Self {
        Self::new(Point::ZERO, Size::ZERO)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// O(1) shift of an already computed box, for the cached-bounds update
    /// path that must not re-derive from geometry.
    pub fn translated(&self, delta: Point) -> Self {
        Self::new(self.position() + delta, self.size())
    }

    pub fn moved_to(&self, position: Point) -> Self {
        Self::new(position, self.size())
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.right
            && point.y >= self.top
            && point.y <= self.bottom
    }

    /// Smallest box covering both. Empty operands don't contribute.
    pub fn union(&self, other: &Bounds) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        let right = self.right.max(other.right);
        let bottom = self.bottom.max(other.bottom);
        Self::new(
            Point::new(left, top),
            Size::new(right - left + 1, bottom - top + 1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        let bounds = Bounds::new(Point::new(2, 3), Size::new(4, 5));
        assert_eq!(bounds.right, 5);
        assert_eq!(bounds.bottom, 7);
        assert_eq!(bounds.right - bounds.left + 1, bounds.width);
        assert_eq!(bounds.bottom - bounds.top + 1, bounds.height);
        assert_eq!(bounds.center, Point::new(4, 5));
    }

    #[test]
    fn union_skips_empty_operands() {
        let a = Bounds::new(Point::new(0, 0), Size::new(2, 2));
        assert_eq!(a.union(&Bounds::empty()), a);
        assert_eq!(Bounds::empty().union(&a), a);

        let b = Bounds::new(Point::new(3, 3), Size::new(1, 1));
        let union = a.union(&b);
        assert_eq!(union.position(), Point::new(0, 0));
        assert_eq!(union.size(), Size::new(4, 4));
    }

    #[test]
    fn contains_is_edge_inclusive() {
        let bounds = Bounds::new(Point::new(0, 0), Size::new(3, 3));
        assert!(bounds.contains(Point::new(2, 2)));
        assert!(!bounds.contains(Point::new(3, 2)));
    }
}
