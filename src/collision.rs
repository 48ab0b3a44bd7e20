//! Axis aligned bounding boxes on the character grid.
//!
//! Both ranges are inclusive: a box covering columns 3 through 9 has
//! `xs == (3, 9)`.

use crate::TermInt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub xs: (TermInt, TermInt),
    pub ys: (TermInt, TermInt),
}

impl BoundingBox {
    /// Box anchored at `pos` (top left) spanning `width` columns and `height` rows.
    pub fn new(pos: (TermInt, TermInt), width: TermInt, height: TermInt) -> Self {
        BoundingBox {
            xs: (pos.0, pos.0 + width.saturating_sub(1)),
            ys: (pos.1, pos.1 + height.saturating_sub(1)),
        }
    }

    pub fn left(&self) -> TermInt {
        self.xs.0
    }

    pub fn right(&self) -> TermInt {
        self.xs.1
    }

    pub fn overlaps_x(&self, other: &BoundingBox) -> bool {
        ranges_meet(self.xs, other.xs) || ranges_meet(other.xs, self.xs)
    }

    pub fn overlaps_y(&self, other: &BoundingBox) -> bool {
        ranges_meet(self.ys, other.ys) || ranges_meet(other.ys, self.ys)
    }

    /// True when this box sits exactly one column past the trailing edge of `other`.
    pub fn just_cleared(&self, other: &BoundingBox) -> bool {
        self.left() == other.right() + 1
    }
}

#[cfg(test)]
impl BoundingBox {
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        self.overlaps_x(other) && self.overlaps_y(other)
    }
}

fn ranges_meet(a: (TermInt, TermInt), b: (TermInt, TermInt)) -> bool {
    a.0 <= b.1 && a.1 >= b.0
}
