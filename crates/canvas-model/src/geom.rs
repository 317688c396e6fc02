// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Integer canvas coordinates.

/// A point on the canvas. Both axes are unconstrained signed integers.
///
/// There is no per-axis setter; moving always replaces both coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Position {
    x: i64,
    y: i64,
}

impl Position {
    /// Point at `(x, y)`.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// This point moved to `(x, y)`.
    pub const fn with_coordinates(self, x: i64, y: i64) -> Self {
        let mut moved = self;
        moved.x = x;
        moved.y = y;
        moved
    }

    /// Horizontal coordinate.
    pub const fn x(self) -> i64 {
        self.x
    }

    /// Vertical coordinate.
    pub const fn y(self) -> i64 {
        self.y
    }
}

impl From<(i64, i64)> for Position {
    fn from((x, y): (i64, i64)) -> Self {
        Self::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn with_coordinates_replaces_both_axes() {
        let p = Position::new(-40, 12).with_coordinates(7, -9);
        assert_eq!((p.x(), p.y()), (7, -9));
    }

    #[test]
    fn extremes_are_accepted() {
        let p = Position::new(i64::MIN, i64::MAX);
        assert_eq!(p.x(), i64::MIN);
        assert_eq!(p.y(), i64::MAX);
    }
}
