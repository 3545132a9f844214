//! Triangular membership functions.

use rust_decimal::Decimal;

/// Triangular membership function with feet `a` and `c` and apex `b`.
///
/// `a == b` or `b == c` give the left/right shoulder variants used at the
/// edges of a universe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangularMf {
    a: Decimal,
    b: Decimal,
    c: Decimal,
}

impl TriangularMf {
    pub const fn new(a: Decimal, b: Decimal, c: Decimal) -> Self {
        Self { a, b, c }
    }

    /// Degree of membership of `x`, in [0, 1].
    pub fn membership(&self, x: Decimal) -> Decimal {
        if x < self.a || x > self.c {
            return Decimal::ZERO;
        }
        if x == self.b {
            return Decimal::ONE;
        }
        if x < self.b {
            // x >= a and x < b imply b > a, so the slope is well-defined.
            (x - self.a) / (self.b - self.a)
        } else {
            (self.c - x) / (self.c - self.b)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
