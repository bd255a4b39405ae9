//! Packed opening/endgame score pair.

use std::fmt;
use std::ops::{Add, Neg, Sub};

/// Two `i16` score components packed into one `i32`.
///
/// The layout is `(mg << 16) + eg`. Because the packing is linear, sums,
/// differences and negation work on the raw integer; only extraction has to
/// correct for the borrow a negative `eg` leaves in the upper half.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Score(i32);

impl Score {
    pub const ZERO: Score = Score(0);

    /// Pack a middlegame and an endgame component.
    #[inline]
    pub const fn new(mg: i16, eg: i16) -> Score {
        Score(((mg as i32) << 16).wrapping_add(eg as i32))
    }

    /// Reinterpret a raw packed value.
    #[inline]
    pub const fn from_raw(raw: i32) -> Score {
        Score(raw)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Middlegame component.
    #[inline]
    pub const fn mg(self) -> i16 {
        (self.0.wrapping_add(0x8000) >> 16) as i16
    }

    /// Endgame component.
    #[inline]
    pub const fn eg(self) -> i16 {
        self.0 as i16
    }
}

/// Shorthand for [`Score::new`], following the usual engine notation.
#[allow(non_snake_case)]
#[inline]
pub const fn S(mg: i16, eg: i16) -> Score {
    Score::new(mg, eg)
}

impl Add for Score {
    type Output = Score;

    #[inline]
    fn add(self, rhs: Score) -> Score {
        Score(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for Score {
    type Output = Score;

    #[inline]
    fn sub(self, rhs: Score) -> Score {
        Score(self.0.wrapping_sub(rhs.0))
    }
}

impl Neg for Score {
    type Output = Score;

    #[inline]
    fn neg(self) -> Score {
        Score(self.0.wrapping_neg())
    }
}

impl fmt::Debug for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S({}, {})", self.mg(), self.eg())
    }
}
