//! Compact 16-bit move encoding used by the move-ordering tables.

use std::fmt;

/// A move packed into 16 bits: origin square in bits 0-5, destination in
/// bits 6-11, flags in bits 12-15.
///
/// The tables in this workspace only need the squares; flag semantics belong
/// to the move generator.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move(u16);

impl Move {
    /// The "no move" sentinel. All-zero, so zeroed tables hold null moves.
    pub const NULL: Move = Move(0);

    /// Build a move from two square indices in `0..64`.
    #[inline]
    pub const fn new(from: u8, to: u8) -> Move {
        Move((from as u16 & 0x3F) | ((to as u16 & 0x3F) << 6))
    }

    /// Rebuild a move from its raw encoding.
    #[inline]
    pub const fn from_raw(raw: u16) -> Move {
        Move(raw)
    }

    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Origin square index.
    #[inline]
    pub const fn from(self) -> usize {
        (self.0 & 0x3F) as usize
    }

    /// Destination square index.
    #[inline]
    pub const fn to(self) -> usize {
        ((self.0 >> 6) & 0x3F) as usize
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("Move(null)");
        }
        write!(f, "Move({}->{})", self.from(), self.to())
    }
}
