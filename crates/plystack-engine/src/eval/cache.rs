//! Per-worker evaluation memoization.
//!
//! Both caches are direct-mapped on the low bits of a hash key. They are
//! worker-private, so no torn-write detection is needed.

use plystack_core::Score;

/// Entries in the static evaluation cache.
pub const EVAL_CACHE_ENTRIES: usize = 1 << 15;

/// Entries in the pawn/king structure cache.
pub const PAWN_KING_CACHE_ENTRIES: usize = 1 << 12;

const EVAL_MASK: u64 = 0xFFFF;

/// Static evaluations keyed by full position hash.
///
/// Each slot packs the upper 48 bits of the key with a 16-bit evaluation.
pub struct EvalCache {
    slots: Box<[u64]>,
}

impl EvalCache {
    pub fn new() -> Self {
        Self {
            slots: vec![0; EVAL_CACHE_ENTRIES].into_boxed_slice(),
        }
    }

    #[inline]
    fn slot(key: u64) -> usize {
        (key as usize) & (EVAL_CACHE_ENTRIES - 1)
    }

    /// Cached evaluation for `key`, if the slot holds this position.
    pub fn probe(&self, key: u64) -> Option<i16> {
        let entry = self.slots[Self::slot(key)];
        if entry != 0 && (entry & !EVAL_MASK) == (key & !EVAL_MASK) {
            Some(entry as u16 as i16)
        } else {
            None
        }
    }

    /// Remember `eval` for `key`, replacing whatever shared the slot.
    pub fn store(&mut self, key: u64, eval: i16) {
        self.slots[Self::slot(key)] = (key & !EVAL_MASK) | u64::from(eval as u16);
    }

    pub fn clear(&mut self) {
        self.slots.fill(0);
    }

    pub fn is_clear(&self) -> bool {
        self.slots.iter().all(|&slot| slot == 0)
    }
}

impl Default for EvalCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Pawn and king structure terms, which change far less often than the
/// full position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PawnKingEntry {
    pub key: u64,
    /// Bitboard of passed pawns for both sides.
    pub passed: u64,
    pub eval: Score,
    /// King-safety contribution per side.
    pub safety: [Score; 2],
}

/// Pawn/king evaluation cache keyed by the pawn/king hash.
pub struct PawnKingCache {
    entries: Box<[PawnKingEntry]>,
}

impl PawnKingCache {
    pub fn new() -> Self {
        Self {
            entries: vec![PawnKingEntry::default(); PAWN_KING_CACHE_ENTRIES].into_boxed_slice(),
        }
    }

    #[inline]
    fn slot(key: u64) -> usize {
        (key as usize) & (PAWN_KING_CACHE_ENTRIES - 1)
    }

    pub fn probe(&self, key: u64) -> Option<&PawnKingEntry> {
        let entry = &self.entries[Self::slot(key)];
        (key != 0 && entry.key == key).then_some(entry)
    }

    pub fn store(&mut self, entry: PawnKingEntry) {
        self.entries[Self::slot(entry.key)] = entry;
    }

    pub fn clear(&mut self) {
        self.entries.fill(PawnKingEntry::default());
    }

    pub fn is_clear(&self) -> bool {
        self.entries.iter().all(|entry| *entry == PawnKingEntry::default())
    }
}

impl Default for PawnKingCache {
    fn default() -> Self {
        Self::new()
    }
}
