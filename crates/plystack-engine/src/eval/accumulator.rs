//! Accumulator frames for incremental network evaluation.

use plystack_core::{CACHE_LINE, Color};

/// Hidden-layer width per perspective.
pub const HIDDEN: usize = 256;

/// Hidden-layer activations for both perspectives at one ply.
///
/// The vectorised update code loads `values` with aligned 64-byte loads, so
/// the array sits at offset 0 of a 64-byte aligned struct.
#[derive(Clone, Copy)]
#[repr(C, align(64))]
pub struct Accumulator {
    pub values: [[i16; HIDDEN]; Color::COUNT],
    /// `false` until the evaluator has filled `values` for the current
    /// position at this ply.
    pub computed: bool,
}

const _: () = assert!(std::mem::align_of::<Accumulator>() == CACHE_LINE);
const _: () = assert!(std::mem::offset_of!(Accumulator, values) == 0);

impl Accumulator {
    /// Address of the first activation.
    #[inline]
    pub fn values_ptr(&self) -> *const i16 {
        self.values.as_ptr().cast()
    }

    /// Whether the activation buffer starts on a cache-line boundary.
    #[inline]
    pub fn is_aligned(&self) -> bool {
        self.values_ptr() as usize % CACHE_LINE == 0
    }

    /// Activations seen from `perspective`.
    #[inline]
    pub fn side(&self, perspective: Color) -> &[i16; HIDDEN] {
        &self.values[perspective.index()]
    }

    /// Mark the cached activations stale.
    #[inline]
    pub fn invalidate(&mut self) {
        self.computed = false;
    }
}

impl Default for Accumulator {
    fn default() -> Self {
        Self {
            values: [[0; HIDDEN]; Color::COUNT],
            computed: false,
        }
    }
}
