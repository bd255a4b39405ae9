//! Fixed-capacity per-ply frame stacks with lookback below ply 0.

use std::marker::PhantomData;
use std::ops::{Deref, DerefMut, Index, IndexMut};

/// Deepest ply a search may reach.
pub const MAX_PLY: usize = 128;

/// Frames reserved below ply 0 so search code can read `ply - k` for
/// `k <= STACK_OFFSET` without underflow checks.
pub const STACK_OFFSET: usize = 4;

/// Physical frames in every worker stack.
pub const STACK_SIZE: usize = MAX_PLY + STACK_OFFSET;

/// A fixed buffer of per-ply records addressed by signed ply.
///
/// Ply 0 maps to physical slot `offset`, so plies `-offset..len - offset`
/// are valid. The backing storage `B` is any owned slice: a plain boxed
/// slice, or an aligned buffer when the records need it.
pub struct FrameStack<T, B = Box<[T]>> {
    frames: B,
    offset: usize,
    _marker: PhantomData<T>,
}

impl<T: Clone + Default> FrameStack<T> {
    /// `len` default frames, with `offset` of them below ply 0.
    pub fn boxed(len: usize, offset: usize) -> Self {
        Self::from_buffer(vec![T::default(); len].into_boxed_slice(), offset)
    }
}

impl<T, B: Deref<Target = [T]>> FrameStack<T, B> {
    /// Wrap existing storage.
    ///
    /// # Panics
    ///
    /// If `offset` leaves no room for ply 0.
    pub fn from_buffer(frames: B, offset: usize) -> Self {
        assert!(
            offset < frames.len(),
            "stack offset {offset} leaves no room for ply 0 in {} frames",
            frames.len()
        );
        Self {
            frames,
            offset,
            _marker: PhantomData,
        }
    }

    /// Number of frames reserved below ply 0.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Total physical frames.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.frames.len()
    }

    /// Lowest addressable ply (`-offset`).
    #[inline]
    pub fn lowest_ply(&self) -> isize {
        -(self.offset as isize)
    }

    /// Highest addressable ply.
    #[inline]
    pub fn highest_ply(&self) -> isize {
        (self.frames.len() - self.offset) as isize - 1
    }

    /// Physical slot of `ply`, if it is inside the buffer.
    #[inline]
    fn slot(&self, ply: isize) -> Option<usize> {
        let slot = ply.checked_add(self.offset as isize)?;
        usize::try_from(slot).ok().filter(|&s| s < self.frames.len())
    }

    #[inline]
    pub fn get(&self, ply: isize) -> Option<&T> {
        self.slot(ply).map(|s| &self.frames[s])
    }

    /// All frames in physical order, padding first.
    #[inline]
    pub fn frames(&self) -> &[T] {
        &self.frames
    }

    /// The backing storage.
    #[inline]
    pub fn buffer(&self) -> &B {
        &self.frames
    }
}

impl<T, B: DerefMut<Target = [T]>> FrameStack<T, B> {
    #[inline]
    pub fn get_mut(&mut self, ply: isize) -> Option<&mut T> {
        self.slot(ply).map(|s| &mut self.frames[s])
    }

    #[inline]
    pub fn frames_mut(&mut self) -> &mut [T] {
        &mut self.frames
    }
}

impl<T, B: Deref<Target = [T]>> Index<isize> for FrameStack<T, B> {
    type Output = T;

    #[inline]
    fn index(&self, ply: isize) -> &T {
        match self.get(ply) {
            Some(frame) => frame,
            None => panic!(
                "ply {ply} outside frame stack {}..={}",
                self.lowest_ply(),
                self.highest_ply()
            ),
        }
    }
}

impl<T, B: DerefMut<Target = [T]>> IndexMut<isize> for FrameStack<T, B> {
    #[inline]
    fn index_mut(&mut self, ply: isize) -> &mut T {
        let (low, high) = (self.lowest_ply(), self.highest_ply());
        match self.get_mut(ply) {
            Some(frame) => frame,
            None => panic!("ply {ply} outside frame stack {low}..={high}"),
        }
    }
}
