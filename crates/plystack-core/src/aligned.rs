//! Heap buffers whose first element starts on a cache-line boundary.

use std::alloc::{Layout, alloc, dealloc, handle_alloc_error};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Alignment guaranteed by [`AlignedBuf`], in bytes.
pub const CACHE_LINE: usize = 64;

/// Buffers allocated and not yet freed, process-wide.
static LIVE: AtomicUsize = AtomicUsize::new(0);

/// Number of [`AlignedBuf`]s currently alive in this process.
pub fn live_aligned_allocations() -> usize {
    LIVE.load(Ordering::Relaxed)
}

/// A fixed-length, heap-allocated slice aligned to at least [`CACHE_LINE`]
/// bytes.
///
/// Every buffer is one allocation and one matching deallocation with the same
/// layout, so callers can rely on alloc/free symmetry.
pub struct AlignedBuf<T> {
    ptr: NonNull<T>,
    len: usize,
    layout: Layout,
}

impl<T> AlignedBuf<T> {
    /// Allocate `len` elements and initialise each one with `init`.
    ///
    /// Aborts through [`handle_alloc_error`] if the allocator fails.
    pub fn new_with(len: usize, mut init: impl FnMut() -> T) -> Self {
        let layout = Layout::array::<T>(len.max(1))
            .and_then(|layout| layout.align_to(CACHE_LINE))
            .map(|layout| layout.pad_to_align())
            .expect("aligned buffer layout overflows isize");
        assert!(layout.size() != 0, "aligned buffer of zero-sized elements");

        // SAFETY: the layout has a non-zero size.
        let raw = unsafe { alloc(layout) };
        let Some(ptr) = NonNull::new(raw.cast::<T>()) else {
            handle_alloc_error(layout);
        };

        for i in 0..len {
            // SAFETY: `i < len` and the allocation holds at least `len` elements.
            unsafe { ptr.as_ptr().add(i).write(init()) };
        }

        LIVE.fetch_add(1, Ordering::Relaxed);
        Self { ptr, len, layout }
    }

    /// Address of the first element.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Alignment the buffer was allocated with.
    #[inline]
    pub fn alignment(&self) -> usize {
        self.layout.align()
    }
}

impl<T: Default> AlignedBuf<T> {
    /// Allocate `len` default-initialised elements.
    pub fn new(len: usize) -> Self {
        Self::new_with(len, T::default)
    }
}

impl<T> Deref for AlignedBuf<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        // SAFETY: `len` elements were initialised in `new_with`.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<T> DerefMut for AlignedBuf<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        // SAFETY: as in `deref`, and `&mut self` guarantees exclusivity.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T> Drop for AlignedBuf<T> {
    fn drop(&mut self) {
        // SAFETY: the elements are initialised and the pointer came from
        // `alloc` with exactly `self.layout`.
        unsafe {
            std::ptr::drop_in_place(std::ptr::slice_from_raw_parts_mut(
                self.ptr.as_ptr(),
                self.len,
            ));
            dealloc(self.ptr.as_ptr().cast::<u8>(), self.layout);
        }
        LIVE.fetch_sub(1, Ordering::Relaxed);
    }
}

// SAFETY: the buffer uniquely owns its elements, like `Box<[T]>`.
unsafe impl<T: Send> Send for AlignedBuf<T> {}
unsafe impl<T: Sync> Sync for AlignedBuf<T> {}

impl<T> fmt::Debug for AlignedBuf<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBuf")
            .field("ptr", &self.ptr)
            .field("len", &self.len)
            .field("align", &self.layout.align())
            .finish()
    }
}
