use core::{
    alloc::Layout,
    cmp,
    mem,
    ptr::{self, NonNull},
};
use std::alloc;

use crate::TryReserveError;

/// Low level utility that owns a block of uninitialized, correctly-aligned
/// memory sized for an exact number of `T` slots, without having to worry
/// about the corner cases involved. In particular:
///
/// - Produces a dangling pointer for zero-sized types.
/// - Produces a dangling pointer for zero-length allocations.
/// - Avoids freeing the never-allocated state.
/// - Catches all overflows in capacity computations (promotes them to
///   "capacity overflow" errors).
///
/// This type does not in any way inspect the memory it manages. When dropped
/// it *will* free its memory, but it *won't* try to drop its contents. It is
/// up to the user of `RawBuffer` to handle the actual things *stored* inside
/// of it: which slots currently hold live values is the owner's bookkeeping,
/// not this type's.
///
/// `RawBuffer` is deliberately not `Clone`: duplicating a block of raw memory
/// has no meaningful semantics. Ownership moves, or is exchanged with
/// [`swap`](RawBuffer::swap).
///
/// Note that the capacity of a zero-sized type is always infinite, so
/// `capacity()` always returns `usize::MAX` for them.
pub struct RawBuffer<T> {
    ptr: NonNull<T>,
    cap: usize,
}

impl<T> RawBuffer<T> {
    /// Creates the biggest possible `RawBuffer` without allocating.
    ///
    /// If `T` has a non-zero size, this makes a `RawBuffer` with a capacity
    /// of `0`. If `T` is zero-sized, it makes a `RawBuffer` with a capacity
    /// of `usize::MAX`. Useful for implementing delayed allocation.
    #[must_use]
    pub const fn new() -> Self {
        Self { ptr: NonNull::dangling(), cap: 0 }
    }

    /// Creates a `RawBuffer` with exactly the capacity and alignment
    /// requirements for a `[T; capacity]`. This is equivalent to calling
    /// `RawBuffer::new` when `capacity` is `0` or `T` is zero-sized.
    ///
    /// # Panics
    ///
    /// Panics if the requested capacity exceeds `isize::MAX` bytes.
    ///
    /// # Aborts
    ///
    /// Aborts on OOM.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(buf) => buf,
            Err(err) => handle_error(err),
        }
    }

    /// Fallible version of [`with_capacity`](RawBuffer::with_capacity):
    /// returns the error instead of panicking or aborting. No existing state
    /// is touched when the allocation fails.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        if mem::size_of::<T>() == 0 || capacity == 0 {
            return Ok(Self::new());
        }

        // `Layout::array` checks that the total size stays within
        // `isize::MAX` bytes.
        let layout = Layout::array::<T>(capacity).map_err(|_| TryReserveError::CapacityOverflow)?;

        // SAFETY: the layout has a non-zero size, as neither the element size
        // nor the capacity is 0 at this point.
        let raw = unsafe { alloc::alloc(layout) };
        match NonNull::new(raw.cast::<T>()) {
            Some(ptr) => Ok(Self { ptr, cap: capacity }),
            None => Err(TryReserveError::AllocError(layout)),
        }
    }

    /// The number of slots in the block.
    ///
    /// This will always be `usize::MAX` if `T` is zero-sized.
    #[inline]
    pub const fn capacity(&self) -> usize {
        if mem::size_of::<T>() == 0 { usize::MAX } else { self.cap }
    }

    /// A pointer to the start of the block, dangling when nothing has been
    /// allocated or `T` is zero-sized.
    #[inline]
    pub const fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    #[inline]
    pub const fn as_mut_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// The address of slot `offset`, which must be within the block
    /// (`offset < capacity()`).
    ///
    /// The caller is responsible for knowing whether that slot currently
    /// holds a live value; this method only hands out the address.
    #[inline]
    pub fn offset(&self, offset: usize) -> *mut T {
        debug_assert!(offset < self.capacity());
        // SAFETY: `offset` is within the block per the assertion above.
        unsafe { self.ptr.as_ptr().add(offset) }
    }

    /// Exchanges block ownership and capacity with `other` in constant time.
    /// Never fails.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.ptr, &mut other.ptr);
        mem::swap(&mut self.cap, &mut other.cap);
    }

    /// Ensures that the block holds at least `len + additional` slots,
    /// reallocating with comfortable slack space to keep repeated one-slot
    /// growth amortized *O*(1).
    ///
    /// The first `len` slots are assumed to hold live values and are
    /// relocated into the replacement block; the caller's bookkeeping is
    /// unaffected because a relocation is a plain byte copy.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` bytes.
    ///
    /// # Aborts
    ///
    /// Aborts on OOM.
    pub fn reserve(&mut self, len: usize, additional: usize) {
        if self.needs_to_grow(len, additional) {
            if let Err(err) = self.grow_amortized(len, additional) {
                handle_error(err);
            }
        }
    }

    /// A specialized version of `reserve(len, 1)` for the hot push path;
    /// the caller guarantees `len == self.capacity()`.
    pub fn grow_one(&mut self, len: usize) {
        if let Err(err) = self.grow_amortized(len, 1) {
            handle_error(err);
        }
    }

    /// The same as [`reserve`](RawBuffer::reserve), but returns on error
    /// instead of panicking or aborting.
    pub fn try_reserve(&mut self, len: usize, additional: usize) -> Result<(), TryReserveError> {
        if self.needs_to_grow(len, additional) {
            self.grow_amortized(len, additional)
        } else {
            Ok(())
        }
    }

    /// Ensures that the block holds at least `len + additional` slots,
    /// reallocating to exactly that count if it doesn't.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` bytes.
    ///
    /// # Aborts
    ///
    /// Aborts on OOM.
    pub fn reserve_exact(&mut self, len: usize, additional: usize) {
        if let Err(err) = self.try_reserve_exact(len, additional) {
            handle_error(err);
        }
    }

    pub fn try_reserve_exact(&mut self, len: usize, additional: usize) -> Result<(), TryReserveError> {
        if self.needs_to_grow(len, additional) {
            self.grow_exact(len, additional)
        } else {
            Ok(())
        }
    }

    //--------------------------------------------------------------

    /// Returns whether the block needs to grow to fulfill the needed extra
    /// capacity. Mainly used to make inlining reserve calls possible without
    /// inlining the grow path.
    fn needs_to_grow(&self, len: usize, additional: usize) -> bool {
        additional > self.capacity().wrapping_sub(len)
    }

    fn grow_amortized(&mut self, len: usize, additional: usize) -> Result<(), TryReserveError> {
        // This is ensured by the calling contexts.
        debug_assert!(additional > 0);

        if mem::size_of::<T>() == 0 {
            // Since we return a capacity of `usize::MAX` when the element
            // size is 0, getting here necessarily means the buffer is
            // overfull.
            return Err(TryReserveError::CapacityOverflow);
        }

        let required = len.checked_add(additional).ok_or(TryReserveError::CapacityOverflow)?;

        // Double-or-min: doubling cannot overflow because `cap` is at most
        // `isize::MAX` bytes worth of slots, and it keeps one-slot growth
        // from empty on the exact 1, 2, 4, 8, ... ladder.
        let new_cap = cmp::max(self.cap * 2, required);

        self.finish_grow(new_cap, len)
    }

    fn grow_exact(&mut self, len: usize, additional: usize) -> Result<(), TryReserveError> {
        debug_assert!(additional > 0);

        if mem::size_of::<T>() == 0 {
            return Err(TryReserveError::CapacityOverflow);
        }

        let new_cap = len.checked_add(additional).ok_or(TryReserveError::CapacityOverflow)?;
        self.finish_grow(new_cap, len)
    }

    fn finish_grow(&mut self, new_cap: usize, len: usize) -> Result<(), TryReserveError> {
        let mut new_buf = Self::try_with_capacity(new_cap)?;

        // SAFETY: the first `len` slots of the old block hold live values
        // (caller contract), and the new block has room for `new_cap >= len`
        // of them. A relocation is a plain byte copy, so it cannot fail
        // part-way; the old block stays fully intact until it completes.
        unsafe {
            ptr::copy_nonoverlapping(self.ptr.as_ptr(), new_buf.ptr.as_ptr(), len);
        }

        // Adopt the new block; `new_buf` now owns the old one and frees it on
        // drop. The relocated values must not be dropped with it, and aren't:
        // freeing a block never runs element destructors.
        self.swap(&mut new_buf);
        Ok(())
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        if mem::size_of::<T>() != 0 && self.cap != 0 {
            // SAFETY: the block was allocated with this exact layout, so the
            // size computation cannot overflow here.
            unsafe {
                let layout = Layout::from_size_align_unchecked(
                    mem::size_of::<T>().wrapping_mul(self.cap),
                    mem::align_of::<T>(),
                );
                alloc::dealloc(self.ptr.as_ptr().cast(), layout);
            }
        }
    }
}

// The buffer is an exclusive owner of its block, so it is as thread-safe as
// the element type itself.
unsafe impl<T: Send> Send for RawBuffer<T> {}
unsafe impl<T: Sync> Sync for RawBuffer<T> {}

/// Central funnel for reserve error handling.
#[cold]
pub(crate) fn handle_error(err: TryReserveError) -> ! {
    match err {
        TryReserveError::CapacityOverflow => capacity_overflow(),
        TryReserveError::AllocError(layout) => alloc::handle_alloc_error(layout),
    }
}

fn capacity_overflow() -> ! {
    panic!("capacity overflow");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_buffer_new_does_not_allocate() {
        let buf = RawBuffer::<u32>::new();
        assert_eq!(buf.capacity(), 0);

        let buf = RawBuffer::<u32>::with_capacity(0);
        assert_eq!(buf.capacity(), 0);
    }

    #[test]
    fn raw_buffer_with_capacity_is_exact() {
        let buf = RawBuffer::<u64>::with_capacity(21);
        assert_eq!(buf.capacity(), 21);
        assert!(!buf.as_ptr().is_null());
    }

    #[test]
    fn raw_buffer_zero_sized_elements() {
        let buf = RawBuffer::<()>::with_capacity(128);
        assert_eq!(buf.capacity(), usize::MAX);
    }

    #[test]
    fn raw_buffer_offset_addresses_slots() {
        let buf = RawBuffer::<u32>::with_capacity(4);
        unsafe {
            for i in 0..4 {
                ptr::write(buf.offset(i), i as u32 * 10);
            }
            assert_eq!(ptr::read(buf.offset(2)), 20);
        }
        assert_eq!(buf.offset(3), unsafe { buf.as_mut_ptr().add(3) });
    }

    #[test]
    fn raw_buffer_swap() {
        let mut a = RawBuffer::<u8>::with_capacity(4);
        let mut b = RawBuffer::<u8>::new();
        let a_ptr = a.as_ptr();

        a.swap(&mut b);
        assert_eq!(a.capacity(), 0);
        assert_eq!(b.capacity(), 4);
        assert_eq!(b.as_ptr(), a_ptr);
    }

    #[test]
    fn raw_buffer_capacity_overflow() {
        let res = RawBuffer::<u64>::try_with_capacity(usize::MAX / 2);
        assert_eq!(res.err(), Some(TryReserveError::CapacityOverflow));
    }

    #[test]
    fn raw_buffer_reserve() {
        let mut buf = RawBuffer::<u32>::new();
        buf.reserve(0, 10);
        assert_eq!(buf.capacity(), 10);

        // Already sufficient, must not move the block.
        let ptr = buf.as_ptr();
        buf.reserve(3, 4);
        assert_eq!(buf.as_ptr(), ptr);
        assert_eq!(buf.capacity(), 10);

        // Amortized growth doubles rather than creeping by one slot.
        buf.reserve(10, 1);
        assert_eq!(buf.capacity(), 20);
    }

    #[test]
    fn raw_buffer_reserve_exact() {
        let mut buf = RawBuffer::<u32>::new();
        buf.reserve_exact(0, 10);
        assert_eq!(buf.capacity(), 10);

        buf.reserve_exact(10, 1);
        assert_eq!(buf.capacity(), 11);
    }

    #[test]
    fn raw_buffer_try_reserve_error() {
        let mut buf = RawBuffer::<u64>::new();
        assert_eq!(buf.try_reserve(0, usize::MAX / 2), Err(TryReserveError::CapacityOverflow));
        assert_eq!(buf.capacity(), 0);

        let mut buf = RawBuffer::<()>::new();
        assert_eq!(buf.try_reserve(usize::MAX, 1), Err(TryReserveError::CapacityOverflow));
    }
}
