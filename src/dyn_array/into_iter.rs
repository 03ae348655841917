use core::{
    fmt,
    iter::FusedIterator,
    mem,
    ptr::{self, NonNull},
    slice,
};

use crate::raw_buffer::RawBuffer;
use super::DynArray;

/// An iterator that moves out of a dynamic array.
///
/// This struct is created by the `into_iter` method on
/// [`DynArray`](super::DynArray) (provided by the [`IntoIterator`] trait).
///
/// # Examples
///
/// ```
/// use dynarray::dynarray;
///
/// let arr = dynarray![0, 1, 2];
/// let iter: dynarray::IntoIter<_> = arr.into_iter();
/// ```
pub struct IntoIter<T> {
    // Owns the allocation; freed when the iterator drops.
    pub(super) buf: RawBuffer<T>,
    pub(super) ptr: *const T,
    // For zero-sized types `end` is `ptr` byte-offset by the remaining
    // count, since those pointers never compare unequal otherwise.
    pub(super) end: *const T,
}

impl<T> IntoIter<T> {
    /// Returns the remaining items of this iterator as a slice.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynarray::dynarray;
    ///
    /// let arr = dynarray!['a', 'b', 'c'];
    /// let mut into_iter = arr.into_iter();
    /// assert_eq!(into_iter.as_slice(), &['a', 'b', 'c']);
    /// let _ = into_iter.next().unwrap();
    /// assert_eq!(into_iter.as_slice(), &['b', 'c']);
    /// ```
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.ptr, self.remaining()) }
    }

    /// Returns the remaining items of this iterator as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { &mut *self.as_raw_mut_slice() }
    }

    fn as_raw_mut_slice(&mut self) -> *mut [T] {
        ptr::slice_from_raw_parts_mut(self.ptr as *mut T, self.remaining())
    }

    #[inline]
    fn remaining(&self) -> usize {
        if mem::size_of::<T>() == 0 {
            (self.end as usize).wrapping_sub(self.ptr as usize)
        } else {
            // SAFETY: `ptr` and `end` stay within the one allocation.
            unsafe { self.end.offset_from(self.ptr) as usize }
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        if self.ptr == self.end {
            None
        } else if mem::size_of::<T>() == 0 {
            self.end = self.end.wrapping_byte_sub(1);
            // SAFETY: reading a zero-sized value ignores the pointer, which
            // only has to be aligned and non-null.
            Some(unsafe { ptr::read(NonNull::dangling().as_ptr()) })
        } else {
            let old = self.ptr;
            // SAFETY: `old < end`, so the slot holds a live value, and
            // advancing first ensures it is read out exactly once.
            unsafe {
                self.ptr = old.add(1);
                Some(ptr::read(old))
            }
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.remaining();
        (len, Some(len))
    }

    #[inline]
    fn count(self) -> usize {
        // Dropping `self` cleans up the unconsumed elements.
        self.remaining()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        if self.ptr == self.end {
            None
        } else if mem::size_of::<T>() == 0 {
            self.end = self.end.wrapping_byte_sub(1);
            Some(unsafe { ptr::read(NonNull::dangling().as_ptr()) })
        } else {
            // SAFETY: `ptr < end`, so stepping `end` back lands on a live
            // value that no forward step will read again.
            unsafe {
                self.end = self.end.sub(1);
                Some(ptr::read(self.end))
            }
        }
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> AsRef<[T]> for IntoIter<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T: Clone> Clone for IntoIter<T> {
    fn clone(&self) -> Self {
        self.as_slice().iter().cloned().collect::<DynArray<T>>().into_iter()
    }
}

impl<T> Default for IntoIter<T> {
    /// Creates an empty `dynarray::IntoIter`.
    fn default() -> Self {
        DynArray::new().into_iter()
    }
}

// The raw pointers keep the compiler from deriving these; they only ever
// point into the owned buffer.
unsafe impl<T: Send> Send for IntoIter<T> {}
unsafe impl<T: Sync> Sync for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        // Drop the unconsumed elements; the `RawBuffer` field frees the
        // block afterwards.
        unsafe {
            ptr::drop_in_place(self.as_raw_mut_slice());
        }
    }
}
