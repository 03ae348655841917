use core::{
    cmp,
    fmt,
    hash::{Hash, Hasher},
    mem::{self, ManuallyDrop},
    ops::{Deref, DerefMut, Index, IndexMut},
    ptr,
    slice::{self, SliceIndex},
};

use scopeguard::ScopeGuard;

use crate::{impl_slice_partial_eq, raw_buffer::RawBuffer, TryReserveError};

mod into_iter;
pub use into_iter::IntoIter;


/// A contiguous growable array type with *O*(1) indexing, amortized *O*(1)
/// push (to the end), and *O*(1) pop (from the back).
///
/// # Examples
///
/// ```
/// use dynarray::DynArray;
///
/// let mut arr = DynArray::new();
/// arr.push(1);
/// arr.push(2);
///
/// assert_eq!(arr.len(), 2);
/// assert_eq!(arr[0], 1);
///
/// arr[0] = 7;
/// assert_eq!(arr[0], 7);
///
/// arr.extend([1, 2, 3]);
/// assert_eq!(arr, [7, 2, 1, 2, 3]);
/// ```
///
/// The [`dynarray!`](crate::dynarray) macro is provided for convenient
/// initialization:
///
/// ```
/// use dynarray::dynarray;
///
/// let mut arr1 = dynarray![1, 2, 3];
/// arr1.push(4);
/// let arr2 = dynarray![1, 2, 3, 4];
/// assert_eq!(arr1, arr2);
/// ```
///
/// # Capacity and reallocation
///
/// The capacity of a dynamic array is the amount of space allocated for any
/// future elements that will be added to it. This is not to be confused with
/// the *length*, which is the number of live elements. If the length is about
/// to exceed the capacity, the array reallocates: a fresh block is obtained
/// from [`RawBuffer`], the live elements are relocated into it, and only then
/// is the old block released. Slots `[0, len)` always hold live values and
/// slots `[len, capacity)` are uninitialized scratch space.
///
/// Growth doubles the capacity (`max(1, 2 * capacity)`), so repeatedly
/// pushing into an empty array produces the capacity ladder 1, 2, 4, 8, ...
/// and a reallocation happens only when `len == capacity`. The array never
/// shrinks its capacity on its own; the only way to lose capacity is to move
/// the whole value away (e.g. [`mem::take`]).
///
/// # Panic safety
///
/// Operations that run element code (`clone`, `default`, user closures)
/// guarantee that a panic escaping that code leaves the array in a valid,
/// leak-free state. For the resize/clone family the guarantee is strong: the
/// length and the previously live elements are exactly what they were before
/// the call, though the capacity may already have grown.
pub struct DynArray<T> {
    buf: RawBuffer<T>,
    len: usize,
}

impl<T> DynArray<T> {
    /// Constructs a new, empty `DynArray<T>`.
    ///
    /// The array will not allocate until elements are pushed onto it.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { buf: RawBuffer::new(), len: 0 }
    }

    /// Constructs a new, empty `DynArray<T>` with exactly the specified
    /// capacity.
    ///
    /// If `capacity` is 0, the array will not allocate. For a zero-sized `T`
    /// there is no allocation either, and the capacity is always
    /// `usize::MAX`.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { buf: RawBuffer::with_capacity(capacity), len: 0 }
    }

    /// Tries to construct a new, empty `DynArray<T>` with exactly the
    /// specified capacity.
    ///
    /// # Errors
    ///
    /// Returns an error if the capacity exceeds `isize::MAX` bytes, or if the
    /// allocator reports a failure.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        Ok(Self { buf: RawBuffer::try_with_capacity(capacity)?, len: 0 })
    }

    /// Returns the total number of elements the array can hold without
    /// reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Returns the number of elements in the array, also referred to as its
    /// 'length'.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the array contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reserves capacity for at least `additional` more elements. The array
    /// may reserve more space to speculatively avoid frequent reallocations;
    /// does nothing if the capacity is already sufficient.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynarray::dynarray;
    ///
    /// let mut arr = dynarray![1];
    /// arr.reserve(10);
    /// assert!(arr.capacity() >= 11);
    /// ```
    pub fn reserve(&mut self, additional: usize) {
        self.buf.reserve(self.len, additional);
    }

    /// Reserves capacity for exactly `additional` more elements, without the
    /// amortization slack of [`reserve`](DynArray::reserve). Does nothing if
    /// the capacity is already sufficient.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` bytes.
    pub fn reserve_exact(&mut self, additional: usize) {
        self.buf.reserve_exact(self.len, additional);
    }

    /// The same as [`reserve`](DynArray::reserve), but returns on error
    /// instead of panicking or aborting. The array is untouched when an
    /// error is returned.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.buf.try_reserve(self.len, additional)
    }

    /// The same as [`reserve_exact`](DynArray::reserve_exact), but returns on
    /// error instead of panicking or aborting.
    pub fn try_reserve_exact(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.buf.try_reserve_exact(self.len, additional)
    }

    /// Shortens the array, keeping the first `len` elements and dropping the
    /// rest. Has no effect if `len` is greater than or equal to the array's
    /// current length, and never touches the capacity.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        // SAFETY:
        // - The slice passed to `drop_in_place` is valid; the `len >= self.len`
        //   case above avoids creating an invalid slice.
        // - The length is shrunk before the destructors run, so a panicking
        //   `Drop` cannot cause an element to be dropped twice.
        unsafe {
            let remaining_len = self.len - len;
            let s = ptr::slice_from_raw_parts_mut(self.as_mut_ptr().add(len), remaining_len);
            self.len = len;
            ptr::drop_in_place(s);
        }
    }

    /// Clears the array, dropping all values. The allocated capacity is kept.
    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Extracts a slice containing the entire array. Equivalent to `&arr[..]`.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self
    }

    /// Extracts a mutable slice of the entire array. Equivalent to
    /// `&mut arr[..]`.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }

    /// Returns a raw pointer to the array's buffer, or a dangling pointer
    /// valid for zero-sized reads if the array didn't allocate.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.buf.as_ptr()
    }

    /// Returns a raw mutable pointer to the array's buffer, or a dangling
    /// pointer valid for zero-sized reads if the array didn't allocate.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.as_mut_ptr()
    }

    /// Forces the length of the array to `new_len`.
    ///
    /// This is a low-level operation that maintains none of the normal
    /// invariants of the type; normally changing the length is done using one
    /// of the safe operations instead.
    ///
    /// # Safety
    ///
    /// - `new_len` must be less than or equal to [`capacity`](DynArray::capacity).
    /// - The elements at `old_len..new_len` must be initialized.
    #[inline]
    pub unsafe fn set_len(&mut self, new_len: usize) {
        debug_assert!(new_len <= self.capacity());
        self.len = new_len;
    }

    /// Appends an element to the back of the array.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` bytes.
    ///
    /// # Time complexity
    ///
    /// Takes amortized *O*(1) time: growth doubles the capacity, and the
    /// freshly built replacement block adopts the live elements before the
    /// old block is released.
    pub fn push(&mut self, value: T) {
        // Inform codegen that the length does not change across grow_one.
        let len = self.len;
        if len == self.buf.capacity() {
            self.buf.grow_one(len);
        }
        // SAFETY: slot `len` is within capacity and uninitialized.
        unsafe {
            ptr::write(self.buf.offset(len), value);
            self.len = len + 1;
        }
    }

    /// Removes the last element from the array and returns it, or [`None`]
    /// if it is empty. Never reallocates, never fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynarray::dynarray;
    ///
    /// let mut arr = dynarray![1, 2, 3];
    /// assert_eq!(arr.pop(), Some(3));
    /// assert_eq!(arr, [1, 2]);
    /// ```
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            None
        } else {
            // SAFETY: slot `len - 1` holds a live value, and shrinking the
            // length first hands exclusive ownership of it to the caller.
            unsafe {
                self.len -= 1;
                Some(ptr::read(self.buf.offset(self.len)))
            }
        }
    }

    /// Inserts an element at position `index`, shifting all elements after
    /// it to the right.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynarray::dynarray;
    ///
    /// let mut arr = dynarray![1, 2, 3];
    /// arr.insert(1, 4);
    /// assert_eq!(arr, [1, 4, 2, 3]);
    /// arr.insert(4, 5);
    /// assert_eq!(arr, [1, 4, 2, 3, 5]);
    /// ```
    ///
    /// # Time complexity
    ///
    /// Takes *O*(len) time: all elements after the insertion index are
    /// shifted one slot, as a single raw copy that cannot fail part-way.
    pub fn insert(&mut self, index: usize, element: T) {
        #[cold]
        #[track_caller]
        fn assert_failed(index: usize, len: usize) -> ! {
            panic!("insertion index (is {index}) should be <= len (is {len})");
        }

        let len = self.len;
        if index > len {
            assert_failed(index, len);
        }

        // Space for the new element.
        if len == self.buf.capacity() {
            self.buf.grow_one(len);
        }

        unsafe {
            // Infallible from here on.
            {
                let p = self.buf.offset(index);
                if index < len {
                    // Shift everything over to make space, duplicating the
                    // `index`th element into two consecutive places.
                    ptr::copy(p, p.add(1), len - index);
                }
                // Write it in, overwriting the first copy of the `index`th
                // element.
                ptr::write(p, element);
            }
            self.set_len(len + 1);
        }
    }

    /// Removes and returns the element at position `index`, shifting all
    /// elements after it to the left.
    ///
    /// Note: because this shifts over the remaining elements, it has a
    /// worst-case performance of *O*(len). If you don't need the order of
    /// elements to be preserved, use [`swap_remove`](DynArray::swap_remove)
    /// instead. The element that followed the removed one ends up at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynarray::dynarray;
    ///
    /// let mut arr = dynarray![1, 2, 3];
    /// assert_eq!(arr.remove(1), 2);
    /// assert_eq!(arr, [1, 3]);
    /// ```
    #[track_caller]
    pub fn remove(&mut self, index: usize) -> T {
        #[cold]
        #[track_caller]
        fn assert_failed(index: usize, len: usize) -> ! {
            panic!("removal index (is {index}) should be < len (is {len})");
        }

        let len = self.len;
        if index >= len {
            assert_failed(index, len);
        }
        unsafe {
            // Infallible from here on.
            let ret;
            {
                // The place we are taking from.
                let p = self.buf.offset(index);
                // Copy it out, temporarily having a copy of the value on the
                // stack and in the array at the same time.
                ret = ptr::read(p);
                // Shift everything down to fill in that spot.
                ptr::copy(p.add(1), p, len - index - 1);
            }
            self.set_len(len - 1);
            ret
        }
    }

    /// Removes an element from the array and returns it, replacing it with
    /// the last element.
    ///
    /// This does not preserve the ordering of the remaining elements, but is
    /// *O*(1). If you need to preserve the element order, use
    /// [`remove`](DynArray::remove) instead.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn swap_remove(&mut self, index: usize) -> T {
        #[cold]
        #[track_caller]
        fn assert_failed(index: usize, len: usize) -> ! {
            panic!("swap_remove index (is {index}) should be < len (is {len})");
        }

        let len = self.len;
        if index >= len {
            assert_failed(index, len);
        }
        unsafe {
            // We replace self[index] with the last element. Note that if the
            // bounds check above succeeds there must be a last element (which
            // can be self[index] itself).
            let value = ptr::read(self.buf.offset(index));
            ptr::copy(self.buf.offset(len - 1), self.buf.offset(index), 1);
            self.set_len(len - 1);
            value
        }
    }

    /// Resizes the array in place so that its length equals `new_len`.
    ///
    /// If `new_len` is greater than the current length, the array is extended
    /// by the difference, each additional slot filled with the result of
    /// calling the closure `f`. If `new_len` is less than the current length,
    /// the array is simply truncated.
    ///
    /// If `f` panics, the elements it already produced are dropped and the
    /// length is restored to what it was before the call.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynarray::dynarray;
    ///
    /// let mut arr = dynarray![1, 2, 3];
    /// let mut i = 4;
    /// arr.resize_with(6, || { let res = i; i *= 2; res });
    /// assert_eq!(arr, [1, 2, 3, 4, 8, 16]);
    /// ```
    pub fn resize_with<F>(&mut self, new_len: usize, f: F) where
        F: FnMut() -> T
    {
        let len = self.len;
        if new_len > len {
            self.extend_constructed(new_len - len, f);
        } else {
            self.truncate(new_len);
        }
    }

    // Appends `n` values produced by `f`, rolling the length back and
    // dropping the partial suffix if a call panics.
    fn extend_constructed<F>(&mut self, n: usize, mut f: F) where
        F: FnMut() -> T
    {
        self.reserve(n);

        let start = self.len;
        let mut guard = scopeguard::guard(self, move |arr| arr.truncate(start));
        unsafe {
            let mut p = guard.as_mut_ptr().add(start);
            for _ in 0..n {
                ptr::write(p, f());
                p = p.add(1);
                // The closure can panic, so the length has to track every
                // completed write.
                guard.len += 1;
            }
        }
        let _ = ScopeGuard::into_inner(guard);
    }

    // Leaf method the iterator-driven extend paths delegate to. This is the
    // moral equivalent of `for item in iter { self.push(item) }`, hoisting
    // the reservation out of the loop where the size hint allows.
    fn extend_desugared<I: Iterator<Item = T>>(&mut self, mut iter: I) {
        while let Some(element) = iter.next() {
            let len = self.len;
            if len == self.capacity() {
                let (lower, _) = iter.size_hint();
                self.reserve(lower.saturating_add(1));
            }
            unsafe {
                ptr::write(self.as_mut_ptr().add(len), element);
                // Since `next()` executes user code which can panic, the
                // length has to be bumped after each step.
                self.len = len + 1;
            }
        }
    }
}

impl<T: Default> DynArray<T> {
    /// Constructs a `DynArray<T>` with `len` default-constructed elements.
    ///
    /// Allocates exactly `len` slots. If one of the `T::default()` calls
    /// panics, the elements built so far are dropped and the block is
    /// released; nothing leaks.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynarray::DynArray;
    ///
    /// let arr = DynArray::<u32>::with_len(3);
    /// assert_eq!(arr, [0, 0, 0]);
    /// assert_eq!(arr.capacity(), 3);
    /// ```
    #[must_use]
    pub fn with_len(len: usize) -> Self {
        let mut arr = Self::with_capacity(len);
        arr.resize_with(len, T::default);
        arr
    }
}

impl<T: Clone> DynArray<T> {
    /// Resizes the array in place so that its length equals `new_len`.
    ///
    /// If `new_len` is greater than the current length, the array is extended
    /// by the difference, each additional slot filled with a clone of
    /// `value`. If `new_len` is less than the current length, the array is
    /// simply truncated.
    ///
    /// If a clone panics, the clones made so far are dropped and the length
    /// is restored to what it was before the call, leaving the previously
    /// live elements untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynarray::dynarray;
    ///
    /// let mut arr = dynarray!["hello"];
    /// arr.resize(3, "world");
    /// assert_eq!(arr, ["hello", "world", "world"]);
    ///
    /// let mut arr = dynarray![1, 2, 3, 4];
    /// arr.resize(2, 0);
    /// assert_eq!(arr, [1, 2]);
    /// ```
    pub fn resize(&mut self, new_len: usize, value: T) {
        let len = self.len;
        if new_len > len {
            self.extend_with(new_len - len, value);
        } else {
            self.truncate(new_len);
        }
    }

    /// Clones and appends all elements in a slice to the array, in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynarray::dynarray;
    ///
    /// let mut arr = dynarray![1];
    /// arr.extend_from_slice(&[2, 3, 4]);
    /// assert_eq!(arr, [1, 2, 3, 4]);
    /// ```
    pub fn extend_from_slice(&mut self, other: &[T]) {
        self.reserve(other.len());

        let start = self.len;
        let mut guard = scopeguard::guard(self, move |arr| arr.truncate(start));
        unsafe {
            let mut p = guard.as_mut_ptr().add(start);
            for value in other {
                ptr::write(p, value.clone());
                p = p.add(1);
                guard.len += 1;
            }
        }
        let _ = ScopeGuard::into_inner(guard);
    }

    // Extends the array by `n` clones of `value`; the last slot takes
    // `value` itself instead of an extra clone.
    fn extend_with(&mut self, n: usize, value: T) {
        self.reserve(n);

        let start = self.len;
        let mut guard = scopeguard::guard(self, move |arr| arr.truncate(start));
        unsafe {
            let mut p = guard.as_mut_ptr().add(start);
            for _ in 1..n {
                ptr::write(p, value.clone());
                p = p.add(1);
                guard.len += 1;
            }
            if n > 0 {
                ptr::write(p, value);
                guard.len += 1;
            }
        }
        let _ = ScopeGuard::into_inner(guard);
    }
}

//--------------------------------------------------------------

impl<T> Deref for DynArray<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len) }
    }
}

impl<T> DerefMut for DynArray<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), self.len) }
    }
}

impl<T: Clone> Clone for DynArray<T> {
    /// Allocates exactly `self.len()` slots and clones each element into
    /// them. If one of the clones panics, the partial copy is dropped and its
    /// block released; `self` is never touched.
    fn clone(&self) -> Self {
        let mut arr = Self::with_capacity(self.len);
        arr.extend_from_slice(self);
        arr
    }

    /// Overwrites the contents of `self` with a clone of the contents of
    /// `source`, reusing `self`'s existing capacity when it suffices.
    ///
    /// - `source` is longer than `self`'s capacity: a full temporary clone is
    ///   built and swapped in, so a panicked clone cannot leave `self`
    ///   partially overwritten.
    /// - otherwise: the overlapping prefix is cloned element-wise, then the
    ///   excess tail is either dropped (`source` shorter) or clone-
    ///   constructed into the uninitialized slots (`source` longer).
    fn clone_from(&mut self, source: &Self) {
        if source.len > self.capacity() {
            *self = source.clone();
            return;
        }

        let min = cmp::min(self.len, source.len);
        for (dst, src) in self.as_mut_slice()[..min].iter_mut().zip(&source.as_slice()[..min]) {
            dst.clone_from(src);
        }

        if self.len > source.len {
            self.truncate(source.len);
        } else {
            self.extend_from_slice(&source[min..]);
        }
    }
}

impl<T> Drop for DynArray<T> {
    fn drop(&mut self) {
        // Drop the live elements through the weakest necessary type; the
        // `RawBuffer` field handles deallocation afterwards.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.as_mut_ptr(), self.len));
        }
    }
}

impl<T> Default for DynArray<T> {
    /// Creates an empty `DynArray<T>`, without allocating.
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for DynArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

impl<T: Hash> Hash for DynArray<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Hash::hash(&**self, state)
    }
}

impl<T, I: SliceIndex<[T]>> Index<I> for DynArray<T> {
    type Output = I::Output;

    #[inline]
    fn index(&self, index: I) -> &Self::Output {
        Index::index(&**self, index)
    }
}

impl<T, I: SliceIndex<[T]>> IndexMut<I> for DynArray<T> {
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        IndexMut::index_mut(&mut **self, index)
    }
}

impl<T> AsRef<[T]> for DynArray<T> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T> AsMut<[T]> for DynArray<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T> AsRef<DynArray<T>> for DynArray<T> {
    fn as_ref(&self) -> &DynArray<T> {
        self
    }
}

impl<T> AsMut<DynArray<T>> for DynArray<T> {
    fn as_mut(&mut self) -> &mut DynArray<T> {
        self
    }
}

impl<T: Clone> From<&[T]> for DynArray<T> {
    /// Allocates a `DynArray<T>` and fills it by cloning the slice's items.
    fn from(s: &[T]) -> Self {
        let mut arr = Self::with_capacity(s.len());
        arr.extend_from_slice(s);
        arr
    }
}

impl<T: Clone, const N: usize> From<&[T; N]> for DynArray<T> {
    fn from(s: &[T; N]) -> Self {
        Self::from(s.as_slice())
    }
}

impl<T, const N: usize> From<[T; N]> for DynArray<T> {
    /// Moves the array's elements into a freshly allocated `DynArray<T>`.
    fn from(value: [T; N]) -> Self {
        let mut arr = Self::with_capacity(N);
        // SAFETY: the source is inhibited from dropping, so each element is
        // owned by exactly one place after the copy.
        unsafe {
            let value = ManuallyDrop::new(value);
            ptr::copy_nonoverlapping(value.as_ptr(), arr.as_mut_ptr(), N);
            arr.set_len(N);
        }
        arr
    }
}

impl<T> FromIterator<T> for DynArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut arr = Self::new();
        arr.extend_desugared(iter.into_iter());
        arr
    }
}

impl<T> Extend<T> for DynArray<T> {
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.extend_desugared(iter.into_iter());
    }
}

/// Extend implementation that copies elements out of references before
/// pushing them onto the array.
impl<'a, T: Copy + 'a> Extend<&'a T> for DynArray<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend_desugared(iter.into_iter().copied());
    }
}

impl<T> IntoIterator for DynArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Creates a consuming iterator, that is, one that moves each value out
    /// of the array (from start to end). The array cannot be used after
    /// calling this.
    #[inline]
    fn into_iter(self) -> IntoIter<T> {
        let me = ManuallyDrop::new(self);
        // SAFETY: the buffer ownership moves into the iterator, and `me` is
        // inhibited from dropping, so nothing is freed or dropped twice.
        unsafe {
            let buf = ptr::read(&me.buf);
            let ptr = buf.as_ptr();
            let end = if mem::size_of::<T>() == 0 {
                // `end` doubles as the remaining count for zero-sized types.
                ptr.wrapping_byte_add(me.len)
            } else {
                ptr.add(me.len)
            };
            IntoIter { buf, ptr, end }
        }
    }
}

impl<'a, T> IntoIterator for &'a DynArray<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynArray<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl_slice_partial_eq!([] DynArray<T>, DynArray<U>);
impl_slice_partial_eq!([] DynArray<T>, &[U]);
impl_slice_partial_eq!([] DynArray<T>, &mut [U]);
impl_slice_partial_eq!([] DynArray<T>, [U]);
impl_slice_partial_eq!([const N: usize] DynArray<T>, [U; N]);
impl_slice_partial_eq!([const N: usize] DynArray<T>, &[U; N]);

impl<T: Eq> Eq for DynArray<T> {}

impl<T: PartialOrd> PartialOrd for DynArray<T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        PartialOrd::partial_cmp(&**self, &**other)
    }
}

impl<T: Ord> Ord for DynArray<T> {
    #[inline]
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        Ord::cmp(&**self, &**other)
    }
}
