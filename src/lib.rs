//! A contiguous growable array type built on top of its own raw storage layer.
//!
//! The crate is split into two layers, mirroring the classic separation between
//! raw memory and typed object lifetime:
//!
//! - [`RawBuffer`] owns an uninitialized, correctly aligned block of memory
//!   sized for an exact number of elements. It never inspects the memory it
//!   manages: dropping it frees the block, but runs no element destructors.
//! - [`DynArray`] owns one `RawBuffer` plus a live-element count, and is
//!   responsible for constructing, moving, cloning, and dropping elements.
//!
//! `DynArray` provides *O*(1) indexing, amortized *O*(1) push (to the end),
//! and *O*(1) pop (from the back), with the usual contiguous-container
//! guarantee: slots `[0, len)` hold live values, slots `[len, capacity)` are
//! uninitialized scratch space.
//!
//! Every mutating operation is panic safe: if an element's `clone`, a user
//! closure, or an allocation fails mid-operation, the array is left in a
//! valid, leak-free state, and for the resize/clone family the previously
//! live elements and length are exactly what they were before the call.
//!
//! ```
//! use dynarray::{dynarray, DynArray};
//!
//! let mut arr = dynarray![1, 2, 3];
//! arr.push(4);
//! arr.insert(0, 0);
//!
//! assert_eq!(arr, [0, 1, 2, 3, 4]);
//! assert_eq!(arr.pop(), Some(4));
//! ```

use core::alloc::Layout;
use core::fmt;

mod dyn_array;
mod raw_buffer;

pub use dyn_array::{DynArray, IntoIter};
pub use raw_buffer::RawBuffer;

//--------------------------------------------------------------

/// The error returned when a fallible reservation or construction fails.
///
/// The infallible entry points (`push`, `reserve`, `with_capacity`, ...)
/// funnel the same two cases into a panic or an allocation-error abort
/// instead of returning them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TryReserveError {
    /// The computed capacity exceeded `isize::MAX` bytes.
    CapacityOverflow,
    /// The allocator refused to provide a block with the given layout.
    AllocError(Layout),
}

impl fmt::Display for TryReserveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityOverflow => {
                f.write_str("requested capacity exceeds the maximum supported size")
            },
            Self::AllocError(layout) => {
                write!(f, "memory allocation of {} bytes failed", layout.size())
            },
        }
    }
}

impl std::error::Error for TryReserveError {}

//--------------------------------------------------------------

macro_rules! impl_slice_partial_eq {
    ([$($vars:tt)*] $lhs:ty, $rhs:ty) => {
        impl<T, U, $($vars)*> PartialEq<$rhs> for $lhs where
            T: PartialEq<U>
        {
            #[inline]
            fn eq(&self, other: &$rhs) -> bool { self[..] == other[..] }
            #[inline]
            fn ne(&self, other: &$rhs) -> bool { self[..] != other[..] }
        }
    };
}
pub(crate) use impl_slice_partial_eq;

/// Creates a [`DynArray`] containing the arguments.
///
/// `dynarray!` allows `DynArray`s to be defined with the same syntax as array
/// expressions:
///
/// ```
/// use dynarray::dynarray;
///
/// let arr = dynarray![1, 2, 3];
/// assert_eq!(arr, [1, 2, 3]);
///
/// let arr = dynarray![7; 4];
/// assert_eq!(arr, [7, 7, 7, 7]);
/// ```
#[macro_export]
macro_rules! dynarray {
    () => {
        $crate::DynArray::new()
    };
    ($elem:expr; $n:expr) => {
        {
            let n = $n;
            let mut arr = $crate::DynArray::with_capacity(n);
            arr.resize(n, $elem);
            arr
        }
    };
    ($($val:expr),+ $(,)?) => {
        {
            let mut arr = $crate::DynArray::with_capacity(0usize $(+ { _ = stringify!($val); 1 })*);
            $(
                arr.push($val);
            )*
            arr
        }
    };
}

//--------------------------------------------------------------

// Compile-time checks of the container's auto-trait and non-impl invariants.
use static_assertions::{assert_impl_all, assert_not_impl_any};

assert_impl_all!(DynArray<u8>: Send, Sync);
assert_impl_all!(IntoIter<u8>: Send, Sync);
assert_not_impl_any!(RawBuffer<u8>: Clone);
assert_not_impl_any!(DynArray<*const u8>: Send, Sync);
