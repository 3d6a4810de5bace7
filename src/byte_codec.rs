//! Conversion between fixed-width scalars and their byte representation.
//!
//! Every function here writes or reads at an explicit offset into a caller-supplied slice, and
//! none of them check bounds beyond what slice indexing does: an offset or length that does not
//! fit in the slice panics.

use zerocopy::{FromBytes, Immutable, IntoBytes};

/// The order in which the bytes of a multi-byte value are stored.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Hash)]
pub enum ByteOrder {
    /// Least-significant byte first. This is the default for every cursor operation.
    #[default]
    LittleEndian,
    /// Most-significant byte first ("network order").
    BigEndian,
}

impl ByteOrder {
    /// The byte order of the host.
    pub const fn native() -> Self {
        if NATIVE_LITTLE_ENDIAN {
            Self::LittleEndian
        } else {
            Self::BigEndian
        }
    }

    /// Returns `true` if bytes in this order must be reversed to match the host's in-memory
    /// representation.
    #[inline(always)]
    pub const fn is_foreign(self) -> bool {
        match self {
            Self::LittleEndian => !NATIVE_LITTLE_ENDIAN,
            Self::BigEndian => NATIVE_LITTLE_ENDIAN,
        }
    }
}

const NATIVE_LITTLE_ENDIAN: bool = probe_native_little_endian();

const fn probe_native_little_endian() -> bool {
    // The least-significant byte of 1 comes first in memory on little-endian hosts.
    1u32.to_ne_bytes()[0] == 1
}

/// Returns `true` if the host stores multi-byte values least-significant byte first.
///
/// The answer is probed once, at compile time, and is a constant for the life of the process.
#[inline(always)]
pub const fn is_native_little_endian() -> bool {
    NATIVE_LITTLE_ENDIAN
}

mod sealed {
    pub trait Sealed {}
}

/// A fixed-width numeric type that can be encoded into a buffer.
///
/// Implemented for `u8`, `i8`, `u16`, `i16`, `u32`, `i32`, `u64`, `i64`, `f32` and `f64`.
/// `bool` is deliberately absent; it has its own one-byte encoding on the cursor.
pub trait Scalar: sealed::Sealed + FromBytes + IntoBytes + Immutable + Copy {
    /// Size of the encoded value, in bytes.
    const SIZE: usize;
}

macro_rules! scalar {
    ($($t:ty)*) => {$(
        impl sealed::Sealed for $t {}

        impl Scalar for $t {
            const SIZE: usize = core::mem::size_of::<$t>();
        }
    )*};
}

scalar! {
    u8 i8 u16 i16 u32 i32 u64 i64 f32 f64
}

/// Writes `value` into `buffer[offset..offset + T::SIZE]` using the given byte order.
///
/// Panics if the range does not fit in `buffer`.
#[inline]
pub fn encode<T: Scalar>(value: T, buffer: &mut [u8], offset: usize, order: ByteOrder) {
    buffer[offset..offset + T::SIZE].copy_from_slice(value.as_bytes());
    if order.is_foreign() {
        reverse_bytes(buffer, offset, T::SIZE);
    }
}

/// Reads a `T` from `buffer[offset..offset + T::SIZE]`, interpreting the bytes in the given
/// byte order. The offset does not need to be aligned.
///
/// Panics if the range does not fit in `buffer`.
#[inline]
pub fn decode<T: Scalar>(buffer: &[u8], offset: usize, order: ByteOrder) -> T {
    let mut value = T::new_zeroed();
    let bytes = value.as_mut_bytes();
    bytes.copy_from_slice(&buffer[offset..offset + T::SIZE]);
    if order.is_foreign() {
        bytes.reverse();
    }
    value
}

/// Reverses `buffer[offset..offset + len]` in place.
///
/// Applying this twice to the same range restores the original bytes. Ranges of zero or one
/// byte are left unchanged.
#[inline]
pub fn reverse_bytes(buffer: &mut [u8], offset: usize, len: usize) {
    buffer[offset..offset + len].reverse();
}

/// Copies `len` bytes from `src[src_offset..]` to `dst[dst_offset..]`.
///
/// Panics if either range does not fit in its slice.
#[inline]
pub fn copy_bytes(dst: &mut [u8], dst_offset: usize, src: &[u8], src_offset: usize, len: usize) {
    dst[dst_offset..dst_offset + len].copy_from_slice(&src[src_offset..src_offset + len]);
}
