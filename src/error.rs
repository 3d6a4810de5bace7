use thiserror::Error;

/// Result type for the checked cursor operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error type for the checked (`try_*` and length-prefixed) operations of `BinaryCursor`.
///
/// The unchecked operations do not use this type. They panic on out-of-range access instead.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Error)]
pub enum Error {
    /// A read needs more bytes than the cursor has between its read offset and its length.
    ///
    /// The read offset is not advanced when this is returned.
    #[error("read of {needed} bytes at offset {offset} needs more data, only {available} available")]
    NeedsMoreData {
        /// Read offset at the time of the request.
        offset: usize,
        /// Bytes the read needed.
        needed: usize,
        /// Bytes left before the cursor's length.
        available: usize,
    },

    /// A write would run past the end of the buffer.
    ///
    /// Nothing is written and the write offset is not advanced when this is returned.
    #[error("write of {needed} bytes at offset {offset} overflows a buffer of {capacity} bytes")]
    BufferOverflow {
        /// Write offset at the time of the request.
        offset: usize,
        /// Bytes the write needed.
        needed: usize,
        /// Size of the buffer.
        capacity: usize,
    },

    /// A payload is too long to be described by a length prefix of the requested width.
    #[error("payload of {len} bytes does not fit in a {width}-byte length prefix")]
    PrefixOverflow {
        /// Length of the payload in bytes.
        len: usize,
        /// Width of the length prefix in bytes.
        width: usize,
    },
}
