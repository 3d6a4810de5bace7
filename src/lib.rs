//! Packs and unpacks fixed-width numbers and text into caller-supplied byte buffers.
//!
//! The crate has three layers:
//!
//! * [`byte_codec`] converts scalars (`u8` through `u64`, `i8` through `i64`, `f32`, `f64`) to
//!   and from bytes at an offset, in either [`ByteOrder`].
//! * [`text`] converts strings to and from bytes in one of four [`TextEncoding`]s, and computes
//!   the encoded length of a string without encoding it.
//! * [`BinaryCursor`] tracks separate read and write offsets over one buffer, plus the length of
//!   the data written so far, so that a record can be written field by field and read back in
//!   the same order.
//!
//! Length-prefixed framing is up to the caller: write the byte count of a string (see
//! [`text::byte_count_str`]) and then the string, or use [`BinaryCursor::write_prefixed_str`]
//! to do both.
//!
//! The buffer is never resized. Accessing bytes outside it panics, except through the checked
//! `try_*` methods, which return an [`Error`].

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![forbid(unsafe_code)]
#![forbid(unused_must_use)]
#![warn(missing_docs)]

extern crate alloc;

pub mod byte_codec;
mod cursor;
mod error;
pub mod text;


pub use byte_codec::{ByteOrder, Scalar};
pub use cursor::{BinaryCursor, PrefixWidth};
pub use error::{Error, Result};
pub use text::{TextCodec, TextEncoding};
