//! Encodes and decodes text under one of four encodings.
//!
//! Character positions (`char_start`, `char_count`) count Unicode scalar values, i.e. `char`s.
//! A character outside the Basic Multilingual Plane is one `char` even though UTF-16 stores it
//! as a surrogate pair.
//!
//! Decoding never fails. Malformed input is replaced with U+FFFD (or `?` for ASCII), which is
//! the standard fallback of each encoding.

use alloc::string::String;
use core::char::REPLACEMENT_CHARACTER;
use zerocopy::byteorder::{LE, U16, U32};
use zerocopy::FromBytes;

/// Selects how text is converted to bytes.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Hash)]
pub enum TextEncoding {
    /// UTF-8.
    #[default]
    Utf8,
    /// Little-endian UTF-16, without a byte order mark.
    Utf16,
    /// Little-endian UTF-32, without a byte order mark.
    Utf32,
    /// 7-bit ASCII. Characters outside ASCII are encoded as `?`, and bytes above `0x7f` decode
    /// as `?`.
    Ascii,
}

impl TextEncoding {
    /// Returns the codec that implements this encoding.
    pub fn codec(self) -> &'static dyn TextCodec {
        match self {
            Self::Utf8 => &Utf8,
            Self::Utf16 => &Utf16,
            Self::Utf32 => &Utf32,
            Self::Ascii => &Ascii,
        }
    }
}

/// A text encoding.
///
/// For any `text`, `encode` must write exactly `byte_count(text)` bytes. Callers rely on this
/// to size length prefixes before the text is written.
pub trait TextCodec {
    /// Number of bytes `encode` produces for `text`.
    fn byte_count(&self, text: &str) -> usize;

    /// Encodes `text` at the start of `out` and returns the number of bytes written.
    ///
    /// Panics if `out` is shorter than `self.byte_count(text)`.
    fn encode(&self, text: &str, out: &mut [u8]) -> usize;

    /// Decodes all of `bytes`.
    fn decode(&self, bytes: &[u8]) -> String;
}

/// UTF-8 codec.
#[derive(Copy, Clone, Debug, Default)]
pub struct Utf8;

impl TextCodec for Utf8 {
    fn byte_count(&self, text: &str) -> usize {
        text.len()
    }

    fn encode(&self, text: &str, out: &mut [u8]) -> usize {
        out[..text.len()].copy_from_slice(text.as_bytes());
        text.len()
    }

    fn decode(&self, bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

/// Little-endian UTF-16 codec.
#[derive(Copy, Clone, Debug, Default)]
pub struct Utf16;

impl TextCodec for Utf16 {
    fn byte_count(&self, text: &str) -> usize {
        text.chars().map(char::len_utf16).sum::<usize>() * 2
    }

    fn encode(&self, text: &str, out: &mut [u8]) -> usize {
        let mut n = 0;
        for unit in text.encode_utf16() {
            out[n..n + 2].copy_from_slice(&unit.to_le_bytes());
            n += 2;
        }
        n
    }

    fn decode(&self, bytes: &[u8]) -> String {
        let (body, tail) = bytes.split_at(bytes.len() - bytes.len() % 2);
        // U16<LE> has alignment 1 and `body` has an even length, so this cannot fail.
        let units = <[U16<LE>]>::ref_from_bytes(body).unwrap_or_default();

        let mut s: String = char::decode_utf16(units.iter().map(|u| u.get()))
            .map(|c| c.unwrap_or(REPLACEMENT_CHARACTER))
            .collect();
        if !tail.is_empty() {
            s.push(REPLACEMENT_CHARACTER);
        }
        s
    }
}

/// Little-endian UTF-32 codec.
#[derive(Copy, Clone, Debug, Default)]
pub struct Utf32;

impl TextCodec for Utf32 {
    fn byte_count(&self, text: &str) -> usize {
        text.chars().count() * 4
    }

    fn encode(&self, text: &str, out: &mut [u8]) -> usize {
        let mut n = 0;
        for c in text.chars() {
            out[n..n + 4].copy_from_slice(&u32::from(c).to_le_bytes());
            n += 4;
        }
        n
    }

    fn decode(&self, bytes: &[u8]) -> String {
        let (body, tail) = bytes.split_at(bytes.len() - bytes.len() % 4);
        let units = <[U32<LE>]>::ref_from_bytes(body).unwrap_or_default();

        let mut s: String = units
            .iter()
            .map(|u| char::from_u32(u.get()).unwrap_or(REPLACEMENT_CHARACTER))
            .collect();
        if !tail.is_empty() {
            s.push(REPLACEMENT_CHARACTER);
        }
        s
    }
}

/// 7-bit ASCII codec.
#[derive(Copy, Clone, Debug, Default)]
pub struct Ascii;

impl TextCodec for Ascii {
    fn byte_count(&self, text: &str) -> usize {
        text.chars().count()
    }

    fn encode(&self, text: &str, out: &mut [u8]) -> usize {
        let mut n = 0;
        for c in text.chars() {
            out[n] = if c.is_ascii() { c as u8 } else { b'?' };
            n += 1;
        }
        n
    }

    fn decode(&self, bytes: &[u8]) -> String {
        bytes
            .iter()
            .map(|&b| if b.is_ascii() { char::from(b) } else { '?' })
            .collect()
    }
}

/// Returns the part of `text` that starts at character `char_start` and is `char_count`
/// characters long.
///
/// Panics if the range extends past the end of `text`.
pub fn char_range(text: &str, char_start: usize, char_count: usize) -> &str {
    let mut bounds = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(core::iter::once(text.len()));

    let start = bounds.nth(char_start);
    let end = match char_count {
        0 => start,
        n => bounds.nth(n - 1),
    };

    match (start, end) {
        (Some(start), Some(end)) => &text[start..end],
        _ => panic!(
            "characters {char_start}..{} are out of range for a string of {} characters",
            char_start.saturating_add(char_count),
            text.chars().count()
        ),
    }
}

/// Encodes `char_count` characters of `text`, starting at character `char_start`, into `buffer`
/// at `offset`. Returns the number of bytes written.
///
/// Panics if the character range is out of range, or if the encoded bytes do not fit in
/// `buffer`.
pub fn encode(
    text: &str,
    char_start: usize,
    char_count: usize,
    buffer: &mut [u8],
    offset: usize,
    encoding: TextEncoding,
) -> usize {
    let text = char_range(text, char_start, char_count);
    encoding.codec().encode(text, &mut buffer[offset..])
}

/// Encodes all of `text` into `buffer` at `offset`. Returns the number of bytes written.
pub fn encode_str(text: &str, buffer: &mut [u8], offset: usize, encoding: TextEncoding) -> usize {
    encoding.codec().encode(text, &mut buffer[offset..])
}

/// Decodes `byte_len` bytes of `buffer`, starting at `offset`.
///
/// Panics if the range does not fit in `buffer`.
pub fn decode(buffer: &[u8], offset: usize, byte_len: usize, encoding: TextEncoding) -> String {
    encoding.codec().decode(&buffer[offset..offset + byte_len])
}

/// Computes how many bytes [`encode`] would write for the same arguments, without encoding
/// anything.
pub fn byte_count(
    text: &str,
    char_start: usize,
    char_count: usize,
    encoding: TextEncoding,
) -> usize {
    encoding
        .codec()
        .byte_count(char_range(text, char_start, char_count))
}

/// Computes how many bytes [`encode_str`] would write for `text`.
pub fn byte_count_str(text: &str, encoding: TextEncoding) -> usize {
    encoding.codec().byte_count(text)
}
