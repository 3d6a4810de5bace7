use alloc::string::String;
use tracing::{debug, trace};

use crate::byte_codec::{self, ByteOrder, Scalar};
use crate::error::{Error, Result};
use crate::text::{self, TextEncoding};

/// Reads and writes a sequence of values in a caller-supplied buffer.
///
/// The cursor keeps two independent offsets into the buffer, one for reading and one for
/// writing, and a length that records how many bytes of the buffer hold written data. Reads
/// only ever move the read offset. Writes move the write offset and, when they reach past the
/// current length, move the length to the end of the write.
///
/// Multi-byte numbers default to little-endian byte order; the `*_ordered` methods take an
/// explicit [`ByteOrder`]. Text uses the [`TextEncoding`] given at construction, unless a
/// `*_with` method overrides it for one call.
///
/// The cursor never grows or reallocates the buffer. The plain `read_*` and `write_*` methods do
/// not check bounds beyond slice indexing, so reading or writing past the end of the buffer
/// panics. The `try_*` methods check first and return an [`Error`] instead.
///
/// Reading needs `B: AsRef<[u8]>`. Writing additionally needs `B: AsMut<[u8]>`. A cursor over
/// `&[u8]` is therefore read-only.
///
/// ```
/// use byteme::{BinaryCursor, ByteOrder, TextEncoding};
///
/// let mut buffer = [0u8; 64];
/// let mut w = BinaryCursor::new(&mut buffer[..], 0, TextEncoding::Utf8);
/// w.write(7u16);
/// w.write_ordered(0x0102_0304u32, ByteOrder::BigEndian);
/// w.write_str("hi");
/// let len = w.len();
///
/// let mut r = BinaryCursor::new(&buffer[..], len, TextEncoding::Utf8);
/// assert_eq!(r.read::<u16>(), 7);
/// assert_eq!(r.read_ordered::<u32>(ByteOrder::BigEndian), 0x0102_0304);
/// assert_eq!(r.read_string(2), "hi");
/// ```
pub struct BinaryCursor<B> {
    buffer: B,
    read_offset: usize,
    write_offset: usize,
    length: usize,
    encoding: TextEncoding,
}

/// Width of the unsigned little-endian length field written before a prefixed payload.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum PrefixWidth {
    /// One byte, payloads of up to 255 bytes.
    U8,
    /// Two bytes, payloads of up to 65535 bytes.
    U16,
    /// Four bytes.
    #[default]
    U32,
}

impl PrefixWidth {
    /// Size of the length field in bytes.
    pub const fn size(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }
}

impl<B: AsRef<[u8]>> BinaryCursor<B> {
    /// Binds a cursor to `buffer`.
    ///
    /// `length` is the number of bytes at the start of `buffer` that already hold data. Use 0
    /// for an empty buffer that is about to be written, or the length of previously written
    /// data when the cursor is going to read it back.
    pub fn new(buffer: B, length: usize, encoding: TextEncoding) -> Self {
        trace!(
            capacity = buffer.as_ref().len(),
            length,
            ?encoding,
            "binding cursor"
        );
        Self {
            buffer,
            read_offset: 0,
            write_offset: 0,
            length,
            encoding,
        }
    }

    /// Binds the cursor to a different buffer, with both offsets at 0 and the given length.
    /// Returns the buffer that was bound before.
    pub fn set_buffer(&mut self, buffer: B, length: usize) -> B {
        trace!(
            capacity = buffer.as_ref().len(),
            length,
            "rebinding cursor"
        );
        self.read_offset = 0;
        self.write_offset = 0;
        self.length = length;
        core::mem::replace(&mut self.buffer, buffer)
    }

    /// Moves both offsets to 0 and sets the length to 0. The buffer contents are not touched.
    pub fn reset(&mut self) {
        trace!(length = self.length, "resetting cursor");
        self.read_offset = 0;
        self.write_offset = 0;
        self.length = 0;
    }

    /// Moves the read offset. The new offset is not checked against the buffer.
    pub fn set_read_offset(&mut self, offset: usize) {
        self.read_offset = offset;
    }

    /// Moves the write offset. The new offset is not checked against the buffer.
    ///
    /// If the next write starts past the current length, the bytes in between are counted in
    /// the length but hold whatever the buffer contained before.
    pub fn set_write_offset(&mut self, offset: usize) {
        self.write_offset = offset;
    }

    /// Accesses the buffer.
    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    /// Unbinds the cursor and returns the buffer.
    pub fn into_inner(self) -> B {
        self.buffer
    }

    /// The size of the buffer in bytes.
    pub fn buffer_size(&self) -> usize {
        self.buffer.as_ref().len()
    }

    /// The offset of the next read.
    pub fn read_offset(&self) -> usize {
        self.read_offset
    }

    /// The offset of the next write.
    pub fn write_offset(&self) -> usize {
        self.write_offset
    }

    /// The number of bytes at the start of the buffer that hold written data.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The encoding used by the string methods that do not take one.
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// The number of written bytes at or after the read offset.
    pub fn remaining(&self) -> usize {
        self.length.saturating_sub(self.read_offset)
    }

    /// The written part of the buffer, `buffer[..len()]`, cut short at the end of the buffer
    /// if the cursor was bound with a length larger than the buffer.
    pub fn written(&self) -> &[u8] {
        &self.buffer.as_ref()[..self.length.min(self.buffer_size())]
    }

    #[inline(always)]
    fn advance_read(&mut self, size: usize) -> usize {
        let start = self.read_offset;
        self.read_offset += size;
        start
    }

    fn check_read(&self, needed: usize) -> Result<()> {
        let end = self.length.min(self.buffer_size());
        let available = end.saturating_sub(self.read_offset);
        if needed > available {
            debug!(
                offset = self.read_offset,
                needed, available, "checked read needs more data"
            );
            return Err(Error::NeedsMoreData {
                offset: self.read_offset,
                needed,
                available,
            });
        }
        Ok(())
    }

    /// Reads a little-endian `T`.
    #[inline]
    pub fn read<T: Scalar>(&mut self) -> T {
        self.read_ordered(ByteOrder::LittleEndian)
    }

    /// Reads a `T` stored in the given byte order.
    #[inline]
    pub fn read_ordered<T: Scalar>(&mut self, order: ByteOrder) -> T {
        let value = byte_codec::decode(self.buffer.as_ref(), self.read_offset, order);
        self.advance_read(T::SIZE);
        value
    }

    /// Reads a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> u8 {
        let value = self.buffer.as_ref()[self.read_offset];
        self.advance_read(1);
        value
    }

    /// Reads a `bool`. Any non-zero byte is `true`.
    #[inline]
    pub fn read_bool(&mut self) -> bool {
        self.read_u8() != 0
    }

    /// Reads `byte_len` bytes and decodes them with the cursor's encoding.
    pub fn read_string(&mut self, byte_len: usize) -> String {
        self.read_string_with(byte_len, self.encoding)
    }

    /// Reads `byte_len` bytes and decodes them with `encoding`.
    pub fn read_string_with(&mut self, byte_len: usize, encoding: TextEncoding) -> String {
        let value = text::decode(self.buffer.as_ref(), self.read_offset, byte_len, encoding);
        self.advance_read(byte_len);
        value
    }

    /// Copies `len` bytes into `dest[dest_offset..]`.
    pub fn read_bytes(&mut self, dest: &mut [u8], len: usize, dest_offset: usize) {
        byte_codec::copy_bytes(dest, dest_offset, self.buffer.as_ref(), self.read_offset, len);
        self.advance_read(len);
    }

    /// Reads `len` bytes and returns them without copying.
    pub fn read_slice(&mut self, len: usize) -> &[u8] {
        let start = self.advance_read(len);
        &self.buffer.as_ref()[start..start + len]
    }

    /// Reads `len` bytes and returns them, undecoded, as a byte string.
    ///
    /// The bytes are not validated. This is useful for inspecting text whose encoding is not
    /// trusted.
    #[cfg(feature = "bstr")]
    pub fn read_bstr(&mut self, len: usize) -> &bstr::BStr {
        bstr::BStr::new(self.read_slice(len))
    }

    fn read_prefix(&mut self, width: PrefixWidth) -> usize {
        match width {
            PrefixWidth::U8 => self.read_u8() as usize,
            PrefixWidth::U16 => self.read::<u16>() as usize,
            PrefixWidth::U32 => self.read::<u32>() as usize,
        }
    }

    /// Reads a length prefix of the given width, then that many bytes of text in the cursor's
    /// encoding.
    pub fn read_prefixed_string(&mut self, width: PrefixWidth) -> String {
        self.read_prefixed_string_with(width, self.encoding)
    }

    /// Reads a length prefix of the given width, then that many bytes of text in `encoding`.
    pub fn read_prefixed_string_with(
        &mut self,
        width: PrefixWidth,
        encoding: TextEncoding,
    ) -> String {
        let len = self.read_prefix(width);
        self.read_string_with(len, encoding)
    }

    /// Reads a length prefix of the given width, then that many bytes, without copying.
    pub fn read_prefixed_slice(&mut self, width: PrefixWidth) -> &[u8] {
        let len = self.read_prefix(width);
        self.read_slice(len)
    }

    /// Reads a little-endian `T`, or returns [`Error::NeedsMoreData`] if fewer than
    /// `T::SIZE` written bytes remain.
    pub fn try_read<T: Scalar>(&mut self) -> Result<T> {
        self.try_read_ordered(ByteOrder::LittleEndian)
    }

    /// Reads a `T` stored in the given byte order, or returns [`Error::NeedsMoreData`] if fewer
    /// than `T::SIZE` written bytes remain.
    pub fn try_read_ordered<T: Scalar>(&mut self, order: ByteOrder) -> Result<T> {
        self.check_read(T::SIZE)?;
        Ok(self.read_ordered(order))
    }

    /// Reads `len` bytes without copying, or returns [`Error::NeedsMoreData`] if fewer than
    /// `len` written bytes remain.
    pub fn try_read_slice(&mut self, len: usize) -> Result<&[u8]> {
        self.check_read(len)?;
        Ok(self.read_slice(len))
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> BinaryCursor<B> {
    /// Accesses the buffer mutably.
    pub fn buffer_mut(&mut self) -> &mut B {
        &mut self.buffer
    }

    // Overwrites that end at or before the current length leave the length alone.
    #[inline(always)]
    fn advance_write(&mut self, size: usize) {
        let end = self.write_offset + size;
        if end > self.length {
            self.length = end;
        }
        self.write_offset = end;
    }

    fn check_write(&self, needed: usize) -> Result<()> {
        let capacity = self.buffer_size();
        if needed > capacity.saturating_sub(self.write_offset) {
            debug!(
                offset = self.write_offset,
                needed, capacity, "checked write overflows buffer"
            );
            return Err(Error::BufferOverflow {
                offset: self.write_offset,
                needed,
                capacity,
            });
        }
        Ok(())
    }

    /// Writes `value` in little-endian byte order.
    #[inline]
    pub fn write<T: Scalar>(&mut self, value: T) {
        self.write_ordered(value, ByteOrder::LittleEndian)
    }

    /// Writes `value` in the given byte order.
    #[inline]
    pub fn write_ordered<T: Scalar>(&mut self, value: T, order: ByteOrder) {
        byte_codec::encode(value, self.buffer.as_mut(), self.write_offset, order);
        self.advance_write(T::SIZE);
    }

    /// Writes a single byte.
    #[inline]
    pub fn write_u8(&mut self, value: u8) {
        self.buffer.as_mut()[self.write_offset] = value;
        self.advance_write(1);
    }

    /// Writes a `bool`. True is encoded as 1. False is encoded as 0.
    #[inline]
    pub fn write_bool(&mut self, value: bool) {
        self.write_u8(value as u8)
    }

    /// Writes `bytes` as they are, without a length prefix.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        byte_codec::copy_bytes(self.buffer.as_mut(), self.write_offset, bytes, 0, bytes.len());
        self.advance_write(bytes.len());
    }

    /// Encodes `text` with the cursor's encoding, without a length prefix. Returns the number
    /// of bytes written.
    pub fn write_str(&mut self, text: &str) -> usize {
        let n = text::encode_str(text, self.buffer.as_mut(), self.write_offset, self.encoding);
        self.advance_write(n);
        n
    }

    /// Encodes the first `char_count` characters of `text`. Returns the number of bytes
    /// written.
    pub fn write_str_count(&mut self, text: &str, char_count: usize) -> usize {
        self.write_str_range(text, 0, char_count)
    }

    /// Encodes `char_count` characters of `text`, starting at character `char_start`. Returns
    /// the number of bytes written.
    pub fn write_str_range(&mut self, text: &str, char_start: usize, char_count: usize) -> usize {
        self.write_str_with(text, char_start, char_count, self.encoding)
    }

    /// Encodes `char_count` characters of `text`, starting at character `char_start`, with
    /// `encoding` instead of the cursor's encoding. Returns the number of bytes written.
    pub fn write_str_with(
        &mut self,
        text: &str,
        char_start: usize,
        char_count: usize,
        encoding: TextEncoding,
    ) -> usize {
        let n = text::encode(
            text,
            char_start,
            char_count,
            self.buffer.as_mut(),
            self.write_offset,
            encoding,
        );
        self.advance_write(n);
        n
    }

    // Must pass before the prefix is written: prefix width holds `len`, and prefix plus
    // payload fit in the buffer.
    fn check_prefixed(&self, len: usize, width: PrefixWidth) -> Result<()> {
        let max = match width {
            PrefixWidth::U8 => u8::MAX as u64,
            PrefixWidth::U16 => u16::MAX as u64,
            PrefixWidth::U32 => u32::MAX as u64,
        };
        if len as u64 > max {
            debug!(len, width = width.size(), "payload does not fit in length prefix");
            return Err(Error::PrefixOverflow {
                len,
                width: width.size(),
            });
        }
        self.check_write(width.size().saturating_add(len))
    }

    fn write_prefix(&mut self, len: usize, width: PrefixWidth) {
        match width {
            PrefixWidth::U8 => self.write_u8(len as u8),
            PrefixWidth::U16 => self.write(len as u16),
            PrefixWidth::U32 => self.write(len as u32),
        }
    }

    /// Writes the encoded length of `text` as a prefix of the given width, followed by `text`
    /// in the cursor's encoding. Returns the number of payload bytes written.
    ///
    /// Returns [`Error::PrefixOverflow`] if the encoded length does not fit in the prefix, and
    /// [`Error::BufferOverflow`] if prefix and payload do not fit in the buffer. Nothing is
    /// written in either case.
    pub fn write_prefixed_str(&mut self, text: &str, width: PrefixWidth) -> Result<usize> {
        self.write_prefixed_str_with(text, width, self.encoding)
    }

    /// Like [`write_prefixed_str`](Self::write_prefixed_str), but encodes `text` with
    /// `encoding` instead of the cursor's encoding.
    pub fn write_prefixed_str_with(
        &mut self,
        text: &str,
        width: PrefixWidth,
        encoding: TextEncoding,
    ) -> Result<usize> {
        let len = text::byte_count_str(text, encoding);
        self.check_prefixed(len, width)?;
        self.write_prefix(len, width);
        let written = text::encode_str(text, self.buffer.as_mut(), self.write_offset, encoding);
        debug_assert_eq!(written, len);
        self.advance_write(written);
        Ok(written)
    }

    /// Writes the length of `bytes` as a prefix of the given width, followed by `bytes`.
    ///
    /// Returns [`Error::PrefixOverflow`] if the length does not fit in the prefix, and
    /// [`Error::BufferOverflow`] if prefix and payload do not fit in the buffer. Nothing is
    /// written in either case.
    pub fn write_prefixed_bytes(&mut self, bytes: &[u8], width: PrefixWidth) -> Result<()> {
        self.check_prefixed(bytes.len(), width)?;
        self.write_prefix(bytes.len(), width);
        self.write_bytes(bytes);
        Ok(())
    }

    /// Writes `value` in little-endian byte order, or returns [`Error::BufferOverflow`] if it
    /// does not fit in the buffer.
    pub fn try_write<T: Scalar>(&mut self, value: T) -> Result<()> {
        self.try_write_ordered(value, ByteOrder::LittleEndian)
    }

    /// Writes `value` in the given byte order, or returns [`Error::BufferOverflow`] if it does
    /// not fit in the buffer.
    pub fn try_write_ordered<T: Scalar>(&mut self, value: T, order: ByteOrder) -> Result<()> {
        self.check_write(T::SIZE)?;
        self.write_ordered(value, order);
        Ok(())
    }
}
