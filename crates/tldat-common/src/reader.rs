//! Endian-aware binary reader for zero-copy parsing of byte slices.
//!
//! This module provides [`BinaryReader`], a cursor-like type that reads
//! binary data from a byte slice without copying. The byte order is fixed at
//! construction; field widths that vary with the archive mode are handled by
//! [`BinaryReader::read_uint`].

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::{Endian, Error, Result, Width};

/// A binary reader that provides zero-copy reading from a byte slice.
///
/// # Example
///
/// ```
/// use tldat_common::{BinaryReader, Endian};
///
/// let data = [0x01, 0x02, 0x03, 0x04];
/// let mut reader = BinaryReader::new(&data, Endian::Little);
/// assert_eq!(reader.read_u32().unwrap(), 0x04030201);
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
    endian: Endian,
}

impl<'a> BinaryReader<'a> {
    /// Create a new reader from a byte slice with the given byte order.
    #[inline]
    pub const fn new(data: &'a [u8], endian: Endian) -> Self {
        Self {
            data,
            position: 0,
            endian,
        }
    }

    /// Get the current position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Check if there are no more bytes to read.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Seek to an absolute position.
    #[inline]
    pub fn seek(&mut self, position: usize) {
        self.position = position;
    }

    /// Advance the position by a number of bytes.
    #[inline]
    pub fn advance(&mut self, count: usize) {
        self.position = self.position.saturating_add(count);
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::UnexpectedEof {
                needed: count,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.position..self.position + count];
        self.position += count;
        Ok(bytes)
    }

    /// Read a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_bytes(1).map(|b| b[0])
    }

    /// Read a boolean (non-zero = true).
    #[inline]
    pub fn read_bool(&mut self) -> Result<bool> {
        self.read_u8().map(|b| b != 0)
    }

    /// Read a u16 in the reader's byte order.
    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(match self.endian {
            Endian::Little => LittleEndian::read_u16(bytes),
            Endian::Big => BigEndian::read_u16(bytes),
        })
    }

    /// Read a u32 in the reader's byte order.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(match self.endian {
            Endian::Little => LittleEndian::read_u32(bytes),
            Endian::Big => BigEndian::read_u32(bytes),
        })
    }

    /// Read a u64 in the reader's byte order.
    #[inline]
    pub fn read_u64(&mut self) -> Result<u64> {
        let bytes = self.read_bytes(8)?;
        Ok(match self.endian {
            Endian::Little => LittleEndian::read_u64(bytes),
            Endian::Big => BigEndian::read_u64(bytes),
        })
    }

    /// Read a mode-width unsigned integer, widened to u64.
    #[inline]
    pub fn read_uint(&mut self, width: Width) -> Result<u64> {
        match width {
            Width::Bits32 => self.read_u32().map(u64::from),
            Width::Bits64 => self.read_u64(),
        }
    }

    /// Read a null-terminated ASCII string.
    pub fn read_cstring(&mut self) -> Result<&'a str> {
        let remaining = &self.data[self.position.min(self.data.len())..];

        let null_pos = memchr::memchr(0, remaining).ok_or(Error::MissingNullTerminator)?;

        let string_bytes = &remaining[..null_pos];
        self.position += null_pos + 1; // Skip the null terminator

        std::str::from_utf8(string_bytes).map_err(Error::Utf8)
    }

    /// Read a string from a fixed-size buffer, stopping at the first null.
    pub fn read_string_in_buffer(&mut self, buffer_size: usize) -> Result<&'a str> {
        let bytes = self.read_bytes(buffer_size)?;
        let null_pos = memchr::memchr(0, bytes).unwrap_or(buffer_size);
        std::str::from_utf8(&bytes[..null_pos]).map_err(Error::Utf8)
    }
}
