//! Endian-aware cursor for sequential reads over container regions.
//!
//! [`crate::file::cursor::Cursor`] wraps a byte slice with a position and a runtime
//! byte order. The container directory is read in the order announced by its header
//! (big-endian by default) while object payloads are always little-endian, so the
//! same cursor type serves both with [`crate::file::cursor::Cursor::set_endian`].
//!
//! Every read is bounds-checked and advances the position; failures surface as
//! [`crate::Error::OutOfBounds`] or [`crate::Error::Malformed`] without panicking.

use crate::{
    file::io::{read_be_at, read_le_at, ByteIO},
    Result,
};

/// Byte order applied to multi-byte reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    /// Least significant byte first. Object payloads always use this order.
    Little,
    /// Most significant byte first. The directory default, and the payload order
    /// is never affected by the directory flag.
    Big,
}

/// Width of a serialized boolean field.
///
/// The object serializer stores booleans as 1, 2 or 4 byte integers depending on
/// the surrounding structure; any stored value other than 0 or 1 is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolWidth {
    /// Single byte boolean.
    One,
    /// Two byte boolean.
    Two,
    /// Four byte boolean, the most common encoding.
    Four,
}

/// A bounds-checked sequential reader over a byte region.
///
/// # Examples
///
/// ```rust
/// use dysonscope::file::cursor::{Cursor, Endian};
///
/// let data = [0x02, 0x00, 0x00, 0x00, 0x61, 0x62];
/// let mut cursor = Cursor::new(&data, Endian::Little);
/// let name = cursor.read_str(false)?;
/// assert_eq!(name, "ab");
/// # Ok::<(), dysonscope::Error>(())
/// ```
pub struct Cursor<'a> {
    data: &'a [u8],
    position: usize,
    endian: Endian,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor over `data` starting at position 0.
    #[must_use]
    pub fn new(data: &'a [u8], endian: Endian) -> Self {
        Cursor {
            data,
            position: 0,
            endian,
        }
    }

    /// Current read position in bytes from the start of the region.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Total length of the underlying region.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` when the region is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of bytes left between the position and the end of the region.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Byte order currently applied to multi-byte reads.
    #[must_use]
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Changes the byte order for subsequent reads.
    pub fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    /// Moves the position to an absolute offset.
    ///
    /// Seeking to the exact end of the region is allowed; only offsets past the
    /// end are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if `offset` exceeds the region length.
    pub fn seek(&mut self, offset: usize) -> Result<()> {
        if offset > self.data.len() {
            return Err(out_of_bounds_error!());
        }
        self.position = offset;
        Ok(())
    }

    /// Advances the position by `count` bytes without reading them.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `count` bytes remain.
    pub fn skip(&mut self, count: usize) -> Result<()> {
        let Some(target) = self.position.checked_add(count) else {
            return Err(out_of_bounds_error!());
        };
        self.seek(target)
    }

    /// Rounds the position up to the next 4-byte boundary.
    ///
    /// Alignment never reads data, so a position aligned past the end of the
    /// region is only an error once something is read there.
    pub fn align4(&mut self) {
        self.position = (self.position + 3) & !3_usize;
    }

    /// Reads a primitive value in the cursor's current byte order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if insufficient bytes remain.
    pub fn read<T: ByteIO>(&mut self) -> Result<T> {
        match self.endian {
            Endian::Little => read_le_at(self.data, &mut self.position),
            Endian::Big => read_be_at(self.data, &mut self.position),
        }
    }

    /// Reads `count` raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `count` bytes remain.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let Some(end) = self.position.checked_add(count) else {
            return Err(out_of_bounds_error!());
        };
        if end > self.data.len() {
            return Err(out_of_bounds_error!());
        }
        let slice = &self.data[self.position..end];
        self.position = end;
        Ok(slice)
    }

    /// Reads a NUL-terminated string.
    ///
    /// The terminator is consumed; the returned string excludes it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if no terminator is found before the
    /// end of the region or the bytes are not valid UTF-8.
    pub fn read_cstr(&mut self) -> Result<String> {
        let start = self.position;
        let Some(nul) = self.data[start..].iter().position(|&b| b == 0) else {
            return Err(malformed_error!("Unterminated string at offset {}", start));
        };
        let bytes = &self.data[start..start + nul];
        self.position = start + nul + 1;
        match std::str::from_utf8(bytes) {
            Ok(text) => Ok(text.to_string()),
            Err(_) => Err(malformed_error!(
                "Invalid UTF-8 in string at offset {}",
                start
            )),
        }
    }

    /// Reads a length-prefixed string.
    ///
    /// The length is a signed 32-bit value in the cursor's byte order. A length
    /// of zero yields the empty string. When `align` is set the position is
    /// rounded to a 4-byte boundary after the character bytes, matching the
    /// serializer's padding of aligned string fields.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if the length is negative, exceeds the
    /// remaining bytes, or the bytes are not valid UTF-8.
    pub fn read_str(&mut self, align: bool) -> Result<String> {
        let length = self.read::<i32>()?;
        if length < 0 {
            return Err(malformed_error!("Negative string length {}", length));
        }
        if length == 0 {
            return Ok(String::new());
        }

        let length = length as usize;
        if length > self.remaining() {
            return Err(malformed_error!(
                "String length {} exceeds remaining {} bytes",
                length,
                self.remaining()
            ));
        }

        let bytes = self.read_bytes(length)?;
        let text = match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(_) => {
                return Err(malformed_error!(
                    "Invalid UTF-8 in string of length {}",
                    length
                ))
            }
        };

        if align {
            self.align4();
        }
        Ok(text)
    }

    /// Reads a boolean of the given serialized width.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if the stored value is neither 0 nor 1.
    pub fn read_bool(&mut self, width: BoolWidth) -> Result<bool> {
        let raw: u32 = match width {
            BoolWidth::One => u32::from(self.read::<u8>()?),
            BoolWidth::Two => u32::from(self.read::<u16>()?),
            BoolWidth::Four => self.read::<u32>()?,
        };
        match raw {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(malformed_error!("Invalid boolean value {}", other)),
        }
    }

    /// Reads a 16-byte identifier.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if fewer than 16 bytes remain.
    pub fn read_guid_bytes(&mut self) -> Result<[u8; 16]> {
        let bytes = self.read_bytes(16)?;
        let mut out = [0u8; 16];
        out.copy_from_slice(bytes);
        Ok(out)
    }
}

impl std::fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("len", &self.data.len())
            .field("position", &self.position)
            .field("endian", &self.endian)
            .finish()
    }
}
