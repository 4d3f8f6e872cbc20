//! Low-level byte order and safe reading utilities for container parsing.
//!
//! This module provides endian-aware binary data reading for parsing asset containers
//! and the data tables embedded inside them. It implements safe, bounds-checked reads of
//! primitive types from byte buffers with both little-endian and big-endian support,
//! preventing buffer overruns during binary analysis.
//!
//! # Architecture
//!
//! The module is built around the [`crate::file::io::ByteIO`] trait which provides a
//! unified interface for converting fixed-size byte arrays into primitive values:
//!
//! - Generic trait-based reading for all primitive types
//! - Automatic bounds checking to prevent buffer overruns
//! - Consistent error handling through the [`crate::Result`] type
//!
//! # Key Components
//!
//! - [`crate::file::io::ByteIO`] - Trait defining endian-aware conversions for primitive types
//! - [`crate::file::io::read_le`] / [`crate::file::io::read_be`] - Read from buffer start
//! - [`crate::file::io::read_le_at`] / [`crate::file::io::read_be_at`] - Read at offset with auto-advance
//! - [`crate::file::io::write_le_at`] / [`crate::file::io::write_be_at`] - Write at offset with auto-advance
//!
//! ## Supported Types
//! The [`crate::file::io::ByteIO`] trait is implemented for:
//! - **Unsigned integers**: `u8`, `u16`, `u32`, `u64`
//! - **Signed integers**: `i8`, `i16`, `i32`, `i64`
//! - **Floating point**: `f32`, `f64`
//!
//! # Usage Examples
//!
//! ```rust,ignore
//! use dysonscope::file::io::read_le_at;
//!
//! let data = [0x01, 0x00, 0x02, 0x00, 0x03, 0x00, 0x00, 0x00];
//! let mut offset = 0;
//!
//! let first: u16 = read_le_at(&data, &mut offset)?;  // offset: 0 -> 2
//! let second: u16 = read_le_at(&data, &mut offset)?; // offset: 2 -> 4
//! let third: u32 = read_le_at(&data, &mut offset)?;  // offset: 4 -> 8
//!
//! assert_eq!(first, 1);
//! assert_eq!(second, 2);
//! assert_eq!(third, 3);
//! # Ok::<(), dysonscope::Error>(())
//! ```
//!
//! # Error Handling
//!
//! All reading functions return [`crate::Result<T>`] and will return
//! [`crate::Error::OutOfBounds`] if there are insufficient bytes in the buffer to
//! complete the operation.

use crate::{Error::OutOfBounds, Result};

/// Trait for implementing type-specific safe binary data reading operations.
///
/// This trait provides a unified interface for reading primitive types from byte slices
/// in a safe and endian-aware manner. It abstracts over the conversion from byte arrays
/// to typed values, supporting both little-endian and big-endian formats as they occur
/// in the container format (big-endian directory metadata, little-endian payloads).
///
/// Each implementation defines a `Bytes` associated type that represents the fixed-size
/// byte array required for that particular type (e.g., `[u8; 4]` for `u32`).
pub trait ByteIO: Sized {
    /// Associated type representing the byte array type for this numeric type.
    type Bytes: Sized + for<'a> TryFrom<&'a [u8]>;

    /// Read T from a byte buffer in little-endian
    fn from_le_bytes(bytes: Self::Bytes) -> Self;
    /// Read T from a byte buffer in big-endian
    fn from_be_bytes(bytes: Self::Bytes) -> Self;

    /// Write T to a byte buffer in little-endian
    fn to_le_bytes(self) -> Self::Bytes;
    /// Write T to a byte buffer in big-endian
    fn to_be_bytes(self) -> Self::Bytes;
}

macro_rules! impl_byte_io {
    ($($typ:ty => $len:literal),+ $(,)?) => {
        $(
            impl ByteIO for $typ {
                type Bytes = [u8; $len];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$typ>::from_le_bytes(bytes)
                }

                fn from_be_bytes(bytes: Self::Bytes) -> Self {
                    <$typ>::from_be_bytes(bytes)
                }

                fn to_le_bytes(self) -> Self::Bytes {
                    <$typ>::to_le_bytes(self)
                }

                fn to_be_bytes(self) -> Self::Bytes {
                    <$typ>::to_be_bytes(self)
                }
            }
        )+
    };
}

impl_byte_io! {
    u8 => 1, i8 => 1,
    u16 => 2, i16 => 2,
    u32 => 4, i32 => 4,
    u64 => 8, i64 => 8,
    f32 => 4, f64 => 8,
}

/// Safely reads a value of type `T` in little-endian byte order from a data buffer.
///
/// Reads from the beginning of the buffer and supports all types that implement
/// the [`crate::file::io::ByteIO`] trait.
///
/// # Arguments
///
/// * `data` - The byte buffer to read from
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes.
pub fn read_le<T: ByteIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Safely reads a value of type `T` in little-endian byte order at a specific offset.
///
/// Reads from the specified offset and automatically advances the offset by the
/// number of bytes read.
///
/// # Arguments
///
/// * `data` - The byte buffer to read from
/// * `offset` - Mutable reference to the offset position (will be advanced after reading)
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes.
pub fn read_le_at<T: ByteIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    if (type_len + *offset) > data.len() {
        return Err(OutOfBounds);
    }

    let Ok(read) = data[*offset..*offset + type_len].try_into() else {
        return Err(OutOfBounds);
    };

    *offset += type_len;

    Ok(T::from_le_bytes(read))
}

/// Safely reads a value of type `T` in big-endian byte order from a data buffer.
///
/// The container's outer header and directory metadata default to big-endian; payload
/// regions are little-endian, so both orders are needed.
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes.
pub fn read_be<T: ByteIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_be_at(data, &mut offset)
}

/// Safely reads a value of type `T` in big-endian byte order at a specific offset.
///
/// Reads from the specified offset and automatically advances the offset by the
/// number of bytes read.
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes.
pub fn read_be_at<T: ByteIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    if (type_len + *offset) > data.len() {
        return Err(OutOfBounds);
    }

    let Ok(read) = data[*offset..*offset + type_len].try_into() else {
        return Err(OutOfBounds);
    };

    *offset += type_len;

    Ok(T::from_be_bytes(read))
}

/// Safely writes a value of type `T` in little-endian byte order at a specific offset.
///
/// Writes at the specified offset and automatically advances the offset by the
/// number of bytes written. Used by test fixtures that fabricate container bytes.
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes.
pub fn write_le_at<T: ByteIO>(data: &mut [u8], offset: &mut usize, value: T) -> Result<()>
where
    T::Bytes: AsRef<[u8]>,
{
    let type_len = std::mem::size_of::<T>();
    if (type_len + *offset) > data.len() {
        return Err(OutOfBounds);
    }

    let bytes = value.to_le_bytes();
    data[*offset..*offset + type_len].copy_from_slice(bytes.as_ref());
    *offset += type_len;

    Ok(())
}

/// Safely writes a value of type `T` in big-endian byte order at a specific offset.
///
/// Writes at the specified offset and automatically advances the offset by the
/// number of bytes written.
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes.
pub fn write_be_at<T: ByteIO>(data: &mut [u8], offset: &mut usize, value: T) -> Result<()>
where
    T::Bytes: AsRef<[u8]>,
{
    let type_len = std::mem::size_of::<T>();
    if (type_len + *offset) > data.len() {
        return Err(OutOfBounds);
    }

    let bytes = value.to_be_bytes();
    data[*offset..*offset + type_len].copy_from_slice(bytes.as_ref());
    *offset += type_len;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_BUFFER: [u8; 8] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

    #[test]
    fn read_le_u16() {
        let result = read_le::<u16>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x0201);
    }

    #[test]
    fn read_le_u32() {
        let result = read_le::<u32>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x0403_0201);
    }

    #[test]
    fn read_le_i64() {
        let result = read_le::<i64>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x0807060504030201);
    }

    #[test]
    fn read_be_u16() {
        let result = read_be::<u16>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x102);
    }

    #[test]
    fn read_be_u32() {
        let result = read_be::<u32>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x1020304);
    }

    #[test]
    fn read_be_u64() {
        let result = read_be::<u64>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x102030405060708);
    }

    #[test]
    fn read_le_f32() {
        let result = read_le::<f32>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 1.5399896e-36);
    }

    #[test]
    fn read_at_advances_offset() {
        let mut offset = 2_usize;
        let result = read_le_at::<u16>(&TEST_BUFFER, &mut offset).unwrap();
        assert_eq!(result, 0x403);
        assert_eq!(offset, 4);

        let mut offset = 2_usize;
        let result = read_be_at::<u16>(&TEST_BUFFER, &mut offset).unwrap();
        assert_eq!(result, 0x304);
        assert_eq!(offset, 4);
    }

    #[test]
    fn errors() {
        let buffer = [0xFF, 0xFF, 0xFF, 0xFF];

        let result = read_le::<u64>(&buffer);
        assert!(matches!(result, Err(OutOfBounds)));

        let result = read_be::<f64>(&buffer);
        assert!(matches!(result, Err(OutOfBounds)));
    }

    #[test]
    fn write_round_trip() {
        let mut buffer = [0u8; 8];
        let mut offset = 0;

        write_le_at(&mut buffer, &mut offset, 0x1234u16).unwrap();
        write_be_at(&mut buffer, &mut offset, 0x5678u16).unwrap();
        write_le_at(&mut buffer, &mut offset, 1.0f32).unwrap();
        assert_eq!(offset, 8);
        assert_eq!(buffer[..4], [0x34, 0x12, 0x56, 0x78]);

        let mut offset = 0;
        assert_eq!(read_le_at::<u16>(&buffer, &mut offset).unwrap(), 0x1234);
        assert_eq!(read_be_at::<u16>(&buffer, &mut offset).unwrap(), 0x5678);
        assert_eq!(read_le_at::<f32>(&buffer, &mut offset).unwrap(), 1.0);
    }

    #[test]
    fn write_errors() {
        let mut buffer = [0u8; 2];
        let mut offset = 0;

        let result = write_le_at(&mut buffer, &mut offset, 0x12345678u32);
        assert!(matches!(result, Err(OutOfBounds)));
    }
}
